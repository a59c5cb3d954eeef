use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// Annotation text for a Rust type, written the way a tool signature would
/// spell it (`str`, `int`, `List[str]`, `Optional[int]`, ...).
pub trait Annotated {
    fn annotation() -> String;
}

macro_rules! annotate {
    ($annotation:literal => $($ty:ty),+) => {
        $(
            impl Annotated for $ty {
                fn annotation() -> String {
                    $annotation.to_string()
                }
            }
        )+
    };
}

annotate!("str" => String, char);
annotate!("int" => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
annotate!("float" => f32, f64);
annotate!("bool" => bool);
annotate!("Any" => Value);
annotate!("Dict[str, Any]" => Map<String, Value>);

impl<T: Annotated> Annotated for Option<T> {
    fn annotation() -> String {
        format!("Optional[{}]", T::annotation())
    }
}

impl<T: Annotated> Annotated for Vec<T> {
    fn annotation() -> String {
        format!("List[{}]", T::annotation())
    }
}

impl<K, V: Annotated, S> Annotated for HashMap<K, V, S> {
    fn annotation() -> String {
        format!("Dict[str, {}]", V::annotation())
    }
}

impl<K, V: Annotated> Annotated for BTreeMap<K, V> {
    fn annotation() -> String {
        format!("Dict[str, {}]", V::annotation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_types_spell_out_their_constructors() {
        assert_eq!(<Option<i64>>::annotation(), "Optional[int]");
        assert_eq!(<Vec<String>>::annotation(), "List[str]");
        assert_eq!(<Vec<HashMap<String, String>>>::annotation(), "List[Dict[str, str]]");
        assert_eq!(<Option<Vec<f32>>>::annotation(), "Optional[List[float]]");
    }
}

/// Exposes methods of a toolbelt type as [`Callable`](crate::Callable)s.
///
/// Each declared method becomes a tool named after the method. Its `///`
/// comment is the tool's documentation and each parameter's annotation comes
/// from [`Annotated`](crate::Annotated), so the schema handed to the model is
/// derived from the declaration itself. The toolbelt must implement every
/// listed method as `async fn(&self, ..) -> Result<T, E>` with `T: Serialize`.
///
/// ```ignore
/// register_toolbelt! {
///     WebSearch {
///         /// Search the web for pages matching the query.
///         fn web_search_text(query: String, max_results: Option<i64>);
///     }
/// }
/// ```
#[macro_export]
macro_rules! register_toolbelt {
    (
        $toolbelt:ident {
            $(
                $(#[doc = $doc:literal])*
                fn $method:ident($($arg:ident : $ty:ty),* $(,)?);
            )*
        }
    ) => {
        $crate::paste::paste! {
            $(
                pub struct [<$method:camel Tool>] {
                    belt: ::std::sync::Arc<$toolbelt>,
                }

                #[$crate::async_trait::async_trait]
                impl $crate::tools::Callable for [<$method:camel Tool>] {
                    fn name(&self) -> &str {
                        stringify!($method)
                    }

                    fn doc(&self) -> Option<&str> {
                        let doc: &'static str = concat!($($doc, "\n"),*);
                        if doc.is_empty() { None } else { Some(doc) }
                    }

                    fn parameters(&self) -> Option<Vec<$crate::tools::Parameter>> {
                        Some(vec![
                            $(
                                $crate::tools::Parameter::new(
                                    stringify!($arg),
                                    <$ty as $crate::schemas::Annotated>::annotation(),
                                )
                            ),*
                        ])
                    }

                    async fn call(
                        &self,
                        arguments: $crate::serde_json::Map<String, $crate::serde_json::Value>,
                    ) -> $crate::anyhow::Result<$crate::serde_json::Value> {
                        let _ = &arguments;
                        $(
                            let $arg: $ty = $crate::tools::decode_argument(&arguments, stringify!($arg))?;
                        )*
                        let output = self.belt.$method($($arg),*).await?;
                        Ok($crate::serde_json::to_value(output)?)
                    }
                }
            )*

            impl $crate::tools::Toolbelt for $toolbelt {
                fn tools(
                    self: ::std::sync::Arc<Self>,
                ) -> Vec<::std::sync::Arc<dyn $crate::tools::Callable>> {
                    vec![
                        $(
                            ::std::sync::Arc::new([<$method:camel Tool>] { belt: self.clone() })
                                as ::std::sync::Arc<dyn $crate::tools::Callable>
                        ),*
                    ]
                }
            }
        }
    };
}

pub mod api;
pub mod completion;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::{Credentials, Settings};
pub use error::{CompletionError, TurnError};
pub use orchestrator::Orchestrator;

pub mod config;
pub mod credentials;
pub mod error;
pub mod history;
pub mod output;
pub mod predictions;
pub mod run;
pub mod scoring;
pub mod standings;
pub mod stderr_buffer;
pub mod tui;

pub use error::{ConfigError, FetchError, PersistenceError, PredictionError, RunError};

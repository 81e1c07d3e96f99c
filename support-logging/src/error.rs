use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Global tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Invalid redaction pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, LoggingError>;

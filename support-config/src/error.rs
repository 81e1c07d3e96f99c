use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("Failed to read properties file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed \\uXXXX escape on line {line}")]
    InvalidUnicodeEscape { line: usize },

    #[error("No configuration file given; usage: <server.properties> [--override key=value]...")]
    MissingConfigPath,

    #[error("Invalid override '{0}': expected --override key=value")]
    InvalidOverride(String),
}

pub type Result<T> = std::result::Result<T, PropertiesError>;

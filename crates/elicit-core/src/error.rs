use thiserror::Error;

/// Top-level error type for the Elicit system.
///
/// Subsystem crates either use this type directly or define their own error
/// enum with a `From<ElicitError>` impl so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ElicitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Data(String),

    #[error("Frame extraction error: {0}")]
    Frame(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ElicitError {
    fn from(err: toml::de::Error) -> Self {
        ElicitError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ElicitError {
    fn from(err: toml::ser::Error) -> Self {
        ElicitError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ElicitError {
    fn from(err: serde_json::Error) -> Self {
        ElicitError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Elicit operations.
pub type Result<T> = std::result::Result<T, ElicitError>;

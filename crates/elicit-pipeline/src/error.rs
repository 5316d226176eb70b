use thiserror::Error;

use elicit_core::error::ElicitError;

/// Errors that can occur while running the elicitation pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("data error: {0}")]
    Data(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("output directory error: {0}")]
    OutputDir(String),
    #[error(transparent)]
    Core(#[from] ElicitError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_sink() {
        let e = PipelineError::Sink("disk full".to_string());
        assert_eq!(e.to_string(), "sink error: disk full");
    }

    #[test]
    fn test_error_from_core() {
        let core = ElicitError::Frame("ffmpeg missing".to_string());
        let e: PipelineError = core.into();
        assert!(e.to_string().contains("ffmpeg missing"));
        assert!(matches!(e, PipelineError::Core(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file gone");
        let e: PipelineError = io_err.into();
        assert!(matches!(e, PipelineError::Io(_)));
    }
}

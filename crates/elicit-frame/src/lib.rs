//! Elicit Frame crate - still-frame extraction from screen recordings.
//!
//! Provides the `FrameExtractor` trait for pulling one image out of a video
//! at a timestamp, an `FfmpegExtractor` shelling out to the ffmpeg binary,
//! and a `MockFrameExtractor` for tests.
//!
//! Extraction failure is a degraded condition, never a fatal one: the
//! pipeline continues with a prompt that notes the missing snapshot.

pub mod ffmpeg;

use std::path::{Path, PathBuf};

use elicit_core::error::{ElicitError, Result};

pub use ffmpeg::FfmpegExtractor;

/// Service extracting a single frame from a screen recording.
///
/// Implementations decide where the image lands; the returned path is what
/// downstream artifacts reference.
pub trait FrameExtractor: Send + Sync {
    /// Extract the frame at `timestamp_ms` into a file named after
    /// `name_hint`, returning its location.
    fn extract(
        &self,
        video: &Path,
        timestamp_ms: u64,
        name_hint: &str,
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
}

/// Mock frame extractor for testing.
///
/// Returns deterministic paths under a configurable directory, or a fixed
/// error when constructed as failing.
#[derive(Debug, Clone)]
pub struct MockFrameExtractor {
    frame_dir: PathBuf,
    fail: bool,
}

impl MockFrameExtractor {
    /// Create a mock that succeeds, placing frames under `frames/`.
    pub fn new() -> Self {
        Self {
            frame_dir: PathBuf::from("frames"),
            fail: false,
        }
    }

    /// Create a mock that places frames under the given directory.
    pub fn with_dir(frame_dir: impl Into<PathBuf>) -> Self {
        Self {
            frame_dir: frame_dir.into(),
            fail: false,
        }
    }

    /// Create a mock whose every extraction fails.
    pub fn failing() -> Self {
        Self {
            frame_dir: PathBuf::from("frames"),
            fail: true,
        }
    }
}

impl Default for MockFrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExtractor for MockFrameExtractor {
    async fn extract(&self, _video: &Path, _timestamp_ms: u64, name_hint: &str) -> Result<PathBuf> {
        if self.fail {
            return Err(ElicitError::Frame("mock extraction failure".to_string()));
        }
        Ok(self.frame_dir.join(name_hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_extractor_returns_hint_path() {
        let extractor = MockFrameExtractor::new();
        let path = extractor
            .extract(Path::new("video.mp4"), 200, "P01_200.jpg")
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("frames/P01_200.jpg"));
    }

    #[tokio::test]
    async fn test_mock_extractor_custom_dir() {
        let extractor = MockFrameExtractor::with_dir("/tmp/cache");
        let path = extractor
            .extract(Path::new("video.mp4"), 0, "x.jpg")
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/cache/x.jpg"));
    }

    #[tokio::test]
    async fn test_failing_mock_extractor() {
        let extractor = MockFrameExtractor::failing();
        let result = extractor.extract(Path::new("video.mp4"), 0, "x.jpg").await;
        assert!(matches!(result, Err(ElicitError::Frame(_))));
    }
}

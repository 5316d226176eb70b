//! Frame extraction via the ffmpeg binary.
//!
//! Codec handling stays inside ffmpeg; this module only builds the command
//! line and checks that an output file actually appeared.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use elicit_core::error::{ElicitError, Result};

use crate::FrameExtractor;

/// Extracts frames by spawning `ffmpeg` for each request.
#[derive(Debug, Clone)]
pub struct FfmpegExtractor {
    frame_cache_dir: PathBuf,
    ffmpeg_bin: String,
}

impl FfmpegExtractor {
    /// Create an extractor writing frames into the given cache directory.
    pub fn new(frame_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            frame_cache_dir: frame_cache_dir.into(),
            ffmpeg_bin: "ffmpeg".to_string(),
        }
    }

    /// Override the ffmpeg executable name or path.
    pub fn with_binary(mut self, ffmpeg_bin: impl Into<String>) -> Self {
        self.ffmpeg_bin = ffmpeg_bin.into();
        self
    }
}

/// Render a millisecond offset as ffmpeg's `-ss` seconds argument.
fn seek_seconds(timestamp_ms: u64) -> String {
    format!("{}.{:03}", timestamp_ms / 1000, timestamp_ms % 1000)
}

/// Build the ffmpeg argument list for one extraction.
fn build_args(video: &Path, timestamp_ms: u64, output: &Path) -> Vec<OsString> {
    vec![
        OsString::from("-y"),
        OsString::from("-loglevel"),
        OsString::from("error"),
        OsString::from("-ss"),
        OsString::from(seek_seconds(timestamp_ms)),
        OsString::from("-i"),
        video.as_os_str().to_os_string(),
        OsString::from("-frames:v"),
        OsString::from("1"),
        OsString::from("-q:v"),
        OsString::from("2"),
        output.as_os_str().to_os_string(),
    ]
}

impl FrameExtractor for FfmpegExtractor {
    async fn extract(&self, video: &Path, timestamp_ms: u64, name_hint: &str) -> Result<PathBuf> {
        if !video.exists() {
            return Err(ElicitError::Frame(format!(
                "video not found: {}",
                video.display()
            )));
        }

        std::fs::create_dir_all(&self.frame_cache_dir)?;
        let output = self.frame_cache_dir.join(name_hint);
        let args = build_args(video, timestamp_ms, &output);

        debug!(video = %video.display(), timestamp_ms, "Extracting frame");

        let status = Command::new(&self.ffmpeg_bin)
            .args(&args)
            .status()
            .await
            .map_err(|e| ElicitError::Frame(format!("failed to spawn {}: {}", self.ffmpeg_bin, e)))?;

        if !status.success() {
            return Err(ElicitError::Frame(format!(
                "{} exited with {} for {}",
                self.ffmpeg_bin,
                status,
                video.display()
            )));
        }
        if !output.exists() {
            return Err(ElicitError::Frame(format!(
                "no frame produced at {}",
                output.display()
            )));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_seconds_formatting() {
        assert_eq!(seek_seconds(0), "0.000");
        assert_eq!(seek_seconds(50), "0.050");
        assert_eq!(seek_seconds(6000), "6.000");
        assert_eq!(seek_seconds(61_234), "61.234");
    }

    #[test]
    fn test_build_args_shape() {
        let args = build_args(Path::new("screen.mp4"), 1500, Path::new("out/P01_1500.jpg"));
        let rendered: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            rendered,
            vec![
                "-y",
                "-loglevel",
                "error",
                "-ss",
                "1.500",
                "-i",
                "screen.mp4",
                "-frames:v",
                "1",
                "-q:v",
                "2",
                "out/P01_1500.jpg",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_video_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FfmpegExtractor::new(dir.path());
        let result = extractor
            .extract(Path::new("/nonexistent/screen.mp4"), 0, "f.jpg")
            .await;
        assert!(matches!(result, Err(ElicitError::Frame(_))));
    }
}

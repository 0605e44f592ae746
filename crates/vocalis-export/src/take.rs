//! Encoded takes ready for upload or download
//!
//! A take pairs the encoded WAV bytes with the filename and MIME type that
//! upload and download collaborators attach to them.

use crate::error::{ExportError, Result};
use crate::format::wav::{encode_wav, WavHeader};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// MIME type attached to every take
pub const MIME_TYPE: &str = "audio/wav";

/// Default filename prefix for takes
pub const DEFAULT_FILENAME_PREFIX: &str = "accent-test";

/// One encoded recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavTake {
    bytes: Vec<u8>,
    filename: String,
}

impl WavTake {
    /// Encode `samples` and name the take with `prefix` and the current time
    pub fn encode(samples: &[f32], sample_rate: u32, prefix: &str) -> Self {
        Self::from_bytes(
            encode_wav(samples, sample_rate),
            recording_filename(prefix, Utc::now()),
        )
    }

    /// Wrap already-encoded WAV bytes
    pub fn from_bytes(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the take's header
    pub fn header(&self) -> Result<WavHeader> {
        WavHeader::parse(&self.bytes)
    }

    /// Playback duration in seconds (0.0 if the header is unreadable)
    pub fn duration_seconds(&self) -> f64 {
        self.header().map(|h| h.duration_seconds()).unwrap_or(0.0)
    }

    /// Save the take into `dir` under its own filename
    ///
    /// Creates `dir` if needed and returns the written path.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        self.save_as(dir.join(&self.filename))
    }

    /// Save the take to an explicit path
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(ExportError::InvalidOptions(format!(
                "{} has no file name",
                path.display()
            )));
        }

        std::fs::write(path, &self.bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path.to_path_buf())
    }
}

/// Build a take filename such as `accent-test-2024-05-01T09-15-30-250Z.wav`
///
/// The timestamp is ISO-8601 in UTC with millisecond precision, with `:` and
/// `.` replaced by `-` so the name is valid on every filesystem.
pub fn recording_filename(prefix: &str, at: DateTime<Utc>) -> String {
    let stamp = at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let stamp = stamp.replace([':', '.'], "-");
    format!("{}-{}.wav", prefix, stamp)
}

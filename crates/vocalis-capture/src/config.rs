//! Recording configuration types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lowest sample rate a session accepts.
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// Highest sample rate a session accepts.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Recording configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Auto-stop after this many seconds of captured audio. `None` records until stopped.
    pub max_duration_secs: Option<f64>,
    /// Frames per capture callback requested from the device.
    pub chunk_frames: u32,
    /// Input channel to keep when the device delivers more than one.
    pub input_channel: usize,
    /// Capacity, in chunks, of the hand-off queue between the capture callback and the session.
    pub queue_chunks: usize,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: Some(60.0),
            chunk_frames: 4096,
            input_channel: 0,
            queue_chunks: 64,
        }
    }
}

impl RecordingConfig {
    /// Create a builder for configuring recording settings
    ///
    /// # Example
    /// ```ignore
    /// let config = RecordingConfig::builder()
    ///     .max_duration(Duration::from_secs(30))
    ///     .chunk_frames(2048)
    ///     .build();
    /// ```
    pub fn builder() -> RecordingConfigBuilder {
        RecordingConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(secs) = self.max_duration_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "max_duration_secs {} must be a positive number of seconds",
                    secs
                )));
            }
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(Error::InvalidConfig(format!(
                    "max_duration_secs {} exceeds the longest representable duration",
                    secs
                )));
            }
        }

        if !(128..=16384).contains(&self.chunk_frames) {
            return Err(Error::InvalidConfig(format!(
                "chunk_frames {} out of range (128-16384)",
                self.chunk_frames
            )));
        }

        if self.queue_chunks == 0 {
            return Err(Error::InvalidConfig(
                "queue_chunks must hold at least one chunk".to_string(),
            ));
        }

        Ok(())
    }

    /// `None` when unlimited, or when the value is out of range (see `validate`).
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Sample count at which a session running at `sample_rate` auto-stops.
    pub fn max_frames(&self, sample_rate: u32) -> Option<usize> {
        self.max_duration_secs
            .map(|secs| (secs * f64::from(sample_rate)).ceil() as usize)
    }
}

/// Check that a device-reported sample rate is usable.
pub fn validate_sample_rate(sample_rate: u32) -> Result<()> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(Error::InvalidConfig(format!(
            "sample_rate {} out of range ({}-{} Hz)",
            sample_rate, MIN_SAMPLE_RATE, MAX_SAMPLE_RATE
        )));
    }
    Ok(())
}

/// Builder for RecordingConfig with fluent API
#[derive(Clone, Debug, Default)]
pub struct RecordingConfigBuilder {
    config: RecordingConfig,
}

impl RecordingConfigBuilder {
    /// Auto-stop after `duration` of captured audio
    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.config.max_duration_secs = Some(duration.as_secs_f64());
        self
    }

    /// Record until explicitly stopped
    pub fn unlimited(mut self) -> Self {
        self.config.max_duration_secs = None;
        self
    }

    /// Frames per capture callback
    pub fn chunk_frames(mut self, frames: u32) -> Self {
        self.config.chunk_frames = frames;
        self
    }

    /// Input channel to keep (0 = first)
    pub fn input_channel(mut self, channel: usize) -> Self {
        self.config.input_channel = channel;
        self
    }

    /// Hand-off queue capacity in chunks
    pub fn queue_chunks(mut self, chunks: usize) -> Self {
        self.config.queue_chunks = chunks;
        self
    }

    /// Build the RecordingConfig
    pub fn build(self) -> RecordingConfig {
        self.config
    }
}

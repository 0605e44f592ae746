//! Builder for configuring and constructing a `Recorder`.

use crate::{Recorder, Result};
use std::time::Duration;
use vocalis_capture::{RecordingConfig, RecordingSession};
use vocalis_export::DEFAULT_FILENAME_PREFIX;

/// Default wait between capture polls while recording.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The sample rate is not configured here: it comes from the capture
/// source when a session starts.
///
/// # Example
///
/// ```ignore
/// use vocalis::prelude::*;
///
/// let mut recorder = Recorder::builder()
///     .max_duration(Duration::from_secs(60))
///     .filename_prefix("accent-test")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RecorderBuilder {
    config: RecordingConfig,
    filename_prefix: String,
    poll_interval: Duration,
}

impl Default for RecorderBuilder {
    fn default() -> Self {
        Self {
            config: RecordingConfig::default(),
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RecorderBuilder {
    /// Default: 60 seconds
    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.config.max_duration_secs = Some(duration.as_secs_f64());
        self
    }

    /// Record until explicitly stopped.
    pub fn unlimited(mut self) -> Self {
        self.config.max_duration_secs = None;
        self
    }

    /// Default: `accent-test`
    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = prefix.into();
        self
    }

    /// Default: 50 ms
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replace the whole capture configuration.
    pub fn config(mut self, config: RecordingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Recorder> {
        let prefix = self.filename_prefix.trim();
        if prefix.is_empty() || prefix.contains(['/', '\\']) {
            return Err(vocalis_capture::Error::InvalidConfig(format!(
                "filename_prefix {:?} must be a non-empty name without path separators",
                self.filename_prefix
            ))
            .into());
        }

        if self.poll_interval.is_zero() {
            return Err(vocalis_capture::Error::InvalidConfig(
                "poll_interval must be greater than zero".to_string(),
            )
            .into());
        }

        let session = RecordingSession::new(self.config)?;

        tracing::debug!(
            max_duration = ?session.config().max_duration(),
            prefix,
            "Recorder built"
        );

        Ok(Recorder::from_parts(
            session,
            prefix.to_string(),
            self.poll_interval,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults() {
        let recorder = RecorderBuilder::default().build().unwrap();
        assert_eq!(recorder.filename_prefix(), "accent-test");
        assert_eq!(recorder.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(
            recorder.session().config().max_duration(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_rejects_bad_prefix() {
        for prefix in ["", "   ", "takes/accent", "a\\b"] {
            let result = RecorderBuilder::default().filename_prefix(prefix).build();
            assert!(
                matches!(
                    result,
                    Err(Error::Capture(vocalis_capture::Error::InvalidConfig(_)))
                ),
                "prefix {:?} should be rejected",
                prefix
            );
        }
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let result = RecorderBuilder::default()
            .poll_interval(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let result = RecorderBuilder::default()
            .max_duration(Duration::ZERO)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unlimited() {
        let recorder = RecorderBuilder::default().unlimited().build().unwrap();
        assert_eq!(recorder.session().remaining(), None);
    }
}

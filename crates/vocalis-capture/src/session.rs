//! Recording session state machine.
//!
//! A session is owned by whatever drives the recording (the `Recorder` in
//! the umbrella crate). Capture chunks are pushed into it while it is
//! recording; stopping yields the merged recording, if any audio arrived.

use crate::accumulator::SampleAccumulator;
use crate::config::{validate_sample_rate, RecordingConfig};
use crate::{Error, Result};
use std::time::Duration;

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session in progress
    Idle,
    /// Buffers cleared, waiting for the capture device to report its rate
    Preparing,
    /// Accepting chunks
    Recording,
    /// Recording finished; chunks are ignored until the next session
    Stopped,
}

/// Result of pushing one chunk into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Chunk appended
    Accepted,
    /// Chunk appended and the session has reached its maximum duration
    LimitReached,
    /// Session was not recording; chunk discarded
    Ignored,
}

/// A finished recording: merged mono samples and their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Recording {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Single-owner recording session.
pub struct RecordingSession {
    config: RecordingConfig,
    state: SessionState,
    accumulator: SampleAccumulator,
    sample_rate: Option<u32>,
    max_frames: Option<usize>,
}

impl RecordingSession {
    /// Create an idle session. The config is validated here.
    pub fn new(config: RecordingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::Idle,
            accumulator: SampleAccumulator::new(),
            sample_rate: None,
            max_frames: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Sample rate fixed when recording began
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Samples captured so far
    pub fn captured_frames(&self) -> usize {
        self.accumulator.len()
    }

    /// Duration of audio captured so far
    pub fn elapsed(&self) -> Duration {
        match self.sample_rate {
            Some(rate) => {
                Duration::from_secs_f64(self.accumulator.len() as f64 / f64::from(rate))
            }
            None => Duration::ZERO,
        }
    }

    /// Time left before the session auto-stops, if it has a limit
    pub fn remaining(&self) -> Option<Duration> {
        let max = self.config.max_duration()?;
        Some(max.saturating_sub(self.elapsed()))
    }

    /// Clear buffers ahead of acquiring the capture device.
    pub fn prepare(&mut self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::Stopped => {
                self.clear();
                self.state = SessionState::Preparing;
                tracing::debug!("Recording session preparing");
                Ok(())
            }
            state => Err(Error::InvalidState {
                action: "prepare",
                state,
            }),
        }
    }

    /// Start accepting chunks captured at `sample_rate`.
    ///
    /// The rate can only be known once the capture device is open, so it is
    /// fixed here rather than in the config.
    pub fn begin(&mut self, sample_rate: u32) -> Result<()> {
        if self.state == SessionState::Recording {
            return Err(Error::InvalidState {
                action: "begin",
                state: self.state,
            });
        }
        validate_sample_rate(sample_rate)?;

        if self.state != SessionState::Preparing {
            self.clear();
        }

        self.sample_rate = Some(sample_rate);
        self.max_frames = self.config.max_frames(sample_rate);
        self.state = SessionState::Recording;

        tracing::info!(
            sample_rate,
            max_frames = ?self.max_frames,
            "Recording session started"
        );
        Ok(())
    }

    /// Copy a capture chunk into the session.
    pub fn push_chunk(&mut self, chunk: &[f32]) -> ChunkOutcome {
        if self.state != SessionState::Recording {
            return ChunkOutcome::Ignored;
        }
        self.accumulator.append(chunk);
        self.limit_outcome()
    }

    /// Move an owned capture chunk into the session.
    pub fn push_owned(&mut self, chunk: Vec<f32>) -> ChunkOutcome {
        if self.state != SessionState::Recording {
            return ChunkOutcome::Ignored;
        }
        self.accumulator.append_owned(chunk);
        self.limit_outcome()
    }

    /// Stop recording and merge the captured chunks.
    ///
    /// Returns `Ok(None)` when no audio was captured. The chunk buffers are
    /// released either way.
    pub fn stop(&mut self) -> Result<Option<Recording>> {
        if self.state != SessionState::Recording {
            return Err(Error::InvalidState {
                action: "stop",
                state: self.state,
            });
        }
        self.state = SessionState::Stopped;

        let sample_rate = self
            .sample_rate
            .ok_or_else(|| Error::Recording("session has no sample rate".to_string()))?;

        let recording = self
            .accumulator
            .finalize()
            .map(|samples| Recording::new(samples, sample_rate));
        self.accumulator.reset();

        match &recording {
            Some(r) => tracing::info!(
                samples = r.len(),
                seconds = r.duration_seconds(),
                "Recording session stopped"
            ),
            None => tracing::warn!("Recording session stopped with no audio captured"),
        }

        Ok(recording)
    }

    /// Discard everything and return to idle. Never yields a recording.
    pub fn abort(&mut self) {
        if self.state != SessionState::Idle {
            tracing::info!(
                discarded = self.accumulator.len(),
                "Recording session aborted"
            );
        }
        self.clear();
        self.state = SessionState::Idle;
    }

    fn clear(&mut self) {
        self.accumulator.reset();
        self.sample_rate = None;
        self.max_frames = None;
    }

    fn limit_outcome(&self) -> ChunkOutcome {
        match self.max_frames {
            Some(max) if self.accumulator.len() >= max => ChunkOutcome::LimitReached,
            _ => ChunkOutcome::Accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_session(max_secs: f64) -> RecordingSession {
        let config = RecordingConfig::builder()
            .max_duration(Duration::from_secs_f64(max_secs))
            .build();
        RecordingSession::new(config).unwrap()
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = create_test_session(60.0);
        assert_eq!(session.state(), SessionState::Idle);

        session.prepare().unwrap();
        assert_eq!(session.state(), SessionState::Preparing);

        session.begin(16000).unwrap();
        assert!(session.is_recording());
        assert_eq!(session.sample_rate(), Some(16000));

        assert_eq!(session.push_chunk(&[0.1, 0.2]), ChunkOutcome::Accepted);
        assert_eq!(session.push_owned(vec![0.3]), ChunkOutcome::Accepted);
        assert_eq!(session.captured_frames(), 3);

        let recording = session.stop().unwrap().unwrap();
        assert_eq!(session.state(), SessionState::Stopped);
        assert_eq!(recording.samples(), &[0.1, 0.2, 0.3]);
        assert_eq!(recording.sample_rate(), 16000);
        assert_eq!(session.captured_frames(), 0);
    }

    #[test]
    fn test_chunks_ignored_unless_recording() {
        let mut session = create_test_session(60.0);
        assert_eq!(session.push_chunk(&[0.5]), ChunkOutcome::Ignored);

        session.prepare().unwrap();
        assert_eq!(session.push_chunk(&[0.5]), ChunkOutcome::Ignored);

        session.begin(8000).unwrap();
        session.push_chunk(&[0.5]);
        session.stop().unwrap();
        assert_eq!(session.push_chunk(&[0.5]), ChunkOutcome::Ignored);
    }

    #[test]
    fn test_stop_without_audio() {
        let mut session = create_test_session(60.0);
        session.begin(44100).unwrap();
        session.push_chunk(&[]);
        assert_eq!(session.stop().unwrap(), None);
    }

    #[test]
    fn test_stop_requires_recording() {
        let mut session = create_test_session(60.0);
        assert!(matches!(
            session.stop(),
            Err(Error::InvalidState {
                action: "stop",
                state: SessionState::Idle
            })
        ));
    }

    #[test]
    fn test_begin_twice_fails() {
        let mut session = create_test_session(60.0);
        session.begin(44100).unwrap();
        assert!(session.begin(48000).is_err());
        assert_eq!(session.sample_rate(), Some(44100));
    }

    #[test]
    fn test_begin_rejects_bad_rate() {
        let mut session = create_test_session(60.0);
        assert!(matches!(session.begin(0), Err(Error::InvalidConfig(_))));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_limit_reached() {
        // 0.5 s at 8 kHz = 4000 samples
        let mut session = create_test_session(0.5);
        session.begin(8000).unwrap();

        assert_eq!(session.push_chunk(&[0.0; 2048]), ChunkOutcome::Accepted);
        assert_eq!(session.push_chunk(&[0.0; 2048]), ChunkOutcome::LimitReached);
        assert_eq!(session.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_elapsed_and_remaining() {
        let mut session = create_test_session(2.0);
        session.begin(10000).unwrap();
        session.push_chunk(&vec![0.0; 5000]);

        assert_relative_eq!(session.elapsed().as_secs_f64(), 0.5);
        assert_relative_eq!(session.remaining().unwrap().as_secs_f64(), 1.5);
    }

    #[test]
    fn test_abort_discards() {
        let mut session = create_test_session(60.0);
        session.begin(44100).unwrap();
        session.push_chunk(&[0.2; 128]);

        session.abort();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.captured_frames(), 0);
        assert_eq!(session.sample_rate(), None);
        assert!(session.stop().is_err());
    }

    #[test]
    fn test_new_session_after_stop_starts_empty() {
        let mut session = create_test_session(60.0);
        session.begin(8000).unwrap();
        session.push_chunk(&[0.9; 10]);
        session.stop().unwrap();

        session.prepare().unwrap();
        session.begin(8000).unwrap();
        session.push_chunk(&[0.1; 2]);
        let recording = session.stop().unwrap().unwrap();
        assert_eq!(recording.samples(), &[0.1, 0.1]);
    }

    #[test]
    fn test_new_rejects_unrepresentable_limit() {
        let config = RecordingConfig {
            max_duration_secs: Some(1e20),
            ..RecordingConfig::default()
        };
        assert!(matches!(
            RecordingSession::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_long_limit_remaining_does_not_overflow() {
        let config = RecordingConfig::builder()
            .max_duration(Duration::from_secs(u64::MAX / 2))
            .build();
        let mut session = RecordingSession::new(config).unwrap();
        session.begin(48000).unwrap();
        session.push_chunk(&[0.0; 480]);
        assert!(session.remaining().unwrap() > Duration::from_secs(1));
    }

    #[test]
    fn test_recording_duration() {
        let recording = Recording::new(vec![0.0; 22050], 44100);
        assert_relative_eq!(recording.duration_seconds(), 0.5);
        assert!(!recording.is_empty());
    }
}

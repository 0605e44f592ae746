//! Recording sessions and microphone capture.
//!
//! Collects mono capture chunks into a single buffer for one recording
//! session at a time.
//!
//! # Features
//!
//! - **Accumulation**: copy-on-append chunk storage merged once on stop
//! - **Sessions**: explicit Idle / Preparing / Recording / Stopped state machine with a duration limit
//! - **Sources**: the [`CaptureSource`] trait, with an in-memory replay source
//! - **Audio input** (`audio-input` feature): microphone capture through CPAL
//!
//! # Example
//!
//! ```ignore
//! use vocalis_capture::{RecordingConfig, RecordingSession};
//!
//! let mut session = RecordingSession::new(RecordingConfig::default())?;
//! session.prepare()?;
//! session.begin(48000)?;
//! session.push_chunk(&chunk);
//! let recording = session.stop()?;
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod accumulator;
pub mod config;
pub mod session;
pub mod source;

#[cfg(feature = "audio-input")]
pub mod audio_input;

pub use accumulator::SampleAccumulator;
pub use config::{
    validate_sample_rate, RecordingConfig, RecordingConfigBuilder, MAX_SAMPLE_RATE,
    MIN_SAMPLE_RATE,
};
pub use session::{ChunkOutcome, Recording, RecordingSession, SessionState};
pub use source::{CaptureSource, ChunkReplay, SourceEvent};

#[cfg(feature = "audio-input")]
pub use audio_input::{AudioInput, InputDeviceInfo, InputStream};

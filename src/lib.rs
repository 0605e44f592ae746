//! # Vocalis - Pronunciation Practice Recorder
//!
//! Records a spoken passage, packages it as a canonical WAV take and reads
//! back the scoring service's reply.
//!
//! ## Architecture
//!
//! Vocalis is an umbrella crate that coordinates:
//! - **vocalis-capture** - Recording sessions, chunk accumulation, microphone capture
//! - **vocalis-export** - 16-bit PCM WAV encoding and take packaging
//!
//! and adds the [`Recorder`] driver, take sinks and score parsing on top.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vocalis::prelude::*;
//!
//! let mut recorder = Recorder::builder()
//!     .max_duration(Duration::from_secs(60))
//!     .build()?;
//!
//! let stop = AtomicBool::new(false);
//! let outcome = recorder.record(&mut source, &stop)?;
//!
//! if let Some(reply) = recorder.deliver(&mut upload)? {
//!     println!("{}", ScoreReport::from_reply(&reply)?);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Sessions, encoder, sinks and score parsing
//! - `audio-input` - Microphone capture through CPAL

/// Re-export of vocalis-capture for direct access
pub use vocalis_capture as capture;

/// Re-export of vocalis-export for direct access
pub use vocalis_export as export;

pub mod error;
pub use error::{Error, Result};

mod builder;
mod recorder;
pub mod score;
pub mod sink;

pub use builder::{RecorderBuilder, DEFAULT_POLL_INTERVAL};
pub use recorder::{Recorder, TakeOutcome};
pub use score::ScoreReport;
pub use sink::{DirectorySink, SinkReply, TakeSink};

pub use vocalis_capture::{
    CaptureSource, ChunkOutcome, ChunkReplay, Recording, RecordingConfig, RecordingSession,
    SessionState, SourceEvent,
};
pub use vocalis_export::{encode_wav, WavHeader, WavTake, MIME_TYPE};

#[cfg(feature = "audio-input")]
pub use vocalis_capture::{AudioInput, InputDeviceInfo, InputStream};

/// Convenience prelude for common imports
pub mod prelude {
    // Recorder
    pub use crate::{Recorder, RecorderBuilder, TakeOutcome};

    // Capture
    pub use crate::capture::{CaptureSource, ChunkReplay, SourceEvent};

    // Takes and replies
    pub use crate::{DirectorySink, ScoreReport, SinkReply, TakeSink, WavTake};

    #[cfg(feature = "audio-input")]
    pub use crate::capture::AudioInput;

    pub use std::sync::atomic::AtomicBool;
    pub use std::time::Duration;
}

//! # Vocalis Export
//!
//! Encoding utilities for Vocalis recordings.
//!
//! This crate provides:
//! - **Format encoding**: canonical mono 16-bit PCM WAV (44-byte header)
//! - **Header decoding**: validate a take before handing it to a collaborator
//! - **Takes**: encoded bytes + filename + `audio/wav` MIME type, saved locally on request
//!
//! ## Note
//!
//! This crate is typically not used directly. The `vocalis` umbrella crate
//! encodes a take when a recording session stops:
//!
//! ```ignore
//! use vocalis::prelude::*;
//!
//! let mut recorder = Recorder::builder().build()?;
//! recorder.start(44100)?;
//! recorder.feed(&chunk);
//! if let TakeOutcome::Take(take) = recorder.stop()? {
//!     take.save_to_dir("downloads")?;
//! }
//! ```

pub mod error;
pub mod format;
pub mod take;

// Re-exports
pub use error::{ExportError, Result};
pub use format::wav::{decode_pcm16, encode_wav, float_to_i16, WavHeader, HEADER_LEN};
pub use take::{recording_filename, WavTake, DEFAULT_FILENAME_PREFIX, MIME_TYPE};

//! Audio format encoders
//!
//! - `wav`: canonical mono 16-bit PCM WAV

pub mod wav;

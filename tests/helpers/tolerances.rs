//! Tolerance constants for recording tests.
//!
//! Encoding to 16-bit PCM is lossy; these bound the error expected when a
//! take is read back as floats.

/// Floating point rounding errors (passthrough, exact copies).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// 16-bit quantization step size.
/// Truncation loses at most one step per sample.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;

/// Silence threshold (~-80dB).
/// Values below this are considered silent.
pub const SILENCE_THRESHOLD: f32 = 0.0001;

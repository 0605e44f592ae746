//! Test helpers and fixtures for Vocalis integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (accumulation, copies)
//! - `INT16_EPSILON` (1/32768): One 16-bit quantization step
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

pub mod tolerances;

use std::time::Duration;
use vocalis::prelude::*;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: u32 = 48000;

/// Capture period used when splitting signals into chunks
pub const TEST_CHUNK_FRAMES: usize = 4096;

/// Route library logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Recorder with a short poll interval and the given limit.
pub fn test_recorder(max_duration: Duration) -> Recorder {
    init_tracing();
    Recorder::builder()
        .max_duration(max_duration)
        .poll_interval(Duration::from_millis(1))
        .build()
        .expect("Failed to create test recorder")
}

/// Replay `samples` in capture-sized chunks at the test sample rate.
pub fn replay(samples: &[f32]) -> ChunkReplay {
    ChunkReplay::from_samples(TEST_SAMPLE_RATE, samples, TEST_CHUNK_FRAMES)
}

/// Generate a test signal: sine wave at given frequency for specified samples.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / f64::from(sample_rate);
            (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Read a take with hound as an independent decoder.
pub fn read_with_hound(take: &WavTake) -> (hound::WavSpec, Vec<i16>) {
    let reader = hound::WavReader::new(std::io::Cursor::new(take.bytes()))
        .expect("hound rejected the take");
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .expect("hound failed to decode samples");
    (spec, samples)
}

/// Assert that two float signals match within `tolerance` per sample.
pub fn assert_signals_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len(), "signal lengths differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "sample {} differs: {} vs {} (tolerance {})",
            i,
            a,
            e,
            tolerance
        );
    }
}

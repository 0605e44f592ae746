//! Capture sources.
//!
//! A [`CaptureSource`] yields mono `f32` chunks at a fixed sample rate. The
//! hardware microphone stream implements it behind the `audio-input`
//! feature; [`ChunkReplay`] feeds pre-recorded chunks for tests and offline
//! use.

use std::collections::VecDeque;
use std::time::Duration;

/// One poll of a capture source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// A chunk of mono samples
    Chunk(Vec<f32>),
    /// Nothing arrived within the timeout
    Idle,
    /// The source will produce no more audio
    Ended,
}

/// Anything that produces mono capture chunks.
pub trait CaptureSource {
    /// Rate of the samples this source produces, in Hz.
    fn sample_rate(&self) -> u32;

    /// Wait up to `timeout` for the next chunk.
    fn next_chunk(&mut self, timeout: Duration) -> SourceEvent;
}

impl<S: CaptureSource + ?Sized> CaptureSource for &mut S {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn next_chunk(&mut self, timeout: Duration) -> SourceEvent {
        (**self).next_chunk(timeout)
    }
}

impl<S: CaptureSource + ?Sized> CaptureSource for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn next_chunk(&mut self, timeout: Duration) -> SourceEvent {
        (**self).next_chunk(timeout)
    }
}

/// In-memory source replaying a fixed list of chunks, then ending.
#[derive(Debug, Clone)]
pub struct ChunkReplay {
    sample_rate: u32,
    chunks: VecDeque<Vec<f32>>,
}

impl ChunkReplay {
    pub fn new(sample_rate: u32, chunks: impl IntoIterator<Item = Vec<f32>>) -> Self {
        Self {
            sample_rate,
            chunks: chunks.into_iter().collect(),
        }
    }

    /// Split `samples` into chunks of `chunk_len` (the last may be shorter).
    pub fn from_samples(sample_rate: u32, samples: &[f32], chunk_len: usize) -> Self {
        let chunk_len = chunk_len.max(1);
        Self::new(sample_rate, samples.chunks(chunk_len).map(<[f32]>::to_vec))
    }

    /// Chunks not yet delivered
    pub fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl CaptureSource for ChunkReplay {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_chunk(&mut self, _timeout: Duration) -> SourceEvent {
        match self.chunks.pop_front() {
            Some(chunk) => SourceEvent::Chunk(chunk),
            None => SourceEvent::Ended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_order_then_end() {
        let mut source = ChunkReplay::new(16000, vec![vec![0.1], vec![0.2, 0.3]]);
        assert_eq!(source.sample_rate(), 16000);
        assert_eq!(source.remaining(), 2);

        let timeout = Duration::from_millis(1);
        assert_eq!(source.next_chunk(timeout), SourceEvent::Chunk(vec![0.1]));
        assert_eq!(source.next_chunk(timeout), SourceEvent::Chunk(vec![0.2, 0.3]));
        assert_eq!(source.next_chunk(timeout), SourceEvent::Ended);
        assert_eq!(source.next_chunk(timeout), SourceEvent::Ended);
    }

    #[test]
    fn test_from_samples_splits() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let source = ChunkReplay::from_samples(8000, &samples, 4);
        assert_eq!(source.remaining(), 3);

        let lens: Vec<usize> = source.chunks.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![4, 4, 2]);
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn CaptureSource> =
            Box::new(ChunkReplay::new(8000, vec![vec![0.5]]));
        assert_eq!(source.sample_rate(), 8000);
        assert_eq!(
            source.next_chunk(Duration::ZERO),
            SourceEvent::Chunk(vec![0.5])
        );
    }
}

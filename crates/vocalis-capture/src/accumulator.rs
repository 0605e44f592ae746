//! Append-only accumulation of captured sample chunks.
//!
//! The capture callback hands over one chunk per audio period. Chunks are
//! stored as owned copies in arrival order and only merged once, when the
//! session stops.

/// Accumulates mono sample chunks for one recording session.
///
/// The total length is tracked incrementally so `append` stays O(chunk
/// length) no matter how long the session runs.
#[derive(Debug, Clone, Default)]
pub struct SampleAccumulator {
    chunks: Vec<Vec<f32>>,
    total_len: usize,
}

impl SampleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all chunks and zero the running length.
    ///
    /// Keeps the chunk list's allocation for the next session.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.total_len = 0;
    }

    /// Append a copy of `chunk`.
    ///
    /// Capture APIs reuse their buffer between callbacks, so the data is
    /// always copied out. Empty chunks are a no-op.
    pub fn append(&mut self, chunk: &[f32]) {
        if chunk.is_empty() {
            return;
        }
        self.chunks.push(chunk.to_vec());
        self.total_len += chunk.len();
    }

    /// Append a chunk the caller already owns, without copying.
    pub fn append_owned(&mut self, chunk: Vec<f32>) {
        if chunk.is_empty() {
            return;
        }
        self.total_len += chunk.len();
        self.chunks.push(chunk);
    }

    /// Merge all chunks into one contiguous buffer.
    ///
    /// Returns `None` when nothing was captured.
    pub fn finalize(&self) -> Option<Vec<f32>> {
        if self.chunks.is_empty() || self.total_len == 0 {
            return None;
        }

        let mut merged = vec![0.0f32; self.total_len];
        let mut offset = 0;
        for chunk in &self.chunks {
            merged[offset..offset + chunk.len()].copy_from_slice(chunk);
            offset += chunk.len();
        }
        debug_assert_eq!(offset, self.total_len);

        Some(merged)
    }

    /// Total samples appended since the last reset.
    #[inline]
    pub fn len(&self) -> usize {
        self.total_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_len == 0
    }

    /// Number of non-empty chunks held.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

//! Destinations for finished takes.
//!
//! Upload clients, storage backends and the local download folder all sit
//! behind [`TakeSink`]. A sink answers with an opaque [`SinkReply`] which a
//! scoring service fills with its results (see [`crate::ScoreReport`]).

use crate::Result;
use std::path::{Path, PathBuf};
use vocalis_export::WavTake;

/// Content type of a JSON reply.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of a plain text reply.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Reply from a sink: a content type and an undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReply {
    pub content_type: String,
    pub body: String,
}

impl SinkReply {
    pub fn new(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::new(JSON_CONTENT_TYPE, body)
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(TEXT_CONTENT_TYPE, body)
    }

    /// True when the body should be decoded as JSON.
    ///
    /// Matches on substring so parameters like `; charset=utf-8` are accepted.
    pub fn is_json(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .contains(JSON_CONTENT_TYPE)
    }
}

/// Anything that accepts finished takes.
pub trait TakeSink {
    fn deliver(&mut self, take: &WavTake) -> Result<SinkReply>;
}

impl<F> TakeSink for F
where
    F: FnMut(&WavTake) -> Result<SinkReply>,
{
    fn deliver(&mut self, take: &WavTake) -> Result<SinkReply> {
        self(take)
    }
}

/// Saves every take into a directory under its own filename.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, oldest first
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl TakeSink for DirectorySink {
    fn deliver(&mut self, take: &WavTake) -> Result<SinkReply> {
        let path = take.save_to_dir(&self.dir)?;
        tracing::debug!(path = %path.display(), bytes = take.len(), "Take saved");
        let reply = SinkReply::text(path.display().to_string());
        self.saved.push(path);
        Ok(reply)
    }
}

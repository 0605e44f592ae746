//! Recorder: drives one recording session at a time and keeps the last take.

use crate::builder::RecorderBuilder;
use crate::sink::{SinkReply, TakeSink};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use vocalis_capture::{
    CaptureSource, ChunkOutcome, RecordingSession, SessionState, SourceEvent,
};
use vocalis_export::WavTake;

/// Result of stopping a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeOutcome {
    /// Audio was captured and encoded
    Take(WavTake),
    /// The session ended without any audio
    NoAudio,
}

impl TakeOutcome {
    pub fn take(&self) -> Option<&WavTake> {
        match self {
            TakeOutcome::Take(take) => Some(take),
            TakeOutcome::NoAudio => None,
        }
    }

    pub fn into_take(self) -> Option<WavTake> {
        match self {
            TakeOutcome::Take(take) => Some(take),
            TakeOutcome::NoAudio => None,
        }
    }

    pub fn is_no_audio(&self) -> bool {
        matches!(self, TakeOutcome::NoAudio)
    }
}

/// Why a capture loop finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Requested,
    LimitReached,
    SourceEnded,
}

/// Records takes from a capture source.
///
/// # Example
///
/// ```ignore
/// use vocalis::prelude::*;
///
/// let mut recorder = Recorder::builder().build()?;
/// let stop = AtomicBool::new(false);
/// let outcome = recorder.record(&mut source, &stop)?;
/// if let Some(take) = outcome.take() {
///     take.save_to_dir("downloads")?;
/// }
/// ```
pub struct Recorder {
    session: RecordingSession,
    filename_prefix: String,
    poll_interval: Duration,
    last_take: Option<WavTake>,
}

impl Recorder {
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::default()
    }

    pub(crate) fn from_parts(
        session: RecordingSession,
        filename_prefix: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            session,
            filename_prefix,
            poll_interval,
            last_take: None,
        }
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    pub fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Begin a new session at `sample_rate`. Clears the previous take.
    pub fn start(&mut self, sample_rate: u32) -> Result<()> {
        self.last_take = None;
        self.session.prepare()?;
        if let Err(e) = self.session.begin(sample_rate) {
            self.session.abort();
            return Err(e.into());
        }
        Ok(())
    }

    /// Push one capture chunk into the running session.
    pub fn feed(&mut self, chunk: &[f32]) -> ChunkOutcome {
        self.session.push_chunk(chunk)
    }

    /// Push one owned capture chunk into the running session.
    pub fn feed_owned(&mut self, chunk: Vec<f32>) -> ChunkOutcome {
        self.session.push_owned(chunk)
    }

    /// Stop the session and encode whatever was captured.
    pub fn stop(&mut self) -> Result<TakeOutcome> {
        let Some(recording) = self.session.stop()? else {
            return Ok(TakeOutcome::NoAudio);
        };

        let take = WavTake::encode(
            recording.samples(),
            recording.sample_rate(),
            &self.filename_prefix,
        );
        tracing::info!(
            filename = take.filename(),
            bytes = take.len(),
            seconds = recording.duration_seconds(),
            "Take ready"
        );

        self.last_take = Some(take.clone());
        Ok(TakeOutcome::Take(take))
    }

    /// Discard the running session without producing a take.
    pub fn abort(&mut self) {
        self.session.abort();
    }

    /// Record from `source` until `stop` is raised, the duration limit is
    /// reached, or the source ends.
    ///
    /// `stop` is checked between polls, so a stop request takes effect
    /// within one poll interval.
    pub fn record<S>(&mut self, source: &mut S, stop: &AtomicBool) -> Result<TakeOutcome>
    where
        S: CaptureSource + ?Sized,
    {
        self.start(source.sample_rate())?;

        let reason = loop {
            if stop.load(Ordering::Acquire) {
                break StopReason::Requested;
            }
            match source.next_chunk(self.poll_interval) {
                SourceEvent::Chunk(chunk) => {
                    if self.session.push_owned(chunk) == ChunkOutcome::LimitReached {
                        break StopReason::LimitReached;
                    }
                }
                SourceEvent::Idle => {}
                SourceEvent::Ended => break StopReason::SourceEnded,
            }
        };

        tracing::debug!(
            ?reason,
            frames = self.session.captured_frames(),
            "Capture loop finished"
        );
        self.stop()
    }

    /// Record from the default microphone. See [`Recorder::record`].
    #[cfg(feature = "audio-input")]
    pub fn record_microphone(&mut self, stop: &AtomicBool) -> Result<TakeOutcome> {
        let input = vocalis_capture::AudioInput::new(self.session.config().clone())?;
        let mut stream = input.open_default()?;
        self.record(&mut stream, stop)
    }

    /// Last encoded take. Cleared when a new session starts.
    pub fn last_take(&self) -> Option<&WavTake> {
        self.last_take.as_ref()
    }

    /// Hand the last take to `sink`. Returns `None` when there is no take.
    pub fn deliver<K>(&self, sink: &mut K) -> Result<Option<SinkReply>>
    where
        K: TakeSink + ?Sized,
    {
        let Some(take) = &self.last_take else {
            return Ok(None);
        };
        let reply = sink.deliver(take)?;
        tracing::debug!(
            filename = take.filename(),
            content_type = %reply.content_type,
            "Take delivered"
        );
        Ok(Some(reply))
    }

    /// Save the last take into `dir`. Returns `None` when there is no take.
    pub fn save_last_take(&self, dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        match &self.last_take {
            Some(take) => Ok(Some(take.save_to_dir(dir)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocalis_capture::ChunkReplay;

    fn create_recorder() -> Recorder {
        Recorder::builder()
            .max_duration(Duration::from_secs(1))
            .poll_interval(Duration::from_millis(1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_manual_feed() {
        let mut recorder = create_recorder();
        recorder.start(8000).unwrap();
        assert!(recorder.is_recording());

        assert_eq!(recorder.feed(&[0.5; 100]), ChunkOutcome::Accepted);
        assert_eq!(recorder.feed_owned(vec![-0.5; 100]), ChunkOutcome::Accepted);

        let outcome = recorder.stop().unwrap();
        let take = outcome.take().unwrap();
        assert_eq!(take.len(), 44 + 2 * 200);
        assert!(take.filename().starts_with("accent-test-"));
        assert_eq!(recorder.last_take(), Some(take));
        assert_eq!(recorder.state(), SessionState::Stopped);
    }

    #[test]
    fn test_no_audio() {
        let mut recorder = create_recorder();
        recorder.start(8000).unwrap();
        let outcome = recorder.stop().unwrap();
        assert!(outcome.is_no_audio());
        assert_eq!(recorder.last_take(), None);
    }

    #[test]
    fn test_start_clears_last_take() {
        let mut recorder = create_recorder();
        recorder.start(8000).unwrap();
        recorder.feed(&[0.1; 10]);
        recorder.stop().unwrap();
        assert!(recorder.last_take().is_some());

        recorder.start(8000).unwrap();
        assert!(recorder.last_take().is_none());
    }

    #[test]
    fn test_start_bad_rate_leaves_recorder_usable() {
        let mut recorder = create_recorder();
        assert!(recorder.start(0).is_err());
        assert_eq!(recorder.state(), SessionState::Idle);
        recorder.start(16000).unwrap();
    }

    #[test]
    fn test_record_until_source_ends() {
        let mut recorder = create_recorder();
        let mut source = ChunkReplay::from_samples(8000, &[0.25; 1000], 256);
        let stop = AtomicBool::new(false);

        let take = recorder
            .record(&mut source, &stop)
            .unwrap()
            .into_take()
            .unwrap();
        assert_eq!(take.header().unwrap().sample_count(), 1000);
        assert_eq!(take.header().unwrap().sample_rate, 8000);
    }

    #[test]
    fn test_record_stops_at_limit() {
        // 1 s at 8 kHz; the chunk that crosses the limit is kept whole
        let mut recorder = create_recorder();
        let mut source = ChunkReplay::from_samples(8000, &vec![0.0; 20_000], 3000);
        let stop = AtomicBool::new(false);

        let take = recorder
            .record(&mut source, &stop)
            .unwrap()
            .into_take()
            .unwrap();
        assert_eq!(take.header().unwrap().sample_count(), 9000);
        assert_eq!(source.remaining(), 4);
    }

    #[test]
    fn test_record_stop_requested() {
        let mut recorder = create_recorder();
        let mut source = ChunkReplay::from_samples(8000, &[0.5; 100], 10);
        let stop = AtomicBool::new(true);

        let outcome = recorder.record(&mut source, &stop).unwrap();
        assert!(outcome.is_no_audio());
        assert_eq!(source.remaining(), 10);
    }

    #[test]
    fn test_abort() {
        let mut recorder = create_recorder();
        recorder.start(8000).unwrap();
        recorder.feed(&[0.3; 50]);
        recorder.abort();

        assert_eq!(recorder.state(), SessionState::Idle);
        assert!(recorder.stop().is_err());
        assert!(recorder.last_take().is_none());
    }

    #[test]
    fn test_deliver_without_take() {
        let recorder = create_recorder();
        let mut sink = |_: &WavTake| -> Result<SinkReply> { Ok(SinkReply::text("ok")) };
        assert_eq!(recorder.deliver(&mut sink).unwrap(), None);
    }

    #[test]
    fn test_deliver_and_save() {
        let mut recorder = create_recorder();
        recorder.start(8000).unwrap();
        recorder.feed(&[0.1; 8]);
        recorder.stop().unwrap();

        let mut delivered = Vec::new();
        let mut sink = |take: &WavTake| -> Result<SinkReply> {
            delivered.push(take.filename().to_string());
            Ok(SinkReply::json(r#"{"overallScore": 80}"#))
        };
        let reply = recorder.deliver(&mut sink).unwrap().unwrap();
        assert!(reply.is_json());
        assert_eq!(delivered.len(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = recorder.save_last_take(dir.path()).unwrap().unwrap();
        assert!(path.exists());
    }
}

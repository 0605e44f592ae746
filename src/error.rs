//! Centralized error type for the vocalis umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Capture(#[from] vocalis_capture::Error),

    #[error("Export: {0}")]
    Export(#[from] vocalis_export::ExportError),

    /// A take collaborator (upload, storage) refused the take.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Malformed score reply: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message suitable for showing to the person recording.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::Capture(e) => e.user_message(),
            Error::Delivery(_) | Error::Json(_) => {
                "We couldn't upload your recording. Please try again."
            }
            Error::Export(_) | Error::Io(_) => "We couldn't save your recording. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

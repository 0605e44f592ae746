//! Error types.

use thiserror::Error;

use crate::session::SessionState;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid recording configuration.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the session's current state.
    #[error("Cannot {action} while session is {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    /// Recording error.
    #[error("Recording error: {0}")]
    Recording(String),

    /// Audio input error.
    #[error("Audio input error: {0}")]
    AudioInput(String),

    /// Microphone access was refused by the host.
    #[error("Microphone permission denied: {0}")]
    PermissionDenied(String),

    /// Device not found.
    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    /// Device is held by another application.
    #[error("Audio device busy: {0}")]
    DeviceBusy(String),

    /// Failed to enumerate devices.
    #[cfg(feature = "audio-input")]
    #[error("Failed to enumerate audio devices")]
    DevicesError(#[from] cpal::DevicesError),

    /// Failed to get device config.
    #[cfg(feature = "audio-input")]
    #[error("Failed to get audio device config")]
    DeviceConfigError(#[from] cpal::DefaultStreamConfigError),

    /// Failed to play stream.
    #[cfg(feature = "audio-input")]
    #[error("Failed to play audio stream")]
    PlayStreamError(#[from] cpal::PlayStreamError),
}

impl Error {
    /// Message suitable for showing to the person trying to record.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::PermissionDenied(_) => {
                "Microphone access is required to record audio. Please allow access and try again."
            }
            Error::DeviceNotFound(_) => {
                "We couldn't find a microphone. Please connect one and try again."
            }
            Error::DeviceBusy(_) => {
                "Another application is using the microphone. Close it and try recording again."
            }
            #[cfg(feature = "audio-input")]
            Error::DeviceConfigError(_) | Error::DevicesError(_) => {
                "We couldn't find a microphone. Please connect one and try again."
            }
            _ => "We couldn't start the recording. Please check your connection and try again.",
        }
    }
}

#[cfg(feature = "audio-input")]
impl From<cpal::BuildStreamError> for Error {
    fn from(e: cpal::BuildStreamError) -> Self {
        match e {
            cpal::BuildStreamError::DeviceNotAvailable => {
                Error::DeviceNotFound("device no longer available".to_string())
            }
            cpal::BuildStreamError::BackendSpecific { err } => {
                let description = err.description.to_lowercase();
                if description.contains("permission") || description.contains("denied") {
                    Error::PermissionDenied(err.description)
                } else if description.contains("busy") {
                    Error::DeviceBusy(err.description)
                } else {
                    Error::AudioInput(format!("failed to build input stream: {}", err))
                }
            }
            other => Error::AudioInput(format!("failed to build input stream: {}", other)),
        }
    }
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert!(Error::PermissionDenied("denied".into())
            .user_message()
            .starts_with("Microphone access is required"));
        assert!(Error::DeviceNotFound("none".into())
            .user_message()
            .contains("couldn't find a microphone"));
        assert!(Error::DeviceBusy("busy".into())
            .user_message()
            .contains("Another application"));
        assert!(Error::Recording("x".into())
            .user_message()
            .starts_with("We couldn't start the recording"));
    }

    #[test]
    fn test_invalid_state_display() {
        let err = Error::InvalidState {
            action: "stop",
            state: SessionState::Idle,
        };
        assert_eq!(err.to_string(), "Cannot stop while session is Idle");
    }
}

//! # Playback Error Types
//!
//! Errors returned by controller and adapter operations.
//!
//! Backend-reported playback failures are not errors of the calling
//! operation: they travel as [`PlayerEvent::Error`](core_runtime::events::PlayerEvent)
//! to `on_error`. This enum covers what the caller did wrong or what prevented
//! a player from being built at all.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The backend instance could not be created or subscribed.
    #[error("Failed to construct {backend} player: {reason}")]
    Construction { backend: String, reason: String },

    /// Operation on a controller that has been unmounted.
    #[error("Player is not mounted")]
    NotMounted,

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f64),

    /// Time must be a finite, non-negative number of seconds.
    #[error("Invalid time: {0} (must be finite and >= 0)")]
    InvalidTime(f64),

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),

    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    pub fn construction(backend: impl ToString, reason: impl ToString) -> Self {
        PlaybackError::Construction {
            backend: backend.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` if the error was caused by an invalid argument.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidVolume(_)
                | PlaybackError::InvalidTime(_)
                | PlaybackError::InvalidAspectRatio(_)
                | PlaybackError::InvalidConfig(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

pub(crate) fn validate_volume(volume: f64) -> Result<f64> {
    if volume.is_finite() && (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(PlaybackError::InvalidVolume(volume))
    }
}

pub(crate) fn validate_time(time: f64) -> Result<f64> {
    if time.is_finite() && time >= 0.0 {
        Ok(time)
    } else {
        Err(PlaybackError::InvalidTime(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        assert_eq!(validate_volume(0.0), Ok(0.0));
        assert_eq!(validate_volume(1.0), Ok(1.0));
        assert!(matches!(
            validate_volume(1.5),
            Err(PlaybackError::InvalidVolume(v)) if v == 1.5
        ));
        assert!(validate_volume(f64::NAN).is_err());

        assert_eq!(validate_time(30.0), Ok(30.0));
        assert!(validate_time(-1.0).is_err());
        assert!(validate_time(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_classification() {
        assert!(PlaybackError::InvalidVolume(2.0).is_validation_error());
        assert!(!PlaybackError::NotMounted.is_validation_error());

        let err = PlaybackError::construction("embed-api", "no surface");
        assert_eq!(
            err.to_string(),
            "Failed to construct embed-api player: no surface"
        );
    }

    #[test]
    fn test_bridge_error_conversion() {
        let err: PlaybackError = BridgeError::OperationFailed("media".into()).into();
        assert!(matches!(err, PlaybackError::Bridge(_)));
    }
}

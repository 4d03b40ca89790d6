//! # Player Error Types
//!
//! Error types for playback control operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while controlling playback.
#[derive(Error, Debug)]
pub enum PlayerError {
    // ========================================================================
    // Load Errors
    // ========================================================================
    /// File extension does not map to a supported audio format.
    #[error("Unsupported audio format: {0:?}")]
    UnsupportedFormat(String),

    /// Decoder or device initialization failed while setting a source.
    #[error("Cannot set {} ready for playback", .path.display())]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: Box<PlayerError>,
    },

    /// A new source was set while a track was still active or draining.
    #[error("The player is not stopped; a new source can only be set while the player is stopped")]
    NotStopped,

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Attempted operation when no source is loaded.
    #[error("No source is set to play")]
    NoSourceLoaded,

    /// A call into the output device faulted.
    #[error("Cannot {operation} playback of the set source")]
    DeviceOperationFailed {
        operation: &'static str,
        #[source]
        source: Box<PlayerError>,
    },

    // ========================================================================
    // Collaborator Faults
    // ========================================================================
    /// Decoder-level fault reported by a `DecoderFactory` or `SourceDecoder`.
    #[error("Decoder error: {0}")]
    Decoder(String),

    /// Device-level fault reported by an `OutputDevice` implementation.
    #[error("Audio device error: {0}")]
    Device(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Configuration was rejected by validation.
    #[error("Invalid player configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlayerError {
    /// Returns `true` if this error is about the source's audio format.
    pub fn is_format_error(&self) -> bool {
        matches!(self, PlayerError::UnsupportedFormat(_))
    }

    /// Returns `true` if this error originates from the output device.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            PlayerError::Device(_) | PlayerError::DeviceOperationFailed { .. }
        )
    }

    /// Returns `true` if the operation was rejected because of the player's
    /// current lifecycle state rather than a collaborator fault.
    pub fn is_state_error(&self) -> bool {
        matches!(self, PlayerError::NotStopped | PlayerError::NoSourceLoaded)
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

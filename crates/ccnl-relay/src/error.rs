// ============================================
// File: crates/ccnl-relay/src/error.rs
// ============================================
//! # Relay Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use ccnl_common::error::CommonError;
use ccnl_common::FaceId;
use ccnl_core::error::CoreError;
use ccnl_transport::error::TransportError;

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Relay error types.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad {
        /// Path that was read
        path: String,
        /// Read or parse failure
        reason: String,
    },

    /// Configuration parsed but failed validation.
    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        /// Offending key
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// No crypto face is configured, or it was removed.
    #[error("Crypto face is not available")]
    CryptoFaceUnavailable,

    /// No face with this id.
    #[error("Face not found: {0}")]
    FaceNotFound(FaceId),

    /// The face's outbound queue is at capacity.
    #[error("Face {face_id} queue full ({capacity} packets)")]
    FaceQueueFull {
        /// Face that refused the packet
        face_id: FaceId,
        /// Queue capacity in packets
        capacity: usize,
    },

    /// The relay could not bind its socket.
    #[error("Relay failed to start: {reason}")]
    StartupFailed {
        /// Failure description
        reason: String,
    },

    /// Shared error.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// Codec error from a crypto message.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Socket error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Filesystem or signal error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `StartupFailed` error.
    pub fn startup_failed(reason: impl Into<String>) -> Self {
        Self::StartupFailed {
            reason: reason.into(),
        }
    }

    /// Returns `true` for load or validation failures of the config file.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigLoad { .. } | Self::ConfigInvalid { .. })
    }

    /// Returns `true` if the error came from malformed crypto input.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_protocol_error())
    }

    /// Returns `true` if the same operation may succeed later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::FaceQueueFull { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelayError::config_load("/etc/ccnl/relay.toml", "file not found");
        assert!(err.to_string().contains("/etc/ccnl/relay.toml"));

        let err = RelayError::FaceNotFound(FaceId::new(9));
        assert_eq!(err.to_string(), "Face not found: 9");
    }

    #[test]
    fn test_error_classification() {
        let config_err = RelayError::config_invalid("crypto.callback", "cannot be empty");
        assert!(config_err.is_config_error());
        assert!(!config_err.is_decode_error());

        let decode: RelayError = CoreError::malformed("bad").into();
        assert!(decode.is_decode_error());

        // An encoder misuse is a local bug, not bad input
        let unclosed: RelayError = CoreError::UnclosedRecord { depth: 1 }.into();
        assert!(!unclosed.is_decode_error());

        assert!(!RelayError::CryptoFaceUnavailable.is_retryable());
        assert!(RelayError::FaceQueueFull { face_id: FaceId::new(1), capacity: 4 }.is_retryable());
    }
}

// ============================================
// File: crates/ccnl-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines error types for the ccnb codec and the crypto-face message
//! builders and parsers in the core crate.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//!
//! ## Error Categories
//! 1. **Decode Errors**: Truncation, unexpected tags, bad headers, overflow
//! 2. **Message Errors**: Wrong shape, unknown operation, bad correlation
//! 3. **Encode Errors**: Unbalanced records
//!
//! ## ⚠️ Important Note for Next Developer
//! - Every parser in this crate fails closed; do not add "best effort" paths
//! - Never include payload bytes in error messages, only lengths and tags
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use ccnl_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for codec and message operations.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Decode Errors
    // ========================================

    /// Input ended before the element was complete.
    #[error("Truncated input: needed {needed} more bytes at offset {offset}")]
    Truncated {
        /// Offset into the buffer where reading stopped
        offset: usize,
        /// Bytes still required
        needed: usize,
    },

    /// A header did not match the expected tag.
    #[error("Unexpected tag at offset {offset}: expected {expected}, found {found}")]
    UnexpectedTag {
        /// Offset of the offending header
        offset: usize,
        /// What the parser wanted
        expected: String,
        /// What was actually present
        found: String,
    },

    /// Header carried the reserved kind value.
    #[error("Invalid tag type {kind} at offset {offset}")]
    InvalidTagType {
        /// Offset of the offending header
        offset: usize,
        /// The raw kind bits
        kind: u8,
    },

    /// Header number does not fit in 64 bits.
    #[error("Header too long at offset {offset}")]
    HeaderTooLong {
        /// Offset where the header started
        offset: usize,
    },

    /// A bounded field exceeded its limit.
    #[error("Field '{field}' too long: max {max} bytes, got {actual}")]
    FieldTooLong {
        /// Which field overflowed
        field: String,
        /// Configured maximum
        max: usize,
        /// Actual length observed
        actual: usize,
    },

    // ========================================
    // Message Errors
    // ========================================

    /// Message is structurally wrong.
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },

    /// Type field named an operation we do not know.
    #[error("Unknown crypto operation: '{0}'")]
    UnknownOperation(String),

    /// Seqno text was not a valid correlation value.
    #[error("Invalid correlation value: '{0}'")]
    InvalidCorrelation(String),

    /// Declared signature length disagrees with the signature blob.
    #[error("Signature length mismatch: declared {declared}, present {actual}")]
    SignatureLengthMismatch {
        /// Length from SignedInfo
        declared: usize,
        /// Length of the Signature blob
        actual: usize,
    },

    /// Required field is absent.
    #[error("Missing required data: {field}")]
    MissingData {
        /// What data is missing
        field: String,
    },

    // ========================================
    // Encode Errors
    // ========================================

    /// Writer finished with records still open.
    #[error("Unclosed record: {depth} still open")]
    UnclosedRecord {
        /// Number of records left open
        depth: usize,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `Truncated` error.
    #[must_use]
    pub const fn truncated(offset: usize, needed: usize) -> Self {
        Self::Truncated { offset, needed }
    }

    /// Creates an `UnexpectedTag` error.
    pub fn unexpected_tag(
        offset: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedTag {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a `FieldTooLong` error.
    pub fn field_too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        Self::FieldTooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }

    /// Creates a `MissingData` error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a protocol error.
    ///
    /// Protocol errors indicate malformed or hostile input, never a local bug.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        match self {
            Self::UnclosedRecord { .. } => false,
            Self::Common(e) => e.is_input_error(),
            _ => true,
        }
    }

    /// Returns `true` if the input simply ran out.
    #[must_use]
    pub const fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::truncated(12, 3);
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains('3'));

        let err = CoreError::field_too_long("type", 100, 140);
        assert!(err.to_string().contains("type"));
        assert!(err.to_string().contains("140"));
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::truncated(0, 1).is_truncation());
        assert!(CoreError::truncated(0, 1).is_protocol_error());
        assert!(CoreError::UnknownOperation("encrypt".into()).is_protocol_error());
        assert!(!CoreError::UnclosedRecord { depth: 1 }.is_protocol_error());
        assert!(!CoreError::malformed("x").is_truncation());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_input("field", "bad value");
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
        assert!(core.is_protocol_error());
    }
}

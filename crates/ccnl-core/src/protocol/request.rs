// ============================================
// File: crates/ccnl-core/src/protocol/request.rs
// ============================================
//! # Crypto Request Builder
//!
//! ## Creation Reason
//! Builds the sign and verify requests the relay sends to the crypto
//! service, and parses them back on the service side.
//!
//! ## Main Functionality
//! - `build_sign_request` / `build_verify_request`: Encode a request
//! - `parse_request`: Decode a request into a `CryptoRequest`
//! - `encode_envelope`: Shared outer layout for requests and replies
//!
//! ## Wire Layout
//! ```text
//! Interest
//! └─ Name
//!    ├─ Component "ccnx"
//!    ├─ Component "crypto"
//!    ├─ Callback  <callback>
//!    └─ Component (blob)
//!       └─ ContentObj
//!          ├─ Type    "sign" | "verify"
//!          └─ Content (blob)
//!             ├─ Seqno         <decimal correlation>
//!             ├─ Signature     <raw>          (verify only)
//!             └─ ContentDigest <raw payload>
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Each build call owns its buffer; nothing here is shared between calls
//! - The correlation is written as signed decimal text, not binary
//!
//! ## Last Modified
//! v0.1.0 - Initial request builder

use bytes::Bytes;
use tracing::trace;

use ccnl_common::types::Correlation;

use crate::error::{CoreError, Result};
use crate::protocol::dtag::{self, Operation, CRYPTO_PREFIX, MAX_LABEL_LEN};
use crate::protocol::reply::{extract_operation_and_callback, extract_embedded_message};
use crate::protocol::tlv::TlvWriter;

// ============================================
// CryptoRequest
// ============================================

/// Decoded crypto request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoRequest {
    /// Requested operation
    pub operation: Operation,
    /// Callback the reply must name
    pub callback: String,
    /// Correlation value to echo back
    pub correlation: Correlation,
    /// Content to sign, or command to verify
    pub content: Bytes,
    /// Signature to check (verify only)
    pub signature: Option<Bytes>,
}

// ============================================
// Builders
// ============================================

/// Builds a sign request.
///
/// # Errors
/// Returns `FieldTooLong` if the callback exceeds [`MAX_LABEL_LEN`].
///
/// # Example
/// ```
/// use ccnl_common::types::{Correlation, FaceId};
/// use ccnl_core::protocol::request::{build_sign_request, parse_request};
///
/// let msg = build_sign_request(
///     Correlation::ForFace(FaceId::new(3)),
///     b"hello",
///     "ccnl_mgmt_crypto",
/// ).unwrap();
///
/// let req = parse_request(&msg).unwrap();
/// assert_eq!(&req.content[..], b"hello");
/// ```
pub fn build_sign_request(
    correlation: Correlation,
    content: &[u8],
    callback: &str,
) -> Result<Bytes> {
    build_request(Operation::Sign, correlation, content, None, callback)
}

/// Builds a verify request.
///
/// # Errors
/// Returns `FieldTooLong` if the callback exceeds [`MAX_LABEL_LEN`].
pub fn build_verify_request(
    correlation: Correlation,
    content: &[u8],
    signature: &[u8],
    callback: &str,
) -> Result<Bytes> {
    build_request(Operation::Verify, correlation, content, Some(signature), callback)
}

fn build_request(
    operation: Operation,
    correlation: Correlation,
    content: &[u8],
    signature: Option<&[u8]>,
    callback: &str,
) -> Result<Bytes> {
    let mut section = TlvWriter::with_capacity(content.len() + 64);
    section.text(dtag::SEQNO, &correlation.to_string());
    if let Some(sig) = signature {
        section.blob(dtag::SIGNATURE, sig);
    }
    section.blob(dtag::CONTENT_DIGEST, content);
    let section = section.finish()?;

    let msg = encode_envelope(dtag::INTEREST, operation, callback, &section)?;
    trace!(
        operation = %operation,
        correlation = %correlation,
        len = msg.len(),
        "Built crypto request"
    );
    Ok(msg)
}

/// Wraps an encoded section in the crypto envelope.
///
/// `outer` is [`dtag::INTEREST`] for requests and [`dtag::CONTENT_OBJ`] for
/// replies; everything below it is identical in both directions.
///
/// # Errors
/// Returns `FieldTooLong` if the callback exceeds [`MAX_LABEL_LEN`].
pub fn encode_envelope(
    outer: u64,
    operation: Operation,
    callback: &str,
    section: &[u8],
) -> Result<Bytes> {
    if callback.len() > MAX_LABEL_LEN {
        return Err(CoreError::field_too_long(
            "Callback",
            MAX_LABEL_LEN,
            callback.len(),
        ));
    }

    let mut inner = TlvWriter::with_capacity(section.len() + 16);
    inner
        .open(dtag::CONTENT_OBJ)
        .text(dtag::TYPE, operation.as_str())
        .blob(dtag::CONTENT, section);
    inner.close()?;
    let inner = inner.finish()?;

    let mut w = TlvWriter::with_capacity(inner.len() + callback.len() + 32);
    w.open(outer).open(dtag::NAME);
    for component in CRYPTO_PREFIX {
        w.text(dtag::COMPONENT, component);
    }
    w.text(dtag::CALLBACK, callback)
        .blob(dtag::COMPONENT, &inner);
    w.close()?.close()?;
    w.finish()
}

// ============================================
// Parser
// ============================================

/// Parses a request produced by [`build_sign_request`] or
/// [`build_verify_request`].
///
/// # Errors
/// Fails on any shape mismatch, truncation or bad correlation text.
pub fn parse_request(msg: &[u8]) -> Result<CryptoRequest> {
    let mut envelope = extract_operation_and_callback(msg)?;
    if !envelope.is_request() {
        return Err(CoreError::malformed("expected an Interest envelope"));
    }

    let correlation = envelope.read_correlation()?;
    let signature = match envelope.operation() {
        Operation::Verify => Some(Bytes::copy_from_slice(
            envelope.section_mut().blob_field(dtag::SIGNATURE)?,
        )),
        Operation::Sign => None,
    };
    let content = Bytes::copy_from_slice(extract_embedded_message(&mut envelope)?);

    Ok(CryptoRequest {
        operation: envelope.operation(),
        callback: envelope.callback().to_string(),
        correlation,
        content,
        signature,
    })
}

// ============================================
// Tests
// ============================================

// ============================================
// File: crates/ccnl-core/src/protocol/reply.rs
// ============================================
//! # Crypto Reply Parser
//!
//! ## Creation Reason
//! Decodes what the crypto service sends back, so the relay can find the
//! handler, the correlation value and the embedded original message.
//!
//! ## Main Functionality
//! - `extract_operation_and_callback`: Validate the envelope, open the section
//! - `extract_sign_reply`: Correlation and signature bytes
//! - `extract_verify_reply`: Correlation and verified flag
//! - `extract_embedded_message`: The original content / command
//! - `build_sign_reply` / `build_verify_reply`: Service-side encoders
//!
//! ## Section Layouts
//! ```text
//! sign:    Seqno  SignedInfo(<sig len>)  Signature(<raw>)  Content(<original>)
//! verify:  Seqno  Verified("0"|"1")                        Content(<original>)
//! ```
//!
//! ## Parsing Strategy
//! 1. Walk the full envelope once, checking declared lengths and every
//!    trailing end marker, so a truncated message fails before any field
//!    is trusted
//! 2. Hand back a `CryptoEnvelope` whose section reader is consumed in
//!    wire order by the `extract_*` steps
//!
//! ## ⚠️ Important Note for Next Developer
//! - `extract_sign_reply` / `extract_verify_reply` must come before
//!   `extract_embedded_message` when both are wanted; the message step
//!   skips whatever leading fields are still unread
//! - The literal "ccnx"/"crypto" components are read but not compared
//!
//! ## Last Modified
//! v0.1.0 - Initial reply parser

use bytes::Bytes;
use tracing::{debug, trace};

use ccnl_common::types::Correlation;

use crate::error::{CoreError, Result};
use crate::protocol::dtag::{self, Operation, MAX_LABEL_LEN, MAX_PACKET_SIZE};
use crate::protocol::request::encode_envelope;
use crate::protocol::tlv::{Token, TlvReader, TlvWriter};

// ============================================
// CryptoEnvelope
// ============================================

/// A validated crypto envelope with its section still unread.
#[derive(Debug, Clone)]
pub struct CryptoEnvelope<'a> {
    outer: u64,
    operation: Operation,
    callback: &'a str,
    section: TlvReader<'a>,
}

impl<'a> CryptoEnvelope<'a> {
    /// Operation named in the `Type` field.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Callback label.
    #[must_use]
    pub const fn callback(&self) -> &'a str {
        self.callback
    }

    /// Returns `true` for an `Interest` envelope (relay → service).
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.outer == dtag::INTEREST
    }

    /// Reader over the unread part of the section.
    pub fn section_mut(&mut self) -> &mut TlvReader<'a> {
        &mut self.section
    }

    /// Reads the `Seqno` field as a correlation value.
    ///
    /// # Errors
    /// Returns `InvalidCorrelation` if the text is not an in-range decimal.
    pub fn read_correlation(&mut self) -> Result<Correlation> {
        let text = self.section.text_field(dtag::SEQNO, MAX_LABEL_LEN)?;
        text.parse::<Correlation>()
            .map_err(|_| CoreError::InvalidCorrelation(text.to_string()))
    }
}

// ============================================
// Envelope Walker
// ============================================

/// Validates the envelope and opens its section.
///
/// Accepts a `ContentObj` outer record (replies) or an `Interest` outer
/// record (requests).
///
/// # Errors
/// Fails on any shape mismatch, truncation or trailing garbage.
pub fn extract_operation_and_callback(msg: &[u8]) -> Result<CryptoEnvelope<'_>> {
    let mut r = TlvReader::new(msg);

    let outer = match r.read_tag()? {
        token @ Token::Header { num, .. }
            if token.is_dtag(dtag::CONTENT_OBJ) || token.is_dtag(dtag::INTEREST) =>
        {
            num
        }
        other => {
            return Err(CoreError::unexpected_tag(
                0,
                "DTAG ContentObj or Interest",
                other.to_string(),
            ));
        }
    };

    r.expect_dtag(dtag::NAME)?;
    let first = r.text_field(dtag::COMPONENT, MAX_LABEL_LEN)?;
    let second = r.text_field(dtag::COMPONENT, MAX_LABEL_LEN)?;
    trace!(first, second, "Crypto envelope prefix");
    let callback = r.text_field(dtag::CALLBACK, MAX_LABEL_LEN)?;

    r.expect_dtag(dtag::COMPONENT)?;
    let len = r.expect_blob_header()?;
    let inner = r.take(len)?;
    // Component, Name, outer record
    for _ in 0..3 {
        r.expect_end()?;
    }
    ensure_exhausted(&r, "envelope")?;

    let mut ir = TlvReader::new(inner);
    ir.expect_dtag(dtag::CONTENT_OBJ)?;
    let operation: Operation = ir.text_field(dtag::TYPE, MAX_LABEL_LEN)?.parse()?;
    ir.expect_dtag(dtag::CONTENT)?;
    let len = ir.expect_blob_header()?;
    let section = ir.take(len)?;
    // Content, ContentObj
    ir.expect_end()?;
    ir.expect_end()?;
    ensure_exhausted(&ir, "embedded record")?;

    debug!(callback, operation = %operation, "Parsed crypto envelope");

    Ok(CryptoEnvelope {
        outer,
        operation,
        callback,
        section: TlvReader::new(section),
    })
}

/// Fields that may precede the embedded payload in a section.
const LEADING_FIELDS: [u64; 4] = [
    dtag::SEQNO,
    dtag::SIGNATURE,
    dtag::SIGNED_INFO,
    dtag::VERIFIED,
];

/// Locates the trailing payload element and requires the section to be done.
///
/// The element is `Content` in replies and `ContentDigest` in requests.
/// Leading fields not yet consumed by a reply step are skipped, so this
/// works straight after [`extract_operation_and_callback`] as well as after
/// [`extract_sign_reply`] / [`extract_verify_reply`].
///
/// # Errors
/// Fails if the element is missing, a skipped field is malformed, or
/// anything follows the element.
pub fn extract_embedded_message<'a>(envelope: &mut CryptoEnvelope<'a>) -> Result<&'a [u8]> {
    let tag = if envelope.is_request() {
        dtag::CONTENT_DIGEST
    } else {
        dtag::CONTENT
    };

    let r = &mut envelope.section;
    loop {
        let token = r.peek_tag()?;
        let Some(&field) = LEADING_FIELDS.iter().find(|&&f| token.is_dtag(f)) else {
            break;
        };
        r.blob_field(field)?;
        trace!(field = %dtag::describe(field), "Skipped leading field");
    }

    let msg = r.blob_field(tag)?;
    ensure_exhausted(r, "section")?;
    Ok(msg)
}

// ============================================
// Section Steps
// ============================================

/// Reads a sign reply: correlation and signature.
///
/// # Errors
/// - `InvalidCorrelation` for a bad `Seqno`
/// - `FieldTooLong` if the declared length exceeds [`MAX_PACKET_SIZE`]
/// - `SignatureLengthMismatch` if `SignedInfo` and the blob disagree
pub fn extract_sign_reply(envelope: &mut CryptoEnvelope<'_>) -> Result<(Correlation, Bytes)> {
    if envelope.operation != Operation::Sign {
        return Err(CoreError::malformed("not a sign reply"));
    }
    let correlation = envelope.read_correlation()?;

    let r = &mut envelope.section;
    let text = r.text_field(dtag::SIGNED_INFO, MAX_LABEL_LEN)?;
    let declared = parse_length(text)?;
    if declared > MAX_PACKET_SIZE {
        return Err(CoreError::field_too_long(
            "SignedInfo",
            MAX_PACKET_SIZE,
            declared,
        ));
    }

    r.expect_dtag(dtag::SIGNATURE)?;
    let actual = r.expect_blob_header()?;
    if actual != declared {
        return Err(CoreError::SignatureLengthMismatch { declared, actual });
    }
    let signature = Bytes::copy_from_slice(r.take(actual)?);
    r.expect_end()?;

    trace!(correlation = %correlation, sig_len = actual, "Read sign reply");
    Ok((correlation, signature))
}

/// Reads a verify reply: correlation and verified flag.
///
/// # Errors
/// - `InvalidCorrelation` for a bad `Seqno`
/// - `MissingData` if no `Verified` field follows
/// - `MalformedMessage` if the flag is anything but `"0"` or `"1"`
pub fn extract_verify_reply(envelope: &mut CryptoEnvelope<'_>) -> Result<(Correlation, bool)> {
    if envelope.operation != Operation::Verify {
        return Err(CoreError::malformed("not a verify reply"));
    }
    let correlation = envelope.read_correlation()?;

    let r = &mut envelope.section;
    if r.is_empty() || !r.peek_tag()?.is_dtag(dtag::VERIFIED) {
        return Err(CoreError::missing("Verified"));
    }
    let verified = match r.text_field(dtag::VERIFIED, MAX_LABEL_LEN)? {
        "1" => true,
        "0" => false,
        other => {
            return Err(CoreError::malformed(format!(
                "verified flag must be \"0\" or \"1\", got {other:?}"
            )));
        }
    };

    trace!(correlation = %correlation, verified, "Read verify reply");
    Ok((correlation, verified))
}

// ============================================
// Service-side Builders
// ============================================

/// Builds a sign reply.
///
/// # Errors
/// Returns `FieldTooLong` for an oversized callback or signature.
pub fn build_sign_reply(
    callback: &str,
    correlation: Correlation,
    signature: &[u8],
    content: &[u8],
) -> Result<Bytes> {
    if signature.len() > MAX_PACKET_SIZE {
        return Err(CoreError::field_too_long(
            "Signature",
            MAX_PACKET_SIZE,
            signature.len(),
        ));
    }
    let mut section = TlvWriter::with_capacity(signature.len() + content.len() + 32);
    section
        .text(dtag::SEQNO, &correlation.to_string())
        .text(dtag::SIGNED_INFO, &signature.len().to_string())
        .blob(dtag::SIGNATURE, signature)
        .blob(dtag::CONTENT, content);
    let section = section.finish()?;
    encode_envelope(dtag::CONTENT_OBJ, Operation::Sign, callback, &section)
}

/// Builds a verify reply.
///
/// # Errors
/// Returns `FieldTooLong` for an oversized callback.
pub fn build_verify_reply(
    callback: &str,
    correlation: Correlation,
    verified: bool,
    command: &[u8],
) -> Result<Bytes> {
    let mut section = TlvWriter::with_capacity(command.len() + 32);
    section
        .text(dtag::SEQNO, &correlation.to_string())
        .text(dtag::VERIFIED, if verified { "1" } else { "0" })
        .blob(dtag::CONTENT, command);
    let section = section.finish()?;
    encode_envelope(dtag::CONTENT_OBJ, Operation::Verify, callback, &section)
}

// ============================================
// Helpers
// ============================================

fn ensure_exhausted(r: &TlvReader<'_>, what: &str) -> Result<()> {
    if r.is_empty() {
        Ok(())
    } else {
        Err(CoreError::malformed(format!(
            "{} trailing bytes after {what}",
            r.remaining()
        )))
    }
}

fn parse_length(text: &str) -> Result<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::malformed(format!(
            "signature length {text:?} is not a decimal number"
        )));
    }
    text.parse()
        .map_err(|_| CoreError::field_too_long("SignedInfo", MAX_PACKET_SIZE, usize::MAX))
}

// ============================================
// Tests
// ============================================

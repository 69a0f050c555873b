// ============================================
// File: crates/ccnl-core/src/protocol/tlv.rs
// ============================================
//! # ccnb TLV Codec
//!
//! ## Creation Reason
//! The crypto face speaks the relay's native ccnb encoding. This module is
//! the only place that knows how headers, blobs and end markers look on the
//! wire; everything above it works with typed steps.
//!
//! ## Main Functionality
//! - Header encoding/decoding (`write_header`, `TlvReader::read_tag`)
//! - `TlvWriter`: Depth-tracked record builder over `BytesMut`
//! - `TlvReader`: Bounded cursor with typed `expect_*` steps
//! - `Node`: Generic element tree for structure walking
//!
//! ## Wire Format
//! ```text
//! header  := group* last
//! group   := 0b0xxxxxxx               (7 bits of num >> 4, MSB first)
//! last    := 0b1nnnnkkk               (low 4 bits of num, 3-bit kind)
//! end     := 0x00
//!
//! record  := DTAG(num) child* end
//! field   := DTAG(num) BLOB(len) bytes end
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - A header can never start with 0x00; that byte is always the end marker
//! - Every read is bounds-checked; never index the buffer directly
//! - Header numbers wider than 64 bits are rejected, not wrapped
//!
//! ## Last Modified
//! v0.1.0 - Initial codec implementation

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{CoreError, Result};
use crate::protocol::dtag::{self, TagType};

/// End-of-record marker.
pub const END_MARKER: u8 = 0x00;

/// Maximum element nesting accepted by [`decode_nodes`].
pub const MAX_DEPTH: usize = 64;

// ============================================
// Token
// ============================================

/// One decoded header or end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// End of the enclosing record.
    End,
    /// A header.
    Header {
        /// Header kind
        kind: TagType,
        /// Tag number, or length for BLOB / UDATA
        num: u64,
    },
}

impl Token {
    /// Returns `true` if this is a DTAG header for `tag`.
    #[must_use]
    pub fn is_dtag(&self, tag: u64) -> bool {
        matches!(self, Self::Header { kind: TagType::Dtag, num } if *num == tag)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => f.write_str("END"),
            Self::Header { kind: TagType::Dtag, num } => {
                write!(f, "DTAG {}", dtag::describe(*num))
            }
            Self::Header { kind, num } => write!(f, "{kind} {num}"),
        }
    }
}

// ============================================
// Encoding Primitives
// ============================================

/// Appends a header for `(num, kind)`.
pub fn write_header(buf: &mut BytesMut, num: u64, kind: TagType) {
    // 64 bits minus the 4 in the last byte fit in ten 7-bit groups
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut rest = num >> 4;
    while rest > 0 {
        groups[count] = (rest & 0x7f) as u8;
        rest >>= 7;
        count += 1;
    }
    for &group in groups[..count].iter().rev() {
        buf.put_u8(group);
    }
    buf.put_u8(0x80 | (((num & 0x0f) as u8) << 3) | kind.as_bits());
}

/// Appends a DTAG header opening a record.
pub fn write_record_header(buf: &mut BytesMut, tag: u64) {
    write_header(buf, tag, TagType::Dtag);
}

/// Appends a complete field: `DTAG(tag) BLOB(len) bytes END`.
pub fn write_blob(buf: &mut BytesMut, tag: u64, data: &[u8]) {
    write_record_header(buf, tag);
    write_header(buf, data.len() as u64, TagType::Blob);
    buf.put_slice(data);
    buf.put_u8(END_MARKER);
}

/// Appends a text field; the string is written as a blob of its UTF-8 bytes.
pub fn write_text_blob(buf: &mut BytesMut, tag: u64, text: &str) {
    write_blob(buf, tag, text.as_bytes());
}

// ============================================
// TlvWriter
// ============================================

/// Builds a ccnb message, tracking how many records are still open.
///
/// # Example
/// ```
/// use ccnl_core::protocol::tlv::TlvWriter;
/// use ccnl_core::protocol::dtag;
///
/// let mut w = TlvWriter::new();
/// w.open(dtag::NAME).text(dtag::COMPONENT, "debug");
/// w.close().unwrap();
/// let bytes = w.finish().unwrap();
/// assert_eq!(bytes.last(), Some(&0));
/// ```
#[derive(Debug, Default)]
pub struct TlvWriter {
    buf: BytesMut,
    depth: usize,
}

impl TlvWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Opens a record.
    pub fn open(&mut self, tag: u64) -> &mut Self {
        write_record_header(&mut self.buf, tag);
        self.depth += 1;
        self
    }

    /// Closes the innermost open record.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if no record is open.
    pub fn close(&mut self) -> Result<&mut Self> {
        if self.depth == 0 {
            return Err(CoreError::malformed("close without an open record"));
        }
        self.buf.put_u8(END_MARKER);
        self.depth -= 1;
        Ok(self)
    }

    /// Writes a complete blob field.
    pub fn blob(&mut self, tag: u64, data: &[u8]) -> &mut Self {
        write_blob(&mut self.buf, tag, data);
        self
    }

    /// Writes a complete text field.
    pub fn text(&mut self, tag: u64, text: &str) -> &mut Self {
        write_text_blob(&mut self.buf, tag, text);
        self
    }

    /// Writes a bare `BLOB(len) bytes` with no surrounding record.
    pub fn raw_blob(&mut self, data: &[u8]) -> &mut Self {
        write_header(&mut self.buf, data.len() as u64, TagType::Blob);
        self.buf.put_slice(data);
        self
    }

    /// Appends already-encoded bytes verbatim.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.buf.put_slice(data);
        self
    }

    /// Number of records currently open.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the finished message.
    ///
    /// # Errors
    /// Returns `UnclosedRecord` if any record is still open.
    pub fn finish(self) -> Result<Bytes> {
        if self.depth != 0 {
            return Err(CoreError::UnclosedRecord { depth: self.depth });
        }
        Ok(self.buf.freeze())
    }
}

// ============================================
// TlvReader
// ============================================

/// Bounded cursor over a ccnb buffer.
///
/// Every step either consumes exactly what it reports or fails; a failed
/// step leaves the position unspecified and the reader should be dropped.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TlvReader<'a> {
    /// Creates a reader at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns `true` if the input is exhausted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Decodes the next header or end marker and advances past it.
    ///
    /// # Errors
    /// - `Truncated` if the input ends inside the header
    /// - `HeaderTooLong` if the number does not fit in 64 bits
    /// - `InvalidTagType` for kind 7
    pub fn read_tag(&mut self) -> Result<Token> {
        let start = self.pos;
        let first = self.next_byte()?;
        if first == END_MARKER {
            return Ok(Token::End);
        }

        let mut value: u64 = 0;
        let mut byte = first;
        while byte & 0x80 == 0 {
            if value > (u64::MAX >> 7) {
                return Err(CoreError::HeaderTooLong { offset: start });
            }
            value = (value << 7) | u64::from(byte);
            byte = self.next_byte()?;
        }

        if value > (u64::MAX >> 4) {
            return Err(CoreError::HeaderTooLong { offset: start });
        }
        let num = (value << 4) | u64::from((byte >> 3) & 0x0f);
        let bits = byte & 0x07;
        let kind = TagType::from_bits(bits).ok_or(CoreError::InvalidTagType {
            offset: start,
            kind: bits,
        })?;

        Ok(Token::Header { kind, num })
    }

    /// Decodes the next token without consuming it.
    ///
    /// # Errors
    /// Same as [`read_tag`](Self::read_tag).
    pub fn peek_tag(&self) -> Result<Token> {
        self.clone().read_tag()
    }

    /// Consumes a DTAG header for `tag`.
    ///
    /// # Errors
    /// Returns `UnexpectedTag` if anything else is next.
    pub fn expect_dtag(&mut self, tag: u64) -> Result<()> {
        let offset = self.pos;
        let token = self.read_tag()?;
        if token.is_dtag(tag) {
            Ok(())
        } else {
            Err(CoreError::unexpected_tag(
                offset,
                format!("DTAG {}", dtag::describe(tag)),
                token.to_string(),
            ))
        }
    }

    /// Consumes a BLOB header and returns the declared length.
    ///
    /// # Errors
    /// - `UnexpectedTag` if the next token is not a BLOB header
    /// - `Truncated` if fewer than the declared bytes remain
    pub fn expect_blob_header(&mut self) -> Result<usize> {
        let offset = self.pos;
        match self.read_tag()? {
            Token::Header {
                kind: TagType::Blob,
                num,
            } => {
                let len = usize::try_from(num)
                    .map_err(|_| CoreError::truncated(self.pos, usize::MAX))?;
                if len > self.remaining() {
                    return Err(CoreError::truncated(self.pos, len - self.remaining()));
                }
                Ok(len)
            }
            other => Err(CoreError::unexpected_tag(offset, "BLOB", other.to_string())),
        }
    }

    /// Consumes an end marker.
    ///
    /// # Errors
    /// Returns `UnexpectedTag` if a header is next.
    pub fn expect_end(&mut self) -> Result<()> {
        let offset = self.pos;
        match self.read_tag()? {
            Token::End => Ok(()),
            other => Err(CoreError::unexpected_tag(offset, "END", other.to_string())),
        }
    }

    /// Consumes exactly `len` bytes.
    ///
    /// # Errors
    /// Returns `Truncated` if fewer bytes remain.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(CoreError::truncated(self.pos, len - self.remaining()));
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Reads bytes up to the next zero byte, then skips the zero.
    ///
    /// # Errors
    /// - `FieldTooLong` if more than `max_len` bytes precede the terminator
    /// - `Truncated` if no terminator is found
    pub fn read_fixed_field(&mut self, max_len: usize) -> Result<&'a [u8]> {
        let rest = self.rest();
        let Some(len) = rest.iter().position(|&b| b == END_MARKER) else {
            if rest.len() > max_len {
                return Err(CoreError::field_too_long("fixed field", max_len, rest.len()));
            }
            return Err(CoreError::truncated(self.buf.len(), 1));
        };
        if len > max_len {
            return Err(CoreError::field_too_long("fixed field", max_len, len));
        }
        let out = &rest[..len];
        self.pos += len + 1;
        Ok(out)
    }

    /// Reads a complete blob field: `DTAG(tag) BLOB(len) bytes END`.
    ///
    /// # Errors
    /// Any shape mismatch or truncation.
    pub fn blob_field(&mut self, tag: u64) -> Result<&'a [u8]> {
        self.expect_dtag(tag)?;
        let len = self.expect_blob_header()?;
        let data = self.take(len)?;
        self.expect_end()?;
        trace!(tag = %dtag::describe(tag), len, "Read blob field");
        Ok(data)
    }

    /// Reads a bounded UTF-8 text field.
    ///
    /// # Errors
    /// - `FieldTooLong` if the text exceeds `max_len`
    /// - `MalformedMessage` if the text contains a zero byte or is not UTF-8
    /// - Any shape mismatch or truncation
    pub fn text_field(&mut self, tag: u64, max_len: usize) -> Result<&'a str> {
        self.expect_dtag(tag)?;
        let declared = self.expect_blob_header()?;
        if declared > max_len {
            return Err(CoreError::field_too_long(dtag::describe(tag), max_len, declared));
        }
        let text = self.read_fixed_field(max_len).map_err(|e| match e {
            CoreError::FieldTooLong { max, actual, .. } => {
                CoreError::field_too_long(dtag::describe(tag), max, actual)
            }
            other => other,
        })?;
        if text.len() != declared {
            return Err(CoreError::malformed(format!(
                "{} declares {declared} bytes but holds {}",
                dtag::describe(tag),
                text.len()
            )));
        }
        let text = std::str::from_utf8(text).map_err(|_| {
            CoreError::malformed(format!("{} is not valid UTF-8", dtag::describe(tag)))
        })?;
        trace!(tag = %dtag::describe(tag), value = text, "Read text field");
        Ok(text)
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or(CoreError::truncated(self.pos, 1))?;
        self.pos += 1;
        Ok(byte)
    }
}

// ============================================
// Node Tree
// ============================================

/// Generic ccnb element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A DTAG record with its children.
    Element {
        /// Dictionary tag
        tag: u64,
        /// Nested nodes in wire order
        children: Vec<Node>,
    },
    /// A BLOB payload.
    Blob(Bytes),
    /// A UDATA payload.
    Udata(Bytes),
}

impl Node {
    /// Creates a record node.
    #[must_use]
    pub fn element(tag: u64, children: Vec<Node>) -> Self {
        Self::Element { tag, children }
    }

    /// Creates a `DTAG BLOB END` field node.
    pub fn blob_field(tag: u64, data: impl Into<Bytes>) -> Self {
        Self::Element {
            tag,
            children: vec![Self::Blob(data.into())],
        }
    }

    /// Dictionary tag of a record node.
    #[must_use]
    pub const fn tag(&self) -> Option<u64> {
        match self {
            Self::Element { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// Children of a record node (empty for payloads).
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// First child record carrying `tag`.
    #[must_use]
    pub fn find(&self, tag: u64) -> Option<&Node> {
        self.children().iter().find(|c| c.tag() == Some(tag))
    }

    /// Payload of a field node: the single BLOB/UDATA child, or empty.
    #[must_use]
    pub fn value(&self) -> Option<Bytes> {
        match self.children() {
            [] if self.tag().is_some() => Some(Bytes::new()),
            [Self::Blob(data) | Self::Udata(data)] => Some(data.clone()),
            _ => None,
        }
    }

    /// Appends the wire form of this node.
    pub fn encode(&self, buf: &mut BytesMut) {
        match self {
            Self::Element { tag, children } => {
                write_record_header(buf, *tag);
                for child in children {
                    child.encode(buf);
                }
                buf.put_u8(END_MARKER);
            }
            Self::Blob(data) => {
                write_header(buf, data.len() as u64, TagType::Blob);
                buf.put_slice(data);
            }
            Self::Udata(data) => {
                write_header(buf, data.len() as u64, TagType::Udata);
                buf.put_slice(data);
            }
        }
    }

    /// Returns the wire form of this node.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Decodes a buffer into a sequence of top-level nodes.
///
/// Only DTAG records and BLOB/UDATA payloads are accepted; the other
/// header kinds never appear in crypto-face traffic.
///
/// # Errors
/// Any malformed header, truncation, stray end marker or excessive nesting.
pub fn decode_nodes(buf: &[u8]) -> Result<Vec<Node>> {
    let mut reader = TlvReader::new(buf);
    decode_sequence(&mut reader, 0)
}

fn decode_sequence(reader: &mut TlvReader<'_>, depth: usize) -> Result<Vec<Node>> {
    let nested = depth > 0;
    let mut nodes = Vec::new();
    loop {
        if !nested && reader.is_empty() {
            return Ok(nodes);
        }
        let offset = reader.position();
        match reader.read_tag()? {
            Token::End if nested => return Ok(nodes),
            Token::End => {
                return Err(CoreError::unexpected_tag(offset, "header", "END"));
            }
            Token::Header { kind: TagType::Dtag, num } => {
                if depth >= MAX_DEPTH {
                    return Err(CoreError::malformed(format!(
                        "nesting deeper than {MAX_DEPTH} at offset {offset}"
                    )));
                }
                let children = decode_sequence(reader, depth + 1)?;
                nodes.push(Node::Element { tag: num, children });
            }
            Token::Header {
                kind: kind @ (TagType::Blob | TagType::Udata),
                num,
            } => {
                let len = usize::try_from(num)
                    .map_err(|_| CoreError::truncated(reader.position(), usize::MAX))?;
                let data = Bytes::copy_from_slice(reader.take(len)?);
                nodes.push(if kind == TagType::Blob {
                    Node::Blob(data)
                } else {
                    Node::Udata(data)
                });
            }
            other => {
                return Err(CoreError::unexpected_tag(
                    offset,
                    "DTAG, BLOB or UDATA",
                    other.to_string(),
                ));
            }
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn header(num: u64, kind: TagType) -> Vec<u8> {
        let mut buf = BytesMut::new();
        write_header(&mut buf, num, kind);
        buf.to_vec()
    }

    #[test]
    fn test_header_encoding() {
        // Small numbers fit in the final byte
        assert_eq!(header(14, TagType::Dtag), vec![0x80 | (14 << 3) | 2]);
        assert_eq!(header(0, TagType::Blob), vec![0x85]);
        // Seqno (256) needs one leading group
        assert_eq!(header(256, TagType::Dtag), vec![0x10, 0x82]);
        // 2048 >> 4 = 128 needs two groups, the second one zero
        assert_eq!(header(2048, TagType::Blob), vec![0x01, 0x00, 0x85]);
    }

    #[test]
    fn test_header_decoding() {
        for (num, kind) in [
            (0, TagType::Blob),
            (15, TagType::Dtag),
            (256, TagType::Dtag),
            (2048, TagType::Blob),
            (99_040, TagType::Dtag),
            (u64::MAX, TagType::Udata),
        ] {
            let bytes = header(num, kind);
            let mut reader = TlvReader::new(&bytes);
            assert_eq!(reader.read_tag().unwrap(), Token::Header { kind, num });
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_end_marker() {
        let mut reader = TlvReader::new(&[0x00, 0x00]);
        assert_eq!(reader.read_tag().unwrap(), Token::End);
        assert_eq!(reader.peek_tag().unwrap(), Token::End);
        reader.expect_end().unwrap();
        assert!(reader.read_tag().unwrap_err().is_truncation());
    }

    #[test]
    fn test_header_errors() {
        // Continuation byte with no final byte
        let err = TlvReader::new(&[0x10]).read_tag().unwrap_err();
        assert!(err.is_truncation());

        // Kind 7 is reserved
        let err = TlvReader::new(&[0x80 | 7]).read_tag().unwrap_err();
        assert!(matches!(err, CoreError::InvalidTagType { kind: 7, .. }));

        // Eleven continuation groups overflow 64 bits
        let mut bytes = vec![0x7f; 11];
        bytes.push(0x82);
        let err = TlvReader::new(&bytes).read_tag().unwrap_err();
        assert!(matches!(err, CoreError::HeaderTooLong { offset: 0 }));
    }

    #[test]
    fn test_blob_field() {
        let mut buf = BytesMut::new();
        write_blob(&mut buf, dtag::CONTENT, b"payload");

        let mut reader = TlvReader::new(&buf);
        assert_eq!(reader.blob_field(dtag::CONTENT).unwrap(), b"payload");
        assert!(reader.is_empty());

        let mut reader = TlvReader::new(&buf);
        let err = reader.blob_field(dtag::NAME).unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedTag { offset: 0, .. }));
    }

    #[test]
    fn test_declared_length_beyond_buffer() {
        let mut buf = BytesMut::new();
        write_record_header(&mut buf, dtag::CONTENT);
        write_header(&mut buf, 50, TagType::Blob);
        buf.put_slice(b"short");

        let mut reader = TlvReader::new(&buf);
        reader.expect_dtag(dtag::CONTENT).unwrap();
        let err = reader.expect_blob_header().unwrap_err();
        assert!(matches!(err, CoreError::Truncated { needed: 45, .. }));
    }

    #[test]
    fn test_read_fixed_field() {
        let mut reader = TlvReader::new(b"abc\0rest");
        assert_eq!(reader.read_fixed_field(10).unwrap(), b"abc");
        assert_eq!(reader.rest(), b"rest");

        // Overflow is reported, never truncated
        let mut reader = TlvReader::new(b"abcdef\0");
        let err = reader.read_fixed_field(3).unwrap_err();
        assert!(matches!(err, CoreError::FieldTooLong { max: 3, actual: 6, .. }));

        // Missing terminator
        let mut reader = TlvReader::new(b"abc");
        assert!(reader.read_fixed_field(10).unwrap_err().is_truncation());
    }

    #[test]
    fn test_text_field_limits() {
        let mut buf = BytesMut::new();
        write_text_blob(&mut buf, dtag::TYPE, &"x".repeat(120));
        let err = TlvReader::new(&buf)
            .text_field(dtag::TYPE, dtag::MAX_LABEL_LEN)
            .unwrap_err();
        assert!(matches!(err, CoreError::FieldTooLong { max: 100, actual: 120, .. }));

        let mut buf = BytesMut::new();
        write_blob(&mut buf, dtag::TYPE, b"si\0gn");
        let err = TlvReader::new(&buf).text_field(dtag::TYPE, 100).unwrap_err();
        assert!(matches!(err, CoreError::MalformedMessage { .. }));

        let mut buf = BytesMut::new();
        write_blob(&mut buf, dtag::TYPE, &[0xff, 0xfe]);
        let err = TlvReader::new(&buf).text_field(dtag::TYPE, 100).unwrap_err();
        assert!(matches!(err, CoreError::MalformedMessage { .. }));
    }

    #[test]
    fn test_writer_balance() {
        let mut w = TlvWriter::new();
        w.open(dtag::INTEREST).open(dtag::NAME);
        assert_eq!(w.depth(), 2);
        w.close().unwrap();
        let err = w.finish().unwrap_err();
        assert!(matches!(err, CoreError::UnclosedRecord { depth: 1 }));

        let mut w = TlvWriter::new();
        assert!(w.close().is_err());
    }

    #[test]
    fn test_writer_matches_primitives() {
        let mut w = TlvWriter::with_capacity(64);
        w.open(dtag::SIGNATURE_BITS).raw_blob(b"sig");
        w.close().unwrap();
        let from_writer = w.finish().unwrap();

        let mut buf = BytesMut::new();
        write_blob(&mut buf, dtag::SIGNATURE_BITS, b"sig");
        assert_eq!(from_writer, buf.freeze());
    }

    #[test]
    fn test_node_reencode_is_identical() {
        let mut w = TlvWriter::new();
        w.open(dtag::CONTENT_OBJ)
            .open(dtag::NAME)
            .text(dtag::COMPONENT, "debug")
            .blob(dtag::COMPONENT, &[0u8, 1, 2, 255]);
        w.close().unwrap();
        w.blob(dtag::CONTENT, &vec![7u8; 300]).text(dtag::SEQNO, "-42");
        w.close().unwrap();
        let encoded = w.finish().unwrap();

        let nodes = decode_nodes(&encoded).unwrap();
        assert_eq!(nodes.len(), 1);
        let reencoded = nodes[0].to_bytes();
        assert_eq!(reencoded, encoded);

        // And a second pass changes nothing
        let again = decode_nodes(&reencoded).unwrap();
        assert_eq!(again, nodes);
    }

    #[test]
    fn test_node_accessors() {
        let node = Node::element(
            dtag::NAME,
            vec![
                Node::blob_field(dtag::COMPONENT, &b"a"[..]),
                Node::element(dtag::COMPONENT, vec![]),
            ],
        );
        assert_eq!(node.tag(), Some(dtag::NAME));
        assert_eq!(node.find(dtag::COMPONENT).unwrap().value().unwrap(), &b"a"[..]);
        assert_eq!(node.children()[1].value().unwrap(), Bytes::new());
        assert!(node.value().is_none());
        assert!(node.find(dtag::CONTENT).is_none());
    }

    #[test]
    fn test_decode_rejects_bad_structure() {
        // Stray end marker at top level
        assert!(decode_nodes(&[0x00]).is_err());

        // Unclosed record
        let mut buf = BytesMut::new();
        write_record_header(&mut buf, dtag::NAME);
        assert!(decode_nodes(&buf).unwrap_err().is_truncation());

        // Attribute kinds are not part of this dialect
        assert!(decode_nodes(&header(3, TagType::Attr)).is_err());

        // Nesting limit
        let mut buf = BytesMut::new();
        for _ in 0..=MAX_DEPTH {
            write_record_header(&mut buf, dtag::NAME);
        }
        for _ in 0..=MAX_DEPTH {
            buf.put_u8(END_MARKER);
        }
        assert!(matches!(
            decode_nodes(&buf).unwrap_err(),
            CoreError::MalformedMessage { .. }
        ));
    }

    #[test]
    fn test_empty_input_decodes_to_nothing() {
        assert!(decode_nodes(&[]).unwrap().is_empty());
    }
}

// ============================================
// File: crates/ccnl-core/src/protocol/content.rs
// ============================================
//! # Content Objects and Names
//!
//! ## Creation Reason
//! After a crypto round trip the relay has to turn the embedded bytes back
//! into something the forwarding side understands: a signed content object
//! for sign replies, a name-wrapped command for verify replies.
//!
//! ## Main Functionality
//! - `Name`: Ordered list of binary name components
//! - `Signature`: Algorithm label, witness and raw signature bits
//! - `build_signed_content_object`: Attach a signature block to content
//! - `wrap_as_name`: Wrap an embedded command as a `Name` record
//! - `parse_content_object`: Extract name, content, nonce and key digest
//! - `command_verb`: Management verb of a command name
//!
//! ## Signed Content Layout
//! ```text
//! ContentObj
//! └─ Name
//!    ├─ Signature                (only when a signature is present)
//!    │  ├─ Name          "SHA256"
//!    │  ├─ Witness       ""
//!    │  └─ SignatureBits <raw>
//!    └─ <embedded content, verbatim>
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The signature block lives inside `Name`; the parser expects it there
//! - Signatures are carried, never validated, in this crate
//!
//! ## Last Modified
//! v0.1.0 - Initial content handling

use std::fmt;

use bytes::Bytes;
use tracing::trace;

use crate::error::{CoreError, Result};
use crate::protocol::dtag::{self, SIGNATURE_ALGORITHM};
use crate::protocol::tlv::{decode_nodes, Node, TlvWriter};

/// Commands at least this long are not shown by name.
pub const MAX_COMMAND_LEN: usize = 500;

/// Placeholder verb for overlong commands.
pub const COMMAND_TOO_LONG: &str = "cmd-is-too-long-to-display";

// ============================================
// Name
// ============================================

/// Content name.
///
/// # Example
/// ```
/// use ccnl_core::protocol::content::Name;
///
/// let name = Name::from_uri("/debug/seqnum-42");
/// assert_eq!(name.len(), 2);
/// assert_eq!(name.to_string(), "/debug/seqnum-42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name {
    components: Vec<Bytes>,
}

impl Name {
    /// Creates an empty name.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Creates a name from its components.
    #[must_use]
    pub fn from_components(components: Vec<Bytes>) -> Self {
        Self { components }
    }

    /// Parses a `/`-separated name; empty segments are skipped.
    #[must_use]
    pub fn from_uri(uri: &str) -> Self {
        Self {
            components: uri
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|s| Bytes::copy_from_slice(s.as_bytes()))
                .collect(),
        }
    }

    /// Appends a component.
    pub fn push(&mut self, component: impl Into<Bytes>) {
        self.components.push(component.into());
    }

    /// All components in order.
    #[must_use]
    pub fn components(&self) -> &[Bytes] {
        &self.components
    }

    /// Component at `index`.
    #[must_use]
    pub fn component(&self, index: usize) -> Option<&Bytes> {
        self.components.get(index)
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` for the empty name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns `true` if `self` is a prefix of `other`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.components.starts_with(&self.components)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", String::from_utf8_lossy(component))?;
        }
        Ok(())
    }
}

// ============================================
// Signature
// ============================================

/// Signature block attached to a content object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Digest algorithm label
    pub algorithm: String,
    /// Witness (always empty when produced by the relay)
    pub witness: Bytes,
    /// Raw signature bits
    pub bits: Bytes,
}

// ============================================
// ParsedContent
// ============================================

/// Fields extracted from a content object or name record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedContent {
    /// Content name
    pub name: Name,
    /// Content payload (empty if none)
    pub content: Bytes,
    /// Interest nonce, if present
    pub nonce: Option<Bytes>,
    /// Publisher public key digest, if present
    pub ppkd: Option<Bytes>,
    /// Signature block, if present
    pub signature: Option<Signature>,
    /// The complete packet as parsed
    pub packet: Bytes,
}

// ============================================
// Builders
// ============================================

/// Builds a content object carrying `signature` and the embedded content.
///
/// An empty signature produces no signature block.
///
/// # Errors
/// Only on an internal encoding imbalance.
pub fn build_signed_content_object(signature: &[u8], embedded: &[u8]) -> Result<Bytes> {
    let mut w = TlvWriter::with_capacity(signature.len() + embedded.len() + 32);
    w.open(dtag::CONTENT_OBJ).open(dtag::NAME);
    if !signature.is_empty() {
        w.open(dtag::SIGNATURE)
            .text(dtag::NAME, SIGNATURE_ALGORITHM)
            .text(dtag::WITNESS, "")
            .open(dtag::SIGNATURE_BITS)
            .raw_blob(signature);
        w.close()?.close()?;
    }
    w.raw(embedded);
    w.close()?.close()?;
    w.finish()
}

/// Wraps an embedded command as `Name[ <msg> ]`.
///
/// # Errors
/// Only on an internal encoding imbalance.
pub fn wrap_as_name(msg: &[u8]) -> Result<Bytes> {
    let mut w = TlvWriter::with_capacity(msg.len() + 4);
    w.open(dtag::NAME).raw(msg);
    w.close()?;
    w.finish()
}

// ============================================
// Parser
// ============================================

/// Parses a content object, interest, or bare name record.
///
/// Name components are the `Component` children of the `Name` record.
/// `Content`, `Nonce`, `PublisherPublicKeyDigest` and `Signature` are taken
/// from either the `Name` record or the outer record.
///
/// # Errors
/// Fails if the packet is not exactly one well-formed record of an
/// accepted kind, or if it has no `Name`.
pub fn parse_content_object(packet: &[u8]) -> Result<ParsedContent> {
    let nodes = decode_nodes(packet)?;
    let [top] = nodes.as_slice() else {
        return Err(CoreError::malformed(format!(
            "expected one top-level record, found {}",
            nodes.len()
        )));
    };

    let name_node = match top.tag() {
        Some(dtag::NAME) => top,
        Some(dtag::CONTENT_OBJ | dtag::INTEREST) => {
            top.find(dtag::NAME).ok_or_else(|| CoreError::missing("Name"))?
        }
        other => {
            return Err(CoreError::unexpected_tag(
                0,
                "DTAG ContentObj, Interest or Name",
                other.map_or_else(|| "payload".to_string(), dtag::describe),
            ));
        }
    };

    let mut parsed = ParsedContent {
        name: Name::new(),
        content: Bytes::new(),
        nonce: None,
        ppkd: None,
        signature: None,
        packet: Bytes::copy_from_slice(packet),
    };

    let mut scopes = vec![name_node];
    if !std::ptr::eq(name_node, top) {
        scopes.push(top);
    }
    for scope in scopes {
        for child in scope.children() {
            match child.tag() {
                Some(dtag::COMPONENT) if std::ptr::eq(scope, name_node) => {
                    parsed.name.push(field_value(child, "Component")?);
                }
                Some(dtag::CONTENT) => parsed.content = field_value(child, "Content")?,
                Some(dtag::NONCE) => parsed.nonce = Some(field_value(child, "Nonce")?),
                Some(dtag::PUBLISHER_PUBKEY_DIGEST) => {
                    parsed.ppkd = Some(field_value(child, "PublisherPublicKeyDigest")?);
                }
                Some(dtag::SIGNATURE) => parsed.signature = Some(parse_signature(child)?),
                _ => {}
            }
        }
    }

    trace!(
        name = %parsed.name,
        content_len = parsed.content.len(),
        signed = parsed.signature.is_some(),
        "Parsed content object"
    );
    Ok(parsed)
}

/// Management verb of a command name: its third component.
///
/// Components of [`MAX_COMMAND_LEN`] bytes or more are replaced by
/// [`COMMAND_TOO_LONG`].
#[must_use]
pub fn command_verb(name: &Name) -> Option<String> {
    let component = name.component(2)?;
    if component.len() >= MAX_COMMAND_LEN {
        return Some(COMMAND_TOO_LONG.to_string());
    }
    Some(String::from_utf8_lossy(component).into_owned())
}

fn field_value(node: &Node, what: &str) -> Result<Bytes> {
    node.value()
        .ok_or_else(|| CoreError::malformed(format!("{what} is not a simple field")))
}

fn parse_signature(node: &Node) -> Result<Signature> {
    let algorithm = node
        .find(dtag::NAME)
        .map(|n| field_value(n, "Signature algorithm"))
        .transpose()?
        .map(|v| String::from_utf8_lossy(&v).into_owned())
        .unwrap_or_default();
    let witness = node
        .find(dtag::WITNESS)
        .map(|n| field_value(n, "Witness"))
        .transpose()?
        .unwrap_or_default();
    let bits = node
        .find(dtag::SIGNATURE_BITS)
        .ok_or_else(|| CoreError::missing("SignatureBits"))
        .and_then(|n| field_value(n, "SignatureBits"))?;
    Ok(Signature {
        algorithm,
        witness,
        bits,
    })
}

// ============================================
// Tests
// ============================================

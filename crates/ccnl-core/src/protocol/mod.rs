// ============================================
// File: crates/ccnl-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the crypto-face wire protocol: the ccnb encoding itself, the
//! request the relay sends, the reply the crypto service returns, and the
//! content objects rebuilt from a reply.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`dtag`]: Tag kinds, dictionary tags, limits, `Operation`
//! - [`tlv`]: ccnb header codec, `TlvWriter`, `TlvReader`, `Node`
//! - [`request`]: Sign/verify request builders and parser
//! - [`reply`]: Reply envelope walker and section steps
//! - [`content`]: `Name`, signed content objects, packet parsing
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Relay ───── Interest  /ccnx/crypto/<cb>/<ContentObj> ────► │
//! │                        Type=sign|verify, Seqno=<corr>       │
//! │                                                  Crypto Svc │
//! │  Relay ◄──── ContentObj /ccnx/crypto/<cb>/<ContentObj> ──── │
//! │                        Seqno=<corr>, signature | verified   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The crypto service is a separate program; keep the layout stable
//! - Requests and replies share one envelope; only the outer tag differs
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod content;
pub mod dtag;
pub mod reply;
pub mod request;
pub mod tlv;

// Re-export primary types
pub use content::{Name, ParsedContent, Signature};
pub use dtag::{Operation, TagType, MAX_LABEL_LEN, MAX_PACKET_SIZE};
pub use reply::CryptoEnvelope;
pub use request::CryptoRequest;
pub use tlv::{Node, TlvReader, TlvWriter, Token};

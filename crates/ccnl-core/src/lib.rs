// ============================================
// File: crates/ccnl-core/src/lib.rs
// ============================================
//! # ccnl Core - Crypto Face Protocol Library
//!
//! ## Creation Reason
//! Provides the wire protocol spoken between the relay and its external
//! crypto service. Everything here is pure: bytes in, bytes or typed
//! values out, no sockets and no relay state.
//!
//! ## Main Functionality
//!
//! ### Protocol Module ([`protocol`])
//! - ccnb TLV codec (headers, blobs, end markers)
//! - Sign/verify request builder
//! - Reply parser with bounded, fail-closed field extraction
//! - Content-object builder and parser
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 ccnl-relay                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     ccnl-core  ◄──      ccnl-transport             │
//! │   You are here          │                          │
//! │         │               │                          │
//! │         └──────────┬────┘                          │
//! │                    ▼                               │
//! │              ccnl-common                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Decoders must never read past the supplied buffer
//! - Every parse error is returned, never panicked on
//! - Wire changes must be mirrored in the crypto service
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod protocol;

// Re-export commonly used items
pub use error::{CoreError, Result};
pub use protocol::{
    CryptoEnvelope, CryptoRequest, Name, Operation, ParsedContent, Signature,
    MAX_LABEL_LEN, MAX_PACKET_SIZE,
};

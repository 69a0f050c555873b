// ============================================
// File: crates/ccnl-relay/src/handlers/mod.rs
// ============================================
//! # Message Handlers
//!
//! ## Main Functionality
//! - [`crypto`]: Crypto reply dispatch and reinjection
//!
//! ## Last Modified
//! v0.1.0 - Initial handlers

pub mod crypto;

pub use crypto::{
    CallbackHandler, CryptoDispatcher, DispatchOutcome, DropReason, MgmtCryptoHandler,
};

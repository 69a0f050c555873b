// ============================================
// File: crates/ccnl-relay/src/lib.rs
// ============================================
//! # ccnl Relay Library
//!
//! ## Creation Reason
//! Adds a crypto face to the relay: signing and verification are handed to
//! an external crypto service, and its replies are reinjected into the
//! relay without any per-request state.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: Relay configuration management
//! - [`server`]: Relay orchestration and event loop
//! - [`services`]: Face table, crypto client, in-memory store
//! - [`handlers`]: Crypto reply dispatch
//! - [`node`]: Collaborator traits for the rest of the relay
//! - [`error`]: Relay-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          ccnl Relay                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────────┐  │
//! │  │   Config    │────►│    Relay    │────►│ CryptoDispatcher│  │
//! │  │             │     │  Event Loop │     │                 │  │
//! │  └─────────────┘     └──────┬──────┘     └────────┬────────┘  │
//! │                             │                     │           │
//! │         ┌───────────────────┼───────────────────┬─┘           │
//! │         ▼                   ▼                   ▼             │
//! │  ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     │
//! │  │ Face Table  │     │Content Store│     │ Management  │     │
//! │  │             │     │  + Pending  │     │  Processor  │     │
//! │  └─────────────┘     └─────────────┘     └─────────────┘     │
//! │                                                               │
//! ├───────────────────────────────────────────────────────────────┤
//! │                     Transport Layer                           │
//! │  ┌─────────────────────────────────────────────────────────┐ │
//! │  │        Unix datagram socket (crypto face)               │ │
//! │  └─────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//! ```text
//! request_sign / request_verify → crypto face queue → crypto service
//! crypto service → on_crypto_reply → face | store + pending | management
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Configuration changes require restart (no hot-reload)
//! - The crypto service is trusted; replies are not authenticated
//! - Verification results are carried, not enforced
//!
//! ## Last Modified
//! v0.1.0 - Initial relay library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod node;
pub mod server;
pub mod services;

// Re-export primary types
pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use handlers::{CryptoDispatcher, DispatchOutcome, DropReason};
pub use server::Relay;
pub use services::{CryptoClient, FaceTable};

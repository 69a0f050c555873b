// ============================================
// File: crates/ccnl-transport/src/lib.rs
// ============================================
//! # ccnl Transport - Crypto Face I/O Layer
//!
//! ## Creation Reason
//! Provides the datagram transport between the relay and the external
//! crypto service, plus an in-memory stand-in for tests.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: `Transport` trait and `PacketSource`
//! - [`unix`]: Unix-domain datagram transport
//! - [`mock`]: In-memory transport for tests
//! - [`error`]: Transport-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 ccnl-relay                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     ccnl-core           ccnl-transport             │
//! │                         You are here ◄──           │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │              ccnl-common                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//! ```text
//!   relay loop ── send(request, service_path) ──► crypto service
//!   relay loop ◄── recv(reply) ─────────────────── crypto service
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Unix-domain sockets only; the crypto service is always local
//! - Always use the trait so the relay loop can be tested with the mock
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod mock;
pub mod traits;
pub mod unix;

// Re-export primary types
pub use error::{Result, TransportError};
pub use mock::MockTransport;
pub use traits::{PacketSource, Transport};
pub use unix::UnixTransport;

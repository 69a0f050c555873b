// ============================================
// File: crates/ccnl-relay/src/services/mod.rs
// ============================================
//! # Relay Services
//!
//! ## Main Functionality
//! - [`faces`]: Face table and per-face outbound queues
//! - [`crypto`]: Sign/verify request submission
//! - [`store`]: In-memory content store and pending interests
//!
//! ## Last Modified
//! v0.1.0 - Initial services

pub mod crypto;
pub mod faces;
pub mod store;

pub use crypto::CryptoClient;
pub use faces::{Face, FaceStats, FaceTable};
pub use store::{MemoryContentStore, MemoryPendingInterests};

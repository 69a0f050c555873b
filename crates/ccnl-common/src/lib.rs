// ============================================
// File: crates/ccnl-common/src/lib.rs
// ============================================
//! # ccnl Common - Shared Types Library
//!
//! ## Creation Reason
//! Provides the identifiers and error types shared by every crate of the
//! crypto-face extension, so the codec, the transport and the relay agree
//! on what a face id and a correlation value are.
//!
//! ## Main Functionality
//! - [`types`]: `FaceId` and the tagged `Correlation` value
//! - [`error`]: Common error types and result aliases
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 ccnl-relay                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │     ccnl-core           ccnl-transport             │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │              ccnl-common  ◄── You are here         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This crate is the foundation - changes affect everything
//! - Keep dependencies minimal
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{CommonError, Result};
pub use types::{Correlation, FaceId};

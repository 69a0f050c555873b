// ============================================
// File: crates/ccnl-relay/src/services/crypto.rs
// ============================================
//! # Crypto Client
//!
//! ## Creation Reason
//! Relay-side entry points for asking the external crypto service to sign
//! content or verify a signed command.
//!
//! ## Main Functionality
//! - `CryptoClient::request_sign`: Queue a sign request on the crypto face
//! - `CryptoClient::request_verify`: Queue a verify request on the crypto face
//!
//! ## Request Flow
//! ```text
//! caller ──► request_sign / request_verify
//!                 │
//!                 ├─ crypto face missing? ──► CryptoFaceUnavailable
//!                 │
//!                 ▼
//!          build ccnb request (owned buffer)
//!                 │
//!                 ▼
//!          enqueue on crypto face ──► relay loop sends it
//!                                       to the crypto service
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Success means "queued", not "signed"; the outcome arrives later as a
//!   reply datagram handled by the crypto dispatcher
//! - There is no pending-request table; the correlation value is the only
//!   resume state
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto client

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use ccnl_common::Correlation;
use ccnl_core::protocol::request::{build_sign_request, build_verify_request};
use ccnl_core::Operation;

use crate::error::{RelayError, Result};
use crate::services::faces::{Face, FaceTable};

/// Submits sign and verify requests to the crypto service.
#[derive(Debug, Clone)]
pub struct CryptoClient {
    faces: Arc<FaceTable>,
}

impl CryptoClient {
    /// Creates a client that queues on the table's crypto face.
    #[must_use]
    pub fn new(faces: Arc<FaceTable>) -> Self {
        Self { faces }
    }

    /// Asks the crypto service to sign `content`.
    ///
    /// # Errors
    /// - `CryptoFaceUnavailable` if no crypto face exists; nothing is sent
    /// - `Core` if the request cannot be encoded
    /// - `FaceQueueFull` if the crypto face is backed up
    pub fn request_sign(
        &self,
        content: &[u8],
        callback: &str,
        correlation: Correlation,
    ) -> Result<()> {
        let face = self.crypto_face(Operation::Sign)?;
        let msg = build_sign_request(correlation, content, callback)?;
        Self::submit(&face, Operation::Sign, correlation, msg)
    }

    /// Asks the crypto service to check `signature` over `content`.
    ///
    /// # Errors
    /// Same as [`CryptoClient::request_sign`].
    pub fn request_verify(
        &self,
        content: &[u8],
        signature: &[u8],
        callback: &str,
        correlation: Correlation,
    ) -> Result<()> {
        let face = self.crypto_face(Operation::Verify)?;
        let msg = build_verify_request(correlation, content, signature, callback)?;
        Self::submit(&face, Operation::Verify, correlation, msg)
    }

    fn crypto_face(&self, operation: Operation) -> Result<Arc<Face>> {
        self.faces.crypto_face().ok_or_else(|| {
            warn!(operation = %operation, "No crypto face, request not sent");
            RelayError::CryptoFaceUnavailable
        })
    }

    fn submit(face: &Face, operation: Operation, correlation: Correlation, msg: Bytes) -> Result<()> {
        let len = msg.len();
        face.enqueue(msg)?;
        debug!(
            operation = %operation,
            correlation = %correlation,
            face_id = %face.id(),
            len,
            "Crypto request queued"
        );
        Ok(())
    }
}

// ============================================
// Tests
// ============================================

// ============================================
// File: crates/ccnl-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Defines the abstract datagram interface the relay loop uses to talk
//! to the crypto service, so the loop can run against a mock in tests.
//!
//! ## Main Functionality
//! - `Transport`: Path-addressed datagram transport interface
//! - `PacketSource`: Metadata about received packets
//!
//! ## ⚠️ Important Note for Next Developer
//! - All I/O methods are async for consistency
//! - Implementations must be Send + Sync for use in async contexts
//! - Buffer management is caller's responsibility
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;

// ============================================
// PacketSource
// ============================================

/// Metadata about the source of a received packet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PacketSource {
    /// Sender's socket path (`None` for unbound senders).
    pub path: Option<PathBuf>,
    /// When the packet was received.
    pub timestamp: Instant,
}

impl PacketSource {
    /// Creates a new `PacketSource`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            timestamp: Instant::now(),
        }
    }

    /// Returns the age of this packet (time since received).
    #[must_use]
    pub fn age(&self) -> std::time::Duration {
        self.timestamp.elapsed()
    }
}

// ============================================
// Transport Trait
// ============================================

/// Abstract interface for path-addressed datagram transport.
///
/// # Example
/// ```ignore
/// async fn echo<T: Transport>(transport: &T) -> Result<()> {
///     let mut buf = vec![0u8; MAX_PACKET_SIZE];
///     let (len, source) = transport.recv(&mut buf).await?;
///     if let Some(path) = source.path {
///         transport.send(&buf[..len], &path).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Receives one datagram.
    ///
    /// # Returns
    /// Tuple of (bytes received, packet source)
    ///
    /// # Errors
    /// Returns error if receive fails or the transport is shut down.
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)>;

    /// Sends one datagram to `dest`.
    ///
    /// # Returns
    /// Number of bytes sent
    ///
    /// # Errors
    /// Returns error if send fails or the transport is shut down.
    async fn send(&self, buf: &[u8], dest: &Path) -> Result<usize>;

    /// Returns the socket path this transport is bound to.
    ///
    /// # Errors
    /// Returns error if the path cannot be determined.
    fn local_path(&self) -> Result<PathBuf>;

    /// Gracefully shuts down the transport.
    ///
    /// After shutdown, all operations will return errors.
    ///
    /// # Errors
    /// Returns error if shutdown fails.
    async fn shutdown(&self) -> Result<()>;

    /// Returns `true` if the transport is still active.
    fn is_active(&self) -> bool;
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_source() {
        let source = PacketSource::new(Some(PathBuf::from("/tmp/crypto.sock")));

        assert_eq!(source.path.as_deref(), Some(Path::new("/tmp/crypto.sock")));
        assert!(source.age() < std::time::Duration::from_secs(1));
        assert!(PacketSource::new(None).path.is_none());
    }
}

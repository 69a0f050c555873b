// ============================================
// File: crates/ccnl-transport/src/mock.rs
// ============================================
//! # Mock Transport Implementation
//!
//! ## Creation Reason
//! Provides an in-memory transport so the relay loop can be driven in
//! tests without binding sockets.
//!
//! ## Main Functionality
//! - In-memory inbound queue fed by `inject_packet`
//! - Capture of every sent datagram for verification
//! - Shutdown that wakes a pending `recv`
//!
//! ## Usage in Tests
//! ```
//! use ccnl_transport::{MockTransport, Transport};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = MockTransport::new("/tmp/relay.sock");
//! transport.inject_packet(b"reply".to_vec(), None);
//!
//! let mut buf = [0u8; 64];
//! let (len, _) = transport.recv(&mut buf).await?;
//! assert_eq!(&buf[..len], b"reply");
//!
//! transport.send(b"request", Path::new("/tmp/crypto.sock")).await?;
//! assert_eq!(transport.take_sent_packets().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only - do not use in production
//! - Queues are bounded to catch runaway tests
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{Result, TransportError};
use crate::traits::{PacketSource, Transport};

// ============================================
// Constants
// ============================================

/// Maximum number of packets to queue in either direction.
const MAX_QUEUE_SIZE: usize = 1000;

// ============================================
// MockTransport
// ============================================

/// In-memory transport for tests.
pub struct MockTransport {
    /// Path reported by `local_path`
    path: PathBuf,
    /// Packets waiting to be received
    inbound: Mutex<VecDeque<(Vec<u8>, Option<PathBuf>)>>,
    /// Packets that have been sent, with their destination
    sent: Mutex<Vec<(Vec<u8>, PathBuf)>>,
    /// Shutdown flag
    shutdown: AtomicBool,
    /// Wakes `recv` on new packets or shutdown
    notify: Notify,
    /// Wakes `wait_for_sent` on each send
    sent_notify: Notify,
}

impl MockTransport {
    /// Creates a mock bound to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inbound: Mutex::new(VecDeque::with_capacity(16)),
            sent: Mutex::new(Vec::with_capacity(16)),
            shutdown: AtomicBool::new(false),
            notify: Notify::new(),
            sent_notify: Notify::new(),
        }
    }

    /// Queues a packet for the next `recv`.
    ///
    /// # Panics
    /// Panics if more than `MAX_QUEUE_SIZE` packets are pending.
    pub fn inject_packet(&self, packet: Vec<u8>, from: Option<PathBuf>) {
        let mut queue = self.inbound.lock();
        assert!(queue.len() < MAX_QUEUE_SIZE, "Mock transport inbound queue overflow");
        queue.push_back((packet, from));
        drop(queue);
        self.notify.notify_one();
    }

    /// Takes every packet sent so far.
    #[must_use]
    pub fn take_sent_packets(&self) -> Vec<(Vec<u8>, PathBuf)> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Number of packets sent and not yet taken.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Number of packets waiting to be received.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inbound.lock().len()
    }

    /// Waits until at least `count` packets have been sent.
    pub async fn wait_for_sent(&self, count: usize) {
        loop {
            let notified = self.sent_notify.notified();
            if self.sent_count() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)> {
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return Err(TransportError::ShuttingDown);
            }

            let next = self.inbound.lock().pop_front();
            if let Some((packet, from)) = next {
                let len = packet.len().min(buf.len());
                buf[..len].copy_from_slice(&packet[..len]);
                return Ok((len, PacketSource::new(from)));
            }

            self.notify.notified().await;
        }
    }

    async fn send(&self, buf: &[u8], dest: &Path) -> Result<usize> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(TransportError::ShuttingDown);
        }

        let mut sent = self.sent.lock();
        if sent.len() >= MAX_QUEUE_SIZE {
            return Err(TransportError::send_failed(dest, "mock send queue full"));
        }
        sent.push((buf.to_vec(), dest.to_path_buf()));
        drop(sent);
        self.sent_notify.notify_waiters();

        Ok(buf.len())
    }

    fn local_path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdown.store(true, Ordering::Release);
        // notify_one leaves a permit if recv is between its check and its wait
        self.notify.notify_one();
        Ok(())
    }

    fn is_active(&self) -> bool {
        !self.shutdown.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("path", &self.path)
            .field("pending", &self.pending_count())
            .field("sent", &self.sent_count())
            .finish()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_inject_and_recv() {
        let transport = MockTransport::new("/tmp/relay.sock");
        transport.inject_packet(b"one".to_vec(), Some(PathBuf::from("/tmp/svc.sock")));
        transport.inject_packet(b"two".to_vec(), None);
        assert_eq!(transport.pending_count(), 2);

        let mut buf = [0u8; 16];
        let (len, source) = transport.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"one");
        assert_eq!(source.path.unwrap(), PathBuf::from("/tmp/svc.sock"));

        let (len, source) = transport.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"two");
        assert!(source.path.is_none());
    }

    #[tokio::test]
    async fn test_recv_waits_for_packet() {
        let transport = Arc::new(MockTransport::new("/tmp/relay.sock"));

        let reader = {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move {
                let mut buf = [0u8; 16];
                let (len, _) = transport.recv(&mut buf).await.unwrap();
                buf[..len].to_vec()
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        transport.inject_packet(b"late".to_vec(), None);

        let got = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, b"late");
    }

    #[tokio::test]
    async fn test_send_capture() {
        let transport = MockTransport::new("/tmp/relay.sock");
        transport.send(b"req", Path::new("/tmp/svc.sock")).await.unwrap();
        transport.wait_for_sent(1).await;

        let sent = transport.take_sent_packets();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, b"req");
        assert_eq!(sent[0].1, PathBuf::from("/tmp/svc.sock"));
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_wakes_recv() {
        let transport = Arc::new(MockTransport::new("/tmp/relay.sock"));

        let reader = {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move {
                let mut buf = [0u8; 16];
                transport.recv(&mut buf).await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        transport.shutdown().await.unwrap();
        assert!(!transport.is_active());

        let result = tokio::time::timeout(Duration::from_secs(1), reader)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(TransportError::ShuttingDown)));

        let result = transport.send(b"x", Path::new("/tmp/svc.sock")).await;
        assert!(matches!(result, Err(TransportError::ShuttingDown)));
    }
}

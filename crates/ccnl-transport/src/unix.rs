// ============================================
// File: crates/ccnl-transport/src/unix.rs
// ============================================
//! # Unix Datagram Transport Implementation
//!
//! ## Creation Reason
//! The crypto service listens on a local Unix-domain datagram socket. This
//! wraps Tokio's `UnixDatagram` with our `Transport` trait.
//!
//! ## Main Functionality
//! - `UnixTransport`: Unix datagram transport implementation
//! - Stale socket file removal before bind
//! - Kernel buffer sizing (`SO_RCVBUF` / `SO_SNDBUF`)
//! - Graceful shutdown support
//!
//! ## Design Choices
//! - Socket created through socket2 so buffers are sized before bind
//! - Non-blocking operations with Tokio
//! - Atomic shutdown flag for coordinated cleanup
//!
//! ## ⚠️ Important Note for Next Developer
//! - Socket paths are limited to ~108 bytes by the kernel
//! - The socket file is removed on shutdown, not on drop
//!
//! ## Last Modified
//! v0.1.0 - Initial Unix transport implementation

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use socket2::{Domain, SockAddr, Socket, Type};
use tokio::net::UnixDatagram;
use tracing::{debug, info, trace, warn};

use crate::error::{Result, TransportError};
use crate::traits::{PacketSource, Transport};

// ============================================
// UnixTransport
// ============================================

/// Unix-domain datagram transport.
///
/// # Example
/// ```ignore
/// use ccnl_transport::{Transport, UnixTransport};
///
/// let transport = UnixTransport::bind("/tmp/.ccnl-relay-crypto.sock", 4 * 8096)?;
/// transport.send(&request, Path::new("/tmp/.ccnl-crypto-server.sock")).await?;
/// ```
pub struct UnixTransport {
    /// Underlying datagram socket
    socket: UnixDatagram,
    /// Path we're bound to
    path: PathBuf,
    /// Requested kernel buffer size
    buffer_size: usize,
    /// Shutdown flag
    shutdown: AtomicBool,
}

impl UnixTransport {
    /// Binds a datagram socket at `path`.
    ///
    /// A file already present at `path` is removed first.
    ///
    /// # Socket Options
    /// - `SO_RCVBUF` / `SO_SNDBUF`: `buffer_size` bytes
    /// - Non-blocking: Required for async operations
    ///
    /// # Errors
    /// - `InvalidConfig`: zero buffer size
    /// - `BindFailed`: path unusable or bind refused
    /// - `AddressInUse`: another socket already owns the path
    pub fn bind(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref();
        if buffer_size == 0 {
            return Err(TransportError::invalid_config(
                "buffer_size",
                "must be greater than zero",
            ));
        }

        info!(path = %path.display(), buffer_size, "Binding crypto face socket");

        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Removed stale socket file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(TransportError::bind_failed(path, e.to_string())),
        }

        let socket = Socket::new(Domain::UNIX, Type::DGRAM, None)
            .map_err(|e| TransportError::io("creating Unix datagram socket", e))?;

        socket
            .set_recv_buffer_size(buffer_size)
            .map_err(|e| TransportError::io("setting SO_RCVBUF", e))?;
        socket
            .set_send_buffer_size(buffer_size)
            .map_err(|e| TransportError::io("setting SO_SNDBUF", e))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::io("setting non-blocking", e))?;

        let addr =
            SockAddr::unix(path).map_err(|e| TransportError::bind_failed(path, e.to_string()))?;
        socket.bind(&addr).map_err(|e| {
            if e.kind() == io::ErrorKind::AddrInUse {
                TransportError::AddressInUse {
                    path: path.to_path_buf(),
                }
            } else {
                TransportError::bind_failed(path, e.to_string())
            }
        })?;

        let std_socket: std::os::unix::net::UnixDatagram = socket.into();
        let socket = UnixDatagram::from_std(std_socket)
            .map_err(|e| TransportError::io("converting to Tokio socket", e))?;

        info!(path = %path.display(), "Crypto face socket bound");

        Ok(Self {
            socket,
            path: path.to_path_buf(),
            buffer_size,
            shutdown: AtomicBool::new(false),
        })
    }

    /// Requested kernel buffer size in bytes.
    #[must_use]
    pub const fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Checks if the transport has been shut down.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Transport for UnixTransport {
    async fn recv(&self, buf: &mut [u8]) -> Result<(usize, PacketSource)> {
        if self.is_shutdown() {
            return Err(TransportError::ShuttingDown);
        }

        let (len, addr) = self
            .socket
            .recv_from(buf)
            .await
            .map_err(|e| TransportError::ReceiveFailed {
                reason: e.to_string(),
            })?;

        let source = addr.as_pathname().map(Path::to_path_buf);
        trace!(len, from = ?source, "Received datagram");

        Ok((len, PacketSource::new(source)))
    }

    async fn send(&self, buf: &[u8], dest: &Path) -> Result<usize> {
        if self.is_shutdown() {
            return Err(TransportError::ShuttingDown);
        }

        let len = self
            .socket
            .send_to(buf, dest)
            .await
            .map_err(|e| TransportError::send_failed(dest, e.to_string()))?;

        trace!(len, dest = %dest.display(), "Sent datagram");

        Ok(len)
    }

    fn local_path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }

    async fn shutdown(&self) -> Result<()> {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!(path = %self.path.display(), "Shutting down crypto face socket");

        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove socket file");
            }
        }

        info!("Crypto face socket shutdown complete");
        Ok(())
    }

    fn is_active(&self) -> bool {
        !self.is_shutdown()
    }
}

impl std::fmt::Debug for UnixTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixTransport")
            .field("path", &self.path)
            .field("buffer_size", &self.buffer_size)
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

// ============================================
// Tests
// ============================================

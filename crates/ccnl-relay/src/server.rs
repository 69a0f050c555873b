// ============================================
// File: crates/ccnl-relay/src/server.rs
// ============================================
//! # Relay Orchestrator
//!
//! ## Creation Reason
//! Wires the face table, crypto client and reply dispatcher together and
//! runs the single event loop that talks to the crypto service.
//!
//! ## Main Functionality
//! - `Relay`: Component wiring and lifecycle
//! - Event loop over shutdown, crypto face queue and inbound replies
//! - Graceful shutdown handling
//!
//! ## Relay Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Relay                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │   CryptoClient ──► crypto face queue                        │
//! │                          │                                  │
//! │  ┌───────────────────────┼──────────────────────────────┐  │
//! │  │ Event Loop (select!)  ▼                              │  │
//! │  │   shutdown      flush queue ──► Transport::send ─────┼──┼─► crypto
//! │  │                                                      │  │   service
//! │  │   Transport::recv ──► CryptoDispatcher ◄─────────────┼──┼── replies
//! │  └─────────────────────────┬────────────────────────────┘  │
//! │                            ▼                               │
//! │        faces / content store / pending / management         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - One inbound reply is handled at a time
//! - A bad reply is logged and skipped; it never stops the loop
//! - Failed sends are not retried
//! - All shared components are Arc-wrapped
//!
//! ## Last Modified
//! v0.1.0 - Initial relay implementation

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

use ccnl_core::protocol::dtag::{DEFAULT_CALLBACK, MAX_PACKET_SIZE};
use ccnl_transport::error::TransportError;
use ccnl_transport::{PacketSource, Transport, UnixTransport};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::handlers::{CallbackHandler, CryptoDispatcher, MgmtCryptoHandler};
use crate::node::{
    CcnbPacketParser, ContentStore, LoggingManagement, ManagementProcessor, PacketParser,
    PendingInterests,
};
use crate::services::faces::Face;
use crate::services::{CryptoClient, FaceTable, MemoryContentStore, MemoryPendingInterests};

// ============================================
// Relay
// ============================================

/// The relay's crypto-face runtime.
///
/// # Lifecycle
/// 1. Create with `Relay::new(config)`
/// 2. Start with `relay.run().await`
/// 3. Shutdown via `relay.shutdown()` or Ctrl+C
pub struct Relay {
    config: RelayConfig,
    faces: Arc<FaceTable>,
    client: CryptoClient,
    dispatcher: Arc<CryptoDispatcher>,
    shutdown: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Relay {
    /// Creates a relay backed by in-memory collaborators.
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(MemoryContentStore::new()),
            Arc::new(MemoryPendingInterests::new()),
            Arc::new(CcnbPacketParser),
            Arc::new(LoggingManagement::new()),
        )
    }

    /// Creates a relay whose crypto replies feed the given collaborators.
    ///
    /// The crypto face is created here when `crypto.enabled` is set, and the
    /// built-in handler is registered for `ccnl_mgmt_crypto` and for the
    /// configured callback label.
    pub fn with_collaborators(
        config: RelayConfig,
        store: Arc<dyn ContentStore>,
        pending: Arc<dyn PendingInterests>,
        parser: Arc<dyn PacketParser>,
        management: Arc<dyn ManagementProcessor>,
    ) -> Self {
        let faces = Arc::new(FaceTable::new());
        if config.crypto.enabled {
            faces.create_crypto_face(&config.crypto.service_path);
        }

        let handler: Arc<dyn CallbackHandler> = Arc::new(MgmtCryptoHandler::new(
            Arc::clone(&faces),
            store,
            pending,
            parser,
            management,
        ));
        let dispatcher = Arc::new(CryptoDispatcher::new());
        dispatcher.register(DEFAULT_CALLBACK, Arc::clone(&handler));
        if config.crypto.callback != DEFAULT_CALLBACK {
            dispatcher.register(config.crypto.callback.clone(), handler);
        }

        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            client: CryptoClient::new(Arc::clone(&faces)),
            config,
            faces,
            dispatcher,
            shutdown: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Configuration the relay was built from.
    #[must_use]
    pub const fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Face table shared with the dispatcher.
    #[must_use]
    pub fn faces(&self) -> &Arc<FaceTable> {
        &self.faces
    }

    /// Client for submitting sign and verify requests.
    #[must_use]
    pub const fn client(&self) -> &CryptoClient {
        &self.client
    }

    /// Dispatcher, for registering additional callbacks.
    #[must_use]
    pub fn dispatcher(&self) -> &Arc<CryptoDispatcher> {
        &self.dispatcher
    }

    /// Callback label the relay puts on its own requests.
    #[must_use]
    pub fn callback(&self) -> &str {
        &self.config.crypto.callback
    }

    /// Binds the crypto face socket and runs until Ctrl+C or `shutdown()`.
    ///
    /// # Errors
    /// Returns error if the socket cannot be bound or the loop fails.
    pub async fn run(&self) -> Result<()> {
        info!("Starting ccnl relay v{}", env!("CARGO_PKG_VERSION"));

        if !self.config.crypto.enabled {
            info!("Crypto face disabled, nothing to serve");
            wait_for_shutdown().await?;
            return Ok(());
        }

        let transport = Arc::new(
            UnixTransport::bind(
                &self.config.crypto.socket_path,
                self.config.crypto.buffer_size(),
            )
            .map_err(|e| RelayError::startup_failed(format!("crypto face bind failed: {e}")))?,
        );

        info!(
            socket = %self.config.crypto.socket_path.display(),
            service = %self.config.crypto.service_path.display(),
            "Relay started successfully"
        );

        let serve = self.serve(Arc::clone(&transport) as Arc<dyn Transport>);
        tokio::pin!(serve);

        let result = tokio::select! {
            result = &mut serve => result,
            signal = wait_for_shutdown() => match signal {
                Ok(()) => {
                    info!("Shutting down relay...");
                    self.shutdown();
                    serve.await
                }
                Err(e) => Err(e),
            },
        };

        if let Err(e) = transport.shutdown().await {
            warn!("Crypto face shutdown error: {}", e);
        }

        info!("Relay shutdown complete");
        result
    }

    /// Runs the event loop on `transport` until shutdown.
    ///
    /// # Errors
    /// Returns `CryptoFaceUnavailable` if no crypto face is configured.
    pub async fn serve(&self, transport: Arc<dyn Transport>) -> Result<()> {
        let face = self
            .faces
            .crypto_face()
            .ok_or(RelayError::CryptoFaceUnavailable)?;
        let service_path = self.config.crypto.service_path.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut buf = vec![0u8; MAX_PACKET_SIZE];

        debug!(face_id = %face.id(), "Crypto face loop running");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            flush_face(transport.as_ref(), &face, &service_path).await;

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Crypto face loop received shutdown signal");
                    break;
                }
                () = face.notified() => {}
                result = transport.recv(&mut buf) => {
                    match result {
                        Ok((len, source)) => self.handle_datagram(&buf[..len], &source),
                        Err(TransportError::ShuttingDown) => break,
                        Err(e) => {
                            if !self.shutdown.load(Ordering::SeqCst) {
                                error!("Crypto face receive error: {}", e);
                            }
                        }
                    }
                }
            }
        }

        debug!("Crypto face loop exiting");
        Ok(())
    }

    /// Triggers relay shutdown programmatically.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    fn handle_datagram(&self, data: &[u8], source: &PacketSource) {
        match self.dispatcher.on_crypto_reply(data) {
            Ok(outcome) => debug!(?outcome, len = data.len(), "Crypto reply handled"),
            Err(e) if e.is_decode_error() => warn!(
                error = %e,
                from = ?source.path,
                len = data.len(),
                "Malformed crypto reply rejected"
            ),
            Err(e) if e.is_retryable() => warn!(
                error = %e,
                len = data.len(),
                "Crypto reply dropped, try again later"
            ),
            Err(e) => error!(error = %e, len = data.len(), "Crypto reply handling failed"),
        }
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("socket_path", &self.config.crypto.socket_path)
            .field("service_path", &self.config.crypto.service_path)
            .field("faces", &self.faces.count())
            .finish()
    }
}

/// Sends every packet queued on the crypto face to the service.
async fn flush_face(transport: &dyn Transport, face: &Face, service_path: &Path) {
    for packet in face.drain() {
        match transport.send(&packet, service_path).await {
            Ok(len) => trace!(len, "Crypto request sent"),
            Err(e) => warn!(error = %e, "Failed to send crypto request"),
        }
    }
}

/// Waits for Ctrl+C.
async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");
    Ok(())
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bytes::Bytes;
    use sha2::{Digest, Sha256};

    use ccnl_common::{Correlation, FaceId};
    use ccnl_core::protocol::content::{parse_content_object, Name};
    use ccnl_core::protocol::dtag;
    use ccnl_core::protocol::reply::build_sign_reply;
    use ccnl_core::protocol::request::parse_request;
    use ccnl_core::protocol::TlvWriter;
    use ccnl_transport::MockTransport;

    fn spawn_relay(
        relay: &Arc<Relay>,
        transport: &Arc<MockTransport>,
    ) -> tokio::task::JoinHandle<Result<()>> {
        let relay = Arc::clone(relay);
        let transport = Arc::clone(transport) as Arc<dyn Transport>;
        tokio::spawn(async move { relay.serve(transport).await })
    }

    /// Answers one captured request the way the crypto service would.
    fn answer(request: &[u8]) -> Vec<u8> {
        let req = parse_request(request).unwrap();
        let digest = Sha256::digest(&req.content);
        build_sign_reply(&req.callback, req.correlation, &digest, &req.content)
            .unwrap()
            .to_vec()
    }

    async fn wait_for_queued(face: &Face, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while face.queued() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    fn body() -> Bytes {
        let mut w = TlvWriter::new();
        w.text(dtag::COMPONENT, "greeting").blob(dtag::CONTENT, b"hello");
        w.finish().unwrap()
    }

    #[tokio::test]
    async fn test_sign_round_trip_through_loop() {
        let relay = Arc::new(Relay::new(RelayConfig::default()));
        let transport = Arc::new(MockTransport::new("/tmp/.ccnl-relay-crypto.sock"));
        let requester = relay.faces().add_with_id(FaceId::new(7), "udp://10.0.0.7:9695");
        let task = spawn_relay(&relay, &transport);

        relay
            .client()
            .request_sign(&body(), relay.callback(), Correlation::ForFace(FaceId::new(7)))
            .unwrap();

        tokio::time::timeout(Duration::from_secs(2), transport.wait_for_sent(1))
            .await
            .unwrap();
        let sent = transport.take_sent_packets();
        assert_eq!(sent[0].1, relay.config().crypto.service_path);

        transport.inject_packet(answer(&sent[0].0), None);
        wait_for_queued(&requester, 1).await;

        let parsed = parse_content_object(&requester.drain()[0]).unwrap();
        assert_eq!(parsed.name, Name::from_uri("/greeting"));
        assert!(parsed.signature.is_some());

        relay.shutdown();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_bad_reply_does_not_stop_loop() {
        let relay = Arc::new(Relay::new(RelayConfig::default()));
        let transport = Arc::new(MockTransport::new("/tmp/.ccnl-relay-crypto.sock"));
        let requester = relay.faces().add("udp://10.0.0.2:9695");
        let task = spawn_relay(&relay, &transport);

        transport.inject_packet(vec![0xde, 0xad, 0xbe, 0xef], None);
        transport.inject_packet(Vec::new(), None);

        let reply = build_sign_reply(
            DEFAULT_CALLBACK,
            Correlation::ForFace(requester.id()),
            b"sig",
            &body(),
        )
        .unwrap();
        transport.inject_packet(reply.to_vec(), None);

        wait_for_queued(&requester, 1).await;
        assert!(!task.is_finished());

        relay.shutdown();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_transport_shutdown_ends_loop() {
        let relay = Arc::new(Relay::new(RelayConfig::default()));
        let transport = Arc::new(MockTransport::new("/tmp/.ccnl-relay-crypto.sock"));
        let task = spawn_relay(&relay, &transport);

        transport.shutdown().await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_serve_requires_crypto_face() {
        let mut config = RelayConfig::default();
        config.crypto.enabled = false;
        let relay = Relay::new(config);
        assert!(relay.faces().crypto_face().is_none());

        let transport = Arc::new(MockTransport::new("/tmp/.ccnl-relay-crypto.sock"));
        let result = relay.serve(transport).await;
        assert!(matches!(result, Err(RelayError::CryptoFaceUnavailable)));

        let err = relay
            .client()
            .request_sign(b"x", DEFAULT_CALLBACK, Correlation::ForFace(FaceId::new(1)))
            .unwrap_err();
        assert!(matches!(err, RelayError::CryptoFaceUnavailable));
    }

    #[tokio::test]
    async fn test_shutdown_before_serve() {
        let relay = Relay::new(RelayConfig::default());
        relay.shutdown();

        let transport = Arc::new(MockTransport::new("/tmp/.ccnl-relay-crypto.sock"));
        tokio::time::timeout(Duration::from_secs(1), relay.serve(transport))
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_custom_callback_is_registered() {
        let mut config = RelayConfig::default();
        config.crypto.callback = "relay_signing".to_string();
        let relay = Relay::new(config);

        assert!(relay.dispatcher().is_registered(DEFAULT_CALLBACK));
        assert!(relay.dispatcher().is_registered("relay_signing"));
        assert_eq!(relay.callback(), "relay_signing");
    }
}

// ============================================
// File: crates/ccnl-relay/src/handlers/crypto.rs
// ============================================
//! # Crypto Reply Dispatcher
//!
//! ## Creation Reason
//! Replies from the crypto service carry no session state. The callback
//! label picks a handler, and the signed correlation value inside the
//! reply decides where the result goes.
//!
//! ## Main Functionality
//! - `CryptoDispatcher`: Callback registry and reply entry point
//! - `MgmtCryptoHandler`: Built-in handler for `ccnl_mgmt_crypto`
//! - `DispatchOutcome` / `DropReason`: What happened to a reply
//!
//! ## Reply Routing
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ on_crypto_reply(raw)                                         │
//! │   │                                                          │
//! │   ├─ envelope walk fails ──────────────► Err (malformed)     │
//! │   ├─ callback not registered ──────────► Dropped(Callback)   │
//! │   ▼                                                          │
//! │ handler                                                      │
//! │   ├─ verify ─► rewrap as Name ─► management processor        │
//! │   │                                 (verified flag carried)  │
//! │   └─ sign ──► signed content object                          │
//! │        ├─ correlation ≥ 0 ─► face found? ─► Forwarded        │
//! │        │                          └─ no ──► Dropped(Face)    │
//! │        └─ correlation < 0 ─► parse ─► /debug/seqnum-N        │
//! │                               ─► store ─► serve pending      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - One pass per reply; nothing is remembered between replies
//! - A face can disappear between request and reply; that is a drop,
//!   never an error
//! - A parse failure on self-originated content must leave the store as
//!   it was
//!
//! ## Last Modified
//! v0.1.0 - Initial dispatcher

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use ccnl_common::{Correlation, FaceId};
use ccnl_core::error::CoreError;
use ccnl_core::protocol::content::{
    build_signed_content_object, command_verb, wrap_as_name, Name,
};
use ccnl_core::protocol::reply::{
    extract_embedded_message, extract_operation_and_callback, extract_sign_reply,
    extract_verify_reply,
};
use ccnl_core::{CryptoEnvelope, Operation};

use crate::error::Result;
use crate::node::{
    ContentEntry, ContentStore, ManagementCommand, ManagementProcessor, PacketParser,
    PendingInterests,
};
use crate::services::faces::FaceTable;

/// First name component of self-originated content.
pub const DEBUG_PREFIX: &str = "debug";

// ============================================
// Outcomes
// ============================================

/// Why a well-formed reply went nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No handler is registered for the callback label.
    UnknownCallback,
    /// The correlation names a face that no longer exists.
    UnknownFace,
    /// The content store refused the entry.
    StoreRejected,
}

/// Terminal state of one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Signed content queued on the requesting face.
    Forwarded(FaceId),
    /// Self-originated content stored and pending interests served.
    Cached {
        /// Name the content was stored under.
        name: Name,
        /// Faces served from the pending-interest table.
        served: usize,
    },
    /// Verify result handed to the management processor.
    CommandDispatched {
        /// Verdict passed along with the command.
        verified: bool,
    },
    /// Nothing was delivered.
    Dropped(DropReason),
}

// ============================================
// CallbackHandler
// ============================================

/// Handles replies addressed to one callback label.
pub trait CallbackHandler: Send + Sync {
    /// Consumes the rest of the envelope.
    ///
    /// # Errors
    /// Malformed section contents or a downstream failure.
    fn handle(&self, envelope: CryptoEnvelope<'_>) -> Result<DispatchOutcome>;
}

// ============================================
// CryptoDispatcher
// ============================================

/// Entry point for every datagram arriving from the crypto service.
pub struct CryptoDispatcher {
    handlers: DashMap<String, Arc<dyn CallbackHandler>>,
}

impl CryptoDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Registers `handler` for `callback`, returning the handler it replaces.
    pub fn register(
        &self,
        callback: impl Into<String>,
        handler: Arc<dyn CallbackHandler>,
    ) -> Option<Arc<dyn CallbackHandler>> {
        let callback = callback.into();
        debug!(callback = %callback, "Registered crypto callback");
        self.handlers.insert(callback, handler)
    }

    /// Returns `true` if `callback` has a handler.
    #[must_use]
    pub fn is_registered(&self, callback: &str) -> bool {
        self.handlers.contains_key(callback)
    }

    /// Dispatches one reply.
    ///
    /// # Errors
    /// Returns the decode error for a malformed reply, or the handler's error.
    pub fn on_crypto_reply(&self, raw: &[u8]) -> Result<DispatchOutcome> {
        let envelope = extract_operation_and_callback(raw)?;
        if envelope.is_request() {
            return Err(CoreError::malformed("request envelope received from crypto service").into());
        }

        debug!(
            callback = %envelope.callback(),
            operation = %envelope.operation(),
            "Crypto reply"
        );

        // Clone out of the map so no guard is held while the handler runs
        let handler = self
            .handlers
            .get(envelope.callback())
            .map(|h| Arc::clone(h.value()));

        let Some(handler) = handler else {
            warn!(callback = %envelope.callback(), "No handler for crypto callback");
            return Ok(DispatchOutcome::Dropped(DropReason::UnknownCallback));
        };

        handler.handle(envelope)
    }
}

impl Default for CryptoDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CryptoDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callbacks: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("CryptoDispatcher")
            .field("callbacks", &callbacks)
            .finish()
    }
}

// ============================================
// MgmtCryptoHandler
// ============================================

/// Handler for replies to relay-issued requests.
pub struct MgmtCryptoHandler {
    faces: Arc<FaceTable>,
    store: Arc<dyn ContentStore>,
    pending: Arc<dyn PendingInterests>,
    parser: Arc<dyn PacketParser>,
    management: Arc<dyn ManagementProcessor>,
}

impl MgmtCryptoHandler {
    /// Creates a handler that feeds replies into the given collaborators.
    pub fn new(
        faces: Arc<FaceTable>,
        store: Arc<dyn ContentStore>,
        pending: Arc<dyn PendingInterests>,
        parser: Arc<dyn PacketParser>,
        management: Arc<dyn ManagementProcessor>,
    ) -> Self {
        Self {
            faces,
            store,
            pending,
            parser,
            management,
        }
    }

    fn handle_verify(&self, mut envelope: CryptoEnvelope<'_>) -> Result<DispatchOutcome> {
        let (correlation, verified) = extract_verify_reply(&mut envelope)?;
        let command = extract_embedded_message(&mut envelope)?;

        let packet = wrap_as_name(command)?;
        let parsed = self.parser.parse(&packet)?;
        let verb = command_verb(&parsed.name);

        // Self-originated or vanished faces both resolve to no face
        let face = correlation
            .face()
            .and_then(|id| self.faces.get(id))
            .map(|f| f.id());

        debug!(
            correlation = %correlation,
            verified,
            verb = verb.as_deref().unwrap_or(""),
            "Dispatching verified command"
        );

        self.management.handle_command(ManagementCommand {
            packet,
            verb,
            face,
            verified,
        });
        Ok(DispatchOutcome::CommandDispatched { verified })
    }

    fn handle_sign(&self, mut envelope: CryptoEnvelope<'_>) -> Result<DispatchOutcome> {
        let (correlation, signature) = extract_sign_reply(&mut envelope)?;
        let embedded = extract_embedded_message(&mut envelope)?;
        let packet = build_signed_content_object(&signature, embedded)?;

        match correlation {
            Correlation::ForFace(id) => {
                let Some(face) = self.faces.get(id) else {
                    warn!(face_id = %id, "Signed content for unknown face dropped");
                    return Ok(DispatchOutcome::Dropped(DropReason::UnknownFace));
                };
                face.enqueue(packet)?;
                debug!(
                    face_id = %id,
                    sig = %hex::encode(&signature[..signature.len().min(8)]),
                    sig_len = signature.len(),
                    "Signed content forwarded"
                );
                Ok(DispatchOutcome::Forwarded(id))
            }
            Correlation::SelfOriginated(_) => self.cache_self_originated(correlation, packet),
        }
    }

    fn cache_self_originated(
        &self,
        correlation: Correlation,
        packet: Bytes,
    ) -> Result<DispatchOutcome> {
        let parsed = match self.parser.parse(&packet) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(correlation = %correlation, error = %e, "Signed content failed to parse");
                return Err(e.into());
            }
        };

        let mut entry = ContentEntry::from_parsed(parsed);
        entry.name = Name::from_components(vec![
            Bytes::from_static(DEBUG_PREFIX.as_bytes()),
            Bytes::from(correlation.debug_label().unwrap_or_default()),
        ]);

        if !self.store.insert(entry.clone()) {
            warn!(name = %entry.name, "Content store rejected signed content");
            return Ok(DispatchOutcome::Dropped(DropReason::StoreRejected));
        }

        let served = self.pending.serve(&entry, &self.faces);
        info!(name = %entry.name, served, "Self-originated content cached");
        Ok(DispatchOutcome::Cached {
            name: entry.name,
            served,
        })
    }
}

impl CallbackHandler for MgmtCryptoHandler {
    fn handle(&self, envelope: CryptoEnvelope<'_>) -> Result<DispatchOutcome> {
        match envelope.operation() {
            Operation::Verify => self.handle_verify(envelope),
            Operation::Sign => self.handle_sign(envelope),
        }
    }
}

impl std::fmt::Debug for MgmtCryptoHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MgmtCryptoHandler")
            .field("faces", &self.faces.count())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use parking_lot::Mutex;
    use sha2::{Digest, Sha256};

    use ccnl_core::protocol::content::parse_content_object;
    use ccnl_core::protocol::dtag::{self, DEFAULT_CALLBACK};
    use ccnl_core::protocol::reply::{build_sign_reply, build_verify_reply};
    use ccnl_core::protocol::request::{encode_envelope, parse_request};
    use ccnl_core::protocol::tlv::TlvWriter;

    use crate::error::RelayError;
    use crate::node::CcnbPacketParser;
    use crate::services::crypto::CryptoClient;
    use crate::services::faces::Face;
    use crate::services::store::{MemoryContentStore, MemoryPendingInterests};

    #[derive(Default)]
    struct RecordingManagement {
        commands: Mutex<Vec<ManagementCommand>>,
    }

    impl ManagementProcessor for RecordingManagement {
        fn handle_command(&self, command: ManagementCommand) {
            self.commands.lock().push(command);
        }
    }

    /// Stand-in crypto service: the "signature" is the SHA-256 of the content.
    fn serve_request(request: &[u8]) -> Bytes {
        let req = parse_request(request).unwrap();
        let digest = Sha256::digest(&req.content);
        match req.signature {
            None => build_sign_reply(&req.callback, req.correlation, &digest, &req.content),
            Some(sig) => build_verify_reply(
                &req.callback,
                req.correlation,
                sig[..] == digest[..],
                &req.content,
            ),
        }
        .unwrap()
    }

    struct Harness {
        faces: Arc<FaceTable>,
        crypto: Arc<Face>,
        client: CryptoClient,
        store: Arc<MemoryContentStore>,
        pending: Arc<MemoryPendingInterests>,
        management: Arc<RecordingManagement>,
        dispatcher: CryptoDispatcher,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_store(MemoryContentStore::new())
        }

        fn with_store(store: MemoryContentStore) -> Self {
            let faces = Arc::new(FaceTable::new());
            let crypto = faces.create_crypto_face(Path::new("/tmp/.ccnl-crypto-server.sock"));
            let store = Arc::new(store);
            let pending = Arc::new(MemoryPendingInterests::new());
            let management = Arc::new(RecordingManagement::default());

            let dispatcher = CryptoDispatcher::new();
            dispatcher.register(
                DEFAULT_CALLBACK,
                Arc::new(MgmtCryptoHandler::new(
                    Arc::clone(&faces),
                    Arc::clone(&store) as Arc<dyn ContentStore>,
                    Arc::clone(&pending) as Arc<dyn PendingInterests>,
                    Arc::new(CcnbPacketParser),
                    Arc::clone(&management) as Arc<dyn ManagementProcessor>,
                )),
            );

            Self {
                client: CryptoClient::new(Arc::clone(&faces)),
                faces,
                crypto,
                store,
                pending,
                management,
                dispatcher,
            }
        }

        /// Sends everything queued on the crypto face through the service
        /// and feeds each reply to the dispatcher.
        fn round_trip(&self) -> Vec<Result<DispatchOutcome>> {
            self.crypto
                .drain()
                .iter()
                .map(|req| self.dispatcher.on_crypto_reply(&serve_request(req)))
                .collect()
        }
    }

    fn content_body(components: &[&str], payload: &[u8]) -> Bytes {
        let mut w = TlvWriter::new();
        for c in components {
            w.text(dtag::COMPONENT, c);
        }
        w.blob(dtag::CONTENT, payload);
        w.finish().unwrap()
    }

    fn command_body(components: &[&str]) -> Bytes {
        let mut w = TlvWriter::new();
        for c in components {
            w.text(dtag::COMPONENT, c);
        }
        w.finish().unwrap()
    }

    #[test]
    fn test_raw_sign_reply_for_face_seven() {
        let h = Harness::new();
        let requester = h.faces.add_with_id(FaceId::new(7), "udp://10.0.0.7:9695");

        let reply = build_sign_reply(
            DEFAULT_CALLBACK,
            Correlation::ForFace(FaceId::new(7)),
            b"SIGABCDE",
            b"hello",
        )
        .unwrap();
        let outcome = h.dispatcher.on_crypto_reply(&reply).unwrap();
        assert_eq!(outcome, DispatchOutcome::Forwarded(FaceId::new(7)));

        let delivered = requester.drain();
        assert_eq!(delivered.len(), 1);
        let expected =
            ccnl_core::protocol::content::build_signed_content_object(b"SIGABCDE", b"hello")
                .unwrap();
        assert_eq!(delivered[0], expected);
        for needle in [&b"SHA256"[..], b"SIGABCDE", b"hello"] {
            assert!(
                delivered[0].windows(needle.len()).any(|w| w == needle),
                "{:?} missing",
                String::from_utf8_lossy(needle)
            );
        }
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_sign_reply_forwarded_to_face() {
        let h = Harness::new();
        let requester = h.faces.add_with_id(FaceId::new(7), "udp://10.0.0.7:9695");
        let body = content_body(&["news", "today"], b"headline");

        h.client
            .request_sign(&body, DEFAULT_CALLBACK, Correlation::ForFace(FaceId::new(7)))
            .unwrap();
        let outcomes = h.round_trip();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            *outcomes[0].as_ref().unwrap(),
            DispatchOutcome::Forwarded(FaceId::new(7))
        );

        let delivered = requester.drain();
        assert_eq!(delivered.len(), 1);
        let parsed = parse_content_object(&delivered[0]).unwrap();
        assert_eq!(parsed.name.to_string(), "/news/today");
        assert_eq!(&parsed.content[..], b"headline");
        let signature = parsed.signature.unwrap();
        assert_eq!(signature.algorithm, "SHA256");
        assert!(signature.witness.is_empty());
        assert_eq!(&signature.bits[..], &Sha256::digest(&body)[..]);
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_sign_reply_for_unknown_face_dropped() {
        let h = Harness::new();
        h.client
            .request_sign(b"x", DEFAULT_CALLBACK, Correlation::ForFace(FaceId::new(99)))
            .unwrap();

        let outcome = h.round_trip().remove(0).unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::UnknownFace));
    }

    #[test]
    fn test_face_removed_before_reply() {
        let h = Harness::new();
        let face = h.faces.add("udp://10.0.0.3:9695");
        h.client
            .request_sign(b"x", DEFAULT_CALLBACK, Correlation::ForFace(face.id()))
            .unwrap();
        h.faces.remove(face.id());

        let outcome = h.round_trip().remove(0).unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::UnknownFace));
        assert_eq!(face.queued(), 0);
    }

    #[test]
    fn test_self_originated_sign_is_cached() {
        let h = Harness::new();
        let waiting = h.faces.add("udp://10.0.0.9:9695");
        h.pending.add(Name::from_uri("/debug"), waiting.id());

        let body = content_body(&["sensor", "temp"], b"21.5");
        h.client
            .request_sign(&body, DEFAULT_CALLBACK, Correlation::from_wire(-42).unwrap())
            .unwrap();

        let outcome = h.round_trip().remove(0).unwrap();
        let name = Name::from_uri("/debug/seqnum-42");
        assert_eq!(
            outcome,
            DispatchOutcome::Cached {
                name: name.clone(),
                served: 1
            }
        );

        let entry = h.store.get(&name).unwrap();
        assert_eq!(&entry.content[..], b"21.5");
        assert_eq!(waiting.drain(), vec![entry.packet.clone()]);
        assert!(h.pending.is_empty());
    }

    #[test]
    fn test_self_originated_parse_failure_leaves_store_untouched() {
        let h = Harness::new();
        // 0xff is a header byte with the invalid kind 7
        let reply = build_sign_reply(
            DEFAULT_CALLBACK,
            Correlation::from_wire(-1).unwrap(),
            b"sig",
            &[0xff],
        )
        .unwrap();

        let result = h.dispatcher.on_crypto_reply(&reply);
        assert!(matches!(result, Err(RelayError::Core(_))));
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_self_originated_store_rejected() {
        let h = Harness::with_store(MemoryContentStore::with_capacity(0));
        let waiting = h.faces.add("udp://10.0.0.9:9695");
        h.pending.add(Name::from_uri("/debug"), waiting.id());

        h.client
            .request_sign(
                &content_body(&["a"], b"b"),
                DEFAULT_CALLBACK,
                Correlation::from_wire(-3).unwrap(),
            )
            .unwrap();

        let outcome = h.round_trip().remove(0).unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::StoreRejected));
        assert_eq!(waiting.queued(), 0);
        assert_eq!(h.pending.len(), 1);
    }

    #[test]
    fn test_verify_reply_reaches_management() {
        let h = Harness::new();
        let origin = h.faces.add("udp://10.0.0.5:9695");
        let command = command_body(&["ccnx", "node-1", "newface", "udp"]);
        let signature = Sha256::digest(&command);

        h.client
            .request_verify(
                &command,
                &signature,
                DEFAULT_CALLBACK,
                Correlation::ForFace(origin.id()),
            )
            .unwrap();

        let outcome = h.round_trip().remove(0).unwrap();
        assert_eq!(outcome, DispatchOutcome::CommandDispatched { verified: true });

        let commands = h.management.commands.lock();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].verb.as_deref(), Some("newface"));
        assert_eq!(commands[0].face, Some(origin.id()));
        assert!(commands[0].verified);

        let rewrapped = parse_content_object(&commands[0].packet).unwrap();
        assert_eq!(rewrapped.name.to_string(), "/ccnx/node-1/newface/udp");
    }

    #[test]
    fn test_failed_verification_still_forwarded() {
        let h = Harness::new();
        let origin = h.faces.add("udp://10.0.0.5:9695");
        let command = command_body(&["ccnx", "node-1", "destroyface"]);

        h.client
            .request_verify(
                &command,
                b"not the digest",
                DEFAULT_CALLBACK,
                Correlation::ForFace(origin.id()),
            )
            .unwrap();

        let outcome = h.round_trip().remove(0).unwrap();
        assert_eq!(outcome, DispatchOutcome::CommandDispatched { verified: false });

        let commands = h.management.commands.lock();
        assert!(!commands[0].verified);
        assert_eq!(commands[0].verb.as_deref(), Some("destroyface"));
    }

    #[test]
    fn test_verify_without_face() {
        let h = Harness::new();
        let command = command_body(&["ccnx", "node-1", "prefixreg"]);

        for correlation in [
            Correlation::from_wire(-8).unwrap(),
            Correlation::ForFace(FaceId::new(4242)),
        ] {
            let reply = build_verify_reply(DEFAULT_CALLBACK, correlation, true, &command).unwrap();
            h.dispatcher.on_crypto_reply(&reply).unwrap();
        }

        let commands = h.management.commands.lock();
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| c.face.is_none()));
    }

    #[test]
    fn test_long_verb_is_replaced() {
        let h = Harness::new();
        let long = "v".repeat(600);
        let command = command_body(&["ccnx", "node-1", &long]);
        let reply = build_verify_reply(
            DEFAULT_CALLBACK,
            Correlation::ForFace(FaceId::new(1)),
            true,
            &command,
        )
        .unwrap();

        h.dispatcher.on_crypto_reply(&reply).unwrap();
        let commands = h.management.commands.lock();
        assert_eq!(commands[0].verb.as_deref(), Some("cmd-is-too-long-to-display"));
    }

    #[test]
    fn test_short_command_has_no_verb() {
        let h = Harness::new();
        let reply = build_verify_reply(
            DEFAULT_CALLBACK,
            Correlation::ForFace(FaceId::new(1)),
            true,
            &command_body(&["ccnx"]),
        )
        .unwrap();

        h.dispatcher.on_crypto_reply(&reply).unwrap();
        assert!(h.management.commands.lock()[0].verb.is_none());
    }

    #[test]
    fn test_bad_verified_flag_is_rejected() {
        let h = Harness::new();
        let command = command_body(&["ccnx", "node-1", "newface"]);

        for flag in ["2", "yes", ""] {
            let mut section = TlvWriter::new();
            section
                .text(dtag::SEQNO, "1")
                .text(dtag::VERIFIED, flag)
                .blob(dtag::CONTENT, &command);
            let section = section.finish().unwrap();
            let reply =
                encode_envelope(dtag::CONTENT_OBJ, Operation::Verify, DEFAULT_CALLBACK, &section)
                    .unwrap();

            let result = h.dispatcher.on_crypto_reply(&reply);
            assert!(result.unwrap_err().is_decode_error(), "flag {flag:?} accepted");
        }
        assert!(h.management.commands.lock().is_empty());
    }

    #[test]
    fn test_unknown_callback_dropped() {
        let h = Harness::new();
        let face = h.faces.add("udp://10.0.0.2:9695");
        let reply = build_sign_reply(
            "some_other_callback",
            Correlation::ForFace(face.id()),
            b"sig",
            &content_body(&["a"], b"b"),
        )
        .unwrap();

        let outcome = h.dispatcher.on_crypto_reply(&reply).unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::UnknownCallback));
        assert_eq!(face.queued(), 0);
    }

    #[test]
    fn test_malformed_replies_are_errors() {
        let h = Harness::new();
        let face = h.faces.add("udp://10.0.0.2:9695");
        let reply = build_sign_reply(
            DEFAULT_CALLBACK,
            Correlation::ForFace(face.id()),
            b"sig",
            &content_body(&["a"], b"b"),
        )
        .unwrap();

        for len in [0, 1, reply.len() / 2, reply.len() - 1] {
            let result = h.dispatcher.on_crypto_reply(&reply[..len]);
            assert!(result.is_err(), "prefix of {len} bytes accepted");
        }
        assert_eq!(face.queued(), 0);

        // A request envelope is not a reply
        let request = ccnl_core::protocol::request::build_sign_request(
            Correlation::ForFace(face.id()),
            b"x",
            DEFAULT_CALLBACK,
        )
        .unwrap();
        assert!(h.dispatcher.on_crypto_reply(&request).is_err());
    }

    #[test]
    fn test_register_replaces_handler() {
        struct Noop;
        impl CallbackHandler for Noop {
            fn handle(&self, _envelope: CryptoEnvelope<'_>) -> Result<DispatchOutcome> {
                Ok(DispatchOutcome::Dropped(DropReason::UnknownCallback))
            }
        }

        let dispatcher = CryptoDispatcher::new();
        assert!(!dispatcher.is_registered("custom"));
        assert!(dispatcher.register("custom", Arc::new(Noop)).is_none());
        assert!(dispatcher.register("custom", Arc::new(Noop)).is_some());
        assert!(dispatcher.is_registered("custom"));
    }
}

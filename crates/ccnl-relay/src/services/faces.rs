// ============================================
// File: crates/ccnl-relay/src/services/faces.rs
// ============================================
//! # Face Table
//!
//! ## Creation Reason
//! Keeps the relay's faces addressable by id so crypto replies can be
//! routed back to the face that asked, and so the crypto face itself can
//! be found when a request is submitted.
//!
//! ## Main Functionality
//! - `Face`: One endpoint with a bounded outbound queue
//! - `FaceTable`: Id-keyed face registry using DashMap
//! - `FaceStats`: Per-face traffic counters
//!
//! ## Face Table Structure
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Face Table                       │
//! ├──────────┬──────────────────────────────┬───────────┤
//! │ Face ID  │ Endpoint                     │ Static    │
//! ├──────────┼──────────────────────────────┼───────────┤
//! │ 1        │ /tmp/.ccnl-crypto-server.sock│ yes       │ ◄── crypto face
//! │ 7        │ udp://10.0.0.7:9695          │ no        │
//! └──────────┴──────────────────────────────┴───────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Faces can be removed at any time; a missing id means "unroutable"
//! - Never hold a DashMap guard across an await point
//! - Queued packets are drained by whoever owns the face's endpoint
//!
//! ## Last Modified
//! v0.1.0 - Initial face table

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tracing::{debug, info, trace, warn};

use ccnl_common::FaceId;

use crate::error::{RelayError, Result};

/// Default number of packets a face may hold before enqueue fails.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

// ============================================
// FaceStats
// ============================================

/// Traffic counters for a face.
#[derive(Debug, Default)]
pub struct FaceStats {
    /// Packets accepted onto the queue.
    pub packets_queued: AtomicU64,
    /// Bytes accepted onto the queue.
    pub bytes_queued: AtomicU64,
    /// Packets rejected because the queue was full.
    pub packets_dropped: AtomicU64,
}

// ============================================
// Face
// ============================================

/// A relay face with its outbound queue.
pub struct Face {
    id: FaceId,
    endpoint: String,
    is_static: bool,
    capacity: usize,
    queue: Mutex<VecDeque<Bytes>>,
    notify: Notify,
    stats: FaceStats,
}

impl Face {
    /// Creates a face with an empty queue.
    #[must_use]
    pub fn new(id: FaceId, endpoint: impl Into<String>, is_static: bool, capacity: usize) -> Self {
        Self {
            id,
            endpoint: endpoint.into(),
            is_static,
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(16))),
            notify: Notify::new(),
            stats: FaceStats::default(),
        }
    }

    /// Face id.
    #[must_use]
    pub const fn id(&self) -> FaceId {
        self.id
    }

    /// Endpoint label, e.g. the crypto service socket path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Static faces are never expired by the relay.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.is_static
    }

    /// Traffic counters.
    #[must_use]
    pub const fn stats(&self) -> &FaceStats {
        &self.stats
    }

    /// Appends a packet to the outbound queue and wakes the drainer.
    ///
    /// # Errors
    /// Returns `FaceQueueFull` when `capacity` packets are already queued.
    pub fn enqueue(&self, packet: Bytes) -> Result<()> {
        let mut queue = self.queue.lock();
        if queue.len() >= self.capacity {
            drop(queue);
            self.stats.packets_dropped.fetch_add(1, Ordering::Relaxed);
            warn!(face_id = %self.id, capacity = self.capacity, "Face queue full, packet dropped");
            return Err(RelayError::FaceQueueFull {
                face_id: self.id,
                capacity: self.capacity,
            });
        }

        let len = packet.len();
        queue.push_back(packet);
        drop(queue);

        self.stats.packets_queued.fetch_add(1, Ordering::Relaxed);
        self.stats.bytes_queued.fetch_add(len as u64, Ordering::Relaxed);
        trace!(face_id = %self.id, len, "Packet queued on face");

        self.notify.notify_one();
        Ok(())
    }

    /// Removes and returns every queued packet, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Bytes> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of packets waiting.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Resolves once a packet has been queued since the last wakeup.
    ///
    /// A wakeup issued while nobody waits is kept, so a drainer that checks
    /// the queue and then awaits this never misses a packet.
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("static", &self.is_static)
            .field("queued", &self.queued())
            .finish()
    }
}

// ============================================
// FaceTable
// ============================================

/// Id-keyed registry of faces.
pub struct FaceTable {
    faces: DashMap<FaceId, Arc<Face>>,
    next_id: AtomicU32,
    crypto_face: RwLock<Option<FaceId>>,
    queue_capacity: usize,
}

impl FaceTable {
    /// Creates an empty table using [`DEFAULT_QUEUE_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates an empty table whose faces hold `capacity` packets each.
    #[must_use]
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            faces: DashMap::new(),
            next_id: AtomicU32::new(1),
            crypto_face: RwLock::new(None),
            queue_capacity: capacity.max(1),
        }
    }

    /// Adds a dynamic face under the next free id.
    pub fn add(&self, endpoint: impl Into<String>) -> Arc<Face> {
        self.insert(self.allocate_id(), endpoint.into(), false)
    }

    /// Adds a face under a caller-chosen id, replacing any face with that id.
    pub fn add_with_id(&self, id: FaceId, endpoint: impl Into<String>) -> Arc<Face> {
        self.next_id.fetch_max(id.get().saturating_add(1), Ordering::AcqRel);
        self.insert(id, endpoint.into(), false)
    }

    /// Creates the static face leading to the crypto service at `path`.
    ///
    /// Replaces the previous crypto face, if any.
    pub fn create_crypto_face(&self, path: &Path) -> Arc<Face> {
        let face = self.insert(self.allocate_id(), path.display().to_string(), true);

        let previous = self.crypto_face.write().replace(face.id());
        if let Some(old) = previous {
            self.faces.remove(&old);
            debug!(face_id = %old, "Replaced previous crypto face");
        }

        info!(face_id = %face.id(), path = %path.display(), "Crypto face created");
        face
    }

    /// Looks up a face.
    #[must_use]
    pub fn get(&self, id: FaceId) -> Option<Arc<Face>> {
        self.faces.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Removes a face, returning it if it was present.
    pub fn remove(&self, id: FaceId) -> Option<Arc<Face>> {
        let removed = self.faces.remove(&id).map(|(_, face)| face);

        if removed.is_some() {
            let mut crypto = self.crypto_face.write();
            if *crypto == Some(id) {
                *crypto = None;
                info!(face_id = %id, "Crypto face removed");
            } else {
                debug!(face_id = %id, "Face removed");
            }
        }

        removed
    }

    /// Queues `packet` on face `id`.
    ///
    /// # Errors
    /// - `FaceNotFound` if no such face exists
    /// - `FaceQueueFull` if the face's queue is at capacity
    pub fn enqueue(&self, id: FaceId, packet: Bytes) -> Result<()> {
        let face = self.get(id).ok_or(RelayError::FaceNotFound(id))?;
        face.enqueue(packet)
    }

    /// The crypto face, if configured and still present.
    #[must_use]
    pub fn crypto_face(&self) -> Option<Arc<Face>> {
        let id = (*self.crypto_face.read())?;
        self.get(id)
    }

    /// Returns the number of faces.
    #[must_use]
    pub fn count(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if there are no faces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn allocate_id(&self) -> FaceId {
        loop {
            let id = FaceId::new(self.next_id.fetch_add(1, Ordering::AcqRel));
            if !self.faces.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&self, id: FaceId, endpoint: String, is_static: bool) -> Arc<Face> {
        let face = Arc::new(Face::new(id, endpoint, is_static, self.queue_capacity));
        if self.faces.insert(id, Arc::clone(&face)).is_some() {
            debug!(face_id = %id, "Face replaced");
        } else {
            debug!(face_id = %id, endpoint = %face.endpoint(), "Face added");
        }
        face
    }
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FaceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceTable")
            .field("faces", &self.count())
            .field("crypto_face", &*self.crypto_face.read())
            .finish()
    }
}

// ============================================
// Tests
// ============================================

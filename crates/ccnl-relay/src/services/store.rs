// ============================================
// File: crates/ccnl-relay/src/services/store.rs
// ============================================
//! # In-Memory Content Store and Pending Interests
//!
//! ## Creation Reason
//! The standalone relay binary and the tests need a content store and a
//! pending-interest table behind the collaborator traits. These keep
//! everything in memory.
//!
//! ## Main Functionality
//! - `MemoryContentStore`: Name-keyed cache with a fixed capacity
//! - `MemoryPendingInterests`: Prefix to waiting faces; serving consumes
//!
//! ## ⚠️ Important Note for Next Developer
//! - The store rejects new names once full; it does not evict
//! - A pending prefix matches any content whose name it prefixes
//!
//! ## Last Modified
//! v0.1.0 - Initial in-memory collaborators

use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use ccnl_common::FaceId;
use ccnl_core::protocol::content::Name;

use crate::node::{ContentEntry, ContentStore, PendingInterests};
use crate::services::faces::FaceTable;

/// Default number of entries held by [`MemoryContentStore`].
pub const DEFAULT_STORE_CAPACITY: usize = 1024;

// ============================================
// MemoryContentStore
// ============================================

/// Content store backed by a DashMap.
pub struct MemoryContentStore {
    entries: DashMap<Name, ContentEntry>,
    capacity: usize,
}

impl MemoryContentStore {
    /// Creates a store holding up to [`DEFAULT_STORE_CAPACITY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STORE_CAPACITY)
    }

    /// Creates a store holding up to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
        }
    }

    /// Looks up an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &Name) -> Option<ContentEntry> {
        self.entries.get(name).map(|r| r.value().clone())
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryContentStore {
    fn insert(&self, entry: ContentEntry) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&entry.name) {
            debug!(name = %entry.name, capacity = self.capacity, "Content store full");
            return false;
        }
        trace!(name = %entry.name, len = entry.packet.len(), "Content cached");
        self.entries.insert(entry.name.clone(), entry);
        true
    }
}

impl std::fmt::Debug for MemoryContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryContentStore")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

// ============================================
// MemoryPendingInterests
// ============================================

/// Pending-interest table kept as a list of prefixes and waiting faces.
#[derive(Debug, Default)]
pub struct MemoryPendingInterests {
    pending: Mutex<Vec<(Name, Vec<FaceId>)>>,
}

impl MemoryPendingInterests {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `face` is waiting for content under `prefix`.
    pub fn add(&self, prefix: Name, face: FaceId) {
        let mut pending = self.pending.lock();
        if let Some((_, faces)) = pending.iter_mut().find(|(p, _)| *p == prefix) {
            if !faces.contains(&face) {
                faces.push(face);
            }
        } else {
            pending.push((prefix, vec![face]));
        }
    }

    /// Number of distinct pending prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Returns `true` if no interest is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl PendingInterests for MemoryPendingInterests {
    fn serve(&self, entry: &ContentEntry, faces: &FaceTable) -> usize {
        let matched: Vec<(Name, Vec<FaceId>)> = {
            let mut pending = self.pending.lock();
            let (hit, keep) = std::mem::take(&mut *pending)
                .into_iter()
                .partition(|(prefix, _)| prefix.is_prefix_of(&entry.name));
            *pending = keep;
            hit
        };

        let mut served = 0;
        for (prefix, waiting) in matched {
            for face in waiting {
                match faces.enqueue(face, Bytes::clone(&entry.packet)) {
                    Ok(()) => served += 1,
                    Err(e) => debug!(face_id = %face, prefix = %prefix, error = %e, "Pending interest not served"),
                }
            }
        }

        if served > 0 {
            debug!(name = %entry.name, served, "Served pending interests");
        }
        served
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(uri: &str) -> ContentEntry {
        ContentEntry {
            name: Name::from_uri(uri),
            content: Bytes::from_static(b"payload"),
            ppkd: None,
            packet: Bytes::from(format!("packet for {uri}")),
        }
    }

    #[test]
    fn test_store_insert_and_get() {
        let store = MemoryContentStore::new();
        assert!(store.insert(entry("/debug/seqnum-1")));

        let hit = store.get(&Name::from_uri("/debug/seqnum-1")).unwrap();
        assert_eq!(&hit.content[..], b"payload");
        assert!(store.get(&Name::from_uri("/debug/seqnum-2")).is_none());
    }

    #[test]
    fn test_store_capacity() {
        let store = MemoryContentStore::with_capacity(1);
        assert!(store.insert(entry("/a")));
        assert!(!store.insert(entry("/b")));
        // Replacing an existing name is still allowed
        assert!(store.insert(entry("/a")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_serve_enqueues_and_consumes() {
        let faces = FaceTable::new();
        let a = faces.add("udp://10.0.0.1:9695");
        let b = faces.add("udp://10.0.0.2:9695");

        let pit = MemoryPendingInterests::new();
        pit.add(Name::from_uri("/debug"), a.id());
        pit.add(Name::from_uri("/debug/seqnum-42"), b.id());
        pit.add(Name::from_uri("/other"), b.id());

        let e = entry("/debug/seqnum-42");
        assert_eq!(pit.serve(&e, &faces), 2);
        assert_eq!(a.drain(), vec![e.packet.clone()]);
        assert_eq!(b.drain(), vec![e.packet.clone()]);

        // Served interests are gone; the unrelated one stays
        assert_eq!(pit.len(), 1);
        assert_eq!(pit.serve(&e, &faces), 0);
    }

    #[test]
    fn test_serve_skips_vanished_face() {
        let faces = FaceTable::new();
        let pit = MemoryPendingInterests::new();
        pit.add(Name::from_uri("/debug"), FaceId::new(77));

        assert_eq!(pit.serve(&entry("/debug/seqnum-1"), &faces), 0);
        assert!(pit.is_empty());
    }

    #[test]
    fn test_add_deduplicates_faces() {
        let pit = MemoryPendingInterests::new();
        pit.add(Name::from_uri("/a"), FaceId::new(1));
        pit.add(Name::from_uri("/a"), FaceId::new(1));
        pit.add(Name::from_uri("/a"), FaceId::new(2));
        assert_eq!(pit.len(), 1);
    }
}

// ============================================
// File: crates/ccnl-relay/src/node.rs
// ============================================
//! # Relay Node Collaborators
//!
//! ## Creation Reason
//! The crypto dispatcher hands its results to parts of the relay it does
//! not own: the content store, the pending-interest table, the packet
//! parser and the management processor. These traits are the seams.
//!
//! ## Main Functionality
//! - `ContentStore`, `PendingInterests`, `PacketParser`,
//!   `ManagementProcessor`: Collaborator traits
//! - `ContentEntry`: What gets cached for self-originated content
//! - `ManagementCommand`: A verified-or-not command for the processor
//! - `CcnbPacketParser`: Parser backed by the ccnb content decoder
//! - `LoggingManagement`: Processor that only logs what it receives
//!
//! ## ⚠️ Important Note for Next Developer
//! - Implementations are called from the relay loop; keep them non-blocking
//! - The verified flag is informational here; enforcement belongs to the
//!   management processor
//!
//! ## Last Modified
//! v0.1.0 - Initial collaborator traits

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{info, warn};

use ccnl_common::FaceId;
use ccnl_core::protocol::content::{parse_content_object, Name, ParsedContent};

use crate::services::faces::FaceTable;

// ============================================
// ContentEntry
// ============================================

/// A content object ready for the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Name the entry is stored and matched under.
    pub name: Name,
    /// Content payload.
    pub content: Bytes,
    /// Publisher public key digest, if the packet carried one.
    pub ppkd: Option<Bytes>,
    /// Wire bytes delivered to faces that asked for this content.
    pub packet: Bytes,
}

impl ContentEntry {
    /// Builds an entry from parsed fields, keeping the parsed name.
    #[must_use]
    pub fn from_parsed(parsed: ParsedContent) -> Self {
        Self {
            name: parsed.name,
            content: parsed.content,
            ppkd: parsed.ppkd,
            packet: parsed.packet,
        }
    }
}

// ============================================
// ManagementCommand
// ============================================

/// A management command whose signature the crypto service has checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementCommand {
    /// The command rewrapped as a `Name` record.
    pub packet: Bytes,
    /// Management verb (third name component), if any.
    pub verb: Option<String>,
    /// Face the command arrived on, if it still exists.
    pub face: Option<FaceId>,
    /// Crypto service verdict.
    pub verified: bool,
}

// ============================================
// Collaborator Traits
// ============================================

/// Content store.
pub trait ContentStore: Send + Sync {
    /// Inserts an entry. Returns `false` if the store refused it.
    fn insert(&self, entry: ContentEntry) -> bool;
}

/// Pending-interest table.
pub trait PendingInterests: Send + Sync {
    /// Delivers `entry` to every face waiting for it and forgets those
    /// interests. Returns the number of faces served.
    fn serve(&self, entry: &ContentEntry, faces: &FaceTable) -> usize;
}

/// Extracts name, content, nonce and publisher digest from a packet.
pub trait PacketParser: Send + Sync {
    /// Parses `packet`.
    ///
    /// # Errors
    /// Any decode failure; callers must not act on a partial parse.
    fn parse(&self, packet: &[u8]) -> ccnl_core::Result<ParsedContent>;
}

/// Management-command processor.
pub trait ManagementProcessor: Send + Sync {
    /// Handles one command.
    fn handle_command(&self, command: ManagementCommand);
}

// ============================================
// CcnbPacketParser
// ============================================

/// [`PacketParser`] over the ccnb content decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct CcnbPacketParser;

impl PacketParser for CcnbPacketParser {
    fn parse(&self, packet: &[u8]) -> ccnl_core::Result<ParsedContent> {
        parse_content_object(packet)
    }
}

// ============================================
// LoggingManagement
// ============================================

/// [`ManagementProcessor`] that logs each command and counts them.
#[derive(Debug, Default)]
pub struct LoggingManagement {
    handled: AtomicU64,
    rejected: AtomicU64,
}

impl LoggingManagement {
    /// Creates a processor with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received with `verified = true`.
    #[must_use]
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    /// Commands received with `verified = false`.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

impl ManagementProcessor for LoggingManagement {
    fn handle_command(&self, command: ManagementCommand) {
        let verb = command.verb.as_deref().unwrap_or("<none>");
        let face = command
            .face
            .map_or_else(|| "-".to_string(), |id| id.to_string());

        if command.verified {
            self.handled.fetch_add(1, Ordering::Relaxed);
            info!(verb, face = %face, len = command.packet.len(), "Management command");
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(verb, face = %face, "Management command failed signature check");
        }
    }
}

// ============================================
// Tests
// ============================================

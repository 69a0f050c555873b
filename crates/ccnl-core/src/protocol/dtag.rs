// ============================================
// File: crates/ccnl-core/src/protocol/dtag.rs
// ============================================
//! # Tag Definitions
//!
//! ## Creation Reason
//! Collects the ccnb tag kinds, dictionary tag numbers and size limits used
//! by the crypto face, so the codec and the message layers share one table.
//!
//! ## Main Functionality
//! - `TagType`: The 3-bit kind carried in every ccnb header
//! - `Operation`: The two crypto operations (`sign` / `verify`)
//! - DTAG numbers for every element the crypto face reads or writes
//! - Size limits (`MAX_PACKET_SIZE`, `MAX_LABEL_LEN`)
//!
//! ## DTAG Table
//! | Name | Value |
//! |------|-------|
//! | Name | 14 |
//! | Component | 15 |
//! | Content | 19 |
//! | SignedInfo | 20 |
//! | ContentDigest | 21 |
//! | Interest | 26 |
//! | Signature | 37 |
//! | Type | 40 |
//! | Nonce | 41 |
//! | Witness | 53 |
//! | SignatureBits | 54 |
//! | PublisherPublicKeyDigest | 60 |
//! | ContentObj | 64 |
//! | Seqno | 256 |
//! | Verified | 99039 |
//! | Callback | 99040 |
//!
//! ## ⚠️ Important Note for Next Developer
//! - These numbers are shared with the crypto service; never renumber
//! - Verified and Callback are relay-local extensions of the ccnb dictionary
//!
//! ## Last Modified
//! v0.1.0 - Initial tag table

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================
// Limits
// ============================================

/// Largest packet the relay handles.
pub const MAX_PACKET_SIZE: usize = 8096;

/// Largest accepted text field (type, callback, decimal numbers).
pub const MAX_LABEL_LEN: usize = 100;

/// Algorithm label attached to every signature block.
pub const SIGNATURE_ALGORITHM: &str = "SHA256";

/// Callback name of the built-in management handler.
pub const DEFAULT_CALLBACK: &str = "ccnl_mgmt_crypto";

/// First two name components of every crypto message.
pub const CRYPTO_PREFIX: [&str; 2] = ["ccnx", "crypto"];

// ============================================
// Dictionary Tags
// ============================================

/// Name record.
pub const NAME: u64 = 14;
/// Name component.
pub const COMPONENT: u64 = 15;
/// Content payload.
pub const CONTENT: u64 = 19;
/// Signed info (carries the signature length in sign replies).
pub const SIGNED_INFO: u64 = 20;
/// Content digest (carries the payload in requests).
pub const CONTENT_DIGEST: u64 = 21;
/// Interest record.
pub const INTEREST: u64 = 26;
/// Signature record.
pub const SIGNATURE: u64 = 37;
/// Operation type.
pub const TYPE: u64 = 40;
/// Interest nonce.
pub const NONCE: u64 = 41;
/// Signature witness.
pub const WITNESS: u64 = 53;
/// Raw signature bits.
pub const SIGNATURE_BITS: u64 = 54;
/// Publisher public key digest.
pub const PUBLISHER_PUBKEY_DIGEST: u64 = 60;
/// Content object record.
pub const CONTENT_OBJ: u64 = 64;
/// Sequence number (carries the correlation value).
pub const SEQNO: u64 = 256;
/// Verification outcome flag.
pub const VERIFIED: u64 = 99_039;
/// Callback name.
pub const CALLBACK: u64 = 99_040;

/// Returns a readable name for a dictionary tag, used in logs and errors.
#[must_use]
pub const fn name(tag: u64) -> Option<&'static str> {
    Some(match tag {
        NAME => "Name",
        COMPONENT => "Component",
        CONTENT => "Content",
        SIGNED_INFO => "SignedInfo",
        CONTENT_DIGEST => "ContentDigest",
        INTEREST => "Interest",
        SIGNATURE => "Signature",
        TYPE => "Type",
        NONCE => "Nonce",
        WITNESS => "Witness",
        SIGNATURE_BITS => "SignatureBits",
        PUBLISHER_PUBKEY_DIGEST => "PublisherPublicKeyDigest",
        CONTENT_OBJ => "ContentObj",
        SEQNO => "Seqno",
        VERIFIED => "Verified",
        CALLBACK => "Callback",
        _ => return None,
    })
}

/// Formats a dictionary tag as `Name(num)` or just the number.
#[must_use]
pub fn describe(tag: u64) -> String {
    match name(tag) {
        Some(n) => format!("{n}({tag})"),
        None => tag.to_string(),
    }
}

// ============================================
// TagType
// ============================================

/// ccnb header kind.
///
/// # Values
/// | Value | Kind |
/// |-------|------|
/// | 0 | Ext |
/// | 1 | Tag |
/// | 2 | Dtag |
/// | 3 | Attr |
/// | 4 | Dattr |
/// | 5 | Blob |
/// | 6 | Udata |
///
/// 7 is reserved and rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    /// Extension.
    Ext = 0,
    /// Named tag.
    Tag = 1,
    /// Dictionary tag.
    Dtag = 2,
    /// Named attribute.
    Attr = 3,
    /// Dictionary attribute.
    Dattr = 4,
    /// Binary payload.
    Blob = 5,
    /// UTF-8 payload.
    Udata = 6,
}

impl TagType {
    /// Converts the low 3 header bits to a `TagType`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Ext),
            1 => Some(Self::Tag),
            2 => Some(Self::Dtag),
            3 => Some(Self::Attr),
            4 => Some(Self::Dattr),
            5 => Some(Self::Blob),
            6 => Some(Self::Udata),
            _ => None,
        }
    }

    /// Converts the `TagType` to its 3-bit representation.
    #[must_use]
    pub const fn as_bits(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ext => "EXT",
            Self::Tag => "TAG",
            Self::Dtag => "DTAG",
            Self::Attr => "ATTR",
            Self::Dattr => "DATTR",
            Self::Blob => "BLOB",
            Self::Udata => "UDATA",
        };
        f.write_str(s)
    }
}

// ============================================
// Operation
// ============================================

/// Crypto operation named in the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Produce a signature over content.
    Sign,
    /// Check a signature over a command.
    Verify,
}

impl Operation {
    /// Wire text of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign" => Ok(Self::Sign),
            "verify" => Ok(Self::Verify),
            other => Err(CoreError::UnknownOperation(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_type_bits() {
        for bits in 0..7 {
            let kind = TagType::from_bits(bits).unwrap();
            assert_eq!(kind.as_bits(), bits);
        }
        assert!(TagType::from_bits(7).is_none());
    }

    #[test]
    fn test_operation_text() {
        assert_eq!("sign".parse::<Operation>().unwrap(), Operation::Sign);
        assert_eq!("verify".parse::<Operation>().unwrap(), Operation::Verify);
        assert_eq!(Operation::Verify.to_string(), "verify");

        let err = "encrypt".parse::<Operation>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownOperation(ref op) if op == "encrypt"));
        assert!("Sign".parse::<Operation>().is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(SEQNO), "Seqno(256)");
        assert_eq!(describe(CALLBACK), "Callback(99040)");
        assert_eq!(describe(7), "7");
    }
}

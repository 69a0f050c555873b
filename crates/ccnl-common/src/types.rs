// ============================================
// File: crates/ccnl-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! The crypto face carries a single signed integer through the external
//! crypto service and back. That integer is the only state that ties a
//! reply to the work that caused it, so its two meanings get a real type
//! here instead of being re-derived from the sign at every use site.
//!
//! ## Main Functionality
//! - `FaceId`: Identifier of a face in the relay's face table
//! - `Correlation`: Tagged correlation value (`ForFace` / `SelfOriginated`)
//!
//! ## Correlation Wire Mapping
//! ```text
//!   wire value  >= 0   ──►  ForFace(FaceId(value))
//!   wire value  <  0   ──►  SelfOriginated(|value|)
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Only the codec converts to and from the signed wire form
//! - The self-originated label is opaque; it is NOT a face id
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::CommonError;

// ============================================
// FaceId
// ============================================

/// Identifier of a face in the relay's face table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(u32);

impl FaceId {
    /// Creates a face id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for FaceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================
// Correlation
// ============================================

/// Correlation value carried through a crypto round trip.
///
/// # Example
/// ```
/// use ccnl_common::types::{Correlation, FaceId};
///
/// let waiting = Correlation::from_wire(7).unwrap();
/// assert_eq!(waiting, Correlation::ForFace(FaceId::new(7)));
///
/// let own = Correlation::from_wire(-42).unwrap();
/// assert_eq!(own.to_wire(), -42);
/// assert_eq!(own.debug_label().as_deref(), Some("seqnum-42"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correlation {
    /// A face is waiting for the outcome.
    ForFace(FaceId),
    /// The relay asked on its own behalf; the label is opaque.
    SelfOriginated(NonZeroU32),
}

impl Correlation {
    /// Translates the signed wire value.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the magnitude does not fit in 32 bits.
    pub fn from_wire(value: i64) -> Result<Self, CommonError> {
        if value >= 0 {
            let id = u32::try_from(value)
                .map_err(|_| CommonError::out_of_range(value, 0, u32::MAX))?;
            return Ok(Self::ForFace(FaceId(id)));
        }

        let label = u32::try_from(value.unsigned_abs())
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| CommonError::out_of_range(value, -i64::from(u32::MAX), -1))?;
        Ok(Self::SelfOriginated(label))
    }

    /// Returns the signed wire value.
    #[must_use]
    pub fn to_wire(self) -> i64 {
        match self {
            Self::ForFace(id) => i64::from(id.0),
            Self::SelfOriginated(label) => -i64::from(label.get()),
        }
    }

    /// Returns the waiting face, if any.
    #[must_use]
    pub const fn face(self) -> Option<FaceId> {
        match self {
            Self::ForFace(id) => Some(id),
            Self::SelfOriginated(_) => None,
        }
    }

    /// Returns `true` for relay-originated work.
    #[must_use]
    pub const fn is_self_originated(self) -> bool {
        matches!(self, Self::SelfOriginated(_))
    }

    /// Name component used for self-originated content (`seqnum-<label>`).
    #[must_use]
    pub fn debug_label(self) -> Option<String> {
        match self {
            Self::ForFace(_) => None,
            Self::SelfOriginated(label) => Some(format!("seqnum-{label}")),
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

impl FromStr for Correlation {
    type Err = CommonError;

    /// Parses the decimal wire text (optional sign, ASCII digits only).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommonError::decoding(
                "correlation",
                format!("'{s}' is not a decimal integer"),
            ));
        }
        let value: i64 = s
            .parse()
            .map_err(|e: std::num::ParseIntError| CommonError::decoding("correlation", e.to_string()))?;
        Self::from_wire(value)
    }
}

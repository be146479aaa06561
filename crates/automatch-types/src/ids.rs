//! Globally unique identifiers used throughout AutoMatch.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting,
//! except `RunId` which is a plain monotonically increasing counter.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a UUIDv7 newtype with `new`, `from_bytes`, `Default` and a
/// prefixed `Display`.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Entity IDs
// ---------------------------------------------------------------------------

uuid_id!(
    /// A sponsor's deal (one project seeking tax-credit financing).
    DealId,
    "deal"
);

uuid_id!(
    /// The organization sponsoring one or more deals.
    SponsorId,
    "sponsor"
);

uuid_id!(
    /// A Community Development Entity holding NMTC allocation.
    CdeId,
    "cde"
);

uuid_id!(
    /// A tax-credit investor (bank, fund, corporate buyer).
    InvestorId,
    "investor"
);

uuid_id!(
    /// A sponsor's match request sent to a capital source.
    RequestId,
    "request"
);

// ---------------------------------------------------------------------------
// SourceId
// ---------------------------------------------------------------------------

/// Identifies a capital source of either kind.
///
/// Ordering is total: every CDE sorts before every investor, then by UUID.
/// Ranked runs use this as the tie-breaker so equal scores always come out
/// in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SourceId {
    Cde(CdeId),
    Investor(InvestorId),
}

impl SourceId {
    /// Raw UUID bytes, used when hashing.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        match self {
            Self::Cde(id) => id.0.as_bytes(),
            Self::Investor(id) => id.0.as_bytes(),
        }
    }

    /// One-byte discriminant, used when hashing.
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            Self::Cde(_) => 0,
            Self::Investor(_) => 1,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cde(id) => write!(f, "{id}"),
            Self::Investor(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for one AutoMatch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run:{}", self.0)
    }
}

//! Match requests: a sponsor asking a capital source to consider a deal.
//!
//! Requests are opened from AutoMatch results and then move exactly once
//! out of `Pending`:
//!
//! ```text
//! PENDING → ACCEPTED | DECLINED | WITHDRAWN
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DealId, RequestId, SourceId, SponsorId};

/// Lifecycle status of a match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Withdrawn,
}

impl RequestStatus {
    /// Terminal statuses can never change again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Declined => write!(f, "DECLINED"),
            Self::Withdrawn => write!(f, "WITHDRAWN"),
        }
    }
}

/// A sponsor's request that a CDE or investor review a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub id: RequestId,
    pub deal_id: DealId,
    pub sponsor_id: SponsorId,
    pub source_id: SourceId,
    pub status: RequestStatus,
    /// Score of the AutoMatch result the request was opened from.
    pub score: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchRequest {
    #[must_use]
    pub fn new(deal_id: DealId, sponsor_id: SponsorId, source_id: SourceId, score: u8) -> Self {
        let now = Utc::now();
        Self {
            id: RequestId::new(),
            deal_id,
            sponsor_id,
            source_id,
            status: RequestStatus::Pending,
            score,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

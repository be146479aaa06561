//! Request book — sponsor match requests opened from AutoMatch results.
//!
//! A sponsor picks results from a run and asks those sources to review the
//! deal. The book enforces:
//!
//! - at most one live (`Pending` or `Accepted`) request per (deal, source)
//! - at most `max_open_per_deal` `Pending` requests per deal
//! - transitions only out of `Pending`

use std::collections::HashMap;

use automatch_types::{
    AutomatchError, DealId, MatchConfig, MatchRequest, MatchResult, RequestId, RequestStatus,
    Result, SponsorId, constants,
};
use chrono::Utc;

/// In-memory store of match requests.
///
/// Unbounded: every request is kept for its deal's history. The pending cap
/// limits how many are live, not how many are stored.
pub struct RequestBook {
    requests: HashMap<RequestId, MatchRequest>,
    /// Request ids per deal, in creation order.
    by_deal: HashMap<DealId, Vec<RequestId>>,
    max_open_per_deal: usize,
}

impl RequestBook {
    #[must_use]
    pub fn new(max_open_per_deal: usize) -> Self {
        Self {
            requests: HashMap::new(),
            by_deal: HashMap::new(),
            max_open_per_deal,
        }
    }

    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.max_open_requests_per_deal)
    }

    /// Open a request from an AutoMatch result.
    ///
    /// # Errors
    /// - `IneligibleRequest` if the result failed an eligibility gate
    /// - `DuplicateRequest` if a live request for this pair exists
    /// - `RequestLimitExceeded` if the deal is at its pending cap
    pub fn open(&mut self, sponsor_id: SponsorId, result: &MatchResult) -> Result<RequestId> {
        if !result.is_eligible() {
            return Err(AutomatchError::IneligibleRequest {
                deal: result.deal_id,
                source_id: result.source_id,
            });
        }

        let live_duplicate = self.for_deal(result.deal_id).any(|r| {
            r.source_id == result.source_id
                && matches!(r.status, RequestStatus::Pending | RequestStatus::Accepted)
        });
        if live_duplicate {
            return Err(AutomatchError::DuplicateRequest {
                deal: result.deal_id,
                source_id: result.source_id,
            });
        }

        let pending = self.pending_count(result.deal_id);
        if pending >= self.max_open_per_deal {
            tracing::warn!(
                deal = %result.deal_id,
                pending,
                limit = self.max_open_per_deal,
                "Match request limit reached"
            );
            return Err(AutomatchError::RequestLimitExceeded {
                deal: result.deal_id,
                limit: self.max_open_per_deal,
            });
        }

        let request = MatchRequest::new(result.deal_id, sponsor_id, result.source_id, result.score);
        let id = request.id;
        tracing::info!(
            request = %id,
            deal = %request.deal_id,
            source = %request.source_id,
            score = request.score,
            "Match request opened"
        );
        self.by_deal.entry(request.deal_id).or_default().push(id);
        self.requests.insert(id, request);
        Ok(id)
    }

    /// The source accepts the deal into its pipeline.
    pub fn accept(&mut self, id: RequestId) -> Result<&MatchRequest> {
        self.transition(id, RequestStatus::Accepted)
    }

    /// The source passes on the deal.
    pub fn decline(&mut self, id: RequestId) -> Result<&MatchRequest> {
        self.transition(id, RequestStatus::Declined)
    }

    /// The sponsor pulls the request.
    pub fn withdraw(&mut self, id: RequestId) -> Result<&MatchRequest> {
        self.transition(id, RequestStatus::Withdrawn)
    }

    fn transition(&mut self, id: RequestId, to: RequestStatus) -> Result<&MatchRequest> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(AutomatchError::RequestNotFound(id))?;
        if request.status.is_terminal() {
            return Err(AutomatchError::InvalidTransition {
                id,
                from: request.status,
                to,
            });
        }
        request.status = to;
        request.updated_at = Utc::now();
        tracing::info!(request = %id, status = %to, "Match request updated");
        Ok(request)
    }

    #[must_use]
    pub fn get(&self, id: &RequestId) -> Option<&MatchRequest> {
        self.requests.get(id)
    }

    /// Requests for a deal, oldest first.
    pub fn for_deal(&self, deal_id: DealId) -> impl Iterator<Item = &MatchRequest> {
        self.by_deal
            .get(&deal_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.requests.get(id))
    }

    #[must_use]
    pub fn pending_count(&self, deal_id: DealId) -> usize {
        self.for_deal(deal_id).filter(|r| r.is_pending()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl Default for RequestBook {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MAX_OPEN_REQUESTS_PER_DEAL)
    }
}

//! Match ledger — prevents duplicate match notifications.
//!
//! Each (deal, source) pair is notified at most once. Re-running AutoMatch
//! for a deal after its sponsor edits it must only surface *new* matches,
//! so the ledger remembers every pair it has let through.
//!
//! The ledger is a bounded, insertion-ordered set: when full, the oldest
//! key is evicted, keeping memory predictable in a long-running service.

use std::collections::{HashSet, VecDeque};

use automatch_types::{DealId, MatchResult, MatchRun, SourceId, constants};
use serde::{Deserialize, Serialize};

/// Identity of a notified pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MatchKey {
    pub deal_id: DealId,
    pub source_id: SourceId,
}

impl MatchKey {
    #[must_use]
    pub fn of(result: &MatchResult) -> Self {
        Self {
            deal_id: result.deal_id,
            source_id: result.source_id,
        }
    }
}

/// Bounded record of pairings already notified.
pub struct MatchLedger {
    /// Keys already notified.
    notified: HashSet<MatchKey>,
    /// Insertion order for eviction (front = oldest).
    order: VecDeque<MatchKey>,
    /// Maximum number of keys before eviction kicks in.
    capacity: usize,
}

impl MatchLedger {
    /// Create a ledger with the given capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "MatchLedger capacity must be > 0");
        Self {
            notified: HashSet::with_capacity(capacity.min(4096)),
            order: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
        }
    }

    /// Record a key. Returns `true` if it was new.
    pub fn record(&mut self, key: MatchKey) -> bool {
        if self.notified.contains(&key) {
            return false;
        }
        if self.notified.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.notified.remove(&oldest);
            }
        }
        self.notified.insert(key);
        self.order.push_back(key);
        true
    }

    /// Record every result in `run` and return the ones not notified
    /// before, in ranked order.
    pub fn record_run<'a>(&mut self, run: &'a MatchRun) -> Vec<&'a MatchResult> {
        let fresh: Vec<&MatchResult> = run
            .results
            .iter()
            .filter(|r| self.record(MatchKey::of(r)))
            .collect();

        for result in &fresh {
            tracing::info!(
                run = %run.run_id,
                deal = %result.deal_id,
                source = %result.source_id,
                score = result.score,
                strength = %result.strength,
                "New match"
            );
        }
        tracing::debug!(
            run = %run.run_id,
            fresh = fresh.len(),
            repeated = run.results.len() - fresh.len(),
            "Run recorded in match ledger"
        );
        fresh
    }

    #[must_use]
    pub fn contains(&self, key: &MatchKey) -> bool {
        self.notified.contains(key)
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notified.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}

impl Default for MatchLedger {
    fn default() -> Self {
        Self::new(constants::DEFAULT_LEDGER_CAPACITY)
    }
}

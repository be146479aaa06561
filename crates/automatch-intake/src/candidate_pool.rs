//! Candidate pools for one AutoMatch run.
//!
//! Validated inputs are pushed into a pool. Once the pool is sealed it
//! accepts nothing more and is drained for scoring. [`CandidatePool`]
//! holds capital sources ranked for a deal; [`DealPool`] holds deals
//! ranked for one source's pipeline.

use std::collections::HashSet;
use std::hash::Hash;

use automatch_types::{AutomatchError, CapitalSource, Deal, DealId, MatchConfig, Result, SourceId, constants};

/// Something a pool can hold, keyed by its identity.
pub trait Pooled {
    type Key: Copy + Eq + Hash;

    fn pool_key(&self) -> Self::Key;

    /// Error for a second entry with the same key.
    fn duplicate(key: Self::Key) -> AutomatchError;
}

impl Pooled for CapitalSource {
    type Key = SourceId;

    fn pool_key(&self) -> SourceId {
        self.id()
    }

    fn duplicate(key: SourceId) -> AutomatchError {
        AutomatchError::DuplicateCandidate(key)
    }
}

impl Pooled for Deal {
    type Key = DealId;

    fn pool_key(&self) -> DealId {
        self.id
    }

    fn duplicate(key: DealId) -> AutomatchError {
        AutomatchError::DuplicateDeal(key)
    }
}

/// Capital sources for a deal's run.
pub type CandidatePool = Pool<CapitalSource>;

/// Deals for a source's pipeline run.
pub type DealPool = Pool<Deal>;

/// Collects validated entries for a single run.
pub struct Pool<T: Pooled> {
    /// Entries in arrival order.
    entries: Vec<T>,
    /// Keys already in the pool.
    seen: HashSet<T::Key>,
    /// Whether the pool has been sealed.
    sealed: bool,
    /// Maximum number of entries.
    capacity: usize,
}

impl<T: Pooled> Pool<T> {
    /// Create an empty pool with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(constants::MAX_CANDIDATES_PER_RUN)
    }

    /// Create a pool with a custom capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            seen: HashSet::new(),
            sealed: false,
            capacity,
        }
    }

    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::with_capacity(config.max_candidates_per_run)
    }

    /// Push a validated entry into the pool.
    ///
    /// # Errors
    /// - `PoolAlreadySealed` if the pool has been sealed
    /// - `DuplicateCandidate` / `DuplicateDeal` if the key is already pooled
    /// - `PoolFull` if the pool is at capacity
    pub fn push(&mut self, entry: T) -> Result<()> {
        if self.sealed {
            return Err(AutomatchError::PoolAlreadySealed);
        }
        let key = entry.pool_key();
        if self.seen.contains(&key) {
            return Err(T::duplicate(key));
        }
        if self.entries.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "Candidate pool full");
            return Err(AutomatchError::PoolFull { capacity: self.capacity });
        }
        self.seen.insert(key);
        self.entries.push(entry);
        Ok(())
    }

    /// Seal the pool. No more entries can be added after this.
    ///
    /// # Errors
    /// Returns `PoolAlreadySealed` if already sealed.
    pub fn seal(&mut self) -> Result<()> {
        if self.sealed {
            return Err(AutomatchError::PoolAlreadySealed);
        }
        self.sealed = true;
        Ok(())
    }

    /// Drain all entries (consumes the content).
    ///
    /// # Errors
    /// Returns `PoolNotSealed` if the pool is still open.
    pub fn drain(&mut self) -> Result<Vec<T>> {
        if !self.sealed {
            return Err(AutomatchError::PoolNotSealed);
        }
        self.seen.clear();
        Ok(std::mem::take(&mut self.entries))
    }

    /// Reopen an empty pool for the next run.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.seen.clear();
        self.sealed = false;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl<T: Pooled> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Configuration for AutoMatch scoring, ranking and outreach.
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! to list what it overrides.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AutomatchError, CriterionKind, Result, constants};

/// Score cut-offs for the match-strength labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthThresholds {
    pub excellent: u8,
    pub good: u8,
    pub fair: u8,
}

impl Default for StrengthThresholds {
    fn default() -> Self {
        Self {
            excellent: constants::DEFAULT_EXCELLENT_THRESHOLD,
            good: constants::DEFAULT_GOOD_THRESHOLD,
            fair: constants::DEFAULT_FAIR_THRESHOLD,
        }
    }
}

/// Per-criterion weights. Criteria not listed weigh
/// [`constants::DEFAULT_CRITERION_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionWeights(pub BTreeMap<CriterionKind, u32>);

impl CriterionWeights {
    #[must_use]
    pub fn weight(&self, kind: CriterionKind) -> u32 {
        self.0
            .get(&kind)
            .copied()
            .unwrap_or(constants::DEFAULT_CRITERION_WEIGHT)
    }

    /// Override one weight, builder style.
    #[must_use]
    pub fn with(mut self, kind: CriterionKind, weight: u32) -> Self {
        self.0.insert(kind, weight);
        self
    }
}

/// Top-level AutoMatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub strength: StrengthThresholds,
    pub weights: CriterionWeights,
    /// Eligible results below this score are dropped from ranked runs.
    pub min_score: u8,
    /// Maximum results in a ranked run.
    pub max_results: usize,
    /// Total project cost at or below which a deal is a "small deal".
    pub small_deal_threshold: Decimal,
    /// Candidate pool capacity for one run.
    pub max_candidates_per_run: usize,
    /// Notification keys remembered by the match ledger.
    pub ledger_capacity: usize,
    /// Pending match requests allowed per deal.
    pub max_open_requests_per_deal: usize,
    /// AutoMatch runs allowed per sponsor per run window.
    pub max_runs_per_sponsor: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            strength: StrengthThresholds::default(),
            weights: CriterionWeights::default(),
            min_score: constants::DEFAULT_MIN_SCORE,
            max_results: constants::DEFAULT_MAX_RESULTS,
            small_deal_threshold: Decimal::new(constants::DEFAULT_SMALL_DEAL_THRESHOLD, 0),
            max_candidates_per_run: constants::MAX_CANDIDATES_PER_RUN,
            ledger_capacity: constants::DEFAULT_LEDGER_CAPACITY,
            max_open_requests_per_deal: constants::DEFAULT_MAX_OPEN_REQUESTS_PER_DEAL,
            max_runs_per_sponsor: constants::DEFAULT_MAX_RUNS_PER_SPONSOR,
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configs that would make scoring or ranking meaningless.
    pub fn validate(&self) -> Result<()> {
        let StrengthThresholds { excellent, good, fair } = self.strength;
        if excellent > 100 {
            return Err(AutomatchError::Configuration(format!(
                "excellent threshold {excellent} exceeds 100"
            )));
        }
        if !(excellent > good && good > fair && fair > 0) {
            return Err(AutomatchError::Configuration(format!(
                "strength thresholds must satisfy excellent > good > fair > 0, \
                 got {excellent} / {good} / {fair}"
            )));
        }
        if self.min_score > 100 {
            return Err(AutomatchError::Configuration(format!(
                "min_score {} exceeds 100",
                self.min_score
            )));
        }
        if self.max_results == 0 {
            return Err(AutomatchError::Configuration(
                "max_results must be positive".into(),
            ));
        }
        if self.small_deal_threshold <= Decimal::ZERO {
            return Err(AutomatchError::Configuration(
                "small_deal_threshold must be positive".into(),
            ));
        }
        if self.max_candidates_per_run == 0 || self.ledger_capacity == 0 {
            return Err(AutomatchError::Configuration(
                "candidate and ledger capacities must be positive".into(),
            ));
        }
        if self.max_open_requests_per_deal == 0 || self.max_runs_per_sponsor == 0 {
            return Err(AutomatchError::Configuration(
                "request and run limits must be positive".into(),
            ));
        }
        for (kind, set) in [("CDE", &CriterionKind::CDE[..]), ("investor", &CriterionKind::INVESTOR[..])] {
            if set.iter().all(|k| self.weights.weight(*k) == 0) {
                return Err(AutomatchError::Configuration(format!(
                    "at least one {kind} criterion must carry weight"
                )));
            }
        }
        Ok(())
    }
}

//! Match outcome types: per-criterion outcomes, scored results, and runs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CapitalSource, Deal, DealId, RunId, SourceId, StrengthThresholds};

/// Every criterion AutoMatch evaluates.
///
/// Eligibility criteria are hard gates: failing any of them disqualifies
/// the pairing outright. All others are preferences that move the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    // --- eligibility ---
    Program,
    Accepting,
    Allocation,
    // --- shared preferences ---
    Geography,
    Sector,
    SevereDistress,
    // --- CDE preferences ---
    AreaType,
    DealSize,
    Poverty,
    Income,
    Unemployment,
    Jobs,
    Readiness,
    MinorityOwned,
    Tribal,
    Nonprofit,
    SmallDeal,
    // --- investor preferences ---
    InvestmentSize,
    CraArea,
    OpportunityZone,
    QualifiedCensusTract,
}

impl CriterionKind {
    /// Every criterion kind, in evaluation order.
    pub const ALL: [Self; 21] = [
        Self::Program,
        Self::Accepting,
        Self::Allocation,
        Self::Geography,
        Self::Sector,
        Self::SevereDistress,
        Self::AreaType,
        Self::DealSize,
        Self::Poverty,
        Self::Income,
        Self::Unemployment,
        Self::Jobs,
        Self::Readiness,
        Self::MinorityOwned,
        Self::Tribal,
        Self::Nonprofit,
        Self::SmallDeal,
        Self::InvestmentSize,
        Self::CraArea,
        Self::OpportunityZone,
        Self::QualifiedCensusTract,
    ];

    /// Criteria evaluated for a CDE, in evaluation order.
    pub const CDE: [Self; 17] = [
        Self::Program,
        Self::Accepting,
        Self::Allocation,
        Self::Geography,
        Self::AreaType,
        Self::Sector,
        Self::DealSize,
        Self::Poverty,
        Self::Income,
        Self::Unemployment,
        Self::SevereDistress,
        Self::Jobs,
        Self::Readiness,
        Self::MinorityOwned,
        Self::Tribal,
        Self::Nonprofit,
        Self::SmallDeal,
    ];

    /// Criteria evaluated for an investor, in evaluation order.
    pub const INVESTOR: [Self; 9] = [
        Self::Program,
        Self::Accepting,
        Self::Geography,
        Self::Sector,
        Self::InvestmentSize,
        Self::CraArea,
        Self::OpportunityZone,
        Self::QualifiedCensusTract,
        Self::SevereDistress,
    ];

    /// Hard gate?
    #[must_use]
    pub fn is_eligibility(self) -> bool {
        matches!(self, Self::Program | Self::Accepting | Self::Allocation)
    }

    /// Stable label used in logs and config keys.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Accepting => "accepting",
            Self::Allocation => "allocation",
            Self::Geography => "geography",
            Self::Sector => "sector",
            Self::SevereDistress => "severe_distress",
            Self::AreaType => "area_type",
            Self::DealSize => "deal_size",
            Self::Poverty => "poverty",
            Self::Income => "income",
            Self::Unemployment => "unemployment",
            Self::Jobs => "jobs",
            Self::Readiness => "readiness",
            Self::MinorityOwned => "minority_owned",
            Self::Tribal => "tribal",
            Self::Nonprofit => "nonprofit",
            Self::SmallDeal => "small_deal",
            Self::InvestmentSize => "investment_size",
            Self::CraArea => "cra_area",
            Self::OpportunityZone => "opportunity_zone",
            Self::QualifiedCensusTract => "qualified_census_tract",
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a single criterion came out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    /// The source states a constraint and the deal satisfies it.
    Met,
    /// The source states a constraint and the deal does not satisfy it.
    Unmet,
    /// The source states no constraint. Counts as satisfied, yields no reason.
    Open,
}

impl CriterionStatus {
    #[must_use]
    pub fn is_satisfied(self) -> bool {
        !matches!(self, Self::Unmet)
    }
}

/// Result of evaluating one criterion for one (deal, source) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionOutcome {
    pub kind: CriterionKind,
    pub status: CriterionStatus,
    /// Human-readable explanation.
    pub detail: String,
}

impl CriterionOutcome {
    pub fn met(kind: CriterionKind, detail: impl Into<String>) -> Self {
        Self { kind, status: CriterionStatus::Met, detail: detail.into() }
    }

    pub fn unmet(kind: CriterionKind, detail: impl Into<String>) -> Self {
        Self { kind, status: CriterionStatus::Unmet, detail: detail.into() }
    }

    pub fn open(kind: CriterionKind, detail: impl Into<String>) -> Self {
        Self { kind, status: CriterionStatus::Open, detail: detail.into() }
    }

    /// `Met` when `ok`, else `Unmet`, picking the matching sentence.
    pub fn check(kind: CriterionKind, ok: bool, met: impl Into<String>, unmet: impl Into<String>) -> Self {
        if ok { Self::met(kind, met) } else { Self::unmet(kind, unmet) }
    }
}

/// Match-strength label derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Excellent,
    Good,
    Fair,
    Weak,
    /// Failed an eligibility criterion.
    Ineligible,
}

impl MatchStrength {
    /// Label for an eligible pairing's score.
    #[must_use]
    pub fn from_score(score: u8, thresholds: &StrengthThresholds) -> Self {
        if score >= thresholds.excellent {
            Self::Excellent
        } else if score >= thresholds.good {
            Self::Good
        } else if score >= thresholds.fair {
            Self::Fair
        } else {
            Self::Weak
        }
    }

    /// One-byte code, used when hashing.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Excellent => 0,
            Self::Good => 1,
            Self::Fair => 2,
            Self::Weak => 3,
            Self::Ineligible => 4,
        }
    }
}

impl fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::Fair => write!(f, "FAIR"),
            Self::Weak => write!(f, "WEAK"),
            Self::Ineligible => write!(f, "INELIGIBLE"),
        }
    }
}

/// Scored evaluation of one deal against one capital source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub deal_id: DealId,
    pub source_id: SourceId,
    pub source_name: String,
    /// 0–100.
    pub score: u8,
    pub strength: MatchStrength,
    /// Why the pairing fits, in evaluation order.
    pub reasons: Vec<String>,
    /// Where the pairing falls short.
    pub gaps: Vec<String>,
    pub outcomes: Vec<CriterionOutcome>,
    /// First eligibility criterion that failed, if any.
    pub disqualified_by: Option<CriterionKind>,
}

impl MatchResult {
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.disqualified_by.is_none()
    }
}

/// What a run ranked candidates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RunSubject {
    /// Capital sources ranked for one deal.
    Deal(DealId),
    /// Deals ranked for one source's pipeline.
    Source(SourceId),
}

/// Output of a ranked AutoMatch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub run_id: RunId,
    pub subject: RunSubject,
    /// Ranked: score descending, then counterpart id ascending.
    pub results: Vec<MatchResult>,
    /// Candidates scored.
    pub evaluated: usize,
    /// Candidates dropped (ineligible, under the minimum score, or past
    /// the result limit).
    pub excluded: usize,
    /// SHA-256 commitment over `results`.
    pub run_root: [u8; 32],
}

impl MatchRun {
    #[must_use]
    pub fn top(&self) -> Option<&MatchResult> {
        self.results.first()
    }
}

/// A deal plus its candidate sources, frozen for one run.
///
/// Candidates are sorted by [`SourceId`] and `input_hash` commits to the
/// deal and every candidate, so the same request always ranks the same way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedRequest {
    pub run_id: RunId,
    pub deal: Deal,
    pub candidates: Vec<CapitalSource>,
    pub input_hash: [u8; 32],
    pub sealed_at: DateTime<Utc>,
}

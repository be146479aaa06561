//! # automatch-types
//!
//! Shared types, errors, and configuration for the **AutoMatch** engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`DealId`], [`SponsorId`], [`CdeId`], [`InvestorId`], [`SourceId`], [`RunId`], [`RequestId`]
//! - **Program model**: [`ProgramType`], [`AreaType`], [`AreaPreference`], [`ProjectSector`], [`ServiceArea`]
//! - **Deal model**: [`Deal`], [`TractProfile`]
//! - **Criteria model**: [`CdeCriteria`], [`InvestorCriteria`], [`CapitalSource`]
//! - **Outcomes**: [`CriterionKind`], [`CriterionOutcome`], [`MatchStrength`], [`MatchResult`], [`MatchRun`], [`SealedRequest`]
//! - **Outreach model**: [`MatchRequest`], [`RequestStatus`]
//! - **Configuration**: [`MatchConfig`], [`StrengthThresholds`], [`CriterionWeights`]
//! - **Errors**: [`AutomatchError`] with `AM_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod criteria;
pub mod deal;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod program;
pub mod request;

// Re-export all primary types at crate root for ergonomic imports:
//   use automatch_types::{Deal, CdeCriteria, MatchResult, ...};

pub use config::*;
pub use criteria::*;
pub use deal::*;
pub use error::*;
pub use ids::*;
pub use outcome::*;
pub use program::*;
pub use request::*;

// Constants are accessed via `automatch_types::constants::FOO`
// (not re-exported to avoid name collisions).

//! Request validator — hard gate for deals and criteria.
//!
//! Every deal and every candidate source is validated before it reaches
//! the engine. The engine itself assumes well-formed input: a negative
//! allocation or a poverty rate of 250% would produce a score, just a
//! meaningless one.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: the first failing check rejects the input
//! - **Specific errors**: every rejection names the offending field
//! - **Per-sponsor run limit**: a sponsor gets a bounded number of
//!   AutoMatch runs per window; `advance_window` resets the counters

use std::collections::HashMap;

use automatch_types::{
    AutomatchError, CapitalSource, CdeCriteria, Deal, InvestorCriteria, MatchConfig, Result,
    ServiceArea, SponsorId, constants, is_state_code,
};
use rust_decimal::Decimal;

/// Hard gate that validates deals and sources before scoring.
pub struct RequestValidator {
    /// Maximum AutoMatch runs per sponsor per window.
    max_runs_per_sponsor: usize,
    /// Per-sponsor run count for the current window.
    run_counts: HashMap<SponsorId, usize>,
}

impl RequestValidator {
    /// Create a validator with the default run limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(constants::DEFAULT_MAX_RUNS_PER_SPONSOR)
    }

    /// Create a validator with a custom run limit.
    #[must_use]
    pub fn with_limits(max_runs_per_sponsor: usize) -> Self {
        Self {
            max_runs_per_sponsor,
            run_counts: HashMap::new(),
        }
    }

    /// Create a validator from config.
    #[must_use]
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::with_limits(config.max_runs_per_sponsor)
    }

    /// Start a new run window. Resets per-sponsor counters.
    pub fn advance_window(&mut self) {
        self.run_counts.clear();
    }

    /// Validate a deal and count one AutoMatch run against its sponsor.
    ///
    /// # Errors
    /// `InvalidDeal` naming the failed field, or `RunLimitExceeded`.
    pub fn admit_run(&mut self, deal: &Deal) -> Result<()> {
        Self::validate_deal(deal)?;

        let count = self.run_counts.entry(deal.sponsor_id).or_insert(0);
        if *count >= self.max_runs_per_sponsor {
            tracing::warn!(
                sponsor = %deal.sponsor_id,
                deal = %deal.id,
                count = *count,
                "AutoMatch run limit reached"
            );
            return Err(AutomatchError::RunLimitExceeded {
                sponsor: deal.sponsor_id,
                count: *count,
            });
        }
        *count += 1;
        Ok(())
    }

    /// Validate a deal's fields.
    ///
    /// # Errors
    /// Returns `InvalidDeal` for the first failing check.
    pub fn validate_deal(deal: &Deal) -> Result<()> {
        let reject = |reason: String| {
            tracing::warn!(deal = %deal.id, %reason, "Deal rejected");
            Err(AutomatchError::InvalidDeal { deal: deal.id, reason })
        };

        if deal.name.trim().is_empty() {
            return reject("name must not be empty".into());
        }
        if deal.programs.is_empty() {
            return reject("at least one program is required".into());
        }
        if !is_state_code(&deal.state) {
            return reject(format!("state `{}` is not a two-letter code", deal.state));
        }
        if deal.total_project_cost <= Decimal::ZERO {
            return reject(format!(
                "total project cost must be positive, got {}",
                deal.total_project_cost
            ));
        }
        if deal.allocation_request.is_sign_negative() {
            return reject(format!(
                "allocation request must not be negative, got {}",
                deal.allocation_request
            ));
        }
        let tract = &deal.tract;
        for (field, value, max) in [
            ("poverty rate", tract.poverty_rate, constants::MAX_PERCENTAGE),
            ("unemployment rate", tract.unemployment_rate, constants::MAX_PERCENTAGE),
            (
                "median family income percentage",
                tract.median_family_income_pct,
                constants::MAX_MFI_PERCENTAGE,
            ),
        ] {
            if !in_percent_range(value, max) {
                return reject(format!("{field} {value} outside 0..={max}"));
            }
        }
        Ok(())
    }

    /// Validate a capital source's criteria.
    ///
    /// # Errors
    /// Returns `InvalidCriteria` for the first failing check.
    pub fn validate_source(source: &CapitalSource) -> Result<()> {
        let id = source.id();
        let result = if source.name().trim().is_empty() {
            Err("name must not be empty".to_string())
        } else if source.programs().is_empty() {
            Err("at least one program is required".to_string())
        } else {
            match source {
                CapitalSource::Cde(cde) => check_cde(cde),
                CapitalSource::Investor(investor) => check_investor(investor),
            }
        };

        result.map_err(|reason| {
            tracing::warn!(source = %id, %reason, "Source criteria rejected");
            AutomatchError::InvalidCriteria { source_id: id, reason }
        })
    }

    /// Runs counted for a sponsor in the current window.
    #[must_use]
    pub fn sponsor_run_count(&self, sponsor: &SponsorId) -> usize {
        self.run_counts.get(sponsor).copied().unwrap_or(0)
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn in_percent_range(value: Decimal, max: i64) -> bool {
    !value.is_sign_negative() && value <= Decimal::from(max)
}

fn check_service_area(area: &ServiceArea) -> std::result::Result<(), String> {
    match area {
        ServiceArea::National => Ok(()),
        ServiceArea::States(states) if states.is_empty() => {
            Err("state service area lists no states".into())
        }
        ServiceArea::States(states) => check_states(states),
    }
}

fn check_states(states: &[String]) -> std::result::Result<(), String> {
    match states.iter().find(|s| !is_state_code(s)) {
        Some(bad) => Err(format!("state `{bad}` is not a two-letter code")),
        None => Ok(()),
    }
}

fn check_bounds(
    what: &str,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> std::result::Result<(), String> {
    if let Some(lo) = min {
        if lo.is_sign_negative() {
            return Err(format!("minimum {what} must not be negative, got {lo}"));
        }
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(format!("minimum {what} {lo} exceeds maximum {hi}"));
        }
    }
    Ok(())
}

fn check_cde(cde: &CdeCriteria) -> std::result::Result<(), String> {
    if cde.remaining_allocation.is_sign_negative() {
        return Err(format!(
            "remaining allocation must not be negative, got {}",
            cde.remaining_allocation
        ));
    }
    check_bounds("deal size", cde.min_deal_size, cde.max_deal_size)?;
    check_service_area(&cde.service_area)?;
    for (field, value, max) in [
        ("minimum poverty rate", cde.min_poverty_rate, constants::MAX_PERCENTAGE),
        ("minimum unemployment rate", cde.min_unemployment_rate, constants::MAX_PERCENTAGE),
        ("maximum MFI percentage", cde.max_mfi_pct, constants::MAX_MFI_PERCENTAGE),
    ] {
        if let Some(v) = value {
            if !in_percent_range(v, max) {
                return Err(format!("{field} {v} outside 0..={max}"));
            }
        }
    }
    Ok(())
}

fn check_investor(investor: &InvestorCriteria) -> std::result::Result<(), String> {
    check_bounds("investment", investor.min_investment, investor.max_investment)?;
    check_service_area(&investor.service_area)?;
    check_states(&investor.cra_states)
}

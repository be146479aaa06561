//! Request sealer — produces a `SealedRequest`.
//!
//! Takes a validated deal and the drained candidate pool, sorts the
//! candidates into canonical order, and commits to the whole input with a
//! SHA-256 hash. Scoring a sealed request twice always yields the same run.

use std::collections::BTreeSet;

use automatch_types::{
    AreaPreference, AutomatchError, CapitalSource, Deal, Result, RunId, SealedRequest, ServiceArea,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

/// Seals deals and candidates into immutable requests with increasing run ids.
pub struct RequestSealer {
    next_run: RunId,
}

impl RequestSealer {
    /// Start numbering runs from `RunId(1)`.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(RunId(1))
    }

    #[must_use]
    pub fn starting_at(first: RunId) -> Self {
        Self { next_run: first }
    }

    /// Seal a deal and its candidates.
    ///
    /// 1. Sort candidates by `SourceId`
    /// 2. Compute the input hash over deal + candidates
    /// 3. Assign the next run id
    pub fn seal(&mut self, deal: Deal, mut candidates: Vec<CapitalSource>) -> SealedRequest {
        candidates.sort_by_key(CapitalSource::id);

        let run_id = self.next_run;
        self.next_run = run_id.next();

        let input_hash = Self::compute_input_hash(run_id, &deal, &candidates);
        tracing::debug!(
            run = %run_id,
            deal = %deal.id,
            candidates = candidates.len(),
            input_hash = hex::encode(input_hash),
            "Request sealed"
        );

        SealedRequest {
            run_id,
            deal,
            candidates,
            input_hash,
            sealed_at: Utc::now(),
        }
    }

    /// Recompute and compare the input hash.
    ///
    /// # Errors
    /// Returns `InputHashMismatch` if the request was altered after sealing.
    pub fn verify_input_hash(request: &SealedRequest) -> Result<()> {
        let expected = Self::compute_input_hash(request.run_id, &request.deal, &request.candidates);
        if expected == request.input_hash {
            Ok(())
        } else {
            Err(AutomatchError::InputHashMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(request.input_hash),
            })
        }
    }

    /// SHA-256 over the run id, every scoring-relevant deal field, and
    /// every candidate's criteria.
    fn compute_input_hash(run_id: RunId, deal: &Deal, candidates: &[CapitalSource]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"automatch:request:v1:");
        hasher.update(run_id.0.to_le_bytes());

        hash_deal(&mut hasher, deal);

        hasher.update((candidates.len() as u64).to_le_bytes());
        for candidate in candidates {
            hash_source(&mut hasher, candidate);
        }

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

impl Default for RequestSealer {
    fn default() -> Self {
        Self::new()
    }
}

/// Length-prefixed string so adjacent fields cannot run together.
fn put_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn put_decimal(hasher: &mut Sha256, d: Decimal) {
    put_str(hasher, &d.normalize().to_string());
}

fn put_opt_decimal(hasher: &mut Sha256, d: Option<Decimal>) {
    match d {
        Some(d) => {
            hasher.update([1u8]);
            put_decimal(hasher, d);
        }
        None => hasher.update([0u8]),
    }
}

/// Sorted, deduplicated labels: list order and repeats carry no meaning.
fn put_labels<T: ToString>(hasher: &mut Sha256, items: impl IntoIterator<Item = T>) {
    let labels: BTreeSet<String> = items.into_iter().map(|i| i.to_string()).collect();
    hasher.update((labels.len() as u64).to_le_bytes());
    for label in &labels {
        put_str(hasher, label);
    }
}

fn put_states(hasher: &mut Sha256, states: &[String]) {
    put_labels(hasher, states.iter().map(|s| s.to_ascii_uppercase()));
}

fn put_opt<T: ToString>(hasher: &mut Sha256, value: Option<T>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            put_str(hasher, &v.to_string());
        }
        None => hasher.update([0u8]),
    }
}

fn put_service_area(hasher: &mut Sha256, area: &ServiceArea) {
    match area {
        ServiceArea::National => hasher.update([0u8]),
        ServiceArea::States(states) => {
            hasher.update([1u8]);
            put_states(hasher, states);
        }
    }
}

fn area_preference_label(pref: AreaPreference) -> &'static str {
    match pref {
        AreaPreference::Urban => "urban",
        AreaPreference::Rural => "rural",
        AreaPreference::Both => "both",
    }
}

fn hash_deal(hasher: &mut Sha256, deal: &Deal) {
    hasher.update(deal.id.0.as_bytes());
    hasher.update(deal.sponsor_id.0.as_bytes());
    put_str(hasher, &deal.name);
    put_labels(hasher, &deal.programs);
    put_str(hasher, &deal.state.to_ascii_uppercase());
    put_str(hasher, &deal.area.to_string());
    put_str(hasher, &deal.sector.to_string());
    put_decimal(hasher, deal.total_project_cost);
    put_decimal(hasher, deal.allocation_request);
    put_decimal(hasher, deal.tract.poverty_rate);
    put_decimal(hasher, deal.tract.median_family_income_pct);
    put_decimal(hasher, deal.tract.unemployment_rate);
    hasher.update([
        u8::from(deal.tract.severely_distressed),
        u8::from(deal.tract.opportunity_zone),
        u8::from(deal.tract.qualified_census_tract),
        u8::from(deal.minority_owned),
        u8::from(deal.tribal),
        u8::from(deal.nonprofit_sponsor),
        u8::from(deal.shovel_ready),
    ]);
    hasher.update(deal.permanent_jobs.to_le_bytes());
    hasher.update(deal.construction_jobs.to_le_bytes());
    put_opt(hasher, deal.target_closing);
}

fn hash_source(hasher: &mut Sha256, source: &CapitalSource) {
    let id = source.id();
    hasher.update([id.tag()]);
    hasher.update(id.as_bytes());
    put_str(hasher, source.name());
    hasher.update([u8::from(source.is_accepting())]);
    put_labels(hasher, source.programs());

    match source {
        CapitalSource::Cde(cde) => {
            put_decimal(hasher, cde.remaining_allocation);
            put_opt_decimal(hasher, cde.min_deal_size);
            put_opt_decimal(hasher, cde.max_deal_size);
            put_service_area(hasher, &cde.service_area);
            put_str(hasher, area_preference_label(cde.area_preference));
            put_labels(hasher, &cde.target_sectors);
            put_opt_decimal(hasher, cde.min_poverty_rate);
            put_opt_decimal(hasher, cde.max_mfi_pct);
            put_opt_decimal(hasher, cde.min_unemployment_rate);
            put_opt(hasher, cde.min_permanent_jobs);
            put_opt(hasher, cde.closing_deadline);
            hasher.update([
                u8::from(cde.requires_severe_distress),
                u8::from(cde.requires_shovel_ready),
                u8::from(cde.prefers_minority_owned),
                u8::from(cde.prefers_tribal),
                u8::from(cde.prefers_nonprofit),
                u8::from(cde.small_deal_focus),
            ]);
        }
        CapitalSource::Investor(investor) => {
            put_opt_decimal(hasher, investor.min_investment);
            put_opt_decimal(hasher, investor.max_investment);
            put_service_area(hasher, &investor.service_area);
            put_labels(hasher, &investor.target_sectors);
            put_states(hasher, &investor.cra_states);
            hasher.update([
                u8::from(investor.requires_opportunity_zone),
                u8::from(investor.requires_qct),
                u8::from(investor.prefers_severe_distress),
            ]);
        }
    }
}

//! Pure scoring: one deal against one capital source.
//!
//! ```text
//! score_match(Deal, CapitalSource, MatchConfig) -> MatchResult
//! ```
//!
//! ## Scoring
//!
//! 1. Evaluate every criterion in fixed order
//! 2. If any eligibility gate is `Unmet`: score 0, strength `INELIGIBLE`
//! 3. Otherwise score = weighted share of satisfied criteria (`Met` or
//!    `Open`), scaled to 0–100 and rounded half-up
//! 4. Strength label from the configured thresholds
//! 5. Reasons = sentences of `Met` criteria, gaps = sentences of `Unmet`

use automatch_types::{
    CapitalSource, CriterionOutcome, CriterionStatus, Deal, MatchConfig, MatchResult,
    MatchStrength,
};

use crate::rules::evaluate;

/// Score `deal` against `source`.
///
/// ## Determinism Guarantee
///
/// No clock, no randomness, no iteration over unordered collections:
/// the same inputs produce the exact same `MatchResult`.
#[must_use]
pub fn score_match(deal: &Deal, source: &CapitalSource, config: &MatchConfig) -> MatchResult {
    let outcomes = evaluate(deal, source, config);

    let gaps: Vec<String> = outcomes
        .iter()
        .filter(|o| o.status == CriterionStatus::Unmet)
        .map(|o| o.detail.clone())
        .collect();

    let disqualified_by = outcomes
        .iter()
        .find(|o| o.kind.is_eligibility() && o.status == CriterionStatus::Unmet)
        .map(|o| o.kind);

    let (score, strength, reasons) = if let Some(kind) = disqualified_by {
        tracing::trace!(
            deal = %deal.id,
            source = %source.id(),
            gate = %kind,
            "Pairing disqualified"
        );
        (0, MatchStrength::Ineligible, Vec::new())
    } else {
        let score = weighted_score(&outcomes, config);
        let reasons = outcomes
            .iter()
            .filter(|o| o.status == CriterionStatus::Met)
            .map(|o| o.detail.clone())
            .collect();
        (score, MatchStrength::from_score(score, &config.strength), reasons)
    };

    MatchResult {
        deal_id: deal.id,
        source_id: source.id(),
        source_name: source.name().to_string(),
        score,
        strength,
        reasons,
        gaps,
        outcomes,
        disqualified_by,
    }
}

/// Weighted share of satisfied criteria on a 0–100 scale, rounded half-up.
///
/// A zero total weight scores 0.
#[must_use]
pub fn weighted_score(outcomes: &[CriterionOutcome], config: &MatchConfig) -> u8 {
    let mut total: u64 = 0;
    let mut satisfied: u64 = 0;
    for outcome in outcomes {
        let weight = u64::from(config.weights.weight(outcome.kind));
        total += weight;
        if outcome.status.is_satisfied() {
            satisfied += weight;
        }
    }
    if total == 0 {
        return 0;
    }
    // round(100 * s / t) with halves rounding up, in integers
    let scaled = (200 * satisfied + total) / (2 * total);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

//! Ranked AutoMatch runs over a bounded candidate set.
//!
//! Two directions share one pipeline:
//!
//! - [`rank_sources`]: capital sources for a sponsor's deal
//! - [`rank_deals`]: deals for a CDE's or investor's pipeline
//!
//! ## Algorithm
//!
//! 1. Score every candidate
//! 2. Drop ineligible pairings and scores under `min_score`
//! 3. Sort by score descending, then counterpart id ascending
//! 4. Truncate to `max_results`
//! 5. Commit to the ranking with a run root

use std::cmp::Ordering;

use automatch_types::{
    CapitalSource, Deal, MatchConfig, MatchResult, MatchRun, RunId, RunSubject, SealedRequest,
};

use crate::{determinism::compute_run_root, scorer::score_match};

/// Rank `sources` for `deal`.
#[must_use]
pub fn rank_sources(
    deal: &Deal,
    sources: &[CapitalSource],
    config: &MatchConfig,
    run_id: RunId,
) -> MatchRun {
    let scored = sources
        .iter()
        .map(|source| score_match(deal, source, config))
        .collect();
    let run = finish_run(run_id, RunSubject::Deal(deal.id), scored, config, |a, b| {
        a.source_id.cmp(&b.source_id)
    });

    tracing::info!(
        run = %run.run_id,
        deal = %deal.id,
        evaluated = run.evaluated,
        matched = run.results.len(),
        excluded = run.excluded,
        top_score = ?run.top().map(|r| r.score),
        run_root = hex::encode(run.run_root),
        "AutoMatch run complete"
    );
    run
}

/// Rank `deals` for `source` (pipeline view).
#[must_use]
pub fn rank_deals(
    source: &CapitalSource,
    deals: &[Deal],
    config: &MatchConfig,
    run_id: RunId,
) -> MatchRun {
    let scored = deals
        .iter()
        .map(|deal| score_match(deal, source, config))
        .collect();
    let run = finish_run(run_id, RunSubject::Source(source.id()), scored, config, |a, b| {
        a.deal_id.cmp(&b.deal_id)
    });

    tracing::info!(
        run = %run.run_id,
        source = %source.id(),
        evaluated = run.evaluated,
        matched = run.results.len(),
        excluded = run.excluded,
        run_root = hex::encode(run.run_root),
        "Pipeline run complete"
    );
    run
}

/// Rank a sealed request's candidates for its deal.
///
/// The request's candidates are already in canonical order, so two nodes
/// holding the same sealed request produce the same run root.
#[must_use]
pub fn score_sealed_request(request: &SealedRequest, config: &MatchConfig) -> MatchRun {
    rank_sources(&request.deal, &request.candidates, config, request.run_id)
}

fn finish_run(
    run_id: RunId,
    subject: RunSubject,
    scored: Vec<MatchResult>,
    config: &MatchConfig,
    tie_break: impl Fn(&MatchResult, &MatchResult) -> Ordering,
) -> MatchRun {
    let evaluated = scored.len();

    let mut results: Vec<MatchResult> = scored
        .into_iter()
        .filter(|r| {
            let keep = r.is_eligible() && r.score >= config.min_score;
            if !keep {
                tracing::debug!(
                    deal = %r.deal_id,
                    source = %r.source_id,
                    score = r.score,
                    disqualified_by = ?r.disqualified_by,
                    "Candidate excluded"
                );
            }
            keep
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| tie_break(a, b)));
    results.truncate(config.max_results);

    let run_root = compute_run_root(&results);
    MatchRun {
        run_id,
        subject,
        excluded: evaluated - results.len(),
        evaluated,
        results,
        run_root,
    }
}

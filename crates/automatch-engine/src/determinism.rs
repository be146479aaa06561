//! Determinism verification for ranked runs.
//!
//! Re-running the same request must produce the exact same ranking. The
//! `run_root` is a SHA-256 commitment over the ranked results that lets an
//! audit compare two runs without diffing full payloads.

use automatch_types::{AutomatchError, MatchResult, MatchRun, Result};
use sha2::{Digest, Sha256};

/// Compute the run root over a ranked result list.
///
/// This hash commits to, for each result in order:
/// - Deal ID and source ID
/// - Score and strength
/// - The disqualifying gate, if any
///
/// Reason sentences are excluded: they are derived from the outcomes and
/// rewording them must not change the commitment.
#[must_use]
pub fn compute_run_root(results: &[MatchResult]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"automatch:run_root:v1:");
    hasher.update((results.len() as u64).to_le_bytes());

    for result in results {
        hasher.update(result.deal_id.0.as_bytes());
        hasher.update([result.source_id.tag()]);
        hasher.update(result.source_id.as_bytes());
        hasher.update([result.score, result.strength.code()]);
        match result.disqualified_by {
            Some(kind) => {
                hasher.update([1u8]);
                hasher.update(kind.label().as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }

    let result = hasher.finalize();
    let mut root = [0u8; 32];
    root.copy_from_slice(&result);
    root
}

/// Verify that a given run root matches the results.
#[must_use]
pub fn verify_run_root(results: &[MatchResult], expected_root: &[u8; 32]) -> bool {
    compute_run_root(results) == *expected_root
}

/// Recompute a run's root and compare it with the one it carries.
///
/// # Errors
/// Returns `DeterminismViolation` if the results were altered after ranking.
pub fn check_run(run: &MatchRun) -> Result<()> {
    let actual = compute_run_root(&run.results);
    if actual == run.run_root {
        Ok(())
    } else {
        tracing::error!(run = %run.run_id, "Run root mismatch");
        Err(AutomatchError::DeterminismViolation {
            expected: hex::encode(run.run_root),
            actual: hex::encode(actual),
        })
    }
}

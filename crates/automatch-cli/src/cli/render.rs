//! Text rendering of a ranked run.

use std::fmt::Write as _;

use automatch_types::{MatchResult, MatchRun};

/// Render `run` as text. `name_of` labels each result's counterpart.
pub fn run_text(run: &MatchRun, name_of: impl Fn(&MatchResult) -> String) -> String {
    let mut out = String::new();

    for (rank, result) in run.results.iter().enumerate() {
        let _ = writeln!(
            out,
            "#{:<3} {:>3}  {:<9}  {}",
            rank + 1,
            result.score,
            result.strength.to_string(),
            name_of(result)
        );
        for reason in &result.reasons {
            let _ = writeln!(out, "       + {reason}");
        }
        for gap in &result.gaps {
            let _ = writeln!(out, "       - {gap}");
        }
    }

    if run.results.is_empty() {
        out.push_str("No matches.\n");
    }
    let _ = writeln!(
        out,
        "{} matched, {} excluded of {} evaluated (run {}, root {})",
        run.results.len(),
        run.excluded,
        run.evaluated,
        run.run_id,
        &hex::encode(run.run_root)[..16]
    );
    out
}

#[cfg(test)]
mod tests {
    use automatch_engine::rank_sources;
    use automatch_types::*;

    use super::*;

    #[test]
    fn lists_results_with_reasons() {
        let deal = Deal::dummy();
        let sources = vec![CapitalSource::from(CdeCriteria::dummy_midwest())];
        let run = rank_sources(&deal, &sources, &MatchConfig::default(), RunId(1));

        let text = run_text(&run, |r| r.source_name.clone());
        let mut lines = text.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("#1"), "{first}");
        assert!(first.contains("100"));
        assert!(first.contains("EXCELLENT"));
        assert!(first.contains("Great Lakes Community Capital"));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with('+')).count(), 14);
        assert!(text.contains("1 matched, 0 excluded of 1 evaluated (run run:1"));
    }

    #[test]
    fn empty_run_says_so() {
        let deal = Deal::dummy();
        let run = rank_sources(&deal, &[], &MatchConfig::default(), RunId(9));
        let text = run_text(&run, |r| r.source_name.clone());
        assert!(text.starts_with("No matches.\n"));
        assert!(text.contains("0 matched"));
    }
}

use std::path::PathBuf;

use anyhow::Context;
use automatch_engine::{check_run, score_sealed_request};
use automatch_intake::{CandidatePool, RequestSealer, RequestValidator};
use automatch_types::{CapitalSource, Deal, MatchConfig, MatchRun};

use super::{Common, read_json, render};

/// Rank capital sources for a sponsor's deal.
///
/// Sources whose criteria fail validation are skipped with a warning; an
/// invalid deal aborts the run.
#[derive(Debug, clap::Parser)]
pub struct Rank {
    /// The deal (JSON object)
    #[arg(long)]
    pub deal: PathBuf,

    /// Candidate CDEs and investors (JSON array)
    #[arg(long)]
    pub sources: PathBuf,

    #[command(flatten)]
    pub common: Common,
}

impl Rank {
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.common.load_config()?;
        let deal: Deal = read_json(&self.deal, "deal")?;
        let sources: Vec<CapitalSource> = read_json(&self.sources, "sources")?;

        let run = rank(&config, deal, sources)?;

        if self.common.json {
            println!("{}", serde_json::to_string_pretty(&run)?);
        } else {
            print!("{}", render::run_text(&run, |r| r.source_name.clone()));
        }
        Ok(())
    }
}

/// Validate, pool, seal and score.
fn rank(config: &MatchConfig, deal: Deal, sources: Vec<CapitalSource>) -> anyhow::Result<MatchRun> {
    let mut validator = RequestValidator::from_config(config);
    validator.admit_run(&deal)?;

    let mut pool = CandidatePool::from_config(config);
    for source in sources {
        if RequestValidator::validate_source(&source).is_err() {
            continue;
        }
        let id = source.id();
        pool.push(source).with_context(|| format!("cannot pool source {id}"))?;
    }
    pool.seal()?;

    let request = RequestSealer::new().seal(deal, pool.drain()?);
    RequestSealer::verify_input_hash(&request)?;
    let run = score_sealed_request(&request, config);
    check_run(&run)?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use automatch_types::*;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn invalid_sources_are_skipped() {
        let mut broken = CdeCriteria::dummy_open();
        broken.remaining_allocation = Decimal::new(-5, 0);
        let sources = vec![
            CapitalSource::from(CdeCriteria::dummy_midwest()),
            CapitalSource::from(broken),
        ];
        let run = rank(&MatchConfig::default(), Deal::dummy(), sources).unwrap();
        assert_eq!(run.evaluated, 1);
        assert_eq!(run.results.len(), 1);
    }

    #[test]
    fn invalid_deal_aborts() {
        let mut deal = Deal::dummy();
        deal.programs.clear();
        let sources = vec![CapitalSource::from(CdeCriteria::dummy_open())];
        let err = rank(&MatchConfig::default(), deal, sources).unwrap_err();
        assert!(format!("{err}").starts_with("AM_ERR_100"), "{err}");
    }

    #[test]
    fn duplicate_source_is_an_error() {
        let source = CapitalSource::from(CdeCriteria::dummy_open());
        let err = rank(
            &MatchConfig::default(),
            Deal::dummy(),
            vec![source.clone(), source],
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("AM_ERR_400"), "{err:#}");
    }
}

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use automatch_engine::{check_run, rank_deals};
use automatch_intake::{DealPool, RequestValidator};
use automatch_types::{CapitalSource, Deal, MatchConfig, MatchRun, RunId};

use super::{Common, read_json, render};

/// Rank deals for one CDE's or investor's pipeline.
///
/// The source must validate; deals that fail validation are skipped with a
/// warning. Duplicate deal ids and more deals than the run capacity abort
/// the run.
#[derive(Debug, clap::Parser)]
pub struct Pipeline {
    /// The CDE or investor (JSON object tagged with `kind`)
    #[arg(long)]
    pub source: PathBuf,

    /// Candidate deals (JSON array)
    #[arg(long)]
    pub deals: PathBuf,

    #[command(flatten)]
    pub common: Common,
}

impl Pipeline {
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.common.load_config()?;
        let source: CapitalSource = read_json(&self.source, "source")?;
        let deals: Vec<Deal> = read_json(&self.deals, "deals")?;

        let run = pipeline(&config, &source, &deals)?;

        if self.common.json {
            println!("{}", serde_json::to_string_pretty(&run)?);
        } else {
            let names: HashMap<_, _> = deals.iter().map(|d| (d.id, d.name.as_str())).collect();
            print!(
                "{}",
                render::run_text(&run, |r| {
                    names.get(&r.deal_id).map_or_else(|| r.deal_id.to_string(), |n| (*n).to_string())
                })
            );
        }
        Ok(())
    }
}

fn pipeline(config: &MatchConfig, source: &CapitalSource, deals: &[Deal]) -> anyhow::Result<MatchRun> {
    RequestValidator::validate_source(source)?;

    let mut pool = DealPool::from_config(config);
    for deal in deals {
        if RequestValidator::validate_deal(deal).is_err() {
            continue;
        }
        pool.push(deal.clone())
            .with_context(|| format!("cannot pool deal {}", deal.id))?;
    }
    pool.seal()?;

    let run = rank_deals(source, &pool.drain()?, config, RunId(1));
    check_run(&run)?;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use automatch_types::*;

    use super::*;

    #[test]
    fn ranks_valid_deals_only() {
        let cde = CapitalSource::from(CdeCriteria::dummy_midwest());
        let good = Deal::dummy();
        let mut nameless = Deal::dummy();
        nameless.name = String::new();

        let run = pipeline(&MatchConfig::default(), &cde, &[nameless, good.clone()]).unwrap();
        assert_eq!(run.evaluated, 1);
        assert_eq!(run.results[0].deal_id, good.id);
        assert_eq!(run.subject, RunSubject::Source(cde.id()));
    }

    #[test]
    fn duplicate_deal_aborts() {
        let cde = CapitalSource::from(CdeCriteria::dummy_open());
        let deal = Deal::dummy();
        let err = pipeline(&MatchConfig::default(), &cde, &[deal.clone(), deal]).unwrap_err();
        assert!(format!("{err:#}").contains("AM_ERR_404"), "{err:#}");
    }

    #[test]
    fn overflow_aborts_instead_of_truncating() {
        let cfg = MatchConfig { max_candidates_per_run: 1, ..MatchConfig::default() };
        let cde = CapitalSource::from(CdeCriteria::dummy_open());
        let deals = [Deal::dummy(), Deal::dummy(), Deal::dummy()];
        let err = pipeline(&cfg, &cde, &deals).unwrap_err();
        assert!(format!("{err:#}").contains("AM_ERR_401"), "{err:#}");
    }

    #[test]
    fn invalid_source_aborts() {
        let mut investor = InvestorCriteria::dummy();
        investor.programs.clear();
        let err = pipeline(
            &MatchConfig::default(),
            &CapitalSource::from(investor),
            &[Deal::dummy()],
        )
        .unwrap_err();
        assert!(format!("{err}").starts_with("AM_ERR_200"), "{err}");
    }
}

//! End-to-end integration tests across intake, engine, and outreach.
//!
//! These tests exercise the full AutoMatch lifecycle:
//! Validate (Intake) -> Pool + Seal (Intake) -> Score + Rank (Engine)
//! -> Notify + Request (Outreach)
//!
//! They verify that the crates work together in realistic scenarios:
//! repeat runs after a deal edit, request quotas, ordering independence,
//! and tamper detection on sealed requests.

use automatch_engine::{check_run, score_sealed_request};
use automatch_intake::{CandidatePool, RequestSealer, RequestValidator};
use automatch_outreach::{MatchKey, MatchLedger, RequestBook};
use automatch_types::*;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;

/// Helper: full run pipeline — validate, pool, seal, score, notify.
struct RunPipeline {
    config: MatchConfig,
    validator: RequestValidator,
    pool: CandidatePool,
    sealer: RequestSealer,
    ledger: MatchLedger,
    book: RequestBook,
}

impl RunPipeline {
    fn new(config: MatchConfig) -> Self {
        Self {
            validator: RequestValidator::from_config(&config),
            pool: CandidatePool::from_config(&config),
            sealer: RequestSealer::new(),
            ledger: MatchLedger::new(config.ledger_capacity),
            book: RequestBook::from_config(&config),
            config,
        }
    }

    /// Run AutoMatch for `deal`; invalid sources are skipped. Returns the
    /// run and the number of fresh (never-notified) results.
    fn run(&mut self, deal: &Deal, sources: &[CapitalSource]) -> Result<(MatchRun, usize)> {
        // 1. Admit the run
        self.validator.admit_run(deal)?;

        // 2. Pool validated candidates
        self.pool.reset();
        for source in sources {
            if RequestValidator::validate_source(source).is_ok() {
                self.pool.push(source.clone())?;
            }
        }

        // 3. Seal
        self.pool.seal()?;
        let candidates = self.pool.drain()?;
        let request = self.sealer.seal(deal.clone(), candidates);
        RequestSealer::verify_input_hash(&request)?;

        // 4. Score and rank
        let run = score_sealed_request(&request, &self.config);
        check_run(&run)?;

        // 5. Notify only new pairings
        let fresh = self.ledger.record_run(&run).len();
        Ok((run, fresh))
    }
}

fn sources() -> Vec<CapitalSource> {
    let mut closed = CdeCriteria::dummy_open();
    closed.name = "Closed Fund".into();
    closed.accepting = false;

    vec![
        CapitalSource::from(CdeCriteria::dummy_midwest()),
        CapitalSource::from(CdeCriteria::dummy_open()),
        CapitalSource::from(InvestorCriteria::dummy()),
        CapitalSource::from(closed),
    ]
}

// =============================================================================
// Test: Simple run across all three crates
// =============================================================================
#[test]
fn e2e_simple_run() {
    let mut pipeline = RunPipeline::new(MatchConfig::default());
    let deal = Deal::dummy();

    let (run, fresh) = pipeline.run(&deal, &sources()).unwrap();

    assert_eq!(run.run_id, RunId(1));
    assert_eq!(run.evaluated, 4);
    assert_eq!(run.results.len(), 3, "Closed CDE must be excluded");
    assert_eq!(run.excluded, 1);
    assert_eq!(fresh, 3);
    assert!(run.results.iter().all(|r| r.score == 100));
    assert!(run.results.iter().all(|r| r.strength == MatchStrength::Excellent));
    assert_eq!(pipeline.ledger.len(), 3);
}

// =============================================================================
// Test: Re-running after an edit only surfaces new matches
// =============================================================================
#[test]
fn e2e_rerun_notifies_only_new_matches() {
    let mut pipeline = RunPipeline::new(MatchConfig::default());
    let mut deal = Deal::dummy();
    let mut all = sources();

    // Run 1: deal is not shovel ready, so the midwest CDE drops to 94.
    deal.shovel_ready = false;
    let (first, fresh) = pipeline.run(&deal, &all).unwrap();
    assert_eq!(fresh, 3);
    assert_eq!(first.results[0].score, 100);

    // Run 2: sponsor fixes the deal; a new investor joined meanwhile.
    deal.shovel_ready = true;
    let mut newcomer = InvestorCriteria::dummy();
    newcomer.name = "Lakeshore Impact Partners".into();
    let newcomer_id = newcomer.id;
    all.push(CapitalSource::from(newcomer));

    let (second, fresh) = pipeline.run(&deal, &all).unwrap();
    assert_eq!(second.run_id, RunId(2));
    assert_eq!(second.results.len(), 4);
    assert_eq!(fresh, 1, "Only the newcomer should be notified");
    assert!(pipeline.ledger.contains(&MatchKey {
        deal_id: deal.id,
        source_id: SourceId::Investor(newcomer_id),
    }));

    // Run 3: nothing changed, nothing to notify.
    let (_, fresh) = pipeline.run(&deal, &all).unwrap();
    assert_eq!(fresh, 0);
}

// =============================================================================
// Test: Invalid sources never reach the engine
// =============================================================================
#[test]
fn e2e_invalid_sources_skipped() {
    let mut pipeline = RunPipeline::new(MatchConfig::default());
    let deal = Deal::dummy();

    let mut broken = CdeCriteria::dummy_midwest();
    broken.min_deal_size = Some(Decimal::new(90_000_000, 0));
    let mut all = sources();
    all.push(CapitalSource::from(broken));

    let (run, _) = pipeline.run(&deal, &all).unwrap();
    assert_eq!(run.evaluated, 4);
}

// =============================================================================
// Test: Invalid deal rejected before scoring
// =============================================================================
#[test]
fn e2e_invalid_deal_rejected() {
    let mut pipeline = RunPipeline::new(MatchConfig::default());
    let mut deal = Deal::dummy();
    deal.tract.unemployment_rate = Decimal::new(-3, 0);

    let err = pipeline.run(&deal, &sources()).unwrap_err();
    assert!(matches!(err, AutomatchError::InvalidDeal { .. }));
    assert!(pipeline.ledger.is_empty());
    assert_eq!(pipeline.validator.sponsor_run_count(&deal.sponsor_id), 0);
}

// =============================================================================
// Test: Sponsor run limit
// =============================================================================
#[test]
fn e2e_sponsor_run_limit() {
    let config = MatchConfig { max_runs_per_sponsor: 2, ..MatchConfig::default() };
    let mut pipeline = RunPipeline::new(config);
    let deal = Deal::dummy();

    pipeline.run(&deal, &sources()).unwrap();
    pipeline.run(&deal, &sources()).unwrap();
    let err = pipeline.run(&deal, &sources()).unwrap_err();
    assert!(matches!(err, AutomatchError::RunLimitExceeded { count: 2, .. }));

    pipeline.validator.advance_window();
    assert!(pipeline.run(&deal, &sources()).is_ok());
}

// =============================================================================
// Test: Requests opened from a run respect the pending quota
// =============================================================================
#[test]
fn e2e_requests_from_run() {
    let config = MatchConfig { max_open_requests_per_deal: 2, ..MatchConfig::default() };
    let mut pipeline = RunPipeline::new(config);
    let deal = Deal::dummy();

    let (run, _) = pipeline.run(&deal, &sources()).unwrap();
    assert_eq!(run.results.len(), 3);

    let first = pipeline.book.open(deal.sponsor_id, &run.results[0]).unwrap();
    let second = pipeline.book.open(deal.sponsor_id, &run.results[1]).unwrap();
    let err = pipeline.book.open(deal.sponsor_id, &run.results[2]).unwrap_err();
    assert!(matches!(err, AutomatchError::RequestLimitExceeded { limit: 2, .. }));

    // The top source accepts; the slot frees up.
    let accepted = pipeline.book.accept(first).unwrap();
    assert_eq!(accepted.status, RequestStatus::Accepted);
    assert_eq!(accepted.score, run.results[0].score);
    assert!(pipeline.book.open(deal.sponsor_id, &run.results[2]).is_ok());

    // Declined requests stay declined.
    pipeline.book.decline(second).unwrap();
    assert!(pipeline.book.withdraw(second).is_err());
    assert_eq!(pipeline.book.pending_count(deal.id), 1);
    assert_eq!(pipeline.book.for_deal(deal.id).count(), 3);
}

// =============================================================================
// Test: Candidate order never changes the outcome
// =============================================================================
#[test]
fn e2e_order_independent() {
    let deal = Deal::dummy();
    let base = sources();

    let mut reference = RunPipeline::new(MatchConfig::default());
    let (expected, _) = reference.run(&deal, &base).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let mut shuffled = base.clone();
        shuffled.shuffle(&mut rng);
        let mut pipeline = RunPipeline::new(MatchConfig::default());
        let (run, _) = pipeline.run(&deal, &shuffled).unwrap();
        assert_eq!(run.run_root, expected.run_root);
        assert_eq!(run.results, expected.results);
    }
}

// =============================================================================
// Test: Tampering with a sealed request is detected
// =============================================================================
#[test]
fn e2e_tampered_request_detected() {
    let mut sealer = RequestSealer::new();
    let mut request = sealer.seal(Deal::dummy(), sources());
    assert!(RequestSealer::verify_input_hash(&request).is_ok());

    request.deal.allocation_request = Decimal::new(1, 0);
    let err = RequestSealer::verify_input_hash(&request).unwrap_err();
    assert!(format!("{err}").starts_with("AM_ERR_300"), "{err}");
}

//! Criterion rules: one function per criterion, each returning a
//! [`CriterionOutcome`] with a human-readable sentence.
//!
//! Evaluation order is fixed — eligibility gates first, then preferences —
//! so reasons always read in the same order and the first failing gate is
//! well defined.
//!
//! A rule returns `Open` when the source states no constraint on that
//! criterion; `Met` / `Unmet` only when a constraint exists.

use automatch_types::{
    CapitalSource, CdeCriteria, CriterionKind, CriterionOutcome, Deal, InvestorCriteria,
    MatchConfig, ProjectSector, ServiceArea,
};
use rust_decimal::Decimal;

use crate::format::{dollars, percent};

/// Evaluate every criterion for `deal` against `source`.
#[must_use]
pub fn evaluate(deal: &Deal, source: &CapitalSource, config: &MatchConfig) -> Vec<CriterionOutcome> {
    match source {
        CapitalSource::Cde(cde) => evaluate_cde(deal, cde, config),
        CapitalSource::Investor(investor) => evaluate_investor(deal, investor),
    }
}

/// Evaluate the CDE criteria set.
#[must_use]
pub fn evaluate_cde(deal: &Deal, cde: &CdeCriteria, config: &MatchConfig) -> Vec<CriterionOutcome> {
    vec![
        program(deal, &cde.programs),
        accepting(cde.accepting),
        allocation(deal, cde),
        geography(deal, &cde.service_area),
        area_type(deal, cde),
        sector(deal, &cde.target_sectors),
        deal_size(deal, cde.min_deal_size, cde.max_deal_size),
        poverty(deal, cde.min_poverty_rate),
        income(deal, cde.max_mfi_pct),
        unemployment(deal, cde.min_unemployment_rate),
        severe_distress(deal, cde.requires_severe_distress),
        jobs(deal, cde.min_permanent_jobs),
        readiness(deal, cde),
        flag(
            CriterionKind::MinorityOwned,
            cde.prefers_minority_owned,
            deal.minority_owned,
            "Minority-owned sponsor fits the CDE's minority-business focus",
            "CDE prioritizes minority-owned sponsors",
        ),
        flag(
            CriterionKind::Tribal,
            cde.prefers_tribal,
            deal.tribal,
            "Serves a Native American community the CDE targets",
            "CDE prioritizes projects serving Native American communities",
        ),
        flag(
            CriterionKind::Nonprofit,
            cde.prefers_nonprofit,
            deal.nonprofit_sponsor,
            "Nonprofit sponsor fits the CDE's nonprofit focus",
            "CDE prioritizes nonprofit sponsors",
        ),
        small_deal(deal, cde.small_deal_focus, config.small_deal_threshold),
    ]
}

/// Evaluate the investor criteria set.
#[must_use]
pub fn evaluate_investor(deal: &Deal, investor: &InvestorCriteria) -> Vec<CriterionOutcome> {
    vec![
        program(deal, &investor.programs),
        accepting(investor.accepting),
        geography(deal, &investor.service_area),
        sector(deal, &investor.target_sectors),
        investment_size(deal, investor),
        cra_area(deal, &investor.cra_states),
        flag(
            CriterionKind::OpportunityZone,
            investor.requires_opportunity_zone,
            deal.tract.opportunity_zone,
            "Located in a designated Opportunity Zone",
            "Investor requires an Opportunity Zone location",
        ),
        flag(
            CriterionKind::QualifiedCensusTract,
            investor.requires_qct,
            deal.tract.qualified_census_tract,
            "Located in a Qualified Census Tract",
            "Investor requires a Qualified Census Tract",
        ),
        severe_distress(deal, investor.prefers_severe_distress),
    ]
}

// ---------------------------------------------------------------------------
// Eligibility gates
// ---------------------------------------------------------------------------

fn program(deal: &Deal, offered: &[automatch_types::ProgramType]) -> CriterionOutcome {
    let shared: Vec<String> = deal
        .programs
        .iter()
        .filter(|p| offered.contains(p))
        .map(ToString::to_string)
        .collect();
    if shared.is_empty() {
        let sought: Vec<String> = deal.programs.iter().map(ToString::to_string).collect();
        CriterionOutcome::unmet(
            CriterionKind::Program,
            format!("Source does not deploy {}", sought.join(" / ")),
        )
    } else {
        CriterionOutcome::met(
            CriterionKind::Program,
            format!("Program fit: {}", shared.join(" / ")),
        )
    }
}

fn accepting(accepting: bool) -> CriterionOutcome {
    CriterionOutcome::check(
        CriterionKind::Accepting,
        accepting,
        "Currently accepting new deals",
        "Not accepting new deals",
    )
}

fn allocation(deal: &Deal, cde: &CdeCriteria) -> CriterionOutcome {
    CriterionOutcome::check(
        CriterionKind::Allocation,
        cde.remaining_allocation >= deal.allocation_request,
        format!(
            "{} remaining allocation covers the {} request",
            dollars(cde.remaining_allocation),
            dollars(deal.allocation_request),
        ),
        format!(
            "Only {} allocation remaining, {} requested",
            dollars(cde.remaining_allocation),
            dollars(deal.allocation_request),
        ),
    )
}

// ---------------------------------------------------------------------------
// Shared preferences
// ---------------------------------------------------------------------------

fn geography(deal: &Deal, area: &ServiceArea) -> CriterionOutcome {
    match area {
        ServiceArea::National => CriterionOutcome::met(
            CriterionKind::Geography,
            format!("National service area includes {}", deal.state.to_uppercase()),
        ),
        ServiceArea::States(_) => CriterionOutcome::check(
            CriterionKind::Geography,
            area.contains(&deal.state),
            format!("Project in {}, within the service area", deal.state.to_uppercase()),
            format!("Project in {}, outside the service area", deal.state.to_uppercase()),
        ),
    }
}

fn sector(deal: &Deal, targets: &[ProjectSector]) -> CriterionOutcome {
    if targets.is_empty() {
        return CriterionOutcome::open(CriterionKind::Sector, "No sector restriction");
    }
    CriterionOutcome::check(
        CriterionKind::Sector,
        targets.contains(&deal.sector),
        format!("Targets {} projects", deal.sector),
        format!("Does not target {} projects", deal.sector),
    )
}

fn severe_distress(deal: &Deal, wanted: bool) -> CriterionOutcome {
    flag(
        CriterionKind::SevereDistress,
        wanted,
        deal.tract.severely_distressed,
        "Located in a severely distressed census tract",
        "Prefers severely distressed census tracts",
    )
}

/// Boolean preference: `Open` unless the source states it.
fn flag(kind: CriterionKind, wanted: bool, has: bool, met: &str, unmet: &str) -> CriterionOutcome {
    if wanted {
        CriterionOutcome::check(kind, has, met, unmet)
    } else {
        CriterionOutcome::open(kind, format!("No {kind} requirement"))
    }
}

/// `[min, max]` range check on a dollar amount. Either bound may be absent.
fn within_range(
    kind: CriterionKind,
    what: &str,
    amount: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> CriterionOutcome {
    let too_small = min.is_some_and(|m| amount < m);
    let too_large = max.is_some_and(|m| amount > m);
    let range = match (min, max) {
        (None, None) => {
            return CriterionOutcome::open(kind, format!("No {what} limits"));
        }
        (Some(lo), Some(hi)) => format!("{}–{}", dollars(lo), dollars(hi)),
        (Some(lo), None) => format!("at least {}", dollars(lo)),
        (None, Some(hi)) => format!("up to {}", dollars(hi)),
    };
    CriterionOutcome::check(
        kind,
        !too_small && !too_large,
        format!("{} {what} within the {range} range", dollars(amount)),
        format!("{} {what} outside the {range} range", dollars(amount)),
    )
}

// ---------------------------------------------------------------------------
// CDE preferences
// ---------------------------------------------------------------------------

fn area_type(deal: &Deal, cde: &CdeCriteria) -> CriterionOutcome {
    if cde.area_preference == automatch_types::AreaPreference::Both {
        return CriterionOutcome::open(CriterionKind::AreaType, "Serves urban and rural areas");
    }
    CriterionOutcome::check(
        CriterionKind::AreaType,
        cde.area_preference.admits(deal.area),
        format!("Focuses on {} projects", deal.area),
        format!("Does not focus on {} projects", deal.area),
    )
}

fn deal_size(deal: &Deal, min: Option<Decimal>, max: Option<Decimal>) -> CriterionOutcome {
    within_range(CriterionKind::DealSize, "project cost", deal.total_project_cost, min, max)
}

fn poverty(deal: &Deal, min: Option<Decimal>) -> CriterionOutcome {
    let Some(min) = min else {
        return CriterionOutcome::open(CriterionKind::Poverty, "No poverty-rate threshold");
    };
    let rate = deal.tract.poverty_rate;
    CriterionOutcome::check(
        CriterionKind::Poverty,
        rate >= min,
        format!("Tract poverty rate {} meets the {} minimum", percent(rate), percent(min)),
        format!("Tract poverty rate {} below the {} minimum", percent(rate), percent(min)),
    )
}

fn income(deal: &Deal, max: Option<Decimal>) -> CriterionOutcome {
    let Some(max) = max else {
        return CriterionOutcome::open(CriterionKind::Income, "No income threshold");
    };
    let mfi = deal.tract.median_family_income_pct;
    CriterionOutcome::check(
        CriterionKind::Income,
        mfi <= max,
        format!("Tract median family income at {} of area median, within the {} cap", percent(mfi), percent(max)),
        format!("Tract median family income at {} of area median, above the {} cap", percent(mfi), percent(max)),
    )
}

fn unemployment(deal: &Deal, min: Option<Decimal>) -> CriterionOutcome {
    let Some(min) = min else {
        return CriterionOutcome::open(CriterionKind::Unemployment, "No unemployment threshold");
    };
    let rate = deal.tract.unemployment_rate;
    CriterionOutcome::check(
        CriterionKind::Unemployment,
        rate >= min,
        format!("Tract unemployment {} meets the {} minimum", percent(rate), percent(min)),
        format!("Tract unemployment {} below the {} minimum", percent(rate), percent(min)),
    )
}

fn jobs(deal: &Deal, min: Option<u32>) -> CriterionOutcome {
    let Some(min) = min else {
        return CriterionOutcome::open(CriterionKind::Jobs, "No job-creation threshold");
    };
    CriterionOutcome::check(
        CriterionKind::Jobs,
        deal.permanent_jobs >= min,
        format!("{} permanent jobs meets the {min}-job minimum", deal.permanent_jobs),
        format!("{} permanent jobs below the {min}-job minimum", deal.permanent_jobs),
    )
}

fn readiness(deal: &Deal, cde: &CdeCriteria) -> CriterionOutcome {
    if !cde.requires_shovel_ready && cde.closing_deadline.is_none() {
        return CriterionOutcome::open(CriterionKind::Readiness, "No readiness requirement");
    }
    if cde.requires_shovel_ready && !deal.shovel_ready {
        return CriterionOutcome::unmet(
            CriterionKind::Readiness,
            "CDE requires shovel-ready projects",
        );
    }
    match (cde.closing_deadline, deal.target_closing) {
        (Some(deadline), Some(closing)) if closing > deadline => CriterionOutcome::unmet(
            CriterionKind::Readiness,
            format!("Target closing {closing} is after the CDE's {deadline} deadline"),
        ),
        (Some(deadline), None) => CriterionOutcome::unmet(
            CriterionKind::Readiness,
            format!("No target closing date against the CDE's {deadline} deadline"),
        ),
        (Some(deadline), Some(closing)) => CriterionOutcome::met(
            CriterionKind::Readiness,
            format!("Target closing {closing} fits the CDE's {deadline} deadline"),
        ),
        (None, _) => CriterionOutcome::met(CriterionKind::Readiness, "Project is shovel ready"),
    }
}

fn small_deal(deal: &Deal, focus: bool, threshold: Decimal) -> CriterionOutcome {
    if !focus {
        return CriterionOutcome::open(CriterionKind::SmallDeal, "No small-deal focus");
    }
    CriterionOutcome::check(
        CriterionKind::SmallDeal,
        deal.total_project_cost <= threshold,
        format!("Small deal at or under {}, matching the CDE's small-deal focus", dollars(threshold)),
        format!("CDE focuses on small deals at or under {}", dollars(threshold)),
    )
}

// ---------------------------------------------------------------------------
// Investor preferences
// ---------------------------------------------------------------------------

fn investment_size(deal: &Deal, investor: &InvestorCriteria) -> CriterionOutcome {
    within_range(
        CriterionKind::InvestmentSize,
        "project cost",
        deal.total_project_cost,
        investor.min_investment,
        investor.max_investment,
    )
}

fn cra_area(deal: &Deal, cra_states: &[String]) -> CriterionOutcome {
    if cra_states.is_empty() {
        return CriterionOutcome::open(CriterionKind::CraArea, "No CRA assessment-area need");
    }
    CriterionOutcome::check(
        CriterionKind::CraArea,
        cra_states.iter().any(|s| s.eq_ignore_ascii_case(&deal.state)),
        format!("{} is in the investor's CRA assessment area", deal.state.to_uppercase()),
        format!("{} is outside the investor's CRA assessment area", deal.state.to_uppercase()),
    )
}

#[cfg(test)]
mod tests {
    use automatch_types::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn find(outcomes: &[CriterionOutcome], kind: CriterionKind) -> &CriterionOutcome {
        outcomes
            .iter()
            .find(|o| o.kind == kind)
            .unwrap_or_else(|| panic!("missing {kind}"))
    }

    #[test]
    fn cde_evaluates_seventeen_criteria_in_order() {
        let outcomes = evaluate_cde(&Deal::dummy(), &CdeCriteria::dummy_open(), &MatchConfig::default());
        let kinds: Vec<CriterionKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, CriterionKind::CDE);
    }

    #[test]
    fn investor_evaluates_nine_criteria() {
        let outcomes = evaluate_investor(&Deal::dummy(), &InvestorCriteria::dummy());
        let kinds: Vec<CriterionKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, CriterionKind::INVESTOR);
    }

    #[test]
    fn open_cde_leaves_preferences_open() {
        let outcomes = evaluate_cde(&Deal::dummy(), &CdeCriteria::dummy_open(), &MatchConfig::default());
        assert_eq!(find(&outcomes, CriterionKind::Sector).status, CriterionStatus::Open);
        assert_eq!(find(&outcomes, CriterionKind::Poverty).status, CriterionStatus::Open);
        assert_eq!(find(&outcomes, CriterionKind::Readiness).status, CriterionStatus::Open);
        // National service area is an explicit statement, not an absence.
        assert_eq!(find(&outcomes, CriterionKind::Geography).status, CriterionStatus::Met);
    }

    #[test]
    fn program_mismatch_is_unmet() {
        let mut deal = Deal::dummy();
        deal.programs = vec![ProgramType::Lihtc];
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_open(), &MatchConfig::default());
        let program = find(&outcomes, CriterionKind::Program);
        assert_eq!(program.status, CriterionStatus::Unmet);
        assert!(program.detail.contains("LIHTC"), "{}", program.detail);
    }

    #[test]
    fn allocation_shortfall_is_unmet() {
        let mut cde = CdeCriteria::dummy_open();
        cde.remaining_allocation = Decimal::new(1_000_000, 0);
        let outcomes = evaluate_cde(&Deal::dummy(), &cde, &MatchConfig::default());
        let alloc = find(&outcomes, CriterionKind::Allocation);
        assert_eq!(alloc.status, CriterionStatus::Unmet);
        assert_eq!(alloc.detail, "Only $1,000,000 allocation remaining, $8,000,000 requested");
    }

    #[test]
    fn allocation_exactly_equal_is_met() {
        let mut cde = CdeCriteria::dummy_open();
        cde.remaining_allocation = Decimal::new(8_000_000, 0);
        let outcomes = evaluate_cde(&Deal::dummy(), &cde, &MatchConfig::default());
        assert_eq!(find(&outcomes, CriterionKind::Allocation).status, CriterionStatus::Met);
    }

    #[test]
    fn state_outside_service_area() {
        let mut deal = Deal::dummy();
        deal.state = "TX".into();
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        let geo = find(&outcomes, CriterionKind::Geography);
        assert_eq!(geo.status, CriterionStatus::Unmet);
        assert!(geo.detail.contains("TX"));
    }

    #[test]
    fn midwest_cde_all_met_for_dummy_deal() {
        let outcomes = evaluate_cde(&Deal::dummy(), &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        let unmet: Vec<_> = outcomes
            .iter()
            .filter(|o| o.status == CriterionStatus::Unmet)
            .map(|o| o.detail.clone())
            .collect();
        assert!(unmet.is_empty(), "unexpected gaps: {unmet:?}");
    }

    #[test]
    fn thresholds_are_inclusive() {
        let mut deal = Deal::dummy();
        deal.tract.poverty_rate = Decimal::new(30, 0);
        deal.tract.median_family_income_pct = Decimal::new(60, 0);
        deal.tract.unemployment_rate = Decimal::new(9, 0);
        deal.permanent_jobs = 25;
        deal.total_project_cost = Decimal::new(25_000_000, 0);
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        for kind in [
            CriterionKind::Poverty,
            CriterionKind::Income,
            CriterionKind::Unemployment,
            CriterionKind::Jobs,
            CriterionKind::DealSize,
        ] {
            assert_eq!(find(&outcomes, kind).status, CriterionStatus::Met, "{kind}");
        }
    }

    #[test]
    fn high_income_tract_fails_income_cap() {
        let mut deal = Deal::dummy();
        deal.tract.median_family_income_pct = Decimal::new(795, 1);
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        let income = find(&outcomes, CriterionKind::Income);
        assert_eq!(income.status, CriterionStatus::Unmet);
        assert!(income.detail.contains("79.5%"), "{}", income.detail);
    }

    #[test]
    fn readiness_requires_shovel_ready() {
        let mut deal = Deal::dummy();
        deal.shovel_ready = false;
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        assert_eq!(find(&outcomes, CriterionKind::Readiness).status, CriterionStatus::Unmet);
    }

    #[test]
    fn readiness_late_closing() {
        let mut deal = Deal::dummy();
        deal.target_closing = NaiveDate::from_ymd_opt(2027, 6, 30);
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        let readiness = find(&outcomes, CriterionKind::Readiness);
        assert_eq!(readiness.status, CriterionStatus::Unmet);
        assert!(readiness.detail.contains("2027-06-30"));
    }

    #[test]
    fn readiness_deadline_without_target_closing() {
        let mut deal = Deal::dummy();
        deal.target_closing = None;
        let outcomes = evaluate_cde(&deal, &CdeCriteria::dummy_midwest(), &MatchConfig::default());
        assert_eq!(find(&outcomes, CriterionKind::Readiness).status, CriterionStatus::Unmet);
    }

    #[test]
    fn small_deal_focus_uses_config_threshold() {
        let mut cde = CdeCriteria::dummy_open();
        cde.small_deal_focus = true;
        let deal = Deal::dummy(); // $12M
        let cfg = MatchConfig::default();
        let outcomes = evaluate_cde(&deal, &cde, &cfg);
        assert_eq!(find(&outcomes, CriterionKind::SmallDeal).status, CriterionStatus::Unmet);

        let cfg = MatchConfig {
            small_deal_threshold: Decimal::new(15_000_000, 0),
            ..MatchConfig::default()
        };
        let outcomes = evaluate_cde(&deal, &cde, &cfg);
        assert_eq!(find(&outcomes, CriterionKind::SmallDeal).status, CriterionStatus::Met);
    }

    #[test]
    fn preference_flags() {
        let mut cde = CdeCriteria::dummy_open();
        cde.prefers_minority_owned = true;
        cde.prefers_tribal = true;
        let mut deal = Deal::dummy();
        deal.minority_owned = true;
        let outcomes = evaluate_cde(&deal, &cde, &MatchConfig::default());
        assert_eq!(find(&outcomes, CriterionKind::MinorityOwned).status, CriterionStatus::Met);
        assert_eq!(find(&outcomes, CriterionKind::Tribal).status, CriterionStatus::Unmet);
        assert_eq!(find(&outcomes, CriterionKind::Nonprofit).status, CriterionStatus::Open);
    }

    #[test]
    fn investor_cra_and_oz() {
        let mut investor = InvestorCriteria::dummy();
        investor.requires_opportunity_zone = true;
        investor.requires_qct = true;
        let outcomes = evaluate_investor(&Deal::dummy(), &investor);
        assert_eq!(find(&outcomes, CriterionKind::CraArea).status, CriterionStatus::Met);
        assert_eq!(find(&outcomes, CriterionKind::OpportunityZone).status, CriterionStatus::Met);
        assert_eq!(
            find(&outcomes, CriterionKind::QualifiedCensusTract).status,
            CriterionStatus::Unmet
        );
    }

    #[test]
    fn investment_size_one_sided_bound() {
        let mut investor = InvestorCriteria::dummy();
        investor.min_investment = None;
        investor.max_investment = Some(Decimal::new(10_000_000, 0));
        let outcomes = evaluate_investor(&Deal::dummy(), &investor);
        let size = find(&outcomes, CriterionKind::InvestmentSize);
        assert_eq!(size.status, CriterionStatus::Unmet);
        assert!(size.detail.contains("up to $10,000,000"), "{}", size.detail);
    }

    #[test]
    fn dispatch_matches_source_kind() {
        let deal = Deal::dummy();
        let cfg = MatchConfig::default();
        let cde = CapitalSource::from(CdeCriteria::dummy_open());
        let inv = CapitalSource::from(InvestorCriteria::dummy());
        assert_eq!(evaluate(&deal, &cde, &cfg).len(), 17);
        assert_eq!(evaluate(&deal, &inv, &cfg).len(), 9);
    }
}

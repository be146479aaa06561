//! Investment criteria published by capital sources.
//!
//! A CDE states where and what it will deploy NMTC allocation into; an
//! investor states what credits it buys. Every optional field is a
//! constraint the source *may* state — `None`, `false` or an empty list
//! means the source does not restrict on it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AreaPreference, CdeId, InvestorId, ProgramType, ProjectSector, ServiceArea, SourceId};

/// A CDE's stated investment criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdeCriteria {
    pub id: CdeId,
    pub name: String,
    /// Programs the CDE deploys (normally NMTC).
    pub programs: Vec<ProgramType>,
    /// Currently accepting new deals into its pipeline.
    pub accepting: bool,
    /// Unallocated NMTC authority, in dollars.
    pub remaining_allocation: Decimal,
    #[serde(default)]
    pub min_deal_size: Option<Decimal>,
    #[serde(default)]
    pub max_deal_size: Option<Decimal>,
    #[serde(default)]
    pub service_area: ServiceArea,
    #[serde(default)]
    pub area_preference: AreaPreference,
    /// Empty means any sector.
    #[serde(default)]
    pub target_sectors: Vec<ProjectSector>,
    #[serde(default)]
    pub min_poverty_rate: Option<Decimal>,
    #[serde(default)]
    pub max_mfi_pct: Option<Decimal>,
    #[serde(default)]
    pub min_unemployment_rate: Option<Decimal>,
    #[serde(default)]
    pub requires_severe_distress: bool,
    #[serde(default)]
    pub min_permanent_jobs: Option<u32>,
    #[serde(default)]
    pub requires_shovel_ready: bool,
    /// Deals must target a closing on or before this date.
    #[serde(default)]
    pub closing_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub prefers_minority_owned: bool,
    #[serde(default)]
    pub prefers_tribal: bool,
    #[serde(default)]
    pub prefers_nonprofit: bool,
    #[serde(default)]
    pub small_deal_focus: bool,
}

/// An investor's stated buying criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorCriteria {
    pub id: InvestorId,
    pub name: String,
    pub programs: Vec<ProgramType>,
    pub accepting: bool,
    #[serde(default)]
    pub min_investment: Option<Decimal>,
    #[serde(default)]
    pub max_investment: Option<Decimal>,
    #[serde(default)]
    pub service_area: ServiceArea,
    #[serde(default)]
    pub target_sectors: Vec<ProjectSector>,
    /// States covering the investor's Community Reinvestment Act
    /// assessment areas. Empty means no CRA motivation.
    #[serde(default)]
    pub cra_states: Vec<String>,
    #[serde(default)]
    pub requires_opportunity_zone: bool,
    #[serde(default)]
    pub requires_qct: bool,
    #[serde(default)]
    pub prefers_severe_distress: bool,
}

/// Either kind of capital source a deal can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapitalSource {
    Cde(CdeCriteria),
    Investor(InvestorCriteria),
}

impl CapitalSource {
    #[must_use]
    pub fn id(&self) -> SourceId {
        match self {
            Self::Cde(c) => SourceId::Cde(c.id),
            Self::Investor(i) => SourceId::Investor(i.id),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Cde(c) => &c.name,
            Self::Investor(i) => &i.name,
        }
    }

    #[must_use]
    pub fn programs(&self) -> &[ProgramType] {
        match self {
            Self::Cde(c) => &c.programs,
            Self::Investor(i) => &i.programs,
        }
    }

    #[must_use]
    pub fn is_accepting(&self) -> bool {
        match self {
            Self::Cde(c) => c.accepting,
            Self::Investor(i) => i.accepting,
        }
    }
}

impl From<CdeCriteria> for CapitalSource {
    fn from(c: CdeCriteria) -> Self {
        Self::Cde(c)
    }
}

impl From<InvestorCriteria> for CapitalSource {
    fn from(i: InvestorCriteria) -> Self {
        Self::Investor(i)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl CdeCriteria {
    /// A national NMTC CDE with no preferences beyond program and allocation.
    pub fn dummy_open() -> Self {
        Self {
            id: CdeId::new(),
            name: "Open Markets Fund".to_string(),
            programs: vec![ProgramType::Nmtc],
            accepting: true,
            remaining_allocation: Decimal::new(50_000_000, 0),
            min_deal_size: None,
            max_deal_size: None,
            service_area: ServiceArea::National,
            area_preference: AreaPreference::Both,
            target_sectors: vec![],
            min_poverty_rate: None,
            max_mfi_pct: None,
            min_unemployment_rate: None,
            requires_severe_distress: false,
            min_permanent_jobs: None,
            requires_shovel_ready: false,
            closing_deadline: None,
            prefers_minority_owned: false,
            prefers_tribal: false,
            prefers_nonprofit: false,
            small_deal_focus: false,
        }
    }

    /// A Midwest CDE that states a constraint on every criterion.
    pub fn dummy_midwest() -> Self {
        Self {
            name: "Great Lakes Community Capital".to_string(),
            min_deal_size: Some(Decimal::new(5_000_000, 0)),
            max_deal_size: Some(Decimal::new(25_000_000, 0)),
            service_area: ServiceArea::States(vec!["OH".into(), "MI".into(), "IN".into()]),
            area_preference: AreaPreference::Urban,
            target_sectors: vec![ProjectSector::Healthcare, ProjectSector::Education],
            min_poverty_rate: Some(Decimal::new(30, 0)),
            max_mfi_pct: Some(Decimal::new(60, 0)),
            min_unemployment_rate: Some(Decimal::new(9, 0)),
            requires_severe_distress: true,
            min_permanent_jobs: Some(25),
            requires_shovel_ready: true,
            closing_deadline: NaiveDate::from_ymd_opt(2027, 3, 31),
            prefers_minority_owned: false,
            prefers_tribal: false,
            prefers_nonprofit: true,
            small_deal_focus: false,
            ..Self::dummy_open()
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl InvestorCriteria {
    /// A national bank investor buying NMTC and HTC credits.
    pub fn dummy() -> Self {
        Self {
            id: InvestorId::new(),
            name: "First Regional Bank CDC".to_string(),
            programs: vec![ProgramType::Nmtc, ProgramType::Htc],
            accepting: true,
            min_investment: Some(Decimal::new(2_000_000, 0)),
            max_investment: Some(Decimal::new(40_000_000, 0)),
            service_area: ServiceArea::National,
            target_sectors: vec![],
            cra_states: vec!["OH".into(), "PA".into()],
            requires_opportunity_zone: false,
            requires_qct: false,
            prefers_severe_distress: true,
        }
    }
}

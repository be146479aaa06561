//! Deal model: a sponsor's project seeking tax-credit financing.
//!
//! Census-tract data is resolved upstream and arrives denormalized on the
//! deal as a [`TractProfile`]; AutoMatch never performs geographic lookups.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AreaType, DealId, ProgramType, ProjectSector, SponsorId};

/// Socio-economic profile of the census tract a deal is located in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TractProfile {
    /// Poverty rate, percent (0–100).
    pub poverty_rate: Decimal,
    /// Tract median family income as a percentage of the area median.
    pub median_family_income_pct: Decimal,
    /// Unemployment rate, percent (0–100).
    pub unemployment_rate: Decimal,
    /// Meets the CDFI Fund "severely distressed" tests.
    #[serde(default)]
    pub severely_distressed: bool,
    /// Designated Opportunity Zone.
    #[serde(default)]
    pub opportunity_zone: bool,
    /// Qualified Census Tract (LIHTC).
    #[serde(default)]
    pub qualified_census_tract: bool,
}

/// A sponsor's deal as seen by the matching engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    pub sponsor_id: SponsorId,
    pub name: String,
    /// Programs the deal is seeking. At least one.
    pub programs: Vec<ProgramType>,
    /// Two-letter state code.
    pub state: String,
    pub area: AreaType,
    pub sector: ProjectSector,
    /// Total project cost in dollars.
    pub total_project_cost: Decimal,
    /// NMTC allocation requested from a CDE, in dollars.
    #[serde(default)]
    pub allocation_request: Decimal,
    pub tract: TractProfile,
    #[serde(default)]
    pub permanent_jobs: u32,
    #[serde(default)]
    pub construction_jobs: u32,
    #[serde(default)]
    pub minority_owned: bool,
    /// Serves or is located in a Native American community.
    #[serde(default)]
    pub tribal: bool,
    #[serde(default)]
    pub nonprofit_sponsor: bool,
    #[serde(default)]
    pub shovel_ready: bool,
    #[serde(default)]
    pub target_closing: Option<NaiveDate>,
}

impl Deal {
    /// Permanent jobs per $1M of total project cost.
    #[must_use]
    pub fn jobs_per_million(&self) -> Decimal {
        if self.total_project_cost <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        Decimal::from(self.permanent_jobs) * Decimal::from(1_000_000) / self.total_project_cost
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Deal {
    /// An urban NMTC healthcare deal in Ohio that clears typical CDE
    /// distress thresholds.
    pub fn dummy() -> Self {
        Self {
            id: DealId::new(),
            sponsor_id: SponsorId::new(),
            name: "Eastside Community Health Center".to_string(),
            programs: vec![ProgramType::Nmtc],
            state: "OH".to_string(),
            area: AreaType::Urban,
            sector: ProjectSector::Healthcare,
            total_project_cost: Decimal::new(12_000_000, 0),
            allocation_request: Decimal::new(8_000_000, 0),
            tract: TractProfile {
                poverty_rate: Decimal::new(325, 1),
                median_family_income_pct: Decimal::new(48, 0),
                unemployment_rate: Decimal::new(112, 1),
                severely_distressed: true,
                opportunity_zone: true,
                qualified_census_tract: false,
            },
            permanent_jobs: 85,
            construction_jobs: 140,
            minority_owned: false,
            tribal: false,
            nonprofit_sponsor: true,
            shovel_ready: true,
            target_closing: NaiveDate::from_ymd_opt(2026, 12, 15),
        }
    }
}

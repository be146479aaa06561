//! Tax-credit program and project classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The tax-credit program a deal seeks or a source deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgramType {
    /// New Markets Tax Credit.
    Nmtc,
    /// Historic Tax Credit.
    Htc,
    /// Low-Income Housing Tax Credit.
    Lihtc,
    /// Opportunity Zone investment.
    Oz,
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nmtc => write!(f, "NMTC"),
            Self::Htc => write!(f, "HTC"),
            Self::Lihtc => write!(f, "LIHTC"),
            Self::Oz => write!(f, "OZ"),
        }
    }
}

/// Whether a project sits in an urban or rural census tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    Urban,
    Rural,
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urban => write!(f, "urban"),
            Self::Rural => write!(f, "rural"),
        }
    }
}

/// A source's stated urban/rural focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaPreference {
    Urban,
    Rural,
    #[default]
    Both,
}

impl AreaPreference {
    /// Whether this preference admits the given area.
    #[must_use]
    pub fn admits(self, area: AreaType) -> bool {
        matches!(
            (self, area),
            (Self::Both, _) | (Self::Urban, AreaType::Urban) | (Self::Rural, AreaType::Rural)
        )
    }
}

/// Project sector (primary use of the financed property or business).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSector {
    CommunityFacility,
    Healthcare,
    Education,
    ManufacturingIndustrial,
    RetailCommercial,
    FoodAccess,
    MixedUse,
    Housing,
    Office,
    Hospitality,
    Other,
}

impl fmt::Display for ProjectSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CommunityFacility => "community facility",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::ManufacturingIndustrial => "manufacturing / industrial",
            Self::RetailCommercial => "retail / commercial",
            Self::FoodAccess => "food access",
            Self::MixedUse => "mixed use",
            Self::Housing => "housing",
            Self::Office => "office",
            Self::Hospitality => "hospitality",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// Geographic footprint of a source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "states", rename_all = "snake_case")]
pub enum ServiceArea {
    #[default]
    National,
    /// Two-letter state codes.
    States(Vec<String>),
}

impl ServiceArea {
    /// Case-insensitive check that `state` lies in this area.
    #[must_use]
    pub fn contains(&self, state: &str) -> bool {
        match self {
            Self::National => true,
            Self::States(states) => states.iter().any(|s| s.eq_ignore_ascii_case(state)),
        }
    }

    #[must_use]
    pub fn is_national(&self) -> bool {
        matches!(self, Self::National)
    }
}

/// Two ASCII letters, e.g. `OH`. Used for deal states and service areas.
#[must_use]
pub fn is_state_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_display() {
        assert_eq!(ProgramType::Nmtc.to_string(), "NMTC");
        assert_eq!(ProgramType::Lihtc.to_string(), "LIHTC");
    }

    #[test]
    fn program_serde_is_uppercase() {
        let json = serde_json::to_string(&ProgramType::Oz).unwrap();
        assert_eq!(json, "\"OZ\"");
        let back: ProgramType = serde_json::from_str("\"HTC\"").unwrap();
        assert_eq!(back, ProgramType::Htc);
    }

    #[test]
    fn area_preference_admits() {
        assert!(AreaPreference::Both.admits(AreaType::Rural));
        assert!(AreaPreference::Rural.admits(AreaType::Rural));
        assert!(!AreaPreference::Urban.admits(AreaType::Rural));
    }

    #[test]
    fn service_area_is_case_insensitive() {
        let area = ServiceArea::States(vec!["OH".into(), "ky".into()]);
        assert!(area.contains("oh"));
        assert!(area.contains("KY"));
        assert!(!area.contains("IN"));
        assert!(ServiceArea::National.contains("AK"));
    }

    #[test]
    fn state_code_shape() {
        assert!(is_state_code("OH"));
        assert!(!is_state_code("Ohio"));
        assert!(!is_state_code("O1"));
    }
}

//! Two-person household configuration and combination

mod combiner;

pub use combiner::{combine_household, HouseholdYearlyRecord};

use serde::{Deserialize, Serialize};
use crate::error::LoadError;
use crate::person::PersonConfig;
use crate::policy::PolicySchedule;
use crate::projection::{ProjectionConfig, ProjectionResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn default_enabled() -> bool {
    true
}

/// One household member and their optional illustration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMember {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub person: PersonConfig,
    #[serde(default)]
    pub schedule: Option<PolicySchedule>,
}

impl HouseholdMember {
    pub fn new(person: PersonConfig, schedule: Option<PolicySchedule>) -> Self {
        Self {
            enabled: true,
            person,
            schedule,
        }
    }
}

/// Household input: up to two members plus engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdConfig {
    #[serde(default)]
    pub person1: Option<HouseholdMember>,
    #[serde(default)]
    pub person2: Option<HouseholdMember>,
    #[serde(default)]
    pub projection: ProjectionConfig,
}

impl HouseholdConfig {
    /// Members that take part in the projection
    pub fn active_members(&self) -> (Option<&HouseholdMember>, Option<&HouseholdMember>) {
        (
            self.person1.as_ref().filter(|m| m.enabled),
            self.person2.as_ref().filter(|m| m.enabled),
        )
    }
}

/// Load and validate a household from a JSON file
pub fn load_household_json<P: AsRef<Path>>(path: P) -> Result<HouseholdConfig, LoadError> {
    let file = File::open(path)?;
    let config: HouseholdConfig = serde_json::from_reader(BufReader::new(file))?;

    for member in [&config.person1, &config.person2].into_iter().flatten() {
        member.person.validate()?;
        if let Some(schedule) = &member.schedule {
            schedule.validate()?;
        }
    }

    Ok(config)
}

/// Both person projections and their household combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdProjection {
    pub person1: Option<ProjectionResult>,
    pub person2: Option<ProjectionResult>,
    pub years: Vec<HouseholdYearlyRecord>,
}

impl HouseholdProjection {
    /// Combine finished person projections
    pub fn combine(person1: Option<ProjectionResult>, person2: Option<ProjectionResult>) -> Self {
        let years = combine_household(
            person1.as_ref().map(|r| r.records.as_slice()),
            person2.as_ref().map(|r| r.records.as_slice()),
        );
        Self {
            person1,
            person2,
            years,
        }
    }

    /// Household age at which bankruptcy first occurred
    pub fn bankrupt_age(&self) -> Option<u32> {
        self.years.iter().find_map(|y| y.combined_bankrupt_age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_household_json_with_disabled_member() {
        let json = r#"{
            "person1": {
                "person": {
                    "name": "A", "current_age": 60, "retirement_age": 65, "death_age": 90,
                    "sex": "female", "annual_income": 90000, "income_replacement_ratio": 0.7
                }
            },
            "person2": {
                "enabled": false,
                "person": {
                    "name": "B", "current_age": 62, "retirement_age": 65, "death_age": 88,
                    "sex": "male", "annual_income": 70000, "income_replacement_ratio": 0.7
                }
            },
            "projection": { "start_year": 2030, "strategy": "illustration_authoritative" }
        }"#;
        let config: HouseholdConfig = serde_json::from_str(json).expect("valid household JSON");
        let (p1, p2) = config.active_members();
        assert_eq!(p1.map(|m| m.person.name.as_str()), Some("A"));
        assert!(p2.is_none());
        assert_eq!(config.projection.start_year, 2030);
        assert_eq!(config.projection.ltc_work_capacity, 0.2);
    }
}

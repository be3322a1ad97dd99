//! Scenario runner for person, household and batch projections
//!
//! Holds one engine configuration and fans independent projections out
//! across the rayon thread pool.

use rayon::prelude::*;
use crate::error::ConfigError;
use crate::household::{HouseholdConfig, HouseholdMember, HouseholdProjection};
use crate::person::PersonConfig;
use crate::policy::PolicySchedule;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-configured runner for projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(household.projection.clone());
/// let projection = runner.run_household(&household)?;
/// println!("{:?}", projection.summary());
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    /// Run a single person projection
    pub fn run_person(
        &self,
        person: &PersonConfig,
        schedule: Option<&PolicySchedule>,
    ) -> Result<ProjectionResult, ConfigError> {
        self.engine.project_person(person, schedule)
    }

    /// Project both enabled members in parallel and combine them
    pub fn run_household(&self, household: &HouseholdConfig) -> Result<HouseholdProjection, ConfigError> {
        let (member1, member2) = household.active_members();
        if member1.is_none() && member2.is_none() {
            log::warn!("Household has no enabled members");
        }

        let (person1, person2) = rayon::join(|| self.run_member(member1), || self.run_member(member2));
        let projection = HouseholdProjection::combine(person1.transpose()?, person2.transpose()?);

        log::info!(
            "Household projected for {} years (bankrupt age: {:?})",
            projection.years.len(),
            projection.bankrupt_age()
        );
        Ok(projection)
    }

    fn run_member(&self, member: Option<&HouseholdMember>) -> Option<Result<ProjectionResult, ConfigError>> {
        member.map(|m| self.run_person(&m.person, m.schedule.as_ref()))
    }

    /// Run many independent people with the same config, in input order
    pub fn run_batch(
        &self,
        people: &[(PersonConfig, Option<PolicySchedule>)],
    ) -> Vec<Result<ProjectionResult, ConfigError>> {
        people
            .par_iter()
            .map(|(person, schedule)| self.run_person(person, schedule.as_ref()))
            .collect()
    }

    /// Run one person under several engine configurations
    pub fn run_scenarios(
        &self,
        person: &PersonConfig,
        schedule: Option<&PolicySchedule>,
        configs: &[ProjectionConfig],
    ) -> Vec<Result<ProjectionResult, ConfigError>> {
        configs
            .par_iter()
            .map(|config| ProjectionEngine::new(config.clone()).project_person(person, schedule))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::sample_person;
    use crate::projection::ProjectionStrategy;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(ProjectionConfig {
            start_year: 2025,
            ..Default::default()
        })
    }

    #[test]
    fn test_household_matches_sequential_projection() {
        let person1 = sample_person();
        let mut person2 = sample_person();
        person2.name = "Spouse".to_string();
        person2.current_age = 58;

        let household = HouseholdConfig {
            person1: Some(HouseholdMember::new(person1.clone(), None)),
            person2: Some(HouseholdMember::new(person2.clone(), None)),
            projection: ProjectionConfig::default(),
        };

        let runner = runner();
        let projection = runner.run_household(&household).unwrap();
        let expected = HouseholdProjection::combine(
            Some(runner.run_person(&person1, None).unwrap()),
            Some(runner.run_person(&person2, None).unwrap()),
        );
        assert_eq!(projection, expected);
        assert_eq!(projection.years.len(), 36);
    }

    #[test]
    fn test_household_skips_disabled_member() {
        let mut member2 = HouseholdMember::new(sample_person(), None);
        member2.enabled = false;
        let household = HouseholdConfig {
            person1: Some(HouseholdMember::new(sample_person(), None)),
            person2: Some(member2),
            projection: ProjectionConfig::default(),
        };

        let projection = runner().run_household(&household).unwrap();
        assert!(projection.person2.is_none());
        assert!(projection.years.iter().all(|y| y.p2.is_none()));
    }

    #[test]
    fn test_household_propagates_invalid_member() {
        let mut bad = sample_person();
        bad.retirement_age = 20;
        let household = HouseholdConfig {
            person1: Some(HouseholdMember::new(sample_person(), None)),
            person2: Some(HouseholdMember::new(bad, None)),
            projection: ProjectionConfig::default(),
        };
        assert!(matches!(
            runner().run_household(&household),
            Err(ConfigError::AgeOrdering { .. })
        ));
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let people: Vec<_> = (50..55)
            .map(|age| {
                let mut person = sample_person();
                person.current_age = age;
                (person, None)
            })
            .collect();

        let results = runner().run_batch(&people);
        assert_eq!(results.len(), 5);
        for (result, (person, _)) in results.iter().zip(&people) {
            let result = result.as_ref().unwrap();
            assert_eq!(result.records[0].age, person.current_age);
        }
    }

    #[test]
    fn test_scenarios_per_strategy() {
        let configs: Vec<_> = [ProjectionStrategy::IllustrationTracking, ProjectionStrategy::IllustrationAuthoritative]
            .into_iter()
            .map(|strategy| ProjectionConfig {
                start_year: 2025,
                strategy,
                ..Default::default()
            })
            .collect();

        let results = runner().run_scenarios(&sample_person(), None, &configs);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().strategy, ProjectionStrategy::IllustrationTracking);
        assert_eq!(results[1].as_ref().unwrap().strategy, ProjectionStrategy::IllustrationAuthoritative);
    }
}

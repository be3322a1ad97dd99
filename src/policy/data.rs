//! Policy illustration structures: the insurer's annual schedule

use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

/// Kind of long-term-care policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    /// Life policy with an acceleration rider; LTC benefits draw down the death benefit
    Traditional,
    /// Linked-benefit policy with an LTC pool separate from cash value and death benefit
    Hybrid,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Traditional => "traditional",
            PolicyType::Hybrid => "hybrid",
        }
    }
}

/// One policy year of the illustration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyYearRecord {
    /// Policy year (1 = year of issue)
    pub policy_year: u32,

    /// Age of the insured during this policy year
    pub insured_age: u32,

    /// Premium due this policy year
    #[serde(default)]
    pub annual_premium: f64,

    /// Accumulation (account) value at the end of the year
    #[serde(default)]
    pub accumulation_value: f64,

    /// Cash surrender value at the end of the year
    #[serde(default)]
    pub surrender_value: f64,

    /// Death benefit in force during the year
    #[serde(default)]
    pub death_benefit: f64,

    /// Share of the death benefit (in percent) that may be accelerated for LTC
    #[serde(default)]
    pub acceleration_percentage: f64,

    /// Share of the LTC pool (in percent) payable per month
    #[serde(default)]
    pub monthly_payout_percentage: f64,

    /// Maximum monthly LTC benefit
    #[serde(default)]
    pub monthly_benefit_limit: f64,

    /// Hybrid only: annual LTC benefit available this year
    #[serde(default)]
    pub annual_ltc_benefit: Option<f64>,

    /// Hybrid only: theoretical lifetime LTC ceiling as of this year
    #[serde(default)]
    pub total_ltc_benefit: Option<f64>,
}

impl PolicyYearRecord {
    /// Annual benefit limit derived from the monthly limit
    pub fn annual_benefit_limit(&self) -> f64 {
        self.monthly_benefit_limit * 12.0
    }
}

/// Terms that sit outside the annual table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyTerms {
    pub policy_type: PolicyType,
    #[serde(default)]
    pub initial_premium: f64,
    #[serde(default)]
    pub initial_death_benefit: f64,
}

/// Complete illustration for one insured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySchedule {
    pub policy_type: PolicyType,

    /// Premium paid at issue
    #[serde(default)]
    pub initial_premium: f64,

    /// Death benefit at issue
    #[serde(default)]
    pub initial_death_benefit: f64,

    /// Annual records in policy-year order
    #[serde(default)]
    pub years: Vec<PolicyYearRecord>,
}

impl PolicySchedule {
    /// Build a schedule from its terms and annual table
    pub fn new(terms: PolicyTerms, years: Vec<PolicyYearRecord>) -> Self {
        Self {
            policy_type: terms.policy_type,
            initial_premium: terms.initial_premium,
            initial_death_benefit: terms.initial_death_benefit,
            years,
        }
    }

    /// Reject tables whose policy years are not strictly increasing from 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut previous = 0;
        for record in &self.years {
            if record.policy_year <= previous {
                return Err(ConfigError::ScheduleOrder {
                    year: record.policy_year,
                    previous,
                });
            }
            if record.insured_age + 1 < record.policy_year {
                return Err(ConfigError::ScheduleIssueAge {
                    policy_year: record.policy_year,
                    insured_age: record.insured_age,
                });
            }
            previous = record.policy_year;
        }

        for pair in self.years.windows(2) {
            if let (Some(prev), Some(next)) = (pair[0].total_ltc_benefit, pair[1].total_ltc_benefit) {
                if next < prev {
                    log::warn!(
                        "total LTC benefit decreases from {:.2} to {:.2} at policy year {}",
                        prev, next, pair[1].policy_year
                    );
                }
            }
        }

        Ok(())
    }

    /// Age of the insured at issue (policy year 1)
    pub fn issue_age(&self) -> Option<u32> {
        self.years
            .first()
            .map(|r| (r.insured_age + 1).saturating_sub(r.policy_year))
    }

    /// Last policy year covered by the table
    pub fn last_policy_year(&self) -> Option<u32> {
        self.years.last().map(|r| r.policy_year)
    }
}

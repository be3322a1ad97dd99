//! Person configuration: the engine's per-person input

use serde::{Deserialize, Serialize};
use crate::error::ConfigError;

/// Sex of the person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Everything the projection needs to know about one person
///
/// Rates are annual decimals (0.03 = 3%). The `policy_*` parameters are a
/// fallback used only when no real policy schedule is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonConfig {
    pub name: String,
    pub current_age: u32,
    pub retirement_age: u32,
    pub death_age: u32,
    pub sex: Sex,

    // Income
    pub annual_income: f64,
    #[serde(default)]
    pub annual_pay_increase_rate: f64,
    /// Share of pre-retirement income needed as living expenses in retirement
    pub income_replacement_ratio: f64,

    // Savings
    #[serde(default)]
    pub starting_assets: f64,
    #[serde(default)]
    pub annual_savings_contribution: f64,

    // Toggles
    #[serde(default)]
    pub ltc_event_enabled: bool,
    #[serde(default)]
    pub policy_enabled: bool,
    #[serde(default)]
    pub policy_loan_enabled: bool,
    /// Pay the first premium as a lump sum out of assets
    #[serde(default)]
    pub initial_premium_from_assets: bool,
    /// Fund premiums from assets rather than income while working
    #[serde(default)]
    pub premiums_from_assets_pre_retirement: bool,

    // Retirement income (today's dollars)
    #[serde(default)]
    pub social_security_income: f64,
    #[serde(default)]
    pub other_retirement_income: f64,

    // LTC event
    #[serde(default)]
    pub ltc_event_age: u32,
    #[serde(default)]
    pub ltc_cost_per_year: f64,
    #[serde(default)]
    pub ltc_duration_years: u32,

    // Fallback policy parameters
    #[serde(default)]
    pub policy_benefit_per_year: f64,
    #[serde(default)]
    pub policy_benefit_duration_years: u32,
    #[serde(default)]
    pub policy_annual_premium: f64,
    #[serde(default)]
    pub policy_loan_rate: f64,
    #[serde(default)]
    pub policy_max_loan_to_value_ratio: f64,

    // Assumptions
    #[serde(default)]
    pub pre_retirement_asset_return_rate: f64,
    #[serde(default)]
    pub retirement_asset_return_rate: f64,
    #[serde(default)]
    pub ltc_inflation_rate: f64,
    #[serde(default)]
    pub general_inflation_rate: f64,
    #[serde(default)]
    pub retirement_assets_tax_rate: f64,
}

impl PersonConfig {
    /// Fail fast on inputs that would produce a misleading projection
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_age > self.retirement_age || self.retirement_age > self.death_age {
            return Err(ConfigError::AgeOrdering {
                current: self.current_age,
                retirement: self.retirement_age,
                death: self.death_age,
            });
        }

        let amounts = [
            ("annual_income", self.annual_income),
            ("starting_assets", self.starting_assets),
            ("annual_savings_contribution", self.annual_savings_contribution),
            ("social_security_income", self.social_security_income),
            ("other_retirement_income", self.other_retirement_income),
            ("ltc_cost_per_year", self.ltc_cost_per_year),
            ("policy_benefit_per_year", self.policy_benefit_per_year),
            ("policy_annual_premium", self.policy_annual_premium),
            ("income_replacement_ratio", self.income_replacement_ratio),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount { field, value });
            }
        }

        // Growth rates may be negative but never wipe out the whole balance in one year
        let growth_rates = [
            ("annual_pay_increase_rate", self.annual_pay_increase_rate),
            ("pre_retirement_asset_return_rate", self.pre_retirement_asset_return_rate),
            ("retirement_asset_return_rate", self.retirement_asset_return_rate),
            ("ltc_inflation_rate", self.ltc_inflation_rate),
            ("general_inflation_rate", self.general_inflation_rate),
        ];
        for (field, value) in growth_rates {
            check_rate(field, value, -1.0, 1.0)?;
        }

        check_rate("retirement_assets_tax_rate", self.retirement_assets_tax_rate, 0.0, 1.0)?;
        check_rate("policy_loan_rate", self.policy_loan_rate, 0.0, 1.0)?;
        check_rate("policy_max_loan_to_value_ratio", self.policy_max_loan_to_value_ratio, 0.0, 1.0 + f64::EPSILON)?;

        Ok(())
    }

    /// Number of yearly records a projection of this person produces
    pub fn projection_years(&self) -> usize {
        (self.death_age.saturating_sub(self.current_age) + 1) as usize
    }

    /// Whether `age` falls inside the configured LTC event window
    pub fn in_ltc_event(&self, age: u32) -> bool {
        self.ltc_event_enabled
            && age >= self.ltc_event_age
            && age < self.ltc_event_age + self.ltc_duration_years
    }

    /// First age after the LTC event window, if an event is configured
    pub fn ltc_event_end_age(&self) -> Option<u32> {
        self.ltc_event_enabled
            .then(|| self.ltc_event_age + self.ltc_duration_years)
    }
}

fn check_rate(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value < max {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange { field, value, min, max })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A 55-year-old with no policy and no LTC event
    pub(crate) fn sample_person() -> PersonConfig {
        PersonConfig {
            name: "Sample".to_string(),
            current_age: 55,
            retirement_age: 65,
            death_age: 90,
            sex: Sex::Female,
            annual_income: 100_000.0,
            annual_pay_increase_rate: 0.03,
            income_replacement_ratio: 0.7,
            starting_assets: 500_000.0,
            annual_savings_contribution: 20_000.0,
            ltc_event_enabled: false,
            policy_enabled: false,
            policy_loan_enabled: false,
            initial_premium_from_assets: false,
            premiums_from_assets_pre_retirement: false,
            social_security_income: 30_000.0,
            other_retirement_income: 5_000.0,
            ltc_event_age: 80,
            ltc_cost_per_year: 100_000.0,
            ltc_duration_years: 3,
            policy_benefit_per_year: 0.0,
            policy_benefit_duration_years: 0,
            policy_annual_premium: 0.0,
            policy_loan_rate: 0.05,
            policy_max_loan_to_value_ratio: 0.9,
            pre_retirement_asset_return_rate: 0.06,
            retirement_asset_return_rate: 0.04,
            ltc_inflation_rate: 0.03,
            general_inflation_rate: 0.025,
            retirement_assets_tax_rate: 0.2,
        }
    }

    #[test]
    fn test_valid_person() {
        assert_eq!(sample_person().validate(), Ok(()));
        assert_eq!(sample_person().projection_years(), 36);
    }

    #[test]
    fn test_rejects_age_ordering() {
        let mut person = sample_person();
        person.death_age = 50;
        assert!(matches!(person.validate(), Err(ConfigError::AgeOrdering { .. })));

        let mut person = sample_person();
        person.retirement_age = 54;
        assert!(matches!(person.validate(), Err(ConfigError::AgeOrdering { .. })));
    }

    #[test]
    fn test_rejects_out_of_domain_values() {
        let mut person = sample_person();
        person.retirement_assets_tax_rate = 1.0;
        assert!(matches!(
            person.validate(),
            Err(ConfigError::RateOutOfRange { field: "retirement_assets_tax_rate", .. })
        ));

        let mut person = sample_person();
        person.starting_assets = -1.0;
        assert!(matches!(
            person.validate(),
            Err(ConfigError::InvalidAmount { field: "starting_assets", .. })
        ));

        let mut person = sample_person();
        person.ltc_inflation_rate = f64::NAN;
        assert!(person.validate().is_err());
    }

    #[test]
    fn test_ltc_window() {
        let mut person = sample_person();
        assert!(!person.in_ltc_event(80));
        assert_eq!(person.ltc_event_end_age(), None);

        person.ltc_event_enabled = true;
        assert!(!person.in_ltc_event(79));
        assert!(person.in_ltc_event(80));
        assert!(person.in_ltc_event(82));
        assert!(!person.in_ltc_event(83));
        assert_eq!(person.ltc_event_end_age(), Some(83));
    }

    #[test]
    fn test_person_json_defaults() {
        let json = r#"{
            "name": "Pat",
            "current_age": 60,
            "retirement_age": 67,
            "death_age": 95,
            "sex": "male",
            "annual_income": 80000,
            "income_replacement_ratio": 0.6
        }"#;
        let person: PersonConfig = serde_json::from_str(json).expect("valid person JSON");
        assert_eq!(person.sex, Sex::Male);
        assert!(!person.policy_enabled);
        assert_eq!(person.starting_assets, 0.0);
        assert_eq!(person.validate(), Ok(()));
    }
}

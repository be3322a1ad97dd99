//! Yearly output records for person projections

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use super::ProjectionStrategy;

/// Currency amounts for one simulated year
///
/// Kept as a separate block so households can sum two people field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyAmounts {
    // Income
    pub work_income: f64,
    pub social_security_income: f64,
    pub other_retirement_income: f64,

    // Expenses
    pub basic_expenses: f64,
    pub ltc_expenses: f64,
    pub premium_expenses: f64,
    /// Premium paid out of assets instead of cash flow (not part of net cash flow)
    pub asset_funded_premium: f64,

    // Cash flow
    pub ltc_benefits: f64,
    pub net_cash_flow: f64,
    pub withdrawal: f64,
    pub tax_on_withdrawal: f64,
    /// Need left uncovered after assets and policy loans
    pub unfunded_shortfall: f64,

    // End-of-year balances
    pub assets: f64,
    pub policy_value: f64,
    pub death_benefit: f64,
    pub total_assets: f64,
    pub cumulative_ltc_benefits: f64,

    // Policy loans
    pub policy_loan_taken: f64,
    pub policy_loan_balance: f64,
    pub policy_loan_interest: f64,

    // Unmodified illustration values for the same policy year
    pub original_policy_value: f64,
    pub original_death_benefit: f64,
}

impl YearlyAmounts {
    /// Column names in the order returned by [`YearlyAmounts::values`]
    pub const FIELD_NAMES: [&'static str; 22] = [
        "work_income",
        "social_security_income",
        "other_retirement_income",
        "basic_expenses",
        "ltc_expenses",
        "premium_expenses",
        "asset_funded_premium",
        "ltc_benefits",
        "net_cash_flow",
        "withdrawal",
        "tax_on_withdrawal",
        "unfunded_shortfall",
        "assets",
        "policy_value",
        "death_benefit",
        "total_assets",
        "cumulative_ltc_benefits",
        "policy_loan_taken",
        "policy_loan_balance",
        "policy_loan_interest",
        "original_policy_value",
        "original_death_benefit",
    ];

    pub fn values(&self) -> [f64; 22] {
        [
            self.work_income,
            self.social_security_income,
            self.other_retirement_income,
            self.basic_expenses,
            self.ltc_expenses,
            self.premium_expenses,
            self.asset_funded_premium,
            self.ltc_benefits,
            self.net_cash_flow,
            self.withdrawal,
            self.tax_on_withdrawal,
            self.unfunded_shortfall,
            self.assets,
            self.policy_value,
            self.death_benefit,
            self.total_assets,
            self.cumulative_ltc_benefits,
            self.policy_loan_taken,
            self.policy_loan_balance,
            self.policy_loan_interest,
            self.original_policy_value,
            self.original_death_benefit,
        ]
    }

    pub fn total_income(&self) -> f64 {
        self.work_income + self.social_security_income + self.other_retirement_income
    }

    pub fn total_expenses(&self) -> f64 {
        self.basic_expenses + self.ltc_expenses + self.premium_expenses
    }
}

impl AddAssign for YearlyAmounts {
    fn add_assign(&mut self, other: Self) {
        self.work_income += other.work_income;
        self.social_security_income += other.social_security_income;
        self.other_retirement_income += other.other_retirement_income;
        self.basic_expenses += other.basic_expenses;
        self.ltc_expenses += other.ltc_expenses;
        self.premium_expenses += other.premium_expenses;
        self.asset_funded_premium += other.asset_funded_premium;
        self.ltc_benefits += other.ltc_benefits;
        self.net_cash_flow += other.net_cash_flow;
        self.withdrawal += other.withdrawal;
        self.tax_on_withdrawal += other.tax_on_withdrawal;
        self.unfunded_shortfall += other.unfunded_shortfall;
        self.assets += other.assets;
        self.policy_value += other.policy_value;
        self.death_benefit += other.death_benefit;
        self.total_assets += other.total_assets;
        self.cumulative_ltc_benefits += other.cumulative_ltc_benefits;
        self.policy_loan_taken += other.policy_loan_taken;
        self.policy_loan_balance += other.policy_loan_balance;
        self.policy_loan_interest += other.policy_loan_interest;
        self.original_policy_value += other.original_policy_value;
        self.original_death_benefit += other.original_death_benefit;
    }
}

impl Add for YearlyAmounts {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

/// One simulated age of a person projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    // Timing
    pub age: u32,
    pub year: i32,
    /// Policy year in force (0 = policy not yet issued or disabled)
    pub policy_year: u32,

    #[serde(flatten)]
    pub amounts: YearlyAmounts,

    // Flags
    pub is_retired: bool,
    pub has_ltc_event: bool,
    pub is_alive: bool,
    /// Shortfall could not be covered this year
    pub is_insolvent: bool,

    /// Illustration growth rate applied to last year's adjusted policy values
    pub applied_growth_rate: f64,
}

impl YearlyRecord {
    pub fn new(age: u32, year: i32) -> Self {
        Self {
            age,
            year,
            policy_year: 0,
            amounts: YearlyAmounts::default(),
            is_retired: false,
            has_ltc_event: false,
            is_alive: true,
            is_insolvent: false,
            applied_growth_rate: 0.0,
        }
    }
}

/// Complete projection for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub name: String,
    pub strategy: ProjectionStrategy,
    pub records: Vec<YearlyRecord>,
}

impl ProjectionResult {
    pub fn new(name: impl Into<String>, strategy: ProjectionStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: YearlyRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a given age, if simulated
    pub fn at_age(&self, age: u32) -> Option<&YearlyRecord> {
        let first = self.records.first()?.age;
        self.records.get(age.checked_sub(first)? as usize)
    }

    /// First age at which the person could not cover their shortfall
    pub fn first_insolvency_age(&self) -> Option<u32> {
        self.records.iter().find(|r| r.is_insolvent).map(|r| r.age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts_add_field_by_field() {
        let a = YearlyAmounts {
            work_income: 10.0,
            assets: 100.0,
            policy_value: 5.0,
            ..Default::default()
        };
        let b = YearlyAmounts {
            work_income: 1.0,
            assets: 50.0,
            policy_loan_balance: 7.0,
            ..Default::default()
        };
        let sum = a + b;
        assert_eq!(sum.work_income, 11.0);
        assert_eq!(sum.assets, 150.0);
        assert_eq!(sum.policy_value, 5.0);
        assert_eq!(sum.policy_loan_balance, 7.0);
    }

    #[test]
    fn test_field_names_match_values() {
        let amounts = YearlyAmounts {
            tax_on_withdrawal: 3.0,
            original_death_benefit: 9.0,
            ..Default::default()
        };
        let values = amounts.values();
        let idx = |name: &str| YearlyAmounts::FIELD_NAMES.iter().position(|n| *n == name).unwrap();
        assert_eq!(values[idx("tax_on_withdrawal")], 3.0);
        assert_eq!(values[idx("original_death_benefit")], 9.0);
    }

    #[test]
    fn test_at_age() {
        let mut result = ProjectionResult::new("x", ProjectionStrategy::IllustrationTracking);
        for (i, age) in (60..63).enumerate() {
            result.add_record(YearlyRecord::new(age, 2030 + i as i32));
        }
        assert_eq!(result.at_age(61).map(|r| r.year), Some(2031));
        assert!(result.at_age(59).is_none());
        assert!(result.at_age(63).is_none());
    }
}

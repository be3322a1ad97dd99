//! Retirement, LTC and asset aggregates over finished projections

use serde::{Deserialize, Serialize};
use crate::household::HouseholdProjection;
use crate::projection::{ProjectionResult, YearlyAmounts};

/// Assets at or below this are treated as depleted
const DEPLETED: f64 = 0.01;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetirementSummary {
    pub retirement_age: Option<u32>,
    pub assets_at_retirement: f64,
    pub retirement_years: u32,
    pub total_retirement_income: f64,
    pub total_basic_expenses: f64,
    /// First retired age with no investable assets left
    pub depletion_age: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LtcSummary {
    pub event_years: u32,
    pub total_ltc_cost: f64,
    pub total_ltc_benefits: f64,
    pub out_of_pocket: f64,
    /// Share of LTC cost paid by the policy
    pub coverage_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub peak_assets: f64,
    pub peak_assets_age: Option<u32>,
    pub final_assets: f64,
    pub final_policy_value: f64,
    pub final_death_benefit: f64,
    pub total_premiums: f64,
    pub total_policy_loans: f64,
    pub final_loan_balance: f64,
    pub insolvency_age: Option<u32>,
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub retirement: RetirementSummary,
    pub ltc: LtcSummary,
    pub assets: AssetSummary,
}

/// The per-year view the summaries need, shared by person and household output
struct SummaryRow<'a> {
    age: u32,
    amounts: &'a YearlyAmounts,
    is_retired: bool,
    has_ltc_event: bool,
    is_insolvent: bool,
}

fn summarize(rows: &[SummaryRow]) -> ProjectionSummary {
    let mut retirement = RetirementSummary::default();
    let mut ltc = LtcSummary::default();
    let mut assets = AssetSummary::default();

    for row in rows {
        let a = row.amounts;

        if row.is_retired {
            if retirement.retirement_age.is_none() {
                retirement.retirement_age = Some(row.age);
                retirement.assets_at_retirement = a.assets;
            }
            retirement.retirement_years += 1;
            retirement.total_retirement_income += a.social_security_income + a.other_retirement_income;
            retirement.total_basic_expenses += a.basic_expenses;
            if retirement.depletion_age.is_none() && a.assets <= DEPLETED {
                retirement.depletion_age = Some(row.age);
            }
        }

        if row.has_ltc_event {
            ltc.event_years += 1;
        }
        ltc.total_ltc_cost += a.ltc_expenses;
        ltc.total_ltc_benefits += a.ltc_benefits;

        if assets.peak_assets_age.is_none() || a.assets > assets.peak_assets {
            assets.peak_assets = a.assets;
            assets.peak_assets_age = Some(row.age);
        }
        assets.total_premiums += a.premium_expenses + a.asset_funded_premium;
        assets.total_policy_loans += a.policy_loan_taken;
        if assets.insolvency_age.is_none() && row.is_insolvent {
            assets.insolvency_age = Some(row.age);
        }
    }

    ltc.out_of_pocket = (ltc.total_ltc_cost - ltc.total_ltc_benefits).max(0.0);
    ltc.coverage_ratio = if ltc.total_ltc_cost > 0.0 {
        ltc.total_ltc_benefits / ltc.total_ltc_cost
    } else {
        0.0
    };

    if let Some(last) = rows.last() {
        assets.final_assets = last.amounts.assets;
        assets.final_policy_value = last.amounts.policy_value;
        assets.final_death_benefit = last.amounts.death_benefit;
        assets.final_loan_balance = last.amounts.policy_loan_balance;
    }

    ProjectionSummary {
        years: rows.len() as u32,
        retirement,
        ltc,
        assets,
    }
}

impl ProjectionResult {
    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let rows: Vec<SummaryRow> = self
            .records
            .iter()
            .map(|r| SummaryRow {
                age: r.age,
                amounts: &r.amounts,
                is_retired: r.is_retired,
                has_ltc_event: r.has_ltc_event,
                is_insolvent: r.is_insolvent,
            })
            .collect();
        summarize(&rows)
    }
}

impl HouseholdProjection {
    /// Summary over combined fields; retirement follows the reference person
    pub fn summary(&self) -> ProjectionSummary {
        let rows: Vec<SummaryRow> = self
            .years
            .iter()
            .map(|y| {
                let reference = y.p1.as_ref().or(y.p2.as_ref());
                SummaryRow {
                    age: y.age,
                    amounts: &y.combined,
                    is_retired: reference.is_some_and(|r| r.is_retired),
                    has_ltc_event: [&y.p1, &y.p2].into_iter().flatten().any(|r| r.has_ltc_event),
                    is_insolvent: y.combined_bankrupt,
                }
            })
            .collect();
        summarize(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::sample_person;
    use crate::projection::{ProjectionConfig, ProjectionEngine};
    use approx::assert_relative_eq;

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(ProjectionConfig {
            start_year: 2025,
            ..Default::default()
        })
    }

    #[test]
    fn test_person_summary() {
        let mut person = sample_person();
        person.ltc_event_enabled = true;
        person.policy_enabled = true;
        person.policy_benefit_per_year = 40_000.0;
        person.policy_benefit_duration_years = 3;
        person.policy_annual_premium = 2_000.0;

        let result = engine().project_person(&person, None).unwrap();
        let summary = result.summary();

        assert_eq!(summary.years, 36);
        assert_eq!(summary.retirement.retirement_age, Some(65));
        assert_eq!(summary.retirement.retirement_years, 26);
        assert_relative_eq!(
            summary.retirement.assets_at_retirement,
            result.at_age(65).unwrap().amounts.assets
        );

        assert_eq!(summary.ltc.event_years, 3);
        assert_relative_eq!(summary.ltc.total_ltc_benefits, 120_000.0);
        assert!(summary.ltc.coverage_ratio > 0.0 && summary.ltc.coverage_ratio < 1.0);
        assert_relative_eq!(
            summary.ltc.out_of_pocket,
            summary.ltc.total_ltc_cost - summary.ltc.total_ltc_benefits
        );

        assert_relative_eq!(summary.assets.total_premiums, 2_000.0 * 36.0);
        assert!(summary.assets.peak_assets >= summary.assets.final_assets);
        assert_eq!(summary.assets.final_assets, result.records.last().unwrap().amounts.assets);
    }

    #[test]
    fn test_household_summary_uses_combined_fields() {
        let person1 = sample_person();
        let mut person2 = sample_person();
        person2.starting_assets = 0.0;
        person2.annual_savings_contribution = 0.0;
        person2.social_security_income = 0.0;
        person2.other_retirement_income = 0.0;

        let engine = engine();
        let household = HouseholdProjection::combine(
            Some(engine.project_person(&person1, None).unwrap()),
            Some(engine.project_person(&person2, None).unwrap()),
        );
        let summary = household.summary();

        // Person 2 cannot fund retirement, so the household goes bankrupt at 65
        assert_eq!(household.bankrupt_age(), Some(65));
        assert_eq!(summary.assets.insolvency_age, Some(65));
        assert_eq!(summary.assets.final_assets, 0.0);
        assert_eq!(summary.retirement.retirement_age, Some(65));
    }
}

//! Policy-year lookups against an illustration
//!
//! Every figure the engine reads from a schedule (premium, cash value, death
//! benefit, benefit limits) goes through [`lookup`], which resolves a policy
//! year to its own record or, failing that, the most recent prior record.

use super::{PolicySchedule, PolicyYearRecord};

/// Record for `target_policy_year`, else the latest record before it
///
/// Returns `None` when the target precedes the first record in the table.
pub fn lookup(schedule: &PolicySchedule, target_policy_year: u32) -> Option<&PolicyYearRecord> {
    // Years are strictly increasing, so the partition point is the first record past the target
    let idx = schedule
        .years
        .partition_point(|r| r.policy_year <= target_policy_year);
    if idx == 0 {
        None
    } else {
        schedule.years.get(idx - 1)
    }
}

impl PolicySchedule {
    /// See [`lookup`]
    pub fn lookup(&self, target_policy_year: u32) -> Option<&PolicyYearRecord> {
        lookup(self, target_policy_year)
    }
}

/// Year-over-year growth of the illustrated surrender value and death benefit
///
/// Precomputed once per schedule; entry `y` holds `value[y] / value[y - 1] - 1`
/// using closest-prior lookups on both sides. Years outside the table grow at 0.
#[derive(Debug, Clone, Default)]
pub struct IllustrationCurve {
    policy_value_growth: Vec<f64>,
    death_benefit_growth: Vec<f64>,
}

impl IllustrationCurve {
    pub fn from_schedule(schedule: &PolicySchedule) -> Self {
        let last = schedule.last_policy_year().unwrap_or(0) as usize;
        let mut policy_value_growth = vec![0.0; last + 1];
        let mut death_benefit_growth = vec![0.0; last + 1];

        for year in 2..=last {
            let (Some(prev), Some(curr)) = (lookup(schedule, year as u32 - 1), lookup(schedule, year as u32)) else {
                continue;
            };
            policy_value_growth[year] = growth_rate(prev.surrender_value, curr.surrender_value);
            death_benefit_growth[year] = growth_rate(prev.death_benefit, curr.death_benefit);
        }

        Self {
            policy_value_growth,
            death_benefit_growth,
        }
    }

    /// Illustrated surrender-value growth into `policy_year`
    pub fn policy_value_growth(&self, policy_year: u32) -> f64 {
        self.policy_value_growth
            .get(policy_year as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Illustrated death-benefit growth into `policy_year`
    pub fn death_benefit_growth(&self, policy_year: u32) -> f64 {
        self.death_benefit_growth
            .get(policy_year as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Relative change from `previous` to `current`, 0 when `previous` is not positive
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous > 0.0 && current.is_finite() {
        current / previous - 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyTerms, PolicyType};
    use approx::assert_relative_eq;

    fn record(policy_year: u32, surrender_value: f64, death_benefit: f64) -> PolicyYearRecord {
        PolicyYearRecord {
            policy_year,
            insured_age: 59 + policy_year,
            annual_premium: 1_000.0 * policy_year as f64,
            accumulation_value: surrender_value,
            surrender_value,
            death_benefit,
            acceleration_percentage: 100.0,
            monthly_payout_percentage: 4.0,
            monthly_benefit_limit: 2_000.0,
            annual_ltc_benefit: None,
            total_ltc_benefit: None,
        }
    }

    fn schedule(years: Vec<PolicyYearRecord>) -> PolicySchedule {
        PolicySchedule::new(
            PolicyTerms {
                policy_type: PolicyType::Traditional,
                initial_premium: 1_000.0,
                initial_death_benefit: 100_000.0,
            },
            years,
        )
    }

    #[test]
    fn test_exact_and_prior_year_lookup() {
        let s = schedule(vec![
            record(2, 10_000.0, 100_000.0),
            record(3, 20_000.0, 100_000.0),
            record(6, 50_000.0, 100_000.0),
        ]);

        assert!(lookup(&s, 1).is_none());
        assert_eq!(lookup(&s, 2).map(|r| r.policy_year), Some(2));
        assert_eq!(lookup(&s, 3).map(|r| r.policy_year), Some(3));
        // Gap in the table falls back to the most recent year
        assert_eq!(lookup(&s, 5).map(|r| r.policy_year), Some(3));
        assert_eq!(lookup(&s, 6).map(|r| r.policy_year), Some(6));
        // Past the end stays on the last year
        assert_eq!(s.lookup(40).map(|r| r.policy_year), Some(6));
    }

    #[test]
    fn test_lookup_empty_schedule() {
        let s = schedule(Vec::new());
        assert!(lookup(&s, 1).is_none());
    }

    #[test]
    fn test_illustration_curve_growth() {
        let s = schedule(vec![
            record(1, 0.0, 100_000.0),
            record(2, 10_000.0, 100_000.0),
            record(3, 11_000.0, 110_000.0),
            record(5, 12_100.0, 110_000.0),
        ]);
        let curve = IllustrationCurve::from_schedule(&s);

        // Zero prior value guards to 0 growth rather than infinity
        assert_eq!(curve.policy_value_growth(2), 0.0);
        assert_relative_eq!(curve.policy_value_growth(3), 0.1, epsilon = 1e-12);
        assert_relative_eq!(curve.death_benefit_growth(3), 0.1, epsilon = 1e-12);
        // Year 4 is missing, so it repeats year 3 and is flat
        assert_eq!(curve.policy_value_growth(4), 0.0);
        assert_relative_eq!(curve.policy_value_growth(5), 0.1, epsilon = 1e-12);
        assert_eq!(curve.policy_value_growth(9), 0.0);
    }

    #[test]
    fn test_growth_rate_guards() {
        assert_eq!(growth_rate(0.0, 5.0), 0.0);
        assert_eq!(growth_rate(-3.0, 5.0), 0.0);
        assert_relative_eq!(growth_rate(100.0, 95.0), -0.05, epsilon = 1e-12);
    }
}

//! Merge two person projections into one household time series

use serde::{Deserialize, Serialize};
use crate::projection::{YearlyAmounts, YearlyRecord};

/// One relative projection year of a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdYearlyRecord {
    /// 1 = each person's first simulated year
    pub projection_year: u32,

    /// Calendar year and reference age, from person 1 when present
    pub year: i32,
    pub age: u32,

    pub p1: Option<YearlyRecord>,
    pub p2: Option<YearlyRecord>,

    /// Field-by-field sum of both people, a missing side counting as 0
    pub combined: YearlyAmounts,

    pub combined_bankrupt: bool,
    pub combined_bankrupt_age: Option<u32>,
}

impl HouseholdYearlyRecord {
    /// Either person was insolvent in this year
    pub fn any_insolvent(&self) -> bool {
        self.p1.as_ref().is_some_and(|r| r.is_insolvent) || self.p2.as_ref().is_some_and(|r| r.is_insolvent)
    }
}

/// Align two projections by relative projection year and sum them
///
/// Either side may be absent. The result is as long as the longer projection.
pub fn combine_household(p1: Option<&[YearlyRecord]>, p2: Option<&[YearlyRecord]>) -> Vec<HouseholdYearlyRecord> {
    let p1 = p1.unwrap_or(&[]);
    let p2 = p2.unwrap_or(&[]);
    let years = p1.len().max(p2.len());

    let mut household: Vec<HouseholdYearlyRecord> = (0..years)
        .filter_map(|i| merge_year(i, p1.get(i), p2.get(i)))
        .collect();

    propagate_bankruptcy(&mut household);
    household
}

fn merge_year(index: usize, p1: Option<&YearlyRecord>, p2: Option<&YearlyRecord>) -> Option<HouseholdYearlyRecord> {
    let reference = p1.or(p2)?;

    let mut combined = YearlyAmounts::default();
    for record in [p1, p2].into_iter().flatten() {
        combined += record.amounts;
    }

    Some(HouseholdYearlyRecord {
        projection_year: index as u32 + 1,
        year: reference.year,
        age: reference.age,
        p1: p1.cloned(),
        p2: p2.cloned(),
        combined,
        combined_bankrupt: false,
        combined_bankrupt_age: None,
    })
}

/// Mark every year from the first insolvency on, and zero investable assets after it
fn propagate_bankruptcy(household: &mut [HouseholdYearlyRecord]) {
    let Some(first) = household.iter().position(HouseholdYearlyRecord::any_insolvent) else {
        return;
    };
    let bankrupt_age = household[first].age;
    log::debug!(
        "Household bankrupt in projection year {} (age {})",
        household[first].projection_year, bankrupt_age
    );

    for (offset, record) in household[first..].iter_mut().enumerate() {
        record.combined_bankrupt = true;
        record.combined_bankrupt_age = Some(bankrupt_age);

        // Policy cash value survives on its own
        if offset > 0 {
            record.combined.assets = 0.0;
            record.combined.total_assets = record.combined.policy_value;
        }
    }
}

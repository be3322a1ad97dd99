//! Running state carried from one simulated year to the next

use crate::person::PersonConfig;
use super::funding::gross_up;

/// Mutable state threaded through a single person projection
///
/// Each projection owns its state exclusively; yearly records are snapshots
/// taken after the state has been advanced.
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    /// Investable assets
    pub current_assets: f64,

    /// LTC benefits paid since the start of the projection
    pub cumulative_ltc_benefits: f64,

    /// Outstanding policy loan principal plus capitalized interest
    pub policy_loan_balance: f64,

    /// Set once a loan or traditional-policy benefit has moved values off the illustration
    pub has_deviated_from_illustration: bool,

    /// Last year's adjusted policy value
    pub previous_policy_value: f64,

    /// Last year's adjusted death benefit
    pub previous_death_benefit: f64,

    /// Exponential smoothing accumulator for policy loan amounts
    pub smoothed_policy_loan_amount: f64,

    /// First premium paid from assets before the first year
    pub opening: OpeningPremium,
}

/// First premium paid as a lump sum out of starting assets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OpeningPremium {
    pub premium: f64,
    /// Gross withdrawal (and its tax) that funded the premium
    pub withdrawal: f64,
    pub tax: f64,
    /// After-tax part of the premium starting assets could not cover
    pub unpaid: f64,
}

impl SimulationState {
    /// Initial state, with the first premium optionally paid from assets
    pub fn opening(person: &PersonConfig, opening_premium: f64) -> Self {
        let mut state = Self {
            current_assets: person.starting_assets,
            ..Default::default()
        };

        if opening_premium > 0.0 {
            let tax_rate = person.retirement_assets_tax_rate;
            let gross = gross_up(opening_premium, tax_rate);
            let taken = gross.min(state.current_assets);
            state.current_assets = (state.current_assets - taken).max(0.0);
            state.opening = OpeningPremium {
                premium: opening_premium,
                withdrawal: taken,
                tax: taken * tax_rate,
                unpaid: if taken < gross {
                    (opening_premium - taken * (1.0 - tax_rate)).max(0.0)
                } else {
                    0.0
                },
            };
        }

        state
    }

    /// Accrue a year of interest on the existing loan balance
    pub fn accrue_loan_interest(&mut self, rate: f64) -> f64 {
        if self.policy_loan_balance <= 0.0 {
            return 0.0;
        }
        let interest = self.policy_loan_balance * rate;
        self.policy_loan_balance += interest;
        interest
    }

    /// Blend a raw loan amount into the smoothing accumulator
    pub fn smooth_loan(&mut self, raw: f64, factor: f64) -> f64 {
        self.smoothed_policy_loan_amount = self.smoothed_policy_loan_amount * factor + raw * (1.0 - factor);
        self.smoothed_policy_loan_amount
    }

    /// Take the opening lump sum for the first record and clear it
    pub fn take_opening(&mut self) -> OpeningPremium {
        std::mem::take(&mut self.opening)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::sample_person;
    use approx::assert_relative_eq;

    #[test]
    fn test_opening_lump_sum_is_grossed_up() {
        let person = sample_person();
        let state = SimulationState::opening(&person, 8_000.0);

        // 8000 / (1 - 0.2) = 10000 withdrawn, 2000 of it tax
        assert_relative_eq!(state.opening.withdrawal, 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.opening.tax, 2_000.0, epsilon = 1e-9);
        assert_eq!(state.opening.unpaid, 0.0);
        assert_relative_eq!(state.current_assets, 490_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_opening_lump_sum_never_overdraws() {
        let mut person = sample_person();
        person.starting_assets = 1_000.0;
        let mut state = SimulationState::opening(&person, 8_000.0);
        assert_eq!(state.current_assets, 0.0);
        assert_eq!(state.opening.withdrawal, 1_000.0);
        // 1000 gross nets 800 after tax, leaving 7200 of the premium unpaid
        assert_relative_eq!(state.opening.unpaid, 7_200.0, epsilon = 1e-9);

        let opening = state.take_opening();
        assert_eq!(opening.premium, 8_000.0);
        assert_eq!(state.take_opening(), OpeningPremium::default());
    }

    #[test]
    fn test_loan_interest_and_smoothing() {
        let mut state = SimulationState::default();
        assert_eq!(state.accrue_loan_interest(0.05), 0.0);

        state.policy_loan_balance = 10_000.0;
        assert_relative_eq!(state.accrue_loan_interest(0.05), 500.0);
        assert_relative_eq!(state.policy_loan_balance, 10_500.0);

        assert_relative_eq!(state.smooth_loan(1_000.0, 0.5), 500.0);
        assert_relative_eq!(state.smooth_loan(1_000.0, 0.5), 750.0);
        assert_relative_eq!(state.smooth_loan(0.0, 0.5), 375.0);
    }
}

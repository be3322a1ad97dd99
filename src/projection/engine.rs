//! Core projection engine for year-by-year person projections

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::person::PersonConfig;
use crate::policy::{IllustrationCurve, PolicySchedule, PolicyType, PolicyYearRecord};
use super::funding::withdraw_from_assets;
use super::records::{ProjectionResult, YearlyRecord};
use super::state::SimulationState;

/// Uncovered need (in dollars) below which a year still counts as solvent
const INSOLVENCY_TOLERANCE: f64 = 0.01;

/// How policy values evolve once real events diverge from the illustration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionStrategy {
    /// Read the illustration until a loan or traditional benefit perturbs it,
    /// then roll last year's adjusted values forward at the illustrated growth rate
    IllustrationTracking,
    /// Always read the illustration, net of benefits paid from the policy and loans outstanding
    IllustrationAuthoritative,
}

impl ProjectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IllustrationTracking => "illustration_tracking",
            Self::IllustrationAuthoritative => "illustration_authoritative",
        }
    }
}

/// Cost-of-living adjustment applied to social security income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostOfLivingConvention {
    /// Social security grows with general inflation
    GeneralInflation,
    /// Social security grows at general inflation less 0.5 points (floored at 0)
    InflationLessHalfPoint,
}

impl CostOfLivingConvention {
    pub fn social_security_rate(&self, general_inflation_rate: f64) -> f64 {
        match self {
            Self::GeneralInflation => general_inflation_rate,
            Self::InflationLessHalfPoint => (general_inflation_rate - 0.005).max(0.0),
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Calendar year of the first simulated age
    pub start_year: i32,

    /// Policy value strategy
    pub strategy: ProjectionStrategy,

    /// Social security cost-of-living convention
    pub cost_of_living: CostOfLivingConvention,

    /// Share of normal work income earned during a pre-retirement LTC event
    pub ltc_work_capacity: f64,

    /// Weight of the previous smoothed loan amount (0.5 = even blend)
    pub loan_smoothing_factor: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_year: current_year(),
            strategy: ProjectionStrategy::IllustrationTracking,
            cost_of_living: CostOfLivingConvention::GeneralInflation,
            ltc_work_capacity: 0.2,
            loan_smoothing_factor: 0.5,
        }
    }
}

/// Inputs fixed for the whole projection of one person
struct PersonContext<'a> {
    person: &'a PersonConfig,
    schedule: Option<&'a PolicySchedule>,
    curve: IllustrationCurve,
    policy_start_age: u32,
}

impl<'a> PersonContext<'a> {
    fn new(person: &'a PersonConfig, schedule: Option<&'a PolicySchedule>) -> Self {
        let curve = schedule.map(IllustrationCurve::from_schedule).unwrap_or_default();
        let policy_start_age = schedule
            .and_then(PolicySchedule::issue_age)
            .unwrap_or(person.current_age);
        Self {
            person,
            schedule,
            curve,
            policy_start_age,
        }
    }

    /// Policy year at `age`, 0 when no policy is in force
    fn policy_year(&self, age: u32) -> u32 {
        if !self.person.policy_enabled || age < self.policy_start_age {
            0
        } else {
            age - self.policy_start_age + 1
        }
    }

    fn policy_type(&self) -> Option<PolicyType> {
        self.schedule.map(|s| s.policy_type)
    }
}

/// Policy value and death benefit for one year
#[derive(Debug, Clone, Copy, Default)]
struct PolicyValues {
    policy_value: f64,
    death_benefit: f64,
    original_policy_value: f64,
    original_death_benefit: f64,
    growth_rate: f64,
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for one person from current age to death age inclusive
    ///
    /// Inputs are validated first; an error means no records were produced.
    pub fn project_person(
        &self,
        person: &PersonConfig,
        schedule: Option<&PolicySchedule>,
    ) -> Result<ProjectionResult, ConfigError> {
        person.validate()?;
        if let Some(schedule) = schedule {
            schedule.validate()?;
        }

        let schedule = schedule.filter(|_| person.policy_enabled);
        if person.policy_enabled && schedule.is_none() {
            log::warn!("{}: no policy schedule supplied, using fallback policy parameters", person.name);
        }

        let ctx = PersonContext::new(person, schedule);
        let opening_premium = if person.policy_enabled && person.initial_premium_from_assets {
            self.opening_premium(&ctx)
        } else {
            0.0
        };
        let mut state = SimulationState::opening(person, opening_premium);

        log::info!(
            "Projecting {} from age {} to {} ({})",
            person.name, person.current_age, person.death_age, self.config.strategy.as_str()
        );

        let mut result = ProjectionResult::new(&person.name, self.config.strategy);
        for age in person.current_age..=person.death_age {
            let row = self.calculate_year(&ctx, &mut state, age);
            result.add_record(row);
        }

        if let Some(age) = result.first_insolvency_age() {
            log::debug!("{}: shortfall first left uncovered at age {}", person.name, age);
        }

        Ok(result)
    }

    /// Calculate one simulated year and advance the running state
    fn calculate_year(&self, ctx: &PersonContext, state: &mut SimulationState, age: u32) -> YearlyRecord {
        let person = ctx.person;
        let years_elapsed = age - person.current_age;
        let first_year = years_elapsed == 0;
        let mut row = YearlyRecord::new(age, self.config.start_year + years_elapsed as i32);

        // Phase flags
        row.is_retired = age >= person.retirement_age;
        row.has_ltc_event = person.in_ltc_event(age);
        row.policy_year = ctx.policy_year(age);
        let policy_active = row.policy_year >= 1;
        let illustration = if policy_active {
            ctx.schedule.and_then(|s| s.lookup(row.policy_year))
        } else {
            None
        };

        let mut unpaid_opening_premium = 0.0;
        if first_year {
            let opening = state.take_opening();
            row.amounts.asset_funded_premium = opening.premium;
            row.amounts.withdrawal = opening.withdrawal;
            row.amounts.tax_on_withdrawal = opening.tax;
            unpaid_opening_premium = opening.unpaid;
        }

        self.calculate_income(person, years_elapsed, &mut row);
        let premium_from_assets =
            self.calculate_expenses(ctx, illustration, years_elapsed, policy_active, &mut row);

        // Values must be read before this year's benefit and loan interest touch the state
        let mut values = if policy_active {
            self.policy_values_before_loans(ctx, state, illustration, row.policy_year)
        } else {
            PolicyValues::default()
        };

        if row.has_ltc_event && policy_active {
            row.amounts.ltc_benefits = self.calculate_ltc_benefit(ctx, state, illustration, age, row.amounts.ltc_expenses);
        }
        state.cumulative_ltc_benefits += row.amounts.ltc_benefits;
        row.amounts.cumulative_ltc_benefits = state.cumulative_ltc_benefits;

        // Traditional benefits are accelerated death benefit, hybrid pools are separate
        let benefit_from_policy = match (ctx.policy_type(), illustration) {
            (Some(PolicyType::Traditional), Some(_)) => row.amounts.ltc_benefits,
            _ => 0.0,
        };
        values.policy_value = (values.policy_value - benefit_from_policy).max(0.0);
        values.death_benefit = (values.death_benefit - benefit_from_policy).max(0.0);

        row.amounts.net_cash_flow =
            row.amounts.total_income() + row.amounts.ltc_benefits - row.amounts.total_expenses();

        let need = (-row.amounts.net_cash_flow).max(0.0) + premium_from_assets + unpaid_opening_premium;
        let (loan_taken, loan_interest) = self.resolve_shortfall(ctx, state, age, need, values.policy_value, &mut row);

        values.policy_value = (values.policy_value - loan_taken - loan_interest).max(0.0);
        values.death_benefit = (values.death_benefit - loan_taken - loan_interest).max(0.0);
        self.update_policy_state(ctx, state, &values, benefit_from_policy + loan_taken + loan_interest, age);

        row.amounts.policy_value = values.policy_value;
        row.amounts.death_benefit = values.death_benefit;
        row.amounts.original_policy_value = values.original_policy_value;
        row.amounts.original_death_benefit = values.original_death_benefit;
        row.applied_growth_rate = values.growth_rate;

        self.grow_assets(person, state, first_year, &mut row);
        row.amounts.total_assets = row.amounts.assets + row.amounts.policy_value;

        row
    }

    /// Work income before retirement, social security and other income after
    fn calculate_income(&self, person: &PersonConfig, years_elapsed: u32, row: &mut YearlyRecord) {
        let n = years_elapsed as i32;

        if row.is_retired {
            let cola = self.config.cost_of_living.social_security_rate(person.general_inflation_rate);
            row.amounts.social_security_income = person.social_security_income * (1.0 + cola).powi(n);
            row.amounts.other_retirement_income =
                person.other_retirement_income * (1.0 + person.general_inflation_rate).powi(n);
        } else {
            let capacity = if row.has_ltc_event { self.config.ltc_work_capacity } else { 1.0 };
            row.amounts.work_income =
                person.annual_income * (1.0 + person.annual_pay_increase_rate).powi(n) * capacity;
        }
    }

    /// Fill basic, LTC and premium expenses; returns premium to be paid from assets
    fn calculate_expenses(
        &self,
        ctx: &PersonContext,
        illustration: Option<&PolicyYearRecord>,
        years_elapsed: u32,
        policy_active: bool,
        row: &mut YearlyRecord,
    ) -> f64 {
        let person = ctx.person;
        let n = years_elapsed as i32;

        if row.is_retired || row.has_ltc_event {
            row.amounts.basic_expenses = person.annual_income
                * person.income_replacement_ratio
                * (1.0 + person.general_inflation_rate).powi(n)
                * (1.0 - person.retirement_assets_tax_rate);
        }

        if row.has_ltc_event {
            row.amounts.ltc_expenses = person.ltc_cost_per_year * (1.0 + person.ltc_inflation_rate).powi(n);
        }

        if !policy_active {
            return 0.0;
        }

        let premium = self.premium_due(ctx, illustration);
        if years_elapsed == 0 && person.initial_premium_from_assets {
            // Already paid as the opening lump sum
            0.0
        } else if person.premiums_from_assets_pre_retirement && !row.is_retired {
            row.amounts.asset_funded_premium = premium;
            premium
        } else {
            row.amounts.premium_expenses = premium;
            0.0
        }
    }

    /// Premium for the year, from the illustration or the fallback parameters
    fn premium_due(&self, ctx: &PersonContext, illustration: Option<&PolicyYearRecord>) -> f64 {
        match ctx.schedule {
            None => ctx.person.policy_annual_premium,
            Some(_) => illustration.map_or(0.0, |r| r.annual_premium),
        }
    }

    /// First premium, paid from assets before the projection starts
    fn opening_premium(&self, ctx: &PersonContext) -> f64 {
        let policy_year = ctx.policy_year(ctx.person.current_age);
        if policy_year == 0 {
            return 0.0;
        }

        let illustration = ctx.schedule.and_then(|s| s.lookup(policy_year));
        let premium = self.premium_due(ctx, illustration);
        match ctx.schedule {
            Some(schedule) if premium <= 0.0 && policy_year == 1 => schedule.initial_premium,
            _ => premium,
        }
    }

    /// LTC benefit for an active claim, clipped to the policy's lifetime ceiling
    fn calculate_ltc_benefit(
        &self,
        ctx: &PersonContext,
        state: &SimulationState,
        illustration: Option<&PolicyYearRecord>,
        age: u32,
        ltc_expenses: f64,
    ) -> f64 {
        let person = ctx.person;

        let (Some(schedule), Some(record)) = (ctx.schedule, illustration) else {
            // Flat fallback when there is no applicable illustration year
            return if age < person.ltc_event_age + person.policy_benefit_duration_years {
                person.policy_benefit_per_year.min(ltc_expenses)
            } else {
                0.0
            };
        };

        let (annual_limit, ceiling) = match schedule.policy_type {
            PolicyType::Hybrid => (
                record.annual_ltc_benefit.unwrap_or_else(|| record.annual_benefit_limit()),
                record.total_ltc_benefit,
            ),
            PolicyType::Traditional => {
                let acceleration = record.acceleration_percentage / 100.0;
                let mut ceiling = record.death_benefit * acceleration;
                if schedule.initial_death_benefit > 0.0 {
                    ceiling = ceiling.min(schedule.initial_death_benefit * acceleration);
                }
                (record.annual_benefit_limit(), Some(ceiling))
            }
        };

        clip_to_ceiling(
            annual_limit.min(ltc_expenses).max(0.0),
            state.cumulative_ltc_benefits,
            ceiling,
        )
    }

    /// Policy value and death benefit before this year's benefit and loan deductions
    fn policy_values_before_loans(
        &self,
        ctx: &PersonContext,
        state: &SimulationState,
        illustration: Option<&PolicyYearRecord>,
        policy_year: u32,
    ) -> PolicyValues {
        let Some(record) = illustration else {
            return PolicyValues::default();
        };

        let mut values = PolicyValues {
            policy_value: record.surrender_value,
            death_benefit: record.death_benefit,
            original_policy_value: record.surrender_value,
            original_death_benefit: record.death_benefit,
            growth_rate: 0.0,
        };

        match self.config.strategy {
            ProjectionStrategy::IllustrationTracking => {
                if state.has_deviated_from_illustration {
                    let growth = ctx.curve.policy_value_growth(policy_year);
                    let db_growth = ctx.curve.death_benefit_growth(policy_year);
                    values.policy_value = state.previous_policy_value * (1.0 + growth);
                    values.death_benefit = state.previous_death_benefit * (1.0 + db_growth);
                    values.growth_rate = growth;
                }
            }
            ProjectionStrategy::IllustrationAuthoritative => {
                let paid_from_policy = match ctx.policy_type() {
                    Some(PolicyType::Traditional) => state.cumulative_ltc_benefits,
                    _ => 0.0,
                };
                let offset = paid_from_policy + state.policy_loan_balance;
                values.policy_value -= offset;
                values.death_benefit -= offset;
            }
        }

        values.policy_value = values.policy_value.max(0.0);
        values.death_benefit = values.death_benefit.max(0.0);
        values
    }

    /// Cover a need from assets first, then policy loans; returns (loan taken, interest accrued)
    fn resolve_shortfall(
        &self,
        ctx: &PersonContext,
        state: &mut SimulationState,
        age: u32,
        need: f64,
        policy_value: f64,
        row: &mut YearlyRecord,
    ) -> (f64, f64) {
        let person = ctx.person;

        let withdrawal = withdraw_from_assets(state.current_assets, need, person.retirement_assets_tax_rate);
        state.current_assets = (state.current_assets - withdrawal.gross).max(0.0);
        row.amounts.withdrawal += withdrawal.gross;
        row.amounts.tax_on_withdrawal += withdrawal.tax;
        let mut remaining = (need - withdrawal.covered).max(0.0);

        // Interest accrues on last year's balance before any new loan
        let interest = state.accrue_loan_interest(person.policy_loan_rate);

        let mut taken = 0.0;
        if remaining > 0.0 && row.is_retired && person.policy_loan_enabled && policy_value > 0.0 {
            let capacity =
                (policy_value * person.policy_max_loan_to_value_ratio - state.policy_loan_balance).max(0.0);
            let raw = remaining.min(capacity);

            let smoothing = person.ltc_event_end_age().is_some_and(|end| age >= end);
            // Smoothing may lift a loan above the need but never leaves coverable need unfunded
            taken = if smoothing {
                state.smooth_loan(raw, self.config.loan_smoothing_factor).max(raw).min(capacity)
            } else {
                state.smoothed_policy_loan_amount = raw;
                raw
            };

            state.policy_loan_balance += taken;
            // Smoothing can borrow more than this year's need; the excess stays invested
            state.current_assets += (taken - remaining).max(0.0);
            remaining = (remaining - taken).max(0.0);

            if taken > 0.0 {
                log::debug!(
                    "{}: policy loan of {:.2} at age {} (balance {:.2})",
                    person.name, taken, age, state.policy_loan_balance
                );
            }
        }

        row.amounts.policy_loan_taken = taken;
        row.amounts.policy_loan_interest = interest;
        row.amounts.policy_loan_balance = state.policy_loan_balance;
        row.amounts.unfunded_shortfall = remaining;
        row.is_insolvent = remaining > INSOLVENCY_TOLERANCE;

        (taken, interest)
    }

    /// Remember adjusted values and flag the first departure from the illustration
    fn update_policy_state(
        &self,
        ctx: &PersonContext,
        state: &mut SimulationState,
        values: &PolicyValues,
        deductions: f64,
        age: u32,
    ) {
        state.previous_policy_value = values.policy_value;
        state.previous_death_benefit = values.death_benefit;

        if deductions > 0.0 && !state.has_deviated_from_illustration {
            state.has_deviated_from_illustration = true;
            log::debug!("{}: policy values leave the illustration at age {}", ctx.person.name, age);
        }
    }

    /// Retained surplus and savings go in after withdrawals, then the phase return applies
    fn grow_assets(&self, person: &PersonConfig, state: &mut SimulationState, first_year: bool, row: &mut YearlyRecord) {
        let mut assets = state.current_assets;

        if row.is_retired && row.amounts.net_cash_flow > 0.0 {
            assets += row.amounts.net_cash_flow;
        }
        if !row.is_retired && !row.has_ltc_event {
            assets += person.annual_savings_contribution;
        }

        // Starting assets are already valued as of today
        if !first_year {
            let rate = if row.is_retired {
                person.retirement_asset_return_rate
            } else {
                person.pre_retirement_asset_return_rate
            };
            assets *= 1.0 + rate;
        }

        state.current_assets = assets.max(0.0);
        row.amounts.assets = state.current_assets;
    }
}

/// Limit a benefit so the running total never passes the ceiling
fn clip_to_ceiling(benefit: f64, cumulative: f64, ceiling: Option<f64>) -> f64 {
    match ceiling {
        Some(ceiling) if cumulative + benefit > ceiling => (ceiling - cumulative).max(0.0),
        _ => benefit,
    }
}

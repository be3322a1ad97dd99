//! Year-by-year projection engine for a single person

mod state;
mod engine;
mod funding;
mod records;

pub use state::{OpeningPremium, SimulationState};
pub use engine::{CostOfLivingConvention, ProjectionConfig, ProjectionEngine, ProjectionStrategy};
pub use funding::{gross_up, withdraw_from_assets, Withdrawal};
pub use records::{ProjectionResult, YearlyAmounts, YearlyRecord};

//! LTC Projection - Household long-term-care insurance projection engine
//!
//! This library provides:
//! - Policy illustration schedules (traditional and hybrid LTC products)
//! - Year-by-year person projections of income, expenses, assets and policy values
//! - Tax-grossed asset withdrawals and policy loans
//! - Two-person household combination with bankruptcy propagation
//! - Retirement, LTC and asset summaries plus CSV export

pub mod error;
pub mod policy;
pub mod person;
pub mod projection;
pub mod household;
pub mod summary;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{ConfigError, LoadError};
pub use policy::{PolicySchedule, PolicyType, PolicyYearRecord};
pub use person::PersonConfig;
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionStrategy, YearlyRecord};
pub use household::{HouseholdConfig, HouseholdProjection, HouseholdYearlyRecord};
pub use summary::ProjectionSummary;
pub use scenario::ScenarioRunner;

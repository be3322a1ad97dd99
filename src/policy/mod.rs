//! Policy illustration data, lookups and loading

mod data;
mod lookup;
pub mod loader;

pub use data::{PolicySchedule, PolicyTerms, PolicyType, PolicyYearRecord};
pub use lookup::{growth_rate, lookup, IllustrationCurve};
pub use loader::{load_schedule_csv, load_schedule_from_reader, load_schedule_json};

//! Error types for configuration validation and input loading

use thiserror::Error;

/// Invalid engine input, rejected before any yearly record is produced
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("ages must satisfy current ({current}) <= retirement ({retirement}) <= death ({death})")]
    AgeOrdering {
        current: u32,
        retirement: u32,
        death: u32,
    },

    #[error("{field} must be in [{min}, {max}) (got {value})")]
    RateOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a non-negative finite amount (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("policy year {year} must be >= 1 and greater than the preceding year {previous}")]
    ScheduleOrder { year: u32, previous: u32 },

    #[error("policy year {policy_year} lists insured age {insured_age}, below the policy year offset")]
    ScheduleIssueAge { policy_year: u32, insured_age: u32 },
}

/// Failure to read a person, household or policy schedule from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

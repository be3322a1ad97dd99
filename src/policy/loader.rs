//! Load policy schedules from illustration exports (CSV table or JSON document)

use super::{PolicySchedule, PolicyTerms, PolicyYearRecord};
use crate::error::LoadError;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row matching the illustration table columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PolicyYear")]
    policy_year: u32,
    #[serde(rename = "InsuredAge")]
    insured_age: u32,
    #[serde(rename = "AnnualPremium", default)]
    annual_premium: f64,
    #[serde(rename = "AccumulationValue", default)]
    accumulation_value: f64,
    #[serde(rename = "SurrenderValue", default)]
    surrender_value: f64,
    #[serde(rename = "DeathBenefit", default)]
    death_benefit: f64,
    #[serde(rename = "AccelerationPercentage", default)]
    acceleration_percentage: f64,
    #[serde(rename = "MonthlyPayoutPercentage", default)]
    monthly_payout_percentage: f64,
    #[serde(rename = "MonthlyBenefitLimit", default)]
    monthly_benefit_limit: f64,
    #[serde(rename = "AnnualLtcBenefit", default)]
    annual_ltc_benefit: Option<f64>,
    #[serde(rename = "TotalLtcBenefit", default)]
    total_ltc_benefit: Option<f64>,
}

impl From<CsvRow> for PolicyYearRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            policy_year: row.policy_year,
            insured_age: row.insured_age,
            annual_premium: row.annual_premium,
            accumulation_value: row.accumulation_value,
            surrender_value: row.surrender_value,
            death_benefit: row.death_benefit,
            acceleration_percentage: row.acceleration_percentage,
            monthly_payout_percentage: row.monthly_payout_percentage,
            monthly_benefit_limit: row.monthly_benefit_limit,
            annual_ltc_benefit: row.annual_ltc_benefit,
            total_ltc_benefit: row.total_ltc_benefit,
        }
    }
}

/// Load an annual table from a CSV file and attach the policy terms
pub fn load_schedule_csv<P: AsRef<Path>>(path: P, terms: PolicyTerms) -> Result<PolicySchedule, LoadError> {
    let file = File::open(path)?;
    load_schedule_from_reader(file, terms)
}

/// Load an annual table from any reader (e.g., string buffer, upload stream)
pub fn load_schedule_from_reader<R: std::io::Read>(reader: R, terms: PolicyTerms) -> Result<PolicySchedule, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut years = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        years.push(PolicyYearRecord::from(row));
    }

    let schedule = PolicySchedule::new(terms, years);
    schedule.validate()?;
    log::info!(
        "Loaded {} policy schedule with {} years",
        schedule.policy_type.as_str(),
        schedule.years.len()
    );
    Ok(schedule)
}

/// Load a complete schedule (terms and table) from a JSON document
pub fn load_schedule_json<P: AsRef<Path>>(path: P) -> Result<PolicySchedule, LoadError> {
    let file = File::open(path)?;
    let schedule: PolicySchedule = serde_json::from_reader(BufReader::new(file))?;
    schedule.validate()?;
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyType;

    const TABLE: &str = "\
PolicyYear,InsuredAge,AnnualPremium,AccumulationValue,SurrenderValue,DeathBenefit,AccelerationPercentage,MonthlyPayoutPercentage,MonthlyBenefitLimit,AnnualLtcBenefit,TotalLtcBenefit
1,60,10000,9000,8000,200000,0,4,5000,60000,150000
2,61,10000,18500,17000,200000,0,4,5000,60000,150000
3,62,0,19000,18000,200000,0,4,5000,,
";

    #[test]
    fn test_load_schedule_from_reader() {
        let terms = PolicyTerms {
            policy_type: PolicyType::Hybrid,
            initial_premium: 10_000.0,
            initial_death_benefit: 200_000.0,
        };
        let schedule = load_schedule_from_reader(TABLE.as_bytes(), terms).expect("Failed to load schedule");

        assert_eq!(schedule.years.len(), 3);
        assert_eq!(schedule.issue_age(), Some(60));
        assert_eq!(schedule.years[1].surrender_value, 17_000.0);
        assert_eq!(schedule.years[0].annual_ltc_benefit, Some(60_000.0));
        assert_eq!(schedule.years[2].total_ltc_benefit, None);
    }

    #[test]
    fn test_load_rejects_unordered_table() {
        let table = "\
PolicyYear,InsuredAge,AnnualPremium
2,61,100
1,60,100
";
        let terms = PolicyTerms {
            policy_type: PolicyType::Traditional,
            initial_premium: 0.0,
            initial_death_benefit: 0.0,
        };
        let err = load_schedule_from_reader(table.as_bytes(), terms).unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_schedule_json_shape() {
        let json = r#"{
            "policy_type": "traditional",
            "initial_premium": 4000,
            "initial_death_benefit": 250000,
            "years": [
                {"policy_year": 1, "insured_age": 55, "annual_premium": 4000,
                 "surrender_value": 1000, "death_benefit": 250000,
                 "acceleration_percentage": 50, "monthly_benefit_limit": 2500}
            ]
        }"#;
        let schedule: PolicySchedule = serde_json::from_str(json).expect("valid schedule JSON");
        assert_eq!(schedule.policy_type, PolicyType::Traditional);
        assert_eq!(schedule.years[0].annual_benefit_limit(), 30_000.0);
        assert!(schedule.years[0].annual_ltc_benefit.is_none());
    }
}

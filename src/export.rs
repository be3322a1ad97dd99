//! CSV export of person and household projections

use std::io::Write;
use std::path::Path;
use crate::household::{HouseholdProjection, HouseholdYearlyRecord};
use crate::projection::{ProjectionResult, YearlyAmounts, YearlyRecord};

/// Per-person columns ahead of the amounts; households drop `year`
const PERSON_COLUMNS: [&str; 8] = [
    "age",
    "year",
    "policy_year",
    "is_retired",
    "has_ltc_event",
    "is_alive",
    "is_insolvent",
    "applied_growth_rate",
];

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn amounts(values: &YearlyAmounts) -> impl Iterator<Item = String> {
    values.values().into_iter().map(amount)
}

fn person_header() -> Vec<String> {
    PERSON_COLUMNS
        .iter()
        .chain(YearlyAmounts::FIELD_NAMES.iter())
        .map(|c| c.to_string())
        .collect()
}

fn flags(record: &YearlyRecord) -> [String; 6] {
    [
        record.policy_year.to_string(),
        record.is_retired.to_string(),
        record.has_ltc_event.to_string(),
        record.is_alive.to_string(),
        record.is_insolvent.to_string(),
        format!("{:.6}", record.applied_growth_rate),
    ]
}

fn person_row(record: &YearlyRecord) -> Vec<String> {
    let mut row = vec![record.age.to_string(), record.year.to_string()];
    row.extend(flags(record));
    row.extend(amounts(&record.amounts));
    row
}

/// Write one row per simulated year
pub fn write_person_csv<W: Write>(writer: W, result: &ProjectionResult) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(person_header())?;
    for record in &result.records {
        wtr.write_record(person_row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_person_csv_file<P: AsRef<Path>>(path: P, result: &ProjectionResult) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_person_csv(file, result)
}

fn member_columns() -> impl Iterator<Item = &'static str> {
    PERSON_COLUMNS
        .iter()
        .copied()
        .filter(|c| *c != "year")
        .chain(YearlyAmounts::FIELD_NAMES.iter().copied())
}

fn household_header() -> Vec<String> {
    let mut header: Vec<String> = ["projection_year", "year", "age", "combined_bankrupt", "combined_bankrupt_age"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    for prefix in ["p1", "p2"] {
        header.extend(member_columns().map(|c| format!("{}_{}", prefix, c)));
    }
    header.extend(YearlyAmounts::FIELD_NAMES.iter().map(|f| format!("combined_{}", f)));
    header
}

/// A missing person leaves their cells empty
fn member_cells(record: Option<&YearlyRecord>) -> Vec<String> {
    match record {
        Some(r) => {
            let mut cells = vec![r.age.to_string()];
            cells.extend(flags(r));
            cells.extend(amounts(&r.amounts));
            cells
        }
        None => vec![String::new(); member_columns().count()],
    }
}

fn household_row(year: &HouseholdYearlyRecord) -> Vec<String> {
    let mut row = vec![
        year.projection_year.to_string(),
        year.year.to_string(),
        year.age.to_string(),
        year.combined_bankrupt.to_string(),
        year.combined_bankrupt_age.map(|a| a.to_string()).unwrap_or_default(),
    ];
    row.extend(member_cells(year.p1.as_ref()));
    row.extend(member_cells(year.p2.as_ref()));
    row.extend(amounts(&year.combined));
    row
}

/// Write one row per relative projection year with both people and the combined totals
pub fn write_household_csv<W: Write>(writer: W, projection: &HouseholdProjection) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(household_header())?;
    for year in &projection.years {
        wtr.write_record(household_row(year))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_household_csv_file<P: AsRef<Path>>(path: P, projection: &HouseholdProjection) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_household_csv(file, projection)
}

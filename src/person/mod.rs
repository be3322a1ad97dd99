//! Person configuration and loading

mod data;

pub use data::{PersonConfig, Sex};

use crate::error::LoadError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and validate a person from a JSON file
pub fn load_person_json<P: AsRef<Path>>(path: P) -> Result<PersonConfig, LoadError> {
    let file = File::open(path)?;
    let person: PersonConfig = serde_json::from_reader(BufReader::new(file))?;
    person.validate()?;
    Ok(person)
}

#[cfg(test)]
pub(crate) use data::tests::sample_person;

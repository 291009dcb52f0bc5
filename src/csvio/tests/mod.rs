//! Test utilities shared by the CSV reader, writer and merge tests

use csv::StringRecord;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::BoxError;


/// Person record used as the typed payload in tests
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

/// Sample people CSV, optionally with a header row
pub fn sample_csv(include_header: bool) -> String {
    let mut content = String::new();
    if include_header {
        content.push_str("\"first_name\",\"last_name\"\n");
    }
    content.push_str("\"John\",\"Doe\"\n");
    content.push_str("\"Jane\",\"Doe\"");
    content
}

/// Write `content` to a temporary file that lives as long as the handle
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

pub fn write_file(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

/// Conversion that rejects any last name equal to "error", ignoring case
pub fn parse_person(fields: &StringRecord) -> Result<Person, BoxError> {
    let person = Person::new(&fields[0], &fields[1]);
    if person.last_name.eq_ignore_ascii_case("error") {
        return Err(format!("rejected last name {:?}", person.last_name).into());
    }
    Ok(person)
}

pub fn emit_person(person: &Person) -> Result<Vec<String>, BoxError> {
    Ok(vec![person.first_name.clone(), person.last_name.clone()])
}

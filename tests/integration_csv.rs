//! End-to-end CSV tests through the public API
//!
//! Reads typed records from a source file, writes them back out with the
//! typed writer, then merges the written files into one.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use utilkit::csvio::{
    BoxError, CsvError, CsvIterator, CsvWriter, Record, deserialize_record, merge, raw_iterator,
};
use utilkit::{Error, introspect};

#[derive(Debug, Clone, PartialEq, Deserialize, serde::Serialize, Default)]
struct Reading {
    station: String,
    value: f64,
}

fn emit_reading(reading: &Reading) -> Result<Vec<String>, BoxError> {
    Ok(vec![reading.station.clone(), format!("{:.1}", reading.value)])
}

fn read_readings(path: &Path) -> Vec<Result<Record<Reading>, CsvError>> {
    CsvIterator::new(path, true, deserialize_record::<Reading>)
        .unwrap()
        .collect()
}

fn write_readings(path: &Path, readings: &[Reading]) {
    let mut writer = CsvWriter::create(path, emit_reading).unwrap();
    writer.write_header(["station", "value"]).unwrap();
    for reading in readings {
        writer.write(reading).unwrap();
    }
    writer.close().unwrap();
}

#[test]
fn test_iterate_write_merge() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source.csv");
    fs::write(
        &source,
        "station,value\nabbey,1.5\nbrook,not-a-number\ncastle,2.0\n",
    )
    .unwrap();

    let results = read_readings(&source);
    assert_eq!(results.len(), 3);

    // The bad row is a conversion error at its own line; iteration carries on
    let err = results[1].as_ref().unwrap_err();
    assert!(err.is_conversion());
    assert_eq!(err.line(), Some(3));

    let readings: Vec<Reading> = results
        .into_iter()
        .filter_map(Result::ok)
        .map(|record| record.data)
        .collect();
    assert_eq!(readings.len(), 2);

    let first = temp_dir.path().join("parts").join("first.csv");
    let second = temp_dir.path().join("parts").join("second.csv");
    write_readings(&first, &readings[..1]);
    write_readings(&second, &readings[1..]);

    let merged = temp_dir.path().join("merged.csv");
    let summary = merge(&merged, true, &[&first, &second]).unwrap();
    assert_eq!(summary.files_merged, 2);
    assert_eq!(summary.data_rows, 2);

    assert_eq!(
        fs::read_to_string(&merged).unwrap(),
        "station,value\nabbey,1.5\ncastle,2.0\n"
    );

    let round_trip: Vec<Reading> = read_readings(&merged)
        .into_iter()
        .map(|r| r.unwrap().data)
        .collect();
    assert_eq!(round_trip, readings);
}

#[test]
fn test_merge_without_header_keeps_every_row() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.csv");
    let b = temp_dir.path().join("b.csv");
    fs::write(&a, "x,1\ny,2\n").unwrap();
    fs::write(&b, "z,3\n").unwrap();

    let merged = temp_dir.path().join("merged.csv");
    let summary = merge(&merged, false, &[a, b]).unwrap();
    assert!(!summary.header_written);

    let lines: Vec<usize> = raw_iterator(&merged, false)
        .unwrap()
        .map(|r| r.unwrap().line_number)
        .collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

#[test]
fn test_merge_failures_are_typed() {
    let temp_dir = TempDir::new().unwrap();
    let merged = temp_dir.path().join("merged.csv");

    let none: [&Path; 0] = [];
    assert!(matches!(merge(&merged, true, &none), Err(Error::NoInputFiles)));

    let missing = temp_dir.path().join("missing.csv");
    match merge(&merged, true, &[&missing]) {
        Err(Error::Csv(e)) => {
            assert!(e.is_iteration());
            assert_eq!(e.path(), missing.as_path());
        }
        other => panic!("expected iteration error, got {:?}", other),
    }
}

#[test]
fn test_introspect_matches_csv_columns() {
    let fields = introspect::parse_struct_fields_of::<Reading>().unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["station", "value"]);
    assert_eq!(fields[1].kind, introspect::FieldKind::F64);
}

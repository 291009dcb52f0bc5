//! CSV reading, writing and merging
//!
//! ## Architecture
//!
//! - [`reader`] - lazy record iteration with typed conversion
//! - [`writer`] - typed row output with explicit flush/close
//! - [`merge`] - concatenation of same-shape CSV files
//! - [`error`] - iteration, conversion and output error values
//! - [`record`] - line-numbered record container
//!
//! ## Usage
//!
//! ```no_run
//! use utilkit::csvio::{BoxError, CsvIterator};
//!
//! let people = CsvIterator::new("people.csv", true, |fields: &csv::StringRecord| {
//!     Ok::<_, BoxError>((fields[0].to_string(), fields[1].to_string()))
//! })?;
//!
//! for item in people {
//!     match item {
//!         Ok(record) => println!("{}: {:?}", record.line_number, record.data),
//!         Err(e) if e.is_conversion() => eprintln!("skipping: {}", e),
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod merge;
pub mod reader;
pub mod record;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::error::BoxError;
pub use error::{CsvError, Location};
pub use merge::{MergeSummary, ensure_output_is_not_input, merge, merge_with_cancellation};
pub use reader::{CsvIterator, RawIterator, deserialize_record, raw_fields, raw_iterator};
pub use record::Record;
pub use writer::{CsvWriter, RawWriter, emit_fields, raw_writer};

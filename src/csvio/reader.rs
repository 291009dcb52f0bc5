//! Lazy, typed CSV record iteration
//!
//! [`CsvIterator`] reads one record at a time through a buffered `csv::Reader`
//! and maps the raw fields to `T` with a caller-supplied conversion function.
//! Read failures and conversion failures are yielded inline as
//! [`CsvError::Iteration`] and [`CsvError::Conversion`] so the caller decides
//! whether to skip the row or stop.

use csv::StringRecord;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::CsvError;
use super::record::Record;
use crate::constants::DEFAULT_BUFFER_SIZE;
use crate::error::BoxError;

/// Conversion function yielding the raw fields of a record
pub type RawParseFn = fn(&StringRecord) -> Result<Vec<String>, BoxError>;

/// Iterator over the raw fields of each record
pub type RawIterator<R = File> = CsvIterator<Vec<String>, RawParseFn, R>;

/// Single-pass iterator over the records of a CSV source
///
/// The source is released as soon as the sequence is exhausted or the
/// iterator is dropped. Create a new iterator to read the source again.
pub struct CsvIterator<T, F, R = File> {
    label: PathBuf,
    reader: Option<csv::Reader<R>>,
    header_pending: bool,
    line_number: usize,
    record: StringRecord,
    parse: F,
    _output: PhantomData<fn() -> T>,
}

impl<T, F> CsvIterator<T, F, File> {
    /// Open `path` with the default buffer size
    pub fn new(path: impl AsRef<Path>, has_header: bool, parse: F) -> Result<Self, CsvError>
    where
        F: FnMut(&StringRecord) -> Result<T, BoxError>,
    {
        Self::with_buffer_size(path, has_header, DEFAULT_BUFFER_SIZE, parse)
    }

    /// Open `path` with a custom buffer size
    ///
    /// `buffer_size` is only used when it exceeds [`DEFAULT_BUFFER_SIZE`].
    pub fn with_buffer_size(
        path: impl AsRef<Path>,
        has_header: bool,
        buffer_size: usize,
        parse: F,
    ) -> Result<Self, CsvError>
    where
        F: FnMut(&StringRecord) -> Result<T, BoxError>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CsvError::iteration(path, None, e))?;
        debug!(path = %path.display(), "opened CSV file");

        Ok(Self::from_reader(file, path, has_header, buffer_size, parse))
    }
}

impl<T, F, R: Read> CsvIterator<T, F, R> {
    /// Iterate over an already opened source
    ///
    /// `label` identifies the source in error messages.
    pub fn from_reader(
        reader: R,
        label: impl Into<PathBuf>,
        has_header: bool,
        buffer_size: usize,
        parse: F,
    ) -> Self
    where
        F: FnMut(&StringRecord) -> Result<T, BoxError>,
    {
        // Headers are handled here rather than by the csv crate so that the
        // header record still counts towards line numbering.
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .buffer_capacity(effective_buffer_size(buffer_size))
            .from_reader(reader);

        Self {
            label: label.into(),
            reader: Some(reader),
            header_pending: has_header,
            line_number: 0,
            record: StringRecord::new(),
            parse,
            _output: PhantomData,
        }
    }

    /// Source label used in errors
    pub fn path(&self) -> &Path {
        &self.label
    }

    /// Line number of the most recently read record
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_next(&mut self) -> Option<csv::Result<bool>> {
        self.reader
            .as_mut()
            .map(|reader| reader.read_record(&mut self.record))
    }

    fn release(&mut self) {
        if self.reader.take().is_some() {
            debug!(
                "Released CSV source {} after {} lines",
                self.label.display(),
                self.line_number
            );
        }
    }
}

impl<T, F, R> Iterator for CsvIterator<T, F, R>
where
    F: FnMut(&StringRecord) -> Result<T, BoxError>,
    R: Read,
{
    type Item = Result<Record<T>, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.header_pending {
            self.header_pending = false;
            self.line_number += 1;
            match self.read_next()? {
                Ok(true) => {}
                Ok(false) | Err(_) => {
                    self.release();
                    return None;
                }
            }
        }

        let line = self.line_number + 1;
        let read = self.read_next()?;
        self.line_number = line;

        match read {
            Ok(false) => {
                self.release();
                None
            }
            Err(e) => {
                // An I/O failure will not clear on retry, so end the sequence
                // after reporting it.
                let fatal = matches!(e.kind(), csv::ErrorKind::Io(_));
                let err = CsvError::iteration(&self.label, Some(line), e);
                if fatal {
                    self.release();
                }
                Some(Err(err))
            }
            Ok(true) => Some(match (self.parse)(&self.record) {
                Ok(data) => Ok(Record::new(line, data)),
                Err(e) => Err(CsvError::conversion(&self.label, Some(line), e)),
            }),
        }
    }
}

impl<T, F, R> FusedIterator for CsvIterator<T, F, R>
where
    F: FnMut(&StringRecord) -> Result<T, BoxError>,
    R: Read,
{
}

/// Open `path` and yield each record's fields as owned strings
pub fn raw_iterator(path: impl AsRef<Path>, has_header: bool) -> Result<RawIterator, CsvError> {
    CsvIterator::new(path, has_header, raw_fields as RawParseFn)
}

/// Identity conversion returning the record's fields
pub fn raw_fields(record: &StringRecord) -> Result<Vec<String>, BoxError> {
    Ok(record.iter().map(str::to_owned).collect())
}

/// Conversion function mapping a record positionally onto `T` with serde
pub fn deserialize_record<T: DeserializeOwned>(record: &StringRecord) -> Result<T, BoxError> {
    record.deserialize(None).map_err(Into::into)
}

fn effective_buffer_size(requested: usize) -> usize {
    if requested > DEFAULT_BUFFER_SIZE {
        requested
    } else {
        DEFAULT_BUFFER_SIZE
    }
}

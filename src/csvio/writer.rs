//! Typed CSV output
//!
//! [`CsvWriter`] converts values to fields with a caller-supplied function and
//! encodes them through a buffered `csv::Writer`. Nothing is guaranteed to reach
//! the destination until [`CsvWriter::flush`] or [`CsvWriter::close`].

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::CsvError;
use crate::constants::{DEFAULT_BUFFER_SIZE, STREAM_LABEL};
use crate::error::BoxError;

/// Conversion function emitting raw fields unchanged
pub type RawEmitFn = fn(&Vec<String>) -> Result<Vec<String>, BoxError>;

/// Writer for rows that are already split into fields
pub type RawWriter<W = File> = CsvWriter<Vec<String>, RawEmitFn, W>;

pub struct CsvWriter<T, F, W: Write = File> {
    label: PathBuf,
    inner: csv::Writer<W>,
    convert: F,
    rows_written: usize,
    _input: PhantomData<fn(&T)>,
}

impl<T, F> CsvWriter<T, F, File> {
    /// Create (or truncate) `path`, creating missing parent directories
    pub fn create(path: impl AsRef<Path>, convert: F) -> Result<Self, CsvError>
    where
        F: FnMut(&T) -> Result<Vec<String>, BoxError>,
    {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).map_err(|e| CsvError::output(path, None, e))?;
        }
        let file = File::create(path).map_err(|e| CsvError::output(path, None, e))?;
        debug!(path = %path.display(), "created CSV output");

        Ok(Self::with_label(file, path, convert))
    }
}

impl<T, F, W: Write> CsvWriter<T, F, W> {
    /// Wrap an arbitrary destination
    pub fn from_writer(writer: W, convert: F) -> Self
    where
        F: FnMut(&T) -> Result<Vec<String>, BoxError>,
    {
        Self::with_label(writer, STREAM_LABEL, convert)
    }

    /// Wrap a destination, naming it `label` in errors
    pub fn with_label(writer: W, label: impl Into<PathBuf>, convert: F) -> Self
    where
        F: FnMut(&T) -> Result<Vec<String>, BoxError>,
    {
        let inner = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .buffer_capacity(DEFAULT_BUFFER_SIZE)
            .from_writer(writer);

        Self {
            label: label.into(),
            inner,
            convert,
            rows_written: 0,
            _input: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.label
    }

    /// Rows written so far, header included
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Write a literal row of column names
    pub fn write_header<I, S>(&mut self, fields: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.write_record(fields)
    }

    /// Convert `value` and write it as one row
    pub fn write(&mut self, value: &T) -> Result<(), CsvError>
    where
        F: FnMut(&T) -> Result<Vec<String>, BoxError>,
    {
        let fields = (self.convert)(value)
            .map_err(|e| CsvError::conversion(&self.label, Some(self.rows_written + 1), e))?;
        self.write_record(&fields)
    }

    /// Write pre-split fields without invoking the conversion function
    pub fn write_record<I, S>(&mut self, fields: I) -> Result<(), CsvError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let row = self.rows_written + 1;
        self.inner
            .write_record(fields)
            .map_err(|e| CsvError::output(&self.label, Some(row), e))?;
        self.rows_written = row;
        Ok(())
    }

    /// Push buffered rows to the destination without closing it
    pub fn flush(&mut self) -> Result<(), CsvError> {
        self.inner
            .flush()
            .map_err(|e| CsvError::output(&self.label, None, e))
    }

    /// Flush and release the destination
    pub fn close(self) -> Result<(), CsvError> {
        let label = self.label.clone();
        let rows = self.rows_written;
        drop(self.into_inner()?);
        debug!("Closed CSV output {} after {} rows", label.display(), rows);
        Ok(())
    }

    /// Flush and hand back the destination
    pub fn into_inner(self) -> Result<W, CsvError> {
        let label = self.label;
        self.inner
            .into_inner()
            .map_err(|e| CsvError::output(label, None, e.into_error()))
    }
}

/// Create a [`RawWriter`] for `path`
pub fn raw_writer(path: impl AsRef<Path>) -> Result<RawWriter, CsvError> {
    CsvWriter::create(path, emit_fields as RawEmitFn)
}

/// Identity conversion for rows that are already fields
pub fn emit_fields(fields: &Vec<String>) -> Result<Vec<String>, BoxError> {
    Ok(fields.clone())
}

//! Concatenation of CSV files sharing one column layout
//!
//! Every input must have the same number of columns as the first record of
//! the first input. With `has_header`, the first record of every input is
//! treated as a header and only the first input's header is written.
//! Any failure aborts the merge and leaves the partial output on disk. An
//! output that is also one of the inputs is rejected before anything is
//! written.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info};

use super::reader::raw_iterator;
use super::writer::{RawWriter, raw_writer};
use crate::error::{Error, Result};
use crate::logging::log_elapsed_time;

/// Outcome of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub files_merged: usize,
    /// Data rows written, header excluded
    pub data_rows: usize,
    pub header_written: bool,
}

/// Merge `inputs` into `output`
pub fn merge<P: AsRef<Path>>(
    output: impl AsRef<Path>,
    has_header: bool,
    inputs: &[P],
) -> Result<MergeSummary> {
    merge_with_cancellation(output, has_header, inputs, &CancellationToken::new())
}

/// Merge `inputs` into `output`, stopping early once `token` is cancelled
pub fn merge_with_cancellation<P: AsRef<Path>>(
    output: impl AsRef<Path>,
    has_header: bool,
    inputs: &[P],
    token: &CancellationToken,
) -> Result<MergeSummary> {
    let start_time = Instant::now();
    let output = output.as_ref();
    let first = inputs.first().ok_or(Error::NoInputFiles)?.as_ref();
    ensure_output_is_not_input(output, inputs)?;

    let leading = read_leading_record(first)?;
    info!(
        "Merging {} files into {} ({} columns)",
        inputs.len(),
        output.display(),
        leading.len()
    );

    let mut writer = raw_writer(output)?;
    let data_rows = write_merged(&mut writer, &leading, has_header, inputs, token)?;
    writer.close()?;

    log_elapsed_time(Level::DEBUG, "merge", start_time);
    info!(path = %output.display(), "Merged {} data rows", data_rows);

    Ok(MergeSummary {
        output: output.to_path_buf(),
        files_merged: inputs.len(),
        data_rows,
        header_written: has_header,
    })
}

/// Reject an `output` that names one of `inputs`
///
/// Paths are compared after canonicalization when both exist, so a relative
/// and an absolute spelling of the same file are caught.
pub fn ensure_output_is_not_input<P: AsRef<Path>>(output: &Path, inputs: &[P]) -> Result<()> {
    let output_canonical = output.canonicalize().ok();
    for input in inputs {
        let input = input.as_ref();
        let same = match (&output_canonical, input.canonicalize()) {
            (Some(out), Ok(inp)) => *out == inp,
            _ => input == output,
        };
        if same {
            return Err(Error::configuration(format!(
                "Output file {} is also an input",
                input.display()
            )));
        }
    }
    Ok(())
}

/// Write the header and every data row of `inputs` to `writer`
///
/// The header is flushed once it is written and every data row is flushed
/// individually. Returns the number of data rows written.
pub(crate) fn write_merged<P, W>(
    writer: &mut RawWriter<W>,
    leading: &[String],
    has_header: bool,
    inputs: &[P],
    token: &CancellationToken,
) -> Result<usize>
where
    P: AsRef<Path>,
    W: Write,
{
    let expected = leading.len();
    if has_header {
        writer.write_header(leading)?;
        writer.flush()?;
    }

    let mut data_rows = 0;
    for input in inputs {
        let input = input.as_ref();
        debug!(path = %input.display(), "appending input");

        for item in raw_iterator(input, false)? {
            if token.is_cancelled() {
                return Err(Error::processing_interrupted(format!(
                    "merge into {} cancelled while reading {}",
                    writer.path().display(),
                    input.display()
                )));
            }

            let record = item?;
            if record.line_number == 1 {
                if record.data.len() != expected {
                    return Err(Error::column_count_mismatch(
                        input,
                        expected,
                        record.data.len(),
                    ));
                }
                if has_header {
                    continue;
                }
            }

            writer.write(&record.data)?;
            writer.flush()?;
            data_rows += 1;
        }
    }

    Ok(data_rows)
}

fn read_leading_record(path: &Path) -> Result<Vec<String>> {
    match raw_iterator(path, false)?.next() {
        Some(record) => Ok(record?.data),
        None => Err(Error::empty_input(path)),
    }
}

//! Text file contents in memory or line by line.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};

/// Read the whole file as UTF-8 text
pub fn read_file_as_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))
}

/// Read the whole file as raw bytes
pub fn read_file_as_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|e| Error::file_read(path, e))
}

/// In-memory representation of a file's contents
pub trait FileContent: Sized {
    fn read_from(path: &Path) -> Result<Self>;
}

impl FileContent for String {
    fn read_from(path: &Path) -> Result<Self> {
        read_file_as_string(path)
    }
}

impl FileContent for Vec<u8> {
    fn read_from(path: &Path) -> Result<Self> {
        read_file_as_bytes(path)
    }
}

/// Read the whole file as `C`, e.g. `read_file_content::<String>(path)`
pub fn read_file_content<C: FileContent>(path: impl AsRef<Path>) -> Result<C> {
    C::read_from(path.as_ref())
}

/// Lazy iterator over the lines of a text file
///
/// Line terminators are stripped. A read error is yielded once, after which
/// the sequence ends and the file is closed.
pub struct FileLines {
    path: PathBuf,
    lines: Option<Lines<BufReader<File>>>,
}

impl FileLines {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for FileLines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lines.as_mut()?.next() {
            Some(Ok(line)) => Some(Ok(line)),
            Some(Err(e)) => {
                self.lines = None;
                Some(Err(Error::file_read(&self.path, e)))
            }
            None => {
                self.lines = None;
                debug!("Finished reading lines from {}", self.path.display());
                None
            }
        }
    }
}

impl FusedIterator for FileLines {}

/// Open `path` for line iteration
pub fn file_lines(path: impl AsRef<Path>) -> Result<FileLines> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::file_open(path, e))?;

    Ok(FileLines {
        path: path.to_path_buf(),
        lines: Some(BufReader::new(file).lines()),
    })
}

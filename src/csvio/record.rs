/// A converted CSV record and the line it was read from
///
/// `line_number` is 1-based and counts the header record when one is present,
/// so the first data record of a file with a header is line 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    pub line_number: usize,
    pub data: T,
}

impl<T> Record<T> {
    pub fn new(line_number: usize, data: T) -> Self {
        Self { line_number, data }
    }
}

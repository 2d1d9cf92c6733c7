//! Source text access and coordinate mapping.
//!
//! A [`Source`] provides the bidirectional mapping between absolute byte
//! offsets and `(row, column)` coordinates, plus line and substring access.
//! [`Location`]s can only be obtained through a source, so the three
//! coordinates of a location always agree for that source's contents.
//!
//! Grouping in the diagnostic model is keyed by [`SourceId`], an opaque
//! handle allocated per constructed source. Two sources wrapping the same
//! physical file are distinct: callers must reuse one shared source instance
//! (behind an [`Arc`]) for all labels that should be grouped together.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ropey::Rope;

use crate::error::DiagnosticError;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a constructed [`Source`].
///
/// Identity, not content, is the grouping key of the diagnostic model:
/// every source construction allocates a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position inside a [`Source`]: 0-based row, column, and absolute byte
/// offset.
///
/// The byte offset is the primary ordering key; row and column are the
/// derived human-readable coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    row: usize,
    column: usize,
    index: usize,
}

impl Location {
    pub(crate) fn new(row: usize, column: usize, index: usize) -> Self {
        Self { row, column, index }
    }

    /// 0-based row (line) number.
    pub fn row(&self) -> usize {
        self.row
    }

    /// 0-based byte column within the row.
    pub fn column(&self) -> usize {
        self.column
    }

    /// 0-based absolute byte offset.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.index, self.row, self.column).cmp(&(other.index, other.row, other.column))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (byte {})", self.row, self.column, self.index)
    }
}

/// Read access to a body of source text, with coordinate mapping.
///
/// Implementations precompute whatever line index they need at construction;
/// all trait methods are pure lookups afterwards.
pub trait Source: fmt::Debug + Send + Sync {
    /// Identity of this source instance (the diagnostic model's grouping
    /// key).
    fn id(&self) -> SourceId;

    /// Map `(row, column)` to a [`Location`].
    ///
    /// `column` may point one past the line's newline, so a span can cover
    /// the line break itself (e.g. an annotation on an empty line).
    fn from_coords(&self, row: usize, column: usize) -> Result<Location, DiagnosticError>;

    /// Map an absolute byte offset to a [`Location`].
    ///
    /// `index == size()` is valid: it is the exclusive end of a span that
    /// reaches the end of the text.
    fn from_index(&self, index: usize) -> Result<Location, DiagnosticError>;

    /// Text between two locations (start inclusive, end exclusive), clamped
    /// to the contents.
    fn substr(&self, start: &Location, end: &Location) -> String;

    /// Contents of the given 0-based row without its trailing newline, or
    /// `None` if the row does not exist.
    fn line(&self, row: usize) -> Option<String>;

    /// Number of lines. A trailing newline does not open a final empty line.
    fn line_count(&self) -> usize;

    /// The entire source text.
    fn contents(&self) -> String;

    /// Display identifier (file path or synthetic name).
    fn path(&self) -> String;

    /// Total size in bytes.
    fn size(&self) -> usize;
}

/// An in-memory [`Source`] over a string.
///
/// The line index is a [`Rope`] built once at construction; lookups are
/// O(log n) afterwards.
#[derive(Debug)]
pub struct MemorySource {
    id: SourceId,
    rope: Rope,
    name: String,
}

impl MemorySource {
    /// Create a source from text and a display name.
    pub fn new(text: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            id: SourceId::next(),
            rope: Rope::from_str(text.as_ref()),
            name: name.into(),
        }
    }

    /// Byte offset of the first character of `row`.
    fn line_start(&self, row: usize) -> usize {
        self.rope.line_to_byte(row)
    }

    /// Exclusive byte offset one past `row`'s newline (or end of text).
    fn line_end(&self, row: usize) -> usize {
        if row + 1 < self.rope.len_lines() {
            self.rope.line_to_byte(row + 1)
        } else {
            self.rope.len_bytes()
        }
    }
}

impl Source for MemorySource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn from_coords(&self, row: usize, column: usize) -> Result<Location, DiagnosticError> {
        let line_count = self.line_count();
        if row >= line_count {
            return Err(DiagnosticError::OutOfRange {
                path: self.path(),
                message: format!("row {row} is beyond the last line ({line_count} lines)"),
            });
        }

        let start = self.line_start(row);
        let width = self.line_end(row) - start;
        if column > width {
            return Err(DiagnosticError::OutOfRange {
                path: self.path(),
                message: format!("column {column} is outside row {row} ({width} bytes)"),
            });
        }

        Ok(Location::new(row, column, start + column))
    }

    fn from_index(&self, index: usize) -> Result<Location, DiagnosticError> {
        let size = self.size();
        if index > size {
            return Err(DiagnosticError::OutOfRange {
                path: self.path(),
                message: format!("byte {index} is outside the contents ({size} bytes)"),
            });
        }

        // The end-of-text offset after a trailing newline belongs to the last
        // real row, one column past its newline, so round-trips stay exact.
        let row = self
            .rope
            .byte_to_line(index)
            .min(self.line_count().saturating_sub(1));

        Ok(Location::new(row, index - self.line_start(row), index))
    }

    fn substr(&self, start: &Location, end: &Location) -> String {
        let size = self.rope.len_bytes();
        let from = start.index().min(size);
        let to = end.index().clamp(from, size);
        self.rope.byte_slice(from..to).to_string()
    }

    fn line(&self, row: usize) -> Option<String> {
        if row >= self.line_count() {
            return None;
        }

        let mut text = self.rope.line(row).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        Some(text)
    }

    fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        // Rope counts the empty segment after a trailing newline as a line.
        if lines > 1 && self.rope.line(lines - 1).len_bytes() == 0 {
            lines - 1
        } else {
            lines
        }
    }

    fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn path(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> usize {
        self.rope.len_bytes()
    }
}

/// A file-backed [`Source`].
///
/// The whole file is read once at construction into a [`MemorySource`];
/// nothing touches the filesystem afterwards. The displayed path can be
/// relativized against a working directory for compact headers.
#[derive(Debug)]
pub struct FileSource {
    inner: MemorySource,
    path: PathBuf,
    working_path: Option<PathBuf>,
}

impl FileSource {
    /// Read `path` into memory.
    ///
    /// Fails with [`DiagnosticError::NotFound`] if the path does not exist
    /// and [`DiagnosticError::Io`] if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DiagnosticError> {
        let path = path.into();
        if !path.exists() {
            return Err(DiagnosticError::NotFound { path });
        }

        let text = std::fs::read_to_string(&path)?;
        let name = path.display().to_string();

        Ok(Self {
            inner: MemorySource::new(text, name),
            path,
            working_path: None,
        })
    }

    /// Relativize the displayed path against `dir`.
    ///
    /// Has no effect on lookups; only [`Source::path`] output changes. A path
    /// that is not under `dir` is displayed unchanged.
    pub fn set_working_path(&mut self, dir: impl Into<PathBuf>) {
        self.working_path = Some(dir.into());
    }
}

impl Source for FileSource {
    fn id(&self) -> SourceId {
        self.inner.id()
    }

    fn from_coords(&self, row: usize, column: usize) -> Result<Location, DiagnosticError> {
        self.inner.from_coords(row, column)
    }

    fn from_index(&self, index: usize) -> Result<Location, DiagnosticError> {
        self.inner.from_index(index)
    }

    fn substr(&self, start: &Location, end: &Location) -> String {
        self.inner.substr(start, end)
    }

    fn line(&self, row: usize) -> Option<String> {
        self.inner.line(row)
    }

    fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    fn contents(&self) -> String {
        self.inner.contents()
    }

    fn path(&self) -> String {
        match &self.working_path {
            Some(dir) => self
                .path
                .strip_prefix(dir)
                .unwrap_or(&self.path)
                .display()
                .to_string(),
            None => self.path.display().to_string(),
        }
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}

/// Convenience alias for the shared-source handle used throughout the crate.
pub type SharedSource = Arc<dyn Source>;

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> MemorySource {
        MemorySource::new("First line\nSecond line\nThird line", "demo.txt")
    }

    #[test]
    fn test_ids_are_unique_per_instance() {
        let a = MemorySource::new("same", "a.txt");
        let b = MemorySource::new("same", "b.txt");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_line_access() {
        let source = demo();
        assert_eq!(source.line_count(), 3);
        assert_eq!(source.line(0).as_deref(), Some("First line"));
        assert_eq!(source.line(2).as_deref(), Some("Third line"));
        assert_eq!(source.line(3), None);
        assert_eq!(source.size(), 33);
    }

    #[test]
    fn test_trailing_newline_is_not_a_line() {
        let source = MemorySource::new("a\nb\n", "t.txt");
        assert_eq!(source.line_count(), 2);
        assert_eq!(source.line(1).as_deref(), Some("b"));

        let empty = MemorySource::new("", "e.txt");
        assert_eq!(empty.line_count(), 1);
        assert_eq!(empty.line(0).as_deref(), Some(""));
    }

    #[test]
    fn test_from_index() {
        let source = demo();
        let location = source.from_index(0).unwrap();
        assert_eq!((location.row(), location.column()), (0, 0));

        // First byte of "Second line".
        let location = source.from_index(11).unwrap();
        assert_eq!((location.row(), location.column()), (1, 0));

        // The newline byte itself belongs to its row.
        let location = source.from_index(10).unwrap();
        assert_eq!((location.row(), location.column()), (0, 10));

        assert!(source.from_index(34).is_err());
    }

    #[test]
    fn test_from_coords() {
        let source = demo();
        assert_eq!(source.from_coords(1, 0).unwrap().index(), 11);
        assert_eq!(source.from_coords(1, 6).unwrap().index(), 17);

        // One past the newline is allowed (exclusive span ends).
        assert_eq!(source.from_coords(0, 11).unwrap().index(), 11);

        assert!(source.from_coords(0, 12).is_err());
        assert!(source.from_coords(3, 0).is_err());
    }

    #[test]
    fn test_round_trip_every_offset() {
        let source = MemorySource::new("fn main() {\n    let 名前 = \"ワールド\";\n}\n", "u.rs");
        for index in 0..=source.size() {
            let location = source.from_index(index).unwrap();
            let back = source.from_coords(location.row(), location.column()).unwrap();
            assert_eq!(back.index(), index);
            assert_eq!(back, location);
        }
    }

    #[test]
    fn test_substr() {
        let source = demo();
        let start = source.from_index(11).unwrap();
        let end = source.from_index(17).unwrap();
        assert_eq!(source.substr(&start, &end), "Second");
        assert_eq!(source.contents().len(), source.size());
    }

    #[test]
    fn test_locations_order_by_index() {
        let source = demo();
        let early = source.from_index(3).unwrap();
        let late = source.from_index(20).unwrap();
        assert!(early < late);
        assert_eq!(early, source.from_coords(0, 3).unwrap());
    }
}

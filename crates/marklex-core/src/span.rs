//! Source location tracking for tokens and nodes.
//!
//! Every token and AST node carries a `Position` pointing back into the
//! buffer it was scanned from. Positions never own text; use
//! [`Position::slice`] to view it.

/// A byte range in a source buffer.
///
/// Positions use byte offsets (not character offsets) and are half-open:
/// `[begin, end)`. A position produced by the scanners always satisfies
/// `begin <= end <= input.len()`.
///
/// # Example
///
/// ```rust
/// use marklex_core::span::Position;
///
/// let pos = Position::new(4, 10);
/// assert_eq!(pos.len(), 6);
/// assert_eq!(pos.slice("### heading"), "headin");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Starting byte offset (inclusive).
    pub begin: usize,
    /// Ending byte offset (exclusive).
    pub end: usize,
}

impl Position {
    /// Create a new position from byte offsets.
    #[inline]
    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// An empty position at `offset`.
    #[inline]
    pub const fn at(offset: usize) -> Self {
        Self {
            begin: offset,
            end: offset,
        }
    }

    /// Get the length of this position in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// Check if this position covers no bytes.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Check if this position contains a byte offset.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.begin && offset < self.end
    }

    /// Shift both ends by `base` bytes.
    #[inline]
    pub const fn offset(self, base: usize) -> Position {
        Position {
            begin: self.begin + base,
            end: self.end + base,
        }
    }

    /// Merge two positions into one covering both.
    #[inline]
    pub fn merge(self, other: Position) -> Position {
        Position {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// View the covered text of `source`.
    ///
    /// Out-of-range or non-boundary positions yield an empty string rather
    /// than panicking.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.begin..self.end).unwrap_or("")
    }
}

impl From<std::ops::Range<usize>> for Position {
    fn from(range: std::ops::Range<usize>) -> Self {
        Position::new(range.start, range.end)
    }
}

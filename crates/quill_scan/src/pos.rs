//! Source positions and spans.
//!
//! A [`Pos`] is an opaque, totally ordered offset into the source buffer's
//! scalar sequence. Two positions are equal iff they denote the same scalar.
//! Positions produced by the scanner always lie on a `char` boundary; code
//! that injects positions from outside (see [`Scanner::set_pos`]) is
//! responsible for upholding that.
//!
//! [`Scanner::set_pos`]: crate::Scanner::set_pos

use std::fmt;

/// Opaque position in a source buffer.
///
/// Layout: 4 bytes (a `u32` byte offset). `Copy`, cheap to compare,
/// usable as a map key.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(u32);

impl Pos {
    /// Position at the start of a buffer.
    pub const ZERO: Pos = Pos(0);

    /// Create a position from a raw byte offset.
    ///
    /// The offset must lie on a `char` boundary of the source it will be
    /// used with; the scanner debug-asserts this when the position is
    /// injected via [`Scanner::set_pos`](crate::Scanner::set_pos).
    #[inline]
    pub const fn new(offset: u32) -> Self {
        Pos(offset)
    }

    /// The raw byte offset.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.0
    }

    /// Convert a `usize` byte offset, saturating at `u32::MAX`.
    ///
    /// Sources larger than 4 GiB are not supported; the saturation only
    /// exists so conversion is total.
    #[inline]
    pub(crate) fn from_usize(offset: usize) -> Self {
        Pos(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({})", self.0)
    }
}

/// Half-open source span `start..end`.
///
/// Layout: 8 bytes total. Has the full trait set (`Copy`, `Eq`, `Hash`,
/// `Default`) so tokens carrying spans stay `Copy`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start position (inclusive).
    pub start: Pos,
    /// End position (exclusive).
    pub end: Pos,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(start: Pos, end: Pos) -> Self {
        Span { start, end }
    }

    /// Zero-length span anchored at `at`.
    ///
    /// Used for the end-of-input sentinel token.
    #[inline]
    pub const fn empty(at: Pos) -> Self {
        Span { start: at, end: at }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.0 - self.start.0
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start.0 == self.end.0
    }

    /// Check if a position falls within this span.
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start.0, self.end.0)
    }
}

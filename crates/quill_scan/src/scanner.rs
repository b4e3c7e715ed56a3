//! Cursor over an in-memory Unicode source buffer.
//!
//! The scanner owns a single mutable read position; everything else is the
//! immutable source text. All movement in the toolkit — including the token
//! layer — is expressed as changes to this one position, which is what makes
//! checkpoint/restore backtracking sound (see [`crate::checkpoint`]).
//!
//! Reads are always bounds-checked: every peek/advance either returns a
//! scalar or fails with [`ScanError::EndOfInput`]. The `*_unchecked`
//! variants skip the `Result` wrapping for hot paths where the caller has
//! already established non-end via [`Scanner::is_at_end`]; they are still
//! safe code, guarded by `debug_assert!`.

use crate::error::{ScanError, ScanResult};
use crate::pos::{Pos, Span};

/// Byte width of `c` in UTF-8 (1-4).
#[allow(
    clippy::cast_possible_truncation,
    reason = "UTF-8 scalars are 1-4 bytes"
)]
#[inline]
fn width(c: char) -> u32 {
    c.len_utf8() as u32
}

// ─── Character classes ──────────────────────────────────────────────────
//
// Exact sets only: no locale awareness, no extra Unicode categories.
// Keeping these as free pure functions lets token classifiers and
// `skip_while` share them directly.

/// ASCII decimal digit `0`-`9`.
#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// ASCII lowercase letter `a`-`z`.
#[inline]
pub fn is_lowercase(c: char) -> bool {
    c.is_ascii_lowercase()
}

/// ASCII uppercase letter `A`-`Z`.
#[inline]
pub fn is_uppercase(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// ASCII letter `a`-`z` or `A`-`Z`.
#[inline]
pub fn is_letter(c: char) -> bool {
    is_lowercase(c) || is_uppercase(c)
}

/// ASCII letter or decimal digit.
#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_letter(c) || is_digit(c)
}

/// Whitespace: space, `\r`, `\n`, or `\t`. Nothing else.
#[inline]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n' | '\t')
}

/// Scanning cursor over an immutable source buffer.
///
/// The entire mutable state is the position; the source is shared and
/// read-only, so multiple independent scanners over the same buffer are
/// fine (each speculative parse gets its own, or serializes through the
/// backtracking discipline).
///
/// # Invariant
///
/// `pos` is always within `0..=source.len()` and on a `char` boundary.
/// The scanner never moves it out of range; positions injected from
/// outside via [`set_pos`](Self::set_pos) are the caller's responsibility.
#[derive(Clone, Debug)]
pub struct Scanner<'src> {
    /// The source text, immutable for the scanner's lifetime.
    source: &'src str,
    /// Current read position (byte offset, always on a char boundary).
    pos: u32,
}

impl<'src> Scanner<'src> {
    /// Create a scanner positioned at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        debug_assert!(
            u32::try_from(source.len()).is_ok(),
            "sources larger than 4 GiB are not supported"
        );
        Scanner { source, pos: 0 }
    }

    /// Create a scanner positioned at an externally supplied position.
    ///
    /// Used when embedding the scanner inside a larger document, e.g.
    /// resuming lexing mid-file. `start` must be within the source and on
    /// a `char` boundary.
    pub fn starting_at(source: &'src str, start: Pos) -> Self {
        let mut scanner = Scanner::new(source);
        scanner.set_pos(start);
        scanner
    }

    /// The full source buffer this scanner reads from.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The unread remainder of the source, from the current position.
    #[inline]
    pub fn rest(&self) -> &'src str {
        &self.source[self.pos as usize..]
    }

    /// Current position.
    #[inline]
    pub fn pos(&self) -> Pos {
        Pos::new(self.pos)
    }

    /// Set the position directly.
    ///
    /// This is the escape hatch for external code (a backtracker, or a
    /// higher layer jumping to an arbitrary offset). The token layer
    /// tolerates out-of-band moves via its cache-invalidation rule.
    #[inline]
    pub fn set_pos(&mut self, pos: Pos) {
        debug_assert!(
            pos.as_usize() <= self.source.len(),
            "position {} out of bounds (source length {})",
            pos.offset(),
            self.source.len()
        );
        debug_assert!(
            self.source.is_char_boundary(pos.as_usize().min(self.source.len())),
            "position {} is not on a char boundary",
            pos.offset()
        );
        self.pos = pos.offset();
    }

    // ─── End detection ──────────────────────────────────────────────────

    /// Returns `true` if the position has reached the end of the source.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos as usize >= self.source.len()
    }

    /// Returns `true` if the position advanced by `n` scalars would be at
    /// or past the end. Offsets beyond the buffer read as "at end", never
    /// an out-of-range fault.
    #[inline]
    pub fn is_at_end_by(&self, n: usize) -> bool {
        self.rest().chars().nth(n).is_none()
    }

    // ─── Peeking ────────────────────────────────────────────────────────

    /// The scalar at the current position, without consuming it.
    #[inline]
    pub fn peek(&self) -> ScanResult<char> {
        self.rest().chars().next().ok_or(ScanError::EndOfInput)
    }

    /// The scalar `n` positions ahead of the current one (`peek_by(0)` is
    /// `peek`), without consuming anything.
    #[inline]
    pub fn peek_by(&self, n: usize) -> ScanResult<char> {
        self.rest().chars().nth(n).ok_or(ScanError::EndOfInput)
    }

    /// [`peek`](Self::peek) without the `Result` wrapping.
    ///
    /// # Contract
    ///
    /// Only call after establishing non-end via [`is_at_end`](Self::is_at_end).
    /// Debug builds assert; release builds return `'\0'` at end rather than
    /// reading out of bounds.
    #[inline]
    pub fn peek_unchecked(&self) -> char {
        debug_assert!(!self.is_at_end(), "peek_unchecked at end of input");
        match self.rest().chars().next() {
            Some(c) => c,
            None => '\0',
        }
    }

    /// [`peek_by`](Self::peek_by) without the `Result` wrapping.
    ///
    /// # Contract
    ///
    /// Only call after `is_at_end_by(n)` returned `false`. Debug builds
    /// assert; release builds return `'\0'` past the end.
    #[inline]
    pub fn peek_by_unchecked(&self, n: usize) -> char {
        debug_assert!(
            !self.is_at_end_by(n),
            "peek_by_unchecked({n}) at end of input"
        );
        match self.rest().chars().nth(n) {
            Some(c) => c,
            None => '\0',
        }
    }

    // ─── Advancing ──────────────────────────────────────────────────────

    /// Consume and return the scalar at the current position.
    #[inline]
    pub fn advance(&mut self) -> ScanResult<char> {
        let c = self.peek()?;
        self.pos += width(c);
        Ok(c)
    }

    /// Consume the current scalar if it equals `expected`.
    ///
    /// Fails with [`ScanError::EndOfInput`] at end, or
    /// [`ScanError::UnexpectedScalar`] (carrying the offending scalar and
    /// its position) on a mismatch, leaving the position unchanged.
    pub fn expect_char(&mut self, expected: char) -> ScanResult<char> {
        let found = self.peek()?;
        if found == expected {
            self.pos += width(found);
            Ok(found)
        } else {
            Err(ScanError::UnexpectedScalar {
                found,
                at: self.pos(),
            })
        }
    }

    /// Advance while `pred` holds for the current scalar. Never fails;
    /// a no-op if the predicate never holds.
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        for c in self.rest().chars() {
            if !pred(c) {
                break;
            }
            self.pos += width(c);
        }
    }

    /// Position reached by advancing `n` scalars from the current one,
    /// without moving. Clamped to the end of the source.
    pub fn pos_by(&self, n: usize) -> Pos {
        match self.rest().char_indices().nth(n) {
            Some((offset, _)) => Pos::from_usize(self.pos as usize + offset),
            None => Pos::from_usize(self.source.len()),
        }
    }

    // ─── Searching ──────────────────────────────────────────────────────

    /// Find the next occurrence of `needle` at or after the current
    /// position, without moving. Returns `None` if absent before end.
    ///
    /// ASCII needles go through `memchr`; in UTF-8 an ASCII byte never
    /// appears inside a multi-byte sequence, so the byte search is exact.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "ASCII scalar fits in one byte; offsets are bounded by source length"
    )]
    pub fn find_next(&self, needle: char) -> Option<Pos> {
        let offset = if needle.is_ascii() {
            memchr::memchr(needle as u8, self.rest().as_bytes())?
        } else {
            self.rest().find(needle)?
        };
        Some(Pos::new(self.pos + offset as u32))
    }

    /// Move the position to the next occurrence of `needle`.
    ///
    /// Fails with [`ScanError::NotFound`] (position unchanged) if `needle`
    /// does not occur before end of input.
    pub fn skip_to_next(&mut self, needle: char) -> ScanResult<()> {
        match self.find_next(needle) {
            Some(pos) => {
                self.pos = pos.offset();
                Ok(())
            }
            None => Err(ScanError::NotFound { target: needle }),
        }
    }

    // ─── Slicing ────────────────────────────────────────────────────────

    /// Extract the source text covered by `span`.
    ///
    /// # Contract
    ///
    /// `span` must fall within the source on `char` boundaries, which holds
    /// for every span the scanner or token layer produces.
    pub fn slice(&self, span: Span) -> &'src str {
        debug_assert!(
            span.end.as_usize() <= self.source.len(),
            "span end {} exceeds source length {}",
            span.end.offset(),
            self.source.len()
        );
        debug_assert!(span.start <= span.end, "span start exceeds end");
        &self.source[span.start.as_usize()..span.end.as_usize()]
    }
}

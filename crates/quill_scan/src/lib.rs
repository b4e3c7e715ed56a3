//! Scanning cursor and backtracking primitives for hand-written lexers and
//! recursive-descent parsers over Unicode text.
//!
//! This crate is the low-level half of the toolkit:
//!
//! - [`Scanner`] — a cursor over an immutable, already-decoded source
//!   buffer with peek/advance/predicate-skip primitives.
//! - [`Checkpoint`] and the [`Scanner::lookahead`] / [`Scanner::attempt`]
//!   combinators — transactional backtracking so speculative parsing
//!   attempts can be undone.
//! - [`line_col`] / [`LineMap`] — 1-based line/column diagnostics.
//! - [`ScanError`] — the shared error vocabulary; every failure is a
//!   normal parse outcome, never fatal.
//!
//! The generic token-stream layer lives in `quill_token`, which consumes
//! this crate through the [`Scanner`] surface alone.
//!
//! Everything here is single-threaded and synchronous: no I/O, no
//! suspension points, no cancellation. A scanner's position is not safe
//! for concurrent mutation, but the source buffer is read-only and may be
//! shared across independent scanners.

mod checkpoint;
mod error;
mod line_map;
mod pos;
mod scanner;

pub use checkpoint::Checkpoint;
pub use error::{ScanError, ScanResult};
pub use line_map::{line_col, LineMap};
pub use pos::{Pos, Span};
pub use scanner::{
    is_alphanumeric, is_digit, is_letter, is_lowercase, is_uppercase, is_whitespace, Scanner,
};

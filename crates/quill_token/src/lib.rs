//! Generic token-stream layer over the `quill_scan` cursor.
//!
//! Turns raw character scanning into a sequence of typed tokens with lazy,
//! cache-aware lookahead. The layer is generic over a [`TokenClass`]
//! capability — a small closed trait (`classify` / `scalar_len` /
//! `display_name` / `EOF`) that concrete token-kind enums implement — and
//! exposes token-level navigation: peek ([`TokenStream::current`]),
//! consume ([`TokenStream::next_token`]), conditional consume
//! ([`TokenStream::eat`] / [`TokenStream::expect`]), predicate-driven skip
//! ([`TokenStream::skip_until`]), bulk collection, and `Iterator` support.
//!
//! The stream never bypasses the scanner: every move is a scanner-position
//! change, and the current-token cache is keyed by that position, so
//! scanner-level backtracking and even out-of-band position writes stay
//! consistent with token-level reads.

mod stream;
mod token;

pub use stream::TokenStream;
pub use token::{Token, TokenClass};

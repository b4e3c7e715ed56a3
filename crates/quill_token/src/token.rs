//! Tokens and the pluggable classification capability.

use quill_scan::{Scanner, Span};

/// The token-classification capability a [`TokenStream`] is generic over.
///
/// A concrete kind is usually a small `Copy` enum. The stream drives the
/// whole protocol: it skips whitespace, asks [`classify`] what matches at
/// the scanner's current position, asks [`scalar_len`] how far the match
/// extends, and slices the source accordingly. Implementations never move
/// the scanner — both hooks take `&Scanner` and inspect via `peek_by`
/// or [`Scanner::rest`].
///
/// [`classify`]: TokenClass::classify
/// [`scalar_len`]: TokenClass::scalar_len
/// [`TokenStream`]: crate::TokenStream
pub trait TokenClass: Copy + Eq {
    /// Sentinel kind for end of input. The stream returns a zero-length
    /// token of this kind whenever the current token is requested at end
    /// of input; [`classify`](TokenClass::classify) is never asked about it.
    const EOF: Self;

    /// The kind that matches at the scanner's current position, or `None`
    /// if nothing does. The stream has already skipped whitespace and
    /// established that the scanner is not at end.
    fn classify(scanner: &Scanner<'_>) -> Option<Self>;

    /// Number of scalars this kind occupies at the scanner's current
    /// position. Only called with the kind [`classify`](TokenClass::classify)
    /// just returned there, so the match is known to be present.
    fn scalar_len(self, scanner: &Scanner<'_>) -> usize;

    /// Human-readable literal form used in diagnostics — for fixed-symbol
    /// kinds, typically the symbol itself in backticks.
    fn display_name(self) -> String;
}

/// An immutable, fully resolved lexical unit.
///
/// `value` is a zero-copy view into the original source; `span` exactly
/// covers the scalars consumed to produce the token. Tokens are cheap
/// `Copy` values, constructed on demand and never pooled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'src, K> {
    /// The matched source text.
    pub value: &'src str,
    /// Classification of the match.
    pub kind: K,
    /// Exact source range of `value`.
    pub span: Span,
}

impl<'src, K: TokenClass> Token<'src, K> {
    /// Returns `true` for the end-of-input sentinel.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == K::EOF
    }
}

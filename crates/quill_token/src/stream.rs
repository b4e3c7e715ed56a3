//! Lazy, cache-aware token stream over a scanner.

use quill_scan::{is_whitespace, Checkpoint, Pos, ScanError, ScanResult, Scanner, Span};

use crate::token::{Token, TokenClass};

/// Memoized current token, keyed by the scanner position it was computed
/// at. The key is compared against the live position on every read, so
/// out-of-band moves of the scanner simply miss the cache.
#[derive(Clone, Copy)]
struct Cached<'src, K> {
    at: Pos,
    token: Token<'src, K>,
}

/// A stream of typed tokens over a [`Scanner`], generic over a
/// [`TokenClass`] capability.
///
/// The stream never tokenizes eagerly: the current token is computed on
/// demand and memoized until the scanner's position changes. All movement
/// is expressed as scanner-position changes, so scanner-level backtracking
/// ([`Scanner::lookahead`], [`Scanner::attempt`], [`Checkpoint`]) composes
/// with token-level navigation for free.
///
/// Two logical states: *positioned* (a concrete token is current) and
/// *exhausted* (the current token is the zero-length [`TokenClass::EOF`]
/// sentinel). Once exhausted, [`skip`](Self::skip) is idempotent; the only
/// way back is restoring an earlier position.
pub struct TokenStream<'src, K: TokenClass> {
    scanner: Scanner<'src>,
    cache: Option<Cached<'src, K>>,
}

impl<'src, K: TokenClass> TokenStream<'src, K> {
    /// Create a stream at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self::from_scanner(Scanner::new(source))
    }

    /// Create a stream over an existing scanner, picking up at its
    /// current position.
    pub fn from_scanner(scanner: Scanner<'src>) -> Self {
        TokenStream {
            scanner,
            cache: None,
        }
    }

    /// The underlying scanner.
    #[inline]
    pub fn scanner(&self) -> &Scanner<'src> {
        &self.scanner
    }

    /// Mutable access to the underlying scanner.
    ///
    /// The position may be moved freely; the next token read notices the
    /// changed position and recomputes rather than serving a stale cache.
    #[inline]
    pub fn scanner_mut(&mut self) -> &mut Scanner<'src> {
        &mut self.scanner
    }

    /// The scanner's current position.
    #[inline]
    pub fn pos(&self) -> Pos {
        self.scanner.pos()
    }

    /// The current token, without consuming it.
    ///
    /// Skips whitespace, then classifies what follows. At end of input
    /// this is the zero-length [`TokenClass::EOF`] sentinel anchored at
    /// the end position. Fails with [`ScanError::UnexpectedScalar`] if the
    /// input at the current position matches no kind.
    pub fn current(&mut self) -> ScanResult<Token<'src, K>> {
        if let Some(cached) = self.cache {
            if cached.at == self.scanner.pos() {
                return Ok(cached.token);
            }
        }

        self.scanner.skip_while(is_whitespace);
        let start = self.scanner.pos();

        let token = if self.scanner.is_at_end() {
            Token {
                value: "",
                kind: K::EOF,
                span: Span::empty(start),
            }
        } else {
            let Some(kind) = K::classify(&self.scanner) else {
                return Err(ScanError::UnexpectedScalar {
                    found: self.scanner.peek_unchecked(),
                    at: start,
                });
            };
            let span = Span::new(start, self.scanner.pos_by(kind.scalar_len(&self.scanner)));
            Token {
                value: self.scanner.slice(span),
                kind,
                span,
            }
        };

        self.cache = Some(Cached { at: start, token });
        Ok(token)
    }

    /// Whether the current token has the given kind. Never fails; a
    /// classification failure reads as `false`.
    pub fn check(&mut self, kind: K) -> bool {
        self.current().is_ok_and(|token| token.kind == kind)
    }

    /// Whether the current token's kind satisfies `pred`. The predicate
    /// also sees the [`TokenClass::EOF`] sentinel at end of input.
    pub fn check_with(&mut self, pred: impl FnOnce(K) -> bool) -> bool {
        self.current().is_ok_and(|token| pred(token.kind))
    }

    /// Whether the stream is exhausted (current token is the sentinel).
    pub fn at_end(&mut self) -> bool {
        self.check(K::EOF)
    }

    /// Advance past the current token.
    ///
    /// At end of input this is a safe no-op: the sentinel is zero-length,
    /// so repeated calls keep the position at the end bound.
    pub fn skip(&mut self) -> ScanResult<()> {
        let token = self.current()?;
        self.bump_past(token);
        Ok(())
    }

    /// Consume and return the current token — the primary iteration
    /// primitive. At end of input, returns the sentinel (repeatedly).
    pub fn next_token(&mut self) -> ScanResult<Token<'src, K>> {
        let token = self.current()?;
        self.bump_past(token);
        Ok(token)
    }

    /// Consume the current token only if it has the given kind.
    ///
    /// Returns `None` — leaving the position unchanged — on a kind
    /// mismatch or any classification failure.
    pub fn eat(&mut self, kind: K) -> Option<Token<'src, K>> {
        match self.current() {
            Ok(token) if token.kind == kind => {
                self.bump_past(token);
                Some(token)
            }
            _ => None,
        }
    }

    /// Consume the current token, requiring it to have the given kind.
    ///
    /// On a mismatch, fails with [`ScanError::UnexpectedToken`] naming
    /// both the expected and the found literal forms at the token's
    /// position, without consuming.
    #[inline]
    pub fn expect(&mut self, kind: K) -> ScanResult<Token<'src, K>> {
        let token = self.current()?;
        if token.kind == kind {
            self.bump_past(token);
            Ok(token)
        } else {
            Err(Self::unexpected(kind.display_name(), token))
        }
    }

    /// Consume the current token, requiring its kind to satisfy `pred`.
    ///
    /// Same failure contract as [`expect`](Self::expect) with a generic
    /// expectation message.
    #[inline]
    pub fn expect_with(&mut self, pred: impl FnOnce(K) -> bool) -> ScanResult<Token<'src, K>> {
        let token = self.current()?;
        if pred(token.kind) {
            self.bump_past(token);
            Ok(token)
        } else {
            Err(Self::unexpected("a matching token".to_string(), token))
        }
    }

    /// Build the error for a failed expectation.
    ///
    /// Separated as `#[cold]` so the `String` work stays off the
    /// [`expect`](Self::expect) fast path.
    #[cold]
    #[inline(never)]
    fn unexpected(expected: String, found: Token<'src, K>) -> ScanError {
        ScanError::UnexpectedToken {
            expected,
            found: found.kind.display_name(),
            at: found.span.start,
        }
    }

    /// Skip tokens until the current one satisfies `pred` or the stream
    /// is exhausted. Afterwards the current token is the first satisfying
    /// token, or the sentinel if none was found. Terminates on any input.
    pub fn skip_until(&mut self, pred: impl Fn(&Token<'src, K>) -> bool) -> ScanResult<()> {
        loop {
            let token = self.current()?;
            if token.is_eof() || pred(&token) {
                return Ok(());
            }
            self.bump_past(token);
        }
    }

    /// Collect every remaining token up to — and excluding — the
    /// end-of-input sentinel, leaving the stream exhausted.
    pub fn collect_all(&mut self) -> ScanResult<Vec<Token<'src, K>>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.current()?;
            if token.is_eof() {
                return Ok(tokens);
            }
            self.bump_past(token);
            tokens.push(token);
        }
    }

    /// Snapshot the scanner position (see [`Scanner::checkpoint`]).
    ///
    /// Restore via [`Checkpoint::restore`] against
    /// [`scanner_mut`](Self::scanner_mut); the token cache follows the
    /// position automatically.
    pub fn checkpoint(&self) -> Checkpoint {
        self.scanner.checkpoint()
    }

    /// Run `body` with full token-level navigation, then unconditionally
    /// restore the starting position — success or failure.
    ///
    /// Strictly a lookahead tool. Callers who want commit-on-success /
    /// rollback-on-failure compose with [`Scanner::attempt`] through
    /// [`scanner_mut`](Self::scanner_mut) instead.
    pub fn lookahead<T, E>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut checkpoint = self.scanner.checkpoint();
        let outcome = body(self);
        checkpoint.restore(&mut self.scanner);
        outcome
    }

    /// Move the scanner past `token`. The cache keys on the position, so
    /// this implicitly invalidates it (except for the zero-length
    /// sentinel, which stays current — exhausted is a fixpoint).
    #[inline]
    fn bump_past(&mut self, token: Token<'src, K>) {
        self.scanner.set_pos(token.span.end);
    }
}

/// Lazy, finite, forward-only iteration over the remaining tokens,
/// excluding the end-of-input sentinel. Exhausting the iterator leaves
/// the stream positioned at end of input.
///
/// A classification failure is yielded as `Err` without advancing; since
/// the position then no longer moves, callers should treat the first
/// `Err` as terminal (as `collect::<Result<Vec<_>, _>>()` and `?` both
/// do).
impl<'src, K: TokenClass> Iterator for TokenStream<'src, K> {
    type Item = ScanResult<Token<'src, K>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current() {
            Ok(token) if token.is_eof() => None,
            Ok(token) => {
                self.bump_past(token);
                Some(Ok(token))
            }
            Err(error) => Some(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_scan::{Pos, ScanError, Scanner};

    use super::*;

    /// Fixed-symbol kinds for a tiny tuple grammar: `(`, `,`, `)`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Punct {
        Open,
        Comma,
        Close,
        Eof,
    }

    impl TokenClass for Punct {
        const EOF: Self = Punct::Eof;

        fn classify(scanner: &Scanner<'_>) -> Option<Self> {
            match scanner.peek().ok()? {
                '(' => Some(Punct::Open),
                ',' => Some(Punct::Comma),
                ')' => Some(Punct::Close),
                _ => None,
            }
        }

        fn scalar_len(self, _scanner: &Scanner<'_>) -> usize {
            match self {
                Punct::Eof => 0,
                _ => 1,
            }
        }

        fn display_name(self) -> String {
            match self {
                Punct::Open => "`(`",
                Punct::Comma => "`,`",
                Punct::Close => "`)`",
                Punct::Eof => "end of input",
            }
            .to_string()
        }
    }

    fn kinds(source: &str) -> Vec<Punct> {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new(source);
        let mut kinds = Vec::new();
        loop {
            match stream.next_token() {
                Ok(token) if token.is_eof() => return kinds,
                Ok(token) => kinds.push(token.kind),
                Err(error) => panic!("unexpected scan failure: {error}"),
            }
        }
    }

    // === current ===

    #[test]
    fn current_does_not_consume() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Open));
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Open));
        assert_eq!(stream.pos(), Pos::ZERO);
    }

    #[test]
    fn current_token_carries_value_and_span() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("  (");
        let token = match stream.current() {
            Ok(token) => token,
            Err(error) => panic!("unexpected scan failure: {error}"),
        };
        assert_eq!(token.value, "(");
        assert_eq!(token.span, Span::new(Pos::new(2), Pos::new(3)));
    }

    #[test]
    fn current_at_end_is_zero_length_sentinel() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("   ");
        let token = match stream.current() {
            Ok(token) => token,
            Err(error) => panic!("unexpected scan failure: {error}"),
        };
        assert!(token.is_eof());
        assert_eq!(token.value, "");
        assert!(token.span.is_empty());
        assert_eq!(token.span.start, Pos::new(3)); // anchored at the end
    }

    #[test]
    fn unclassifiable_input_is_unexpected_scalar() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new(" x");
        assert_eq!(
            stream.current(),
            Err(ScanError::UnexpectedScalar {
                found: 'x',
                at: Pos::new(1)
            })
        );
    }

    // === Sequencing ===

    #[test]
    fn next_token_yields_each_kind_then_eof_forever() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Open));
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Comma));
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Close));
        for _ in 0..4 {
            assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Eof));
        }
    }

    #[test]
    fn whitespace_does_not_change_kind_sequence() {
        assert_eq!(kinds("(,)"), vec![Punct::Open, Punct::Comma, Punct::Close]);
        assert_eq!(
            kinds(" ( , ) "),
            vec![Punct::Open, Punct::Comma, Punct::Close]
        );
        assert_eq!(
            kinds("\t(\r\n,\n)\t"),
            vec![Punct::Open, Punct::Comma, Punct::Close]
        );
    }

    #[test]
    fn skip_is_idempotent_at_end() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(");
        assert_eq!(TokenStream::skip(&mut stream), Ok(()));
        assert!(stream.at_end());
        let end = stream.pos();
        assert_eq!(TokenStream::skip(&mut stream), Ok(()));
        assert_eq!(TokenStream::skip(&mut stream), Ok(()));
        assert_eq!(stream.pos(), end);
    }

    // === check / eat ===

    #[test]
    fn check_matches_without_consuming() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,");
        assert!(stream.check(Punct::Open));
        assert!(!stream.check(Punct::Comma));
        assert_eq!(stream.pos(), Pos::ZERO);
    }

    #[test]
    fn check_is_false_on_unclassifiable_input() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("x");
        assert!(!stream.check(Punct::Open));
    }

    #[test]
    fn check_with_sees_the_eof_sentinel() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("");
        assert!(stream.check_with(|kind| kind == Punct::Eof));
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,");
        assert_eq!(stream.eat(Punct::Comma), None);
        assert_eq!(stream.pos(), Pos::ZERO);
        assert_eq!(stream.eat(Punct::Open).map(|t| t.kind), Some(Punct::Open));
        assert_eq!(stream.eat(Punct::Comma).map(|t| t.kind), Some(Punct::Comma));
    }

    // === expect ===

    #[test]
    fn expect_consumes_on_match() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("()");
        assert_eq!(stream.expect(Punct::Open).map(|t| t.kind), Ok(Punct::Open));
        assert_eq!(
            stream.expect(Punct::Close).map(|t| t.kind),
            Ok(Punct::Close)
        );
    }

    #[test]
    fn expect_mismatch_fails_without_consuming() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new(",");
        let error = match stream.expect(Punct::Open) {
            Err(error) => error,
            Ok(token) => panic!("expected a mismatch, got {token:?}"),
        };
        assert_eq!(
            error,
            ScanError::UnexpectedToken {
                expected: "`(`".to_string(),
                found: "`,`".to_string(),
                at: Pos::ZERO,
            }
        );
        // Message names both literal forms.
        assert_eq!(
            error.render(","),
            "Error at line 1 column 1: expected `(`, found `,`"
        );
        // Nothing was consumed.
        assert!(stream.check(Punct::Comma));
    }

    #[test]
    fn expect_at_end_names_the_sentinel() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("");
        let error = match stream.expect(Punct::Close) {
            Err(error) => error,
            Ok(token) => panic!("expected a mismatch, got {token:?}"),
        };
        assert_eq!(
            error,
            ScanError::UnexpectedToken {
                expected: "`)`".to_string(),
                found: "end of input".to_string(),
                at: Pos::ZERO,
            }
        );
    }

    #[test]
    fn expect_with_generic_message() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new(",");
        assert_eq!(
            stream
                .expect_with(|kind| kind == Punct::Comma)
                .map(|t| t.kind),
            Ok(Punct::Comma)
        );

        let mut stream: TokenStream<'_, Punct> = TokenStream::new(",");
        let error = match stream.expect_with(|kind| kind == Punct::Open) {
            Err(error) => error,
            Ok(token) => panic!("expected a mismatch, got {token:?}"),
        };
        assert_eq!(
            error,
            ScanError::UnexpectedToken {
                expected: "a matching token".to_string(),
                found: "`,`".to_string(),
                at: Pos::ZERO,
            }
        );
    }

    // === skip_until ===

    #[test]
    fn skip_until_stops_at_first_satisfying_token() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,,)");
        assert_eq!(stream.skip_until(|t| t.kind == Punct::Close), Ok(()));
        assert!(stream.check(Punct::Close));
    }

    #[test]
    fn skip_until_never_true_stops_at_sentinel() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,,)");
        assert_eq!(stream.skip_until(|_| false), Ok(()));
        assert!(stream.at_end());
    }

    #[test]
    fn skip_until_satisfied_immediately_is_noop() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        assert_eq!(stream.skip_until(|t| t.kind == Punct::Open), Ok(()));
        assert_eq!(stream.pos(), Pos::ZERO);
    }

    // === collect_all / iteration ===

    #[test]
    fn collect_all_excludes_the_sentinel() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,,)");
        let tokens = match stream.collect_all() {
            Ok(tokens) => tokens,
            Err(error) => panic!("unexpected scan failure: {error}"),
        };
        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| !t.is_eof()));
        assert!(stream.at_end());
    }

    #[test]
    fn iteration_matches_collect_all() {
        let stream: TokenStream<'_, Punct> = TokenStream::new(" ( , ) ");
        let via_iter: Vec<Punct> = stream.map(|item| match item {
            Ok(token) => token.kind,
            Err(error) => panic!("unexpected scan failure: {error}"),
        }).collect();
        assert_eq!(via_iter, kinds(" ( , ) "));
    }

    #[test]
    fn exhausted_iterator_leaves_stream_at_end() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        while let Some(item) = stream.next() {
            assert!(item.is_ok());
        }
        assert!(stream.at_end());
        assert_eq!(stream.next(), None); // stays exhausted
    }

    // === Cache invalidation ===

    #[test]
    fn external_position_moves_invalidate_the_cache() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Open));

        // Jump the scanner out-of-band; the next read must reflect the
        // new position, not the cached `(`.
        stream.scanner_mut().set_pos(Pos::new(1));
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Comma));

        // And backwards again.
        stream.scanner_mut().set_pos(Pos::ZERO);
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Open));
    }

    #[test]
    fn from_scanner_picks_up_mid_buffer() {
        let scanner = Scanner::starting_at("(,)", Pos::new(1));
        let mut stream: TokenStream<'_, Punct> = TokenStream::from_scanner(scanner);
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Comma));
    }

    // === Token-level lookahead ===

    #[test]
    fn lookahead_restores_position_on_success_and_failure() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");

        let peeked: ScanResult<Punct> = stream.lookahead(|s| {
            s.skip()?;
            s.current().map(|t| t.kind)
        });
        assert_eq!(peeked, Ok(Punct::Comma));
        assert_eq!(stream.pos(), Pos::ZERO);

        let failed: ScanResult<Token<'_, Punct>> = stream.lookahead(|s| {
            s.skip()?;
            s.expect(Punct::Close)
        });
        assert!(failed.is_err());
        assert_eq!(stream.pos(), Pos::ZERO);
    }

    #[test]
    fn checkpoint_restores_through_the_scanner() {
        let mut stream: TokenStream<'_, Punct> = TokenStream::new("(,)");
        let mut checkpoint = stream.checkpoint();
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Open));
        assert_eq!(stream.next_token().map(|t| t.kind), Ok(Punct::Comma));

        checkpoint.restore(stream.scanner_mut());
        assert_eq!(stream.current().map(|t| t.kind), Ok(Punct::Open));
    }
}

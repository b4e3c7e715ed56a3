//! Scanner error types.
//!
//! Every failure here is a normal, expected outcome of a parsing attempt:
//! nothing is fatal, there is no internal retry, and the only recovery
//! mechanism is explicit backtracking ([`Scanner::attempt`] or a
//! [`Checkpoint`]). Callers either try another alternative or propagate the
//! error upward as a user-facing syntax error with line/column.
//!
//! Positions are not self-describing; rendering a position-bearing error
//! requires the original source (see [`ScanError::render`]).
//!
//! [`Scanner::attempt`]: crate::Scanner::attempt
//! [`Checkpoint`]: crate::Checkpoint

use thiserror::Error;

use crate::line_map::line_col;
use crate::pos::Pos;

/// Result alias for scanning operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// An error raised by the scanner or the token stream built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Attempted to read past the end of the input.
    #[error("unexpected end of input")]
    EndOfInput,

    /// A specific expected character was not found.
    #[error("unexpected character `{found}`")]
    UnexpectedScalar {
        /// The offending character.
        found: char,
        /// Where it was found.
        at: Pos,
    },

    /// Token-level mismatch: the current token was not the expected kind.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// Literal form of the expected token.
        expected: String,
        /// Literal form of the token actually found.
        found: String,
        /// Start of the offending token.
        at: Pos,
    },

    /// Generic message-carrying failure at a position, for consumers
    /// building richer grammars on top of this core.
    #[error("{message}")]
    Syntax {
        /// Human-readable description.
        message: String,
        /// Where the failure occurred.
        at: Pos,
    },

    /// A scan-ahead search did not find its target before end of input.
    #[error("`{target}` not found before end of input")]
    NotFound {
        /// The character that was searched for.
        target: char,
    },

    /// Unexpected internal failure. Should not occur in correct usage.
    #[error("internal scanner error: {0}")]
    Internal(String),
}

impl ScanError {
    /// Convenience constructor for [`ScanError::Syntax`].
    pub fn syntax(message: impl Into<String>, at: Pos) -> Self {
        ScanError::Syntax {
            message: message.into(),
            at,
        }
    }

    /// The position this error points at, if it carries one.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            ScanError::UnexpectedScalar { at, .. }
            | ScanError::UnexpectedToken { at, .. }
            | ScanError::Syntax { at, .. } => Some(*at),
            ScanError::EndOfInput | ScanError::NotFound { .. } | ScanError::Internal(_) => None,
        }
    }

    /// Render against the original source.
    ///
    /// Produces `"Error at line L column C: <message>"` for position-bearing
    /// errors and `"Error: <message>"` otherwise. `source` must be the buffer
    /// the error's position came from.
    pub fn render(&self, source: &str) -> String {
        match self.pos() {
            Some(pos) => {
                let (line, column) = line_col(source, pos);
                format!("Error at line {line} column {column}: {self}")
            }
            None => format!("Error: {self}"),
        }
    }
}

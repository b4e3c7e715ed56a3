//! Checkpoints and backtracking combinators.
//!
//! A [`Checkpoint`] snapshots the scanner's position so a speculative parse
//! can be undone. Checkpoints are single-use: the first [`restore`] rewinds
//! the scanner, any later call on the same handle is a no-op. This stops a
//! checkpoint from being silently reapplied after the caller has already
//! moved past it, which would mask bugs in nested backtracking logic.
//!
//! The combinators on [`Scanner`] are thin compositions over
//! checkpoint/restore. They track no state of their own — backtracking
//! correctness rests entirely on the scanner's single mutable position
//! being the only thing ever saved and restored.
//!
//! # Choosing a combinator
//!
//! - [`Scanner::lookahead`]: pure lookahead. The position is restored
//!   unconditionally, success or failure.
//! - [`Scanner::attempt`]: attempt-and-commit. On success the position
//!   stays where the body left it; on failure it is restored and the error
//!   propagates, so the caller can treat it as "this alternative did not
//!   match" and try another.
//! - [`Scanner::with_end_pos`]: no restore semantics at all, just pairs a
//!   body's result with the position reached afterwards.
//!
//! [`restore`]: Checkpoint::restore

use crate::pos::Pos;
use crate::scanner::Scanner;

/// Whether a checkpoint has already been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CheckpointState {
    /// Not yet restored; `restore` will rewind the scanner.
    Fresh,
    /// Already restored once; further `restore` calls are no-ops.
    Spent,
}

/// A single-use snapshot of a scanner's position.
///
/// Created by [`Scanner::checkpoint`]. Deliberately neither `Clone` nor
/// `Copy`: duplicating a handle would defeat the single-use guard.
#[derive(Debug)]
pub struct Checkpoint {
    saved: Pos,
    state: CheckpointState,
}

impl Checkpoint {
    /// The captured position.
    #[inline]
    pub fn pos(&self) -> Pos {
        self.saved
    }

    /// Returns `true` once [`restore`](Self::restore) has been applied.
    #[inline]
    pub fn is_spent(&self) -> bool {
        self.state == CheckpointState::Spent
    }

    /// Rewind `scanner` to the captured position.
    ///
    /// Single-use: the first call restores, every subsequent call on the
    /// same handle is a no-op. `scanner` must be the scanner this
    /// checkpoint was taken from.
    pub fn restore(&mut self, scanner: &mut Scanner<'_>) {
        if self.state == CheckpointState::Fresh {
            scanner.set_pos(self.saved);
            self.state = CheckpointState::Spent;
        }
    }
}

impl<'src> Scanner<'src> {
    /// Snapshot the current position.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            saved: self.pos(),
            state: CheckpointState::Fresh,
        }
    }

    /// Run `body`, then unconditionally restore the starting position.
    ///
    /// The body's result — success or failure — passes through untouched;
    /// only the position is rolled back. Use for pure lookahead.
    pub fn lookahead<T, E>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut checkpoint = self.checkpoint();
        let outcome = body(self);
        checkpoint.restore(self);
        outcome
    }

    /// Run `body`; restore the starting position only on failure.
    ///
    /// On success the position stays wherever the body left it (the parse
    /// is committed). On failure the position is rewound and the error
    /// propagates.
    pub fn attempt<T, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let mut checkpoint = self.checkpoint();
        match body(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                checkpoint.restore(self);
                Err(error)
            }
        }
    }

    /// Run `body` and pair its result with the position reached afterwards.
    ///
    /// No restore semantics of its own; on failure the error propagates
    /// with the position wherever the body left it.
    pub fn with_end_pos<T, E>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<(T, Pos), E> {
        let value = body(self)?;
        Ok((value, self.pos()))
    }
}

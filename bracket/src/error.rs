//! Errors raised by bracket generation and play.
//!
//! None of these leave a tournament half-mutated: every operation validates
//! before it writes.

use crate::Side;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BracketError {
    /// Both sides of a first-round pairing are byes.
    #[error("first-round match {} has no participants", .slot + 1)]
    EmptyPairing { slot: usize },

    /// Placement length is not a power of two of at least 2.
    #[error("placement of {len} slots cannot form a bracket")]
    InvalidPlacement { len: usize },

    #[error("match {} of round {} is already decided", .slot + 1, .round + 1)]
    AlreadyDecided { round: usize, slot: usize },

    #[error("match {} of round {} has no participant as {side}", .slot + 1, .round + 1)]
    EmptySlot { round: usize, slot: usize, side: Side },

    #[error("tournament already has a champion")]
    AlreadyComplete,

    #[error("unsupported participant count: {count}")]
    InvalidParticipantCount { count: usize },

    #[error("no match {} in round {}", .slot + 1, .round + 1)]
    MatchNotFound { round: usize, slot: usize },

    #[error("name must not be empty")]
    InvalidName,

    #[error("unknown seeding mode: {0}")]
    UnknownSeedingMode(String),
}

pub type BracketResult<T> = Result<T, BracketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_one_based_positions() {
        let err = BracketError::AlreadyDecided { round: 0, slot: 2 };
        assert_eq!(err.to_string(), "match 3 of round 1 is already decided");

        let err = BracketError::EmptySlot {
            round: 1,
            slot: 0,
            side: Side::Player2,
        };
        assert_eq!(err.to_string(), "match 1 of round 2 has no participant as player2");
    }
}

//! Dice Duel Core Library
//!
//! This crate provides the provably-fair randomness engine for the
//! non-transitive dice game: unbiased secure-random sampling, the
//! HMAC-based commit-reveal protocol, pairwise win-probability analysis,
//! and the round engine that ties them together.
//!
//! The crate is pure and synchronous: no storage, no HTTP, no logging.
//! Entropy is the only side effect, and it enters through the injectable
//! [`crypto::EntropySource`] capability.

pub mod crypto;
pub mod dice;
pub mod error;
pub mod probability;
pub mod round;

pub use crypto::{
    combine, generate_key, uniform_in_range, verify_and_combine, CommitKey, Commitment, Digest,
    EntropySource, OsEntropy, ScriptedEntropy,
};
pub use dice::{parse_dice_set, Die, DiceSet};
pub use error::{Error, ValidationError};
pub use probability::{compute_matrix, Matchup, ProbabilityMatrix, ProbabilityTable};
pub use round::{
    choose_computer_die, resolve_round, CommitmentRecord, FirstPlayer, FirstPlayerCommit,
    FirstPlayerOutcome, RollPending, Round, RoundAudit, RoundOutcome, Winner,
};

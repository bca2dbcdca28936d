//! Round orchestration: dice selection, the two roll-generation exchanges,
//! and winner determination.
//!
//! A round moves through `AwaitingDiceSelection -> AwaitingPlayerNumber ->
//! Resolved`; the phases are encoded as types ([`Round`], [`RollPending`],
//! [`RoundOutcome`]) so out-of-order operations do not compile.
//!
//! Both roll exchanges consume the player's number as the counterparty
//! contribution. The original design fed a constant `0` into the
//! computer-attributed exchange, which left that commitment with nothing to
//! protect against; binding the computer's digest before the player's number
//! is known makes both exchanges carry an unpredictable outside input.

use crate::crypto::{combine, uniform_in_range, CommitKey, Commitment, Digest, EntropySource};
use crate::dice::{Die, DiceSet};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Modulus of the first-player coin exchange.
pub const FIRST_PLAYER_MODULUS: u64 = 2;

/// Modulus of a roll-generation exchange, one residue per face.
pub const ROLL_MODULUS: u64 = Die::FACE_COUNT as u64;

/// Which side won a round. Ties are a valid terminal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Player,
    Computer,
    Tie,
}

/// Who moves first, settled by the commit-reveal coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    Player,
    Computer,
}

/// Commit half of the first-player exchange. Only the digest may leave this
/// struct before the counterparty's number arrives.
pub struct FirstPlayerCommit {
    commitment: Commitment,
}

impl FirstPlayerCommit {
    /// Commit to a secret coin in `{0, 1}` under a fresh key.
    pub fn begin(entropy: &mut dyn EntropySource) -> Result<Self, Error> {
        let secret = uniform_in_range(entropy, 0, FIRST_PLAYER_MODULUS - 1)?;
        let commitment = Commitment::bind(secret, entropy)?;
        Ok(Self { commitment })
    }

    /// The disclosable half of the exchange.
    pub fn digest(&self) -> Digest {
        self.commitment.digest()
    }

    /// Fold in the counterparty's number and reveal. Consumes the commit so
    /// it is single use.
    pub fn settle(self, player_number: u64) -> FirstPlayerOutcome {
        let digest = self.commitment.digest();
        let (computer_number, key) = self.commitment.reveal();
        let first = if combine(player_number, computer_number, FIRST_PLAYER_MODULUS) == 0 {
            FirstPlayer::Player
        } else {
            FirstPlayer::Computer
        };
        FirstPlayerOutcome {
            first,
            player_number,
            computer_number,
            key,
            digest,
        }
    }
}

/// Fully revealed first-player exchange, suitable for external
/// re-verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FirstPlayerOutcome {
    pub first: FirstPlayer,
    pub player_number: u64,
    pub computer_number: u64,
    pub key: CommitKey,
    pub digest: Digest,
}

impl FirstPlayerOutcome {
    /// Re-check the revealed secret and key against the digest.
    pub fn verify(&self) -> bool {
        self.digest.verify(self.computer_number, &self.key)
    }
}

/// Revealed commitment material for one roll-generation exchange.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitmentRecord {
    pub digest: Digest,
    pub key: CommitKey,
    pub secret_value: u64,
    pub counterparty_value: u64,
    /// `(counterparty_value + secret_value) mod 6`.
    pub face_index: u64,
}

impl CommitmentRecord {
    /// Independent re-verification: the digest must match the revealed
    /// secret/key and the face index must be the combined residue.
    pub fn verify(&self) -> bool {
        self.digest.verify(self.secret_value, &self.key)
            && combine(self.counterparty_value, self.secret_value, ROLL_MODULUS)
                == self.face_index
    }
}

/// Full commitment audit trail for a resolved round. Both digests were
/// computed before either secret or key was disclosed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundAudit {
    pub player_number: u64,
    pub player_roll: CommitmentRecord,
    pub computer_roll: CommitmentRecord,
}

impl RoundAudit {
    pub fn verify(&self) -> bool {
        self.player_roll.verify() && self.computer_roll.verify()
    }
}

/// One resolved round. Immutable once produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub player_die: Die,
    pub computer_die: Die,
    pub player_roll: i32,
    pub computer_roll: i32,
    pub winner: Winner,
    pub audit: RoundAudit,
}

/// A round awaiting the player's die selection.
pub struct Round {
    dice: DiceSet,
}

impl Round {
    pub fn new(dice: DiceSet) -> Self {
        Self { dice }
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    /// Record the player's pick and draw the opponent's die uniformly from
    /// the remaining indices. Die choice is not fairness-sensitive, so this
    /// is a plain uniform draw rather than a commit-reveal exchange.
    pub fn select_dice(
        self,
        player_die_index: usize,
        entropy: &mut dyn EntropySource,
    ) -> Result<RollPending, Error> {
        let computer_die_index = choose_computer_die(&self.dice, player_die_index, entropy)?;
        Ok(RollPending {
            dice: self.dice,
            player_die_index,
            computer_die_index,
        })
    }
}

/// A round with both dice fixed, awaiting the player's number.
pub struct RollPending {
    dice: DiceSet,
    player_die_index: usize,
    computer_die_index: usize,
}

impl RollPending {
    pub fn player_die_index(&self) -> usize {
        self.player_die_index
    }

    pub fn computer_die_index(&self) -> usize {
        self.computer_die_index
    }

    /// Run both roll exchanges and determine the winner.
    pub fn resolve(
        self,
        player_number: u64,
        entropy: &mut dyn EntropySource,
    ) -> Result<RoundOutcome, Error> {
        resolve_round(
            &self.dice,
            self.player_die_index,
            self.computer_die_index,
            player_number,
            entropy,
        )
    }
}

/// Uniform opponent die pick over the indices left after the player's.
pub fn choose_computer_die(
    dice: &DiceSet,
    player_die_index: usize,
    entropy: &mut dyn EntropySource,
) -> Result<usize, Error> {
    dice.get(player_die_index)?;

    let pick = uniform_in_range(entropy, 0, dice.len() as u64 - 2)? as usize;
    if pick < player_die_index {
        Ok(pick)
    } else {
        Ok(pick + 1)
    }
}

/// Resolve one full round: two independent commit-reveal roll exchanges,
/// face lookup, winner by strict comparison.
///
/// Per exchange the engine draws the secret, then binds it under a fresh
/// 256-bit key; the player's number is the counterparty contribution to
/// both. Deterministic given the entropy source and both contributions.
pub fn resolve_round(
    dice: &DiceSet,
    player_die_index: usize,
    computer_die_index: usize,
    player_number: u64,
    entropy: &mut dyn EntropySource,
) -> Result<RoundOutcome, Error> {
    let player_die = dice.get(player_die_index)?.clone();
    let computer_die = dice.get(computer_die_index)?.clone();

    let player_roll = roll_exchange(player_number, entropy)?;
    let computer_roll = roll_exchange(player_number, entropy)?;

    let player_face = player_die.face(player_roll.face_index);
    let computer_face = computer_die.face(computer_roll.face_index);

    let winner = if player_face > computer_face {
        Winner::Player
    } else if computer_face > player_face {
        Winner::Computer
    } else {
        Winner::Tie
    };

    Ok(RoundOutcome {
        player_die,
        computer_die,
        player_roll: player_face,
        computer_roll: computer_face,
        winner,
        audit: RoundAudit {
            player_number,
            player_roll,
            computer_roll,
        },
    })
}

/// One roll-generation exchange, fully revealed.
fn roll_exchange(
    counterparty_value: u64,
    entropy: &mut dyn EntropySource,
) -> Result<CommitmentRecord, Error> {
    let secret = uniform_in_range(entropy, 0, ROLL_MODULUS - 1)?;
    let commitment = Commitment::bind(secret, entropy)?;
    let digest = commitment.digest();
    let (secret_value, key) = commitment.reveal();
    let face_index = combine(counterparty_value, secret_value, ROLL_MODULUS);

    Ok(CommitmentRecord {
        digest,
        key,
        secret_value,
        counterparty_value,
        face_index,
    })
}

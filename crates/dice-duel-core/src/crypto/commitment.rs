//! HMAC-based commit-reveal scheme.
//!
//! The committer binds itself to a secret value by publishing
//! `HMAC_SHA256(key, decimal_string(value))` before the counterparty picks
//! its own number. Neither side can steer the combined result: the committer
//! is locked in by the digest, the counterparty picks blind to the secret.

use crate::crypto::entropy::{generate_key, EntropySource};
use crate::error::Error;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

type HmacSha256 = Hmac<Sha256>;

/// 256-bit HMAC key for a single commitment. Withheld from the counterparty
/// until reveal, then discarded; never reused across rounds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitKey(#[serde(with = "hex_serde")] [u8; 32]);

impl CommitKey {
    /// Draw a fresh key from the entropy source.
    pub fn random(entropy: &mut dyn EntropySource) -> Result<Self, Error> {
        Ok(Self(generate_key(entropy)?))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for CommitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitKey({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for CommitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for CommitKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// HMAC-SHA256 digest over the decimal string of a committed value.
/// Safe to disclose the moment it is computed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex_serde")] [u8; 32]);

impl Digest {
    /// Compute `HMAC_SHA256(key, decimal_string(value))`.
    pub fn compute(key: &CommitKey, value: u64) -> Self {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(value.to_string().as_bytes());
        Self(mac.finalize().into_bytes().into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Recompute the HMAC from a claimed value and key and compare in
    /// constant time. Never raises; a mismatch only reports `false` and the
    /// caller must treat it as a fairness violation.
    pub fn verify(&self, claimed_value: u64, claimed_key: &CommitKey) -> bool {
        let mut mac = HmacSha256::new_from_slice(claimed_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(claimed_value.to_string().as_bytes());
        mac.verify_slice(&self.0).is_ok()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// A single-use commitment: the digest is public immediately, the secret
/// value and key stay private until [`Commitment::reveal`] consumes it.
pub struct Commitment {
    value: u64,
    key: CommitKey,
    digest: Digest,
}

impl Commitment {
    /// Bind to `value` under a fresh key.
    pub fn bind(value: u64, entropy: &mut dyn EntropySource) -> Result<Self, Error> {
        let key = CommitKey::random(entropy)?;
        let digest = Digest::compute(&key, value);
        Ok(Self { value, key, digest })
    }

    /// The disclosable half of the exchange.
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Disclose the withheld material, consuming the commitment so it
    /// cannot be reused.
    pub fn reveal(self) -> (u64, CommitKey) {
        (self.value, self.key)
    }
}

impl fmt::Debug for Commitment {
    // The withheld value and key stay out of Debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({:?})", self.digest)
    }
}

/// The fairness primitive: `(counterparty + committed) mod modulus`.
/// Final only once both contributions are fixed.
pub fn combine(counterparty_value: u64, committed_value: u64, modulus: u64) -> u64 {
    (counterparty_value % modulus + committed_value % modulus) % modulus
}

/// Verifier-side reveal handling: recheck the digest, then combine.
/// `VerificationFailed` aborts the exchange as compromised.
pub fn verify_and_combine(
    digest: &Digest,
    counterparty_value: u64,
    revealed_value: u64,
    revealed_key: &CommitKey,
    modulus: u64,
) -> Result<u64, Error> {
    if !digest.verify(revealed_value, revealed_key) {
        return Err(Error::VerificationFailed);
    }
    Ok(combine(counterparty_value, revealed_value, modulus))
}

mod hex_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&hex_str, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::ScriptedEntropy;

    fn fixed_key() -> CommitKey {
        CommitKey::from_bytes([0x42; 32])
    }

    #[test]
    fn test_digest_is_deterministic_for_fixed_key_and_value() {
        assert_eq!(
            Digest::compute(&fixed_key(), 1),
            Digest::compute(&fixed_key(), 1)
        );
    }

    #[test]
    fn test_changing_value_changes_digest() {
        assert_ne!(
            Digest::compute(&fixed_key(), 1),
            Digest::compute(&fixed_key(), 0)
        );
    }

    #[test]
    fn test_changing_key_changes_digest() {
        let other = CommitKey::from_bytes([0x43; 32]);
        assert_ne!(Digest::compute(&fixed_key(), 1), Digest::compute(&other, 1));
    }

    #[test]
    fn test_verify_accepts_honest_reveal() {
        let digest = Digest::compute(&fixed_key(), 3);
        assert!(digest.verify(3, &fixed_key()));
    }

    #[test]
    fn test_verify_rejects_single_bit_key_mutation() {
        let digest = Digest::compute(&fixed_key(), 3);
        for byte in 0..32 {
            for bit in 0..8 {
                let mut mutated = *fixed_key().as_bytes();
                mutated[byte] ^= 1 << bit;
                assert!(
                    !digest.verify(3, &CommitKey::from_bytes(mutated)),
                    "bit {} of key byte {} went undetected",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn test_verify_rejects_value_mutation() {
        let digest = Digest::compute(&fixed_key(), 3);
        assert!(!digest.verify(2, &fixed_key()));
        assert!(!digest.verify(3 ^ 1, &fixed_key()));
    }

    #[test]
    fn test_verify_rejects_single_bit_digest_mutation() {
        let digest = Digest::compute(&fixed_key(), 3);
        for byte in 0..32 {
            for bit in 0..8 {
                let mut mutated = *digest.as_bytes();
                mutated[byte] ^= 1 << bit;
                assert!(
                    !Digest::from_bytes(mutated).verify(3, &fixed_key()),
                    "bit {} of digest byte {} went undetected",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn test_commitment_binds_before_reveal() {
        let mut entropy = ScriptedEntropy::new([0x11; 32]);
        let commitment = Commitment::bind(4, &mut entropy).unwrap();
        let digest = commitment.digest();

        let (value, key) = commitment.reveal();
        assert_eq!(value, 4);
        assert!(digest.verify(value, &key));
    }

    #[test]
    fn test_combine_wraps_modulus() {
        assert_eq!(combine(3, 5, 6), 2);
        assert_eq!(combine(0, 0, 6), 0);
        assert_eq!(combine(1, 1, 2), 0);
        assert_eq!(combine(0, 1, 2), 1);
    }

    #[test]
    fn test_verify_and_combine_honest_path() {
        let key = fixed_key();
        let digest = Digest::compute(&key, 5);
        assert_eq!(verify_and_combine(&digest, 4, 5, &key, 6).unwrap(), 3);
    }

    #[test]
    fn test_verify_and_combine_rejects_tampered_reveal() {
        let key = fixed_key();
        let digest = Digest::compute(&key, 5);
        let err = verify_and_combine(&digest, 4, 2, &key, 6).unwrap_err();
        assert!(matches!(err, Error::VerificationFailed));
    }

    #[test]
    fn test_key_and_digest_hex_round_trip() {
        let key = fixed_key();
        let parsed: CommitKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);

        let digest = Digest::compute(&key, 9);
        let parsed: Digest = digest.to_string().parse().unwrap();
        assert_eq!(parsed, digest);
    }
}

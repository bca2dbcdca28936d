//! Cryptographic primitives for the fairness protocol.
//!
//! This module provides:
//! - EntropySource and the unbiased uniform sampler
//! - CommitKey, Digest and Commitment for the HMAC commit-reveal scheme

mod commitment;
mod entropy;

pub use commitment::{combine, verify_and_combine, CommitKey, Commitment, Digest};
pub use entropy::{generate_key, uniform_in_range, EntropySource, OsEntropy, ScriptedEntropy};

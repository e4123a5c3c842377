// src/crypto/mod.rs

pub mod signatures;

pub use signatures::{SignerRecovery, VoteDomain};

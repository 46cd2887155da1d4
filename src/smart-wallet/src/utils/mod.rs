//! Shared helpers: input parsing at the string boundary and the secp256k1/keccak primitives.
//!
//! Everything in here is pure and deterministic.

pub mod crypto;
pub mod parse;

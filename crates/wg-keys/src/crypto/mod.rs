//! Cryptographic primitives for wg-keys.
//!
//! This module provides:
//! - Cryptographically secure random number generation
//! - Curve25519 scalar clamping and X25519 public key derivation
//! - Private key, preshared key, and key pair generation

pub mod keys;
pub mod random;

pub use keys::{
    clamp, derive_public, generate_private_scalar, generate_private_scalar_from,
    generate_random_key, generate_random_key_from, is_clamped, KeyPair,
};

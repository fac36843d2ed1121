//! Curve25519 key generation and public key derivation.
//!
//! Private keys are random scalars clamped the way X25519 expects.
//! Preshared keys are plain random bytes and are never clamped.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::random::fill_random_from;
use crate::error::Result;
use crate::key::{Key, KEY_LEN};

/// Apply Curve25519 scalar clamping in place.
///
/// Clears the low 3 bits of byte 0, clears the top bit of byte 31 and sets
/// its second-highest bit.
pub fn clamp(bytes: &mut [u8; KEY_LEN]) {
    bytes[0] &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
}

/// Whether `bytes` already satisfy [`clamp`].
pub fn is_clamped(bytes: &[u8; KEY_LEN]) -> bool {
    bytes[0] & 7 == 0 && bytes[31] & 128 == 0 && bytes[31] & 64 == 64
}

/// Generate a random 32-byte preshared key from the OS random source.
pub fn generate_random_key() -> Result<Key> {
    generate_random_key_from(&mut OsRng)
}

/// Generate a random 32-byte preshared key from `rng`.
pub fn generate_random_key_from<R>(rng: &mut R) -> Result<Key>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    fill_random_from(rng, &mut bytes[..])?;
    Ok(Key::from(*bytes))
}

/// Generate a clamped private scalar from the OS random source.
pub fn generate_private_scalar() -> Result<Key> {
    generate_private_scalar_from(&mut OsRng)
}

/// Generate a clamped private scalar from `rng`.
pub fn generate_private_scalar_from<R>(rng: &mut R) -> Result<Key>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    fill_random_from(rng, &mut bytes[..])?;
    clamp(&mut bytes);
    Ok(Key::from(*bytes))
}

/// Derive the public key for `private` by fixed-base scalar multiplication.
///
/// Any 32-byte input is accepted. The X25519 function clamps the scalar
/// itself, so unclamped input yields the same point as its clamped form.
pub fn derive_public(private: &Key) -> Key {
    let secret = StaticSecret::from(private.to_bytes());
    Key::from(X25519PublicKey::from(&secret).to_bytes())
}

/// A private key and the public key derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: Key,
    public: Key,
}

impl KeyPair {
    /// Generate a fresh key pair.
    pub fn generate() -> Result<Self> {
        Ok(Self::from_private(generate_private_scalar()?))
    }

    /// Generate a fresh key pair using `rng` as the entropy source.
    pub fn generate_from<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        Ok(Self::from_private(generate_private_scalar_from(rng)?))
    }

    /// Build a pair around an existing private key.
    pub fn from_private(private: Key) -> Self {
        let public = derive_public(&private);
        Self { private, public }
    }

    pub fn private_key(&self) -> &Key {
        &self.private
    }

    pub fn public_key(&self) -> &Key {
        &self.public
    }
}

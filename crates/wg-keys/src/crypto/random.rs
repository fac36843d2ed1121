//! Secure random number generation.
//!
//! Uses the operating system's cryptographic random source via `rand`.
//! A failing source is reported as [`KeyError::EntropyFailure`]; there is
//! no fallback to a weaker generator.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::{KeyError, Result};

/// Fill a buffer from the OS random source.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    fill_random_from(&mut OsRng, buf)
}

/// Fill a buffer from a caller-supplied cryptographic RNG.
pub fn fill_random_from<R>(rng: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    rng.try_fill_bytes(buf)
        .map_err(|e| KeyError::EntropyFailure(e.to_string()))
}

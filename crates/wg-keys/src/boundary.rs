//! Host-facing operations.
//!
//! Hosts (WebAssembly, C, the CLI) call these two functions and branch on
//! plain values. A bad private key string is answered with
//! [`KeyPairResponse::Failure`], never with an `Err`; the only `Err` that
//! crosses this boundary is [`KeyError::EntropyFailure`], which aborts the
//! call.
//!
//! [`KeyError::EntropyFailure`]: crate::error::KeyError::EntropyFailure

use log::{debug, trace};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::crypto::{derive_public, generate_random_key_from, KeyPair};
use crate::error::Result;
use crate::key::Key;

/// Result of [`generate_key_pair`].
///
/// Serializes as `{"private": ..., "public": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyPairResponse {
    Pair { private: String, public: String },
    Failure { error: String },
}

impl KeyPairResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn private_key(&self) -> Option<&str> {
        match self {
            Self::Pair { private, .. } => Some(private),
            Self::Failure { .. } => None,
        }
    }

    pub fn public_key(&self) -> Option<&str> {
        match self {
            Self::Pair { public, .. } => Some(public),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Pair { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Split into `(private, public)` or the failure message.
    pub fn into_result(self) -> std::result::Result<(String, String), String> {
        match self {
            Self::Pair { private, public } => Ok((private, public)),
            Self::Failure { error } => Err(error),
        }
    }

    /// Render the wire JSON shape.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Generate a key pair, or derive the public half of `existing_private`.
///
/// With `Some(text)` the private key text is echoed back byte-for-byte;
/// it is not re-encoded.
pub fn generate_key_pair(existing_private: Option<&str>) -> Result<KeyPairResponse> {
    generate_key_pair_from(&mut OsRng, existing_private)
}

/// [`generate_key_pair`] with a caller-supplied entropy source.
pub fn generate_key_pair_from<R>(
    rng: &mut R,
    existing_private: Option<&str>,
) -> Result<KeyPairResponse>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let Some(text) = existing_private else {
        let pair = KeyPair::generate_from(rng)?;
        trace!("generated new key pair");
        return Ok(KeyPairResponse::Pair {
            private: pair.private_key().to_base64(),
            public: pair.public_key().to_base64(),
        });
    };

    let response = match Key::from_base64(text) {
        Ok(private) => {
            trace!("derived public key from supplied private key");
            KeyPairResponse::Pair {
                private: text.to_owned(),
                public: derive_public(&private).to_base64(),
            }
        }
        Err(e) => {
            debug!("rejected supplied private key: {e}");
            KeyPairResponse::Failure {
                error: e.to_string(),
            }
        }
    };
    Ok(response)
}

/// Generate a preshared key as base64 text.
pub fn generate_pre_key() -> Result<String> {
    generate_pre_key_from(&mut OsRng)
}

/// [`generate_pre_key`] with a caller-supplied entropy source.
pub fn generate_pre_key_from<R>(rng: &mut R) -> Result<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let key = generate_random_key_from(rng)?;
    trace!("generated preshared key");
    Ok(key.to_base64())
}

//! The 32-byte key value and its base64 text form.
//!
//! A [`Key`] carries no role: the same type holds private scalars, public
//! points, and preshared keys. Text is standard-alphabet base64 with `=`
//! padding, always 44 characters for a valid key.

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{KeyError, Result};

/// Size of a raw key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of a key's base64 text, padding included.
pub const ENCODED_KEY_LEN: usize = 44;

/// Standard alphabet, canonical padding required. Unused bits in the last
/// symbol are ignored, as WireGuard's own tools ignore them.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// An opaque 32-byte key.
///
/// The bytes are wiped on drop. `Debug` never prints them; use
/// [`Key::to_base64`] or `Display` when the text form is wanted.
///
/// `==` is an ordinary byte comparison and is not constant-time. Do not use
/// it to check a secret against attacker-supplied input.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Decode a key from standard padded base64.
    ///
    /// Line breaks are skipped and non-zero trailing bits in the final
    /// symbol are tolerated. The decoded length must be exactly
    /// [`KEY_LEN`]; anything else is [`KeyError::InvalidLength`].
    pub fn from_base64(text: &str) -> Result<Self> {
        let decoded = if text.contains(|c: char| c == '\r' || c == '\n') {
            let compact: Zeroizing<String> =
                Zeroizing::new(text.chars().filter(|&c| c != '\r' && c != '\n').collect());
            KEY_ENGINE.decode(compact.as_bytes())
        } else {
            KEY_ENGINE.decode(text.as_bytes())
        }
        .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;

        let decoded = Zeroizing::new(decoded);
        Self::try_from(decoded.as_slice())
    }

    /// Encode as standard padded base64.
    pub fn to_base64(&self) -> String {
        KEY_ENGINE.encode(self.0)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Copy out the raw bytes. Caller must zeroize secret copies.
    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        self.0
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = KeyError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base64(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

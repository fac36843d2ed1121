//! Error types for wg-keys.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

/// Key error types covering codec, generation, and config operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("failed to parse base64-encoded key: {0}")]
    InvalidEncoding(String),

    #[error("incorrect key size: {0}")]
    InvalidLength(usize),

    #[error("secure random source failed: {0}")]
    EntropyFailure(String),

    #[error("invalid config at line {line}: {reason}")]
    InvalidConfig { line: usize, reason: String },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl KeyError {
    /// True for errors produced while decoding key text or bytes.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::InvalidEncoding(_) | Self::InvalidLength(_))
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, KeyError>;

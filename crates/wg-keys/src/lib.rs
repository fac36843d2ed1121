//! wg-keys — WireGuard-compatible Curve25519 keys.
//!
//! Generates clamped private keys, derives their public keys, generates
//! preshared keys, and parses base64 key text, all in the encoding used by
//! WireGuard tooling. The [`boundary`] module is what host bindings call;
//! [`conf`] handles wg-quick files built from those keys.
//!
//! Every operation is a stateless function of its input (or of the OS
//! random source) and is safe to call from any number of threads.

pub mod boundary;
pub mod conf;
pub mod crypto;
pub mod error;
pub mod key;

// Re-export primary types
pub use boundary::{generate_key_pair, generate_pre_key, KeyPairResponse};
pub use conf::{generate_mesh, InterfaceSection, MeshOptions, PeerSection, WireGuardConfig};
pub use crypto::{derive_public, generate_private_scalar, generate_random_key, KeyPair};
pub use error::{KeyError, Result};
pub use key::{Key, ENCODED_KEY_LEN, KEY_LEN};

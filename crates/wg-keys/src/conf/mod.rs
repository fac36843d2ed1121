//! wg-quick configuration documents.
//!
//! The [`WireGuardConfig`] model, rendering to text, and parsing back, plus
//! [`generate_mesh`] for building a set of configs that point at each other.
//! Nothing here touches the filesystem; hosts read and write the text.

pub mod ip;
pub mod mesh;
pub mod parse;
pub mod render;
pub mod types;

pub use mesh::{generate_mesh, generate_mesh_from, MeshOptions, DEFAULT_LISTEN_PORT};
pub use parse::parse;
pub use render::render;
pub use types::{InterfaceSection, PeerSection, WireGuardConfig};

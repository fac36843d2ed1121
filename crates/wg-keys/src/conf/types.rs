//! wg-quick configuration document types.

use serde::{Deserialize, Serialize};

use crate::crypto::{derive_public, generate_private_scalar};
use crate::error::{KeyError, Result};
use crate::key::Key;

/// The `[Interface]` section.
///
/// `Address`, `DNS`, `MTU`, `Table`, `SaveConfig` and the hook commands are
/// wg-quick extensions; the rest is understood by `wg` itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSection {
    pub private_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listen_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fw_mark: Option<String>,
    /// IP or CIDR list, e.g. `10.0.0.1/24, fd00::1/64`.
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_down: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_down: Option<String>,
}

impl InterfaceSection {
    pub fn new(private_key: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_listen_port(mut self, port: u16) -> Self {
        self.listen_port = Some(port);
        self
    }

    pub fn with_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns = Some(dns.into());
        self
    }

    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = Some(mtu);
        self
    }
}

/// A `[Peer]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSection {
    pub public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preshared_key: Option<String>,
    #[serde(rename = "allowedIPs")]
    pub allowed_ips: String,
    /// Seconds, 1..=65535.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_keepalive: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Client-id bytes used by some WireGuard forks, e.g. `1, 2, 3`.
    /// Written as a `# reserved = ...` comment so stock tools ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<String>,
}

impl PeerSection {
    pub fn new(public_key: impl Into<String>, allowed_ips: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            allowed_ips: allowed_ips.into(),
            ..Self::default()
        }
    }

    pub fn with_preshared_key(mut self, key: impl Into<String>) -> Self {
        self.preshared_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_persistent_keepalive(mut self, seconds: u16) -> Self {
        self.persistent_keepalive = Some(seconds);
        self
    }

    pub fn with_reserved(mut self, reserved: impl Into<String>) -> Self {
        self.reserved = Some(reserved.into());
        self
    }
}

/// A full wg-quick document: one interface and its peers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuardConfig {
    #[serde(flatten)]
    pub interface: InterfaceSection,
    #[serde(default)]
    pub peers: Vec<PeerSection>,
}

impl WireGuardConfig {
    pub fn new(interface: InterfaceSection) -> Self {
        Self {
            interface,
            peers: Vec::new(),
        }
    }

    /// Start a config around a freshly generated private key.
    pub fn with_generated_key(address: impl Into<String>) -> Result<Self> {
        let private = generate_private_scalar()?;
        Ok(Self::new(InterfaceSection::new(private.to_base64(), address)))
    }

    pub fn with_peer(mut self, peer: PeerSection) -> Self {
        self.peers.push(peer);
        self
    }

    /// Public key matching the interface's `PrivateKey`.
    pub fn interface_public_key(&self) -> Result<Key> {
        let private = decode_field("PrivateKey", &self.interface.private_key)?;
        Ok(derive_public(&private))
    }

    /// Check the keys and numeric ranges; returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        decode_field("PrivateKey", &self.interface.private_key)?;
        if self.interface.address.trim().is_empty() {
            return Err(KeyError::InvalidField {
                field: "Address".into(),
                reason: "must not be empty".into(),
            });
        }

        for (i, peer) in self.peers.iter().enumerate() {
            let n = i + 1;
            decode_field(&format!("PublicKey of peer {n}"), &peer.public_key)?;
            if let Some(psk) = &peer.preshared_key {
                decode_field(&format!("PresharedKey of peer {n}"), psk)?;
            }
            if peer.persistent_keepalive == Some(0) {
                return Err(KeyError::InvalidField {
                    field: format!("PersistentKeepalive of peer {n}"),
                    reason: "must be between 1 and 65535".into(),
                });
            }
        }
        Ok(())
    }
}

fn decode_field(field: &str, text: &str) -> Result<Key> {
    Key::from_base64(text).map_err(|e| KeyError::InvalidField {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

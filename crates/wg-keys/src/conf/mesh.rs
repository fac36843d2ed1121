//! Batch generation of configs that reference each other.
//!
//! [`generate_mesh`] gives every node a fresh key pair and the base address
//! list stepped by its index. Nodes with an endpoint are reachable: they
//! listen on the endpoint's port and peer with every other node, routing
//! only that node's host addresses. Nodes without one peer only with the
//! reachable nodes, routing [`MeshOptions::allowed_ips`] through them.

use log::debug;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::conf::ip::{check_list, host_routes, increment_addresses};
use crate::conf::types::{InterfaceSection, PeerSection, WireGuardConfig};
use crate::crypto::KeyPair;
use crate::error::{KeyError, Result};

/// Port appended to endpoints given without one.
pub const DEFAULT_LISTEN_PORT: u16 = 51820;

/// Settings shared by every node of a generated mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeshOptions {
    /// Number of configs to generate, at least 1.
    pub quantity: usize,
    /// Address list of node 0; node `i` gets each entry plus `i`.
    pub address: String,
    /// `host[:port]` per node, by index. Empty or missing entries mark nodes
    /// that are not reachable.
    pub endpoints: Vec<String>,
    /// Port for endpoints written without one.
    pub listen_port: u16,
    /// Routed through reachable nodes by the nodes that are not.
    #[serde(rename = "allowedIPs")]
    pub allowed_ips: String,
    /// Set on every peer entry pointing at a reachable node from a node
    /// that is not. Zero disables it.
    pub persistent_keepalive: Option<u16>,
    pub reserved: Option<String>,
    pub dns: Option<String>,
    pub mtu: Option<u32>,
    // Applied to reachable nodes only.
    pub fw_mark: Option<String>,
    pub table: Option<String>,
    pub save_config: Option<String>,
    pub pre_up: Option<String>,
    pub post_up: Option<String>,
    pub pre_down: Option<String>,
    pub post_down: Option<String>,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            quantity: 2,
            address: "10.0.0.1/24".into(),
            endpoints: Vec::new(),
            listen_port: DEFAULT_LISTEN_PORT,
            allowed_ips: "0.0.0.0/0, ::/0".into(),
            persistent_keepalive: Some(25),
            reserved: None,
            dns: None,
            mtu: None,
            fw_mark: None,
            table: None,
            save_config: None,
            pre_up: None,
            post_up: None,
            pre_down: None,
            post_down: None,
        }
    }
}

impl MeshOptions {
    pub fn new(quantity: usize, address: impl Into<String>) -> Self {
        Self {
            quantity,
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allowed_ips(mut self, allowed_ips: impl Into<String>) -> Self {
        self.allowed_ips = allowed_ips.into();
        self
    }

    pub fn with_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns = Some(dns.into());
        self
    }

    /// Check every field and resolve the endpoints of the first
    /// `quantity` nodes.
    fn resolve(&self) -> Result<Vec<Option<Endpoint>>> {
        if self.quantity == 0 {
            return Err(invalid("quantity", "must be at least 1"));
        }
        check_list("Address", &self.address, false)?;
        check_list("AllowedIPs", &self.allowed_ips, true)?;
        if let Some(dns) = self.dns.as_deref().filter(|d| !d.trim().is_empty()) {
            check_list("DNS", dns, false)?;
        }
        if let Some(save) = self.save_config.as_deref().filter(|s| !s.is_empty()) {
            if save != "true" && save != "false" {
                return Err(invalid("SaveConfig", "must be true or false"));
            }
        }
        if self.listen_port == 0 {
            return Err(invalid("ListenPort", "must be between 1 and 65535"));
        }

        let endpoints = (0..self.quantity)
            .map(|i| match self.endpoints.get(i).map(|e| e.trim()) {
                Some(text) if !text.is_empty() => {
                    Endpoint::parse(text, self.listen_port).map(Some)
                }
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;

        if endpoints.iter().all(Option::is_none) {
            return Err(invalid("Endpoint", "at least one node needs an endpoint"));
        }
        if self.endpoints.len() > self.quantity {
            debug!(
                "ignoring {} endpoint(s) beyond node {}",
                self.endpoints.len() - self.quantity,
                self.quantity - 1
            );
        }
        Ok(endpoints)
    }
}

/// A reachable node's `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    text: String,
    port: u16,
}

impl Endpoint {
    /// Accepts `host`, `host:port`, a bare IPv6 address, or `[v6]:port`.
    fn parse(text: &str, default_port: u16) -> Result<Self> {
        let (host, port) = if let Some(rest) = text.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("Endpoint", format!("{text}: unclosed bracket")))?;
            match after.strip_prefix(':') {
                Some(port) => (format!("[{host}]"), Some(port)),
                None if after.is_empty() => (format!("[{host}]"), None),
                None => return Err(invalid("Endpoint", format!("{text}: unexpected {after}"))),
            }
        } else if text.matches(':').count() > 1 {
            let v6: std::net::Ipv6Addr = text
                .parse()
                .map_err(|_| invalid("Endpoint", format!("{text}: bracket IPv6 hosts")))?;
            (format!("[{v6}]"), None)
        } else {
            match text.split_once(':') {
                Some((host, port)) => (host.to_string(), Some(port)),
                None => (text.to_string(), None),
            }
        };

        if host.is_empty() || host == "[]" {
            return Err(invalid("Endpoint", format!("{text}: missing host")));
        }
        let port = match port {
            Some(p) => match p.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(invalid("Endpoint", format!("{text}: bad port"))),
            },
            None => default_port,
        };
        Ok(Self {
            text: format!("{host}:{port}"),
            port,
        })
    }
}

struct Node {
    pair: KeyPair,
    address: String,
    endpoint: Option<Endpoint>,
}

/// Generate one config per node using the OS random source.
pub fn generate_mesh(options: &MeshOptions) -> Result<Vec<WireGuardConfig>> {
    generate_mesh_from(&mut OsRng, options)
}

/// Generate one config per node, drawing keys from `rng`.
///
/// The result is indexed like the nodes: entry `i` is node `i`'s config.
pub fn generate_mesh_from<R>(rng: &mut R, options: &MeshOptions) -> Result<Vec<WireGuardConfig>>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let endpoints = options.resolve()?;

    let mut nodes = Vec::with_capacity(options.quantity);
    for (i, endpoint) in endpoints.into_iter().enumerate() {
        nodes.push(Node {
            pair: KeyPair::generate_from(rng)?,
            address: increment_addresses(&options.address, i as u128)?,
            endpoint,
        });
    }

    let configs = (0..nodes.len())
        .map(|i| node_config(options, &nodes, i))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "generated {} configs, {} reachable",
        configs.len(),
        nodes.iter().filter(|n| n.endpoint.is_some()).count()
    );
    Ok(configs)
}

fn node_config(options: &MeshOptions, nodes: &[Node], me: usize) -> Result<WireGuardConfig> {
    let node = &nodes[me];
    let mut interface = InterfaceSection::new(node.pair.private_key().to_base64(), &node.address);
    interface.dns = options.dns.clone();
    interface.mtu = options.mtu;

    let others = nodes.iter().enumerate().filter(|&(i, _)| i != me);
    let mut peers = Vec::new();

    if let Some(endpoint) = &node.endpoint {
        interface.listen_port = Some(endpoint.port);
        interface.fw_mark = options.fw_mark.clone();
        interface.table = options.table.clone();
        interface.save_config = options.save_config.clone();
        interface.pre_up = options.pre_up.clone();
        interface.post_up = options.post_up.clone();
        interface.pre_down = options.pre_down.clone();
        interface.post_down = options.post_down.clone();

        for (_, other) in others {
            let mut peer = PeerSection::new(
                other.pair.public_key().to_base64(),
                host_routes(&other.address)?,
            );
            peer.endpoint = other.endpoint.as_ref().map(|e| e.text.clone());
            peers.push(peer);
        }
    } else {
        for (_, other) in others {
            let Some(endpoint) = &other.endpoint else {
                continue;
            };
            let mut peer = PeerSection::new(
                other.pair.public_key().to_base64(),
                options.allowed_ips.clone(),
            )
            .with_endpoint(endpoint.text.clone());
            peer.persistent_keepalive = options.persistent_keepalive.filter(|&k| k != 0);
            peer.reserved = options.reserved.clone().filter(|r| !r.is_empty());
            peers.push(peer);
        }
    }

    Ok(WireGuardConfig { interface, peers })
}

fn invalid(field: &str, reason: impl Into<String>) -> KeyError {
    KeyError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

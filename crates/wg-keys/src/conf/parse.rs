//! Parsing wg-quick text into a [`WireGuardConfig`].
//!
//! Keys and section names match case-insensitively. Unknown keys are skipped
//! so files written for newer tools still load. Key values are kept as text;
//! call [`WireGuardConfig::validate`] to check them.

use std::str::FromStr;

use log::trace;

use crate::conf::types::{InterfaceSection, PeerSection, WireGuardConfig};
use crate::error::{KeyError, Result};

/// Parse a wg-quick file.
pub fn parse(text: &str) -> Result<WireGuardConfig> {
    let mut config = WireGuardConfig::default();
    let mut current_peer: Option<PeerSection> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let mut line = raw.trim();
        if is_reserved_comment(line) {
            line = &line[2..];
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.eq_ignore_ascii_case("[Interface]") {
            config.peers.extend(current_peer.take());
            continue;
        }
        if line.eq_ignore_ascii_case("[Peer]") {
            config
                .peers
                .extend(current_peer.replace(PeerSection::default()));
            continue;
        }
        if line.starts_with('[') {
            return Err(invalid(line_no, format!("unknown section {line}")));
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| invalid(line_no, "expected `Key = Value`"))?;
        let (key, value) = (key.trim(), value.trim());

        match current_peer.as_mut() {
            Some(peer) => apply_peer(peer, key, value, line_no)?,
            None => apply_interface(&mut config.interface, key, value, line_no)?,
        }
    }

    config.peers.extend(current_peer);
    Ok(config)
}

impl FromStr for WireGuardConfig {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// `# reserved = ...` carries a peer field; any other comment is skipped.
fn is_reserved_comment(line: &str) -> bool {
    line.strip_prefix("# reserved")
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

fn apply_interface(
    iface: &mut InterfaceSection,
    key: &str,
    value: &str,
    line_no: usize,
) -> Result<()> {
    match key.to_ascii_lowercase().as_str() {
        "privatekey" => iface.private_key = value.to_string(),
        "listenport" => iface.listen_port = Some(number(key, value, line_no)?),
        "fwmark" => iface.fw_mark = Some(value.to_string()),
        "address" => iface.address = value.to_string(),
        "dns" => iface.dns = Some(value.to_string()),
        "mtu" => iface.mtu = Some(number(key, value, line_no)?),
        "table" => iface.table = Some(value.to_string()),
        "saveconfig" => iface.save_config = Some(value.to_string()),
        "preup" => iface.pre_up = Some(value.to_string()),
        "postup" => iface.post_up = Some(value.to_string()),
        "predown" => iface.pre_down = Some(value.to_string()),
        "postdown" => iface.post_down = Some(value.to_string()),
        _ => trace!("skipping unknown interface key {key} at line {line_no}"),
    }
    Ok(())
}

fn apply_peer(peer: &mut PeerSection, key: &str, value: &str, line_no: usize) -> Result<()> {
    match key.to_ascii_lowercase().as_str() {
        "publickey" => peer.public_key = value.to_string(),
        "presharedkey" => peer.preshared_key = Some(value.to_string()),
        "allowedips" => peer.allowed_ips = value.to_string(),
        "persistentkeepalive" if value.eq_ignore_ascii_case("off") => {
            peer.persistent_keepalive = None
        }
        "persistentkeepalive" => peer.persistent_keepalive = Some(number(key, value, line_no)?),
        "endpoint" => peer.endpoint = Some(value.to_string()),
        "reserved" => peer.reserved = Some(value.to_string()),
        _ => trace!("skipping unknown peer key {key} at line {line_no}"),
    }
    Ok(())
}

fn number<N>(key: &str, value: &str, line_no: usize) -> Result<N>
where
    N: FromStr,
    N::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| invalid(line_no, format!("{key} = {value}: {e}")))
}

fn invalid(line: usize, reason: impl Into<String>) -> KeyError {
    KeyError::InvalidConfig {
        line,
        reason: reason.into(),
    }
}

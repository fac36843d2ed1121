//! Rendering a [`WireGuardConfig`] to wg-quick text.

use std::fmt::{self, Display, Write};

use crate::conf::types::{PeerSection, WireGuardConfig};

/// Render `config` as a wg-quick file.
pub fn render(config: &WireGuardConfig) -> String {
    config.to_string()
}

fn line(f: &mut impl Write, key: &str, value: impl Display) -> fmt::Result {
    writeln!(f, "{key} = {value}")
}

fn opt_line(f: &mut impl Write, key: &str, value: Option<&str>) -> fmt::Result {
    match value {
        Some(v) if !v.is_empty() => line(f, key, v),
        _ => Ok(()),
    }
}

fn opt_number<N: Display + Default + PartialEq>(
    f: &mut impl Write,
    key: &str,
    value: Option<N>,
) -> fmt::Result {
    match value {
        Some(n) if n != N::default() => line(f, key, n),
        _ => Ok(()),
    }
}

fn render_peer(f: &mut impl Write, peer: &PeerSection) -> fmt::Result {
    f.write_str("\n[Peer]\n")?;
    line(f, "PublicKey", &peer.public_key)?;
    opt_line(f, "PresharedKey", peer.preshared_key.as_deref())?;
    opt_line(f, "Endpoint", peer.endpoint.as_deref())?;
    line(f, "AllowedIPs", &peer.allowed_ips)?;
    opt_number(f, "PersistentKeepalive", peer.persistent_keepalive)?;
    if let Some(reserved) = peer.reserved.as_deref().filter(|r| !r.is_empty()) {
        writeln!(f, "# reserved = {reserved}")?;
    }
    Ok(())
}

impl Display for WireGuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iface = &self.interface;
        f.write_str("[Interface]\n")?;
        line(f, "PrivateKey", &iface.private_key)?;
        opt_number(f, "ListenPort", iface.listen_port)?;
        opt_line(f, "FWMark", iface.fw_mark.as_deref())?;
        line(f, "Address", &iface.address)?;
        opt_line(f, "DNS", iface.dns.as_deref())?;
        opt_number(f, "MTU", iface.mtu)?;
        opt_line(f, "Table", iface.table.as_deref())?;
        opt_line(f, "SaveConfig", iface.save_config.as_deref())?;
        opt_line(f, "PreUp", iface.pre_up.as_deref())?;
        opt_line(f, "PostUp", iface.post_up.as_deref())?;
        opt_line(f, "PreDown", iface.pre_down.as_deref())?;
        opt_line(f, "PostDown", iface.post_down.as_deref())?;

        for peer in &self.peers {
            render_peer(f, peer)?;
        }
        Ok(())
    }
}

//! Address list arithmetic for generated configs.
//!
//! Lists are comma-separated IPs or CIDRs as they appear in `Address` and
//! `AllowedIPs`, e.g. `10.0.0.1/24, fd00::1/64`.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{KeyError, Result};

/// Offset every entry of an address list by `step`, keeping each mask.
///
/// `10.0.0.1/24, fd00::1/64` stepped by 2 is `10.0.0.3/24, fd00::3/64`.
/// Stepping past `255.255.255.255` or the last IPv6 address is an error.
pub fn increment_addresses(list: &str, step: u128) -> Result<String> {
    let stepped = entries(list)
        .map(|entry| increment_address(entry, step))
        .collect::<Result<Vec<_>>>()?;
    Ok(stepped.join(", "))
}

/// Offset a single IP or CIDR by `step`.
pub fn increment_address(entry: &str, step: u128) -> Result<String> {
    let (ip, mask) = parse_entry("Address", entry)?;
    let next = match ip {
        IpAddr::V4(v4) => u128::from(u32::from(v4))
            .checked_add(step)
            .and_then(|n| u32::try_from(n).ok())
            .map(|n| IpAddr::V4(Ipv4Addr::from(n))),
        IpAddr::V6(v6) => u128::from(v6)
            .checked_add(step)
            .map(|n| IpAddr::V6(Ipv6Addr::from(n))),
    }
    .ok_or_else(|| invalid("Address", format!("{entry} + {step} is out of range")))?;

    Ok(match mask {
        Some(mask) => format!("{next}/{mask}"),
        None => next.to_string(),
    })
}

/// Turn an address list into single-host routes: `/32` for IPv4 and `/128`
/// for IPv6. Used as a peer's `AllowedIPs`.
pub fn host_routes(list: &str) -> Result<String> {
    let routes = entries(list)
        .map(|entry| {
            let (ip, _) = parse_entry("Address", entry)?;
            Ok(match ip {
                IpAddr::V4(_) => format!("{ip}/32"),
                IpAddr::V6(_) => format!("{ip}/128"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(routes.join(", "))
}

/// Check that `list` holds at least one entry and that each is an IP or,
/// when `cidr_only`, a CIDR with an in-range mask.
pub fn check_list(field: &str, list: &str, cidr_only: bool) -> Result<()> {
    let mut count = 0;
    for entry in entries(list) {
        let (_, mask) = parse_entry(field, entry)?;
        if cidr_only && mask.is_none() {
            return Err(invalid(field, format!("{entry} is not a CIDR")));
        }
        count += 1;
    }
    if count == 0 {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

fn entries(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|e| !e.is_empty())
}

fn parse_entry(field: &str, entry: &str) -> Result<(IpAddr, Option<u8>)> {
    let (ip_text, mask_text) = match entry.split_once('/') {
        Some((ip, mask)) => (ip.trim(), Some(mask.trim())),
        None => (entry, None),
    };
    let ip: IpAddr = ip_text
        .parse()
        .map_err(|e| invalid(field, format!("{entry}: {e}")))?;

    let Some(mask_text) = mask_text else {
        return Ok((ip, None));
    };
    let max = if ip.is_ipv4() { 32 } else { 128 };
    match mask_text.parse::<u8>() {
        Ok(mask) if mask <= max => Ok((ip, Some(mask))),
        _ => Err(invalid(field, format!("{entry}: bad prefix length"))),
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> KeyError {
    KeyError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

//! Conservative public-IPv4 validation.
//!
//! The discovery services return a bare IP string in the response body;
//! before an address is treated as authoritative it has to pass the shape
//! and range checks here. The filter is deliberately narrow: it rejects the
//! RFC1918 private ranges and loopback, nothing else. Link-local, multicast
//! and other reserved ranges are intentionally NOT excluded — the rule set
//! is kept exactly as-is for compatibility with existing deployments.

use std::net::Ipv4Addr;

/// Parse a trimmed string as a public IPv4 address.
///
/// Accepts four dot-separated runs of one to three ASCII digits, each in
/// [0, 255] (leading zeros are tolerated), and rejects addresses inside
/// 10.0.0.0/8, 127.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
///
/// Returns `None` for anything else; no I/O, no logging.
pub fn parse_public_ipv4(s: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = s.split('.');

    for slot in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // len <= 3 digits, so the value fits in u32 before the range check
        let value: u32 = part.parse().ok()?;
        if value > 255 {
            return None;
        }
        *slot = value as u8;
    }
    if parts.next().is_some() {
        return None;
    }

    let [o1, o2, _, _] = octets;
    if o1 == 10 || o1 == 127 {
        return None;
    }
    if o1 == 172 && (16..=31).contains(&o2) {
        return None;
    }
    if o1 == 192 && o2 == 168 {
        return None;
    }

    Some(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
}

/// Whether `s` passes [`parse_public_ipv4`].
pub fn is_public_ipv4(s: &str) -> bool {
    parse_public_ipv4(s).is_some()
}

//! Loads the static routing table and interface list from simple text
//! formats (§6: "provided by the external collaborator"; the formats below
//! are this crate's concrete choice for that external hand-off, grounded in
//! the classic router-lab `rtable`/interface-list conventions).
//!
//! Routing table: one route per line, `dest gateway mask interface`, dotted
//! quads, `#`-prefixed comments and blank lines ignored.
//!
//! Interface list: one interface per line, `name mac ip`, e.g.
//! `eth0 01:02:03:04:05:06 10.0.0.1`.

use crate::error::RouterConfigError;
use crate::iface::{Interface, InterfaceList};
use crate::rtable::{RouteEntry, RoutingTable};
use common::MacAddr;
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

fn read_lines(path: &Path) -> Result<Vec<String>, RouterConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| RouterConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

fn parse_mac(s: &str) -> Option<MacAddr> {
    let mut octets = [0u8; 6];
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 6 {
        return None;
    }
    for (i, p) in parts.iter().enumerate() {
        octets[i] = u8::from_str_radix(p, 16).ok()?;
    }
    Some(MacAddr::new(octets))
}

pub fn load_rtable(path: impl AsRef<Path>) -> Result<RoutingTable, RouterConfigError> {
    let path = path.as_ref();
    let mut entries = Vec::new();

    for (line_no, raw) in read_lines(path)?.into_iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(RouterConfigError::Parse {
                path: path.display().to_string(),
                line: line_no + 1,
                reason: format!("expected 4 fields, got {}", fields.len()),
            });
        }
        let parse_ip = |s: &str| -> Result<Ipv4Addr, RouterConfigError> {
            Ipv4Addr::from_str(s).map_err(|_| RouterConfigError::Parse {
                path: path.display().to_string(),
                line: line_no + 1,
                reason: format!("invalid IPv4 address {s:?}"),
            })
        };
        entries.push(RouteEntry {
            dest: parse_ip(fields[0])?,
            gateway: parse_ip(fields[1])?,
            mask: parse_ip(fields[2])?,
            iface: fields[3].to_string(),
        });
    }

    Ok(RoutingTable::new(entries))
}

pub fn load_interfaces(path: impl AsRef<Path>) -> Result<InterfaceList, RouterConfigError> {
    let path = path.as_ref();
    let mut interfaces = Vec::new();

    for (line_no, raw) in read_lines(path)?.into_iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(RouterConfigError::Parse {
                path: path.display().to_string(),
                line: line_no + 1,
                reason: format!("expected 3 fields, got {}", fields.len()),
            });
        }
        let mac = parse_mac(fields[1]).ok_or_else(|| RouterConfigError::Parse {
            path: path.display().to_string(),
            line: line_no + 1,
            reason: format!("invalid MAC address {:?}", fields[1]),
        })?;
        let ip = Ipv4Addr::from_str(fields[2]).map_err(|_| RouterConfigError::Parse {
            path: path.display().to_string(),
            line: line_no + 1,
            reason: format!("invalid IPv4 address {:?}", fields[2]),
        })?;
        interfaces.push(Interface::new(fields[0], mac, ip));
    }

    Ok(InterfaceList::new(interfaces))
}

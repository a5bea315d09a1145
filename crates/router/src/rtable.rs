//! Static routing table: ordered, exhaustively searched, longest-prefix
//! match with first-entry tie-break.

use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub dest: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub iface: String,
}

impl RouteEntry {
    pub fn is_default(&self) -> bool {
        u32::from(self.mask) == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    entries: Vec<RouteEntry>,
}

/// Counts leading bits that agree between `a` and `b`.
fn common_prefix_len(a: u32, b: u32) -> u32 {
    (a ^ b).leading_zeros()
}

impl RoutingTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        RoutingTable { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Longest-prefix match per §4.1: for each non-default entry compute the
    /// common-prefix length between `entry.dest & entry.mask` and the raw
    /// destination; the entry with the greatest length wins, first entry
    /// breaking ties. Mask-zero entries are never matched here — a length-0
    /// "match" only ever means "fall through to the default route" — they
    /// are considered separately below.
    pub fn lookup(&self, dst: Ipv4Addr) -> Option<&RouteEntry> {
        let dst_bits = u32::from(dst);
        let mut best: Option<(&RouteEntry, u32)> = None;

        for entry in &self.entries {
            if entry.is_default() {
                continue;
            }
            let masked = u32::from(entry.dest) & u32::from(entry.mask);
            let len = common_prefix_len(masked, dst_bits);
            if best.map(|(_, best_len)| len > best_len).unwrap_or(true) {
                best = Some((entry, len));
            }
        }

        match best {
            Some((entry, len)) if len > 0 => Some(entry),
            _ => self.entries.iter().find(|e| e.is_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoutingTable {
        RoutingTable::new(vec![
            RouteEntry {
                dest: Ipv4Addr::new(10, 1, 0, 0),
                mask: Ipv4Addr::new(255, 255, 0, 0),
                gateway: Ipv4Addr::new(10, 1, 0, 254),
                iface: "eth1".into(),
            },
            RouteEntry {
                dest: Ipv4Addr::new(10, 1, 2, 0),
                mask: Ipv4Addr::new(255, 255, 255, 0),
                gateway: Ipv4Addr::new(10, 1, 2, 254),
                iface: "eth2".into(),
            },
            RouteEntry {
                dest: Ipv4Addr::UNSPECIFIED,
                mask: Ipv4Addr::UNSPECIFIED,
                gateway: Ipv4Addr::new(10, 0, 0, 254),
                iface: "eth0".into(),
            },
        ])
    }

    #[test]
    fn picks_longest_prefix() {
        let t = table();
        let route = t.lookup(Ipv4Addr::new(10, 1, 2, 3)).unwrap();
        assert_eq!(route.iface, "eth2");
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let t = table();
        let route = t.lookup(Ipv4Addr::new(10, 1, 9, 9)).unwrap();
        assert_eq!(route.iface, "eth1");
    }

    #[test]
    fn falls_back_to_default_route() {
        let t = table();
        let route = t.lookup(Ipv4Addr::new(8, 8, 8, 8)).unwrap();
        assert_eq!(route.iface, "eth0");
    }

    #[test]
    fn no_default_route_returns_none() {
        let t = RoutingTable::new(vec![RouteEntry {
            dest: Ipv4Addr::new(10, 1, 0, 0),
            mask: Ipv4Addr::new(255, 255, 0, 0),
            gateway: Ipv4Addr::new(10, 1, 0, 254),
            iface: "eth1".into(),
        }]);
        assert!(t.lookup(Ipv4Addr::new(8, 8, 8, 8)).is_none());
    }

    #[test]
    fn first_entry_wins_tie() {
        let t = RoutingTable::new(vec![
            RouteEntry {
                dest: Ipv4Addr::new(10, 1, 0, 0),
                mask: Ipv4Addr::new(255, 255, 0, 0),
                gateway: Ipv4Addr::new(10, 1, 0, 1),
                iface: "first".into(),
            },
            RouteEntry {
                dest: Ipv4Addr::new(10, 1, 0, 0),
                mask: Ipv4Addr::new(255, 255, 0, 0),
                gateway: Ipv4Addr::new(10, 1, 0, 2),
                iface: "second".into(),
            },
        ]);
        assert_eq!(t.lookup(Ipv4Addr::new(10, 1, 5, 5)).unwrap().iface, "first");
    }

    use proptest::prelude::*;

    // ─── proptest: longest-prefix-match invariant ──────────────────────────

    proptest! {
        /// A /24 entry covering the destination must win over a /16 entry
        /// that also covers it, no matter which one was inserted first —
        /// the actual invariant longest-prefix match promises, independent
        /// of the table's entry order.
        #[test]
        fn more_specific_entry_wins_regardless_of_order(
            a in 0u8..=255, b in 0u8..=255, c in 0u8..=255, host in 1u8..=254,
        ) {
            let narrow = RouteEntry {
                dest: Ipv4Addr::new(a, b, c, 0),
                mask: Ipv4Addr::new(255, 255, 255, 0),
                gateway: Ipv4Addr::new(a, b, c, 1),
                iface: "narrow".into(),
            };
            let wide = RouteEntry {
                dest: Ipv4Addr::new(a, b, 0, 0),
                mask: Ipv4Addr::new(255, 255, 0, 0),
                gateway: Ipv4Addr::new(a, b, 0, 1),
                iface: "wide".into(),
            };
            let dst = Ipv4Addr::new(a, b, c, host);

            let table_narrow_first = RoutingTable::new(vec![narrow.clone(), wide.clone()]);
            let table_wide_first = RoutingTable::new(vec![wide, narrow]);

            prop_assert_eq!(table_narrow_first.lookup(dst).unwrap().iface.as_str(), "narrow");
            prop_assert_eq!(table_wide_first.lookup(dst).unwrap().iface.as_str(), "narrow");
        }
    }
}

//! Loads an rtable/interface-list pair and replays a handful of synthetic
//! frames through the engine, logging the resulting actions. Real NIC I/O is
//! out of scope (see SPEC_FULL.md's Non-goals) — this exists to exercise the
//! engine end to end the way `dummy_node.rs` exercises the bonding runtime.

use anyhow::{Context, Result};
use bytes::BytesMut;
use common::clock::Instant;
use common::MacAddr;
use router::wire::arp::ArpPacket;
use router::wire::ethernet::{EthernetHeader, ETHERTYPE_ARP};
use router::{config, Router};
use std::net::Ipv4Addr;

fn build_arp_request_frame(requester_mac: MacAddr, requester_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Vec<u8> {
    let arp = ArpPacket::request(requester_mac, requester_ip, target_ip);
    let mut body = BytesMut::new();
    arp.write(&mut body);

    let mut frame = BytesMut::new();
    EthernetHeader {
        dst: MacAddr::BROADCAST,
        src: requester_mac,
        ethertype: ETHERTYPE_ARP,
    }
    .write(&mut frame);
    frame.extend_from_slice(&body);
    frame.to_vec()
}

fn main() -> Result<()> {
    common::logging::init();

    let mut args = std::env::args().skip(1);
    let rtable_path = args.next().unwrap_or_else(|| "rtable.txt".to_string());
    let iface_path = args.next().unwrap_or_else(|| "interfaces.txt".to_string());

    let rtable = config::load_rtable(&rtable_path).context("loading routing table")?;
    let interfaces = config::load_interfaces(&iface_path).context("loading interface list")?;

    let in_iface = interfaces
        .iter()
        .next()
        .map(|i| i.name.clone())
        .context("interface list is empty")?;

    let mut router = Router::new(interfaces, rtable);
    let now = Instant::now();

    tracing::info!(interface = %in_iface, "replaying a synthetic ARP request");
    let probe = build_arp_request_frame(MacAddr::new([0xde, 0xad, 0xbe, 0xef, 0x00, 0x01]), Ipv4Addr::new(192, 168, 100, 1), Ipv4Addr::new(192, 168, 100, 1));
    for action in router.handle_frame(&probe, &in_iface, now) {
        tracing::info!(out_iface = %action.iface, bytes = action.frame.len(), "action emitted");
    }

    Ok(())
}

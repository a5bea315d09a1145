//! Round-trip scenarios across the full engine, not just individual modules.
//! Mirrors the scenario list in SPEC_FULL.md §8 (forward-with-cached-ARP,
//! forward-with-ARP-resolution).

use bytes::BytesMut;
use common::clock::Instant;
use common::MacAddr;
use router::wire::arp::{ArpOp, ArpPacket};
use router::wire::ethernet::{EthernetHeader, ETHERNET_HEADER_LEN, ETHERTYPE_IPV4};
use router::wire::ipv4::{Ipv4Header, IPV4_HEADER_LEN, PROTO_UDP};
use router::{Interface, InterfaceList, RouteEntry, Router, RoutingTable};
use std::net::Ipv4Addr;

fn two_hop_router() -> Router {
    let interfaces = InterfaceList::new(vec![
        Interface::new("eth0", MacAddr::new([1, 1, 1, 1, 1, 1]), Ipv4Addr::new(10, 0, 0, 1)),
        Interface::new("eth1", MacAddr::new([2, 2, 2, 2, 2, 2]), Ipv4Addr::new(10, 1, 0, 1)),
    ]);
    let rtable = RoutingTable::new(vec![RouteEntry {
        dest: Ipv4Addr::new(10, 1, 0, 0),
        mask: Ipv4Addr::new(255, 255, 0, 0),
        gateway: Ipv4Addr::new(10, 1, 0, 254),
        iface: "eth1".into(),
    }]);
    Router::new(interfaces, rtable)
}

fn ip_frame(src_mac: MacAddr, dst_mac: MacAddr, src_ip: Ipv4Addr, dst_ip: Ipv4Addr, ttl: u8) -> Vec<u8> {
    let ip_hdr = Ipv4Header {
        version_ihl: 0x45,
        dscp_ecn: 0,
        total_len: IPV4_HEADER_LEN as u16,
        id: 0,
        flags_fragoff: 0,
        ttl,
        protocol: PROTO_UDP,
        checksum: 0,
        src: src_ip,
        dst: dst_ip,
    };
    let mut frame = BytesMut::new();
    EthernetHeader { dst: dst_mac, src: src_mac, ethertype: ETHERTYPE_IPV4 }.write(&mut frame);
    ip_hdr.write(&mut frame);
    frame.to_vec()
}

#[test]
fn forward_with_cached_arp_sends_immediately() {
    let mut r = two_hop_router();
    let now = Instant::now();

    // Pre-seed the cache so no ARP cycle is necessary.
    let reply = ArpPacket::request(MacAddr::new([9, 9, 9, 9, 9, 9]), Ipv4Addr::new(10, 1, 0, 254), Ipv4Addr::new(10, 1, 0, 1))
        .to_reply(MacAddr::new([9, 9, 9, 9, 9, 9]), Ipv4Addr::new(10, 1, 0, 254));
    let mut body = BytesMut::new();
    reply.write(&mut body);
    let mut reply_frame = BytesMut::new();
    EthernetHeader {
        dst: MacAddr::new([2, 2, 2, 2, 2, 2]),
        src: MacAddr::new([9, 9, 9, 9, 9, 9]),
        ethertype: router::wire::ethernet::ETHERTYPE_ARP,
    }
    .write(&mut reply_frame);
    reply_frame.extend_from_slice(&body);
    assert!(r.handle_frame(&reply_frame, "eth1", now).is_empty());

    let frame = ip_frame(MacAddr::new([1, 1, 1, 1, 1, 1]), MacAddr::new([3, 3, 3, 3, 3, 3]), Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(10, 1, 0, 99), 10);
    let actions = r.handle_frame(&frame, "eth0", now);
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].iface, "eth1");
    let eth = EthernetHeader::parse(&actions[0].frame).unwrap();
    assert_eq!(eth.dst, MacAddr::new([9, 9, 9, 9, 9, 9]));
    let ip = Ipv4Header::parse(&actions[0].frame[ETHERNET_HEADER_LEN..]).unwrap();
    assert_eq!(ip.ttl, 9);
}

#[test]
fn forward_with_unresolved_arp_queues_and_requests() {
    let mut r = two_hop_router();
    let now = Instant::now();

    let frame = ip_frame(MacAddr::new([1, 1, 1, 1, 1, 1]), MacAddr::new([3, 3, 3, 3, 3, 3]), Ipv4Addr::new(10, 0, 0, 5), Ipv4Addr::new(10, 1, 0, 99), 10);
    let actions = r.handle_frame(&frame, "eth0", now);
    assert_eq!(actions.len(), 1, "expect an ARP request, not the forwarded packet");
    let eth = EthernetHeader::parse(&actions[0].frame).unwrap();
    assert!(eth.dst.is_broadcast());
    let arp = ArpPacket::parse(&actions[0].frame[ETHERNET_HEADER_LEN..]).unwrap();
    assert_eq!(arp.op, ArpOp::Request);
    assert_eq!(arp.target_ip, Ipv4Addr::new(10, 1, 0, 254));

    // A second packet to the same unresolved gateway must not re-request.
    let frame2 = ip_frame(MacAddr::new([1, 1, 1, 1, 1, 1]), MacAddr::new([3, 3, 3, 3, 3, 3]), Ipv4Addr::new(10, 0, 0, 6), Ipv4Addr::new(10, 1, 0, 100), 10);
    assert!(r.handle_frame(&frame2, "eth0", now).is_empty());

    // Resolving it flushes both queued frames, in order.
    let reply = arp.to_reply(MacAddr::new([9, 9, 9, 9, 9, 9]), Ipv4Addr::new(10, 1, 0, 254));
    let mut body = BytesMut::new();
    reply.write(&mut body);
    let mut reply_frame = BytesMut::new();
    EthernetHeader {
        dst: MacAddr::new([2, 2, 2, 2, 2, 2]),
        src: MacAddr::new([9, 9, 9, 9, 9, 9]),
        ethertype: router::wire::ethernet::ETHERTYPE_ARP,
    }
    .write(&mut reply_frame);
    reply_frame.extend_from_slice(&body);

    let actions = r.handle_frame(&reply_frame, "eth1", now);
    assert_eq!(actions.len(), 2);
    for action in &actions {
        assert_eq!(action.iface, "eth1");
        let eth = EthernetHeader::parse(&action.frame).unwrap();
        assert_eq!(eth.dst, MacAddr::new([9, 9, 9, 9, 9, 9]));
    }
}

//! IPv4 header (RFC 791), fixed 20-byte form — no options, no fragmentation
//! (both out of scope).

use bytes::{Buf, BufMut, BytesMut};
use common::checksum16;
use std::net::Ipv4Addr;

pub const IPV4_HEADER_LEN: usize = 20;

pub const PROTO_ICMP: u8 = 1;
pub const PROTO_TCP: u8 = 6;
pub const PROTO_UDP: u8 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version_ihl: u8,
    pub dscp_ecn: u8,
    pub total_len: u16,
    pub id: u16,
    pub flags_fragoff: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
}

impl Ipv4Header {
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < IPV4_HEADER_LEN {
            return None;
        }
        let mut buf = &data[..IPV4_HEADER_LEN];
        let version_ihl = buf.get_u8();
        let dscp_ecn = buf.get_u8();
        let total_len = buf.get_u16();
        let id = buf.get_u16();
        let flags_fragoff = buf.get_u16();
        let ttl = buf.get_u8();
        let protocol = buf.get_u8();
        let checksum = buf.get_u16();
        let src = Ipv4Addr::new(buf.get_u8(), buf.get_u8(), buf.get_u8(), buf.get_u8());
        let dst = Ipv4Addr::new(buf.get_u8(), buf.get_u8(), buf.get_u8(), buf.get_u8());
        Some(Ipv4Header {
            version_ihl,
            dscp_ecn,
            total_len,
            id,
            flags_fragoff,
            ttl,
            protocol,
            checksum,
            src,
            dst,
        })
    }

    pub fn write(&self, out: &mut BytesMut) {
        out.put_u8(self.version_ihl);
        out.put_u8(self.dscp_ecn);
        out.put_u16(self.total_len);
        out.put_u16(self.id);
        out.put_u16(self.flags_fragoff);
        out.put_u8(self.ttl);
        out.put_u8(self.protocol);
        out.put_u16(self.checksum);
        out.put_slice(&self.src.octets());
        out.put_slice(&self.dst.octets());
    }

    fn to_bytes_zeroed_checksum(&self) -> [u8; IPV4_HEADER_LEN] {
        let mut h = *self;
        h.checksum = 0;
        let mut buf = BytesMut::with_capacity(IPV4_HEADER_LEN);
        h.write(&mut buf);
        buf[..].try_into().unwrap()
    }

    /// Recomputes and stores the header checksum over the 20-byte header.
    pub fn recompute_checksum(&mut self) {
        self.checksum = checksum16(&self.to_bytes_zeroed_checksum());
    }

    /// Per §4.1 classification rule 2: one's-complement checksum over the
    /// header must equal `0xFFFF`. The router's IPv4 path, per the decision
    /// recorded in DESIGN.md, calls this but does not act on a `false`
    /// result — preserving the reference implementation's defect.
    pub fn checksum_valid(&self, raw_header: &[u8]) -> bool {
        checksum16(&raw_header[..IPV4_HEADER_LEN]) == 0xFFFF
    }

    /// Decrements TTL by one. Returns `true` if TTL reached zero (packet
    /// must be dropped and a Time-Exceeded ICMP generated instead).
    pub fn decrement_ttl(&mut self) -> bool {
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl == 0
    }

    pub fn ihl_bytes(&self) -> usize {
        ((self.version_ihl & 0x0F) as usize) * 4
    }
}

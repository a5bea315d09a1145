//! ARP packet format (RFC 826), Ethernet/IPv4 flavor only.
//!
//! Fixed 28-byte body: hardware type(2), protocol type(2), hw len(1),
//! proto len(1), opcode(2), sender MAC(6), sender IP(4), target MAC(6),
//! target IP(4).

use bytes::{Buf, BufMut, BytesMut};
use common::MacAddr;
use std::net::Ipv4Addr;

pub const ARP_BODY_LEN: usize = 28;

pub const HTYPE_ETHERNET: u16 = 1;
pub const PTYPE_IPV4: u16 = 0x0800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpPacket {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub hardware_len: u8,
    pub protocol_len: u8,
    pub op: ArpOp,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Addr,
}

impl ArpPacket {
    /// Parses the 28-byte ARP body (the slice following the Ethernet header).
    ///
    /// IP addresses are read as four octets directly off the wire — there is
    /// no host/network byte-order conversion to get wrong here, unlike a
    /// pointer-cast-then-`htonl` implementation would invite.
    pub fn parse(body: &[u8]) -> Option<Self> {
        if body.len() < ARP_BODY_LEN {
            return None;
        }
        let mut buf = &body[..ARP_BODY_LEN];
        let hardware_type = buf.get_u16();
        let protocol_type = buf.get_u16();
        let hardware_len = buf.get_u8();
        let protocol_len = buf.get_u8();
        let op = match buf.get_u16() {
            1 => ArpOp::Request,
            2 => ArpOp::Reply,
            _ => return None,
        };
        let mut sender_mac = [0u8; 6];
        buf.copy_to_slice(&mut sender_mac);
        let sender_ip = Ipv4Addr::new(buf.get_u8(), buf.get_u8(), buf.get_u8(), buf.get_u8());
        let mut target_mac = [0u8; 6];
        buf.copy_to_slice(&mut target_mac);
        let target_ip = Ipv4Addr::new(buf.get_u8(), buf.get_u8(), buf.get_u8(), buf.get_u8());

        Some(ArpPacket {
            hardware_type,
            protocol_type,
            hardware_len,
            protocol_len,
            op,
            sender_mac: MacAddr::new(sender_mac),
            sender_ip,
            target_mac: MacAddr::new(target_mac),
            target_ip,
        })
    }

    pub fn write(&self, out: &mut BytesMut) {
        out.put_u16(self.hardware_type);
        out.put_u16(self.protocol_type);
        out.put_u8(self.hardware_len);
        out.put_u8(self.protocol_len);
        out.put_u16(self.op as u16);
        out.put_slice(&self.sender_mac.octets());
        out.put_slice(&self.sender_ip.octets());
        out.put_slice(&self.target_mac.octets());
        out.put_slice(&self.target_ip.octets());
    }

    /// Builds the reply to this request: swaps sender/target, sets the
    /// replying interface's MAC as the new sender.
    pub fn to_reply(&self, my_mac: MacAddr, my_ip: Ipv4Addr) -> ArpPacket {
        ArpPacket {
            hardware_type: HTYPE_ETHERNET,
            protocol_type: PTYPE_IPV4,
            hardware_len: 6,
            protocol_len: 4,
            op: ArpOp::Reply,
            sender_mac: my_mac,
            sender_ip: my_ip,
            target_mac: self.sender_mac,
            target_ip: self.sender_ip,
        }
    }

    pub fn request(my_mac: MacAddr, my_ip: Ipv4Addr, target_ip: Ipv4Addr) -> ArpPacket {
        ArpPacket {
            hardware_type: HTYPE_ETHERNET,
            protocol_type: PTYPE_IPV4,
            hardware_len: 6,
            protocol_len: 4,
            op: ArpOp::Request,
            sender_mac: my_mac,
            sender_ip: my_ip,
            target_mac: MacAddr::ZERO,
            target_ip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArpPacket {
        ArpPacket::request(
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        )
    }

    #[test]
    fn roundtrip() {
        let pkt = sample();
        let mut buf = BytesMut::new();
        pkt.write(&mut buf);
        assert_eq!(buf.len(), ARP_BODY_LEN);
        let parsed = ArpPacket::parse(&buf).unwrap();
        assert_eq!(parsed, pkt);
    }

    #[test]
    fn reply_swaps_sender_and_target() {
        let req = sample();
        let reply = req.to_reply(MacAddr::new([9; 6]), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(reply.op, ArpOp::Reply);
        assert_eq!(reply.sender_mac, MacAddr::new([9; 6]));
        assert_eq!(reply.target_mac, req.sender_mac);
        assert_eq!(reply.target_ip, req.sender_ip);
    }

    #[test]
    fn too_short_is_none() {
        assert!(ArpPacket::parse(&[0u8; 27]).is_none());
    }
}

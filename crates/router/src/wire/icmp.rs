//! ICMP echo and the extended type-3/type-11 "unreachable-family" layout.

use bytes::{BufMut, BytesMut};
use common::checksum16;

pub const ICMP_ECHO_REQUEST: u8 = 8;
pub const ICMP_ECHO_REPLY: u8 = 0;

pub const ICMP_UNREACHABLE: u8 = 3;
pub const CODE_NET_UNREACHABLE: u8 = 0;
pub const CODE_HOST_UNREACHABLE: u8 = 1;
pub const CODE_PORT_UNREACHABLE: u8 = 3;

pub const ICMP_TIME_EXCEEDED: u8 = 11;
pub const CODE_TTL_EXCEEDED: u8 = 0;

/// Bytes of the offending IP header + payload embedded in a type-3/11
/// message, per the classic router-lab `icmp_t3_hdr` convention (20-byte IP
/// header + first 8 payload bytes, zero-padded to a fixed 28-byte field).
pub const ICMP_DATA_SIZE: usize = 28;

/// An ICMP echo request/reply message: header + identifier/sequence + data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpEcho {
    pub ty: u8,
    pub code: u8,
    pub identifier: u16,
    pub sequence: u16,
    pub data: Vec<u8>,
}

impl IcmpEcho {
    pub fn parse(body: &[u8]) -> Option<Self> {
        if body.len() < 8 {
            return None;
        }
        Some(IcmpEcho {
            ty: body[0],
            code: body[1],
            identifier: u16::from_be_bytes([body[4], body[5]]),
            sequence: u16::from_be_bytes([body[6], body[7]]),
            data: body[8..].to_vec(),
        })
    }

    /// Builds the echo reply for this request, preserving payload, with a
    /// freshly computed checksum over the whole message.
    pub fn reply_to(&self) -> IcmpEcho {
        IcmpEcho {
            ty: ICMP_ECHO_REPLY,
            code: 0,
            identifier: self.identifier,
            sequence: self.sequence,
            data: self.data.clone(),
        }
    }

    pub fn write(&self) -> BytesMut {
        let mut out = BytesMut::with_capacity(8 + self.data.len());
        out.put_u8(self.ty);
        out.put_u8(self.code);
        out.put_u16(0); // checksum placeholder
        out.put_u16(self.identifier);
        out.put_u16(self.sequence);
        out.put_slice(&self.data);
        let csum = checksum16(&out);
        out[2..4].copy_from_slice(&csum.to_be_bytes());
        out
    }
}

/// Type-3 (Unreachable) / type-11 (Time Exceeded) message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpUnreachable {
    pub ty: u8,
    pub code: u8,
    /// Offending IP header + leading payload bytes, zero-padded/truncated to
    /// `ICMP_DATA_SIZE`.
    pub data: [u8; ICMP_DATA_SIZE],
}

impl IcmpUnreachable {
    pub fn new(ty: u8, code: u8, offending_ip_packet: &[u8]) -> Self {
        let mut data = [0u8; ICMP_DATA_SIZE];
        let n = offending_ip_packet.len().min(ICMP_DATA_SIZE);
        data[..n].copy_from_slice(&offending_ip_packet[..n]);
        IcmpUnreachable { ty, code, data }
    }

    pub fn net_unreachable(offending: &[u8]) -> Self {
        Self::new(ICMP_UNREACHABLE, CODE_NET_UNREACHABLE, offending)
    }

    pub fn host_unreachable(offending: &[u8]) -> Self {
        Self::new(ICMP_UNREACHABLE, CODE_HOST_UNREACHABLE, offending)
    }

    pub fn port_unreachable(offending: &[u8]) -> Self {
        Self::new(ICMP_UNREACHABLE, CODE_PORT_UNREACHABLE, offending)
    }

    pub fn time_exceeded(offending: &[u8]) -> Self {
        Self::new(ICMP_TIME_EXCEEDED, CODE_TTL_EXCEEDED, offending)
    }

    pub fn write(&self) -> BytesMut {
        let mut out = BytesMut::with_capacity(8 + ICMP_DATA_SIZE);
        out.put_u8(self.ty);
        out.put_u8(self.code);
        out.put_u16(0); // checksum placeholder
        out.put_u32(0); // unused
        out.put_slice(&self.data);
        let csum = checksum16(&out);
        out[2..4].copy_from_slice(&csum.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_reply_preserves_payload() {
        let req = IcmpEcho {
            ty: ICMP_ECHO_REQUEST,
            code: 0,
            identifier: 0x1234,
            sequence: 1,
            data: b"hello".to_vec(),
        };
        let reply = req.reply_to();
        assert_eq!(reply.ty, ICMP_ECHO_REPLY);
        assert_eq!(reply.data, req.data);
    }

    #[test]
    fn echo_write_checksums_to_all_ones() {
        let req = IcmpEcho {
            ty: ICMP_ECHO_REQUEST,
            code: 0,
            identifier: 1,
            sequence: 1,
            data: b"ping".to_vec(),
        };
        let wire = req.write();
        assert_eq!(checksum16(&wire), 0xFFFF);
    }

    #[test]
    fn echo_parse_roundtrip() {
        let req = IcmpEcho {
            ty: ICMP_ECHO_REQUEST,
            code: 0,
            identifier: 7,
            sequence: 9,
            data: b"abc".to_vec(),
        };
        let wire = req.write();
        let parsed = IcmpEcho::parse(&wire).unwrap();
        assert_eq!(parsed.identifier, 7);
        assert_eq!(parsed.sequence, 9);
        assert_eq!(parsed.data, b"abc");
    }

    #[test]
    fn unreachable_truncates_long_offending_packet() {
        let offending = vec![0xAB; 100];
        let msg = IcmpUnreachable::host_unreachable(&offending);
        assert_eq!(msg.data.len(), ICMP_DATA_SIZE);
        assert!(msg.data.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn unreachable_zero_pads_short_offending_packet() {
        let offending = vec![0x11, 0x22];
        let msg = IcmpUnreachable::net_unreachable(&offending);
        assert_eq!(&msg.data[0..2], &[0x11, 0x22]);
        assert!(msg.data[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn unreachable_write_checksums_to_all_ones() {
        let msg = IcmpUnreachable::time_exceeded(&[0u8; 20]);
        let wire = msg.write();
        assert_eq!(checksum16(&wire), 0xFFFF);
    }
}

//! Ethernet II framing.

use bytes::{Buf, BufMut, BytesMut};
use common::MacAddr;

pub const ETHERNET_HEADER_LEN: usize = 14;

pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;

/// Parsed Ethernet header, borrowed view over a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub fn parse(frame: &[u8]) -> Option<Self> {
        if frame.len() < ETHERNET_HEADER_LEN {
            return None;
        }
        let mut buf = &frame[..ETHERNET_HEADER_LEN];
        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        buf.copy_to_slice(&mut dst);
        buf.copy_to_slice(&mut src);
        let ethertype = buf.get_u16();
        Some(EthernetHeader {
            dst: MacAddr::new(dst),
            src: MacAddr::new(src),
            ethertype,
        })
    }

    pub fn write(&self, out: &mut BytesMut) {
        out.put_slice(&self.dst.octets());
        out.put_slice(&self.src.octets());
        out.put_u16(self.ethertype);
    }
}

/// Overwrites the destination MAC in-place within a serialized frame.
pub fn set_dst_mac(frame: &mut [u8], mac: MacAddr) {
    frame[0..6].copy_from_slice(&mac.octets());
}

/// Overwrites the source MAC in-place within a serialized frame.
pub fn set_src_mac(frame: &mut [u8], mac: MacAddr) {
    frame[6..12].copy_from_slice(&mac.octets());
}

//! # Segment wire format
//!
//! Fixed 16-byte header, big-endian fields throughout.
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                         Sequence Number                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Acknowledgement Number                    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |            Length (header+payload)           |    Flags     |R|
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          Receive Window               |         Checksum      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           Payload ...                          |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Unlike the QUIC-style VarInt framing this crate's teacher uses for its own
//! packets, this header is fixed-size — there is exactly one segment shape,
//! so there is no variable-length encoding to get right.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use common::checksum16;

pub const HEADER_LEN: usize = 16;

pub const FLAG_ACK: u8 = 0x10;
pub const FLAG_FIN: u8 = 0x01;

/// A parsed segment header plus a borrowed/owned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub seq: u32,
    pub ack: u32,
    pub flags: u8,
    pub recv_window: u16,
    pub payload: Bytes,
}

impl Segment {
    pub fn len_field(&self) -> u16 {
        (HEADER_LEN + self.payload.len()) as u16
    }

    pub fn has_ack(&self) -> bool {
        self.flags & FLAG_ACK != 0
    }

    pub fn has_fin(&self) -> bool {
        self.flags & FLAG_FIN != 0
    }

    /// Serializes the segment, computing the checksum over the whole thing
    /// with the checksum field zeroed, per §6.
    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.len_field() as usize);
        out.put_u32(self.seq);
        out.put_u32(self.ack);
        out.put_u16(self.len_field());
        out.put_u8(self.flags);
        out.put_u8(0); // reserved
        out.put_u16(self.recv_window);
        out.put_u16(0); // checksum placeholder
        out.put_slice(&self.payload);

        let csum = checksum16(&out);
        out[14..16].copy_from_slice(&csum.to_be_bytes());
        out.freeze()
    }

    /// Parses a segment from the wire. Per §4.2 receive step 1, the caller
    /// is responsible for validating `checksum(segment) == 0xFFFF` and
    /// `wire_len >= segment.len` — those are receive-time policy checks, not
    /// parse failures, so they live in `connection::Connection::receive`
    /// rather than here.
    pub fn parse(raw: &[u8]) -> Option<Self> {
        if raw.len() < HEADER_LEN {
            return None;
        }
        let mut buf = &raw[..HEADER_LEN];
        let seq = buf.get_u32();
        let ack = buf.get_u32();
        let len = buf.get_u16();
        let flags = buf.get_u8();
        let _reserved = buf.get_u8();
        let recv_window = buf.get_u16();
        let _checksum = buf.get_u16();

        let len = len as usize;
        if len < HEADER_LEN || len > raw.len() {
            return None;
        }
        let payload = Bytes::copy_from_slice(&raw[HEADER_LEN..len]);

        Some(Segment { seq, ack, flags, recv_window, payload })
    }

    pub fn checksum_valid(raw: &[u8]) -> bool {
        raw.len() >= HEADER_LEN && checksum16(raw) == 0xFFFF
    }

    /// Reads just the length field (bytes 8-9) without parsing the rest of
    /// the header. Per §4.2 receive step 1, the checksum must be computed
    /// over exactly the segment's declared length, not over however many
    /// bytes the substrate happened to deliver — callers peek this first to
    /// slice `raw` down before checksumming.
    pub fn peek_len_field(raw: &[u8]) -> Option<u16> {
        if raw.len() < HEADER_LEN {
            return None;
        }
        Some(u16::from_be_bytes([raw[8], raw[9]]))
    }
}

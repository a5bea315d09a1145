//! Wire formats: Ethernet, ARP, IPv4, ICMP.

pub mod arp;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;

pub use arp::{ArpOp, ArpPacket};
pub use ethernet::EthernetHeader;
pub use icmp::{IcmpEcho, IcmpUnreachable};
pub use ipv4::Ipv4Header;

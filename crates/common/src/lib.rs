//! Shared primitives for the router and transport engines.
//!
//! This crate contains:
//! - **Checksum** — the one's-complement checksum shared by IPv4/ICMP/ARP
//!   and the transport segment header.
//! - **MacAddr** — a 6-byte link-layer address newtype.
//! - **Clock** — a monotonic time source abstraction, so tests can supply a
//!   deterministic clock instead of wall time.
//! - **Logging bootstrap** — the `tracing` subscriber setup shared by both
//!   demo binaries.

pub mod checksum;
pub mod clock;
pub mod logging;
pub mod macaddr;

pub use checksum::checksum16;
pub use clock::Clock;
pub use macaddr::MacAddr;

//! Software IPv4 router: ARP resolution, longest-prefix-match forwarding,
//! and the ICMP errors that accompany both.
//!
//! Grounded primarily on `examples/original_source/lab1/router/sr_router.c`
//! for classification order and forwarding semantics, with the ARP
//! cache/pending-queue shape borrowed from
//! `examples/other_examples/443ecaf4_elide-dev-elide__crates-colide-src-net-arp.rs.rs`.

pub mod arpcache;
pub mod config;
pub mod error;
pub mod forwarding;
pub mod iface;
pub mod pending;
pub mod rtable;
pub mod wire;

pub use error::RouterConfigError;
pub use forwarding::{Router, RouterAction};
pub use iface::{Interface, InterfaceList};
pub use rtable::{RouteEntry, RoutingTable};

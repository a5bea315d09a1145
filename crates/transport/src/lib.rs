//! Reliable byte-stream transport ("cTCP") over an unreliable datagram
//! substrate, with a BBR-style congestion controller.
//!
//! Grounded primarily on `examples/original_source/lab3/ctcp.c` for the
//! Connection state machine and `ctcp_bbr.h` for the congestion controller's
//! phase semantics, with the Rust shape (module layout, getters-over-fields,
//! `// ─── Section ───` doc style) borrowed from
//! `strata-transport/src/congestion.rs` and `strata-transport/src/pool.rs`.

pub mod bbr;
pub mod connection;
pub mod registry;
pub mod stats;
pub mod substrate;
pub mod wire;

pub use bbr::{AckSample, BbrController, BbrPhase, SendLimit};
pub use connection::{Connection, FinStatus, BUFFER_SIZE, DEFAULT_TICK_INTERVAL, MAX_SEG_DATA_SIZE};
pub use registry::{ConnectionHandle, ConnectionRegistry};
pub use stats::ConnectionStats;
pub use substrate::{AppConn, AppRead, Substrate};
pub use wire::{Segment, FLAG_ACK, FLAG_FIN, HEADER_LEN};

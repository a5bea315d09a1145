//! # Connection registry
//!
//! Replaces the "shared mutable global connection list" the reference
//! design uses (§9 Design Notes) with a slab of connections, owned by
//! whatever drives the periodic tick. Grounded on the `Slab`-based handle
//! pattern in `strata-transport/src/pool.rs` (`PacketPool`/`PacketHandle`).

use slab::Slab;

use common::clock::Instant;

use crate::connection::Connection;
use crate::substrate::Substrate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle(pub usize);

/// Owns every live connection and runs the periodic tick across all of
/// them, removing whichever ones tear themselves down.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Slab<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        ConnectionRegistry { connections: Slab::new() }
    }

    pub fn insert(&mut self, conn: Connection) -> ConnectionHandle {
        ConnectionHandle(self.connections.insert(conn))
    }

    pub fn get(&self, handle: ConnectionHandle) -> Option<&Connection> {
        self.connections.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ConnectionHandle) -> Option<&mut Connection> {
        self.connections.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Drives `tick` on every connection, then reaps the ones that tore
    /// themselves down. `substrate_for` maps a handle to the substrate it
    /// should transmit on, since separate connections may share or differ
    /// in which substrate they're bound to.
    pub fn tick_all<S: Substrate>(&mut self, now: Instant, mut substrate_for: impl FnMut(ConnectionHandle) -> S) {
        let handles: Vec<usize> = self.connections.iter().map(|(k, _)| k).collect();
        for key in handles {
            let handle = ConnectionHandle(key);
            let mut substrate = substrate_for(handle);
            if let Some(conn) = self.connections.get_mut(key) {
                conn.tick(now, &mut substrate);
            }
        }
        self.connections.retain(|_, conn| !conn.is_torn_down());
    }
}

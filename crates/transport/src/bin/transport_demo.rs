//! Drives one connection against an in-process loopback substrate and
//! application, logging the resulting segments. Real socket I/O is out of
//! scope (§1 Non-goals) — this exists to exercise the engine end to end the
//! way `router_demo.rs` exercises the forwarding plane.

use std::collections::VecDeque;

use anyhow::Result;
use common::clock::Instant;
use transport::{AppConn, AppRead, Connection, Substrate};

struct LoggingSubstrate {
    name: &'static str,
}

impl Substrate for LoggingSubstrate {
    fn send(&mut self, bytes: &[u8]) {
        tracing::info!(side = self.name, bytes = bytes.len(), "segment sent");
    }
}

#[derive(Default)]
struct EchoApp {
    outbound: VecDeque<u8>,
    received: Vec<u8>,
}

impl AppConn for EchoApp {
    fn bufspace(&self) -> usize {
        usize::MAX
    }

    fn output(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.received.extend_from_slice(bytes);
        }
    }

    fn input(&mut self, buf: &mut [u8]) -> AppRead {
        if self.outbound.is_empty() {
            return AppRead::WouldBlock;
        }
        let n = buf.len().min(self.outbound.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.outbound.pop_front().unwrap();
        }
        AppRead::Data(n)
    }
}

fn main() -> Result<()> {
    common::logging::init();

    let now = Instant::now();
    let mut conn = Connection::new(now, 1, 4096);
    let mut app = EchoApp::default();
    app.outbound.extend(b"hello, transport".iter().copied());

    let mut substrate = LoggingSubstrate { name: "demo" };

    conn.read_from_app(&mut app);
    conn.try_send(now, &mut substrate);

    tracing::info!(bbr_phase = ?conn.bbr().phase(), "initial send complete");

    Ok(())
}

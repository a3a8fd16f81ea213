//! Shared helpers for interpreter tests.

use ble_dtm::sim::{SimRadio, SimTimer};
use ble_dtm::DtmContext;

pub type SimContext = DtmContext<SimRadio, SimTimer>;

/// A freshly initialized interpreter backed by simulated hardware.
pub fn ready_context() -> SimContext {
    let mut ctx = DtmContext::new(SimRadio::new(), SimTimer::new());
    ctx.init().unwrap();
    ctx
}

/// An initialized interpreter with a receiver test already running.
pub fn receiving_context(channel: u8) -> SimContext {
    let mut ctx = ready_context();
    ctx.cmd(ble_dtm::DtmOpcode::ReceiverTest, channel, 0, 0)
        .unwrap();
    ctx
}

//! Simulated radio and tick source
//!
//! In-memory stand-ins for the hardware abstractions, for exercising the
//! interpreter off-target. The radio records every driver call so tests can
//! assert on the exact register-level sequence; the timer compresses time by
//! advancing one tick per wait.

use heapless::Vec;

use crate::command::PacketType;
use crate::radio::{RadioDriver, TestMode};
use crate::timer::TickSource;

/// Capacity of the recorded operation log.
pub const OP_LOG_SIZE: usize = 32;

/// One radio call as observed by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioOp {
    Start {
        channel: u8,
        pattern: PacketType,
        length: u8,
        mode: TestMode,
    },
    Stop,
    SetTxPower {
        dbm: i8,
    },
}

/// Simulated radio peripheral.
pub struct SimRadio {
    /// Every driver call, oldest first. Entries beyond the capacity are
    /// dropped.
    pub ops: Vec<RadioOp, OP_LOG_SIZE>,
    /// Whether RF activity is currently running.
    pub running: bool,
    /// Last programmed output level.
    pub tx_power_dbm: i8,
}

impl SimRadio {
    pub const fn new() -> Self {
        Self {
            ops: Vec::new(),
            running: false,
            tx_power_dbm: 0,
        }
    }

    /// The most recent start call, if any.
    pub fn last_start(&self) -> Option<&RadioOp> {
        self.ops
            .iter()
            .rev()
            .find(|op| matches!(op, RadioOp::Start { .. }))
    }
}

impl Default for SimRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioDriver for SimRadio {
    fn configure_and_start(&mut self, channel: u8, pattern: PacketType, length: u8, mode: TestMode) {
        let _ = self.ops.push(RadioOp::Start {
            channel,
            pattern,
            length,
            mode,
        });
        self.running = true;
    }

    fn stop(&mut self) {
        // Redundant stops are a no-op, mirroring the real peripheral.
        if self.running {
            let _ = self.ops.push(RadioOp::Stop);
            self.running = false;
        }
    }

    fn set_tx_power(&mut self, dbm: i8) {
        let _ = self.ops.push(RadioOp::SetTxPower { dbm });
        self.tx_power_dbm = dbm;
    }
}

/// Simulated tick source. The counter is free-running and advances whenever
/// the caller waits, regardless of the running flag.
pub struct SimTimer {
    pub running: bool,
    pub ticks: u32,
    pub selected_timer: u8,
}

impl SimTimer {
    pub const fn new() -> Self {
        Self {
            running: false,
            ticks: 0,
            selected_timer: 0,
        }
    }
}

impl Default for SimTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SimTimer {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn elapsed_ticks(&self) -> u32 {
        self.ticks
    }

    fn wait_for_event(&mut self) -> u32 {
        self.ticks = self.ticks.wrapping_add(1);
        self.ticks
    }

    fn select_timer(&mut self, index: u8) {
        self.selected_timer = index;
    }
}

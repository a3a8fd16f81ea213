//! Radio hardware abstraction
//!
//! The interpreter drives the radio through [`RadioDriver`] so the RF test
//! logic can run against real registers on target and against simulated
//! hardware in tests. Implementations only translate already-validated
//! parameters into register operations; range checking is the interpreter's
//! job.

use crate::command::PacketType;

/// Lowest supported output level.
pub const TX_POWER_MIN_DBM: i8 = -40;
/// Highest supported output level.
pub const TX_POWER_MAX_DBM: i8 = 4;
/// Output level granularity.
pub const TX_POWER_STEP_DBM: i8 = 4;

/// RF test modes selected by a start command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestMode {
    /// Receive test packets and count the valid ones.
    Receiver,
    /// Transmit test packets with the configured payload.
    Transmitter,
    /// Constant unmodulated carrier, no packet structure.
    Carrier,
}

/// Center frequency in MHz for a physical channel number.
pub fn channel_to_frequency_mhz(channel: u8) -> u16 {
    2402 + 2 * channel as u16
}

/// Whether `dbm` is one of the supported output levels, -40..=+4 in 4 dB
/// steps.
pub fn tx_power_is_valid(dbm: i8) -> bool {
    (TX_POWER_MIN_DBM..=TX_POWER_MAX_DBM).contains(&dbm) && dbm % TX_POWER_STEP_DBM == 0
}

/// Register-level access to the radio peripheral.
pub trait RadioDriver {
    /// Program frequency, payload pattern and length, then start RF activity
    /// in `mode`. Called only with validated parameters and only while
    /// stopped, so the hardware is never observably half-configured.
    fn configure_and_start(&mut self, channel: u8, pattern: PacketType, length: u8, mode: TestMode);

    /// Stop any running RF activity. Must tolerate being called while
    /// already stopped, because a reset can arrive at any time.
    fn stop(&mut self);

    /// Program the transmit output level. Called only while stopped.
    fn set_tx_power(&mut self, dbm: i8);
}

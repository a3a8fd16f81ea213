//! DTM command interpreter
//!
//! Owns the command/response state machine:
//!
//! ```text
//! Uninitialized -> Idle -> Active(Receiver|Transmitter|Carrier) -> Idle
//! ```
//!
//! `init` moves out of `Uninitialized` and may be repeated as a full
//! re-initialization. A reset is valid from any initialized state and
//! returns to `Idle`, clearing the session and the event slot. Start
//! commands are valid only from `Idle`; `TestEnd` only while a test runs.
//! Every validation failure leaves the state machine and the hardware
//! exactly as they were.

use log::{debug, info, warn};

use crate::command::{
    DtmCommand, DtmError, DtmOpcode, DtmStatus, PacketType, CHANNEL_MAX, PAYLOAD_LENGTH_MAX,
    VENDOR_CARRIER_TEST, VENDOR_CARRIER_TEST_ALT, VENDOR_SELECT_TIMER, VENDOR_SET_TX_POWER,
};
use crate::event::{DtmEvent, EventSlot, PacketCounter};
use crate::radio::{tx_power_is_valid, RadioDriver, TestMode};
use crate::timer::{TickSource, TIMER_COUNT};

/// Parameters of the running test.
///
/// A session exists exactly while a test is active, and is only constructed
/// from validated parameters, so an active state always carries a fully
/// configured session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TestSession {
    pub mode: TestMode,
    pub channel: u8,
    pub pattern: PacketType,
    pub length: u8,
}

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtmState {
    /// No command is accepted until `init` runs.
    Uninitialized,
    /// Ready for a start command.
    Idle,
    /// A test is running.
    Active(TestSession),
}

impl DtmState {
    pub fn is_active(&self) -> bool {
        matches!(self, DtmState::Active(_))
    }
}

/// Idle-only device configuration. Persists across test sessions; `init`
/// restores the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Hardware timer index, 0..=2.
    pub timer_index: u8,
    /// Transmit output level, -40..=+4 dBm in steps of 4.
    pub tx_power_dbm: i8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timer_index: 0,
            tx_power_dbm: 0,
        }
    }
}

/// The DTM command interpreter.
///
/// Dispatch runs on the controller's calling context; the radio RX interrupt
/// reports received packets through the handle returned by
/// [`packet_counter`](Self::packet_counter). The hardware is owned, not
/// ambient, so tests can substitute simulated implementations.
pub struct DtmContext<R: RadioDriver, T: TickSource> {
    radio: R,
    timer: T,
    state: DtmState,
    config: DeviceConfig,
    rx_packets: PacketCounter,
    events: EventSlot,
}

impl<R: RadioDriver, T: TickSource> DtmContext<R, T> {
    /// Wrap the hardware. No command is accepted until [`init`](Self::init).
    pub fn new(radio: R, timer: T) -> Self {
        Self {
            radio,
            timer,
            state: DtmState::Uninitialized,
            config: DeviceConfig::default(),
            rx_packets: PacketCounter::new(),
            events: EventSlot::new(),
        }
    }

    /// Initialize or re-initialize the module. A repeat call is a full
    /// reset, not an error. Always succeeds.
    pub fn init(&mut self) -> DtmStatus {
        self.radio.stop();
        self.timer.stop();
        self.rx_packets.reset();
        self.events.clear();
        self.config = DeviceConfig::default();
        self.timer.select_timer(self.config.timer_index);
        self.radio.set_tx_power(self.config.tx_power_dbm);
        self.state = DtmState::Idle;
        info!("dtm: initialized");
        Ok(())
    }

    /// Reset the module; behaves the same as an `LE_RESET` command word.
    pub fn reset(&mut self) -> DtmStatus {
        self.cmd(DtmOpcode::Reset, 0, 0, 0)
    }

    /// Hand control to the timing loop. Returns at the next 625 us tick
    /// boundary or on an asynchronous radio event, whichever comes first,
    /// with the current tick count.
    pub fn wait(&mut self) -> u32 {
        self.timer.wait_for_event()
    }

    /// Execute one decoded command and record the matching event.
    pub fn cmd(&mut self, opcode: DtmOpcode, channel: u8, length: u8, pattern: u8) -> DtmStatus {
        let result = self.dispatch(opcode, channel, length, pattern);
        match result {
            // TestEnd records its packet report inside dispatch; every other
            // successful command answers with a success status.
            Ok(()) => {
                if opcode != DtmOpcode::TestEnd {
                    self.events.record(DtmEvent::status_success());
                }
            }
            Err(err) => {
                warn!("dtm: command {:?} rejected: {:?}", opcode, err);
                self.events.record(DtmEvent::status_error());
            }
        }
        result
    }

    /// Execute a packed 16-bit command word.
    pub fn cmd_word(&mut self, word: u16) -> DtmStatus {
        let command = DtmCommand::from_word(word);
        self.cmd(command.opcode, command.channel, command.length, command.pattern)
    }

    /// Take the unread event, if one exists.
    pub fn event_get(&self) -> Option<DtmEvent> {
        self.events.try_take()
    }

    /// Select hardware timer `index` (0..=2). Rejected while a test is
    /// active or when the index is out of range.
    pub fn set_timer(&mut self, index: u8) -> bool {
        if self.state.is_active() || index >= TIMER_COUNT {
            return false;
        }
        self.config.timer_index = index;
        self.timer.select_timer(index);
        true
    }

    /// Set the transmit output level. Rejected while a test is active or
    /// when `dbm` is not one of -40, -36, .., 0, +4.
    pub fn set_tx_power(&mut self, dbm: i8) -> bool {
        if self.state.is_active() || !tx_power_is_valid(dbm) {
            return false;
        }
        self.config.tx_power_dbm = dbm;
        self.radio.set_tx_power(dbm);
        true
    }

    /// Handle for the radio RX interrupt to count validated packets.
    pub fn packet_counter(&self) -> &PacketCounter {
        &self.rx_packets
    }

    pub fn state(&self) -> &DtmState {
        &self.state
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    fn dispatch(&mut self, opcode: DtmOpcode, channel: u8, length: u8, pattern: u8) -> DtmStatus {
        if matches!(self.state, DtmState::Uninitialized) {
            return Err(DtmError::Uninitialized);
        }
        match opcode {
            DtmOpcode::Reset => {
                self.abort_test();
                self.events.clear();
                Ok(())
            }
            DtmOpcode::TestEnd => self.end_test(),
            DtmOpcode::ReceiverTest => self.start_test(TestMode::Receiver, channel, length, pattern),
            DtmOpcode::TransmitterTest => {
                self.start_test(TestMode::Transmitter, channel, length, pattern)
            }
        }
    }

    /// Cancel any running test and return to idle. Safe from idle as well,
    /// since the radio tolerates redundant stops.
    fn abort_test(&mut self) {
        self.radio.stop();
        self.timer.stop();
        self.rx_packets.reset();
        self.state = DtmState::Idle;
        debug!("dtm: reset to idle");
    }

    fn end_test(&mut self) -> DtmStatus {
        let DtmState::Active(session) = self.state else {
            return Err(DtmError::InvalidState);
        };
        self.radio.stop();
        self.timer.stop();
        // The count is only meaningful after a receiver test; a transmitter
        // or carrier session reports whatever is in the counter (zero).
        let count = self.rx_packets.take();
        self.events.record(DtmEvent::packet_report(count));
        self.state = DtmState::Idle;
        debug!("dtm: {:?} test ended, {} packets", session.mode, count);
        Ok(())
    }

    fn start_test(&mut self, mode: TestMode, channel: u8, length: u8, pattern: u8) -> DtmStatus {
        if !matches!(self.state, DtmState::Idle) {
            return Err(DtmError::InvalidState);
        }
        let pattern = PacketType::from_code(pattern).ok_or(DtmError::IllegalConfiguration)?;
        if pattern == PacketType::VendorSpecific {
            // Vendor-specific operations ride on the transmitter opcode only.
            return match mode {
                TestMode::Transmitter => self.vendor_command(length, channel),
                _ => Err(DtmError::IllegalConfiguration),
            };
        }
        if channel > CHANNEL_MAX {
            return Err(DtmError::IllegalChannel);
        }
        if length > PAYLOAD_LENGTH_MAX {
            return Err(DtmError::IllegalLength);
        }
        self.begin_session(TestSession {
            mode,
            channel,
            pattern,
            length,
        });
        Ok(())
    }

    /// Vendor-specific control: the length field selects the sub-operation
    /// and the channel field carries its argument. Only the carrier
    /// sub-operations start RF activity; the others mutate the idle-time
    /// device configuration.
    fn vendor_command(&mut self, sub_op: u8, value: u8) -> DtmStatus {
        match sub_op {
            VENDOR_CARRIER_TEST | VENDOR_CARRIER_TEST_ALT => self.start_carrier(value),
            VENDOR_SET_TX_POWER => {
                // The argument is the level in dBm as a two's-complement byte.
                if self.set_tx_power(value as i8) {
                    Ok(())
                } else {
                    Err(DtmError::IllegalConfiguration)
                }
            }
            VENDOR_SELECT_TIMER => {
                if self.set_timer(value) {
                    Ok(())
                } else {
                    Err(DtmError::IllegalConfiguration)
                }
            }
            _ => Err(DtmError::IllegalConfiguration),
        }
    }

    /// Constant unmodulated carrier until TestEnd or Reset.
    fn start_carrier(&mut self, channel: u8) -> DtmStatus {
        if channel > CHANNEL_MAX {
            return Err(DtmError::IllegalChannel);
        }
        self.begin_session(TestSession {
            mode: TestMode::Carrier,
            channel,
            pattern: PacketType::VendorSpecific,
            length: 0,
        });
        Ok(())
    }

    /// Start RF activity for a validated session. State flips to active only
    /// after the radio call returns, so a concurrent poller never observes a
    /// partially configured test.
    fn begin_session(&mut self, session: TestSession) {
        self.rx_packets.reset();
        self.radio
            .configure_and_start(session.channel, session.pattern, session.length, session.mode);
        self.timer.start();
        self.state = DtmState::Active(session);
        debug!(
            "dtm: {:?} test started on channel {}",
            session.mode, session.channel
        );
    }
}

//! DTM command word definitions and decoding
//!
//! The tester submits each command as a single 16-bit word with four packed
//! fields:
//!
//! - bits 14..=15: command opcode
//! - bits 8..=13:  physical channel, frequency = (2402 + 2 * channel) MHz
//! - bits 2..=7:   payload length in bytes
//! - bits 0..=1:   payload bit pattern
//!
//! Decoding is a pure function with no hardware side effect; all range
//! validation happens in the interpreter before any register is touched, so
//! every error path is side-effect-free.

/// Highest physical channel number usable in a test (2480 MHz).
pub const CHANNEL_MAX: u8 = 39;

/// Longest standard DTM payload in bytes.
pub const PAYLOAD_LENGTH_MAX: u8 = 37;

/// Vendor-specific sub-operation: constant unmodulated carrier.
pub const VENDOR_CARRIER_TEST: u8 = 0;
/// Alternate carrier code emitted by some test tooling.
pub const VENDOR_CARRIER_TEST_ALT: u8 = 1;
/// Vendor-specific sub-operation: set transmit power, -40..=+4 dBm in steps of 4.
pub const VENDOR_SET_TX_POWER: u8 = 2;
/// Vendor-specific sub-operation: select hardware timer 0, 1 or 2.
pub const VENDOR_SELECT_TIMER: u8 = 3;

const OPCODE_SHIFT: u16 = 14;
const CHANNEL_SHIFT: u16 = 8;
const CHANNEL_MASK: u16 = 0x3F;
const LENGTH_SHIFT: u16 = 2;
const LENGTH_MASK: u16 = 0x3F;
const PATTERN_MASK: u16 = 0x03;

/// Command opcodes, bits 14..=15 of the command word.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtmOpcode {
    /// Reset the device and return to idle.
    Reset = 0,
    /// Start a receiver test.
    ReceiverTest = 1,
    /// Start a transmitter test (or a vendor-specific operation).
    TransmitterTest = 2,
    /// End the running test and report the packet count.
    TestEnd = 3,
}

/// Payload bit patterns, bits 0..=1 of the command word.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketType {
    /// PRBS9 pseudo-random bit sequence.
    Prbs9 = 0,
    /// Repeated 11110000 (LSB first).
    Pattern0F = 1,
    /// Repeated 10101010 (LSB first).
    Pattern55 = 2,
    /// Vendor-specific: carrier control or device configuration.
    VendorSpecific = 3,
}

impl PacketType {
    /// Convert from a raw pattern code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Prbs9),
            1 => Some(Self::Pattern0F),
            2 => Some(Self::Pattern55),
            3 => Some(Self::VendorSpecific),
            _ => None,
        }
    }
}

/// A decoded DTM command.
///
/// `pattern` stays a raw code here: callers of the field-wise API may pass
/// values outside the two wire bits, and the interpreter answers those with
/// [`DtmError::IllegalConfiguration`] rather than failing the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DtmCommand {
    pub opcode: DtmOpcode,
    pub channel: u8,
    pub length: u8,
    pub pattern: u8,
}

impl DtmCommand {
    /// Unpack a 16-bit command word.
    pub fn from_word(word: u16) -> Self {
        let opcode = match word >> OPCODE_SHIFT {
            0 => DtmOpcode::Reset,
            1 => DtmOpcode::ReceiverTest,
            2 => DtmOpcode::TransmitterTest,
            _ => DtmOpcode::TestEnd,
        };
        Self {
            opcode,
            channel: ((word >> CHANNEL_SHIFT) & CHANNEL_MASK) as u8,
            length: ((word >> LENGTH_SHIFT) & LENGTH_MASK) as u8,
            pattern: (word & PATTERN_MASK) as u8,
        }
    }

    /// Pack back into the 16-bit wire form.
    pub fn to_word(&self) -> u16 {
        ((self.opcode as u16) << OPCODE_SHIFT)
            | ((self.channel as u16 & CHANNEL_MASK) << CHANNEL_SHIFT)
            | ((self.length as u16 & LENGTH_MASK) << LENGTH_SHIFT)
            | (self.pattern as u16 & PATTERN_MASK)
    }
}

/// Status codes returned to the tester for every processed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DtmError {
    /// Physical channel number outside 0..=39.
    IllegalChannel,
    /// Sequencing error: the command is not valid in the current state.
    InvalidState,
    /// Payload length outside 0..=37.
    IllegalLength,
    /// Parameter out of range; the legal range depends on the operation.
    IllegalConfiguration,
    /// No command is accepted before the module has been initialized.
    Uninitialized,
}

/// Result of a dispatched command.
pub type DtmStatus = Result<(), DtmError>;

#![no_std]

//! Direct Test Mode (DTM) command processor for a BLE radio.
//!
//! A test controller submits 16-bit command words; this crate decodes them,
//! drives receiver/transmitter/carrier RF test sequences against a radio and
//! a 625 microsecond tick timer, and reports results back as 16-bit status
//! and packet-count events. The crate is organized into clear layers:
//!
//! - `command`: command word decoding and status codes
//! - `event`: event word encoding, the single-slot report store, and the
//!   interrupt-shared packet counter
//! - `radio` / `timer`: hardware abstractions driven by the interpreter
//! - `interpreter`: the command state machine itself
//! - `sim`: simulated hardware for exercising the interpreter off-target
//!
//! How the command bytes physically arrive (UART framing etc.) is the
//! transport's concern; the interpreter only consumes decoded command words.

pub mod command;
pub mod event;
pub mod interpreter;
pub mod radio;
pub mod sim;
pub mod timer;

pub use command::{DtmCommand, DtmError, DtmOpcode, DtmStatus, PacketType};
pub use event::{DtmEvent, EventSlot, PacketCounter};
pub use interpreter::{DeviceConfig, DtmContext, DtmState, TestSession};
pub use radio::{RadioDriver, TestMode};
pub use timer::{TickSource, TICK_INTERVAL_US};

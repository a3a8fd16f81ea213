//! DTM event reporting
//!
//! Results travel back to the tester as a single 16-bit event word: either a
//! status event (success/error) or a packet report carrying the received
//! packet count in its low 15 bits. The store is a single slot: the tester
//! polls, and a newer event always wins over an unread older one. That is
//! the documented DTM behavior for a polling consumer, not a defect.
//!
//! Both the event slot and the packet counter are written from radio
//! interrupt context while the dispatch path reads them, so each access runs
//! under a critical section.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Packet reporting event flag, set in bit 15.
pub const LE_PACKET_REPORTING_EVENT: u16 = 0x8000;
/// Status event indicating success.
pub const LE_TEST_STATUS_EVENT_SUCCESS: u16 = 0x0000;
/// Status event indicating an error.
pub const LE_TEST_STATUS_EVENT_ERROR: u16 = 0x0001;

const PACKET_COUNT_MASK: u16 = 0x7FFF;

/// A 16-bit event word as polled by the tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DtmEvent(u16);

impl DtmEvent {
    /// Status event for a successfully executed command.
    pub fn status_success() -> Self {
        Self(LE_TEST_STATUS_EVENT_SUCCESS)
    }

    /// Status event for a rejected command.
    pub fn status_error() -> Self {
        Self(LE_TEST_STATUS_EVENT_ERROR)
    }

    /// Packet report carrying the low 15 bits of `count`.
    pub fn packet_report(count: u32) -> Self {
        Self(LE_PACKET_REPORTING_EVENT | (count as u16 & PACKET_COUNT_MASK))
    }

    /// The raw wire value.
    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn is_packet_report(self) -> bool {
        self.0 & LE_PACKET_REPORTING_EVENT != 0
    }

    /// Reported packet count, if this is a packet report.
    pub fn packet_count(self) -> Option<u16> {
        if self.is_packet_report() {
            Some(self.0 & PACKET_COUNT_MASK)
        } else {
            None
        }
    }
}

/// Single-slot store for the most recent unread event.
///
/// `record` overwrites unconditionally; `try_take` atomically returns and
/// clears. No queueing, no backpressure.
pub struct EventSlot {
    slot: Mutex<CriticalSectionRawMutex, Cell<Option<DtmEvent>>>,
}

impl EventSlot {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Store `event`, replacing any unread one.
    pub fn record(&self, event: DtmEvent) {
        self.slot.lock(|slot| slot.set(Some(event)));
    }

    /// Return and clear the slot, or `None` if nothing new arrived since the
    /// last call.
    pub fn try_take(&self) -> Option<DtmEvent> {
        self.slot.lock(|slot| slot.take())
    }

    /// Drop any unread event.
    pub fn clear(&self) {
        self.slot.lock(|slot| slot.set(None));
    }
}

impl Default for EventSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Received-packet counter shared between the radio RX interrupt and the
/// dispatch path.
pub struct PacketCounter {
    count: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl PacketCounter {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Count one validated received packet. Called from interrupt context.
    pub fn record_packet(&self) {
        self.count
            .lock(|count| count.set(count.get().saturating_add(1)));
    }

    pub fn count(&self) -> u32 {
        self.count.lock(|count| count.get())
    }

    /// Return the current count and restart from zero.
    pub fn take(&self) -> u32 {
        self.count.lock(|count| count.replace(0))
    }

    pub fn reset(&self) {
        self.count.lock(|count| count.set(0));
    }
}

impl Default for PacketCounter {
    fn default() -> Self {
        Self::new()
    }
}

//! Event encoding and single-slot store tests.

mod common;

use ble_dtm::event::{EventSlot, PacketCounter};
use ble_dtm::{DtmEvent, DtmOpcode};
use common::{ready_context, receiving_context};

#[test]
fn status_event_encoding() {
    assert_eq!(DtmEvent::status_success().raw(), 0x0000);
    assert_eq!(DtmEvent::status_error().raw(), 0x0001);
    assert!(!DtmEvent::status_success().is_packet_report());
    assert_eq!(DtmEvent::status_error().packet_count(), None);
}

#[test]
fn packet_report_encoding() {
    let event = DtmEvent::packet_report(5);
    assert_eq!(event.raw(), 0x8005);
    assert!(event.is_packet_report());
    assert_eq!(event.packet_count(), Some(5));
}

#[test]
fn packet_report_truncates_to_15_bits() {
    assert_eq!(DtmEvent::packet_report(0x7FFF).packet_count(), Some(0x7FFF));
    assert_eq!(DtmEvent::packet_report(0x8000).packet_count(), Some(0));
    assert_eq!(DtmEvent::packet_report(0x12345).packet_count(), Some(0x2345));
    assert_eq!(DtmEvent::packet_report(40_000).packet_count(), Some(40_000 & 0x7FFF));
}

#[test]
fn slot_is_empty_until_recorded() {
    let slot = EventSlot::new();
    assert_eq!(slot.try_take(), None);

    slot.record(DtmEvent::status_success());
    assert_eq!(slot.try_take(), Some(DtmEvent::status_success()));
    // take clears.
    assert_eq!(slot.try_take(), None);
}

#[test]
fn slot_overwrites_unread_events() {
    // Last write wins; the slot is deliberately lossy for slow pollers.
    let slot = EventSlot::new();
    slot.record(DtmEvent::status_success());
    slot.record(DtmEvent::packet_report(7));
    assert_eq!(slot.try_take(), Some(DtmEvent::packet_report(7)));
    assert_eq!(slot.try_take(), None);
}

#[test]
fn slot_clear_drops_unread_event() {
    let slot = EventSlot::new();
    slot.record(DtmEvent::status_error());
    slot.clear();
    assert_eq!(slot.try_take(), None);
}

#[test]
fn counter_increments_and_takes() {
    let counter = PacketCounter::new();
    assert_eq!(counter.count(), 0);

    for _ in 0..12 {
        counter.record_packet();
    }
    assert_eq!(counter.count(), 12);
    assert_eq!(counter.take(), 12);
    assert_eq!(counter.count(), 0);

    counter.record_packet();
    counter.reset();
    assert_eq!(counter.count(), 0);
}

#[test]
fn successful_commands_record_success_status() {
    let mut ctx = ready_context();
    ctx.cmd(DtmOpcode::ReceiverTest, 0, 0, 0).unwrap();
    assert_eq!(ctx.event_get(), Some(DtmEvent::status_success()));
}

#[test]
fn rejected_commands_record_error_status() {
    let mut ctx = ready_context();
    let _ = ctx.cmd(DtmOpcode::ReceiverTest, 63, 0, 0);
    assert_eq!(ctx.event_get(), Some(DtmEvent::status_error()));
}

#[test]
fn unread_status_superseded_by_report() {
    // Start records a success status; an unpolled tester then ends the test
    // and only the report survives in the slot.
    let mut ctx = receiving_context(10);
    ctx.packet_counter().record_packet();
    ctx.cmd(DtmOpcode::TestEnd, 0, 0, 0).unwrap();

    let event = ctx.event_get().unwrap();
    assert!(event.is_packet_report());
    assert_eq!(event.packet_count(), Some(1));
    assert_eq!(ctx.event_get(), None);
}

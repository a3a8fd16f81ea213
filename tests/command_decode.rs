//! Unit tests for command word decoding.

use ble_dtm::command::{DtmCommand, CHANNEL_MAX, PAYLOAD_LENGTH_MAX};
use ble_dtm::radio::channel_to_frequency_mhz;
use ble_dtm::{DtmOpcode, PacketType};

#[test]
fn decodes_all_four_fields() {
    // Receiver test, channel 10, length 0, PRBS9.
    let cmd = DtmCommand::from_word(0x4A00);
    assert_eq!(cmd.opcode, DtmOpcode::ReceiverTest);
    assert_eq!(cmd.channel, 10);
    assert_eq!(cmd.length, 0);
    assert_eq!(cmd.pattern, 0);

    // Transmitter test, channel 39, length 37, pattern 0x55.
    let word = (2u16 << 14) | (39 << 8) | (37 << 2) | 2;
    let cmd = DtmCommand::from_word(word);
    assert_eq!(cmd.opcode, DtmOpcode::TransmitterTest);
    assert_eq!(cmd.channel, CHANNEL_MAX);
    assert_eq!(cmd.length, PAYLOAD_LENGTH_MAX);
    assert_eq!(cmd.pattern, 2);
}

#[test]
fn decodes_every_opcode() {
    assert_eq!(DtmCommand::from_word(0x0000).opcode, DtmOpcode::Reset);
    assert_eq!(DtmCommand::from_word(0x4000).opcode, DtmOpcode::ReceiverTest);
    assert_eq!(
        DtmCommand::from_word(0x8000).opcode,
        DtmOpcode::TransmitterTest
    );
    assert_eq!(DtmCommand::from_word(0xC000).opcode, DtmOpcode::TestEnd);
}

#[test]
fn word_round_trips() {
    for word in [0x0000u16, 0x4A00, 0x8001, 0xC000, 0xABCD & 0xFFFF] {
        let cmd = DtmCommand::from_word(word);
        assert_eq!(cmd.to_word(), word);
    }
}

#[test]
fn to_word_masks_out_of_range_fields() {
    let cmd = DtmCommand {
        opcode: DtmOpcode::ReceiverTest,
        channel: 0xFF,
        length: 0xFF,
        pattern: 0xFF,
    };
    // Only the low 6/6/2 bits of channel/length/pattern survive packing.
    assert_eq!(cmd.to_word(), (1 << 14) | (0x3F << 8) | (0x3F << 2) | 0x03);
}

#[test]
fn pattern_codes_map_to_packet_types() {
    assert_eq!(PacketType::from_code(0), Some(PacketType::Prbs9));
    assert_eq!(PacketType::from_code(1), Some(PacketType::Pattern0F));
    assert_eq!(PacketType::from_code(2), Some(PacketType::Pattern55));
    assert_eq!(PacketType::from_code(3), Some(PacketType::VendorSpecific));
    assert_eq!(PacketType::from_code(4), None);
    assert_eq!(PacketType::from_code(0xFF), None);
}

#[test]
fn channel_frequency_mapping() {
    assert_eq!(channel_to_frequency_mhz(0), 2402);
    assert_eq!(channel_to_frequency_mhz(19), 2440);
    assert_eq!(channel_to_frequency_mhz(39), 2480);
}

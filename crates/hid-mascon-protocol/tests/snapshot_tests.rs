//! Snapshot tests for the mascon HID protocol.
//!
//! These tests lock in the wire format to catch accidental protocol regressions.

use densha_hid_mascon_protocol::{
    self as mascon, DescriptorSet, DpadState, MasconInputState, MasconVariant, button_bits,
};
use insta::assert_snapshot;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode(variant: MasconVariant, state: MasconInputState) -> Result<String, String> {
    mascon::encode_report(variant, &state)
        .map(|r| hex(&r))
        .map_err(|e| e.to_string())
}

#[test]
fn test_snapshot_type2_idle() -> Result<(), String> {
    let report = encode(MasconVariant::Type2, MasconInputState::default())?;
    assert_snapshot!(report, @"01 79 81 FF 08 00");
    Ok(())
}

#[test]
fn test_snapshot_type2_full_power_brake_released() -> Result<(), String> {
    let state = MasconInputState {
        power: 0xFF,
        ..Default::default()
    };
    let report = encode(MasconVariant::Type2, state)?;
    assert_snapshot!(report, @"01 79 00 FF 08 00");
    Ok(())
}

#[test]
fn test_snapshot_type2_emergency_brake() -> Result<(), String> {
    let state = MasconInputState {
        brake: 0xFF,
        ..Default::default()
    };
    let report = encode(MasconVariant::Type2, state)?;
    assert_snapshot!(report, @"01 B9 81 FF 08 00");
    Ok(())
}

#[test]
fn test_snapshot_type2_all_buttons_up_right() -> Result<(), String> {
    let state = MasconInputState {
        dpad: DpadState {
            up: 0xFF,
            right: 0xFF,
            ..Default::default()
        },
        buttons: button_bits::ALL,
        ..Default::default()
    };
    let report = encode(MasconVariant::Type2, state)?;
    assert_snapshot!(report, @"01 79 81 FF 01 3F");
    Ok(())
}

#[test]
fn test_snapshot_shinkansen_idle() -> Result<(), String> {
    let report = encode(MasconVariant::Shinkansen, MasconInputState::default())?;
    assert_snapshot!(report, @"1C 12 FF 08 00 00");
    Ok(())
}

#[test]
fn test_snapshot_shinkansen_full_power_b_button() -> Result<(), String> {
    let state = MasconInputState {
        power: 0xFF,
        buttons: button_bits::B,
        ..Default::default()
    };
    let report = encode(MasconVariant::Shinkansen, state)?;
    assert_snapshot!(report, @"1C FB FF 08 04 00");
    Ok(())
}

#[test]
fn test_snapshot_shinkansen_d_button_left() -> Result<(), String> {
    let state = MasconInputState {
        brake: 0x5A,
        dpad: DpadState {
            left: 0x01,
            ..Default::default()
        },
        buttons: button_bits::D,
        ..Default::default()
    };
    let report = encode(MasconVariant::Shinkansen, state)?;
    assert_snapshot!(report, @"70 12 FF 06 01 00");
    Ok(())
}

#[test]
fn test_snapshot_ryojouhen_rejected() {
    let result = encode(MasconVariant::Ryojouhen, MasconInputState::default());
    assert_snapshot!(
        result.err().unwrap_or_default(),
        @"Unsupported mascon variant: Ryojouhen"
    );
}

#[test]
fn test_snapshot_type2_hid_report_descriptor() {
    let set = DescriptorSet::for_variant(MasconVariant::Type2);
    assert_snapshot!(
        hex(set.hid_report),
        @"05 01 09 04 A1 01 75 08 95 01 81 01 09 01 A1 00 09 30 09 31 09 32 15 00 26 FF 00 75 08 95 03 81 02 C0 05 01 25 07 46 3B 01 75 04 95 01 65 14 09 39 81 42 65 00 95 01 81 01 05 09 19 01 29 06 15 00 25 01 35 00 45 01 75 01 95 06 81 02 95 02 81 01 C0"
    );
}

#[test]
fn test_snapshot_ryojouhen_hid_report_descriptor() {
    let set = DescriptorSet::for_variant(MasconVariant::Ryojouhen);
    assert_snapshot!(
        hex(set.hid_report),
        @"05 01 09 04 A1 01 09 01 A1 00 09 30 09 31 09 32 15 00 26 FF 00 75 08 95 03 81 02 C0 05 01 25 07 46 3B 01 75 04 95 01 65 14 09 39 81 42 65 00 95 01 81 01 05 09 19 01 29 07 15 00 25 01 35 00 45 01 75 01 95 07 81 02 95 01 81 01 75 08 95 01 81 01 75 08 95 01 81 01 75 08 95 01 81 01 C0"
    );
}

#[test]
fn test_snapshot_device_descriptors() {
    let lines: Vec<String> = MasconVariant::ALL
        .iter()
        .map(|&v| format!("{}: {}", v.model_code(), hex(DescriptorSet::for_variant(v).device)))
        .collect();
    assert_snapshot!(lines.join("\n"), @r"
    TCPP20009: 12 01 10 01 FF 04 00 08 E4 0A 04 00 02 01 01 02 03 01
    TCPP20011: 12 01 10 01 FF 05 00 08 E4 0A 05 00 02 01 01 02 03 01
    TCPP20014: 12 01 10 01 FF FF 00 08 E4 0A 07 00 02 01 01 02 03 01
    ");
}

#[test]
fn test_snapshot_config_descriptor() {
    let set = DescriptorSet::for_variant(MasconVariant::Shinkansen);
    assert_snapshot!(
        hex(set.config),
        @"09 02 19 00 01 01 00 A0 FA 09 04 00 00 01 03 00 00 00 07 05 81 03 08 00 14"
    );
}

use pretty_assertions::assert_eq;

use tube6502_rs::map::{FIRMWARE_SIZE, IRQ_VECTOR, NMI_VECTOR};
use tube6502_rs::trace::{parse_script, replay, Access, TraceEntry};
use tube6502_rs::{
    AccessMode, Bus, DeviceConfig, Firmware, FirmwareState, InterruptLines, LatchBridge, Region,
    Tube6502,
};

fn firmware() -> Firmware {
    let mut rom = vec![0xEA; FIRMWARE_SIZE];
    // NMI, RESET, IRQ vectors
    rom[0xFFA..].copy_from_slice(&[0x00, 0xF8, 0x00, 0xF8, 0x50, 0xF8]);
    Firmware::from_bytes(rom).unwrap()
}

fn device() -> Tube6502<LatchBridge> {
    let cfg = DeviceConfig {
        verify_firmware: false,
        ..DeviceConfig::default()
    };
    Tube6502::new(cfg, firmware(), LatchBridge::new()).unwrap()
}

#[test]
fn powers_on_with_firmware_paged_in() {
    let mut dev = device();
    assert_eq!(dev.firmware_state(), FirmwareState::Active);
    assert_eq!(dev.read_u16_le(NMI_VECTOR, AccessMode::Normal), 0xF800);
    assert_eq!(dev.read_u16_le(IRQ_VECTOR, AccessMode::Normal), 0xF850);
    assert_eq!(dev.read_u8(0x0000, AccessMode::Normal), 0);
}

#[test]
fn reset_keeps_ram_power_cycle_clears_it() {
    let mut dev = device();
    dev.write_u8(0x2000, 0x42);
    dev.read_u8(0xFEF0, AccessMode::Normal);
    dev.reset();
    assert_eq!(dev.firmware_state(), FirmwareState::Active);
    assert_eq!(dev.peek(0x2000), 0x42);

    dev.read_u8(0xFEF0, AccessMode::Normal);
    dev.power_cycle();
    assert_eq!(dev.firmware_state(), FirmwareState::Active);
    assert_eq!(dev.peek(0x2000), 0);
}

#[test]
fn host_bytes_reach_processor_and_raise_lines() {
    let mut dev = device();
    dev.host_write(1, 0x7F);
    assert_eq!(dev.interrupt_lines(), InterruptLines::IRQ);
    assert_eq!(dev.firmware_state(), FirmwareState::Active);

    // status peek leaves both the latch and paging alone
    assert_eq!(dev.peek(0xFEF0) & 0x80, 0x80);
    assert_eq!(dev.firmware_state(), FirmwareState::Active);

    assert_eq!(dev.read_u8(0xFEF1, AccessMode::Normal), 0x7F);
    assert_eq!(dev.interrupt_lines(), InterruptLines::empty());
    assert_eq!(dev.firmware_state(), FirmwareState::Disabled);

    dev.write_u8(0xFEF1, 0x33);
    assert_eq!(dev.host_read(1), 0x33);
}

#[test]
fn reset_clears_bridge_lines() {
    let mut dev = device();
    dev.host_write(5, 0x01);
    assert_eq!(dev.interrupt_lines(), InterruptLines::NMI);
    dev.reset();
    assert_eq!(dev.interrupt_lines(), InterruptLines::empty());
}

#[test]
fn replayed_script_traces_paging() {
    let script = parse_script(
        r#"[
            {"op": "reset"},
            {"op": "read", "addr": 61440},
            {"op": "write", "addr": 61440, "value": 153},
            {"op": "read", "addr": 61440},
            {"op": "read", "addr": 65264, "inspect": true},
            {"op": "read", "addr": 65264},
            {"op": "read", "addr": 61440},
            {"op": "host_write", "offset": 3, "value": 7},
            {"op": "host_read", "offset": 2}
        ]"#,
    )
    .unwrap();
    assert_eq!(script[1], Access::Read { addr: 0xF000, inspect: false });

    let mut dev = device();
    let trace = replay(&mut dev, &script);
    let summary: Vec<(Option<Region>, Option<u8>, FirmwareState)> = trace
        .iter()
        .map(|e: &TraceEntry| (e.region, e.value, e.firmware))
        .collect();
    use FirmwareState::*;
    assert_eq!(
        summary,
        vec![
            (None, None, Active),
            (Some(Region::Firmware), Some(0xEA), Active),
            (Some(Region::WorkingMemory), None, Active),
            (Some(Region::Firmware), Some(0xEA), Active),
            (Some(Region::Bridge), Some(0x40), Active),
            (Some(Region::Bridge), Some(0x40), Disabled),
            (Some(Region::WorkingMemory), Some(0x99), Disabled),
            (None, None, Disabled),
            // channel 1 latch toward the processor is now full
            (None, Some(0x00), Disabled),
        ]
    );
}

#[test]
fn trace_serializes_as_json() {
    let mut dev = device();
    let trace = replay(&mut dev, &[Access::Read { addr: 0xFEF0, inspect: false }]);
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json[0]["access"]["op"].as_str(), Some("read"));
    assert_eq!(json[0]["region"].as_str(), Some("bridge"));
    assert_eq!(json[0]["firmware"].as_str(), Some("disabled"));
    assert_eq!(trace[0].to_string(), "read   fef0 = 40 [Bridge] firmware=Disabled");
}

use serde::{Deserialize, Serialize};

use crate::memory::AccessMode;

/// Size of the second processor's address space in bytes.
pub const ADDRESS_SPACE_SIZE: usize = 0x1_0000;

pub const BRIDGE_BASE: u16 = 0xFEF0;
pub const BRIDGE_END: u16 = 0xFEFF; // inclusive
pub const BRIDGE_SIZE: usize = 16;

pub const FIRMWARE_BASE: u16 = 0xF000;
pub const FIRMWARE_SIZE: usize = 0x1000;

/// 6502 hardware vectors, all inside the firmware window.
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Bridge,
    Firmware,
    WorkingMemory,
}

/// Paging state of the firmware overlay. The only state the decoder owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirmwareState {
    #[default]
    Active,
    Disabled,
}

impl FirmwareState {
    pub fn is_active(self) -> bool {
        matches!(self, FirmwareState::Active)
    }

    /// State after a processor read that decoded to `region`.
    /// Only a normal read of the bridge window latches the overlay off.
    pub fn after_read(self, region: Region, mode: AccessMode) -> FirmwareState {
        match (region, mode) {
            (Region::Bridge, AccessMode::Normal) => FirmwareState::Disabled,
            _ => self,
        }
    }
}

pub fn in_bridge_window(addr: u16) -> bool {
    (BRIDGE_BASE..=BRIDGE_END).contains(&addr)
}

/// Classify `addr` under the given firmware state. The bridge window wins
/// over the firmware window it sits inside.
pub fn classify(addr: u16, state: FirmwareState) -> Region {
    if in_bridge_window(addr) {
        Region::Bridge
    } else if state.is_active() && addr >= FIRMWARE_BASE {
        Region::Firmware
    } else {
        Region::WorkingMemory
    }
}

/// Offset of `addr` within the bridge window. Caller guarantees the address
/// is inside it.
pub fn bridge_offset(addr: u16) -> u8 {
    (addr - BRIDGE_BASE) as u8
}

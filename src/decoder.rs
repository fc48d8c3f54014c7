use tracing::debug;

use crate::bridge::Bridge;
use crate::firmware::Firmware;
use crate::map::{self, FirmwareState, Region, FIRMWARE_BASE};
use crate::memory::{AccessMode, Bus, WorkingMemory};

/// Routes every second-processor bus access to firmware, working memory or
/// the bridge, and latches the firmware overlay off on the first normal read
/// of the bridge window.
///
/// Host and processor paths both go through `&mut self`, so whoever owns the
/// decoder serializes them.
#[derive(Debug, Clone)]
pub struct AddressDecoder<B> {
    state: FirmwareState,
    firmware: Firmware,
    memory: WorkingMemory,
    bridge: B,
}

impl<B: Bridge> AddressDecoder<B> {
    /// Assemble a decoder in the post-reset state. The bridge is not reset
    /// here; call [`reset`](Self::reset) for a full reset.
    pub fn new(firmware: Firmware, memory: WorkingMemory, bridge: B) -> Self {
        Self {
            state: FirmwareState::Active,
            firmware,
            memory,
            bridge,
        }
    }

    pub fn firmware_state(&self) -> FirmwareState {
        self.state
    }

    pub fn firmware_enabled(&self) -> bool {
        self.state.is_active()
    }

    pub fn region_of(&self, addr: u16) -> Region {
        map::classify(addr, self.state)
    }

    pub fn reset(&mut self) {
        debug!(from = ?self.state, "tube reset, firmware overlay enabled");
        self.state = FirmwareState::Active;
        self.bridge.reset();
    }

    pub fn host_read(&mut self, offset: u8) -> u8 {
        self.bridge.host_read(offset)
    }

    pub fn host_write(&mut self, offset: u8, val: u8) {
        self.bridge.host_write(offset, val);
    }

    pub fn firmware(&self) -> &Firmware {
        &self.firmware
    }

    pub fn memory(&self) -> &WorkingMemory {
        &self.memory
    }

    /// Swap in freshly allocated working memory. Firmware state is untouched.
    pub fn replace_memory(&mut self, memory: WorkingMemory) -> WorkingMemory {
        std::mem::replace(&mut self.memory, memory)
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }
}

impl<B: Bridge> Bus for AddressDecoder<B> {
    fn read_u8(&mut self, addr: u16, mode: AccessMode) -> u8 {
        let region = self.region_of(addr);
        let next = self.state.after_read(region, mode);
        if next != self.state {
            debug!(addr, "firmware overlay disabled");
            self.state = next;
        }
        match region {
            Region::Bridge => self.bridge.processor_read(map::bridge_offset(addr)),
            Region::Firmware => self.firmware.byte((addr - FIRMWARE_BASE) as usize),
            Region::WorkingMemory => self.memory.read_u8(addr, mode),
        }
    }

    fn write_u8(&mut self, addr: u16, val: u8) {
        // Writes never page firmware; outside the bridge they always land in RAM.
        if map::in_bridge_window(addr) {
            self.bridge.processor_write(map::bridge_offset(addr), val);
        } else {
            self.memory.write_u8(addr, val);
        }
    }
}

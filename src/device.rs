use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bridge::{Bridge, InterruptLines};
use crate::decoder::AddressDecoder;
use crate::firmware::{Checksums, Firmware, FirmwareError};
use crate::map::{FirmwareState, ADDRESS_SPACE_SIZE};
use crate::memory::{AccessMode, Bus, WorkingMemory};

#[derive(thiserror::Error, Debug)]
pub enum DeviceError {
    #[error(transparent)]
    Firmware(#[from] FirmwareError),
    #[error("working memory must cover the full address space (65536 bytes), got {size}")]
    RamSize { size: usize },
    #[error("invalid device config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read device config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuModel {
    M6502,
    M65C02,
}

pub const XTAL_HZ: u32 = 12_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub cpu_model: CpuModel,
    pub clock_hz: u32,
    pub ram_size: usize,
    pub ram_fill: u8,
    pub software_lists: Vec<String>,
    /// Check the image against the stock firmware checksums on construction.
    pub verify_firmware: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            cpu_model: CpuModel::M65C02,
            clock_hz: XTAL_HZ / 4,
            ram_size: ADDRESS_SPACE_SIZE,
            ram_fill: 0,
            software_lists: vec!["bbc_flop_6502".into(), "bbc_flop_65c102".into()],
            verify_firmware: true,
        }
    }
}

impl DeviceConfig {
    pub fn from_json_str(s: &str) -> Result<Self, DeviceError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeviceError> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_json_str(&txt)
    }
}

/// 6502 second processor: configuration plus the address decoder that owns
/// firmware, working memory and the bridge.
#[derive(Debug)]
pub struct Tube6502<B> {
    cfg: DeviceConfig,
    decoder: AddressDecoder<B>,
}

impl<B: Bridge> Tube6502<B> {
    /// Power on: verify the firmware if asked to, allocate working memory and
    /// reset.
    pub fn new(cfg: DeviceConfig, firmware: Firmware, bridge: B) -> Result<Self, DeviceError> {
        if cfg.ram_size != ADDRESS_SPACE_SIZE {
            return Err(DeviceError::RamSize { size: cfg.ram_size });
        }
        if cfg.verify_firmware {
            firmware.verify(&Checksums::TUBE_6502)?;
        }
        info!(
            cpu = ?cfg.cpu_model,
            clock_hz = cfg.clock_hz,
            firmware = %firmware.checksums(),
            "tube 6502 powered on"
        );
        let memory = WorkingMemory::filled(cfg.ram_fill);
        let mut dev = Self {
            decoder: AddressDecoder::new(firmware, memory, bridge),
            cfg,
        };
        dev.reset();
        Ok(dev)
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.cfg
    }

    /// Reset keeps working memory; only paging and the bridge are reset.
    pub fn reset(&mut self) {
        self.decoder.reset();
    }

    /// Fresh working memory followed by a reset.
    pub fn power_cycle(&mut self) {
        debug!("tube power cycle");
        self.decoder
            .replace_memory(WorkingMemory::filled(self.cfg.ram_fill));
        self.reset();
    }

    pub fn host_read(&mut self, offset: u8) -> u8 {
        self.decoder.host_read(offset)
    }

    pub fn host_write(&mut self, offset: u8, val: u8) {
        self.decoder.host_write(offset, val);
    }

    /// NMI/IRQ lines the bridge drives toward the processor model.
    pub fn interrupt_lines(&self) -> InterruptLines {
        self.decoder.bridge().interrupt_lines()
    }

    pub fn firmware_state(&self) -> FirmwareState {
        self.decoder.firmware_state()
    }

    pub fn decoder(&self) -> &AddressDecoder<B> {
        &self.decoder
    }

    pub fn decoder_mut(&mut self) -> &mut AddressDecoder<B> {
        &mut self.decoder
    }
}

impl<B: Bridge> Bus for Tube6502<B> {
    fn read_u8(&mut self, addr: u16, mode: AccessMode) -> u8 {
        self.decoder.read_u8(addr, mode)
    }
    fn write_u8(&mut self, addr: u16, val: u8) {
        self.decoder.write_u8(addr, val);
    }
}

pub mod bridge;
pub mod decoder;
pub mod device;
pub mod firmware;
pub mod map;
pub mod memory;
pub mod trace;

pub use bridge::{Bridge, InterruptLines, LatchBridge};
pub use decoder::AddressDecoder;
pub use device::{CpuModel, DeviceConfig, DeviceError, Tube6502};
pub use firmware::{Checksums, Firmware, FirmwareError};
pub use map::{FirmwareState, Region};
pub use memory::{AccessMode, Bus, MemorySizeError, WorkingMemory};

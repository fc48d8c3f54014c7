//! Scripted bus accesses, replayed against a device to produce a trace.
//!
//! Scripts are JSON arrays of accesses:
//! `[{"op":"read","addr":61440}, {"op":"write","addr":512,"value":66}, {"op":"reset"}]`

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bridge::Bridge;
use crate::device::Tube6502;
use crate::map::{FirmwareState, Region};
use crate::memory::{AccessMode, Bus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Access {
    Read {
        addr: u16,
        #[serde(default)]
        inspect: bool,
    },
    Write {
        addr: u16,
        value: u8,
    },
    Reset,
    HostRead {
        offset: u8,
    },
    HostWrite {
        offset: u8,
        value: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub access: Access,
    /// Region the access decoded to; `None` for reset and host-port accesses.
    pub region: Option<Region>,
    /// Byte returned by reads.
    pub value: Option<u8>,
    /// Firmware paging after the access.
    pub firmware: FirmwareState,
}

pub fn parse_script(s: &str) -> Result<Vec<Access>, serde_json::Error> {
    serde_json::from_str(s)
}

pub fn apply<B: Bridge>(dev: &mut Tube6502<B>, access: Access) -> TraceEntry {
    let (region, value) = match access {
        Access::Read { addr, inspect } => {
            let mode = if inspect {
                AccessMode::Inspect
            } else {
                AccessMode::Normal
            };
            let region = dev.decoder().region_of(addr);
            (Some(region), Some(dev.read_u8(addr, mode)))
        }
        Access::Write { addr, value } => {
            let region = dev.decoder().region_of(addr);
            dev.write_u8(addr, value);
            // writes under an active overlay still land in RAM
            let region = match region {
                Region::Firmware => Region::WorkingMemory,
                r => r,
            };
            (Some(region), None)
        }
        Access::Reset => {
            dev.reset();
            (None, None)
        }
        Access::HostRead { offset } => (None, Some(dev.host_read(offset))),
        Access::HostWrite { offset, value } => {
            dev.host_write(offset, value);
            (None, None)
        }
    };
    let entry = TraceEntry {
        access,
        region,
        value,
        firmware: dev.firmware_state(),
    };
    trace!(entry = %entry, "bus access");
    entry
}

pub fn replay<B: Bridge>(dev: &mut Tube6502<B>, script: &[Access]) -> Vec<TraceEntry> {
    script.iter().map(|a| apply(dev, *a)).collect()
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.access {
            Access::Read { addr, inspect } => {
                let tag = if inspect { "peek" } else { "read" };
                write!(f, "{tag:<6} {addr:04x}")?;
            }
            Access::Write { addr, value } => write!(f, "write  {addr:04x} <- {value:02x}")?,
            Access::Reset => write!(f, "reset")?,
            Access::HostRead { offset } => write!(f, "hread  {offset:02x}")?,
            Access::HostWrite { offset, value } => write!(f, "hwrite {offset:02x} <- {value:02x}")?,
        }
        if let Some(v) = self.value {
            write!(f, " = {v:02x}")?;
        }
        if let Some(r) = self.region {
            write!(f, " [{r:?}]")?;
        }
        write!(f, " firmware={:?}", self.firmware)
    }
}

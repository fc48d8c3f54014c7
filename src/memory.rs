use serde::{Deserialize, Serialize};

use crate::map::ADDRESS_SPACE_SIZE;

/// How a read is issued. `Inspect` reads come from debuggers and tracers and
/// must leave machine state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    #[default]
    Normal,
    Inspect,
}

/// Byte-wide bus as seen from the second processor.
pub trait Bus {
    fn read_u8(&mut self, addr: u16, mode: AccessMode) -> u8;
    fn write_u8(&mut self, addr: u16, val: u8);

    /// Little-endian word built from two byte reads; wraps at the top of
    /// the address space.
    fn read_u16_le(&mut self, addr: u16, mode: AccessMode) -> u16 {
        let lo = self.read_u8(addr, mode);
        let hi = self.read_u8(addr.wrapping_add(1), mode);
        u16::from_le_bytes([lo, hi])
    }

    fn peek(&mut self, addr: u16) -> u8 {
        self.read_u8(addr, AccessMode::Inspect)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("working memory must be 65536 bytes, got {len}")]
pub struct MemorySizeError {
    pub len: usize,
}

/// Local RAM of the second processor. Covers the whole address space so
/// every address has a backing byte, including those shadowed by firmware
/// or the bridge.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WorkingMemory {
    mem: Vec<u8>,
}

impl WorkingMemory {
    pub fn new() -> Self {
        Self::filled(0)
    }

    pub fn filled(fill: u8) -> Self {
        Self {
            mem: vec![fill; ADDRESS_SPACE_SIZE],
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.mem
    }
}

impl TryFrom<Vec<u8>> for WorkingMemory {
    type Error = MemorySizeError;

    fn try_from(mem: Vec<u8>) -> Result<Self, Self::Error> {
        if mem.len() != ADDRESS_SPACE_SIZE {
            return Err(MemorySizeError { len: mem.len() });
        }
        Ok(Self { mem })
    }
}

impl From<WorkingMemory> for Vec<u8> {
    fn from(m: WorkingMemory) -> Self {
        m.mem
    }
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkingMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingMemory")
            .field("len", &self.mem.len())
            .finish()
    }
}

impl Bus for WorkingMemory {
    fn read_u8(&mut self, addr: u16, _mode: AccessMode) -> u8 {
        self.mem[addr as usize]
    }
    fn write_u8(&mut self, addr: u16, val: u8) {
        self.mem[addr as usize] = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_memory_uses_fill_value() {
        let mut m = WorkingMemory::filled(0xEA);
        assert_eq!(m.as_slice().len(), 0x1_0000);
        assert_eq!(m.peek(0x0000), 0xEA);
        assert_eq!(m.peek(0xFFFF), 0xEA);
    }

    #[test]
    fn word_read_wraps() {
        let mut m = WorkingMemory::new();
        m.write_u8(0xFFFF, 0x34);
        m.write_u8(0x0000, 0x12);
        assert_eq!(m.read_u16_le(0xFFFF, AccessMode::Normal), 0x1234);
    }

    #[test]
    fn rejects_short_snapshot() {
        let err = serde_json::from_str::<WorkingMemory>("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("got 3"));
        assert!(WorkingMemory::try_from(vec![0u8; 0x8000]).is_err());
    }

    #[test]
    fn snapshot_restores_contents() {
        let mut m = WorkingMemory::new();
        m.write_u8(0x8000, 0x5A);
        let json = serde_json::to_string(&m).unwrap();
        let mut back: WorkingMemory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice().len(), 0x1_0000);
        assert_eq!(back.read_u8(0x8000, AccessMode::Normal), 0x5A);
    }
}

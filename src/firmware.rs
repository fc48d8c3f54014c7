use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::map::FIRMWARE_SIZE;

#[derive(thiserror::Error, Debug)]
pub enum FirmwareError {
    #[error("firmware image must be 4096 bytes, got {len}")]
    Size { len: usize },
    #[error("firmware checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: Checksums, actual: Checksums },
    #[error("failed to read firmware image: {0}")]
    Io(#[from] std::io::Error),
}

/// CRC32 + SHA-1 pair identifying a firmware image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    pub crc32: u32,
    pub sha1: [u8; 20],
}

impl Checksums {
    /// Stock Acorn 6502 second processor boot ROM (`6502tube.rom`).
    pub const TUBE_6502: Checksums = Checksums {
        crc32: 0x98b5_fe42,
        sha1: [
            0x33, 0x82, 0x69, 0xd0, 0x3c, 0xf6, 0xbf, 0xa2, 0x8e, 0x09, 0xd1, 0x65, 0x1c, 0x27,
            0x3e, 0xa5, 0x33, 0x94, 0x32, 0x3b,
        ],
    };

    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha1::digest(bytes);
        let mut sha1 = [0u8; 20];
        sha1.copy_from_slice(&digest);
        Self {
            crc32: crc32fast::hash(bytes),
            sha1,
        }
    }
}

impl fmt::Display for Checksums {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crc32:{:08x} sha1:", self.crc32)?;
        for b in self.sha1 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Boot firmware overlaid on the top 4 KiB while paging is active.
#[derive(Clone)]
pub struct Firmware {
    rom: Box<[u8]>,
}

impl Firmware {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FirmwareError> {
        if bytes.len() != FIRMWARE_SIZE {
            return Err(FirmwareError::Size { len: bytes.len() });
        }
        Ok(Self {
            rom: bytes.into_boxed_slice(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FirmwareError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Byte at `offset` within the window; offsets wrap modulo the image size.
    pub fn byte(&self, offset: usize) -> u8 {
        self.rom[offset % FIRMWARE_SIZE]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.rom
    }

    pub fn checksums(&self) -> Checksums {
        Checksums::of(&self.rom)
    }

    pub fn verify(&self, expected: &Checksums) -> Result<(), FirmwareError> {
        let actual = self.checksums();
        if actual != *expected {
            return Err(FirmwareError::ChecksumMismatch {
                expected: *expected,
                actual,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Firmware")
            .field("len", &self.rom.len())
            .finish()
    }
}

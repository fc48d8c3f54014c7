use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterruptLines: u8 {
const NMI = 1 << 0; // non-maskable, toward the second processor
const IRQ = 1 << 1; // maskable, toward the second processor
}
}

/// The peripheral shared between host and second processor. Each side talks
/// to it through its own port; the decoder only forwards.
pub trait Bridge {
    /// Processor-side read. `offset` is relative to the bridge window (0..16).
    fn processor_read(&mut self, offset: u8) -> u8;
    fn processor_write(&mut self, offset: u8, val: u8);
    fn host_read(&mut self, offset: u8) -> u8;
    fn host_write(&mut self, offset: u8, val: u8);
    fn reset(&mut self);
    /// Lines the bridge currently drives toward the second processor.
    fn interrupt_lines(&self) -> InterruptLines;
}

const CHANNELS: usize = 4;
const STATUS_DATA_AVAILABLE: u8 = 0x80;
const STATUS_NOT_FULL: u8 = 0x40;

/// Register-file stand-in for the real ULA: four channels, each a
/// status/data pair with one latch per direction. No protocol framing.
#[derive(Debug, Clone, Default)]
pub struct LatchBridge {
    to_processor: [Option<u8>; CHANNELS],
    to_host: [Option<u8>; CHANNELS],
}

impl LatchBridge {
    pub fn new() -> Self {
        Self::default()
    }

    // (channel, is_data_register); both ports mirror every 8 bytes
    fn decode(offset: u8) -> (usize, bool) {
        let reg = offset & 0x07;
        ((reg >> 1) as usize, reg & 1 == 1)
    }

    fn status(incoming: Option<u8>, outgoing: Option<u8>) -> u8 {
        let mut s = 0;
        if incoming.is_some() {
            s |= STATUS_DATA_AVAILABLE;
        }
        if outgoing.is_none() {
            s |= STATUS_NOT_FULL;
        }
        s
    }
}

impl Bridge for LatchBridge {
    fn processor_read(&mut self, offset: u8) -> u8 {
        let (ch, data) = Self::decode(offset);
        if data {
            self.to_processor[ch].take().unwrap_or(0)
        } else {
            Self::status(self.to_processor[ch], self.to_host[ch])
        }
    }

    fn processor_write(&mut self, offset: u8, val: u8) {
        let (ch, data) = Self::decode(offset);
        if data {
            self.to_host[ch] = Some(val);
        }
    }

    fn host_read(&mut self, offset: u8) -> u8 {
        let (ch, data) = Self::decode(offset);
        if data {
            self.to_host[ch].take().unwrap_or(0)
        } else {
            Self::status(self.to_host[ch], self.to_processor[ch])
        }
    }

    fn host_write(&mut self, offset: u8, val: u8) {
        let (ch, data) = Self::decode(offset);
        if data {
            self.to_processor[ch] = Some(val);
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn interrupt_lines(&self) -> InterruptLines {
        let mut lines = InterruptLines::empty();
        if self.to_processor[2].is_some() {
            lines |= InterruptLines::NMI;
        }
        if [0, 1, 3].iter().any(|&ch| self.to_processor[ch].is_some()) {
            lines |= InterruptLines::IRQ;
        }
        lines
    }
}

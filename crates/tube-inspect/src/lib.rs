//! Read-only views of a tube 6502 address space. Everything here reads with
//! `AccessMode::Inspect`, so dumping a live machine never pages firmware out.

use anyhow::Result;
use serde::Serialize;

use tube6502_rs::map::{IRQ_VECTOR, NMI_VECTOR, RESET_VECTOR};
use tube6502_rs::{AccessMode, Bridge, Bus, Region, Tube6502};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: u16,
    pub end: u16, // inclusive
    pub region: Region,
}

/// Contiguous runs of the current address map.
pub fn region_map<B: Bridge>(dev: &Tube6502<B>) -> Vec<Span> {
    let dec = dev.decoder();
    let mut spans: Vec<Span> = Vec::new();
    for addr in 0..=u16::MAX {
        let region = dec.region_of(addr);
        match spans.last_mut() {
            Some(s) if s.region == region => s.end = addr,
            _ => spans.push(Span { start: addr, end: addr, region }),
        }
    }
    spans
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub addr: u16,
    pub bytes: Vec<u8>,
}

/// Hexdump rows of 16 bytes covering `start..=end`.
pub fn dump<M: Bus>(bus: &mut M, start: u16, end: u16) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut addr = start as u32;
    while addr <= end as u32 {
        let row_end = (addr + 15).min(end as u32);
        let bytes = (addr..=row_end).map(|a| bus.peek(a as u16)).collect();
        rows.push(Row { addr: addr as u16, bytes });
        addr = row_end + 1;
    }
    rows
}

pub fn format_row(row: &Row) -> String {
    let hex: Vec<String> = row.bytes.iter().map(|b| format!("{b:02x}")).collect();
    let ascii: String = row
        .bytes
        .iter()
        .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
        .collect();
    format!("{:04x}: {:<47}  {}", row.addr, hex.join(" "), ascii)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vectors {
    pub nmi: u16,
    pub reset: u16,
    pub irq: u16,
}

pub fn vectors<M: Bus>(bus: &mut M) -> Vectors {
    Vectors {
        nmi: bus.read_u16_le(NMI_VECTOR, AccessMode::Inspect),
        reset: bus.read_u16_le(RESET_VECTOR, AccessMode::Inspect),
        irq: bus.read_u16_le(IRQ_VECTOR, AccessMode::Inspect),
    }
}

pub fn parse_u16(s: &str) -> Result<u16> {
    let s = s.trim();
    if let Some(hex) = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
    {
        Ok(u16::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u16>()?)
    }
}

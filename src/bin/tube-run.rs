use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tube6502_rs::trace::{parse_script, replay, TraceEntry};
use tube6502_rs::{Checksums, DeviceConfig, Firmware, LatchBridge, Tube6502};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, serde::Serialize)]
struct Report<'a> {
    firmware: Checksums,
    trace: &'a [TraceEntry],
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Replay a bus access script against the tube 6502 address decoder"
)]
struct Opts {
    /// Firmware image (4096 bytes)
    #[arg(value_name = "ROMFILE")]
    firmware: String,
    /// JSON access script
    #[arg(value_name = "SCRIPT")]
    script: String,
    /// Device config (JSON); defaults to the stock board
    #[arg(long, value_name = "FILE")]
    config: Option<String>,
    /// Skip the stock firmware checksum check
    #[arg(long)]
    no_verify: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let mut cfg = match &opts.config {
        Some(path) => DeviceConfig::load(path)?,
        None => DeviceConfig::default(),
    };
    if opts.no_verify {
        cfg.verify_firmware = false;
    }

    let firmware = Firmware::load(&opts.firmware)
        .with_context(|| format!("loading firmware {}", opts.firmware))?;
    let txt = std::fs::read_to_string(&opts.script)
        .with_context(|| format!("reading script {}", opts.script))?;
    let script = parse_script(&txt)?;

    let checksums = firmware.checksums();
    let mut dev = Tube6502::new(cfg, firmware, LatchBridge::new())?;
    let entries = replay(&mut dev, &script);

    match opts.format {
        OutputFormat::Text => {
            for e in &entries {
                println!("{e}");
            }
        }
        OutputFormat::Json => {
            let report = Report {
                firmware: checksums,
                trace: &entries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

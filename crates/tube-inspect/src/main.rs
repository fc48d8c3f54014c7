use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tube6502_rs::trace::{parse_script, replay};
use tube6502_rs::{DeviceConfig, Firmware, LatchBridge, Tube6502};
use tube_inspect::{dump, format_row, parse_u16, region_map, vectors};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tube 6502 address space inspector", long_about=None)]
struct Cli {
    /// Firmware image (4096 bytes)
    #[arg(value_name = "ROMFILE")]
    firmware: String,
    /// Skip the stock firmware checksum check
    #[arg(long)]
    no_verify: bool,
    /// Apply a JSON access script before inspecting
    #[arg(long, value_name = "FILE")]
    script: Option<String>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which region serves each address range
    Map,
    /// Hexdump [start, end] (hex or dec, inclusive)
    Dump { start: String, end: String },
    /// Show the NMI/RESET/IRQ vectors as the processor would see them
    Vectors,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let firmware = Firmware::load(&cli.firmware)
        .with_context(|| format!("loading firmware {}", cli.firmware))?;
    let cfg = DeviceConfig {
        verify_firmware: !cli.no_verify,
        ..DeviceConfig::default()
    };
    let mut dev = Tube6502::new(cfg, firmware, LatchBridge::new())?;

    if let Some(path) = &cli.script {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {path}"))?;
        replay(&mut dev, &parse_script(&txt)?);
    }

    match cli.cmd {
        Command::Map => {
            let spans = region_map(&dev);
            match cli.format {
                OutputFormat::Text => {
                    println!("firmware: {:?}", dev.firmware_state());
                    for s in &spans {
                        println!("{:04x}-{:04x} {:?}", s.start, s.end, s.region);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&spans)?),
            }
        }
        Command::Dump { start, end } => {
            let (start, end) = (parse_u16(&start)?, parse_u16(&end)?);
            anyhow::ensure!(start <= end, "start must not exceed end");
            let rows = dump(&mut dev, start, end);
            match cli.format {
                OutputFormat::Text => {
                    for r in &rows {
                        println!("{}", format_row(r));
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }
        }
        Command::Vectors => {
            let v = vectors(&mut dev);
            match cli.format {
                OutputFormat::Text => {
                    println!("nmi   {:04x}", v.nmi);
                    println!("reset {:04x}", v.reset);
                    println!("irq   {:04x}", v.irq);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&v)?),
            }
        }
    }
    Ok(())
}

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use vid_cli::{parse_mode, probe, ProbeRequest};
use vid_core::logging::{LogConfig, LogLevel};

#[derive(Parser)]
#[command(name = "vidprobe", about = "Probe a framebuffer video driver")]
struct Args {
    /// Driver to use (default: first available)
    #[arg(long)]
    driver: Option<String>,

    /// JSON display configuration for the ogc driver
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mode to set, e.g. 640x480
    #[arg(long, value_parser = parse_mode)]
    mode: Option<(u32, u32)>,

    /// Bits per pixel for --mode
    #[arg(long, default_value_t = 16)]
    bpp: u8,

    #[arg(long, default_value_t = false)]
    fullscreen: bool,

    /// Fill the framebuffer with this byte after the mode set
    #[arg(long)]
    fill: Option<u8>,

    /// Write the raw framebuffer to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Driver log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Send driver logs to a file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let level = LogLevel::from_str(&args.log_level)
        .ok_or_else(|| anyhow!("Unknown log level: {}", args.log_level))?;
    let config = LogConfig::global();
    config.set_global_level(level);
    if let Some(path) = args.log_file.clone() {
        config.set_log_file(path)?;
    }

    let request = ProbeRequest {
        driver: args.driver,
        config: args.config,
        mode: args.mode,
        bpp: args.bpp,
        fullscreen: args.fullscreen,
        fill: args.fill,
        dump: args.dump,
    };

    match probe(&request) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            log::error!("probe failed: {:#}", e);
            Err(e)
        }
    }
}

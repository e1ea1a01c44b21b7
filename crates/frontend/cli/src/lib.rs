//! Headless probe for the video drivers: boot a driver, list its modes,
//! optionally set one and report the resulting screen surface.

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use vid_core::{SurfaceFlags, VideoBootStrap, VideoSubsystem};
use vid_ogc::{OgcConfig, OgcVideo};

/// Drivers compiled into the probe, in preference order.
pub const BOOTSTRAPS: &[VideoBootStrap] = &[vid_ogc::BOOTSTRAP];

#[derive(Debug, Clone, Default)]
pub struct ProbeRequest {
    pub driver: Option<String>,
    pub config: Option<PathBuf>,
    pub mode: Option<(u32, u32)>,
    pub bpp: u8,
    pub fullscreen: bool,
    /// Byte written over the whole framebuffer after the mode set.
    pub fill: Option<u8>,
    /// Raw framebuffer dump destination.
    pub dump: Option<PathBuf>,
}

/// Parse "WIDTHxHEIGHT".
pub fn parse_mode(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h = h.trim().parse().map_err(|e| format!("bad height '{}': {}", h, e))?;
    Ok((w, h))
}

/// Open the requested driver. A config file is only meaningful for the
/// ogc driver, which is then built directly from it.
pub fn open_subsystem(driver: Option<&str>, config: Option<&Path>) -> Result<VideoSubsystem> {
    match config {
        Some(path) => {
            if let Some(name) = driver.filter(|n| !n.eq_ignore_ascii_case(vid_ogc::DRIVER_NAME)) {
                bail!("--config applies to the '{}' driver, not '{}'", vid_ogc::DRIVER_NAME, name);
            }
            let config = OgcConfig::try_load_from(path)
                .with_context(|| format!("loading {}", path.display()))?;
            let device = OgcVideo::with_config(config)?;
            Ok(VideoSubsystem::from_device(Box::new(device))?)
        }
        None => Ok(VideoSubsystem::init(BOOTSTRAPS, driver)?),
    }
}

pub fn probe(req: &ProbeRequest) -> Result<Value> {
    let mut video = open_subsystem(req.driver.as_deref(), req.config.as_deref())?;

    let rects = video.list_modes(None, SurfaceFlags::empty());
    let mode_rects = serde_json::to_value(rects)?;
    let modes: Vec<String> = rects.iter().map(|m| format!("{}x{}", m.w, m.h)).collect();
    log::info!("{}: {} mode(s): {}", video.driver_name(), modes.len(), modes.join(", "));

    let mut report = json!({
        "driver": video.driver_name(),
        "native_bpp": video.vformat().bits_per_pixel,
        "capabilities": format!("{:?}", video.capabilities()),
        "modes": modes,
        "mode_rects": mode_rects,
    });

    if let Some((w, h)) = req.mode {
        let flags = if req.fullscreen {
            SurfaceFlags::FULLSCREEN
        } else {
            SurfaceFlags::empty()
        };
        video
            .set_video_mode(w, h, req.bpp, flags)
            .with_context(|| format!("setting {}x{}x{}", w, h, req.bpp))?;

        if let Some(byte) = req.fill {
            video.pixels_mut()?.fill(byte);
            video.flip();
        }

        let pixels = video.pixels().unwrap_or_default();
        let checksum: u64 = pixels.iter().map(|&b| u64::from(b)).sum();
        if let Some(path) = &req.dump {
            std::fs::write(path, pixels).with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} bytes to {}", pixels.len(), path.display());
        }

        report["surface"] = video.screen().describe();
        report["checksum"] = json!(checksum);
    }

    video.quit();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!(parse_mode("640x480"), Ok((640, 480)));
        assert_eq!(parse_mode("320X240"), Ok((320, 240)));
        assert!(parse_mode("640").is_err());
        assert!(parse_mode("ax480").is_err());
    }
}

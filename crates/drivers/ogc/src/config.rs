use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vid_core::logging::{log, LogCategory, LogLevel};
use vid_core::types::Rect;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Full-size mode must be at least 2x2, got {width}x{height}")]
    ModeTooSmall { width: u32, height: u32 },
    #[error("Native depth must be 8, 16 or 24 bpp, got {0}")]
    UnsupportedNativeDepth(u8),
}

/// Display parameters for the console video interface.
///
/// `full_width` is the external framebuffer width and `full_height` its
/// line count as reported by the video encoder for the current TV mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgcConfig {
    #[serde(default = "default_full_width")]
    pub full_width: u32,
    #[serde(default = "default_full_height")]
    pub full_height: u32,
    /// Depth reported as the native format at init.
    #[serde(default = "default_native_bpp")]
    pub native_bpp: u8,
}

fn default_full_width() -> u32 {
    640
}

fn default_full_height() -> u32 {
    480
}

fn default_native_bpp() -> u8 {
    16
}

impl Default for OgcConfig {
    fn default() -> Self {
        Self {
            full_width: default_full_width(),
            full_height: default_full_height(),
            native_bpp: default_native_bpp(),
        }
    }
}

impl OgcConfig {
    pub fn full_mode(&self) -> Rect {
        Rect::mode(self.full_width, self.full_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.full_width < 2 || self.full_height < 2 {
            return Err(ConfigError::ModeTooSmall {
                width: self.full_width,
                height: self.full_height,
            });
        }
        if !crate::SUPPORTED_DEPTHS.contains(&self.native_bpp) {
            return Err(ConfigError::UnsupportedNativeDepth(self.native_bpp));
        }
        Ok(())
    }

    /// `ogc_video.json` next to the executable.
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("ogc_video.json");
        path
    }

    /// Load from the default path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file gives the defaults silently; an
    /// unreadable or invalid one gives the defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log(LogCategory::Driver, LogLevel::Warn, || {
                    format!(
                        "Warning: failed to load {}: {}. Using defaults.",
                        path.display(),
                        e
                    )
                });
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

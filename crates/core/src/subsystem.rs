//! Host video subsystem.
//!
//! Owns one [`VideoDevice`] and the screen [`Surface`] and sequences calls
//! into the driver: init, then any number of mode queries and mode sets,
//! then quit. Every failure is also written to the last-error slot.

use crate::error::{self, VideoError};
use crate::logging::{log, LogCategory, LogLevel};
use crate::surface::{PixelFormat, Surface, SurfaceFlags};
use crate::types::{Color, Rect};
use crate::video::{Capabilities, VideoBootStrap, VideoDevice};

pub struct VideoSubsystem {
    device: Box<dyn VideoDevice>,
    vformat: PixelFormat,
    screen: Surface,
    active: bool,
}

impl VideoSubsystem {
    /// Create and initialize a device from `bootstraps`.
    ///
    /// With `driver_name` set, only that driver is tried. Otherwise the first
    /// available driver in list order wins.
    pub fn init(bootstraps: &[VideoBootStrap], driver_name: Option<&str>) -> Result<Self, VideoError> {
        let candidates: Vec<&VideoBootStrap> = match driver_name {
            Some(name) => bootstraps
                .iter()
                .filter(|b| b.name.eq_ignore_ascii_case(name))
                .collect(),
            None => bootstraps.iter().collect(),
        };

        let Some(bootstrap) = candidates.into_iter().find(|b| (b.available)()) else {
            let wanted = driver_name.unwrap_or("any").to_string();
            return Err(error::report(VideoError::NoDriver(wanted)));
        };

        log(LogCategory::Driver, LogLevel::Info, || {
            format!("Video: using driver '{}' ({})", bootstrap.name, bootstrap.desc)
        });

        let device = (bootstrap.create)(0).map_err(error::report)?;
        Self::from_device(device)
    }

    /// Initialize an already constructed device.
    pub fn from_device(mut device: Box<dyn VideoDevice>) -> Result<Self, VideoError> {
        device.init_os_keymap();

        let mut vformat = PixelFormat::default();
        device.video_init(&mut vformat).map_err(error::report)?;

        log(LogCategory::Driver, LogLevel::Debug, || {
            format!(
                "Video: '{}' native format {} bpp, capabilities {:?}",
                device.name(),
                vformat.bits_per_pixel,
                device.capabilities()
            )
        });

        Ok(Self {
            device,
            vformat,
            screen: Surface::new(),
            active: true,
        })
    }

    pub fn driver_name(&self) -> &str {
        self.device.name()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.device.capabilities()
    }

    /// Native format reported by the driver at init.
    pub fn vformat(&self) -> &PixelFormat {
        &self.vformat
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Modes offered for `format` (native format when `None`), largest first.
    pub fn list_modes(&self, format: Option<&PixelFormat>, flags: SurfaceFlags) -> &[Rect] {
        self.device
            .list_modes(format.unwrap_or(&self.vformat), flags)
    }

    pub fn set_video_mode(
        &mut self,
        width: u32,
        height: u32,
        bpp: u8,
        flags: SurfaceFlags,
    ) -> Result<&Surface, VideoError> {
        if !self.active {
            return Err(error::report(VideoError::NotInitialized));
        }

        log(LogCategory::Modes, LogLevel::Debug, || {
            format!(
                "Video: set mode {}x{}x{} flags {:#010X}",
                width,
                height,
                bpp,
                flags.bits()
            )
        });

        self.device
            .set_video_mode(&mut self.screen, width, height, bpp, flags)
            .map_err(|e| {
                log(LogCategory::Modes, LogLevel::Warn, || format!("Video: {}", e));
                error::report(e)
            })?;

        Ok(&self.screen)
    }

    pub fn screen(&self) -> &Surface {
        &self.screen
    }

    /// Pixels of the screen surface, if a mode is set.
    pub fn pixels(&self) -> Option<&[u8]> {
        if self.screen.has_pixels() {
            self.device.framebuffer()
        } else {
            None
        }
    }

    pub fn pixels_mut(&mut self) -> Result<&mut [u8], VideoError> {
        if !self.screen.has_pixels() {
            return Err(error::report(VideoError::NoVideoMode));
        }
        self.device
            .framebuffer_mut()
            .ok_or_else(|| error::report(VideoError::NoVideoMode))
    }

    pub fn set_colors(&mut self, first: usize, colors: &[Color]) -> bool {
        self.device.set_colors(first, colors)
    }

    pub fn update_rects(&mut self, rects: &[Rect]) {
        self.device.update_rects(rects);
    }

    /// Repaint the whole screen.
    pub fn flip(&mut self) {
        let full = Rect::mode(self.screen.w, self.screen.h);
        self.device.update_rects(&[full]);
    }

    /// Ask the driver for a hardware surface. Drivers without one report
    /// `Unsupported` and callers fall back to system memory.
    pub fn alloc_hw_surface(&mut self, surface: &mut Surface) -> Result<(), VideoError> {
        self.device.alloc_hw_surface(surface).map_err(error::report)
    }

    pub fn free_hw_surface(&mut self, surface: &mut Surface) {
        if surface.flags.contains(SurfaceFlags::HWSURFACE) {
            self.device.free_hw_surface(surface);
        }
    }

    /// Lock a surface for direct pixel access. Only hardware surfaces need
    /// the driver's involvement.
    pub fn lock_surface(&mut self, surface: &mut Surface) -> Result<(), VideoError> {
        if surface.flags.contains(SurfaceFlags::HWSURFACE) {
            self.device.lock_hw_surface(surface).map_err(error::report)
        } else {
            Ok(())
        }
    }

    pub fn unlock_surface(&mut self, surface: &mut Surface) {
        if surface.flags.contains(SurfaceFlags::HWSURFACE) {
            self.device.unlock_hw_surface(surface);
        }
    }

    /// Lock the screen surface through the driver.
    pub fn lock_screen(&mut self) -> Result<(), VideoError> {
        self.device
            .lock_hw_surface(&mut self.screen)
            .map_err(error::report)
    }

    pub fn unlock_screen(&mut self) {
        self.device.unlock_hw_surface(&mut self.screen);
    }

    pub fn set_caption(&mut self, title: &str, icon: &str) -> Result<(), VideoError> {
        self.device.set_caption(title, icon).map_err(error::report)
    }

    pub fn pump_events(&mut self) {
        self.device.pump_events();
    }

    /// Release the screen. Safe to call more than once.
    pub fn quit(&mut self) {
        if !self.active {
            return;
        }
        self.device.video_quit(&mut self.screen);
        self.active = false;

        log(LogCategory::Driver, LogLevel::Info, || {
            format!("Video: '{}' shut down", self.device.name())
        });
    }
}

impl Drop for VideoSubsystem {
    fn drop(&mut self) {
        self.quit();
    }
}

//! Framebuffer video driver for the GameCube/Wii display.
//!
//! The display hardware scans out a single external framebuffer, so this
//! driver only knows two modes (the configured full size and half of it),
//! keeps one 32-byte aligned buffer in system memory and leaves every
//! accelerated path to the host's software fallback.

pub mod config;
pub mod events;
pub mod modes;

use vid_core::buffer::AlignedBuffer;
use vid_core::logging::{log, LogCategory, LogLevel};
use vid_core::types::{Color, Rect};
use vid_core::{
    Capabilities, EventPump, PixelFormat, Surface, SurfaceFlags, VideoBootStrap, VideoDevice,
    VideoError,
};

pub use config::{ConfigError, OgcConfig};
pub use events::NullEventPump;
pub use modes::ModeList;

pub const DRIVER_NAME: &str = "libogc";

/// Depths a mode set accepts.
pub const SUPPORTED_DEPTHS: [u8; 3] = [8, 16, 24];

pub const BOOTSTRAP: VideoBootStrap = VideoBootStrap {
    name: DRIVER_NAME,
    desc: "SDL libogc video driver",
    available,
    create,
};

fn available() -> bool {
    true
}

fn create(_index: usize) -> Result<Box<dyn VideoDevice>, VideoError> {
    let device = OgcVideo::with_config(OgcConfig::load())?;
    Ok(Box::new(device))
}

/// Framebuffer state owned by the device.
#[derive(Debug, Default)]
struct PrivateData {
    buffer: Option<AlignedBuffer>,
    w: u32,
    h: u32,
}

pub struct OgcVideo {
    config: OgcConfig,
    modes: ModeList,
    hidden: PrivateData,
    events: Box<dyn EventPump>,
}

impl OgcVideo {
    pub fn new() -> Self {
        Self::from_valid_config(OgcConfig::default())
    }

    pub fn with_config(config: OgcConfig) -> Result<Self, VideoError> {
        config
            .validate()
            .map_err(|e| VideoError::InvalidConfig(e.to_string()))?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: OgcConfig) -> Self {
        Self {
            modes: ModeList::from_full(config.full_mode()),
            config,
            hidden: PrivateData::default(),
            events: Box::new(NullEventPump::new()),
        }
    }

    /// Replace the input collaborator.
    pub fn with_event_pump(mut self, events: Box<dyn EventPump>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &OgcConfig {
        &self.config
    }

    pub fn modes(&self) -> &ModeList {
        &self.modes
    }

    /// Size of the live framebuffer in bytes.
    pub fn buffer_len(&self) -> Option<usize> {
        self.hidden.buffer.as_ref().map(AlignedBuffer::len)
    }

    /// Dimensions of the current mode, (0, 0) when none is set.
    pub fn current_size(&self) -> (u32, u32) {
        (self.hidden.w, self.hidden.h)
    }

    fn release_buffer(&mut self) {
        if let Some(old) = self.hidden.buffer.take() {
            log(LogCategory::Memory, LogLevel::Debug, || {
                format!(
                    "OGC: released {}x{} framebuffer ({} bytes)",
                    self.hidden.w,
                    self.hidden.h,
                    old.len()
                )
            });
        }
        self.hidden.w = 0;
        self.hidden.h = 0;
    }
}

impl Default for OgcVideo {
    fn default() -> Self {
        Self::new()
    }
}

/// Row pitch and total size of a `width` x `height` frame.
fn frame_geometry(width: u32, height: u32, bytes_per_pixel: u32) -> Option<(u32, usize)> {
    let pitch = width.checked_mul(bytes_per_pixel)?;
    let len = usize::try_from(pitch)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?;
    Some((pitch, len))
}

impl VideoDevice for OgcVideo {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::HW_SURFACE_OPS | Capabilities::EVENTS
    }

    fn video_init(&mut self, vformat: &mut PixelFormat) -> Result<(), VideoError> {
        self.modes = ModeList::from_full(self.config.full_mode());
        *vformat = PixelFormat::new(self.config.native_bpp, 0, 0, 0, 0)?;
        self.release_buffer();

        log(LogCategory::Driver, LogLevel::Info, || {
            let full = self.modes.full();
            let half = self.modes.half();
            format!(
                "OGC: modes {}x{} and {}x{}, native {} bpp",
                full.w, full.h, half.w, half.h, vformat.bits_per_pixel
            )
        });
        Ok(())
    }

    fn list_modes(&self, _format: &PixelFormat, _flags: SurfaceFlags) -> &[Rect] {
        self.modes.as_slice()
    }

    fn set_video_mode(
        &mut self,
        current: &mut Surface,
        width: u32,
        height: u32,
        bpp: u8,
        flags: SurfaceFlags,
    ) -> Result<(), VideoError> {
        // Reject the request before touching the live buffer.
        let mode = self
            .modes
            .find_exact(width, height)
            .ok_or(VideoError::UnsupportedMode { width, height })?;
        if !SUPPORTED_DEPTHS.contains(&bpp) {
            return Err(VideoError::UnsupportedDepth(bpp));
        }

        let bytes_per_pixel = u32::from(bpp / 8);
        let alloc_failed = VideoError::BufferAllocation { width, height, bpp };

        current.unbind_pixels();
        current.flags = SurfaceFlags::empty();
        current.w = 0;
        current.h = 0;
        current.pitch = 0;
        self.release_buffer();

        let (pitch, len) = frame_geometry(mode.w, mode.h, bytes_per_pixel).ok_or_else(|| {
            log(LogCategory::Memory, LogLevel::Error, || {
                format!("OGC: {}x{}x{} framebuffer size overflows", width, height, bpp)
            });
            alloc_failed.clone()
        })?;
        let buffer = AlignedBuffer::framebuffer(len).map_err(|e| {
            log(LogCategory::Memory, LogLevel::Error, || {
                format!("OGC: {}x{}x{}: {}", width, height, bpp, e)
            });
            alloc_failed
        })?;

        // Unreachable for validated depths. If it ever fails, `buffer`
        // drops here and returns to the allocator.
        current
            .realloc_format(bpp, 0, 0, 0, 0)
            .map_err(|_| VideoError::PixelFormat)?;

        current.flags =
            SurfaceFlags::DOUBLEBUF | (flags & (SurfaceFlags::FULLSCREEN | SurfaceFlags::HWPALETTE));
        current.w = width;
        current.h = height;
        current.pitch = pitch;
        current.bind_pixels(&buffer);

        log(LogCategory::Memory, LogLevel::Debug, || {
            format!(
                "OGC: {}x{}x{} framebuffer at {:p}, {} bytes, pitch {}",
                width,
                height,
                bpp,
                buffer.as_ptr(),
                len,
                pitch
            )
        });

        self.hidden = PrivateData {
            buffer: Some(buffer),
            w: width,
            h: height,
        };
        Ok(())
    }

    fn set_colors(&mut self, first: usize, colors: &[Color]) -> bool {
        log(LogCategory::Stubs, LogLevel::Trace, || {
            format!("OGC: ignoring {} palette entries from {}", colors.len(), first)
        });
        true
    }

    fn update_rects(&mut self, _rects: &[Rect]) {}

    fn video_quit(&mut self, screen: &mut Surface) {
        screen.unbind_pixels();
        self.release_buffer();
    }

    fn framebuffer(&self) -> Option<&[u8]> {
        self.hidden.buffer.as_ref().map(AlignedBuffer::as_slice)
    }

    fn framebuffer_mut(&mut self) -> Option<&mut [u8]> {
        self.hidden.buffer.as_mut().map(AlignedBuffer::as_mut_slice)
    }

    // Only the primary framebuffer exists.
    fn alloc_hw_surface(&mut self, _surface: &mut Surface) -> Result<(), VideoError> {
        log(LogCategory::Stubs, LogLevel::Debug, || {
            "OGC: hardware surface requested, falling back to system memory".to_string()
        });
        Err(VideoError::Unsupported("hardware surfaces"))
    }

    fn lock_hw_surface(&mut self, _surface: &mut Surface) -> Result<(), VideoError> {
        Ok(())
    }

    fn unlock_hw_surface(&mut self, _surface: &mut Surface) {}

    fn free_hw_surface(&mut self, _surface: &mut Surface) {}

    fn init_os_keymap(&mut self) {
        self.events.init_os_keymap();
    }

    fn pump_events(&mut self) {
        self.events.pump_events();
    }
}

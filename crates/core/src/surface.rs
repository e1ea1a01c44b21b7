//! The generic surface record and its pixel format.
//!
//! A `Surface` is owned by the host. Drivers fill in its geometry and format
//! during a mode set and bind it to memory they own; the surface only records
//! where that memory is, it never frees it.

use bitflags::bitflags;
use serde_json::{json, Value};

use crate::buffer::AlignedBuffer;
use crate::error::VideoError;

bitflags! {
    /// Surface and mode-request flags. Values follow the classic video API.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceFlags: u32 {
        const HWSURFACE = 0x0000_0001;
        const OPENGL = 0x0000_0002;
        const ASYNCBLIT = 0x0000_0004;
        const RESIZABLE = 0x0000_0010;
        const NOFRAME = 0x0000_0020;
        const ANYFORMAT = 0x1000_0000;
        const HWPALETTE = 0x2000_0000;
        const DOUBLEBUF = 0x4000_0000;
        const FULLSCREEN = 0x8000_0000;
    }
}

impl SurfaceFlags {
    /// Plain system-memory surface.
    pub const SWSURFACE: SurfaceFlags = SurfaceFlags::empty();
}

/// Pixel layout of a surface. All-zero masks mean no channel layout is
/// defined (indexed or driver-specific).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelFormat {
    pub bits_per_pixel: u8,
    pub bytes_per_pixel: u8,
    pub rmask: u32,
    pub gmask: u32,
    pub bmask: u32,
    pub amask: u32,
}

impl PixelFormat {
    pub fn new(bpp: u8, rmask: u32, gmask: u32, bmask: u32, amask: u32) -> Result<Self, VideoError> {
        if bpp == 0 || bpp > 32 {
            return Err(VideoError::PixelFormat);
        }
        Ok(Self {
            bits_per_pixel: bpp,
            bytes_per_pixel: bpp.div_ceil(8),
            rmask,
            gmask,
            bmask,
            amask,
        })
    }

    pub fn has_channel_layout(&self) -> bool {
        (self.rmask | self.gmask | self.bmask | self.amask) != 0
    }
}

/// Location of the memory a surface's pixels live in. The memory itself
/// belongs to whoever bound it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBinding {
    pub addr: usize,
    pub len: usize,
}

impl PixelBinding {
    pub fn of(buffer: &AlignedBuffer) -> Self {
        Self {
            addr: buffer.as_ptr() as usize,
            len: buffer.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
    pub flags: SurfaceFlags,
    pub format: PixelFormat,
    pub w: u32,
    pub h: u32,
    /// Bytes per row.
    pub pitch: u32,
    pixels: Option<PixelBinding>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pixel format. On failure the old format is kept.
    pub fn realloc_format(
        &mut self,
        bpp: u8,
        rmask: u32,
        gmask: u32,
        bmask: u32,
        amask: u32,
    ) -> Result<(), VideoError> {
        self.format = PixelFormat::new(bpp, rmask, gmask, bmask, amask)?;
        Ok(())
    }

    pub fn bind_pixels(&mut self, buffer: &AlignedBuffer) {
        self.pixels = Some(PixelBinding::of(buffer));
    }

    pub fn unbind_pixels(&mut self) -> Option<PixelBinding> {
        self.pixels.take()
    }

    pub fn pixels(&self) -> Option<PixelBinding> {
        self.pixels
    }

    pub fn has_pixels(&self) -> bool {
        self.pixels.is_some()
    }

    /// Byte size implied by the geometry.
    pub fn byte_len(&self) -> usize {
        self.pitch as usize * self.h as usize
    }

    /// JSON summary for diagnostics.
    pub fn describe(&self) -> Value {
        json!({
            "width": self.w,
            "height": self.h,
            "pitch": self.pitch,
            "bits_per_pixel": self.format.bits_per_pixel,
            "bytes_per_pixel": self.format.bytes_per_pixel,
            "masks": [self.format.rmask, self.format.gmask, self.format.bmask, self.format.amask],
            "flags": format!("{:#010X}", self.flags.bits()),
            "fullscreen": self.flags.contains(SurfaceFlags::FULLSCREEN),
            "double_buffered": self.flags.contains(SurfaceFlags::DOUBLEBUF),
            "pixels_bound": self.has_pixels(),
        })
    }
}

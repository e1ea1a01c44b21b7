//! Video driver interface
//!
//! A driver implements [`VideoDevice`]. The required methods are the ones
//! every display backend must provide (init, modes, mode set, palette,
//! update, quit). Everything else has a default that reports
//! [`VideoError::Unsupported`], and [`VideoDevice::capabilities`] tells the
//! host which optional operations a device actually overrides, so a missing
//! capability is decided when the device is built instead of being a
//! nullable slot.
//!
//! ```text
//! VideoSubsystem (host) -> VideoDevice trait -> driver (e.g. vid_ogc::OgcVideo)
//!                                 |
//!                                 +-> EventPump (input collaborator)
//! ```

use bitflags::bitflags;

use crate::error::VideoError;
use crate::surface::{PixelFormat, Surface, SurfaceFlags};
use crate::types::{Color, Rect};

bitflags! {
    /// Optional operations a device provides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        /// alloc/lock/unlock/free hardware surface entry points.
        const HW_SURFACE_OPS = 1 << 0;
        const HW_BLIT = 1 << 1;
        const FILL_HW_RECT = 1 << 2;
        const HW_COLOR_KEY = 1 << 3;
        const HW_ALPHA = 1 << 4;
        const FLIP_HW_SURFACE = 1 << 5;
        const YUV_OVERLAY = 1 << 6;
        const SET_CAPTION = 1 << 7;
        const SET_ICON = 1 << 8;
        const ICONIFY = 1 << 9;
        const GRAB_INPUT = 1 << 10;
        const WM_INFO = 1 << 11;
        /// init_os_keymap / pump_events delegate to an input collaborator.
        const EVENTS = 1 << 12;
    }
}

/// Input collaborator driven by the video device.
pub trait EventPump: Send {
    /// Build the platform key map. Called once during subsystem init.
    fn init_os_keymap(&mut self);

    /// Drain pending platform input into the host event queue.
    fn pump_events(&mut self);
}

/// A display backend.
pub trait VideoDevice: Send {
    /// Short driver name, e.g. "libogc".
    fn name(&self) -> &str;

    /// Optional operations this device overrides.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Prepare the device and report its native pixel format in `vformat`.
    fn video_init(&mut self, vformat: &mut PixelFormat) -> Result<(), VideoError>;

    /// Supported modes, largest first.
    fn list_modes(&self, format: &PixelFormat, flags: SurfaceFlags) -> &[Rect];

    /// Switch to `width` x `height` at `bpp` and point `current` at the new
    /// framebuffer.
    fn set_video_mode(
        &mut self,
        current: &mut Surface,
        width: u32,
        height: u32,
        bpp: u8,
        flags: SurfaceFlags,
    ) -> Result<(), VideoError>;

    /// Load palette entries starting at `first`. Returns `true` if every
    /// entry was accepted.
    fn set_colors(&mut self, first: usize, colors: &[Color]) -> bool;

    /// Notification that `rects` of the screen changed.
    fn update_rects(&mut self, rects: &[Rect]);

    /// Release the framebuffer and unbind `screen`. Must tolerate being
    /// called with nothing allocated and being called twice.
    fn video_quit(&mut self, screen: &mut Surface);

    /// Memory currently bound to the screen surface.
    fn framebuffer(&self) -> Option<&[u8]>;

    fn framebuffer_mut(&mut self) -> Option<&mut [u8]>;

    fn alloc_hw_surface(&mut self, _surface: &mut Surface) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware surfaces"))
    }

    fn lock_hw_surface(&mut self, _surface: &mut Surface) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware surface locking"))
    }

    fn unlock_hw_surface(&mut self, _surface: &mut Surface) {}

    fn free_hw_surface(&mut self, _surface: &mut Surface) {}

    fn check_hw_blit(&mut self, _src: &Surface, _dst: &Surface) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware blit"))
    }

    fn fill_hw_rect(
        &mut self,
        _dst: &mut Surface,
        _rect: &Rect,
        _color: u32,
    ) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware fill"))
    }

    fn set_hw_color_key(&mut self, _surface: &mut Surface, _key: u32) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware color key"))
    }

    fn set_hw_alpha(&mut self, _surface: &mut Surface, _alpha: u8) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware alpha"))
    }

    fn flip_hw_surface(&mut self, _surface: &mut Surface) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("hardware page flip"))
    }

    fn create_yuv_overlay(
        &mut self,
        _width: u32,
        _height: u32,
        _format: u32,
    ) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("YUV overlays"))
    }

    fn set_caption(&mut self, _title: &str, _icon: &str) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("window caption"))
    }

    fn set_icon(&mut self, _icon: &Surface) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("window icon"))
    }

    fn iconify_window(&mut self) -> Result<(), VideoError> {
        Err(VideoError::Unsupported("iconify"))
    }

    fn grab_input(&mut self, _grab: bool) -> Result<bool, VideoError> {
        Err(VideoError::Unsupported("input grab"))
    }

    fn wm_info(&self) -> Result<String, VideoError> {
        Err(VideoError::Unsupported("window manager info"))
    }

    fn init_os_keymap(&mut self) {}

    fn pump_events(&mut self) {}
}

/// Registry entry for one driver.
#[derive(Clone, Copy)]
pub struct VideoBootStrap {
    pub name: &'static str,
    pub desc: &'static str,
    /// Whether the driver can run on this machine.
    pub available: fn() -> bool,
    /// Build a device. The index selects a display on multi-head hardware.
    pub create: fn(usize) -> Result<Box<dyn VideoDevice>, VideoError>,
}

impl std::fmt::Debug for VideoBootStrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoBootStrap")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MinimalDevice {
        modes: Vec<Rect>,
    }

    impl VideoDevice for MinimalDevice {
        fn name(&self) -> &str {
            "minimal"
        }

        fn video_init(&mut self, vformat: &mut PixelFormat) -> Result<(), VideoError> {
            *vformat = PixelFormat::new(32, 0, 0, 0, 0)?;
            Ok(())
        }

        fn list_modes(&self, _format: &PixelFormat, _flags: SurfaceFlags) -> &[Rect] {
            &self.modes
        }

        fn set_video_mode(
            &mut self,
            _current: &mut Surface,
            width: u32,
            height: u32,
            _bpp: u8,
            _flags: SurfaceFlags,
        ) -> Result<(), VideoError> {
            Err(VideoError::UnsupportedMode { width, height })
        }

        fn set_colors(&mut self, _first: usize, _colors: &[Color]) -> bool {
            false
        }

        fn update_rects(&mut self, _rects: &[Rect]) {}

        fn video_quit(&mut self, screen: &mut Surface) {
            screen.unbind_pixels();
        }

        fn framebuffer(&self) -> Option<&[u8]> {
            None
        }

        fn framebuffer_mut(&mut self) -> Option<&mut [u8]> {
            None
        }
    }

    #[test]
    fn optional_operations_default_to_unsupported() {
        let mut dev = MinimalDevice { modes: vec![] };
        let mut s = Surface::new();

        assert!(dev.capabilities().is_empty());
        assert!(matches!(
            dev.alloc_hw_surface(&mut s),
            Err(VideoError::Unsupported(_))
        ));
        assert!(dev.lock_hw_surface(&mut s).is_err());
        assert!(dev.check_hw_blit(&s, &s).is_err());
        assert!(dev.fill_hw_rect(&mut s, &Rect::mode(1, 1), 0).is_err());
        assert!(dev.set_hw_color_key(&mut s, 0).is_err());
        assert!(dev.set_hw_alpha(&mut s, 0).is_err());
        assert!(dev.flip_hw_surface(&mut s).is_err());
        assert!(dev.create_yuv_overlay(16, 16, 0).is_err());
        assert!(dev.set_caption("t", "i").is_err());
        assert!(dev.set_icon(&s).is_err());
        assert!(dev.iconify_window().is_err());
        assert!(dev.grab_input(true).is_err());
        assert!(dev.wm_info().is_err());
    }

    #[test]
    fn required_operations_are_dispatched() {
        let mut dev: Box<dyn VideoDevice> = Box::new(MinimalDevice {
            modes: vec![Rect::mode(4, 4)],
        });
        let mut fmt = PixelFormat::default();
        dev.video_init(&mut fmt).unwrap();
        assert_eq!(fmt.bits_per_pixel, 32);
        assert_eq!(dev.list_modes(&fmt, SurfaceFlags::empty()).len(), 1);
        assert_eq!(dev.name(), "minimal");
    }
}

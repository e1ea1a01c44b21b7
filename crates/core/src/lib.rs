//! Host-side video primitives and the driver interface.

pub mod buffer;
pub mod error;
pub mod logging;
pub mod subsystem;
pub mod surface;
pub mod video;

pub mod types {
    use serde::Serialize;

    /// A rectangle. Display modes use only `w` and `h`.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct Rect {
        pub x: i32,
        pub y: i32,
        pub w: u32,
        pub h: u32,
    }

    impl Rect {
        pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
            Self { x, y, w, h }
        }

        /// A display mode of `w` x `h` anchored at the origin.
        pub const fn mode(w: u32, h: u32) -> Self {
            Self { x: 0, y: 0, w, h }
        }

        pub fn area(&self) -> u64 {
            u64::from(self.w) * u64::from(self.h)
        }
    }

    /// One palette entry.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Color {
        pub r: u8,
        pub g: u8,
        pub b: u8,
        pub unused: u8,
    }

    impl Color {
        pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b, unused: 0 }
        }
    }
}

pub use error::VideoError;
pub use subsystem::VideoSubsystem;
pub use surface::{PixelFormat, Surface, SurfaceFlags};
pub use video::{Capabilities, EventPump, VideoBootStrap, VideoDevice};

#[cfg(test)]
mod tests {
    use super::types::{Color, Rect};

    #[test]
    fn rect_mode_is_anchored_at_origin() {
        let r = Rect::mode(640, 480);
        assert_eq!((r.x, r.y, r.w, r.h), (0, 0, 640, 480));
        assert_eq!(r.area(), 307_200);
    }

    #[test]
    fn rect_area_does_not_overflow() {
        let r = Rect::mode(u32::MAX, u32::MAX);
        assert_eq!(r.area(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn color_rgb_leaves_padding_clear() {
        let c = Color::rgb(1, 2, 3);
        assert_eq!(c.unused, 0);
        assert_eq!((c.r, c.g, c.b), (1, 2, 3));
    }
}

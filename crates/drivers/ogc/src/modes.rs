//! Supported display modes.
//!
//! The display runs at one full-size resolution taken from the video
//! configuration; a half-size mode is derived from it. The list is kept
//! largest first because callers pick the first mode that fits.

use vid_core::types::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeList {
    modes: Vec<Rect>,
}

impl ModeList {
    /// `full` followed by `full / 2` on both axes.
    pub fn from_full(full: Rect) -> Self {
        let full = Rect::mode(full.w, full.h);
        let half = Rect::mode(full.w / 2, full.h / 2);
        Self {
            modes: vec![full, half],
        }
    }

    pub fn full(&self) -> Rect {
        self.modes[0]
    }

    pub fn half(&self) -> Rect {
        self.modes[1]
    }

    pub fn as_slice(&self) -> &[Rect] {
        &self.modes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// The mode whose size is exactly `width` x `height`.
    pub fn find_exact(&self, width: u32, height: u32) -> Option<Rect> {
        self.modes
            .iter()
            .copied()
            .find(|m| m.w == width && m.h == height)
    }

    pub fn is_descending(&self) -> bool {
        self.modes
            .windows(2)
            .all(|pair| pair[0].w >= pair[1].w && pair[0].h >= pair[1].h)
    }
}

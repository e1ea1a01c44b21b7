//! Video errors and the "last error" slot.
//!
//! Every failing operation returns a [`VideoError`]. The host subsystem also
//! stores the error text in a last-error slot so callers that only look at
//! return codes can still ask what went wrong, the way the C video API does.
//! The slot is per thread: the video subsystem is driven from one thread, and
//! a per-thread slot keeps independent instances (and tests) from clobbering
//! each other.

use std::cell::RefCell;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoError {
    #[error("Display mode ({width}x{height}) is unsupported.")]
    UnsupportedMode { width: u32, height: u32 },
    #[error("Resolution ({0} bpp) is unsupported (8/16/24 bpp only).")]
    UnsupportedDepth(u8),
    #[error("Couldn't allocate buffer for requested mode")]
    BufferAllocation { width: u32, height: u32, bpp: u8 },
    #[error("Couldn't allocate new pixel format for requested mode")]
    PixelFormat,
    #[error("Out of memory")]
    OutOfMemory,
    #[error("Operation not supported by this video driver: {0}")]
    Unsupported(&'static str),
    #[error("Video subsystem not initialized")]
    NotInitialized,
    #[error("No video mode has been set")]
    NoVideoMode,
    #[error("No available video device: {0}")]
    NoDriver(String),
    #[error("Invalid driver configuration: {0}")]
    InvalidConfig(String),
}

impl VideoError {
    /// `true` for errors the caller may cure by retrying with other parameters.
    pub fn is_unsupported_request(&self) -> bool {
        matches!(
            self,
            VideoError::UnsupportedMode { .. } | VideoError::UnsupportedDepth(_)
        )
    }

    /// `true` for allocation failures.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            VideoError::BufferAllocation { .. } | VideoError::PixelFormat | VideoError::OutOfMemory
        )
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Replace the last error message.
pub fn set_error(message: impl Into<String>) {
    let message = message.into();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

/// The last error message, or an empty string if none is set.
pub fn get_error() -> String {
    LAST_ERROR.with(|slot| slot.borrow().clone().unwrap_or_default())
}

pub fn clear_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Record `err` in the last-error slot and hand it back.
pub fn report(err: VideoError) -> VideoError {
    set_error(err.to_string());
    err
}

//! Aligned, zero-initialised pixel storage.
//!
//! Console display hardware reads the framebuffer with DMA and needs it on a
//! 32-byte boundary. `AlignedBuffer` owns exactly one such allocation and
//! returns it to the allocator when dropped, so every early return in a
//! mode-set path releases memory without extra bookkeeping.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;

use thiserror::Error;

/// Alignment required for framebuffers handed to the display.
pub const FRAMEBUFFER_ALIGN: usize = 32;

/// The allocator refused the request or the layout was invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot allocate {size} bytes aligned to {align}")]
pub struct AllocError {
    pub size: usize,
    pub align: usize,
}

/// Exclusively owned, aligned heap block.
pub struct AlignedBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
    len: usize,
}

// SAFETY: the block is uniquely owned and only reachable through `&self`/`&mut self`.
unsafe impl Send for AlignedBuffer {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocate `len` zeroed bytes aligned to `align`.
    ///
    /// `align` must be a power of two. A zero-length request still owns a
    /// one-byte block so the pointer is always valid.
    pub fn zeroed(len: usize, align: usize) -> Result<Self, AllocError> {
        let err = AllocError { size: len, align };
        let layout = Layout::from_size_align(len.max(1), align).map_err(|_| err)?;

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(err)?;

        Ok(Self { ptr, layout, len })
    }

    /// Allocate a zeroed framebuffer with [`FRAMEBUFFER_ALIGN`].
    pub fn framebuffer(len: usize) -> Result<Self, AllocError> {
        Self::zeroed(len, FRAMEBUFFER_ALIGN)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn align(&self) -> usize {
        self.layout.align()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `layout.size() >= len` initialised bytes.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.as_mut_slice().fill(0);
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from `alloc_zeroed` with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish()
    }
}

//! Framebuffer registration and the flush boundary.
//!
//! The engine never talks to a panel directly: it composes horizontal
//! strips into one of (up to) two working buffers and hands each finished
//! strip to the registered [`FlushTarget`]. With two buffers the target can
//! run the flush over DMA while the next strip is composed; `ready()` is
//! the two-state handshake that keeps the composer from scribbling over an
//! in-flight buffer.

use crate::color::PixelFormat;
use crate::error::Error;
use crate::geometry::Area;

/// Where finished strips go. Implemented by the panel driver (or a plain
/// memory target in tests and demos).
pub trait FlushTarget {
    /// Present `pixels` (row-major, no padding, in the registered format)
    /// at `area` on the panel.
    fn flush(&mut self, area: Area, pixels: &[u8]);

    /// Whether the previously flushed buffer may be reused. Synchronous
    /// targets just return true; DMA targets flip this from their
    /// completion callback.
    fn ready(&mut self) -> bool {
        true
    }
}

/// Working-buffer configuration for the composer.
#[derive(Clone, Copy, Debug)]
pub struct FramebufferConfig {
    pub width: i32,
    pub height: i32,
    pub format: PixelFormat,
    /// Byte budget of one working buffer; decides strip height.
    pub buffer_bytes: usize,
    /// Allocate two working buffers and swap after each flush.
    pub double_buffered: bool,
}

pub struct Framebuffer {
    config: FramebufferConfig,
    buffers: Vec<Vec<u8>>,
    active: usize,
    flush: Box<dyn FlushTarget>,
}

// Manual impl: the flush target is opaque.
impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("config", &self.config)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Framebuffer {
    /// Validate and register. Fails when the resolution is degenerate or
    /// the buffer budget cannot hold even a single scanline.
    pub fn register(config: FramebufferConfig, flush: Box<dyn FlushTarget>) -> Result<Self, Error> {
        if config.width <= 0 || config.height <= 0 {
            return Err(Error::InvalidFramebuffer("zero resolution"));
        }
        let scanline = config.width as usize * config.format.bytes_per_pixel();
        if config.buffer_bytes < scanline {
            return Err(Error::InvalidFramebuffer(
                "buffer smaller than one scanline",
            ));
        }
        let count = if config.double_buffered { 2 } else { 1 };
        let buffers = (0..count).map(|_| vec![0u8; config.buffer_bytes]).collect();
        Ok(Framebuffer {
            config,
            buffers,
            active: 0,
            flush,
        })
    }

    pub fn config(&self) -> FramebufferConfig {
        self.config
    }

    pub fn screen(&self) -> Area {
        Area::new(0, 0, self.config.width, self.config.height)
    }

    /// Strip height for composing a region `strip_width` pixels wide.
    pub fn strip_height(&self, strip_width: i32) -> i32 {
        let row = strip_width.max(1) as usize * self.config.format.bytes_per_pixel();
        ((self.config.buffer_bytes / row) as i32).max(1)
    }

    /// Block until the active working buffer may be written again.
    pub fn wait_ready(&mut self) {
        // Two-state handshake, not a queue: spin until the DMA (or whatever
        // owns the buffer) lets go.
        while !self.flush.ready() {
            core::hint::spin_loop();
        }
    }

    pub fn active_buffer(&mut self) -> &mut [u8] {
        &mut self.buffers[self.active]
    }

    /// Flush `len` bytes of the active buffer as strip `area`, then swap
    /// working buffers when double-buffered.
    pub fn flush_strip(&mut self, area: Area, len: usize) {
        self.flush.flush(area, &self.buffers[self.active][..len]);
        if self.buffers.len() > 1 {
            self.active ^= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullTarget;
    impl FlushTarget for NullTarget {
        fn flush(&mut self, _area: Area, _pixels: &[u8]) {}
    }

    fn cfg(bytes: usize) -> FramebufferConfig {
        FramebufferConfig {
            width: 240,
            height: 135,
            format: PixelFormat::Rgb565,
            buffer_bytes: bytes,
            double_buffered: false,
        }
    }

    #[test]
    fn rejects_sub_scanline_budget() {
        // One RGB565 scanline at 240 wide is 480 bytes.
        let err = Framebuffer::register(cfg(479), Box::new(NullTarget)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFramebuffer("buffer smaller than one scanline")
        );
        assert!(Framebuffer::register(cfg(480), Box::new(NullTarget)).is_ok());
    }

    #[test]
    fn rejects_zero_resolution() {
        let mut c = cfg(4096);
        c.width = 0;
        assert!(Framebuffer::register(c, Box::new(NullTarget)).is_err());
    }

    #[test]
    fn strip_height_from_budget() {
        let fb = Framebuffer::register(cfg(480 * 10), Box::new(NullTarget)).unwrap();
        assert_eq!(fb.strip_height(240), 10);
        // Narrower dirty rect allows taller strips.
        assert_eq!(fb.strip_height(120), 20);
        // Degenerate budget still yields one row.
        let fb = Framebuffer::register(cfg(480), Box::new(NullTarget)).unwrap();
        assert_eq!(fb.strip_height(240), 1);
    }

    #[test]
    fn wait_ready_spins_until_the_target_lets_go() {
        use std::cell::Cell;
        use std::rc::Rc;

        // Reports not-ready for a fixed number of polls, like a DMA flush
        // still in flight.
        struct BusyTarget {
            pending: Rc<Cell<u32>>,
        }
        impl FlushTarget for BusyTarget {
            fn flush(&mut self, _area: Area, _pixels: &[u8]) {}
            fn ready(&mut self) -> bool {
                let left = self.pending.get();
                if left > 0 {
                    self.pending.set(left - 1);
                    return false;
                }
                true
            }
        }

        let pending = Rc::new(Cell::new(3));
        let mut c = cfg(480 * 4);
        c.double_buffered = true;
        let mut fb = Framebuffer::register(
            c,
            Box::new(BusyTarget {
                pending: pending.clone(),
            }),
        )
        .unwrap();
        fb.wait_ready();
        // Polled exactly until the handshake cleared, then returned.
        assert_eq!(pending.get(), 0);
        fb.wait_ready();
        assert_eq!(pending.get(), 0);
    }

    #[test]
    fn double_buffer_swaps_after_flush() {
        let mut c = cfg(480 * 4);
        c.double_buffered = true;
        let mut fb = Framebuffer::register(c, Box::new(NullTarget)).unwrap();
        fb.active_buffer()[0] = 0xAA;
        fb.flush_strip(Area::new(0, 0, 240, 4), 480 * 4);
        // Swapped: the other buffer is untouched.
        assert_eq!(fb.active_buffer()[0], 0x00);
    }
}

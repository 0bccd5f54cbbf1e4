//! A rectangular pixel-buffer view that rasterizers draw into.
//!
//! A surface covers one screen-space strip; coordinates given to its pixel
//! operations are screen coordinates and are translated internally, so a
//! widget never cares which strip it is being composed into. Out-of-bounds
//! writes are silently clipped.

use crate::color::{self, Color, PixelFormat};
use crate::error::Error;
use crate::geometry::Area;

pub struct Surface<'a> {
    buf: &'a mut [u8],
    format: PixelFormat,
    /// Screen-space rectangle this buffer covers.
    area: Area,
}

impl std::fmt::Debug for Surface<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("format", &self.format)
            .field("area", &self.area)
            .finish_non_exhaustive()
    }
}

impl<'a> Surface<'a> {
    pub fn new(buf: &'a mut [u8], format: PixelFormat, area: Area) -> Result<Self, Error> {
        let need = area.width() as usize * area.height() as usize * format.bytes_per_pixel();
        if buf.len() < need {
            return Err(Error::SurfaceTooSmall {
                need,
                have: buf.len(),
            });
        }
        Ok(Surface { buf, format, area })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The bytes backing this strip, row-major, no padding.
    pub fn bytes(&self) -> &[u8] {
        let need =
            self.area.width() as usize * self.area.height() as usize * self.format.bytes_per_pixel();
        &self.buf[..need]
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        let bpp = self.format.bytes_per_pixel();
        ((y - self.area.y1) as usize * self.area.width() as usize + (x - self.area.x1) as usize)
            * bpp
    }

    /// Blend one pixel at screen position (x, y); out-of-strip writes are
    /// dropped.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, c: Color, alpha: u8) {
        if x < self.area.x1 || x > self.area.x2 || y < self.area.y1 || y > self.area.y2 {
            return;
        }
        let o = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        color::blend_pixel(&mut self.buf[o..o + bpp], self.format, c, alpha);
    }

    /// Read back one pixel (tests and pixmap work).
    pub fn read_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < self.area.x1 || x > self.area.x2 || y < self.area.y1 || y > self.area.y2 {
            return None;
        }
        let o = self.offset(x, y);
        let bpp = self.format.bytes_per_pixel();
        Some(color::read_pixel(&self.buf[o..o + bpp], self.format))
    }

    /// Blend a horizontal run `[x1, x2]` on row `y`, clipped to the strip.
    pub fn blend_hline(&mut self, x1: i32, x2: i32, y: i32, c: Color, alpha: u8) {
        if y < self.area.y1 || y > self.area.y2 || alpha == 0 {
            return;
        }
        let x1 = x1.max(self.area.x1);
        let x2 = x2.min(self.area.x2);
        if x1 > x2 {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        if alpha == 255 {
            // Opaque fast path: write the first pixel, then replicate.
            let o1 = self.offset(x1, y);
            let o2 = self.offset(x2, y) + bpp;
            color::write_pixel(&mut self.buf[o1..o1 + bpp], self.format, c);
            let (head, rest) = self.buf[o1..o2].split_at_mut(bpp);
            for chunk in rest.chunks_exact_mut(bpp) {
                chunk.copy_from_slice(head);
            }
        } else {
            for x in x1..=x2 {
                let o = self.offset(x, y);
                color::blend_pixel(&mut self.buf[o..o + bpp], self.format, c, alpha);
            }
        }
    }

    /// Fill a rectangle, clipped to the strip.
    pub fn fill_rect(&mut self, rect: Area, c: Color, alpha: u8) {
        let Some(r) = rect.intersect(&self.area) else {
            return;
        };
        for y in r.y1..=r.y2 {
            self.blend_hline(r.x1, r.x2, y, c, alpha);
        }
    }
}

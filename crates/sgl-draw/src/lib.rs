//! # SGL draw
//!
//! Anti-aliased software rasterizer primitives over [`sgl_core::Surface`].
//!
//! Every primitive is a pure function of (surface, clip, shape, color,
//! alpha): it intersects the shape's bounds with the caller's clip and the
//! surface strip, bails out early when that is empty, and otherwise blends
//! row by row. Coverage at curved edges comes from integer square roots
//! ([`sgl_core::math::edge_coverage`]) — no floating point anywhere.
//!
//! [`Panel`] is the reference widget wiring these primitives to a node's
//! style; richer widgets build on the same calls.

pub mod arc;
pub mod circle;
pub mod line;
pub mod panel;
pub mod rect;

pub use arc::{ArcDesc, ArcMode, draw_arc};
pub use circle::fill_circle;
pub use line::draw_line;
pub use panel::Panel;
pub use rect::{draw_rect, fill_rect, fill_round_rect};

/// Scale `alpha` by an 8-bit coverage value, rounding to nearest.
#[inline]
pub(crate) fn modulate(alpha: u8, coverage: u8) -> u8 {
    ((alpha as u16 * coverage as u16 + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::modulate;

    #[test]
    fn modulate_endpoints() {
        assert_eq!(modulate(255, 255), 255);
        assert_eq!(modulate(255, 0), 0);
        assert_eq!(modulate(0, 255), 0);
        assert_eq!(modulate(128, 255), 128);
    }
}

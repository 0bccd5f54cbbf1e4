//! Thick anti-aliased lines.
//!
//! Slanted lines are rasterized from a capsule signed distance: every pixel
//! in the bounding box gets its squared distance to the segment, and the
//! usual one-pixel coverage ramp turns that into alpha. Axis-aligned lines
//! skip all of it and fill a rectangle.

use sgl_core::color::Color;
use sgl_core::geometry::{Area, Point};
use sgl_core::math::edge_coverage;
use sgl_core::surface::Surface;

use crate::modulate;
use crate::rect::fill_rect;

/// Draw a line from `a` to `b`, `width` pixels thick, with round endpoint
/// caps on slanted lines.
pub fn draw_line(
    surface: &mut Surface<'_>,
    clip: Area,
    a: Point,
    b: Point,
    width: i32,
    color: Color,
    alpha: u8,
) {
    if alpha == 0 || width <= 0 {
        return;
    }
    let r = (width - 1) / 2;
    if a.y == b.y {
        let rect = Area {
            x1: a.x.min(b.x) - r,
            y1: a.y - r,
            x2: a.x.max(b.x) + r,
            y2: a.y + r,
        };
        fill_rect(surface, rect, clip, color, alpha);
        return;
    }
    if a.x == b.x {
        let rect = Area {
            x1: a.x - r,
            y1: a.y.min(b.y) - r,
            x2: a.x + r,
            y2: a.y.max(b.y) + r,
        };
        fill_rect(surface, rect, clip, color, alpha);
        return;
    }

    let margin = r + 1;
    let bounds = Area {
        x1: a.x.min(b.x) - margin,
        y1: a.y.min(b.y) - margin,
        x2: a.x.max(b.x) + margin,
        y2: a.y.max(b.y) + margin,
    };
    let Some(paint) = bounds
        .intersect(&clip)
        .and_then(|p| p.intersect(&surface.area()))
    else {
        return;
    };

    let abx = (b.x - a.x) as i64;
    let aby = (b.y - a.y) as i64;
    let len2 = abx * abx + aby * aby;
    for y in paint.y1..=paint.y2 {
        let apy = (y - a.y) as i64;
        for x in paint.x1..=paint.x2 {
            let apx = (x - a.x) as i64;
            let ap2 = apx * apx + apy * apy;
            let along = apx * abx + apy * aby;
            let d2 = if along <= 0 {
                ap2
            } else if along >= len2 {
                let (bx, by) = ((x - b.x) as i64, (y - b.y) as i64);
                bx * bx + by * by
            } else {
                // Squared perpendicular distance, keeping the division last.
                ap2 - along * along / len2
            };
            let cov = edge_coverage(d2 as u64, r);
            if cov > 0 {
                surface.blend_pixel(x, y, color, modulate(alpha, cov));
            }
        }
    }
}

//! Anti-aliased filled circles.

use sgl_core::color::Color;
use sgl_core::geometry::{Area, Point};
use sgl_core::math::edge_coverage;
use sgl_core::surface::Surface;

use crate::modulate;

/// Fill a circle of `radius` around `center`. Interior rows are blended as
/// whole runs: once a row enters full coverage on the left half, the run
/// extends straight to the mirrored x on the right, skipping the per-pixel
/// work for everything in between.
pub fn fill_circle(
    surface: &mut Surface<'_>,
    clip: Area,
    center: Point,
    radius: i32,
    color: Color,
    alpha: u8,
) {
    if alpha == 0 || radius <= 0 {
        return;
    }
    let bounds = Area::new(
        center.x - radius,
        center.y - radius,
        2 * radius + 1,
        2 * radius + 1,
    );
    let Some(paint) = bounds
        .intersect(&clip)
        .and_then(|p| p.intersect(&surface.area()))
    else {
        return;
    };
    for y in paint.y1..=paint.y2 {
        let dy = (y - center.y) as i64;
        let dy2 = (dy * dy) as u64;
        let mut x = paint.x1;
        while x <= paint.x2 {
            let dx = (x - center.x) as i64;
            let cov = edge_coverage(dy2 + (dx * dx) as u64, radius);
            if cov == 255 && x < center.x {
                // Mirror-x skip: the pixel at 2*cx - x has the same
                // distance, and everything between is strictly closer.
                let run = (2 * center.x - x).min(paint.x2);
                surface.blend_hline(x, run, y, color, alpha);
                x = run + 1;
                continue;
            }
            if cov > 0 {
                surface.blend_pixel(x, y, color, modulate(alpha, cov));
            }
            x += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgl_core::color::PixelFormat;

    const W: i32 = 40;

    fn render(draw: impl FnOnce(&mut Surface<'_>)) -> Vec<u8> {
        let mut buf = vec![0u8; (W * W * 3) as usize];
        {
            let mut s =
                Surface::new(&mut buf, PixelFormat::Rgb888, Area::new(0, 0, W, W)).unwrap();
            draw(&mut s);
        }
        buf
    }

    fn px(buf: &[u8], x: i32, y: i32) -> u8 {
        buf[((y * W + x) * 3) as usize]
    }

    #[test]
    fn interior_full_exterior_empty_edge_partial() {
        let clip = Area::new(0, 0, W, W);
        let c = Point::new(20, 20);
        let buf = render(|s| fill_circle(s, clip, c, 12, Color::WHITE, 255));
        assert_eq!(px(&buf, 20, 20), 255);
        assert_eq!(px(&buf, 20, 10), 255);
        assert_eq!(px(&buf, 2, 2), 0);
        // On the rim along the axis: partially covered.
        let rim = px(&buf, 32, 20);
        assert!(rim > 0 && rim < 255, "rim = {rim}");
    }

    #[test]
    fn circle_is_four_way_symmetric() {
        let clip = Area::new(0, 0, W, W);
        let c = Point::new(20, 20);
        let buf = render(|s| fill_circle(s, clip, c, 13, Color::WHITE, 255));
        for dy in 0..=13 {
            for dx in 0..=13 {
                let v = px(&buf, 20 + dx, 20 + dy);
                assert_eq!(v, px(&buf, 20 - dx, 20 + dy), "mirror x at ({dx},{dy})");
                assert_eq!(v, px(&buf, 20 + dx, 20 - dy), "mirror y at ({dx},{dy})");
            }
        }
    }

    #[test]
    fn mirror_skip_matches_per_pixel_blend() {
        let clip = Area::new(0, 0, W, W);
        let c = Point::new(20, 20);
        let fast = render(|s| fill_circle(s, clip, c, 10, Color::WHITE, 255));
        // Clip away the left half so the run fast path never triggers.
        let slow = render(|s| {
            fill_circle(s, Area::new(20, 0, W - 20, W), c, 10, Color::WHITE, 255);
            fill_circle(s, Area::new(0, 0, 20, W), c, 10, Color::WHITE, 255);
        });
        assert_eq!(fast, slow);
    }

    #[test]
    fn clipped_out_circle_draws_nothing() {
        let buf = render(|s| {
            fill_circle(s, Area::new(0, 0, 5, 5), Point::new(30, 30), 8, Color::WHITE, 255)
        });
        assert!(buf.iter().all(|&b| b == 0));
    }
}

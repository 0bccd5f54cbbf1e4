//! Rectangle fills, borders and rounded-corner fills.

use sgl_core::color::Color;
use sgl_core::geometry::Area;
use sgl_core::math::edge_coverage;
use sgl_core::surface::Surface;

use crate::modulate;

/// Fill `area` with `color`, clipped against `clip` and the surface strip.
pub fn fill_rect(surface: &mut Surface<'_>, area: Area, clip: Area, color: Color, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let Some(paint) = area
        .intersect(&clip)
        .and_then(|p| p.intersect(&surface.area()))
    else {
        return;
    };
    for y in paint.y1..=paint.y2 {
        surface.blend_hline(paint.x1, paint.x2, y, color, alpha);
    }
}

/// Stroke the rectangle outline with a border `width` pixels thick, drawn
/// inward from `area`'s edge.
pub fn draw_rect(
    surface: &mut Surface<'_>,
    area: Area,
    clip: Area,
    width: i32,
    color: Color,
    alpha: u8,
) {
    if width <= 0 || area.is_empty() {
        return;
    }
    let w = width.min(area.width() / 2).min(area.height() / 2).max(1);
    let top = Area {
        x1: area.x1,
        y1: area.y1,
        x2: area.x2,
        y2: area.y1 + w - 1,
    };
    let bottom = Area {
        x1: area.x1,
        y1: area.y2 - w + 1,
        x2: area.x2,
        y2: area.y2,
    };
    let left = Area {
        x1: area.x1,
        y1: area.y1 + w,
        x2: area.x1 + w - 1,
        y2: area.y2 - w,
    };
    let right = Area {
        x1: area.x2 - w + 1,
        y1: area.y1 + w,
        x2: area.x2,
        y2: area.y2 - w,
    };
    fill_rect(surface, top, clip, color, alpha);
    fill_rect(surface, bottom, clip, color, alpha);
    fill_rect(surface, left, clip, color, alpha);
    fill_rect(surface, right, clip, color, alpha);
}

/// Fill a rectangle with rounded corners. The flat edges stay hard; the
/// four corner arcs get one-pixel coverage ramps. Radius 0 degenerates to
/// [`fill_rect`], pixel for pixel.
pub fn fill_round_rect(
    surface: &mut Surface<'_>,
    area: Area,
    clip: Area,
    radius: i32,
    color: Color,
    alpha: u8,
) {
    if alpha == 0 || area.is_empty() {
        return;
    }
    let r = radius.clamp(0, area.width().min(area.height()) / 2);
    if r == 0 {
        fill_rect(surface, area, clip, color, alpha);
        return;
    }
    let Some(paint) = area
        .intersect(&clip)
        .and_then(|p| p.intersect(&surface.area()))
    else {
        return;
    };
    // Corner-arc centers; everything between them is solid.
    let cx1 = area.x1 + r;
    let cx2 = area.x2 - r;
    let cy1 = area.y1 + r;
    let cy2 = area.y2 - r;
    for y in paint.y1..=paint.y2 {
        if y >= cy1 && y <= cy2 {
            surface.blend_hline(paint.x1, paint.x2, y, color, alpha);
            continue;
        }
        let cy = if y < cy1 { cy1 } else { cy2 };
        let dy = (y - cy) as i64;
        let mut x = paint.x1;
        while x <= paint.x2 {
            if x >= cx1 && x <= cx2 {
                let run = cx2.min(paint.x2);
                surface.blend_hline(x, run, y, color, alpha);
                x = run + 1;
                continue;
            }
            let cx = if x < cx1 { cx1 } else { cx2 };
            let dx = (x - cx) as i64;
            let cov = edge_coverage((dx * dx + dy * dy) as u64, r);
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

    const W: i32 = 32;
    const H: i32 = 32;

    fn render(draw: impl FnOnce(&mut Surface<'_>)) -> Vec<u8> {
        let mut buf = vec![0u8; (W * H * 3) as usize];
        {
            let mut s =
                Surface::new(&mut buf, PixelFormat::Rgb888, Area::new(0, 0, W, H)).unwrap();
            draw(&mut s);
        }
        buf
    }

    #[test]
    fn radius_zero_is_identical_to_plain_fill() {
        let area = Area::new(3, 5, 20, 14);
        let clip = Area::new(0, 0, W, H);
        let c = Color::rgb(200, 60, 10);
        let plain = render(|s| fill_rect(s, area, clip, c, 180));
        let round = render(|s| fill_round_rect(s, area, clip, 0, c, 180));
        assert_eq!(plain, round);
    }

    #[test]
    fn fill_respects_clip() {
        let clip = Area::new(0, 0, 8, 8);
        let buf = render(|s| fill_rect(s, Area::new(0, 0, W, H), clip, Color::WHITE, 255));
        // Inside the clip: white. Outside: untouched.
        assert_eq!(&buf[0..3], &[255, 255, 255]);
        let o = ((10 * W + 10) * 3) as usize;
        assert_eq!(&buf[o..o + 3], &[0, 0, 0]);
    }

    #[test]
    fn empty_intersection_is_a_no_op() {
        let buf = render(|s| {
            fill_rect(s, Area::new(100, 100, 5, 5), Area::new(0, 0, W, H), Color::WHITE, 255);
            fill_round_rect(s, Area::new(0, 0, 5, 5), Area::new(50, 50, 5, 5), 2, Color::WHITE, 255);
        });
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn round_rect_corners_are_cut_and_center_is_solid() {
        let area = Area::new(0, 0, 24, 24);
        let clip = Area::new(0, 0, W, H);
        let buf = render(|s| fill_round_rect(s, area, clip, 8, Color::WHITE, 255));
        let px = |x: i32, y: i32| buf[((y * W + x) * 3) as usize];
        // The very corner pixel is outside the rounding circle.
        assert_eq!(px(0, 0), 0);
        assert_eq!(px(23, 23), 0);
        // Center and edge midpoints are fully covered.
        assert_eq!(px(12, 12), 255);
        assert_eq!(px(12, 0), 255);
        assert_eq!(px(0, 12), 255);
    }

    #[test]
    fn border_leaves_interior_untouched() {
        let area = Area::new(2, 2, 20, 20);
        let clip = Area::new(0, 0, W, H);
        let buf = render(|s| draw_rect(s, area, clip, 2, Color::WHITE, 255));
        let px = |x: i32, y: i32| buf[((y * W + x) * 3) as usize];
        assert_eq!(px(2, 2), 255);
        assert_eq!(px(3, 21), 255);
        assert_eq!(px(21, 10), 255);
        assert_eq!(px(12, 12), 0);
        assert_eq!(px(0, 0), 0);
    }
}

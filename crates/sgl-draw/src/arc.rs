//! Anti-aliased arcs and rings.
//!
//! An arc is the part of a ring (between an inner and an outer radius)
//! swept from a start to an end angle. Angular membership is decided with
//! cross-product sign tests against the two endpoint unit vectors, so no
//! per-pixel trigonometry is needed; the radial edges always get coverage
//! ramps, and the angular edge treatment is selected by [`ArcMode`].

use sgl_core::color::Color;
use sgl_core::geometry::{Area, Point};
use sgl_core::math::{cos_q15, edge_coverage, sin_q15};
use sgl_core::surface::Surface;

use crate::modulate;

/// Edge treatment for the two angular cut lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcMode {
    /// Hard angular edges.
    Normal,
    /// Hard angular edges; the rest of the ring is painted in the given
    /// background color (progress-ring style).
    Ring(Color),
    /// Round endpoint caps, anti-aliased.
    RoundedCaps,
    /// Flat angular edges with a one-pixel coverage ramp.
    FlatAa,
}

#[derive(Clone, Copy, Debug)]
pub struct ArcDesc {
    pub center: Point,
    /// Inner ring radius; 0 gives a filled sector.
    pub radius_in: i32,
    pub radius_out: i32,
    /// Degrees, clockwise with y down; `start == end` draws the full ring.
    pub start_deg: i32,
    pub end_deg: i32,
    pub mode: ArcMode,
}

/// Coverage ramp from a signed Q15 cross product: full one pixel inside
/// the cut line, zero one pixel outside, half on it.
#[inline]
fn edge_ramp(cross: i64) -> u8 {
    let dist16 = cross * 16 / 32767;
    ((dist16 + 8) * 16).clamp(0, 255) as u8
}

pub fn draw_arc(surface: &mut Surface<'_>, clip: Area, desc: &ArcDesc, color: Color, alpha: u8) {
    let r_out = desc.radius_out;
    let r_in = desc.radius_in.clamp(0, r_out);
    if alpha == 0 || r_out <= 0 {
        return;
    }
    let bounds = Area::new(
        desc.center.x - r_out,
        desc.center.y - r_out,
        2 * r_out + 1,
        2 * r_out + 1,
    );
    let Some(paint) = bounds
        .intersect(&clip)
        .and_then(|p| p.intersect(&surface.area()))
    else {
        return;
    };

    let sweep = (desc.end_deg - desc.start_deg).rem_euclid(360);
    let full = sweep == 0; // start == end wraps all the way around
    // Endpoint unit vectors in Q15.
    let (sx, sy) = (cos_q15(desc.start_deg) as i64, sin_q15(desc.start_deg) as i64);
    let (ex, ey) = (cos_q15(desc.end_deg) as i64, sin_q15(desc.end_deg) as i64);
    // Cap geometry for `RoundedCaps`: discs of the ring's half-thickness
    // centered on the ring midline at each endpoint.
    let rm = (r_in + r_out) / 2;
    let rc = (r_out - r_in) / 2;
    let cap_s = (
        desc.center.x as i64 + sx * rm as i64 / 32767,
        desc.center.y as i64 + sy * rm as i64 / 32767,
    );
    let cap_e = (
        desc.center.x as i64 + ex * rm as i64 / 32767,
        desc.center.y as i64 + ey * rm as i64 / 32767,
    );

    for y in paint.y1..=paint.y2 {
        let py = (y - desc.center.y) as i64;
        for x in paint.x1..=paint.x2 {
            let px = (x - desc.center.x) as i64;
            let d2 = (px * px + py * py) as u64;
            let cov_out = edge_coverage(d2, r_out);
            if cov_out == 0 {
                continue;
            }
            let keep_in = if r_in > 0 {
                255 - edge_coverage(d2, r_in) as u16
            } else {
                255
            };
            let ring = modulate(cov_out, keep_in as u8);
            if ring == 0 {
                continue;
            }

            // cross > 0: the pixel is counter-clockwise of the vector.
            let cross_s = sx * py - sy * px;
            let cross_e = px * ey - py * ex;
            let in_sweep = full
                || if sweep <= 180 {
                    cross_s >= 0 && cross_e >= 0
                } else {
                    cross_s >= 0 || cross_e >= 0
                };

            let cov = match desc.mode {
                ArcMode::Normal => {
                    if in_sweep {
                        ring
                    } else {
                        0
                    }
                }
                ArcMode::Ring(bg) => {
                    if !in_sweep {
                        surface.blend_pixel(x, y, bg, modulate(alpha, ring));
                        continue;
                    }
                    ring
                }
                ArcMode::FlatAa => {
                    let sector = if full {
                        255
                    } else if sweep <= 180 {
                        modulate(edge_ramp(cross_s), edge_ramp(cross_e))
                    } else {
                        255 - modulate(255 - edge_ramp(cross_s), 255 - edge_ramp(cross_e))
                    };
                    modulate(ring, sector)
                }
                ArcMode::RoundedCaps => {
                    let sector = if in_sweep { ring } else { 0 };
                    let ds = {
                        let (dx, dy) = (x as i64 - cap_s.0, y as i64 - cap_s.1);
                        (dx * dx + dy * dy) as u64
                    };
                    let de = {
                        let (dx, dy) = (x as i64 - cap_e.0, y as i64 - cap_e.1);
                        (dx * dx + dy * dy) as u64
                    };
                    let caps = edge_coverage(ds, rc).max(edge_coverage(de, rc));
                    sector.max(modulate(cov_out, caps))
                }
            };
            if cov > 0 {
                surface.blend_pixel(x, y, color, modulate(alpha, cov));
            }
        }
    }
}

//! Integer/fixed-point helpers shared by easing and the rasterizers.
//!
//! No floating point anywhere: targets without an FPU pay dearly for it, so
//! the sine is table-driven in Q15 and distances come from an integer square
//! root with a sub-pixel error term.

/// sin(0°..=90°) in Q15, one entry per degree.
const SIN_Q15: [i32; 91] = [
    0, 572, 1144, 1715, 2286, 2856, 3425, 3993, 4560, 5126,
    5690, 6252, 6813, 7371, 7927, 8481, 9032, 9580, 10126, 10668,
    11207, 11743, 12275, 12803, 13328, 13848, 14364, 14876, 15383, 15886,
    16383, 16876, 17364, 17846, 18323, 18794, 19260, 19720, 20173, 20621,
    21062, 21497, 21925, 22347, 22762, 23170, 23571, 23964, 24351, 24730,
    25101, 25465, 25821, 26169, 26509, 26841, 27165, 27481, 27788, 28087,
    28377, 28659, 28932, 29196, 29451, 29697, 29934, 30162, 30381, 30591,
    30791, 30982, 31163, 31335, 31498, 31650, 31794, 31927, 32051, 32165,
    32269, 32364, 32448, 32523, 32587, 32642, 32687, 32722, 32747, 32762,
    32767,
];

/// Table-driven integer sine: `sin(deg)` in Q15, for any degree value.
pub fn sin_q15(deg: i32) -> i32 {
    let d = deg.rem_euclid(360);
    match d {
        0..=90 => SIN_Q15[d as usize],
        91..=180 => SIN_Q15[(180 - d) as usize],
        181..=270 => -SIN_Q15[(d - 180) as usize],
        _ => -SIN_Q15[(360 - d) as usize],
    }
}

/// `cos(deg)` in Q15.
pub fn cos_q15(deg: i32) -> i32 {
    sin_q15(deg + 90)
}

/// Integer square root (floor).
pub fn isqrt(n: u32) -> u32 {
    isqrt64(n as u64) as u32
}

/// Integer square root (floor) for 64-bit operands, used when squared
/// distances are scaled up for sub-pixel precision.
pub fn isqrt64(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) >> 1;
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}

/// Floor square root together with the remainder `n - root*root`.
///
/// The remainder is what the rasterizers turn into edge coverage: it says
/// how far `n` sits between two adjacent perfect squares.
pub fn sqrt_with_error(n: u32) -> (u32, u32) {
    let r = isqrt(n);
    (r, n - r * r)
}

/// Anti-aliasing coverage for a pixel at squared distance `d2` from a shape
/// center against radius `r`, with a one-pixel ramp centered on the edge.
/// Returns 255 fully inside, 0 fully outside.
pub fn edge_coverage(d2: u64, r: i32) -> u8 {
    if r < 0 {
        return 0;
    }
    // Distance in 1/16 pixel: sqrt(d2 * 256) == 16 * sqrt(d2).
    let d16 = isqrt64(d2.saturating_mul(256)) as i64;
    let r16 = r as i64 * 16;
    let diff = r16 + 8 - d16;
    (diff * 16).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_cardinal_points() {
        assert_eq!(sin_q15(0), 0);
        assert_eq!(sin_q15(90), 32767);
        assert_eq!(sin_q15(180), 0);
        assert_eq!(sin_q15(270), -32767);
        assert_eq!(sin_q15(360), 0);
        assert_eq!(sin_q15(-90), -32767);
        assert_eq!(sin_q15(450), 32767);
        assert_eq!(cos_q15(0), 32767);
        assert_eq!(cos_q15(180), -32767);
    }

    #[test]
    fn sine_symmetry() {
        for d in 0..=90 {
            assert_eq!(sin_q15(d), sin_q15(180 - d));
            assert_eq!(sin_q15(d), -sin_q15(-d));
        }
    }

    #[test]
    fn isqrt_exact_squares() {
        for v in [0u32, 1, 2, 3, 4, 15, 16, 17, 255, 256, 65535, 65536] {
            let r = isqrt(v);
            assert!(r * r <= v);
            assert!((r + 1) * (r + 1) > v);
        }
        assert_eq!(isqrt(u32::MAX), 65535);
    }

    #[test]
    fn sqrt_error_splits() {
        let (r, e) = sqrt_with_error(10);
        assert_eq!((r, e), (3, 1));
        let (r, e) = sqrt_with_error(16);
        assert_eq!((r, e), (4, 0));
    }

    #[test]
    fn coverage_ramp() {
        let r = 20i32;
        // Well inside.
        assert_eq!(edge_coverage(((r - 2) * (r - 2)) as u64, r), 255);
        // Well outside.
        assert_eq!(edge_coverage(((r + 2) * (r + 2)) as u64, r), 0);
        // On the edge: roughly half covered.
        let mid = edge_coverage((r * r) as u64, r);
        assert!(mid > 64 && mid < 192, "mid = {mid}");
    }
}

//! Colors and fixed-point alpha blending per pixel format.
//!
//! Everything here is a pure function over raw framebuffer bytes; the
//! rasterizers and surfaces never need to know the device representation
//! beyond picking a [`PixelFormat`] at registration time.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// ITU-R BT.601 integer luma, used for `Gray8` targets.
    pub fn luma(self) -> u8 {
        ((self.r as u32 * 77 + self.g as u32 * 151 + self.b as u32 * 28) >> 8) as u8
    }
}

/// Framebuffer pixel layout; 8/16/24/32 bits per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Gray8,
    Rgb565,
    Rgb888,
    Argb8888,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Argb8888 => 4,
        }
    }
}

/// Fixed-point mix of two 8-bit channels: `fg*alpha + bg*(1-alpha)`.
#[inline]
fn mix8(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Blend two colors in fixed point. `alpha == 255` returns `fg` exactly and
/// `alpha == 0` returns `bg` exactly.
pub fn mix(fg: Color, bg: Color, alpha: u8) -> Color {
    Color {
        r: mix8(fg.r, bg.r, alpha),
        g: mix8(fg.g, bg.g, alpha),
        b: mix8(fg.b, bg.b, alpha),
        a: bg.a.max(mix8(fg.a, bg.a, alpha)),
    }
}

pub const fn to_rgb565(c: Color) -> u16 {
    (((c.r as u16) & 0xF8) << 8) | (((c.g as u16) & 0xFC) << 3) | ((c.b as u16) >> 3)
}

pub const fn from_rgb565(v: u16) -> Color {
    // Replicate high bits into the low bits so full-scale stays full-scale.
    let r = ((v >> 11) & 0x1F) as u8;
    let g = ((v >> 5) & 0x3F) as u8;
    let b = (v & 0x1F) as u8;
    Color {
        r: (r << 3) | (r >> 2),
        g: (g << 2) | (g >> 4),
        b: (b << 3) | (b >> 2),
        a: 255,
    }
}

/// Parallel-field RGB565 blend: both channels widened into one u32 so a
/// single multiply covers red, green and blue.
#[inline]
fn blend_rgb565(dst: u16, fg: u16, alpha: u8) -> u16 {
    let a = ((alpha as u32) + 4) >> 3; // 0..=32
    let fg = ((fg as u32) | ((fg as u32) << 16)) & 0x07E0_F81F;
    let bg = ((dst as u32) | ((dst as u32) << 16)) & 0x07E0_F81F;
    let out = ((fg * a + bg * (32 - a)) >> 5) & 0x07E0_F81F;
    (out | (out >> 16)) as u16
}

/// Read one pixel from `buf` (which must hold at least one pixel of `fmt`).
pub fn read_pixel(buf: &[u8], fmt: PixelFormat) -> Color {
    match fmt {
        PixelFormat::Gray8 => {
            let v = buf[0];
            Color::rgb(v, v, v)
        }
        PixelFormat::Rgb565 => from_rgb565(u16::from_le_bytes([buf[0], buf[1]])),
        PixelFormat::Rgb888 => Color::rgb(buf[0], buf[1], buf[2]),
        PixelFormat::Argb8888 => Color::rgba(buf[1], buf[2], buf[3], buf[0]),
    }
}

/// Write one pixel into `buf` without blending.
pub fn write_pixel(buf: &mut [u8], fmt: PixelFormat, c: Color) {
    match fmt {
        PixelFormat::Gray8 => buf[0] = c.luma(),
        PixelFormat::Rgb565 => buf[..2].copy_from_slice(&to_rgb565(c).to_le_bytes()),
        PixelFormat::Rgb888 => {
            buf[0] = c.r;
            buf[1] = c.g;
            buf[2] = c.b;
        }
        PixelFormat::Argb8888 => {
            buf[0] = c.a;
            buf[1] = c.r;
            buf[2] = c.g;
            buf[3] = c.b;
        }
    }
}

/// Blend `c` over the pixel already in `buf` with the given coverage.
pub fn blend_pixel(buf: &mut [u8], fmt: PixelFormat, c: Color, alpha: u8) {
    if alpha == 0 {
        return;
    }
    if alpha == 255 {
        write_pixel(buf, fmt, c);
        return;
    }
    match fmt {
        PixelFormat::Rgb565 => {
            let dst = u16::from_le_bytes([buf[0], buf[1]]);
            let out = blend_rgb565(dst, to_rgb565(c), alpha);
            buf[..2].copy_from_slice(&out.to_le_bytes());
        }
        _ => {
            let dst = read_pixel(buf, fmt);
            write_pixel(buf, fmt, mix(c, dst, alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_boundaries() {
        let fg = Color::rgb(200, 100, 50);
        let bg = Color::rgb(10, 20, 30);
        assert_eq!(mix(fg, bg, 255), fg);
        let z = mix(fg, bg, 0);
        assert_eq!((z.r, z.g, z.b), (bg.r, bg.g, bg.b));
    }

    #[test]
    fn rgb565_full_scale_round_trip() {
        assert_eq!(from_rgb565(to_rgb565(Color::WHITE)), Color::WHITE);
        assert_eq!(from_rgb565(to_rgb565(Color::BLACK)), Color::BLACK);
    }

    #[test]
    fn blend_opaque_overwrites() {
        let mut buf = [0u8; 2];
        write_pixel(&mut buf, PixelFormat::Rgb565, Color::BLACK);
        blend_pixel(&mut buf, PixelFormat::Rgb565, Color::WHITE, 255);
        assert_eq!(read_pixel(&buf, PixelFormat::Rgb565), Color::WHITE);
    }

    #[test]
    fn blend_zero_is_noop() {
        let mut buf = [0u8; 3];
        write_pixel(&mut buf, PixelFormat::Rgb888, Color::rgb(9, 9, 9));
        blend_pixel(&mut buf, PixelFormat::Rgb888, Color::WHITE, 0);
        assert_eq!(read_pixel(&buf, PixelFormat::Rgb888), Color::rgb(9, 9, 9));
    }

    #[test]
    fn blend_565_half_is_midway() {
        let mut buf = [0u8; 2];
        write_pixel(&mut buf, PixelFormat::Rgb565, Color::BLACK);
        blend_pixel(&mut buf, PixelFormat::Rgb565, Color::WHITE, 128);
        let c = read_pixel(&buf, PixelFormat::Rgb565);
        // Half coverage of white over black lands near mid grey.
        assert!(c.r > 100 && c.r < 160, "r = {}", c.r);
    }

    #[test]
    fn gray8_uses_luma() {
        let mut buf = [0u8; 1];
        write_pixel(&mut buf, PixelFormat::Gray8, Color::rgb(255, 255, 255));
        assert!(buf[0] >= 254);
    }
}

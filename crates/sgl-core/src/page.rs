//! The root node specialization: owns the screen and paints the background.

use std::rc::Rc;

use crate::color::{self, Color, PixelFormat};
use crate::event::{Event, EventKind};
use crate::node::NodeState;
use crate::surface::Surface;
use crate::widget::Widget;

/// Read-only pixel image, shareable between pages.
#[derive(Clone)]
pub struct Pixmap {
    pub width: i32,
    pub height: i32,
    pub format: PixelFormat,
    pub data: Rc<[u8]>,
}

#[derive(Clone)]
pub enum Background {
    Solid(Color),
    Pixmap(Pixmap),
}

/// Widget backing every page node. Fills its area with the background each
/// time the composer asks; strips outside the background pixmap fall back
/// to black.
pub struct Page {
    pub background: Background,
}

impl Page {
    pub fn new(background: Background) -> Self {
        Page { background }
    }
}

impl Widget for Page {
    fn construct(
        &mut self,
        surface: Option<&mut Surface<'_>>,
        node: &mut NodeState,
        event: &Event,
    ) {
        if event.kind != EventKind::DrawMain {
            return;
        }
        let Some(surface) = surface else { return };
        match &self.background {
            Background::Solid(c) => {
                surface.fill_rect(node.clip, *c, node.style.alpha);
            }
            Background::Pixmap(p) => {
                let Some(r) = node.clip.intersect(&surface.area()) else {
                    return;
                };
                let bpp = p.format.bytes_per_pixel();
                for y in r.y1..=r.y2 {
                    let sy = y - node.rect.y1;
                    for x in r.x1..=r.x2 {
                        let sx = x - node.rect.x1;
                        let c = if sx < p.width && sy < p.height {
                            let o = (sy as usize * p.width as usize + sx as usize) * bpp;
                            color::read_pixel(&p.data[o..o + bpp], p.format)
                        } else {
                            Color::BLACK
                        };
                        surface.blend_pixel(x, y, c, node.style.alpha);
                    }
                }
            }
        }
    }
}

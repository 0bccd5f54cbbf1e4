//! The reference widget: a styled rounded panel.

use sgl_core::color::Color;
use sgl_core::event::{Event, EventKind};
use sgl_core::geometry::Area;
use sgl_core::node::{NodeFlags, NodeState};
use sgl_core::surface::Surface;
use sgl_core::widget::Widget;

use crate::rect::fill_round_rect;

/// A rounded rectangle drawing its node's style: border color under the
/// body, body inset by the border width. While pressed the body is drawn
/// darkened, and flexible panels also shrink by a pixel per side for touch
/// feedback. Input events are forwarded to the node's callback, so a
/// clickable panel is a button.
#[derive(Default)]
pub struct Panel;

fn darken(c: Color) -> Color {
    Color::rgb(c.r - (c.r >> 2), c.g - (c.g >> 2), c.b - (c.b >> 2))
}

impl Widget for Panel {
    fn construct(
        &mut self,
        surface: Option<&mut Surface<'_>>,
        node: &mut NodeState,
        event: &Event,
    ) {
        match event.kind {
            EventKind::DrawMain => {
                let Some(surface) = surface else { return };
                let pressed = node.flags.contains(NodeFlags::PRESSED);
                let body = if pressed {
                    darken(node.style.body)
                } else {
                    node.style.body
                };
                let mut rect = node.rect;
                if pressed && node.flags.contains(NodeFlags::FLEXIBLE) {
                    // Stays within the composer's repaint margin.
                    rect = Area {
                        x1: rect.x1 + 1,
                        y1: rect.y1 + 1,
                        x2: rect.x2 - 1,
                        y2: rect.y2 - 1,
                    };
                }
                let radius = node.radius();
                let bw = node.border_width as i32;
                let alpha = node.style.alpha;
                if bw > 0 {
                    fill_round_rect(surface, rect, node.clip, radius, node.style.border, alpha);
                    let inner = Area {
                        x1: rect.x1 + bw,
                        y1: rect.y1 + bw,
                        x2: rect.x2 - bw,
                        y2: rect.y2 - bw,
                    };
                    fill_round_rect(surface, inner, node.clip, (radius - bw).max(0), body, alpha);
                } else {
                    fill_round_rect(surface, rect, node.clip, radius, body, alpha);
                }
            }
            k if k.is_input() => {
                if let Some(cb) = &node.event_cb {
                    cb(event);
                }
            }
            _ => {}
        }
    }
}

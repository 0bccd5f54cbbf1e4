//! Framebuffer demo: renders a page of panels into an in-memory RGB565
//! framebuffer, drives a slide-in animation and a synthetic tap, then dumps
//! the final frame as a PPM image.
//!
//! The `Lcd` flush target stands in for a real panel driver; on hardware it
//! would push each strip over SPI/DMA instead of memcpy-ing into a vector.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use sgl_core::anim::{Anim, Easing};
use sgl_core::color::{Color, PixelFormat, from_rgb565};
use sgl_core::engine::{Engine, EngineConfig};
use sgl_core::event::InputKind;
use sgl_core::fb::{FlushTarget, FramebufferConfig};
use sgl_core::geometry::{Area, Point};
use sgl_core::node::NodeFlags;
use sgl_core::page::Background;
use sgl_draw::Panel;

const WIDTH: i32 = 240;
const HEIGHT: i32 = 135;

/// In-memory stand-in for an LCD: strips land in a full RGB565 frame.
struct Lcd {
    frame: Rc<RefCell<Vec<u8>>>,
}

impl FlushTarget for Lcd {
    fn flush(&mut self, area: Area, pixels: &[u8]) {
        let mut frame = self.frame.borrow_mut();
        let row = area.width() as usize * 2;
        for (i, y) in (area.y1..=area.y2).enumerate() {
            let dst = ((y * WIDTH + area.x1) * 2) as usize;
            frame[dst..dst + row].copy_from_slice(&pixels[i * row..(i + 1) * row]);
        }
    }
}

fn write_ppm(path: &str, frame: &[u8]) -> Result<()> {
    let mut out = Vec::with_capacity(frame.len() / 2 * 3 + 32);
    out.extend_from_slice(format!("P6\n{WIDTH} {HEIGHT}\n255\n").as_bytes());
    for px in frame.chunks_exact(2) {
        let c = from_rgb565(u16::from_le_bytes([px[0], px[1]]));
        out.extend_from_slice(&[c.r, c.g, c.b]);
    }
    std::fs::write(path, out).with_context(|| format!("writing {path}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let frame = Rc::new(RefCell::new(vec![0u8; (WIDTH * HEIGHT * 2) as usize]));
    let fb = FramebufferConfig {
        width: WIDTH,
        height: HEIGHT,
        format: PixelFormat::Rgb565,
        // 16-row working buffer, the frame composes in 9 strips.
        buffer_bytes: (WIDTH * 16 * 2) as usize,
        double_buffered: false,
    };
    let mut engine = Engine::new(
        EngineConfig::new(fb),
        Box::new(Lcd {
            frame: frame.clone(),
        }),
    )?;

    let page = engine.create_page(Background::Solid(Color::rgb(24, 28, 38)));

    // A static card with a border.
    let card = engine.create(Some(page), Box::new(Panel))?;
    {
        let s = engine.tree_mut().state_mut(card)?;
        s.rect = Area::new(16, 16, 120, 64);
        s.style.body = Color::rgb(52, 58, 76);
        s.style.border = Color::rgb(110, 120, 150);
        s.border_width = 2;
        s.set_radius(10);
    }

    // A clickable button on the card.
    let clicks = Rc::new(RefCell::new(0u32));
    let button = engine.create(Some(card), Box::new(Panel))?;
    {
        let n = clicks.clone();
        let s = engine.tree_mut().state_mut(button)?;
        s.rect = Area::new(32, 48, 64, 24);
        s.style.body = Color::rgb(66, 133, 244);
        s.set_radius(8);
        s.flags.insert(NodeFlags::CLICKABLE);
        s.event_cb = Some(Rc::new(move |ev| {
            log::info!("button event: {:?}", ev.kind);
            *n.borrow_mut() += 1;
        }));
    }

    // A badge that slides in from the right edge.
    let badge = engine.create(Some(page), Box::new(Panel))?;
    {
        let s = engine.tree_mut().state_mut(badge)?;
        s.rect = Area::new(WIDTH, 90, 72, 32);
        s.style.body = Color::rgb(210, 90, 70);
        s.set_radius(16);
    }
    engine.add_anim(
        Anim::new(
            WIDTH,
            150,
            60,
            Box::new(move |tree, x| {
                let _ = tree.set_pos(badge, x, 90);
            }),
        )
        .with_easing(Easing::EaseOut),
    );

    engine.load_page(page)?;

    // 120 ticks: the slide-in finishes, with a tap on the button midway.
    for tick in 0..120 {
        if tick == 40 {
            engine.send_pos(Point::new(40, 55), InputKind::Pressed);
        }
        if tick == 50 {
            engine.send_pos(Point::new(40, 55), InputKind::Released);
        }
        engine.advance_ticks(1);
        engine.task()?;
    }
    log::info!("button saw {} events", clicks.borrow());

    write_ppm("frame.ppm", &frame.borrow())?;
    println!("wrote frame.ppm ({WIDTH}x{HEIGHT})");
    Ok(())
}

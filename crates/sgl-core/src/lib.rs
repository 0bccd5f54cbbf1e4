//! # SGL core
//!
//! A retained-mode scene graph for resource-constrained framebuffer
//! targets: widgets live in a node arena, repaint is driven by dirty
//! rectangles, and frames are composed in horizontal strips sized to a
//! small working buffer so no full-screen buffer is ever needed.
//!
//! The pieces, bottom-up:
//!
//! - [`geometry`] / [`color`] / [`math`] — integer rectangle math,
//!   per-format fixed-point blending, Q15 sine and integer square roots.
//! - [`node`] — the scene graph: a slotmap arena of first-child/
//!   next-sibling nodes with generation-checked [`NodeKey`] handles.
//! - [`dirty`] — the dirty-rectangle accumulator (single bound or pooled).
//! - [`event`] — fixed-capacity input queue and the press/release
//!   dispatcher with drag-out-of-target recovery.
//! - [`anim`] — tick-driven integer value animations.
//! - [`surface`] / [`fb`] — strip buffers and the panel flush boundary.
//! - [`engine`] — the owning context and per-tick driver.
//!
//! A minimal setup:
//!
//! ```no_run
//! use sgl_core::*;
//!
//! struct Panel; // your flush target, e.g. an SPI panel driver
//! impl FlushTarget for Panel {
//!     fn flush(&mut self, area: Area, pixels: &[u8]) {
//!         // push `pixels` to the display window `area`
//!         let _ = (area, pixels);
//!     }
//! }
//!
//! let fb = FramebufferConfig {
//!     width: 240,
//!     height: 135,
//!     format: PixelFormat::Rgb565,
//!     buffer_bytes: 240 * 16 * 2,
//!     double_buffered: false,
//! };
//! let mut engine = Engine::new(EngineConfig::new(fb), Box::new(Panel)).unwrap();
//! let page = engine.create_page(Background::Solid(Color::BLACK));
//! engine.load_page(page).unwrap();
//! loop {
//!     engine.advance_ticks(1); // or TickHandle::inc from a timer ISR
//!     engine.task().unwrap();
//! }
//! ```

pub mod anim;
pub mod color;
mod composer;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod event;
pub mod fb;
pub mod geometry;
pub mod math;
pub mod node;
pub mod page;
pub mod surface;
pub mod widget;

pub use anim::*;
pub use color::*;
pub use dirty::*;
pub use engine::*;
pub use error::Error;
pub use event::*;
pub use fb::*;
pub use geometry::*;
pub use node::*;
pub use page::*;
pub use surface::*;
pub use widget::*;

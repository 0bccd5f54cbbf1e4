//! The two-phase frame composer.
//!
//! Phase one walks the whole visible tree once per tick: sweeps destroyed
//! subtrees, runs lazy first-layout callbacks, recomputes clipped areas
//! top-down and accumulates dirty rectangles. Phase two runs only when
//! something is dirty: each dirty rect is composed in horizontal strips
//! sized to the working buffer, re-walking the visible tree per strip and
//! flushing each finished strip to the panel.

use smallvec::SmallVec;

use crate::dirty::DirtyTracker;
use crate::error::Error;
use crate::event::Event;
use crate::fb::Framebuffer;
use crate::node::{NodeFlags, NodeKey, Tree, WalkStack};
use crate::surface::Surface;

/// Extra pixels repainted around each dirty rect, absorbing anti-aliasing
/// bleed and press-feedback growth at the edges.
const DIRTY_MARGIN: i32 = 2;

/// Dirty-area calculation. Returns whether any area needs repainting.
pub(crate) fn dirty_pass(tree: &mut Tree, dirty: &mut DirtyTracker, page: NodeKey) -> bool {
    let mut any = false;
    let mut stack: WalkStack = SmallVec::new();
    stack.push(page);
    while let Some(k) = stack.pop() {
        let flags = match tree.state(k) {
            Ok(s) => s.flags,
            Err(_) => continue,
        };

        if flags.contains(NodeFlags::DESTROYED) {
            if k == page {
                // Never free the active page mid-walk; resurrect it.
                log::warn!("destroy of the active page ignored");
                if let Ok(s) = tree.state_mut(k) {
                    s.flags.remove(NodeFlags::DESTROYED);
                }
            } else {
                if let Ok(s) = tree.state(k) {
                    dirty.merge(s.clip.union(&s.rect));
                }
                let parent = tree.parent(k).ok().flatten();
                let _ = tree.free(k);
                if let Some(p) = parent {
                    let _ = tree.apply_layout(p);
                }
                any = true;
                continue;
            }
        }

        if flags.contains(NodeFlags::HIDDEN) {
            // Whole subtree skipped, but a freshly hidden node still needs
            // its vacated area repainted underneath it.
            if flags.contains(NodeFlags::DIRTY)
                && let Ok(s) = tree.state_mut(k)
            {
                dirty.merge(s.clip.union(&s.rect));
                s.flags.remove(NodeFlags::DIRTY);
                any = true;
            }
            continue;
        }

        if flags.contains(NodeFlags::NEEDS_INIT) {
            // Lazy first layout: widgets compute size-dependent defaults
            // exactly once, before the clip is established.
            let _ = tree.dispatch(k, None, &Event::draw_init());
            if let Ok(s) = tree.state_mut(k) {
                s.flags.remove(NodeFlags::NEEDS_INIT);
            }
        }

        if tree
            .state(k)
            .map(|s| s.flags.contains(NodeFlags::DIRTY))
            .unwrap_or(false)
        {
            let parent_clip = match tree.parent(k).ok().flatten() {
                Some(p) => tree.state(p).map(|s| s.clip).unwrap_or_default(),
                // The page clips against its own full-screen rect.
                None => tree.state(k).map(|s| s.rect).unwrap_or_default(),
            };
            if let Ok(s) = tree.state_mut(k) {
                let old = s.clip;
                match s.rect.intersect(&parent_clip) {
                    Some(clip) => {
                        s.clip = clip;
                        s.flags.remove(NodeFlags::INVALID);
                    }
                    None => {
                        // Clipped away entirely: skip in future overlap
                        // tests instead of erroring.
                        s.clip = crate::geometry::Area::empty();
                        s.flags.insert(NodeFlags::INVALID);
                    }
                }
                let merged = s.clip.union(&old);
                s.flags.remove(NodeFlags::DIRTY);
                dirty.merge(merged);
            }
            any = true;
        }

        if let Ok(children) = tree.children(k) {
            stack.extend(children);
        }
    }
    any
}

/// Strip-sliced draw over every accumulated dirty rectangle.
pub(crate) fn draw_pass(
    tree: &mut Tree,
    fb: &mut Framebuffer,
    dirty: &DirtyTracker,
    page: NodeKey,
) -> Result<(), Error> {
    let screen = fb.screen();
    let bpp = fb.config().format.bytes_per_pixel();
    for rect in dirty.rects() {
        let Some(rect) = rect.expand(DIRTY_MARGIN).intersect(&screen) else {
            continue;
        };
        let strip_h = fb.strip_height(rect.width());
        let mut y = rect.y1;
        while y <= rect.y2 {
            let band = crate::geometry::Area {
                x1: rect.x1,
                y1: y,
                x2: rect.x2,
                y2: (y + strip_h - 1).min(rect.y2),
            };
            let len = band.width() as usize * band.height() as usize * bpp;
            fb.wait_ready();
            let format = fb.config().format;
            {
                let buf = fb.active_buffer();
                let mut surface = Surface::new(&mut buf[..len], format, band)?;
                compose_band(tree, &mut surface, page)?;
            }
            fb.flush_strip(band, len);
            y += strip_h;
        }
    }
    Ok(())
}

/// Pre-order walk in painter's order: a node draws before its children, a
/// sibling's whole subtree draws before the next sibling.
fn compose_band(tree: &mut Tree, surface: &mut Surface<'_>, page: NodeKey) -> Result<(), Error> {
    let band = surface.area();
    let mut stack: WalkStack = SmallVec::new();
    stack.push(page);
    while let Some(k) = stack.pop() {
        let s = match tree.state(k) {
            Ok(s) => s,
            Err(_) => continue,
        };
        if s.flags
            .intersects(NodeFlags::HIDDEN | NodeFlags::INVALID | NodeFlags::DESTROYED)
        {
            continue;
        }
        if !s.clip.overlaps(&band) {
            continue; // children are inside this clip, skip the subtree
        }
        tree.dispatch(k, Some(surface), &Event::draw_main())?;
        if let Ok(children) = tree.children(k) {
            stack.extend(children.into_iter().rev());
        }
    }
    Ok(())
}

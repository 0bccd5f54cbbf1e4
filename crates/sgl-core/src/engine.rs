//! The top-level driver tying events, animation, dirty calculation and
//! frame composition together, once per scheduler tick.
//!
//! There are no global singletons: an [`Engine`] owns every piece of state,
//! so multiple independent displays are just multiple engines. The only
//! cross-thread value is the tick counter, incremented from a hardware
//! timer interrupt through a [`TickHandle`] and read/reset by the main
//! loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::anim::{Anim, AnimId, Animations};
use crate::composer;
use crate::dirty::{DirtyPolicy, DirtyTracker};
use crate::error::Error;
use crate::event::{Dispatcher, InputKind, PressState};
use crate::fb::{Framebuffer, FramebufferConfig, FlushTarget};
use crate::geometry::Point;
use crate::node::{NodeFlags, NodeKey, Tree, WalkStack};
use crate::page::{Background, Page};
use crate::widget::Widget;

/// Cloneable handle for the timer ISR; each `inc()` is one tick.
#[derive(Clone)]
pub struct TickHandle(Arc<AtomicU32>);

impl TickHandle {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub fb: FramebufferConfig,
    /// Event queue capacity; must be a nonzero power of two.
    pub queue_capacity: usize,
    pub dirty_policy: DirtyPolicy,
    /// Ticks that must accumulate before `task` runs a full frame.
    pub tick_period: u32,
}

impl EngineConfig {
    pub fn new(fb: FramebufferConfig) -> Self {
        EngineConfig {
            fb,
            queue_capacity: 16,
            dirty_policy: DirtyPolicy::default(),
            tick_period: 1,
        }
    }
}

pub struct Engine {
    tree: Tree,
    dirty: DirtyTracker,
    dispatcher: Dispatcher,
    anims: Animations,
    fb: Framebuffer,
    active_page: Option<NodeKey>,
    ticks: Arc<AtomicU32>,
    period: u32,
}

impl Engine {
    pub fn new(config: EngineConfig, flush: Box<dyn FlushTarget>) -> Result<Self, Error> {
        Ok(Engine {
            tree: Tree::new(),
            dirty: DirtyTracker::new(config.dirty_policy),
            dispatcher: Dispatcher::new(config.queue_capacity)?,
            anims: Animations::new(),
            fb: Framebuffer::register(config.fb, flush)?,
            active_page: None,
            ticks: Arc::new(AtomicU32::new(0)),
            period: config.tick_period.max(1),
        })
    }

    pub fn tick_handle(&self) -> TickHandle {
        TickHandle(self.ticks.clone())
    }

    /// Add ticks from the main thread (tests, demos without a timer ISR).
    pub fn advance_ticks(&mut self, n: u32) {
        self.ticks.fetch_add(n, Ordering::Relaxed);
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn press_state(&self) -> PressState {
        self.dispatcher.press_state()
    }

    pub fn animations(&self) -> &Animations {
        &self.anims
    }

    pub fn add_anim(&mut self, anim: Anim) -> AnimId {
        self.anims.add(anim)
    }

    pub fn remove_anim(&mut self, id: AnimId) {
        self.anims.remove(id);
    }

    pub fn active_page(&self) -> Option<NodeKey> {
        self.active_page
    }

    /// Create a node: with no parent this instantiates a page (root) sized
    /// to the registered framebuffer, otherwise a child appended under
    /// `parent`.
    pub fn create(
        &mut self,
        parent: Option<NodeKey>,
        widget: Box<dyn Widget>,
    ) -> Result<NodeKey, Error> {
        match parent {
            None => Ok(self.tree.create_root(self.fb.screen(), widget)),
            Some(p) => self.tree.create(p, widget),
        }
    }

    /// Create a page with the given background.
    pub fn create_page(&mut self, background: Background) -> NodeKey {
        self.tree
            .create_root(self.fb.screen(), Box::new(Page::new(background)))
    }

    /// Make `page` the active (displayed) page. Resets the tick counter and
    /// the dirty accumulator, then marks the page's subtree for repaint.
    pub fn load_page(&mut self, page: NodeKey) -> Result<(), Error> {
        if self.tree.parent(page)?.is_some() {
            return Err(Error::NoParent); // only roots can be loaded
        }
        self.active_page = Some(page);
        self.ticks.store(0, Ordering::Relaxed);
        self.dirty.reset();
        let mut stack: WalkStack = Default::default();
        stack.push(page);
        while let Some(k) = stack.pop() {
            if let Ok(s) = self.tree.state_mut(k) {
                s.flags.insert(NodeFlags::DIRTY);
            }
            if let Ok(children) = self.tree.children(k) {
                stack.extend(children);
            }
        }
        Ok(())
    }

    /// Move a node, translating its subtree; the vacated area is folded
    /// into the dirty tracker so it repaints.
    pub fn set_pos(&mut self, key: NodeKey, x: i32, y: i32) -> Result<(), Error> {
        let old = self.tree.set_pos(key, x, y)?;
        self.dirty.merge(old);
        Ok(())
    }

    /// Mark a subtree for removal; it is freed by the next dirty pass.
    pub fn destroy(&mut self, key: NodeKey) -> Result<(), Error> {
        self.tree.destroy(key)
    }

    /// Inject a pointer event (panel touch ISR or input driver).
    pub fn send_pos(&mut self, pos: Point, kind: InputKind) {
        self.dispatcher.send_pos(pos, kind);
    }

    /// Run one scheduler step: if a full tick period has accumulated,
    /// dispatch input, advance animations, recompute dirty areas and — when
    /// anything changed — compose and flush a frame. Returns whether a
    /// frame was composed.
    pub fn task(&mut self) -> Result<bool, Error> {
        let elapsed = self.ticks.load(Ordering::Relaxed);
        if elapsed < self.period {
            return Ok(false);
        }
        self.ticks.fetch_sub(elapsed, Ordering::Relaxed);
        let page = self.active_page.ok_or(Error::NoActivePage)?;

        self.dispatcher.task(&mut self.tree, page);
        self.anims.task(&mut self.tree, elapsed);

        let any = composer::dirty_pass(&mut self.tree, &mut self.dirty, page);
        if any {
            composer::draw_pass(&mut self.tree, &mut self.fb, &self.dirty, page)?;
            self.dirty.reset();
        }
        Ok(any)
    }
}

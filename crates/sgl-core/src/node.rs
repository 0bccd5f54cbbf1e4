//! The scene graph: an arena of nodes addressed by generational keys.
//!
//! The tree is encoded first-child/next-sibling, so a parent never stores a
//! child vector; paint order is sibling order (painter's algorithm, later
//! siblings on top). All subtree walks use a growable explicit stack bounded
//! by node count, never by a compile-time depth cap.

use bitflags::bitflags;
use slotmap::SlotMap;
use smallvec::SmallVec;
use std::rc::Rc;

use crate::color::Color;
use crate::error::Error;
use crate::event::Event;
use crate::geometry::{Area, Point};
use crate::surface::Surface;
use crate::widget::Widget;

slotmap::new_key_type! {
    /// Generational handle to a node. Using a key after the node was freed
    /// yields [`Error::DeadNode`] instead of touching recycled memory.
    pub struct NodeKey;
}

/// Inline capacity for traversal stacks; deeper trees spill to the heap.
pub(crate) type WalkStack = SmallVec<[NodeKey; 16]>;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct NodeFlags: u16 {
        /// Needs repaint; cleared by the dirty pass.
        const DIRTY      = 1 << 0;
        /// Subtree is skipped by drawing, hit-testing and dirty tracking.
        const HIDDEN     = 1 << 1;
        /// First layout pending: gets a `DrawInit` before first paint.
        const NEEDS_INIT = 1 << 2;
        /// Marked for removal; swept (and freed) by the next dirty pass.
        const DESTROYED  = 1 << 3;
        const CLICKABLE  = 1 << 4;
        /// Intercepts drags before its children.
        const MOVABLE    = 1 << 5;
        /// Press feedback may grow/shrink the node by a pixel or two.
        const FLEXIBLE   = 1 << 6;
        const PRESSED    = 1 << 7;
        const FOCUSED    = 1 << 8;
        /// Clipped area came out empty; skipped by overlap tests.
        const INVALID    = 1 << 9;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    None,
    Horizontal,
    Vertical,
    /// Accepted by the enum, rejected by `set_layout`.
    Grid,
}

/// Visual style shared by every node; widgets are free to ignore it.
#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub body: Color,
    pub border: Color,
    pub alpha: u8,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            body: Color::rgb(60, 60, 60),
            border: Color::BLACK,
            alpha: 255,
        }
    }
}

/// Maximum storable corner radius (12-bit field in the wire-level original).
pub const RADIUS_MAX: u16 = 4095;

/// The generic, widget-independent half of a node.
///
/// This is what a widget's construct callback can see and mutate; links and
/// the widget box itself stay private to the tree.
pub struct NodeState {
    /// Requested coordinates, set by layout and API calls.
    pub rect: Area,
    /// Coordinates after intersection with the parent's clipped area; what
    /// drawing and hit-testing actually use.
    pub clip: Area,
    pub flags: NodeFlags,
    pub layout: Layout,
    pub border_width: u8,
    radius: u16,
    pub style: Style,
    /// User callback, invoked by widgets at their discretion.
    pub event_cb: Option<Rc<dyn Fn(&Event)>>,
}

impl Default for NodeState {
    fn default() -> Self {
        NodeState::new(Area::empty())
    }
}

// Manual impl: the user callback is opaque.
impl std::fmt::Debug for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeState")
            .field("rect", &self.rect)
            .field("clip", &self.clip)
            .field("flags", &self.flags)
            .field("layout", &self.layout)
            .field("border_width", &self.border_width)
            .field("radius", &self.radius)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl NodeState {
    fn new(rect: Area) -> Self {
        NodeState {
            rect,
            clip: Area::empty(),
            flags: NodeFlags::DIRTY | NodeFlags::NEEDS_INIT,
            layout: Layout::None,
            border_width: 0,
            radius: 0,
            style: Style::default(),
            event_cb: None,
        }
    }

    /// Corner radius, re-clamped against the current size so a later resize
    /// can never leave a stale oversized radius behind.
    pub fn radius(&self) -> i32 {
        let half = (self.rect.width().min(self.rect.height()) / 2).max(0);
        (self.radius as i32).min(half)
    }

    /// Set the corner radius, clamped to `min(width, height) / 2` and to
    /// [`RADIUS_MAX`].
    pub fn set_radius(&mut self, radius: u16) {
        let half = (self.rect.width().min(self.rect.height()) / 2).clamp(0, RADIUS_MAX as i32);
        self.radius = radius.min(half as u16).min(RADIUS_MAX);
        self.flags.insert(NodeFlags::DIRTY);
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }

    /// Hide or show the node and its subtree, marking it for repaint so the
    /// vacated pixels are restored.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.flags.set(NodeFlags::HIDDEN, hidden);
        self.flags.insert(NodeFlags::DIRTY);
    }

    pub fn set_clickable(&mut self, clickable: bool) {
        self.flags.set(NodeFlags::CLICKABLE, clickable);
    }

    pub fn set_movable(&mut self, movable: bool) {
        self.flags.set(NodeFlags::MOVABLE, movable);
    }

    /// Rounded-rect point test on the clipped area: exact rectangle test for
    /// the core region, Euclidean distance against the corner circles in the
    /// corner zones.
    pub fn contains_point(&self, p: Point) -> bool {
        if !self.clip.contains_point(p) {
            return false;
        }
        let r = {
            let half = (self.clip.width().min(self.clip.height()) / 2).max(0);
            (self.radius as i32).min(half)
        };
        if r == 0 {
            return true;
        }
        let a = &self.clip;
        // Corner circle centers, inset by r from each corner.
        let cx = if p.x < a.x1 + r {
            a.x1 + r
        } else if p.x > a.x2 - r {
            a.x2 - r
        } else {
            return true;
        };
        let cy = if p.y < a.y1 + r {
            a.y1 + r
        } else if p.y > a.y2 - r {
            a.y2 - r
        } else {
            return true;
        };
        let dx = (p.x - cx) as i64;
        let dy = (p.y - cy) as i64;
        dx * dx + dy * dy <= (r as i64) * (r as i64)
    }
}

pub(crate) struct Node {
    pub parent: Option<NodeKey>,
    pub first_child: Option<NodeKey>,
    pub next_sibling: Option<NodeKey>,
    pub state: NodeState,
    pub widget: Box<dyn Widget>,
}

/// The node arena. Owns every node; freeing recycles slots through the
/// slotmap free list, and generational keys catch stale handles.
#[derive(Default)]
pub struct Tree {
    nodes: SlotMap<NodeKey, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Tree::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub(crate) fn get(&self, key: NodeKey) -> Result<&Node, Error> {
        self.nodes.get(key).ok_or(Error::DeadNode)
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Result<&mut Node, Error> {
        self.nodes.get_mut(key).ok_or(Error::DeadNode)
    }

    pub fn state(&self, key: NodeKey) -> Result<&NodeState, Error> {
        Ok(&self.get(key)?.state)
    }

    pub fn state_mut(&mut self, key: NodeKey) -> Result<&mut NodeState, Error> {
        Ok(&mut self.get_mut(key)?.state)
    }

    pub fn parent(&self, key: NodeKey) -> Result<Option<NodeKey>, Error> {
        Ok(self.get(key)?.parent)
    }

    /// Direct children in sibling (paint) order.
    pub fn children(&self, key: NodeKey) -> Result<WalkStack, Error> {
        let mut out = WalkStack::new();
        let mut cur = self.get(key)?.first_child;
        while let Some(c) = cur {
            out.push(c);
            cur = self.get(c)?.next_sibling;
        }
        Ok(out)
    }

    /// Create a root node (a page) with the given full area. Roots have no
    /// parent and their clipped area is seeded from `rect` directly.
    pub fn create_root(&mut self, rect: Area, widget: Box<dyn Widget>) -> NodeKey {
        let mut state = NodeState::new(rect);
        state.clip = rect;
        self.nodes.insert(Node {
            parent: None,
            first_child: None,
            next_sibling: None,
            state,
            widget,
        })
    }

    /// Create a node under `parent`, appended as last child. The parent's
    /// coordinates are copied as an initial placeholder until the first
    /// layout runs.
    pub fn create(&mut self, parent: NodeKey, widget: Box<dyn Widget>) -> Result<NodeKey, Error> {
        let rect = self.get(parent)?.state.rect;
        let key = self.nodes.insert(Node {
            parent: Some(parent),
            first_child: None,
            next_sibling: None,
            state: NodeState::new(rect),
            widget,
        });
        self.link_last(parent, key);
        Ok(key)
    }

    /// Append an unlinked node as `parent`'s last child.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), Error> {
        if self.get(child)?.parent.is_some() {
            self.unlink(child)?;
        }
        self.get(parent)?; // validate before mutating links
        self.get_mut(child)?.parent = Some(parent);
        self.link_last(parent, child);
        Ok(())
    }

    // Walks to the sibling tail; O(children) like the original.
    fn link_last(&mut self, parent: NodeKey, child: NodeKey) {
        let first = self.nodes[parent].first_child;
        match first {
            None => self.nodes[parent].first_child = Some(child),
            Some(mut cur) => {
                while let Some(next) = self.nodes[cur].next_sibling {
                    cur = next;
                }
                self.nodes[cur].next_sibling = Some(child);
            }
        }
    }

    /// Unlink `key` from its parent's child chain. Does not free anything.
    pub fn unlink(&mut self, key: NodeKey) -> Result<(), Error> {
        let (parent, next) = {
            let n = self.get(key)?;
            (n.parent, n.next_sibling)
        };
        if let Some(p) = parent {
            if self.nodes[p].first_child == Some(key) {
                self.nodes[p].first_child = next;
            } else {
                // O(n) predecessor scan along the sibling chain.
                let mut cur = self.nodes[p].first_child;
                while let Some(c) = cur {
                    if self.nodes[c].next_sibling == Some(key) {
                        self.nodes[c].next_sibling = next;
                        break;
                    }
                    cur = self.nodes[c].next_sibling;
                }
            }
        }
        let n = &mut self.nodes[key];
        n.parent = None;
        n.next_sibling = None;
        Ok(())
    }

    /// Unlink `key` and free its whole subtree, iteratively.
    pub fn free(&mut self, key: NodeKey) -> Result<(), Error> {
        self.unlink(key)?;
        let mut stack: WalkStack = SmallVec::new();
        stack.push(key);
        while let Some(k) = stack.pop() {
            let mut child = self.nodes[k].first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.nodes[c].next_sibling;
            }
            self.nodes.remove(k);
        }
        Ok(())
    }

    /// Move a node to (x, y), rigidly translating every descendant by the
    /// same delta and marking the whole subtree dirty. Returns the node's
    /// old extent so the caller can fold it into the dirty tracker.
    pub fn set_pos(&mut self, key: NodeKey, x: i32, y: i32) -> Result<Area, Error> {
        let (dx, dy, old_extent) = {
            let s = &self.get(key)?.state;
            (x - s.rect.x1, y - s.rect.y1, s.clip.union(&s.rect))
        };
        if dx == 0 && dy == 0 {
            return Ok(old_extent);
        }
        let mut stack: WalkStack = SmallVec::new();
        stack.push(key);
        while let Some(k) = stack.pop() {
            let n = &mut self.nodes[k];
            n.state.rect = n.state.rect.translate(dx, dy);
            n.state.flags.insert(NodeFlags::DIRTY);
            let mut child = n.first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.nodes[c].next_sibling;
            }
        }
        Ok(old_extent)
    }

    /// Swap with the next sibling (paint one step later, i.e. on top).
    pub fn move_up(&mut self, key: NodeKey) -> Result<(), Error> {
        let next = self.get(key)?.next_sibling;
        if let Some(next) = next {
            self.reorder(key, ReorderTarget::After(next))?;
        }
        Ok(())
    }

    /// Swap with the previous sibling (paint one step earlier).
    pub fn move_down(&mut self, key: NodeKey) -> Result<(), Error> {
        let prev = self.prev_sibling(key)?;
        if let Some(prev) = prev {
            self.reorder(key, ReorderTarget::Before(prev))?;
        }
        Ok(())
    }

    /// Make `key` the last sibling: painted on top of all its siblings.
    pub fn move_foreground(&mut self, key: NodeKey) -> Result<(), Error> {
        self.reorder(key, ReorderTarget::Last)
    }

    /// Make `key` the first sibling: painted beneath all its siblings.
    pub fn move_background(&mut self, key: NodeKey) -> Result<(), Error> {
        self.reorder(key, ReorderTarget::First)
    }

    fn prev_sibling(&self, key: NodeKey) -> Result<Option<NodeKey>, Error> {
        let parent = match self.get(key)?.parent {
            Some(p) => p,
            None => return Ok(None),
        };
        let mut cur = self.nodes[parent].first_child;
        let mut prev = None;
        while let Some(c) = cur {
            if c == key {
                return Ok(prev);
            }
            prev = Some(c);
            cur = self.nodes[c].next_sibling;
        }
        Ok(None)
    }

    fn reorder(&mut self, key: NodeKey, target: ReorderTarget) -> Result<(), Error> {
        let parent = self.get(key)?.parent.ok_or(Error::NoParent)?;
        self.unlink(key)?;
        self.nodes[key].parent = Some(parent);
        match target {
            ReorderTarget::First => {
                self.nodes[key].next_sibling = self.nodes[parent].first_child;
                self.nodes[parent].first_child = Some(key);
            }
            ReorderTarget::Last => self.link_last(parent, key),
            ReorderTarget::Before(anchor) => {
                if self.nodes[parent].first_child == Some(anchor) {
                    self.nodes[key].next_sibling = Some(anchor);
                    self.nodes[parent].first_child = Some(key);
                } else {
                    let mut cur = self.nodes[parent].first_child;
                    while let Some(c) = cur {
                        if self.nodes[c].next_sibling == Some(anchor) {
                            self.nodes[c].next_sibling = Some(key);
                            self.nodes[key].next_sibling = Some(anchor);
                            break;
                        }
                        cur = self.nodes[c].next_sibling;
                    }
                }
            }
            ReorderTarget::After(anchor) => {
                self.nodes[key].next_sibling = self.nodes[anchor].next_sibling;
                self.nodes[anchor].next_sibling = Some(key);
            }
        }
        self.nodes[key].state.flags.insert(NodeFlags::DIRTY);
        Ok(())
    }

    /// Select a layout for `key` and reposition its direct children.
    /// Grid is accepted nowhere: warn and fail per the unsupported-enum
    /// policy.
    pub fn set_layout(&mut self, key: NodeKey, layout: Layout) -> Result<(), Error> {
        if layout == Layout::Grid {
            log::warn!("grid layout requested but not implemented");
            return Err(Error::UnsupportedLayout);
        }
        self.get_mut(key)?.state.layout = layout;
        self.apply_layout(key)
    }

    /// Re-run `key`'s layout over its *direct* children only.
    pub fn apply_layout(&mut self, key: NodeKey) -> Result<(), Error> {
        let (layout, rect) = {
            let s = &self.get(key)?.state;
            (s.layout, s.rect)
        };
        let children = self.children(key)?;
        if children.is_empty() {
            return Ok(());
        }
        match layout {
            Layout::None => {}
            Layout::Horizontal => {
                let spans = split_lengths(rect.width(), children.len());
                let mut x = rect.x1;
                for (child, w) in children.iter().zip(spans) {
                    let s = &mut self.nodes[*child].state;
                    s.rect = Area::new(x, rect.y1, w, rect.height());
                    s.flags.insert(NodeFlags::DIRTY);
                    x += w;
                }
            }
            Layout::Vertical => {
                let spans = split_lengths(rect.height(), children.len());
                let mut y = rect.y1;
                for (child, h) in children.iter().zip(spans) {
                    let s = &mut self.nodes[*child].state;
                    s.rect = Area::new(rect.x1, y, rect.width(), h);
                    s.flags.insert(NodeFlags::DIRTY);
                    y += h;
                }
            }
            Layout::Grid => return Err(Error::UnsupportedLayout),
        }
        Ok(())
    }

    pub fn mark_dirty(&mut self, key: NodeKey) -> Result<(), Error> {
        self.get_mut(key)?.state.flags.insert(NodeFlags::DIRTY);
        Ok(())
    }

    /// Mark a subtree for removal; the next dirty pass frees it.
    pub fn destroy(&mut self, key: NodeKey) -> Result<(), Error> {
        self.get_mut(key)?.state.flags.insert(NodeFlags::DESTROYED);
        Ok(())
    }

    /// Invoke a node's construct callback, splitting the borrow so the
    /// widget can mutate both itself and the generic node state.
    pub(crate) fn dispatch(
        &mut self,
        key: NodeKey,
        surface: Option<&mut Surface<'_>>,
        event: &Event,
    ) -> Result<(), Error> {
        let node = self.get_mut(key)?;
        let Node { state, widget, .. } = node;
        widget.construct(surface, state, event);
        Ok(())
    }

    /// Hit-test `pos` against the subtree rooted at `root`, in paint order:
    /// per level the last (topmost) child containing the point wins, then
    /// descent continues into it. For motion events the descent stops at a
    /// movable node, which intercepts drags before its children.
    ///
    /// The deepest hit is then resolved upward to the nearest clickable
    /// (or, for motion, movable) node, itself included: labels and icons
    /// usually sit on top of the clickable container.
    pub fn hit_test(&self, root: NodeKey, pos: Point, motion: bool) -> Option<NodeKey> {
        let mut target = None;
        let mut cur = root;
        {
            let s = &self.get(root).ok()?.state;
            if s.is_hidden() || !s.contains_point(pos) {
                return None;
            }
        }
        loop {
            let mut hit_child = None;
            let mut child = self.nodes[cur].first_child;
            while let Some(c) = child {
                let s = &self.nodes[c].state;
                if !s.is_hidden()
                    && !s.flags.contains(NodeFlags::INVALID)
                    && !s.flags.contains(NodeFlags::DESTROYED)
                    && s.contains_point(pos)
                {
                    hit_child = Some(c);
                }
                child = self.nodes[c].next_sibling;
            }
            match hit_child {
                None => break,
                Some(c) => {
                    target = Some(c);
                    if motion && self.nodes[c].state.flags.contains(NodeFlags::MOVABLE) {
                        break;
                    }
                    cur = c;
                }
            }
        }
        // Ascend to the first node that actually wants this kind of event.
        let want = if motion {
            NodeFlags::MOVABLE
        } else {
            NodeFlags::CLICKABLE
        };
        let mut k = target?;
        loop {
            if self.nodes[k].state.flags.contains(want) {
                return Some(k);
            }
            k = self.nodes[k].parent?;
        }
    }
}

enum ReorderTarget {
    First,
    Last,
    Before(NodeKey),
    After(NodeKey),
}

/// Split `total` pixels into `count` spans, error-diffusing the remainder so
/// the spans differ by at most one pixel and sum exactly to `total`.
pub fn split_lengths(total: i32, count: usize) -> SmallVec<[i32; 8]> {
    let mut out = SmallVec::new();
    if count == 0 {
        return out;
    }
    let n = count as i32;
    let base = total / n;
    let rem = total % n;
    let mut err = 0;
    for _ in 0..count {
        err += rem;
        if err >= n {
            err -= n;
            out.push(base + 1);
        } else {
            out.push(base);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Container;

    fn tree_with_root() -> (Tree, NodeKey) {
        let mut t = Tree::new();
        let root = t.create_root(Area::new(0, 0, 240, 135), Box::new(Container));
        (t, root)
    }

    #[test]
    fn create_appends_in_order() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let b = t.create(root, Box::new(Container)).unwrap();
        let c = t.create(root, Box::new(Container)).unwrap();
        assert_eq!(t.children(root).unwrap().as_slice(), &[a, b, c]);
        // Placeholder coordinates copy the parent.
        assert_eq!(t.state(a).unwrap().rect, t.state(root).unwrap().rect);
    }

    #[test]
    fn set_pos_translates_descendants_rigidly() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let b = t.create(a, Box::new(Container)).unwrap();
        t.state_mut(a).unwrap().rect = Area::new(10, 10, 50, 50);
        t.state_mut(b).unwrap().rect = Area::new(20, 20, 10, 10);
        t.set_pos(a, 30, 15).unwrap();
        let ra = t.state(a).unwrap().rect;
        let rb = t.state(b).unwrap().rect;
        assert_eq!((ra.x1, ra.y1), (30, 15));
        assert_eq!((rb.x1, rb.y1), (40, 25));
        // Sizes unchanged.
        assert_eq!((ra.width(), ra.height()), (50, 50));
        assert_eq!((rb.width(), rb.height()), (10, 10));
        assert!(t.state(b).unwrap().flags.contains(NodeFlags::DIRTY));
    }

    #[test]
    fn free_drops_whole_subtree() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let b = t.create(a, Box::new(Container)).unwrap();
        let _c = t.create(b, Box::new(Container)).unwrap();
        let d = t.create(root, Box::new(Container)).unwrap();
        assert_eq!(t.len(), 5);
        t.free(a).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.children(root).unwrap().as_slice(), &[d]);
        // Stale handles are caught, not recycled silently.
        assert_eq!(t.state(b).unwrap_err(), Error::DeadNode);
    }

    #[test]
    fn reorder_changes_paint_order() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let b = t.create(root, Box::new(Container)).unwrap();
        let c = t.create(root, Box::new(Container)).unwrap();
        t.move_foreground(a).unwrap();
        assert_eq!(t.children(root).unwrap().as_slice(), &[b, c, a]);
        t.move_background(c).unwrap();
        assert_eq!(t.children(root).unwrap().as_slice(), &[c, b, a]);
        t.move_up(b).unwrap();
        assert_eq!(t.children(root).unwrap().as_slice(), &[c, a, b]);
        t.move_down(b).unwrap();
        assert_eq!(t.children(root).unwrap().as_slice(), &[c, b, a]);
    }

    #[test]
    fn split_lengths_sums_exactly() {
        for (total, count) in [(100, 3), (7, 3), (240, 7), (5, 8)] {
            let spans = split_lengths(total, count);
            assert_eq!(spans.len(), count);
            assert_eq!(spans.iter().sum::<i32>(), total);
            let min = spans.iter().min().unwrap();
            let max = spans.iter().max().unwrap();
            assert!(max - min <= 1, "uneven split {spans:?}");
        }
    }

    #[test]
    fn horizontal_layout_positions_direct_children() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let b = t.create(root, Box::new(Container)).unwrap();
        t.set_layout(root, Layout::Horizontal).unwrap();
        let ra = t.state(a).unwrap().rect;
        let rb = t.state(b).unwrap().rect;
        assert_eq!(ra, Area::new(0, 0, 120, 135));
        assert_eq!(rb, Area::new(120, 0, 120, 135));
    }

    #[test]
    fn grid_layout_is_rejected() {
        let (mut t, root) = tree_with_root();
        assert_eq!(
            t.set_layout(root, Layout::Grid).unwrap_err(),
            Error::UnsupportedLayout
        );
    }

    #[test]
    fn radius_clamps_to_half_min_extent() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let s = t.state_mut(a).unwrap();
        s.rect = Area::new(0, 0, 100, 40);
        s.set_radius(500);
        assert_eq!(s.radius(), 20);
        s.set_radius(5);
        assert_eq!(s.radius(), 5);
    }

    #[test]
    fn rounded_corner_hit_test() {
        let (mut t, root) = tree_with_root();
        let a = t.create(root, Box::new(Container)).unwrap();
        let s = t.state_mut(a).unwrap();
        s.rect = Area::new(0, 0, 100, 100);
        s.clip = s.rect;
        s.set_radius(20);
        s.flags.insert(NodeFlags::CLICKABLE);
        let s = t.state(a).unwrap();
        // Corner zone, outside the rounding circle.
        assert!(!s.contains_point(Point::new(5, 5)));
        // Core zone.
        assert!(s.contains_point(Point::new(50, 50)));
        // Corner zone but inside the circle.
        assert!(s.contains_point(Point::new(15, 15)));
    }

    #[test]
    fn hit_test_prefers_clickable_ancestor() {
        let (mut t, root) = tree_with_root();
        let button = t.create(root, Box::new(Container)).unwrap();
        let label = t.create(button, Box::new(Container)).unwrap();
        for (k, rect) in [(button, Area::new(10, 10, 50, 50)), (label, Area::new(20, 20, 30, 10))] {
            let s = t.state_mut(k).unwrap();
            s.rect = rect;
            s.clip = rect;
        }
        t.state_mut(root).unwrap().clip = Area::new(0, 0, 240, 135);
        t.state_mut(button)
            .unwrap()
            .flags
            .insert(NodeFlags::CLICKABLE);
        // Point over the label resolves to the clickable container beneath.
        assert_eq!(t.hit_test(root, Point::new(25, 25), false), Some(button));
        // Point outside everything resolves to nothing.
        assert_eq!(t.hit_test(root, Point::new(200, 100), false), None);
    }

    #[test]
    fn motion_stops_at_movable_ancestor() {
        let (mut t, root) = tree_with_root();
        let pane = t.create(root, Box::new(Container)).unwrap();
        let child = t.create(pane, Box::new(Container)).unwrap();
        for k in [pane, child] {
            let s = t.state_mut(k).unwrap();
            s.rect = Area::new(0, 0, 100, 100);
            s.clip = s.rect;
        }
        t.state_mut(root).unwrap().clip = Area::new(0, 0, 240, 135);
        t.state_mut(pane).unwrap().flags.insert(NodeFlags::MOVABLE);
        t.state_mut(child)
            .unwrap()
            .flags
            .insert(NodeFlags::CLICKABLE | NodeFlags::MOVABLE);
        // Drags are intercepted by the movable pane before its children.
        assert_eq!(t.hit_test(root, Point::new(50, 50), true), Some(pane));
        // Plain clicks still reach the child.
        assert_eq!(t.hit_test(root, Point::new(50, 50), false), Some(child));
    }
}

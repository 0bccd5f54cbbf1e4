//! Input events: the fixed-capacity queue and the press/release dispatcher.
//!
//! The queue is a power-of-two ring with a deliberate overflow policy for
//! embedded input: when full, the *entire* queue is reset and an error is
//! logged. Dropping a burst beats blocking the main loop or growing on a
//! device without heap headroom to spare.

use crate::error::Error;
use crate::geometry::Point;
use crate::node::{NodeFlags, NodeKey, Tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Lazy first-layout callback; surface is always `None`.
    DrawInit,
    /// Rasterize into the provided surface strip.
    DrawMain,
    Pressed,
    Released,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

impl EventKind {
    pub fn is_input(self) -> bool {
        !matches!(self, EventKind::DrawInit | EventKind::DrawMain)
    }

    pub fn is_motion(self) -> bool {
        matches!(
            self,
            EventKind::MoveLeft | EventKind::MoveRight | EventKind::MoveUp | EventKind::MoveDown
        )
    }
}

/// Pointer phase reported by the platform integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Pressed,
    Released,
    Motion,
}

#[derive(Clone, Copy, Debug)]
pub struct Event {
    pub kind: EventKind,
    /// Explicit target; `None` means "resolve by hit-test".
    pub target: Option<NodeKey>,
    pub pos: Point,
    /// Swipe magnitude in pixels for `Move*` events, 0 otherwise.
    pub distance: i32,
}

impl Event {
    pub fn draw_init() -> Self {
        Event {
            kind: EventKind::DrawInit,
            target: None,
            pos: Point::ZERO,
            distance: 0,
        }
    }

    pub fn draw_main() -> Self {
        Event {
            kind: EventKind::DrawMain,
            target: None,
            pos: Point::ZERO,
            distance: 0,
        }
    }
}

/// FIFO ring buffer with power-of-two capacity.
#[derive(Debug)]
pub struct EventQueue {
    buf: Box<[Option<Event>]>,
    head: usize,
    len: usize,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(Error::BadQueueCapacity(capacity));
        }
        Ok(EventQueue {
            buf: vec![None; capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Enqueue an event. A full queue is reset wholesale (all pending
    /// events, including this one, are lost) and an error is logged.
    pub fn push(&mut self, ev: Event) {
        if self.len == self.buf.len() {
            log::error!(
                "event queue overflow (capacity {}), dropping all pending events",
                self.buf.len()
            );
            self.clear();
            return;
        }
        let mask = self.buf.len() - 1;
        self.buf[(self.head + self.len) & mask] = Some(ev);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<Event> {
        if self.len == 0 {
            return None;
        }
        let ev = self.buf[self.head].take();
        self.head = (self.head + 1) & (self.buf.len() - 1);
        self.len -= 1;
        ev
    }

    pub fn clear(&mut self) {
        self.buf.iter_mut().for_each(|s| *s = None);
        self.head = 0;
        self.len = 0;
    }
}

/// Press/release interaction state. At most one pressed target exists
/// globally; `ReleaseRecovery` closes out a press whose release landed on a
/// different node (drag-out-of-target).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressState {
    Idle,
    Pressed(NodeKey),
    ReleaseRecovery(NodeKey),
}

pub struct Dispatcher {
    queue: EventQueue,
    state: PressState,
    /// Two-slot motion history used to derive swipe direction/distance.
    history: [Point; 2],
}

impl Dispatcher {
    pub fn new(queue_capacity: usize) -> Result<Self, Error> {
        Ok(Dispatcher {
            queue: EventQueue::new(queue_capacity)?,
            state: PressState::Idle,
            history: [Point::ZERO; 2],
        })
    }

    pub fn press_state(&self) -> PressState {
        self.state
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    /// Enqueue a pointer event at `pos`. Motion is classified into one of
    /// the four `Move*` kinds here, using whichever axis moved more;
    /// exactly-equal deltas resolve to the vertical axis.
    pub fn send_pos(&mut self, pos: Point, kind: InputKind) {
        let ev = match kind {
            InputKind::Pressed => {
                self.history = [pos, pos];
                Event {
                    kind: EventKind::Pressed,
                    target: None,
                    pos,
                    distance: 0,
                }
            }
            InputKind::Released => Event {
                kind: EventKind::Released,
                target: None,
                pos,
                distance: 0,
            },
            InputKind::Motion => {
                self.history[0] = self.history[1];
                self.history[1] = pos;
                let dx = pos.x - self.history[0].x;
                let dy = pos.y - self.history[0].y;
                let (kind, distance) = if dx.abs() > dy.abs() {
                    if dx > 0 {
                        (EventKind::MoveRight, dx)
                    } else {
                        (EventKind::MoveLeft, -dx)
                    }
                } else if dy > 0 {
                    (EventKind::MoveDown, dy)
                } else {
                    (EventKind::MoveUp, -dy)
                };
                Event {
                    kind,
                    target: None,
                    pos,
                    distance,
                }
            }
        };
        self.queue.push(ev);
    }

    /// Drain the queue, hit-testing and routing each event.
    pub fn task(&mut self, tree: &mut Tree, page: NodeKey) {
        while let Some(ev) = self.queue.pop() {
            let target = ev
                .target
                .or_else(|| tree.hit_test(page, ev.pos, ev.kind.is_motion()));
            match ev.kind {
                EventKind::Pressed => {
                    let Some(t) = target else { continue };
                    // Debounce: a second press on the held node is noise.
                    if self.state == PressState::Pressed(t) {
                        continue;
                    }
                    // A press landing on a different node closes out the
                    // old one, so it never stays rendered pressed.
                    if let PressState::Pressed(old) = self.state
                        && let Ok(s) = tree.state_mut(old)
                    {
                        s.flags.remove(NodeFlags::PRESSED);
                        s.flags.insert(NodeFlags::DIRTY);
                    }
                    self.state = PressState::Pressed(t);
                    if let Ok(s) = tree.state_mut(t) {
                        s.flags.insert(NodeFlags::PRESSED);
                    }
                    Self::deliver(tree, t, &ev);
                }
                EventKind::Released => match self.state {
                    PressState::Pressed(p) => {
                        if target == Some(p) {
                            self.state = PressState::Idle;
                            if let Ok(s) = tree.state_mut(p) {
                                s.flags.remove(NodeFlags::PRESSED);
                            }
                            Self::deliver(tree, p, &ev);
                        } else {
                            // Release landed elsewhere: close out the press
                            // on the node that lost it.
                            self.state = PressState::ReleaseRecovery(p);
                            self.queue.push(Event {
                                target: Some(p),
                                ..ev
                            });
                        }
                    }
                    PressState::ReleaseRecovery(p) => {
                        if ev.target == Some(p) {
                            self.state = PressState::Idle;
                            if let Ok(s) = tree.state_mut(p) {
                                s.flags.remove(NodeFlags::PRESSED);
                            }
                            Self::deliver(tree, p, &ev);
                        }
                        // Anything else while recovering is dropped.
                    }
                    PressState::Idle => {}
                },
                EventKind::MoveLeft
                | EventKind::MoveRight
                | EventKind::MoveUp
                | EventKind::MoveDown => {
                    if let Some(t) = target {
                        Self::deliver(tree, t, &ev);
                    }
                }
                EventKind::DrawInit | EventKind::DrawMain => {
                    debug_assert!(false, "draw events do not go through the queue");
                }
            }
        }
    }

    fn deliver(tree: &mut Tree, key: NodeKey, ev: &Event) {
        if tree.dispatch(key, None, ev).is_ok() {
            let _ = tree.mark_dirty(key);
        }
    }
}

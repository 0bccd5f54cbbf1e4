//! The construct-callback contract every widget implements.
//!
//! A widget gets exactly one polymorphic entry point. The composer calls it
//! with a surface to draw (`DrawMain`), the dirty pass calls it once without
//! a surface to let the widget compute size-dependent defaults (`DrawInit`),
//! and the event dispatcher calls it without a surface for input. Widgets
//! that accept input are expected to mark their own node dirty and forward
//! to the user callback stored on the node when appropriate.

use crate::event::Event;
use crate::node::NodeState;
use crate::surface::Surface;

pub trait Widget {
    /// Single entry point for drawing, lazy init, and input.
    ///
    /// `surface` is `Some` only for [`EventKind::DrawMain`]; everything else
    /// is a pure lifecycle or input notification.
    ///
    /// [`EventKind::DrawMain`]: crate::event::EventKind::DrawMain
    fn construct(&mut self, surface: Option<&mut Surface<'_>>, node: &mut NodeState, event: &Event);
}

/// A node that draws nothing itself and only groups children.
///
/// Also doubles as the simplest possible [`Widget`] for tests.
#[derive(Debug, Default)]
pub struct Container;

impl Widget for Container {
    fn construct(
        &mut self,
        _surface: Option<&mut Surface<'_>>,
        node: &mut NodeState,
        event: &Event,
    ) {
        if event.kind.is_input()
            && let Some(cb) = node.event_cb.clone()
        {
            cb(event);
        }
    }
}

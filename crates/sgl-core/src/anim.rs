//! Tick-driven value animations.
//!
//! An animation interpolates an `i32` between `start` and `end` over a
//! duration in ticks, optionally after a delay, repeating a finite number of
//! times or forever. The apply callback receives the tree so it can move or
//! restyle whatever it targets; path math is integer-only.

use crate::math::{cos_q15, sin_q15};
use crate::node::Tree;

/// Repeat sentinel: never stop.
pub const REPEAT_FOREVER: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Interpolated value at `elapsed` of `duration` ticks. Contract:
    /// returns `start` at 0 and `end` at `elapsed >= duration`, for every
    /// easing.
    pub fn value(self, elapsed: u32, duration: u32, start: i32, end: i32) -> i32 {
        if duration == 0 || elapsed >= duration {
            return end;
        }
        if elapsed == 0 {
            return start;
        }
        let delta = end as i64 - start as i64;
        match self {
            Easing::Linear => {
                // Q16 progress fraction; 64-bit intermediate.
                let frac = ((elapsed as u64) << 16) / duration as u64;
                start + ((delta * frac as i64) >> 16) as i32
            }
            Easing::EaseIn => {
                // 1 - cos(90 * t), Q15.
                let deg = (90 * elapsed as i64 / duration as i64) as i32;
                let frac = 32767 - cos_q15(deg) as i64;
                start + ((delta * frac) >> 15) as i32
            }
            Easing::EaseOut => {
                let deg = (90 * elapsed as i64 / duration as i64) as i32;
                let frac = sin_q15(deg) as i64;
                start + ((delta * frac) >> 15) as i32
            }
            Easing::EaseInOut => {
                // (1 + sin(180 * t - 90)) / 2, Q15.
                let deg = (180 * elapsed as i64 / duration as i64) as i32 - 90;
                let frac = (32767 + sin_q15(deg) as i64) / 2;
                start + ((delta * frac) >> 15) as i32
            }
        }
    }
}

pub type ApplyFn = Box<dyn FnMut(&mut Tree, i32)>;
pub type FinishFn = Box<dyn FnMut(&mut Tree)>;

pub struct Anim {
    pub start: i32,
    pub end: i32,
    /// Ticks to wait before the first interpolation step.
    pub delay: u32,
    pub duration: u32,
    /// Remaining repeats, or [`REPEAT_FOREVER`].
    pub repeat: u32,
    pub easing: Easing,
    /// Remove (and drop) the animation once repeats are exhausted. When
    /// false the finished animation stays in the list, dormant, so it can
    /// be restarted.
    pub auto_remove: bool,
    apply: ApplyFn,
    on_finish: Option<FinishFn>,
    act_time: u32,
}

impl Anim {
    pub fn new(start: i32, end: i32, duration: u32, apply: ApplyFn) -> Self {
        Anim {
            start,
            end,
            delay: 0,
            duration,
            repeat: 1,
            easing: Easing::Linear,
            auto_remove: true,
            apply,
            on_finish: None,
            act_time: 0,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn keep_when_done(mut self) -> Self {
        self.auto_remove = false;
        self
    }

    pub fn on_finish(mut self, f: FinishFn) -> Self {
        self.on_finish = Some(f);
        self
    }
}

/// Stable handle for explicit removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimId(u64);

/// The active-animation list. Append is O(1); removal scans.
#[derive(Default)]
pub struct Animations {
    items: Vec<(AnimId, Anim)>,
    next_id: u64,
}

impl Animations {
    pub fn new() -> Self {
        Animations::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add(&mut self, anim: Anim) -> AnimId {
        let id = AnimId(self.next_id);
        self.next_id += 1;
        self.items.push((id, anim));
        id
    }

    /// Stop and drop an animation. Unknown ids are ignored (it may have
    /// auto-removed already).
    pub fn remove(&mut self, id: AnimId) {
        if let Some(i) = self.items.iter().position(|(k, _)| *k == id) {
            self.items.remove(i);
        }
    }

    /// Rewind an animation for another run.
    pub fn restart(&mut self, id: AnimId, repeat: u32) {
        if let Some((_, a)) = self.items.iter_mut().find(|(k, _)| *k == id) {
            a.act_time = 0;
            a.repeat = repeat;
        }
    }

    /// Advance every animation by `ticks`. Each item progresses
    /// independently: one animation sitting in its delay window never stalls
    /// the ones after it.
    pub fn task(&mut self, tree: &mut Tree, ticks: u32) {
        let mut i = 0;
        while i < self.items.len() {
            let a = &mut self.items[i].1;
            if a.repeat == 0 {
                // Dormant (finished, kept for restart).
                i += 1;
                continue;
            }
            a.act_time = a.act_time.saturating_add(ticks);
            if a.act_time < a.delay {
                i += 1;
                continue;
            }
            let elapsed = a.act_time - a.delay;
            let clamped = elapsed.min(a.duration);
            let value = a.easing.value(clamped, a.duration, a.start, a.end);
            (a.apply)(tree, value);
            if elapsed >= a.duration {
                if a.repeat != REPEAT_FOREVER {
                    a.repeat -= 1;
                }
                if let Some(f) = a.on_finish.as_mut() {
                    f(tree);
                }
                // Next cycle starts from scratch, delay included.
                a.act_time = 0;
                if a.repeat == 0 {
                    log::debug!("animation finished");
                    if a.auto_remove {
                        self.items.remove(i);
                        continue; // the next item shifted into slot i
                    }
                }
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_boundary_laws() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.value(0, 1000, -50, 240), -50, "{easing:?} start");
            assert_eq!(easing.value(1000, 1000, -50, 240), 240, "{easing:?} end");
            assert_eq!(easing.value(5000, 1000, -50, 240), 240, "{easing:?} past");
            assert_eq!(easing.value(7, 0, -50, 240), 240, "{easing:?} zero-dur");
        }
    }

    #[test]
    fn linear_midpoint() {
        assert_eq!(Easing::Linear.value(500, 1000, 0, 240), 120);
        assert_eq!(Easing::Linear.value(250, 1000, 0, 240), 60);
    }

    #[test]
    fn easing_is_monotonic() {
        for easing in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            let mut prev = 0;
            for t in 0..=100 {
                let v = easing.value(t * 10, 1000, 0, 1000);
                assert!(v >= prev, "{easing:?} not monotonic at t={t}");
                prev = v;
            }
        }
    }

    #[test]
    fn linear_animation_runs_and_autofrees() {
        let mut tree = Tree::new();
        let mut anims = Animations::new();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let finished = std::rc::Rc::new(std::cell::Cell::new(0u32));

        let s = seen.clone();
        let f = finished.clone();
        let before = anims.len();
        anims.add(
            Anim::new(0, 240, 1000, Box::new(move |_, v| s.borrow_mut().push(v)))
                .on_finish(Box::new(move |_| f.set(f.get() + 1))),
        );

        for _ in 0..10 {
            anims.task(&mut tree, 100);
        }
        assert_eq!(anims.len(), before);
        assert_eq!(finished.get(), 1);
        let seen = seen.borrow();
        assert_eq!(*seen.first().unwrap(), 23); // first tick lands at t=100, Q16 floor
        assert_eq!(*seen.last().unwrap(), 240);
    }

    #[test]
    fn delayed_item_does_not_stall_successors() {
        let mut tree = Tree::new();
        let mut anims = Animations::new();
        let a_vals = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let b_vals = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

        let av = a_vals.clone();
        anims.add(
            Anim::new(0, 100, 100, Box::new(move |_, v| av.borrow_mut().push(v)))
                .with_delay(1000),
        );
        let bv = b_vals.clone();
        anims.add(Anim::new(0, 100, 100, Box::new(move |_, v| bv.borrow_mut().push(v))));

        anims.task(&mut tree, 50);
        // The delayed first animation produced nothing, the second advanced.
        assert!(a_vals.borrow().is_empty());
        assert_eq!(b_vals.borrow().as_slice(), &[50]);
    }

    #[test]
    fn repeat_runs_finish_each_cycle() {
        let mut tree = Tree::new();
        let mut anims = Animations::new();
        let finished = std::rc::Rc::new(std::cell::Cell::new(0u32));
        let f = finished.clone();
        anims.add(
            Anim::new(0, 10, 10, Box::new(|_, _| {}))
                .with_repeat(3)
                .on_finish(Box::new(move |_| f.set(f.get() + 1))),
        );
        for _ in 0..6 {
            anims.task(&mut tree, 10);
        }
        assert_eq!(finished.get(), 3);
        assert!(anims.is_empty());
    }

    #[test]
    fn forever_animation_never_removes_itself() {
        let mut tree = Tree::new();
        let mut anims = Animations::new();
        anims.add(Anim::new(0, 10, 10, Box::new(|_, _| {})).with_repeat(REPEAT_FOREVER));
        for _ in 0..100 {
            anims.task(&mut tree, 10);
        }
        assert_eq!(anims.len(), 1);
    }

    #[test]
    fn explicit_remove() {
        let mut tree = Tree::new();
        let mut anims = Animations::new();
        let id = anims.add(Anim::new(0, 10, 1000, Box::new(|_, _| {})));
        anims.task(&mut tree, 1);
        anims.remove(id);
        assert!(anims.is_empty());
    }
}

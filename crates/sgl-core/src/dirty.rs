//! Accumulates the screen regions that need repainting this frame.
//!
//! Two policies: a single expanding bounding box, or a small pool of
//! rectangles merged by proximity. The pool has an explicit overflow path:
//! when it fills up the whole set collapses to its bounding box instead of
//! writing past capacity.

use smallvec::SmallVec;

use crate::geometry::Area;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirtyPolicy {
    /// One rectangle: the bounding box of all change this frame.
    Single,
    /// Up to `capacity` rectangles; a new rect merges into an existing entry
    /// when the gap between them is within `threshold` pixels on both axes.
    Pooled { capacity: usize, threshold: i32 },
}

impl Default for DirtyPolicy {
    fn default() -> Self {
        DirtyPolicy::Pooled {
            capacity: 8,
            threshold: 16,
        }
    }
}

pub struct DirtyTracker {
    policy: DirtyPolicy,
    rects: SmallVec<[Area; 8]>,
}

impl DirtyTracker {
    pub fn new(policy: DirtyPolicy) -> Self {
        DirtyTracker {
            policy,
            rects: SmallVec::new(),
        }
    }

    pub fn policy(&self) -> DirtyPolicy {
        self.policy
    }

    pub fn is_dirty(&self) -> bool {
        !self.rects.is_empty()
    }

    /// The accumulated rectangles for the frame being composed.
    pub fn rects(&self) -> &[Area] {
        &self.rects
    }

    /// Fold one area into the accumulation.
    pub fn merge(&mut self, area: Area) {
        if area.is_empty() {
            return;
        }
        match self.policy {
            DirtyPolicy::Single => {
                let cur = self.rects.first().copied().unwrap_or_else(Area::empty);
                let merged = cur.union(&area);
                self.rects.clear();
                self.rects.push(merged);
            }
            DirtyPolicy::Pooled {
                capacity,
                threshold,
            } => {
                for r in self.rects.iter_mut() {
                    if r.gap_within(&area, threshold) {
                        *r = r.union(&area);
                        return;
                    }
                }
                if self.rects.len() < capacity.max(1) {
                    self.rects.push(area);
                } else {
                    // Pool exhausted: collapse to one bounding rect rather
                    // than evicting or overrunning.
                    let mut bound = area;
                    for r in &self.rects {
                        bound = bound.union(r);
                    }
                    self.rects.clear();
                    self.rects.push(bound);
                    log::debug!("dirty pool overflow, collapsed to bounding rect");
                }
            }
        }
    }

    /// Clear the set; called on page load and after each composed frame.
    pub fn reset(&mut self) {
        self.rects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rect_union_is_idempotent() {
        let mut d = DirtyTracker::new(DirtyPolicy::Single);
        let a = Area::new(10, 10, 20, 20);
        d.merge(a);
        d.merge(a);
        d.merge(a);
        assert_eq!(d.rects(), &[a]);
    }

    #[test]
    fn single_rect_expands_monotonically() {
        let mut d = DirtyTracker::new(DirtyPolicy::Single);
        d.merge(Area::new(0, 0, 10, 10));
        d.merge(Area::new(100, 100, 10, 10));
        assert_eq!(d.rects(), &[Area::new(0, 0, 110, 110)]);
    }

    #[test]
    fn pooled_merges_within_threshold() {
        let mut d = DirtyTracker::new(DirtyPolicy::Pooled {
            capacity: 4,
            threshold: 10,
        });
        d.merge(Area::new(0, 0, 10, 10));
        // 5px gap on x, aligned on y: merges.
        d.merge(Area::new(15, 0, 10, 10));
        assert_eq!(d.rects().len(), 1);
        assert_eq!(d.rects()[0], Area::new(0, 0, 25, 10));
        // Far away: appends.
        d.merge(Area::new(100, 100, 10, 10));
        assert_eq!(d.rects().len(), 2);
    }

    #[test]
    fn pooled_overflow_collapses_to_bound() {
        let mut d = DirtyTracker::new(DirtyPolicy::Pooled {
            capacity: 2,
            threshold: 0,
        });
        d.merge(Area::new(0, 0, 1, 1));
        d.merge(Area::new(50, 0, 1, 1));
        assert_eq!(d.rects().len(), 2);
        d.merge(Area::new(0, 50, 1, 1));
        assert_eq!(d.rects().len(), 1);
        assert_eq!(d.rects()[0], Area::new(0, 0, 51, 51));
    }

    #[test]
    fn reset_clears() {
        let mut d = DirtyTracker::new(DirtyPolicy::default());
        d.merge(Area::new(0, 0, 5, 5));
        assert!(d.is_dirty());
        d.reset();
        assert!(!d.is_dirty());
        assert!(d.rects().is_empty());
    }

    #[test]
    fn empty_area_is_ignored() {
        let mut d = DirtyTracker::new(DirtyPolicy::Single);
        d.merge(Area::empty());
        assert!(!d.is_dirty());
    }
}

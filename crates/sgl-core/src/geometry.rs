//! Axis-aligned rectangle math used for clipping and dirty tracking.
//!
//! Coordinates are inclusive on both ends: an `Area` with `x1 == x2` is one
//! pixel wide. This matches how panel flush windows are addressed and keeps
//! every width/height computation in integer pixels.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Inclusive pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Area {
            x1: x,
            y1: y,
            x2: x + w - 1,
            y2: y + h - 1,
        }
    }

    /// An area that contains nothing and unions as the identity.
    pub fn empty() -> Self {
        Area {
            x1: i32::MAX,
            y1: i32::MAX,
            x2: i32::MIN,
            y2: i32::MIN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() { 0 } else { self.x2 - self.x1 + 1 }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() { 0 } else { self.y2 - self.y1 + 1 }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Whether `self` fully contains `other`. An empty `other` is contained
    /// by everything.
    pub fn contains(&self, other: &Area) -> bool {
        other.is_empty()
            || (other.x1 >= self.x1
                && other.y1 >= self.y1
                && other.x2 <= self.x2
                && other.y2 <= self.y2)
    }

    pub fn overlaps(&self, other: &Area) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x1 <= other.x2
            && self.x2 >= other.x1
            && self.y1 <= other.y2
            && self.y2 >= other.y1
    }

    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let r = Area {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        if r.is_empty() { None } else { Some(r) }
    }

    /// Bounding box of the two areas. Empty operands act as identity.
    pub fn union(&self, other: &Area) -> Area {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Area {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    pub fn expand(&self, margin: i32) -> Area {
        if self.is_empty() {
            return *self;
        }
        Area {
            x1: self.x1 - margin,
            y1: self.y1 - margin,
            x2: self.x2 + margin,
            y2: self.y2 + margin,
        }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Area {
        if self.is_empty() {
            return *self;
        }
        Area {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Gap to `other` along one axis: 0 when the intervals touch or overlap.
    fn axis_gap(a1: i32, a2: i32, b1: i32, b2: i32) -> i32 {
        if b1 > a2 {
            b1 - a2 - 1
        } else if a1 > b2 {
            a1 - b2 - 1
        } else {
            0
        }
    }

    /// True when the gap to `other` is within `threshold` pixels on *both*
    /// axes. Used by the pooled dirty tracker to decide merge-vs-append.
    pub fn gap_within(&self, other: &Area, threshold: i32) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        Self::axis_gap(self.x1, self.x2, other.x1, other.x2) <= threshold
            && Self::axis_gap(self.y1, self.y2, other.y1, other.y2) <= threshold
    }
}

impl Default for Area {
    fn default() -> Self {
        Area::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_basic() {
        let a = Area::new(0, 0, 100, 100);
        let b = Area::new(50, 50, 100, 100);
        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Area::new(50, 50, 50, 50));
        assert_eq!(i.width(), 50);
        assert_eq!(i.height(), 50);
    }

    #[test]
    fn intersect_disjoint_is_none() {
        let a = Area::new(0, 0, 10, 10);
        let b = Area::new(20, 0, 10, 10);
        assert!(a.intersect(&b).is_none());
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = Area::new(3, 4, 5, 6);
        assert_eq!(a.union(&Area::empty()), a);
        assert_eq!(Area::empty().union(&a), a);
        // Union with itself is idempotent.
        assert_eq!(a.union(&a), a);
    }

    #[test]
    fn touching_edges_overlap() {
        let a = Area::new(0, 0, 10, 10);
        let b = Area::new(9, 9, 10, 10);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn gap_threshold() {
        let a = Area::new(0, 0, 10, 10);
        // 5px away on x, aligned on y.
        let b = Area::new(15, 0, 10, 10);
        assert!(a.gap_within(&b, 5));
        assert!(!a.gap_within(&b, 4));
        // Far away on both axes.
        let c = Area::new(100, 100, 10, 10);
        assert!(!a.gap_within(&c, 20));
    }

    #[test]
    fn translate_preserves_size() {
        let a = Area::new(10, 10, 30, 20);
        let t = a.translate(-5, 7);
        assert_eq!(t.width(), 30);
        assert_eq!(t.height(), 20);
        assert_eq!(t.x1, 5);
        assert_eq!(t.y1, 17);
    }
}

//! Pointer hit-testing over the mechanism entities.
//!
//! Predicates take world-space positions. The input layer divides its
//! on-screen pick radius by the camera zoom first, so picking stays
//! screen-space constant under zoom.
use crate::mech::Mechanism;
use crate::point::Vec2;

/// One interactive entity under the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The fixed anchor
    Anchor,
    /// Guide point at `guides[i]`, constraining `rods[i + 1]`
    Guide(usize),
    /// Tip joint of `rods[i]`
    Joint(usize),
    /// Rod segment `i`
    Rod(usize),
}

/// Distance from a point to a segment.
pub fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0., 1.);
    p.distance(a + ab * t)
}

impl Mechanism {
    /// Circular hit test on the tip joint of `rods[i]`.
    pub fn joint_is_over(&self, i: usize, pos: Vec2, radius: f64) -> bool {
        self.joints.get(i).is_some_and(|j| j.distance(pos) <= radius)
    }

    /// Segment hit test on rod `i`.
    pub fn rod_is_over(&self, i: usize, pos: Vec2, radius: f64) -> bool {
        self.rod_distance(i, pos).is_some_and(|d| d <= radius)
    }

    fn rod_distance(&self, i: usize, pos: Vec2) -> Option<f64> {
        let end = *self.joints.get(i)?;
        let start = if i == 0 {
            self.anchor.pos
        } else {
            *self.joints.get(i - 1)?
        };
        Some(segment_distance(pos, start, end))
    }

    /// The closest interactive entity within `radius` of a world position.
    ///
    /// Overlapping hits resolve to the smallest distance; exact ties go to
    /// anchor, then guide points, then joints, then rod segments.
    pub fn pick(&self, pos: Vec2, radius: f64) -> Option<Selection> {
        let mut best: Option<(f64, Selection)> = None;
        let mut consider = |d: f64, sel: Selection| {
            if d <= radius && best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, sel));
            }
        };
        consider(self.anchor.pos.distance(pos), Selection::Anchor);
        for (i, g) in self.guides.iter().enumerate() {
            consider(g.pos.distance(pos), Selection::Guide(i));
        }
        for (i, j) in self.joints.iter().enumerate() {
            consider(j.distance(pos), Selection::Joint(i));
        }
        for i in 0..self.rods.len() {
            if let Some(d) = self.rod_distance(i, pos) {
                consider(d, Selection::Rod(i));
            }
        }
        best.map(|(_, sel)| sel)
    }
}

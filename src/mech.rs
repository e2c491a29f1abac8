//! Guided rod-chain mechanism and its forward solver.
//!
//! The chain is driven by a single angle: the crank. Every follower rod
//! aims at its guide point, so one pass over the rods solves the whole
//! chain without iteration.
use crate::point::{Bounds, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

/// Golden ratio, the length-split constant of [`Mechanism::add_rod()`].
pub const PHI: f64 = 1.618_033_988_749_895;
/// Padding added around [`Mechanism::calculate_bounds()`].
pub const BOUNDS_PAD: f64 = 20.;

/// The fixed pivot of the chain.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Anchor {
    /// Pivot position
    pub pos: Vec2,
}

impl Anchor {
    /// Circular hit test in world space.
    pub fn is_over(&self, pos: Vec2, radius: f64) -> bool {
        self.pos.distance(pos) <= radius
    }
}

/// A rigid rod of the chain.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rod {
    /// Rod id, 0 is the crank
    pub id: u32,
    /// Rod length, positive by construction
    pub length: f64,
    /// Last solved direction in radians (derived state)
    pub angle: f64,
    /// Record the tip joint path
    pub is_tracing: bool,
    /// Record the whole rod segment
    pub is_full_rod_tracing: bool,
}

/// A draggable target that a follower rod always aims at.
///
/// Not a second anchor: the rod passes toward it at its own length.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GuidePoint {
    /// Matches the constrained rod id (1-based, the crank has none)
    pub id: u32,
    /// Target position
    pub pos: Vec2,
}

impl GuidePoint {
    /// Circular hit test in world space.
    pub fn is_over(&self, pos: Vec2, radius: f64) -> bool {
        self.pos.distance(pos) <= radius
    }
}

/// The rod chain: one anchor, rods, and the guide points between them.
///
/// Invariants held by every operation:
///
/// + `rods.len() == guides.len() + 1` (the crank has no guide point)
/// + `rods.len() >= 1` (the crank cannot be removed)
/// + `joints.len() == rods.len()` after every solve, and joints are
///   recomputed synchronously on every structural change
#[derive(Clone, Debug, PartialEq)]
pub struct Mechanism {
    /// Fixed pivot
    pub anchor: Anchor,
    /// Rods, crank first
    pub rods: Vec<Rod>,
    /// `guides[i]` constrains `rods[i + 1]`
    pub guides: Vec<GuidePoint>,
    /// Solved joint positions, one per rod
    pub joints: Vec<Vec2>,
    /// Driving angle of the crank
    pub crank_angle: f64,
    /// Signed crank speed in radians per tick
    pub angular_velocity: f64,
    /// Whether the crank advances on [`Mechanism::update()`]
    pub is_playing: bool,
    /// Whether follower rods may auto-lengthen
    pub is_stretching: bool,
    /// Guide sleeve clearance used by stretching mode
    pub guide_radius: f64,
    /// Joint disc clearance used by stretching mode
    pub joint_radius: f64,
}

impl Default for Mechanism {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 80.)
    }
}

impl Mechanism {
    /// Ticks of one crank revolution at the default speed.
    pub const FRAMES_PER_ROUND: f64 = 360.;

    /// Create a chain with only the crank.
    pub fn new(anchor: Vec2, crank_len: f64) -> Self {
        let crank = Rod { id: 0, length: crank_len, is_tracing: true, ..Rod::default() };
        let mut m = Self {
            anchor: Anchor { pos: anchor },
            rods: vec![crank],
            guides: Vec::new(),
            joints: Vec::new(),
            crank_angle: 0.,
            angular_velocity: TAU / Self::FRAMES_PER_ROUND,
            is_playing: true,
            is_stretching: false,
            guide_radius: 10.,
            joint_radius: 6.,
        };
        m.update_joints();
        m
    }

    /// An example chain with one follower rod.
    pub fn example() -> Self {
        let mut m = Self::new(Vec2::ZERO, 80.);
        m.add_rod_s(true);
        m
    }

    /// Advance the simulation by `dt` ticks and solve the chain.
    pub fn update(&mut self, dt: f64) {
        if self.is_playing {
            self.crank_angle += self.angular_velocity * dt;
        }
        self.update_joints();
    }

    /// Forward chain solve.
    ///
    /// Joint 0 is the crank tip; every follower rod aims at its guide
    /// point from the parent joint. In stretching mode a follower grows to
    /// keep its tip clear of the guide's drawn footprint, and never
    /// shrinks back on its own.
    ///
    /// A guide point coincident with its parent joint leaves the aim
    /// direction at zero and the chain keeps solving downstream.
    pub fn update_joints(&mut self) {
        self.joints.resize(self.rods.len(), Vec2::ZERO);
        self.rods[0].angle = self.crank_angle;
        self.joints[0] = self.anchor.pos.pla(self.rods[0].length, self.crank_angle);
        for i in 1..self.rods.len() {
            let parent = self.joints[i - 1];
            let guide = self.guides[i - 1].pos;
            let angle = parent.angle_to(guide);
            let rod = &mut self.rods[i];
            if self.is_stretching {
                let min_len = parent.distance(guide) + self.guide_radius + self.joint_radius;
                if min_len > rod.length {
                    rod.length = min_len;
                }
            }
            rod.angle = angle;
            self.joints[i] = parent.pla(rod.length, angle);
        }
    }

    /// Append a rod at the tip, length branch chosen by `rng`.
    pub fn add_rod(&mut self, rng: &mut impl Rng) {
        self.add_rod_s(rng.random_bool(0.5));
    }

    /// Append a rod at the tip with an explicit length branch.
    ///
    /// The new length is the previous tip length multiplied (`grow`) or
    /// divided by the golden ratio. The new guide point splits the rod by
    /// the golden ratio: it sits at `length / φ` from the rod's base, with
    /// its X locked to the last guide's X (the anchor's X when no guide
    /// exists yet) and Y solved from the distance equation. When that X is
    /// horizontally out of reach it falls back to same-Y placement,
    /// stepping toward the locked X.
    ///
    /// Tracing moves from the previous tip rod to the new one.
    pub fn add_rod_s(&mut self, grow: bool) {
        self.update_joints();
        let tip_len = self.rods[self.rods.len() - 1].length;
        let length = if grow { tip_len * PHI } else { tip_len / PHI };
        let base = self.joints[self.joints.len() - 1];
        let d = length / PHI;
        let gx = self.guides.last().map_or(self.anchor.pos.x, |g| g.pos.x);
        let dx = gx - base.x;
        let pos = if dx.abs() <= d {
            Vec2::new(gx, base.y + (d * d - dx * dx).sqrt())
        } else {
            Vec2::new(base.x + d * dx.signum(), base.y)
        };
        let id = self.rods.len() as u32;
        if let Some(prev) = self.rods.last_mut() {
            prev.is_tracing = false;
        }
        self.rods.push(Rod { id, length, is_tracing: true, ..Rod::default() });
        self.guides.push(GuidePoint { id, pos });
        self.update_joints();
    }

    /// Remove the tip rod and its guide point.
    ///
    /// Removing the crank is a silent no-op. Tracing re-enables on the new
    /// tip rod.
    pub fn remove_rod(&mut self) {
        if self.rods.len() <= 1 {
            return;
        }
        self.rods.pop();
        self.guides.pop();
        if let Some(tip) = self.rods.last_mut() {
            tip.is_tracing = true;
        }
        self.update_joints();
    }

    /// Toggle playback. Returns the new state.
    pub fn toggle_play_pause(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }

    /// Toggle stretching mode. Returns the new state.
    pub fn toggle_stretching(&mut self) -> bool {
        self.is_stretching = !self.is_stretching;
        self.is_stretching
    }

    /// Reverse the crank spin direction.
    pub fn reverse_spin(&mut self) {
        self.angular_velocity = -self.angular_velocity;
    }

    /// Whether the crank spins in the reversed direction.
    pub fn is_inverse(&self) -> bool {
        self.angular_velocity < 0.
    }

    /// Sync the stretching clearances with the drawn widths.
    pub fn set_clearance(&mut self, guide_radius: f64, joint_radius: f64) {
        self.guide_radius = guide_radius;
        self.joint_radius = joint_radius;
    }

    /// Axis-aligned bounds over the anchor, joints, and guide points,
    /// padded by [`BOUNDS_PAD`]. Never empty: the anchor always exists.
    pub fn calculate_bounds(&self) -> Bounds {
        let mut bounds = Bounds::from_point(self.anchor.pos);
        for &p in self.joints.iter().chain(self.guides.iter().map(|g| &g.pos)) {
            bounds.expand(p);
        }
        bounds.pad(BOUNDS_PAD)
    }
}

//! Joint-path recording, aging, and fading.
//!
//! Samples append once per tick while the simulation plays, age by one on
//! every [`TraceSystem::update()`], and are evicted oldest-first once they
//! outlive the fade lifespan. The buffers are time-ordered deques, so
//! eviction stops at the first survivor.
use crate::curve::sample_segment;
use crate::mech::Mechanism;
use crate::point::{Bounds, Vec2};
use std::collections::{HashMap, VecDeque};

/// Sample count of one full-rod frame (8 subdivisions, endpoints included).
pub const ROD_FRAME_POINTS: usize = 9;
/// Width of one alpha band used to group fading draw calls.
pub const ALPHA_BAND: u8 = 32;
/// Padding added around [`TraceSystem::calculate_bounds()`].
pub const TRACE_PAD: f64 = 20.;

/// Stroke style shared by traces and rods.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TraceStyle {
    /// Trace color (RGB)
    pub color: [u8; 3],
    /// Trace stroke width
    pub trace_width: f64,
    /// Rod stroke width
    pub rods_width: f64,
    /// Whether traces age and fade out
    pub fading: bool,
}

impl Default for TraceStyle {
    fn default() -> Self {
        Self {
            color: [118, 182, 222],
            trace_width: 3.,
            rods_width: 4.,
            fading: true,
        }
    }
}

impl TraceStyle {
    /// Brightened color used by full-rod frames: each channel × 1.5,
    /// clamped to 255. Fixed rule, not configurable on its own.
    pub fn full_rod_color(&self) -> [u8; 3] {
        self.color.map(|c| (u16::from(c) * 3 / 2).min(255) as u8)
    }

    /// Drawn guide sleeve radius, the guide clearance of stretching mode.
    pub fn guide_radius(&self) -> f64 {
        self.rods_width * 2.5
    }

    /// Drawn joint disc radius, the joint clearance of stretching mode.
    pub fn joint_radius(&self) -> f64 {
        self.rods_width * 1.5
    }
}

/// One recorded joint sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TracePoint {
    /// Recorded position
    pub pos: Vec2,
    /// Ticks since recorded
    pub age: u32,
}

/// One full-rod capture.
#[derive(Clone, Debug, PartialEq)]
pub struct RodFrame {
    /// Samples along the rod segment at capture time
    pub points: Vec<Vec2>,
    /// Ticks since recorded
    pub age: u32,
}

/// Per-rod trace buffers with aging, eviction, and fade styling.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceSystem {
    points: HashMap<u32, VecDeque<TracePoint>>,
    frames: HashMap<u32, VecDeque<RodFrame>>,
    /// Stroke style
    pub style: TraceStyle,
    /// Ticks a sample stays alive
    pub fade_lifespan: u32,
}

impl Default for TraceSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSystem {
    /// Create an empty system with a one-revolution lifespan.
    pub fn new() -> Self {
        Self {
            points: HashMap::new(),
            frames: HashMap::new(),
            style: TraceStyle::default(),
            fade_lifespan: Mechanism::FRAMES_PER_ROUND as u32,
        }
    }

    /// Append a joint sample for a rod, starting at age zero.
    pub fn add_trace_point(&mut self, rod: u32, pos: Vec2) {
        self.points
            .entry(rod)
            .or_default()
            .push_back(TracePoint { pos, age: 0 });
    }

    /// Capture the whole rod segment as one frame of
    /// [`ROD_FRAME_POINTS`] samples.
    pub fn add_full_rod_trace(&mut self, rod: u32, start: Vec2, end: Vec2) {
        let points = sample_segment(start, end, ROD_FRAME_POINTS - 1);
        self.frames
            .entry(rod)
            .or_default()
            .push_back(RodFrame { points, age: 0 });
    }

    /// Age every live sample by one tick, then evict from the oldest end.
    ///
    /// Point traces expire once `age > fade_lifespan`; full-rod frames
    /// once `age >= fade_lifespan`, one tick earlier. With fading
    /// disabled, nothing ages and nothing is evicted.
    pub fn update(&mut self) {
        if !self.style.fading {
            return;
        }
        let lifespan = self.fade_lifespan;
        for buf in self.points.values_mut() {
            for p in buf.iter_mut() {
                p.age += 1;
            }
            while buf.front().is_some_and(|p| p.age > lifespan) {
                buf.pop_front();
            }
        }
        for buf in self.frames.values_mut() {
            for f in buf.iter_mut() {
                f.age += 1;
            }
            while buf.front().is_some_and(|f| f.age >= lifespan) {
                buf.pop_front();
            }
        }
    }

    /// Set the fade lifespan in ticks.
    ///
    /// Typically kept at ticks-per-revolution so a trace fades out over
    /// exactly one rotation; reconfigure when the rod count changes.
    pub fn update_fade_lifespan(&mut self, frames: u32) {
        self.fade_lifespan = frames;
    }

    /// Alpha of a sample: linear from 255 at age zero to 0 at the
    /// lifespan. Always 255 with fading disabled.
    pub fn alpha(&self, age: u32) -> u8 {
        if !self.style.fading || self.fade_lifespan == 0 {
            return 255;
        }
        let t = f64::from(age.min(self.fade_lifespan)) / f64::from(self.fade_lifespan);
        (255. * (1. - t)).round() as u8
    }

    /// Point-trace buffer of a rod, oldest first.
    pub fn points_of(&self, rod: u32) -> Option<&VecDeque<TracePoint>> {
        self.points.get(&rod)
    }

    /// Full-rod frame buffer of a rod, oldest first.
    pub fn frames_of(&self, rod: u32) -> Option<&VecDeque<RodFrame>> {
        self.frames.get(&rod)
    }

    /// Rod ids with any live data, ascending.
    pub fn rods(&self) -> Vec<u32> {
        let mut ids = Vec::new();
        for (&id, buf) in &self.points {
            if !buf.is_empty() {
                ids.push(id);
            }
        }
        for (&id, buf) in &self.frames {
            if !buf.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        ids
    }

    /// Drop both buffers of one rod.
    pub fn clear_trace(&mut self, rod: u32) {
        self.points.remove(&rod);
        self.frames.remove(&rod);
    }

    /// Drop every buffer.
    pub fn clear_all_traces(&mut self) {
        self.points.clear();
        self.frames.clear();
    }

    /// Bounds over all live samples of both buffer kinds, padded by
    /// [`TRACE_PAD`]. `None` without any live data.
    pub fn calculate_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let pts = (self.points.values().flatten().map(|p| p.pos))
            .chain(self.frames.values().flatten().flat_map(|f| f.points.iter().copied()));
        for p in pts {
            match &mut bounds {
                Some(b) => b.expand(p),
                None => bounds = Some(Bounds::from_point(p)),
            }
        }
        bounds.map(|b| b.pad(TRACE_PAD))
    }

    /// Contiguous alpha-band runs of a rod's point trace, oldest first.
    ///
    /// Each run carries the alpha of its first sample and overlaps the
    /// previous run by one point, so the reconstructed curve stays
    /// continuous across draw calls while approximating the fade
    /// gradient with a handful of flat-alpha strokes.
    pub fn banded_points(&self, rod: u32) -> Vec<(u8, Vec<Vec2>)> {
        let Some(buf) = self.points.get(&rod) else {
            return Vec::new();
        };
        let mut runs: Vec<(u8, Vec<Vec2>)> = Vec::new();
        let mut band = u8::MAX;
        for p in buf {
            let alpha = self.alpha(p.age);
            if runs.is_empty() || alpha / ALPHA_BAND != band {
                let mut run = Vec::new();
                if let Some(prev) = runs.last().and_then(|(_, r)| r.last()) {
                    run.push(*prev);
                }
                run.push(p.pos);
                runs.push((alpha, run));
                band = alpha / ALPHA_BAND;
            } else if let Some((_, run)) = runs.last_mut() {
                run.push(p.pos);
            }
        }
        runs
    }
}

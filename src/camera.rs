//! Viewport camera: screen/world mapping, pan, zoom, and eased transitions.
use crate::point::{Bounds, Vec2};

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 5.;
/// Margin kept around fitted bounds, in screen pixels per side.
pub const FIT_MARGIN: f64 = 50.;
/// Default animated transition time in seconds.
pub const ANIM_DURATION: f64 = 0.4;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Target {
    /// Interpolate the offset between two recorded values (fit to view).
    Offset {
        from: Vec2,
        to: Vec2,
    },
    /// Keep `world` glued to `screen` while the zoom interpolates
    /// (double-tap zoom). The offset is recomputed every step.
    Anchor {
        world: Vec2,
        screen: Vec2,
    },
}

#[derive(Clone, Debug, PartialEq)]
struct Anim {
    elapsed: f64,
    duration: f64,
    from_zoom: f64,
    to_zoom: f64,
    target: Target,
}

/// Pan/zoom state with a single in-flight animation slot.
///
/// A new animation request silently replaces the previous one. All zoom
/// mutation paths clamp into `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Screen-space pan offset
    pub offset: Vec2,
    /// Zoom factor
    pub zoom: f64,
    anim: Option<Anim>,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset: Vec2::ZERO, zoom: 1., anim: None }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1. - (1. - t).powi(3)
}

impl Camera {
    /// Create a camera at the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a screen position to world space.
    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.zoom
    }

    /// Map a world position to screen space.
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.zoom + self.offset
    }

    /// Translate by a screen-space delta. The offset is unbounded.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset = self.offset + delta;
    }

    /// Set the zoom factor, clamped.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Scale the zoom by `factor`, keeping `world` on the same screen
    /// pixel it occupied before.
    pub fn zoom_at(&mut self, world: Vec2, factor: f64) {
        let screen = self.world_to_screen(world);
        self.set_zoom(self.zoom * factor);
        self.offset = screen - world * self.zoom;
    }

    /// Eased version of [`Camera::zoom_at()`].
    ///
    /// The offset is not interpolated; it is recomputed on every step from
    /// the interpolated zoom with the same screen-anchor rule, so `world`
    /// stays glued to its pixel for the whole transition.
    pub fn animated_zoom_at(&mut self, world: Vec2, factor: f64) {
        let screen = self.world_to_screen(world);
        let to_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.anim = Some(Anim {
            elapsed: 0.,
            duration: ANIM_DURATION,
            from_zoom: self.zoom,
            to_zoom,
            target: Target::Anchor { world, screen },
        });
    }

    /// Fit `bounds` (plus [`FIT_MARGIN`]) inside a `vw`×`vh` viewport.
    ///
    /// The smaller axis ratio wins, so the aspect is preserved, and the
    /// bounds center lands on the viewport center.
    pub fn fit_to_view(&mut self, bounds: Bounds, vw: f64, vh: f64, animate: bool) {
        let zx = (vw - 2. * FIT_MARGIN) / bounds.width();
        let zy = (vh - 2. * FIT_MARGIN) / bounds.height();
        let zoom = zx.min(zy).clamp(MIN_ZOOM, MAX_ZOOM);
        let offset = Vec2::new(vw * 0.5, vh * 0.5) - bounds.center() * zoom;
        if animate {
            self.anim = Some(Anim {
                elapsed: 0.,
                duration: ANIM_DURATION,
                from_zoom: self.zoom,
                to_zoom: zoom,
                target: Target::Offset { from: self.offset, to: offset },
            });
        } else {
            self.zoom = zoom;
            self.offset = offset;
            self.anim = None;
        }
    }

    /// Whether a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    /// Advance the active transition by `dt` seconds.
    ///
    /// Progress is eased with `1 - (1 - t)³` and the zoom interpolates
    /// linearly in zoom space. Returns `true` while still animating; the
    /// final step snaps exactly onto the target and clears the slot.
    pub fn update(&mut self, dt: f64) -> bool {
        let Some(anim) = &mut self.anim else {
            return false;
        };
        anim.elapsed += dt;
        let t = (anim.elapsed / anim.duration).min(1.);
        let p = ease_out_cubic(t);
        self.zoom = if t >= 1. {
            anim.to_zoom
        } else {
            anim.from_zoom + (anim.to_zoom - anim.from_zoom) * p
        };
        match anim.target {
            Target::Offset { from, to } => {
                self.offset = if t >= 1. { to } else { from.lerp(to, p) };
            }
            Target::Anchor { world, screen } => self.offset = screen - world * self.zoom,
        }
        if t >= 1. {
            self.anim = None;
        }
        self.anim.is_some()
    }
}

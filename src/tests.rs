use crate::*;
use approx::assert_abs_diff_eq;
use std::f64::consts::{FRAC_PI_2, TAU};

/// An rng stuck on one bit pattern, to pin the `add_rod` branch.
struct FixedRng(u64);

impl rand::RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for b in dst {
            *b = self.0 as u8;
        }
    }
}

fn follower(m: &mut Mechanism, length: f64, guide: Vec2) {
    let id = m.rods.len() as u32;
    m.rods.push(Rod { id, length, is_tracing: true, ..Rod::default() });
    m.guides.push(GuidePoint { id, pos: guide });
    m.update_joints();
}

#[test]
fn vec2_ops() {
    let a = Vec2::new(3., 4.);
    assert_abs_diff_eq!(a.length(), 5.);
    assert_abs_diff_eq!(a.distance(Vec2::new(3., 9.)), 5.);
    assert_eq!(a + Vec2::new(1., 1.), Vec2::new(4., 5.));
    assert_eq!(a - a, Vec2::ZERO);
    assert_eq!(a * 2., Vec2::new(6., 8.));
    let n = a.normalized();
    assert_abs_diff_eq!(n.length(), 1.);
    assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    let p = Vec2::ZERO.pla(2., FRAC_PI_2);
    assert_abs_diff_eq!(p.x, 0., epsilon = 1e-12);
    assert_abs_diff_eq!(p.y, 2.);
    assert_abs_diff_eq!(Vec2::ZERO.angle_to(Vec2::new(0., 1.)), FRAC_PI_2);
    // atan2(0, 0) stays zero, the solver's degenerate case
    assert_eq!(a.angle_to(a), 0.);
}

#[test]
fn camera_round_trip() {
    let mut cam = Camera::new();
    cam.offset = Vec2::new(37.5, -12.25);
    cam.set_zoom(2.3);
    for p in [Vec2::ZERO, Vec2::new(400., 300.), Vec2::new(-55.5, 917.)] {
        let q = cam.world_to_screen(cam.screen_to_world(p));
        assert_abs_diff_eq!(q.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(q.y, p.y, epsilon = 1e-9);
    }
}

#[test]
fn camera_zoom_anchor() {
    let mut cam = Camera::new();
    cam.offset = Vec2::new(30., 40.);
    cam.set_zoom(1.2);
    let world = Vec2::new(3., 4.);
    let before = cam.world_to_screen(world);
    cam.zoom_at(world, 1.5);
    let after = cam.world_to_screen(world);
    assert_abs_diff_eq!(cam.zoom, 1.8, epsilon = 1e-12);
    assert_abs_diff_eq!(after.x, before.x, epsilon = 1e-9);
    assert_abs_diff_eq!(after.y, before.y, epsilon = 1e-9);
}

#[test]
fn camera_zoom_clamped() {
    let mut cam = Camera::new();
    cam.set_zoom(100.);
    assert_eq!(cam.zoom, camera::MAX_ZOOM);
    cam.set_zoom(0.);
    assert_eq!(cam.zoom, camera::MIN_ZOOM);
    cam.zoom_at(Vec2::ZERO, 0.);
    assert_eq!(cam.zoom, camera::MIN_ZOOM);
}

#[test]
fn camera_fit_to_view() {
    let mut cam = Camera::new();
    let bounds = Bounds { min: Vec2::new(-50., -50.), max: Vec2::new(50., 50.) };
    cam.fit_to_view(bounds, 800., 600., false);
    assert_abs_diff_eq!(cam.zoom, 5.);
    let center = cam.world_to_screen(Vec2::ZERO);
    assert_abs_diff_eq!(center.x, 400., epsilon = 1e-9);
    assert_abs_diff_eq!(center.y, 300., epsilon = 1e-9);
}

#[test]
fn camera_fit_animated_completes() {
    let mut cam = Camera::new();
    let bounds = Bounds { min: Vec2::new(-50., -50.), max: Vec2::new(50., 50.) };
    cam.fit_to_view(bounds, 800., 600., true);
    assert!(cam.is_animating());
    // the starting transform is untouched until the first step
    assert_eq!(cam.zoom, 1.);
    while cam.update(0.05) {}
    assert!(!cam.is_animating());
    assert_abs_diff_eq!(cam.zoom, 5., epsilon = 1e-12);
    let center = cam.world_to_screen(Vec2::ZERO);
    assert_abs_diff_eq!(center.x, 400., epsilon = 1e-9);
    assert_abs_diff_eq!(center.y, 300., epsilon = 1e-9);
}

#[test]
fn camera_animated_zoom_keeps_anchor() {
    let mut cam = Camera::new();
    let world = Vec2::new(100., 50.);
    let screen = cam.world_to_screen(world);
    cam.animated_zoom_at(world, 2.);
    for _ in 0..10 {
        cam.update(0.05);
        let now = cam.world_to_screen(world);
        assert_abs_diff_eq!(now.x, screen.x, epsilon = 1e-9);
        assert_abs_diff_eq!(now.y, screen.y, epsilon = 1e-9);
    }
    assert!(!cam.is_animating());
    assert_abs_diff_eq!(cam.zoom, 2., epsilon = 1e-12);
}

#[test]
fn camera_animation_replaced() {
    let mut cam = Camera::new();
    cam.animated_zoom_at(Vec2::ZERO, 2.);
    cam.update(0.05);
    cam.animated_zoom_at(Vec2::ZERO, 0.5);
    while cam.update(0.05) {}
    // only the newest request survives
    assert!(cam.zoom < 1.);
}

#[test]
fn chain_invariants() {
    let mut m = Mechanism::default();
    assert_eq!(m.rods.len(), 1);
    assert!(m.guides.is_empty());
    for i in 0..3 {
        m.add_rod_s(i % 2 == 0);
        assert_eq!(m.rods.len(), m.guides.len() + 1);
        assert_eq!(m.joints.len(), m.rods.len());
    }
    for _ in 0..10 {
        m.remove_rod();
        assert_eq!(m.rods.len(), m.guides.len() + 1);
        assert!(!m.rods.is_empty());
        assert_eq!(m.joints.len(), m.rods.len());
    }
    assert_eq!(m.rods.len(), 1);
}

#[test]
fn golden_ratio_add_rod() {
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.add_rod_s(true);
    assert_abs_diff_eq!(m.rods[1].length, 80. * mech::PHI, epsilon = 1e-9);
    assert_eq!(m.guides.len(), 1);
    assert_eq!(m.guides[0].id, 1);
    assert!(!m.rods[0].is_tracing);
    assert!(m.rods[1].is_tracing);

    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.add_rod_s(false);
    assert_abs_diff_eq!(m.rods[1].length, 80. / mech::PHI, epsilon = 1e-9);

    // the two extreme rng states land on the two branches
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.add_rod(&mut FixedRng(0));
    let lo = m.rods[1].length;
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.add_rod(&mut FixedRng(u64::MAX));
    let hi = m.rods[1].length;
    for len in [lo, hi] {
        let phi = len / 80.;
        assert!(
            (phi - mech::PHI).abs() < 1e-9 || (phi - 1. / mech::PHI).abs() < 1e-9,
            "unexpected length {len}"
        );
    }
    assert_abs_diff_eq!(lo * hi, 80. * 80., epsilon = 1e-6);
}

#[test]
fn guide_placement_solves_distance() {
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.crank_angle = FRAC_PI_2;
    m.add_rod_s(true);
    let base = m.joints[0];
    let guide = m.guides[0].pos;
    let d = m.rods[1].length / mech::PHI;
    // X locked to the anchor, Y from the distance equation (upper root)
    assert_eq!(guide.x, 0.);
    assert_abs_diff_eq!(base.distance(guide), d, epsilon = 1e-9);
    assert!(guide.y > base.y);
}

#[test]
fn guide_placement_fallback() {
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    m.add_rod_s(false);
    let base = m.joints[0];
    let guide = m.guides[0].pos;
    let d = m.rods[1].length / mech::PHI;
    // the locked X is out of reach, so the guide stays on the base's Y
    assert_eq!(guide.y, base.y);
    assert_abs_diff_eq!(base.distance(guide), d, epsilon = 1e-9);
    assert!(guide.x < base.x);
}

#[test]
fn remove_rod_floor() {
    let mut m = Mechanism::default();
    m.remove_rod();
    assert_eq!(m.rods.len(), 1);
    assert_eq!(m.joints.len(), 1);
}

#[test]
fn forward_solve_positions() {
    let mut m = Mechanism::new(Vec2::new(10., 5.), 50.);
    m.crank_angle = FRAC_PI_2;
    follower(&mut m, 20., Vec2::new(40., 55.));
    assert_abs_diff_eq!(m.joints[0].x, 10., epsilon = 1e-9);
    assert_abs_diff_eq!(m.joints[0].y, 55., epsilon = 1e-9);
    assert_abs_diff_eq!(m.joints[1].x, 30., epsilon = 1e-9);
    assert_abs_diff_eq!(m.joints[1].y, 55., epsilon = 1e-9);
    assert_abs_diff_eq!(m.rods[0].angle, FRAC_PI_2);
    assert_abs_diff_eq!(m.rods[1].angle, 0., epsilon = 1e-9);
}

#[test]
fn stretch_monotonic() {
    let mut m = Mechanism::new(Vec2::ZERO, 50.);
    m.is_playing = false;
    m.is_stretching = true;
    follower(&mut m, 10., Vec2::new(60., 0.));
    let clearance = m.guide_radius + m.joint_radius;
    assert_abs_diff_eq!(m.rods[1].length, 10. + clearance, epsilon = 1e-9);
    // moving the guide closer never shrinks a grown rod
    m.guides[0].pos = Vec2::new(55., 0.);
    for _ in 0..5 {
        m.update(1.);
    }
    assert_abs_diff_eq!(m.rods[1].length, 10. + clearance, epsilon = 1e-9);
    m.guides[0].pos = Vec2::new(100., 0.);
    m.update_joints();
    assert_abs_diff_eq!(m.rods[1].length, 50. + clearance, epsilon = 1e-9);
}

#[test]
fn stretch_requires_mode() {
    let mut m = Mechanism::new(Vec2::ZERO, 50.);
    m.is_playing = false;
    follower(&mut m, 10., Vec2::new(60., 0.));
    for _ in 0..5 {
        m.update(1.);
    }
    assert_abs_diff_eq!(m.rods[1].length, 10.);
}

#[test]
fn degenerate_guide() {
    let mut m = Mechanism::new(Vec2::ZERO, 50.);
    follower(&mut m, 10., Vec2::new(50., 0.));
    // guide coincides with the parent joint: direction collapses to zero
    assert_abs_diff_eq!(m.rods[1].angle, 0.);
    assert_abs_diff_eq!(m.joints[1].x, 60., epsilon = 1e-9);
    assert_abs_diff_eq!(m.joints[1].y, 0., epsilon = 1e-9);
    assert!(m.joints.iter().all(|j| j.x.is_finite() && j.y.is_finite()));
}

#[test]
fn play_and_spin_toggles() {
    let mut m = Mechanism::default();
    assert!(!m.toggle_play_pause());
    assert!(m.toggle_play_pause());
    assert!(m.toggle_stretching());
    assert!(!m.toggle_stretching());
    assert!(!m.is_inverse());
    m.reverse_spin();
    assert!(m.is_inverse());
    assert_abs_diff_eq!(m.angular_velocity, -TAU / Mechanism::FRAMES_PER_ROUND);
    let angle = m.crank_angle;
    m.is_playing = false;
    m.update(1.);
    assert_eq!(m.crank_angle, angle);
}

#[test]
fn trace_eviction_asymmetry() {
    let mut traces = TraceSystem::new();
    traces.update_fade_lifespan(5);
    traces.add_trace_point(0, Vec2::ZERO);
    traces.add_full_rod_trace(0, Vec2::ZERO, Vec2::new(10., 0.));
    for tick in 1..=6 {
        traces.update();
        let points = traces.points_of(0).map_or(0, |b| b.len());
        let frames = traces.frames_of(0).map_or(0, |b| b.len());
        // frames expire at the lifespan, points one tick later
        assert_eq!(points, usize::from(tick <= 5), "tick {tick}");
        assert_eq!(frames, usize::from(tick <= 4), "tick {tick}");
    }
}

#[test]
fn crank_trace_scenario() {
    let mut m = Mechanism::new(Vec2::ZERO, 100.);
    let mut traces = TraceSystem::new();
    assert_eq!(traces.fade_lifespan, 360);
    assert_abs_diff_eq!(m.angular_velocity, TAU / 360.);
    for tick in 1..=400u32 {
        m.update(1.);
        traces.add_trace_point(0, m.joints[0]);
        traces.update();
        let buf = traces.points_of(0).unwrap();
        if tick <= 360 {
            assert_eq!(buf.len(), tick as usize);
            assert_eq!(buf.front().unwrap().age, tick);
        } else {
            // steady state: one in, one out
            assert_eq!(buf.len(), 360);
            assert_eq!(buf.front().unwrap().age, 360);
        }
    }
}

#[test]
fn fade_alpha_endpoints() {
    let mut traces = TraceSystem::new();
    traces.update_fade_lifespan(360);
    assert_eq!(traces.alpha(0), 255);
    assert_eq!(traces.alpha(360), 0);
    assert_eq!(traces.alpha(180), 128);
    assert_eq!(traces.alpha(90), 191);
    traces.style.fading = false;
    assert_eq!(traces.alpha(999), 255);
}

#[test]
fn fading_disabled_keeps_everything() {
    let mut traces = TraceSystem::new();
    traces.style.fading = false;
    traces.update_fade_lifespan(2);
    traces.add_trace_point(0, Vec2::ZERO);
    for _ in 0..10 {
        traces.update();
    }
    let buf = traces.points_of(0).unwrap();
    assert_eq!(buf.len(), 1);
    assert_eq!(buf.front().unwrap().age, 0);
}

#[test]
fn full_rod_color_brightens() {
    let style = TraceStyle { color: [100, 120, 200], ..TraceStyle::default() };
    assert_eq!(style.full_rod_color(), [150, 180, 255]);
}

#[test]
fn full_rod_frame_sampling() {
    let mut traces = TraceSystem::new();
    traces.add_full_rod_trace(3, Vec2::ZERO, Vec2::new(8., 0.));
    let frame = &traces.frames_of(3).unwrap()[0];
    assert_eq!(frame.points.len(), trace::ROD_FRAME_POINTS);
    assert_eq!(frame.points[0], Vec2::ZERO);
    assert_eq!(frame.points[8], Vec2::new(8., 0.));
    assert_abs_diff_eq!(frame.points[4].x, 4.);
}

#[test]
fn catmull_rom_through_points() {
    let pts = [
        Vec2::new(0., 0.),
        Vec2::new(10., 0.),
        Vec2::new(10., 10.),
        Vec2::new(0., 10.),
    ];
    let res = 4;
    let curve = curve::catmull_rom(&pts, res);
    assert_eq!(curve.len(), (pts.len() - 1) * res + 1);
    for (i, p) in pts.iter().enumerate() {
        assert_eq!(curve[i * res], *p);
    }
    // short inputs pass through untouched
    assert_eq!(curve::catmull_rom(&pts[..2], res), pts[..2].to_vec());
}

#[test]
fn banded_runs_overlap() {
    let mut traces = TraceSystem::new();
    traces.update_fade_lifespan(8);
    let pts = [Vec2::new(0., 0.), Vec2::new(1., 0.), Vec2::new(2., 0.)];
    traces.add_trace_point(0, pts[0]);
    traces.update();
    traces.add_trace_point(0, pts[1]);
    traces.update();
    traces.add_trace_point(0, pts[2]);
    let runs = traces.banded_points(0);
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0], (191, vec![pts[0]]));
    assert_eq!(runs[1], (223, vec![pts[0], pts[1]]));
    assert_eq!(runs[2], (255, vec![pts[1], pts[2]]));
}

#[test]
fn banded_runs_merge_within_band() {
    let mut traces = TraceSystem::new();
    traces.update_fade_lifespan(100_000);
    for i in 0..3 {
        traces.add_trace_point(0, Vec2::new(f64::from(i), 0.));
        traces.update();
    }
    let runs = traces.banded_points(0);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].1.len(), 3);
}

#[test]
fn trace_bounds() {
    let mut traces = TraceSystem::new();
    assert_eq!(traces.calculate_bounds(), None);
    traces.add_trace_point(0, Vec2::new(5., 5.));
    traces.add_full_rod_trace(1, Vec2::ZERO, Vec2::new(10., 0.));
    let bounds = traces.calculate_bounds().unwrap();
    assert_abs_diff_eq!(bounds.min.x, -trace::TRACE_PAD);
    assert_abs_diff_eq!(bounds.max.x, 10. + trace::TRACE_PAD);
    assert_abs_diff_eq!(bounds.max.y, 5. + trace::TRACE_PAD);
    traces.clear_trace(0);
    traces.clear_all_traces();
    assert_eq!(traces.calculate_bounds(), None);
}

#[test]
fn mech_bounds_include_anchor() {
    let m = Mechanism::new(Vec2::ZERO, 80.);
    let bounds = m.calculate_bounds();
    assert_abs_diff_eq!(bounds.min.x, -mech::BOUNDS_PAD);
    assert_abs_diff_eq!(bounds.max.x, 80. + mech::BOUNDS_PAD);
    assert_abs_diff_eq!(bounds.center().y, 0.);
}

#[test]
fn pick_closest_entity() {
    let m = Mechanism::new(Vec2::ZERO, 80.);
    // beyond the chain ends the segment ties the point, and the point wins
    assert_eq!(m.pick(Vec2::new(-1., 1.), 5.), Some(Selection::Anchor));
    assert_eq!(m.pick(Vec2::new(81., 1.), 5.), Some(Selection::Joint(0)));
    // over the middle of the rod the segment is strictly closest
    assert_eq!(m.pick(Vec2::new(40., 1.), 5.), Some(Selection::Rod(0)));
    assert_eq!(m.pick(Vec2::new(200., 200.), 5.), None);
}

#[test]
fn pick_tie_precedence() {
    let mut m = Mechanism::new(Vec2::ZERO, 80.);
    follower(&mut m, 10., Vec2::new(80., 0.));
    // guide sits exactly on the crank tip joint; the guide wins the tie
    assert_eq!(m.pick(Vec2::new(80., 0.), 5.), Some(Selection::Guide(0)));
}

#[test]
fn segment_hit_testing() {
    let m = Mechanism::new(Vec2::ZERO, 80.);
    assert_abs_diff_eq!(
        select::segment_distance(Vec2::new(5., 5.), Vec2::ZERO, Vec2::new(10., 0.)),
        5.
    );
    assert!(m.rod_is_over(0, Vec2::new(40., 2.), 3.));
    assert!(!m.rod_is_over(0, Vec2::new(40., 8.), 3.));
    assert!(m.joint_is_over(0, Vec2::new(80., 0.), 1.));
    assert!(!m.joint_is_over(5, Vec2::new(80., 0.), 1.));
    assert!(m.anchor.is_over(Vec2::new(1., 0.), 2.));
}

#[cfg(feature = "serde")]
#[test]
fn snapshot_round_trip() {
    let mut m = Mechanism::new(Vec2::new(3.25, -1.5), 72.125);
    m.add_rod_s(true);
    m.reverse_spin();
    m.is_stretching = true;
    let mut cam = Camera::new();
    cam.offset = Vec2::new(123.0625, -7.75);
    cam.set_zoom(1.625);
    let mut traces = TraceSystem::new();
    traces.style.color = [10, 200, 30];
    traces.style.fading = false;
    let snap = snapshot::SceneSnapshot::capture(&m, &cam, &traces);

    let mut m2 = Mechanism::default();
    let mut cam2 = Camera::new();
    let mut traces2 = TraceSystem::new();
    snap.restore(&mut m2, &mut cam2, &mut traces2);
    assert_eq!(snapshot::SceneSnapshot::capture(&m2, &cam2, &traces2), snap);
    // restore rebuilds the derived state too
    assert_eq!(m2.joints.len(), m2.rods.len());
    assert!(m2.is_inverse());
    assert_eq!(cam2.offset, cam.offset);
    assert_eq!(cam2.zoom, cam.zoom);
}

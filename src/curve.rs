//! Trace curve reconstruction helpers.
//!
//! Smoothing only inserts points between the recorded samples; the
//! recorded positions themselves always appear on the output curve.
use crate::point::Vec2;

/// Sample `n + 1` evenly spaced points on a segment, endpoints included.
pub fn sample_segment(start: Vec2, end: Vec2, n: usize) -> Vec<Vec2> {
    let n = n.max(1);
    (0..=n)
        .map(|i| start.lerp(end, i as f64 / n as f64))
        .collect()
}

/// Uniform Catmull-Rom curve through the control points.
///
/// Each consecutive pair is interpolated with `res` sub-samples, using the
/// immediate neighbors as tangent controls. Endpoints are duplicated as
/// their own neighbors, so the curve starts and ends exactly on the first
/// and last recorded points.
pub fn catmull_rom(pts: &[Vec2], res: usize) -> Vec<Vec2> {
    if pts.len() < 3 || res < 2 {
        return pts.to_vec();
    }
    let mut curve = Vec::with_capacity((pts.len() - 1) * res + 1);
    for i in 0..pts.len() - 1 {
        let p0 = pts[i.saturating_sub(1)];
        let p1 = pts[i];
        let p2 = pts[i + 1];
        let p3 = pts[(i + 2).min(pts.len() - 1)];
        for s in 0..res {
            let t = s as f64 / res as f64;
            curve.push(interpolate(p0, p1, p2, p3, t));
        }
    }
    curve.push(pts[pts.len() - 1]);
    curve
}

fn interpolate(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f64) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let c0 = p1 * 2.;
    let c1 = (p2 - p0) * t;
    let c2 = (p0 * 2. - p1 * 5. + p2 * 4. - p3) * t2;
    let c3 = (p1 * 3. - p0 - p2 * 3. + p3) * t3;
    (c0 + c1 + c2 + c3) * 0.5
}

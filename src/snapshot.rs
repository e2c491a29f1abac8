//! Plain-data scene exchange for the save/share layer.
//!
//! This is the whole serialization boundary of the core: a flat snapshot
//! of mechanism, camera, and trace configuration. The shape is trusted
//! as-is — version tags and rejection of foreign data belong to the
//! caller. Round-tripping a snapshot reproduces every float bit for bit.
use crate::camera::Camera;
use crate::mech::{GuidePoint, Mechanism, Rod};
use crate::point::Vec2;
use crate::trace::{TraceStyle, TraceSystem};
use serde::{Deserialize, Serialize};

/// Rod fields carried by a snapshot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RodSnapshot {
    /// Rod length
    pub length: f64,
    /// Tip tracing flag
    pub is_tracing: bool,
    /// Full-rod tracing flag
    pub is_full_rod_tracing: bool,
}

/// Camera fields carried by a snapshot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CameraSnapshot {
    /// Pan offset X
    pub offset_x: f64,
    /// Pan offset Y
    pub offset_y: f64,
    /// Zoom factor
    pub zoom: f64,
}

/// Trace configuration carried by a snapshot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TraceSnapshot {
    /// Trace color (RGB)
    pub color: [u8; 3],
    /// Trace stroke width
    pub trace_width: f64,
    /// Rod stroke width
    pub rods_width: f64,
    /// Whether traces fade out
    pub fading: bool,
}

/// A whole scene: mechanism, camera, and trace configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SceneSnapshot {
    /// Anchor position
    pub anchor: [f64; 2],
    /// Ordered rods, crank first
    pub rods: Vec<RodSnapshot>,
    /// Ordered guide point positions
    pub guides: Vec<[f64; 2]>,
    /// Camera state
    pub camera: CameraSnapshot,
    /// Trace configuration
    pub trace: TraceSnapshot,
    /// Stretching mode flag
    pub is_stretching: bool,
    /// Reversed spin flag
    pub is_inverse: bool,
}

impl SceneSnapshot {
    /// Capture the current scene.
    pub fn capture(mech: &Mechanism, camera: &Camera, traces: &TraceSystem) -> Self {
        Self {
            anchor: [mech.anchor.pos.x, mech.anchor.pos.y],
            rods: (mech.rods.iter())
                .map(|r| RodSnapshot {
                    length: r.length,
                    is_tracing: r.is_tracing,
                    is_full_rod_tracing: r.is_full_rod_tracing,
                })
                .collect(),
            guides: mech.guides.iter().map(|g| [g.pos.x, g.pos.y]).collect(),
            camera: CameraSnapshot {
                offset_x: camera.offset.x,
                offset_y: camera.offset.y,
                zoom: camera.zoom,
            },
            trace: TraceSnapshot {
                color: traces.style.color,
                trace_width: traces.style.trace_width,
                rods_width: traces.style.rods_width,
                fading: traces.style.fading,
            },
            is_stretching: mech.is_stretching,
            is_inverse: mech.is_inverse(),
        }
    }

    /// Restore a scene in place.
    ///
    /// Joints are recomputed synchronously and the stretching clearances
    /// re-sync with the restored style. Live trace buffers are left
    /// untouched; clearing them is the caller's choice.
    pub fn restore(&self, mech: &mut Mechanism, camera: &mut Camera, traces: &mut TraceSystem) {
        mech.anchor.pos = Vec2::new(self.anchor[0], self.anchor[1]);
        mech.rods = (self.rods.iter().enumerate())
            .map(|(id, r)| Rod {
                id: id as u32,
                length: r.length,
                is_tracing: r.is_tracing,
                is_full_rod_tracing: r.is_full_rod_tracing,
                ..Rod::default()
            })
            .collect();
        mech.guides = (self.guides.iter().enumerate())
            .map(|(i, g)| GuidePoint {
                id: i as u32 + 1,
                pos: Vec2::new(g[0], g[1]),
            })
            .collect();
        mech.is_stretching = self.is_stretching;
        let speed = mech.angular_velocity.abs();
        mech.angular_velocity = if self.is_inverse { -speed } else { speed };
        traces.style = TraceStyle {
            color: self.trace.color,
            trace_width: self.trace.trace_width,
            rods_width: self.trace.rods_width,
            fading: self.trace.fading,
        };
        mech.set_clearance(traces.style.guide_radius(), traces.style.joint_radius());
        camera.offset = Vec2::new(self.camera.offset_x, self.camera.offset_y);
        camera.set_zoom(self.camera.zoom);
        mech.update_joints();
    }
}

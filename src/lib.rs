//! Spiro🌀chain is a guided rod-chain simulator: a crank-driven linkage
//! whose joints trace evolving, fading curves.
//!
//! The crank is the only driven rod; every follower rod aims at a
//! draggable guide point, so the whole chain solves in one forward pass
//! per tick. Traced joints feed the [`TraceSystem`], and the [`Camera`]
//! maps between screen and world space for interaction.
//!
//! One simulation tick runs, in order: camera animation, mechanism
//! update (crank angle + joint solve), trace sampling, trace aging, and
//! rendering. Everything is single-threaded and cooperative.
#![warn(missing_docs)]
pub use crate::camera::Camera;
pub use crate::mech::{Anchor, GuidePoint, Mechanism, Rod};
pub use crate::point::{Bounds, Vec2};
pub use crate::select::Selection;
pub use crate::trace::{RodFrame, TracePoint, TraceStyle, TraceSystem};

pub mod camera;
pub mod curve;
pub mod mech;
#[cfg(feature = "plot")]
pub mod plot2d;
pub mod point;
pub mod select;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod trace;
#[cfg(test)]
mod tests;

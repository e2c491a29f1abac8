//! Scene rendering on a plotters backend.
//!
//! # Example
//!
//! ```
//! use spiro_chain::plot2d::*;
//! use spiro_chain::{Mechanism, TraceSystem};
//!
//! let mech = Mechanism::example();
//! let traces = TraceSystem::new();
//! let mut buf = String::new();
//! let svg = SVGBackend::with_string(&mut buf, (800, 800));
//! Figure::new().with_mech(&mech).with_traces(&traces).plot(svg).unwrap();
//! ```
use crate::curve::catmull_rom;
use crate::mech::Mechanism;
use crate::point::{Bounds, Vec2};
use crate::trace::TraceSystem;
#[doc(no_inline)]
pub use plotters::{prelude::*, *};

pub(crate) type PResult<T, B> = Result<T, DrawingAreaErrorKind<<B as DrawingBackend>::ErrorType>>;
pub(crate) type Canvas<B> = DrawingArea<B, coord::Shift>;

const LINK_COLOR: RGBColor = RGBColor(165, 151, 132);
const PIVOT_COLOR: RGBColor = RGBColor(93, 69, 56);
const JOINT_COLOR: RGBColor = RGBColor(128, 96, 77);
/// Sub-samples inserted per recorded trace segment.
const CURVE_RES: usize = 4;

/// Drawing options.
#[derive(Clone, PartialEq, Eq)]
pub struct Opt {
    /// Stroke size
    pub stroke: u32,
    /// Show grid
    pub grid: bool,
    /// Show axis
    pub axis: bool,
}

impl Default for Opt {
    fn default() -> Self {
        Self { stroke: 3, grid: false, axis: true }
    }
}

/// Scene drawing builder.
///
/// Attach a mechanism and/or a trace system, then plot onto any plotters
/// drawing area. The plotting range is the union of their bounds.
#[derive(Default, Clone)]
pub struct Figure<'a> {
    mech: Option<&'a Mechanism>,
    traces: Option<&'a TraceSystem>,
    /// Drawing options
    pub opt: Opt,
}

impl<'a> Figure<'a> {
    /// Create an empty figure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mechanism.
    pub fn with_mech(self, mech: &'a Mechanism) -> Self {
        Self { mech: Some(mech), ..self }
    }

    /// Attach a trace system.
    pub fn with_traces(self, traces: &'a TraceSystem) -> Self {
        Self { traces: Some(traces), ..self }
    }

    /// Set the stroke size.
    pub fn stroke(mut self, stroke: u32) -> Self {
        self.opt.stroke = stroke;
        self
    }

    /// Use grid in the plot.
    pub fn grid(mut self, grid: bool) -> Self {
        self.opt.grid = grid;
        self
    }

    /// Show the axis.
    pub fn axis(mut self, axis: bool) -> Self {
        self.opt.axis = axis;
        self
    }

    fn bounds(&self) -> Bounds {
        let mech = self.mech.map(|m| m.calculate_bounds());
        let traces = self.traces.and_then(|t| t.calculate_bounds());
        match (mech, traces) {
            (Some(a), Some(b)) => a.union(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => Bounds::from_point(Vec2::ZERO).pad(100.),
        }
    }

    /// Plot the scene on a backend.
    pub fn plot<B, R>(&self, root: R) -> PResult<(), B>
    where
        B: DrawingBackend,
        Canvas<B>: From<R>,
    {
        let root = Canvas::from(root);
        root.fill(&WHITE)?;
        let bounds = self.bounds();
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(bounds.min.x..bounds.max.x, bounds.min.y..bounds.max.y)?;
        {
            let mut mesh = chart.configure_mesh();
            if !self.opt.grid {
                mesh.disable_mesh();
            }
            if !self.opt.axis {
                mesh.disable_axes();
            }
            mesh.draw()?;
        }
        if let Some(traces) = self.traces {
            self.plot_traces(&mut chart, traces)?;
        }
        if let Some(mech) = self.mech {
            self.plot_mech(&mut chart, mech)?;
        }
        root.present()?;
        Ok(())
    }

    fn plot_traces<'c, DB, CT>(
        &self,
        chart: &mut ChartContext<'c, DB, CT>,
        traces: &TraceSystem,
    ) -> PResult<(), DB>
    where
        DB: DrawingBackend + 'c,
        CT: CoordTranslate<From = (f64, f64)>,
    {
        let [fr, fg, fb] = traces.style.full_rod_color();
        let [r, g, b] = traces.style.color;
        for rod in traces.rods() {
            if let Some(frames) = traces.frames_of(rod) {
                for frame in frames {
                    let alpha = f64::from(traces.alpha(frame.age)) / 255.;
                    let color = RGBColor(fr, fg, fb).mix(alpha);
                    let line = frame.points.iter().map(|p| (p.x, p.y));
                    let width = traces.style.rods_width as u32;
                    chart.draw_series(LineSeries::new(line, color.stroke_width(width.max(1))))?;
                }
            }
            for (alpha, run) in traces.banded_points(rod) {
                let color = RGBColor(r, g, b).mix(f64::from(alpha) / 255.);
                let curve = catmull_rom(&run, CURVE_RES);
                let line = curve.iter().map(|p| (p.x, p.y));
                let width = traces.style.trace_width as u32;
                chart.draw_series(LineSeries::new(line, color.stroke_width(width.max(1))))?;
            }
        }
        Ok(())
    }

    fn plot_mech<'c, DB, CT>(
        &self,
        chart: &mut ChartContext<'c, DB, CT>,
        mech: &Mechanism,
    ) -> PResult<(), DB>
    where
        DB: DrawingBackend + 'c,
        CT: CoordTranslate<From = (f64, f64)>,
    {
        let stroke = self.opt.stroke;
        for (i, joint) in mech.joints.iter().enumerate() {
            let start = if i == 0 { mech.anchor.pos } else { mech.joints[i - 1] };
            let line = [(start.x, start.y), (joint.x, joint.y)];
            chart.draw_series(LineSeries::new(line, LINK_COLOR.stroke_width(stroke)))?;
        }
        let guides = (mech.guides.iter())
            .map(|g| TriangleMarker::new((g.pos.x, g.pos.y), stroke + 4, JOINT_COLOR.stroke_width(1)));
        chart.draw_series(guides)?;
        let joints = (mech.joints.iter()).map(|j| Circle::new((j.x, j.y), stroke + 2, JOINT_COLOR.filled()));
        chart.draw_series(joints)?;
        let anchor = (mech.anchor.pos.x, mech.anchor.pos.y);
        chart.draw_series([Circle::new(anchor, stroke + 4, PIVOT_COLOR.filled())])?;
        Ok(())
    }
}

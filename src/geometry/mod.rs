pub mod curve;
pub mod pline;

pub use curve::{BSpline, Bezier3, Bezier4, Curve, CurveDomain, Ellipse};
pub use pline::PlineVertex;

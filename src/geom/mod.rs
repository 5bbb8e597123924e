mod core;
mod curve;
mod path;

pub use self::core::{BBox2, Point2, Tolerance, Vec2, project_onto_segment};
pub use curve::{
    ARC_LENGTH_SAMPLES, ArcLengthTable, CubicBezier, Curve2, CurveProjection, Line2,
    angle_from_normal, normal_from_derivative,
};
pub use path::{
    Anchor, AnchorId, ClosestPoint, PathCommand, PathDiagnostics, PathLocation, PathState,
    PiecewisePath,
};

#[cfg(test)]
mod tests;

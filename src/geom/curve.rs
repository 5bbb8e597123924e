use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::core::{BBox2, Point2, Tolerance, Vec2, project_onto_segment};

/// Number of polyline pieces used to approximate the arc length of a cubic
/// segment. The table holds `ARC_LENGTH_SAMPLES + 1` entries.
pub const ARC_LENGTH_SAMPLES: usize = 100;

pub trait Curve2 {
    fn point_at(&self, t: f64) -> Point2;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn derivative_at(&self, t: f64) -> Vec2;

    /// Unit normal `(dy, -dx) / |d|`. Non-finite where the derivative vanishes.
    #[must_use]
    fn normal_at(&self, t: f64) -> Vec2 {
        normal_from_derivative(self.derivative_at(t))
    }

    /// Rotation angle in radians of a glyph standing on the curve at `t`.
    #[must_use]
    fn angle_at(&self, t: f64) -> f64 {
        angle_from_normal(self.normal_at(t))
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec2> {
        self.derivative_at(t).normalized()
    }
}

/// Rotates a derivative a quarter turn and scales it to unit length.
///
/// No degeneracy check is made: a zero derivative yields NaN components,
/// which callers propagate as "undefined direction".
#[must_use]
pub fn normal_from_derivative(d: Vec2) -> Vec2 {
    d.perp().div_scalar(d.length())
}

/// Angle of the baseline whose upward normal is `n`, in a y-down frame.
///
/// A curve running left to right has normal `(0, -1)` and angle 0. The
/// result uses `atan` of the ratio, so exactly vertical tangents sit on the
/// branch cut and may flip by π depending on the sign of a zero.
#[must_use]
pub fn angle_from_normal(n: Vec2) -> f64 {
    let base = (n.x / -n.y).atan();
    if n.y > 0.0 { base + PI } else { base }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub start: Point2,
    pub end: Point2,
}

impl Line2 {
    #[must_use]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec2 {
        self.end.sub_point(self.start)
    }
}

impl Curve2 for Line2 {
    fn point_at(&self, t: f64) -> Point2 {
        self.start.add_vec(self.direction().mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec2 {
        self.direction()
    }
}

// ============================================================================
// Arc-length table
// ============================================================================

/// Result of projecting a point onto a sampled curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveProjection {
    /// Closest point on the sampled polyline.
    pub point: Point2,
    /// Euclidean distance from the query to `point`.
    pub distance: f64,
    /// Curve parameter of `point`, interpolated inside the sample piece.
    pub parameter: f64,
}

/// Cumulative polyline lengths of a curve sampled at uniform parameters.
///
/// `lengths[i]` is the length of the polyline through the samples
/// `0..=i`; `points[i]` is the sample itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    domain: (f64, f64),
    lengths: Vec<f64>,
    points: Vec<Point2>,
}

impl ArcLengthTable {
    /// Samples `curve` at `samples + 1` uniform parameters across its domain.
    #[must_use]
    pub fn build<C: Curve2 + ?Sized>(curve: &C, samples: usize) -> Self {
        let samples = samples.max(1);
        let (t0, t1) = curve.domain();
        let span = t1 - t0;

        let mut lengths = Vec::with_capacity(samples + 1);
        let mut points = Vec::with_capacity(samples + 1);
        let mut cumulative = 0.0;
        let mut prev = curve.point_at(t0);

        lengths.push(0.0);
        points.push(prev);

        for i in 1..=samples {
            let t = t0 + span * (i as f64 / samples as f64);
            let curr = curve.point_at(t);
            cumulative += curr.sub_point(prev).length();
            lengths.push(cumulative);
            points.push(curr);
            prev = curr;
        }

        Self {
            domain: (t0, t1),
            lengths,
            points,
        }
    }

    #[must_use]
    pub fn samples(&self) -> usize {
        self.lengths.len() - 1
    }

    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    fn param_at_index(&self, index: f64) -> f64 {
        let (t0, t1) = self.domain;
        t0 + (t1 - t0) * (index / self.samples() as f64)
    }

    /// Maps a fraction of the total length to a curve parameter.
    ///
    /// Fractions at or below 0 map to the domain start, fractions at or above
    /// 1 map to the domain end. Between samples the parameter is linearly
    /// interpolated, so the mapping is monotone non-decreasing.
    #[must_use]
    pub fn param_at_length_fraction(&self, u: f64) -> f64 {
        let (t0, t1) = self.domain;
        if u <= 0.0 {
            return t0;
        }
        if u >= 1.0 {
            return t1;
        }

        let last = self.samples();
        let target = u * self.total_length();
        let mut idx = self.lengths.partition_point(|&l| l < target).min(last);
        if self.lengths[idx] > target {
            idx = idx.saturating_sub(1);
        }

        let before = self.lengths[idx];
        if before == target || idx == last {
            return self.param_at_index(idx as f64);
        }
        let after = self.lengths[idx + 1];
        if after == before {
            return self.param_at_index(idx as f64);
        }
        self.param_at_index(idx as f64 + (target - before) / (after - before))
    }

    /// Arc length from the domain start to `t`, interpolated from the table.
    /// Parameters outside the domain are clamped.
    #[must_use]
    pub fn length_at_param(&self, t: f64) -> f64 {
        let (t0, t1) = self.domain;
        let span = t1 - t0;
        if !span.is_finite() || span == 0.0 {
            return 0.0;
        }
        let last = self.samples();
        let s = ((t - t0) / span).clamp(0.0, 1.0) * last as f64;
        let idx = (s.floor() as usize).min(last - 1);
        let frac = s - idx as f64;
        let l0 = self.lengths[idx];
        let l1 = self.lengths[idx + 1];
        l0 + (l1 - l0) * frac
    }

    /// Projects `query` onto every polyline piece and keeps the first
    /// strictly closest one.
    #[must_use]
    pub fn closest_point(&self, query: Point2) -> CurveProjection {
        let mut best = CurveProjection {
            point: self.points[0],
            distance: f64::INFINITY,
            parameter: self.domain.0,
        };

        for (i, piece) in self.points.windows(2).enumerate() {
            let (proj, factor) = project_onto_segment(piece[0], piece[1], query);
            let distance = proj.distance_to(query);
            if distance < best.distance {
                best = CurveProjection {
                    point: proj,
                    distance,
                    parameter: self.param_at_index(i as f64 + factor),
                };
            }
        }

        best
    }
}

// ============================================================================
// Cubic Bézier
// ============================================================================

/// A cubic Bézier curve with a cached arc-length table.
///
/// The four control points are owned directly; every call to [`set`]
/// rebuilds the table so length queries always match the current geometry.
///
/// [`set`]: CubicBezier::set
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBezier {
    a: Point2,
    b: Point2,
    c: Point2,
    d: Point2,
    table: ArcLengthTable,
}

impl CubicBezier {
    #[must_use]
    pub fn new(a: Point2, b: Point2, c: Point2, d: Point2) -> Self {
        let raw = RawCubic { a, b, c, d };
        Self {
            a,
            b,
            c,
            d,
            table: ArcLengthTable::build(&raw, ARC_LENGTH_SAMPLES),
        }
    }

    /// Replaces all four control points and rebuilds the arc-length table.
    pub fn set(&mut self, a: Point2, b: Point2, c: Point2, d: Point2) {
        *self = Self::new(a, b, c, d);
    }

    #[must_use]
    pub const fn points(&self) -> [Point2; 4] {
        [self.a, self.b, self.c, self.d]
    }

    #[must_use]
    pub const fn start(&self) -> Point2 {
        self.a
    }

    #[must_use]
    pub const fn end(&self) -> Point2 {
        self.d
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.table.total_length()
    }

    #[must_use]
    pub const fn arc_length_table(&self) -> &ArcLengthTable {
        &self.table
    }

    #[must_use]
    pub fn sample_points(&self) -> &[Point2] {
        self.table.points()
    }

    /// Bernstein blend of the control points. `t` is not clamped, so values
    /// outside `[0, 1]` extrapolate the polynomial.
    #[must_use]
    pub fn position(&self, t: f64) -> Point2 {
        RawCubic::from(self).point_at(t)
    }

    #[must_use]
    pub fn derivative(&self, t: f64) -> Vec2 {
        RawCubic::from(self).derivative_at(t)
    }

    #[must_use]
    pub fn normal(&self, t: f64) -> Vec2 {
        normal_from_derivative(self.derivative(t))
    }

    #[must_use]
    pub fn angle(&self, t: f64) -> f64 {
        angle_from_normal(self.normal(t))
    }

    #[must_use]
    pub fn param_at_length_fraction(&self, u: f64) -> f64 {
        self.table.param_at_length_fraction(u)
    }

    /// Parameter at `px` units along the curve. On a zero-length curve any
    /// positive distance overshoots to 1, zero and negative distances map to 0.
    #[must_use]
    pub fn param_at_distance(&self, px: f64) -> f64 {
        self.param_at_length_fraction(px / self.length())
    }

    #[must_use]
    pub fn length_at_param(&self, t: f64) -> f64 {
        self.table.length_at_param(t)
    }

    #[must_use]
    pub fn position_at_fraction(&self, u: f64) -> Point2 {
        self.position(self.param_at_length_fraction(u))
    }

    #[must_use]
    pub fn derivative_at_fraction(&self, u: f64) -> Vec2 {
        self.derivative(self.param_at_length_fraction(u))
    }

    #[must_use]
    pub fn normal_at_fraction(&self, u: f64) -> Vec2 {
        self.normal(self.param_at_length_fraction(u))
    }

    #[must_use]
    pub fn angle_at_fraction(&self, u: f64) -> f64 {
        self.angle(self.param_at_length_fraction(u))
    }

    #[must_use]
    pub fn position_at_distance(&self, px: f64) -> Point2 {
        self.position(self.param_at_distance(px))
    }

    #[must_use]
    pub fn derivative_at_distance(&self, px: f64) -> Vec2 {
        self.derivative(self.param_at_distance(px))
    }

    #[must_use]
    pub fn normal_at_distance(&self, px: f64) -> Vec2 {
        self.normal(self.param_at_distance(px))
    }

    #[must_use]
    pub fn angle_at_distance(&self, px: f64) -> f64 {
        self.angle(self.param_at_distance(px))
    }

    /// Bounds of the control polygon, which contain the whole curve on `[0, 1]`.
    #[must_use]
    pub fn bounding_box(&self) -> BBox2 {
        BBox2::new(self.a, self.a)
            .expand_point(self.b)
            .expand_point(self.c)
            .expand_point(self.d)
    }

    #[must_use]
    pub fn sampled_bounding_box(&self) -> BBox2 {
        BBox2::from_points(self.table.points()).unwrap_or_else(|| BBox2::new(self.a, self.a))
    }

    #[must_use]
    pub fn closest_point(&self, query: Point2) -> CurveProjection {
        self.table.closest_point(query)
    }

    /// True when the sampled length is zero, i.e. all control points coincide
    /// or the curve folds back onto a single point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        Tolerance::ZERO_LENGTH.is_zero_length(self.length())
    }

    /// True when the derivative vanishes at `t = 0` or `t = 1`. The curve may
    /// still have length, but its normal and angle at that end are NaN.
    #[must_use]
    pub fn has_stationary_end(&self) -> bool {
        let tol = Tolerance::ZERO_LENGTH;
        tol.approx_eq_point2(self.a, self.b) || tol.approx_eq_point2(self.c, self.d)
    }
}

impl Curve2 for CubicBezier {
    fn point_at(&self, t: f64) -> Point2 {
        self.position(t)
    }

    fn derivative_at(&self, t: f64) -> Vec2 {
        self.derivative(t)
    }
}

/// Control points without the table, used to sample the curve while the
/// table itself is being built.
#[derive(Clone, Copy)]
struct RawCubic {
    a: Point2,
    b: Point2,
    c: Point2,
    d: Point2,
}

impl From<&CubicBezier> for RawCubic {
    fn from(curve: &CubicBezier) -> Self {
        Self {
            a: curve.a,
            b: curve.b,
            c: curve.c,
            d: curve.d,
        }
    }
}

impl Curve2 for RawCubic {
    /// De Casteljau evaluation. Coincident control points stay exact.
    fn point_at(&self, t: f64) -> Point2 {
        let ab = self.a.lerp(self.b, t);
        let bc = self.b.lerp(self.c, t);
        let cd = self.c.lerp(self.d, t);
        ab.lerp(bc, t).lerp(bc.lerp(cd, t), t)
    }

    fn derivative_at(&self, t: f64) -> Vec2 {
        let u = 1.0 - t;
        let ab = self.b.sub_point(self.a);
        let bc = self.c.sub_point(self.b);
        let cd = self.d.sub_point(self.c);
        ab.mul_scalar(3.0 * u * u)
            .add(bc.mul_scalar(6.0 * u * t))
            .add(cd.mul_scalar(3.0 * t * t))
    }
}

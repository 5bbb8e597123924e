//! Piecewise cubic path through an editable list of anchors.
//!
//! Segments are Catmull-Rom splines converted to Bézier form, so the path
//! passes through every anchor in order. The open ends use the endpoint
//! itself as the missing neighbour, which gives a straight approach and makes
//! a two-anchor path an exact line. Every mutation rebuilds all segments.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::core::{BBox2, Point2, Vec2};
use super::curve::{CubicBezier, angle_from_normal, normal_from_derivative};

/// Opaque identifier of an anchor, unique within one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(u64);

impl AnchorId {
    /// Rebuilds an id a host received earlier through [`AnchorId::raw`].
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,
    pub point: Point2,
}

/// Closest point on a path together with the segment that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPoint {
    pub proj: Point2,
    pub mdist: f64,
    pub curve_index: usize,
}

/// One drawing command of the serialized path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PathCommand {
    Move { points: [Point2; 1] },
    Cubic { points: [Point2; 3] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathState {
    /// Fewer than two anchors; every geometric query returns nothing.
    Empty,
    Active,
}

/// Geometry at a global distance along the path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathLocation {
    /// Segment owning the distance.
    pub segment_index: usize,
    /// Local parameter on that segment.
    pub param: f64,
    pub position: Point2,
    pub derivative: Vec2,
    pub normal: Vec2,
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathDiagnostics {
    pub anchor_count: usize,
    pub segment_count: usize,
    pub total_length: f64,
    /// Segments where normals and angles are NaN somewhere: zero-length
    /// segments and segments whose tangent vanishes at an end.
    pub degenerate_segments: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PiecewisePath {
    anchors: Vec<Anchor>,
    segments: Vec<CubicBezier>,
    /// `offsets[i]` is the path length before segment `i`.
    offsets: Vec<f64>,
    next_id: u64,
}

impl PiecewisePath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Self {
        let mut path = Self::new();
        for point in points {
            path.push_anchor(point, None);
        }
        path.rebuild();
        path
    }

    // ── mutation ────────────────────────────────────────────────────────────

    /// Inserts `point` before `index` (appends when `None` or past the end)
    /// and rebuilds every segment.
    pub fn add_point(&mut self, point: Point2, index: Option<usize>) -> AnchorId {
        let id = self.push_anchor(point, index);
        self.rebuild();
        id
    }

    /// Removes the anchor with `id`. Unknown ids leave the path untouched.
    pub fn delete_point(&mut self, id: AnchorId) -> Option<Point2> {
        let index = self.index_of(id)?;
        let removed = self.anchors.remove(index);
        self.rebuild();
        Some(removed.point)
    }

    /// Moves the anchor with `id` to `to`. Returns `false` for unknown ids.
    pub fn move_point(&mut self, id: AnchorId, to: Point2) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.anchors[index].point = to;
        self.rebuild();
        true
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
        self.rebuild();
    }

    fn push_anchor(&mut self, point: Point2, index: Option<usize>) -> AnchorId {
        let id = AnchorId(self.next_id);
        self.next_id += 1;
        let at = index.map_or(self.anchors.len(), |i| i.min(self.anchors.len()));
        self.anchors.insert(at, Anchor { id, point });
        id
    }

    fn rebuild(&mut self) {
        let points: Vec<Point2> = self.anchors.iter().map(|a| a.point).collect();
        self.segments = (0..points.len().saturating_sub(1))
            .map(|i| catmull_rom_segment(&points, i))
            .collect();

        self.offsets.clear();
        let mut acc = 0.0;
        for segment in &self.segments {
            self.offsets.push(acc);
            acc += segment.length();
        }

        let degenerate = self.degenerate_segments();
        if degenerate > 0 {
            log::warn!(
                "path rebuilt with {degenerate} degenerate segment(s); normals and angles there are undefined"
            );
        }
        log::debug!(
            "path rebuilt: {} anchors, {} segments, length {:.3}",
            self.anchors.len(),
            self.segments.len(),
            acc
        );
    }

    // ── accessors ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    #[must_use]
    pub fn anchor(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    /// Id the next inserted anchor will receive.
    #[must_use]
    pub const fn next_id(&self) -> AnchorId {
        AnchorId(self.next_id)
    }

    #[must_use]
    pub fn index_of(&self, id: AnchorId) -> Option<usize> {
        self.anchors.iter().position(|a| a.id == id)
    }

    #[must_use]
    pub fn segments(&self) -> &[CubicBezier] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> PathState {
        if self.segments.is_empty() {
            PathState::Empty
        } else {
            PathState::Active
        }
    }

    /// Sum of the sampled segment lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        match (self.offsets.last(), self.segments.last()) {
            (Some(offset), Some(segment)) => offset + segment.length(),
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn segment_offsets(&self) -> &[f64] {
        &self.offsets
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox2> {
        if self.segments.is_empty() {
            let points: Vec<Point2> = self.anchors.iter().map(|a| a.point).collect();
            return BBox2::from_points(&points);
        }
        self.segments
            .iter()
            .map(CubicBezier::sampled_bounding_box)
            .reduce(BBox2::union)
    }

    // ── queries ─────────────────────────────────────────────────────────────

    /// Closest point over all segments. On exact ties the lower segment
    /// index wins.
    #[must_use]
    pub fn closest(&self, query: Point2) -> Option<ClosestPoint> {
        let mut best: Option<ClosestPoint> = None;
        for (curve_index, segment) in self.segments.iter().enumerate() {
            let hit = segment.closest_point(query);
            if best.is_none_or(|b| hit.distance < b.mdist) {
                best = Some(ClosestPoint {
                    proj: hit.point,
                    mdist: hit.distance,
                    curve_index,
                });
            }
        }
        best
    }

    /// Geometry at `px` units along the whole path.
    ///
    /// The last segment starting at or before `px` owns the distance;
    /// distances beyond the end stay on the final segment.
    #[must_use]
    pub fn locate(&self, px: f64) -> Option<PathLocation> {
        if self.segments.is_empty() {
            return None;
        }
        let segment_index = self
            .offsets
            .partition_point(|&offset| offset <= px)
            .saturating_sub(1)
            .min(self.segments.len() - 1);
        let segment = &self.segments[segment_index];
        let param = segment.param_at_distance(px - self.offsets[segment_index]);
        let derivative = segment.derivative(param);
        let normal = normal_from_derivative(derivative);
        Some(PathLocation {
            segment_index,
            param,
            position: segment.position(param),
            derivative,
            normal,
            angle: angle_from_normal(normal),
        })
    }

    #[must_use]
    pub fn locate_fraction(&self, u: f64) -> Option<PathLocation> {
        self.locate(u * self.length())
    }

    /// Global distance of a local parameter on segment `segment_index`.
    #[must_use]
    pub fn distance_at(&self, segment_index: usize, param: f64) -> Option<f64> {
        let segment = self.segments.get(segment_index)?;
        Some(self.offsets[segment_index] + segment.length_at_param(param))
    }

    // ── output ──────────────────────────────────────────────────────────────

    /// Move to the first anchor, then one cubic per segment.
    #[must_use]
    pub fn commands(&self) -> Option<Vec<PathCommand>> {
        let first = self.segments.first()?;
        let mut commands = Vec::with_capacity(self.segments.len() + 1);
        commands.push(PathCommand::Move {
            points: [first.start()],
        });
        commands.extend(self.segments.iter().map(|segment| {
            let [_, b, c, d] = segment.points();
            PathCommand::Cubic { points: [b, c, d] }
        }));
        Some(commands)
    }

    /// SVG path data in the form `M x y C x y x y x y ...`.
    #[must_use]
    pub fn svg_path_data(&self) -> Option<String> {
        let commands = self.commands()?;
        let mut out = String::new();
        for command in commands {
            if !out.is_empty() {
                out.push(' ');
            }
            match command {
                PathCommand::Move { points: [p] } => {
                    let _ = write!(out, "M {} {}", p.x, p.y);
                }
                PathCommand::Cubic { points: [b, c, d] } => {
                    let _ = write!(out, "C {} {} {} {} {} {}", b.x, b.y, c.x, c.y, d.x, d.y);
                }
            }
        }
        Some(out)
    }

    #[must_use]
    pub fn diagnostics(&self) -> PathDiagnostics {
        PathDiagnostics {
            anchor_count: self.anchors.len(),
            segment_count: self.segments.len(),
            total_length: self.length(),
            degenerate_segments: self.degenerate_segments(),
        }
    }

    /// Segments that have zero length or a vanishing tangent at either end,
    /// as happens when two neighbouring anchors coincide.
    fn degenerate_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.is_degenerate() || s.has_stationary_end())
            .count()
    }
}

/// Bézier form of the Catmull-Rom span between `points[i]` and `points[i + 1]`.
fn catmull_rom_segment(points: &[Point2], i: usize) -> CubicBezier {
    let p1 = points[i];
    let p2 = points[i + 1];
    let p0 = if i == 0 { p1 } else { points[i - 1] };
    let p3 = points.get(i + 2).copied().unwrap_or(p2);

    let b = p1.add_vec(p2.sub_point(p0).div_scalar(6.0));
    let c = p2.sub_vec(p3.sub_point(p1).div_scalar(6.0));
    CubicBezier::new(p1, b, c, p2)
}

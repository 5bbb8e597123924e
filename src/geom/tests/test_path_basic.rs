use serde_json::json;

use crate::geom::{PathCommand, PathState, PiecewisePath, Point2, Tolerance};

fn line_path() -> PiecewisePath {
    PiecewisePath::from_points([Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)])
}

fn zigzag() -> PiecewisePath {
    PiecewisePath::from_points([
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 50.0),
        Point2::new(200.0, 0.0),
        Point2::new(300.0, 60.0),
    ])
}

#[test]
fn empty_path_answers_nothing() {
    let path = PiecewisePath::new();
    assert_eq!(path.state(), PathState::Empty);
    assert!(path.is_empty());
    assert!(path.closest(Point2::new(1.0, 1.0)).is_none());
    assert!(path.commands().is_none());
    assert!(path.svg_path_data().is_none());
    assert!(path.locate(0.0).is_none());
    assert!(path.bounding_box().is_none());
    assert_eq!(path.length(), 0.0);
}

#[test]
fn single_anchor_is_still_empty() {
    let mut path = PiecewisePath::new();
    path.add_point(Point2::new(3.0, 4.0), None);
    assert_eq!(path.state(), PathState::Empty);
    assert_eq!(path.len(), 1);
    assert!(path.segments().is_empty());
    assert!(path.closest(Point2::ORIGIN).is_none());
    let bbox = path.bounding_box().unwrap();
    assert_eq!(bbox.min, Point2::new(3.0, 4.0));
    assert_eq!(bbox.max, Point2::new(3.0, 4.0));
}

#[test]
fn segment_count_follows_anchor_count() {
    let mut path = PiecewisePath::new();
    for i in 0..6 {
        path.add_point(Point2::new(f64::from(i) * 10.0, 0.0), None);
        assert_eq!(path.segments().len(), path.len().saturating_sub(1));
    }
}

#[test]
fn segments_pass_through_anchors() {
    let path = zigzag();
    let anchors = path.anchors();
    for (i, segment) in path.segments().iter().enumerate() {
        assert_eq!(segment.start(), anchors[i].point);
        assert_eq!(segment.end(), anchors[i + 1].point);
        assert_eq!(segment.position(0.0), anchors[i].point);
    }
}

#[test]
fn two_anchor_path_is_straight() {
    let path = line_path();
    let [a, b, c, d] = path.segments()[0].points();
    assert_eq!(a, Point2::new(0.0, 0.0));
    assert_eq!(d, Point2::new(100.0, 0.0));
    assert_eq!(b.y, 0.0);
    assert_eq!(c.y, 0.0);
    assert!(Tolerance::LOOSE.approx_eq_f64(path.length(), 100.0));
}

#[test]
fn interior_handles_follow_neighbour_chord() {
    let path = zigzag();
    // Tangent at anchor 1 is parallel to anchor 2 - anchor 0.
    let [_, _, c0, _] = path.segments()[0].points();
    let [_, b1, _, _] = path.segments()[1].points();
    let tol = Tolerance::default_geom();
    assert!(tol.approx_eq_point2(b1, Point2::new(100.0 + 200.0 / 6.0, 50.0)));
    assert!(tol.approx_eq_point2(c0, Point2::new(100.0 - 200.0 / 6.0, 50.0)));
}

#[test]
fn add_point_inserts_at_index_and_clamps() {
    let mut path = line_path();
    let mid = path.add_point(Point2::new(50.0, 20.0), Some(1));
    let front = path.add_point(Point2::new(-50.0, 0.0), Some(0));
    let back = path.add_point(Point2::new(150.0, 0.0), Some(99));

    let xs: Vec<f64> = path.anchors().iter().map(|a| a.point.x).collect();
    assert_eq!(xs, vec![-50.0, 0.0, 50.0, 100.0, 150.0]);
    assert_eq!(path.index_of(front), Some(0));
    assert_eq!(path.index_of(mid), Some(2));
    assert_eq!(path.index_of(back), Some(4));
    assert_eq!(path.segments().len(), 4);
}

#[test]
fn anchor_ids_are_unique_after_deletes() {
    let mut path = line_path();
    let first = path.anchors()[0].id;
    path.delete_point(first);
    let fresh = path.add_point(Point2::new(1.0, 1.0), None);
    assert_ne!(fresh, first);
    assert!(path.anchor(first).is_none());
    assert_eq!(path.anchor(fresh).map(|a| a.point), Some(Point2::new(1.0, 1.0)));
}

#[test]
fn delete_point_removes_and_rebuilds() {
    let mut path = zigzag();
    let before = path.length();
    let id = path.anchors()[3].id;
    assert_eq!(path.delete_point(id), Some(Point2::new(300.0, 60.0)));
    assert_eq!(path.len(), 3);
    assert_eq!(path.segments().len(), 2);
    assert!(path.length() < before);
}

#[test]
fn deleting_unknown_anchor_is_a_no_op() {
    let mut path = zigzag();
    let id = path.anchors()[0].id;
    assert!(path.delete_point(id).is_some());
    let snapshot = path.svg_path_data();
    assert!(path.delete_point(id).is_none());
    assert_eq!(path.svg_path_data(), snapshot);
    assert!(!path.move_point(id, Point2::ORIGIN));
}

#[test]
fn move_point_rebuilds_segments() {
    let mut path = line_path();
    let end = path.anchors()[1].id;
    assert!(path.move_point(end, Point2::new(0.0, 40.0)));
    assert_eq!(path.segments()[0].end(), Point2::new(0.0, 40.0));
    assert!(Tolerance::LOOSE.approx_eq_f64(path.length(), 40.0));
}

#[test]
fn clear_empties_the_path() {
    let mut path = zigzag();
    path.clear();
    assert_eq!(path.state(), PathState::Empty);
    assert!(path.segment_offsets().is_empty());
}

#[test]
fn commands_describe_every_segment() {
    let path = zigzag();
    let commands = path.commands().unwrap();
    assert_eq!(commands.len(), 4);
    assert_eq!(
        commands[0],
        PathCommand::Move {
            points: [Point2::new(0.0, 0.0)]
        }
    );
    for (command, segment) in commands[1..].iter().zip(path.segments()) {
        let [_, b, c, d] = segment.points();
        assert_eq!(*command, PathCommand::Cubic { points: [b, c, d] });
    }
}

#[test]
fn commands_serialize_with_kind_tag() {
    let path = PiecewisePath::from_points([Point2::new(0.0, 0.0), Point2::new(60.0, 0.0)]);
    let value = serde_json::to_value(path.commands().unwrap()).unwrap();
    assert_eq!(
        value,
        json!([
            { "kind": "move", "points": [{ "x": 0.0, "y": 0.0 }] },
            {
                "kind": "cubic",
                "points": [
                    { "x": 10.0, "y": 0.0 },
                    { "x": 50.0, "y": 0.0 },
                    { "x": 60.0, "y": 0.0 }
                ]
            }
        ])
    );
}

#[test]
fn svg_path_data_format() {
    let path = PiecewisePath::from_points([Point2::new(0.0, 0.0), Point2::new(60.0, 0.0)]);
    assert_eq!(path.svg_path_data().as_deref(), Some("M 0 0 C 10 0 50 0 60 0"));

    let path = zigzag();
    let d = path.svg_path_data().unwrap();
    assert!(d.starts_with("M 0 0 C "));
    assert_eq!(d.matches('C').count(), 3);
}

#[test]
fn closest_on_line_path() {
    let path = line_path();
    let hit = path.closest(Point2::new(50.0, 5.0)).unwrap();
    assert_eq!(hit.curve_index, 0);
    assert!((hit.mdist - 5.0).abs() < 1e-6);
    assert!(hit.proj.y.abs() < 1e-9);
    assert!((hit.proj.x - 50.0).abs() < 1e-6);
}

#[test]
fn closest_picks_owning_segment() {
    let path = zigzag();
    let hit = path.closest(Point2::new(250.0, 40.0)).unwrap();
    assert_eq!(hit.curve_index, 2);
    let hit = path.closest(Point2::new(20.0, 20.0)).unwrap();
    assert_eq!(hit.curve_index, 0);
}

#[test]
fn closest_ties_go_to_first_segment() {
    let path = PiecewisePath::from_points([
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 0.0),
        Point2::new(200.0, 0.0),
    ]);
    let hit = path.closest(Point2::new(100.0, 10.0)).unwrap();
    assert_eq!(hit.curve_index, 0);
    assert!((hit.mdist - 10.0).abs() < 1e-9);
}

#[test]
fn locate_walks_the_whole_path() {
    let path = zigzag();
    let offsets = path.segment_offsets().to_vec();
    assert_eq!(offsets.len(), 3);
    assert_eq!(offsets[0], 0.0);

    let start = path.locate(0.0).unwrap();
    assert_eq!(start.segment_index, 0);
    assert_eq!(start.position, Point2::new(0.0, 0.0));

    let at_joint = path.locate(offsets[2]).unwrap();
    assert_eq!(at_joint.segment_index, 2);
    assert_eq!(at_joint.position, Point2::new(200.0, 0.0));

    let end = path.locate(path.length()).unwrap();
    assert_eq!(end.segment_index, 2);
    assert!(Tolerance::LOOSE.approx_eq_point2(end.position, Point2::new(300.0, 60.0)));
}

#[test]
fn locate_clamps_outside_the_path() {
    let path = zigzag();
    let before = path.locate(-25.0).unwrap();
    assert_eq!(before.segment_index, 0);
    assert_eq!(before.param, 0.0);
    let past = path.locate(path.length() + 25.0).unwrap();
    assert_eq!(past.segment_index, 2);
    assert_eq!(past.param, 1.0);
}

#[test]
fn locate_fraction_matches_distance() {
    let path = zigzag();
    let by_fraction = path.locate_fraction(0.25).unwrap();
    let by_distance = path.locate(path.length() * 0.25).unwrap();
    assert_eq!(by_fraction, by_distance);
}

#[test]
fn distance_at_inverts_locate() {
    let path = zigzag();
    let px = path.length() * 0.6;
    let loc = path.locate(px).unwrap();
    let back = path.distance_at(loc.segment_index, loc.param).unwrap();
    assert!((back - px).abs() < 1e-6);
    assert!(path.distance_at(99, 0.5).is_none());
}

#[test]
fn diagnostics_count_degenerate_segments() {
    let path = PiecewisePath::from_points([Point2::new(5.0, 5.0), Point2::new(5.0, 5.0)]);
    let diag = path.diagnostics();
    assert_eq!(diag.anchor_count, 2);
    assert_eq!(diag.segment_count, 1);
    assert_eq!(diag.degenerate_segments, 1);
    assert_eq!(diag.total_length, 0.0);

    assert_eq!(zigzag().diagnostics().degenerate_segments, 0);
}

#[test]
fn diagnostics_count_cusp_from_repeated_last_anchor() {
    let path = PiecewisePath::from_points([
        Point2::new(0.0, 0.0),
        Point2::new(100.0, 50.0),
        Point2::new(100.0, 50.0),
    ]);
    let diag = path.diagnostics();
    assert_eq!(diag.segment_count, 2);
    assert!(diag.total_length > 100.0);
    assert_eq!(diag.degenerate_segments, 1);

    let tail = &path.segments()[1];
    assert!(tail.has_stationary_end());
    assert!(!tail.normal(1.0).is_finite());
    assert!(tail.angle(1.0).is_nan());
    assert_eq!(path.locate(path.length()).unwrap().segment_index, 1);
}

#[test]
fn bounding_box_covers_samples() {
    let path = zigzag();
    let bbox = path.bounding_box().unwrap();
    for segment in path.segments() {
        for p in segment.sample_points() {
            assert!(bbox.contains_point(*p));
        }
    }
    assert_eq!(bbox.min.x, 0.0);
    assert_eq!(bbox.max.x, 300.0);
}

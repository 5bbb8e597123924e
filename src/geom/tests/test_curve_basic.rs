use std::f64::consts::{FRAC_PI_2, PI};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::{
    ARC_LENGTH_SAMPLES, ArcLengthTable, CubicBezier, Curve2, Line2, Point2, Tolerance, Vec2,
};

fn nearly_straight() -> CubicBezier {
    CubicBezier::new(
        Point2::new(0.0, 0.0),
        Point2::new(33.0, 0.0),
        Point2::new(66.0, 0.0),
        Point2::new(100.0, 0.0),
    )
}

fn arch() -> CubicBezier {
    CubicBezier::new(
        Point2::new(0.0, 100.0),
        Point2::new(30.0, 0.0),
        Point2::new(170.0, 0.0),
        Point2::new(200.0, 100.0),
    )
}

fn random_curve(rng: &mut StdRng) -> CubicBezier {
    let mut p = || Point2::new(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0));
    CubicBezier::new(p(), p(), p(), p())
}

#[test]
fn endpoints_are_interpolated() {
    let mut rng = StdRng::seed_from_u64(7);
    let tol = Tolerance::default_geom();
    for _ in 0..64 {
        let curve = random_curve(&mut rng);
        let [a, _, _, d] = curve.points();
        assert!(tol.approx_eq_point2(curve.position(0.0), a));
        assert!(tol.approx_eq_point2(curve.position(1.0), d));
    }
}

#[test]
fn position_extrapolates_outside_unit_interval() {
    let line = CubicBezier::new(
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(3.0, 0.0),
    );
    let tol = Tolerance::default_geom();
    assert!(tol.approx_eq_point2(line.position(-1.0), Point2::new(-3.0, 0.0)));
    assert!(tol.approx_eq_point2(line.position(2.0), Point2::new(6.0, 0.0)));
}

#[test]
fn derivative_matches_finite_difference() {
    let curve = arch();
    let h = 1e-6;
    for &t in &[0.1, 0.35, 0.5, 0.9] {
        let analytic = curve.derivative(t);
        let numeric = curve.position(t + h).sub_point(curve.position(t - h)).div_scalar(2.0 * h);
        assert!(Tolerance::new(1e-4).approx_eq_vec2(analytic, numeric), "t={t}");
    }
}

#[test]
fn straight_curve_has_flat_angle_and_expected_length() {
    let curve = nearly_straight();
    let tol = Tolerance::LOOSE;

    assert!((curve.position(0.5).x - 50.0).abs() < 0.5);
    assert!(tol.approx_eq_f64(curve.length(), 100.0));
    for i in 0..=20 {
        let t = f64::from(i) / 20.0;
        assert!(tol.approx_zero_f64(curve.angle(t)), "t={t}");
        assert!(tol.approx_eq_vec2(curve.normal(t), Vec2::new(0.0, -1.0)));
    }
}

#[test]
fn length_fraction_endpoints_are_exact() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..32 {
        let curve = random_curve(&mut rng);
        assert_eq!(curve.param_at_length_fraction(0.0), 0.0);
        assert_eq!(curve.param_at_length_fraction(1.0), 1.0);
        assert_eq!(curve.param_at_length_fraction(-0.5), 0.0);
        assert_eq!(curve.param_at_length_fraction(1.5), 1.0);
    }
}

#[test]
fn length_fraction_is_monotone() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..16 {
        let curve = random_curve(&mut rng);
        let mut prev_t = 0.0;
        let mut prev_len = 0.0;
        for i in 0..=200 {
            let u = f64::from(i) / 200.0;
            let t = curve.param_at_length_fraction(u);
            let len = curve.length_at_param(t);
            assert!(t >= prev_t, "u={u}: {t} < {prev_t}");
            assert!(len + 1e-9 >= prev_len, "u={u}: {len} < {prev_len}");
            prev_t = t;
            prev_len = len;
        }
    }
}

#[test]
fn length_fraction_round_trips_through_table() {
    let curve = arch();
    let total = curve.length();
    for i in 1..10 {
        let u = f64::from(i) / 10.0;
        let t = curve.param_at_length_fraction(u);
        assert!((curve.length_at_param(t) - u * total).abs() < 1e-6, "u={u}");
    }
}

#[test]
fn table_hits_return_sample_parameters() {
    let curve = arch();
    let lengths = curve.arc_length_table().lengths().to_vec();
    assert_eq!(lengths.len(), ARC_LENGTH_SAMPLES + 1);
    assert_eq!(lengths[0], 0.0);
    let total = curve.length();
    let t = curve.param_at_length_fraction(lengths[40] / total);
    assert!((t - 0.4).abs() < 1e-9);
}

#[test]
fn distance_endpoints_map_to_domain_ends() {
    let curve = arch();
    assert_eq!(curve.param_at_distance(0.0), 0.0);
    assert!((curve.param_at_distance(curve.length()) - 1.0).abs() < 1e-9);
    assert_eq!(curve.param_at_distance(curve.length() * 2.0), 1.0);
}

#[test]
fn set_rebuilds_table() {
    let mut curve = nearly_straight();
    let before = curve.length();
    curve.set(
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 300.0),
    );
    assert!((before - 100.0).abs() < 1e-6);
    assert!((curve.length() - 300.0).abs() < 1e-6);
    assert_eq!(curve.end(), Point2::new(0.0, 300.0));
}

#[test]
fn zero_length_curve_yields_non_finite_normal() {
    let p = Point2::new(5.0, 5.0);
    let curve = CubicBezier::new(p, p, p, p);
    assert!(curve.is_degenerate());
    assert_eq!(curve.length(), 0.0);
    for &t in &[0.0, 0.37, 0.5, 0.91, 1.0] {
        assert_eq!(curve.position(t), p, "t={t}");
    }
    assert!(!curve.normal(0.5).is_finite());
    assert!(curve.angle(0.5).is_nan());
    // Any positive distance overshoots a zero-length curve.
    assert_eq!(curve.param_at_distance(10.0), 1.0);
    assert_eq!(curve.param_at_length_fraction(0.5), 0.0);
}

#[test]
fn angle_is_a_pure_function() {
    let curve = arch();
    for &t in &[0.0, 0.25, 0.5, 0.75, 1.0] {
        let first = curve.angle(t);
        for _ in 0..10 {
            assert_eq!(curve.angle(t).to_bits(), first.to_bits());
        }
    }
}

#[test]
fn angle_follows_screen_orientation() {
    let rtl = CubicBezier::new(
        Point2::new(100.0, 0.0),
        Point2::new(66.0, 0.0),
        Point2::new(33.0, 0.0),
        Point2::new(0.0, 0.0),
    );
    assert!((rtl.angle(0.5) - PI).abs() < 1e-9);

    // Descending diagonal in a y-down frame rotates text clockwise.
    let down = CubicBezier::new(
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(20.0, 20.0),
        Point2::new(30.0, 30.0),
    );
    assert!((down.angle(0.5) - PI / 4.0).abs() < 1e-9);
    let n = down.normal(0.5);
    assert!(n.y < 0.0 && n.x > 0.0);

    let arch = arch();
    assert!(arch.angle(0.0) < 0.0 && arch.angle(0.0) > -FRAC_PI_2);
    assert!(arch.angle(1.0) > 0.0 && arch.angle(1.0) < FRAC_PI_2);
}

#[test]
fn fraction_and_distance_queries_agree() {
    let curve = arch();
    let half = curve.length() / 2.0;
    assert_eq!(curve.position_at_fraction(0.5), curve.position_at_distance(half));
    assert_eq!(curve.derivative_at_fraction(0.5), curve.derivative_at_distance(half));
    assert_eq!(curve.normal_at_fraction(0.5), curve.normal_at_distance(half));
    assert_eq!(curve.angle_at_fraction(0.5).to_bits(), curve.angle_at_distance(half).to_bits());
    // The arch is symmetric, so its arc-length midpoint is at the apex.
    assert!((curve.position_at_fraction(0.5).x - 100.0).abs() < 1e-6);
    assert!(curve.angle_at_fraction(0.5).abs() < 1e-6);
}

#[test]
fn closest_point_projects_onto_samples() {
    let curve = nearly_straight();
    let hit = curve.closest_point(Point2::new(40.0, -7.0));
    assert!((hit.distance - 7.0).abs() < 1e-9);
    assert!((hit.point.x - 40.0).abs() < 1e-9);
    assert!(hit.point.y.abs() < 1e-12);
    assert!(Tolerance::new(1e-3).approx_eq_point2(curve.position(hit.parameter), hit.point));
}

#[test]
fn bounding_boxes_contain_samples() {
    let curve = arch();
    let hull = curve.bounding_box();
    let sampled = curve.sampled_bounding_box();
    assert!(hull.contains_point(sampled.min) && hull.contains_point(sampled.max));
    assert!(curve.sample_points().iter().all(|p| sampled.contains_point(*p)));
    assert_eq!(sampled.max.y, 100.0);
    assert!((sampled.min.y - 25.0).abs() < 1e-9);
}

#[test]
fn generic_table_works_for_any_curve() {
    let line = Line2::new(Point2::new(0.0, 0.0), Point2::new(30.0, 40.0));
    let table = ArcLengthTable::build(&line, 10);
    assert_eq!(table.samples(), 10);
    assert!((table.total_length() - 50.0).abs() < 1e-9);
    assert!((table.param_at_length_fraction(0.3) - 0.3).abs() < 1e-9);
    assert!((table.length_at_param(0.5) - 25.0).abs() < 1e-9);
    assert!(line.tangent_at(0.2).is_some());
    assert!((line.angle_at(0.5) - (4.0f64 / 3.0).atan()).abs() < 1e-12);
}

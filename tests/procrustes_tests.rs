use point_alignment::config::SolverConfig;
use point_alignment::{
    align, wrap_angle, AlignError, Point2, PointSetAligner, ProcrustesAligner,
};
use std::f64::consts::PI;

fn rigidly_moved(points: &[Point2], theta: f64, tx: f64, ty: f64) -> Vec<Point2> {
    let (s, c) = theta.sin_cos();
    points
        .iter()
        .map(|p| Point2::new(c * p.x - s * p.y + tx, s * p.x + c * p.y + ty))
        .collect()
}

fn scatter() -> Vec<Point2> {
    vec![
        Point2::new(0.0, 0.0),
        Point2::new(3.0, 0.5),
        Point2::new(-1.0, 2.0),
        Point2::new(2.0, -2.5),
        Point2::new(0.5, 4.0),
    ]
}

#[test]
fn test_identity_recovery() {
    let source = scatter();
    let result = ProcrustesAligner.align(&source, &source).unwrap();

    assert!(result.converged);
    assert_eq!(result.iterations, 1);
    assert!(result.rotation.abs() < 1e-12);
    assert!(result.translation.0.abs() < 1e-12);
    assert!(result.translation.1.abs() < 1e-12);
    assert!(result.residual < 1e-18);
}

#[test]
fn test_agrees_with_gradient_descent() {
    let source = scatter();
    let target = rigidly_moved(&source, 1.9, -4.0, 1.5);

    let closed_form = ProcrustesAligner.align(&source, &target).unwrap();
    let iterative = align(&source, &target, &SolverConfig::default()).unwrap();

    assert!(wrap_angle(closed_form.rotation - iterative.rotation).abs() < 1e-4);
    assert!((closed_form.translation.0 - iterative.translation.0).abs() < 1e-3);
    assert!((closed_form.translation.1 - iterative.translation.1).abs() < 1e-3);
}

#[test]
fn test_quarter_turn_scenario() {
    let source = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
    let target = vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)];

    let result = ProcrustesAligner.align(&source, &target).unwrap();
    assert!(wrap_angle(result.rotation - PI / 2.0).abs() < 1e-9);
    assert!(result.residual < 1e-18);
}

#[test]
fn test_validation_matches_iterative_solver() {
    let coincident = vec![Point2::new(1.0, 1.0); 4];
    let target = scatter()[..4].to_vec();
    let err = ProcrustesAligner.align(&coincident, &target).unwrap_err();
    assert_eq!(err, AlignError::DegenerateConfiguration);

    let single = vec![Point2::new(0.0, 0.0)];
    let err = ProcrustesAligner
        .align(&single, &[Point2::new(1.0, 0.0)])
        .unwrap_err();
    assert_eq!(err, AlignError::InsufficientCorrespondences(1));
}

#[test]
fn test_transform_usable_as_svg_attribute() {
    let source = scatter();
    let target = rigidly_moved(&source, 0.25, 1.0, 2.0);

    let result = ProcrustesAligner.align(&source, &target).unwrap();
    let svg = result.transform.svg_matrix();
    assert!(svg.starts_with("matrix("));
    assert!(svg.ends_with(')'));
    assert_eq!(svg.split_whitespace().count(), 6);
}

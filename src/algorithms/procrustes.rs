use instant::Instant;
use nalgebra::Matrix2;

use crate::algorithms::PointSetAligner;
use crate::error::AlignError;
use crate::geometry::{wrap_angle, AffineTransform, CorrespondenceSet, Point2};
use crate::AlignmentResult;

/// Closed-form rigid alignment via SVD of the cross-covariance matrix
/// (Kabsch). Solves the same problem as the gradient-descent aligner in one
/// step; useful as a fast path and as a cross-check for the iterative
/// solver. Shares the same input validation.
pub struct ProcrustesAligner;

impl PointSetAligner for ProcrustesAligner {
    fn align(&self, source: &[Point2], target: &[Point2]) -> Result<AlignmentResult, AlignError> {
        let start = Instant::now();

        let set = CorrespondenceSet::new(source, target)?;
        let (rotation, theta) = optimal_rotation(&set);
        let translation = set.target_centroid() - rotation * set.source_centroid();

        let residual: f64 = set
            .pairs()
            .map(|(p, q)| (rotation * p + translation - q).norm_squared())
            .sum();

        let transform = AffineTransform::rotation(theta).translate(translation.x, translation.y);

        Ok(AlignmentResult {
            transform,
            rotation: theta,
            translation: (translation.x, translation.y),
            residual,
            iterations: 1,
            converged: true,
            processing_time_ms: start.elapsed().as_secs_f32() * 1000.0,
            algorithm_used: "Procrustes".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "Procrustes"
    }
}

/// Optimal rotation from the SVD of the 2x2 cross-covariance of the
/// centered point sets, with the reflection case forced back to a proper
/// rotation.
fn optimal_rotation(set: &CorrespondenceSet) -> (Matrix2<f64>, f64) {
    let source_centroid = set.source_centroid();
    let target_centroid = set.target_centroid();

    let mut covariance = Matrix2::zeros();
    for (p, q) in set.pairs() {
        let u = p - source_centroid;
        let v = q - target_centroid;
        covariance += u * v.transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u.expect("SVD was computed with compute_u");
    let v_t = svd.v_t.expect("SVD was computed with compute_v");

    let mut rotation = v_t.transpose() * u.transpose();
    if rotation.determinant() < 0.0 {
        let mut v_t_fixed = v_t;
        v_t_fixed[(1, 0)] = -v_t_fixed[(1, 0)];
        v_t_fixed[(1, 1)] = -v_t_fixed[(1, 1)];
        rotation = v_t_fixed.transpose() * u.transpose();
    }

    let theta = wrap_angle(rotation[(1, 0)].atan2(rotation[(0, 0)]));
    (rotation, theta)
}

use nalgebra::{Matrix2, Vector2};

use crate::geometry::CorrespondenceSet;

/// Residual objective for the 2D rigid alignment problem, profiled over
/// translation.
///
/// For a candidate rotation angle the least-squares-optimal translation has
/// the closed form `t*(θ) = centroid(target) - R(θ) * centroid(source)`,
/// which removes translation as a free variable and leaves a 1-parameter
/// search over θ. By the envelope theorem the derivative of the profiled
/// objective equals the partial derivative with θ's rotation matrix alone,
/// holding t fixed at t*(θ), so the gradient is exact with no finite
/// differences.
pub struct Objective<'a> {
    set: &'a CorrespondenceSet,
}

impl<'a> Objective<'a> {
    pub fn new(set: &'a CorrespondenceSet) -> Self {
        Self { set }
    }

    /// Rotation matrix R(θ).
    fn rotation_matrix(theta: f64) -> Matrix2<f64> {
        let (s, c) = theta.sin_cos();
        Matrix2::new(c, -s, s, c)
    }

    /// Derivative dR/dθ.
    fn rotation_derivative(theta: f64) -> Matrix2<f64> {
        let (s, c) = theta.sin_cos();
        Matrix2::new(-s, -c, c, -s)
    }

    /// The closed-form optimal translation for the given angle.
    pub fn optimal_translation(&self, theta: f64) -> Vector2<f64> {
        self.set.target_centroid() - Self::rotation_matrix(theta) * self.set.source_centroid()
    }

    /// Residual sum of squares L(θ) and its analytic derivative dL/dθ,
    /// both evaluated at the optimal translation for θ.
    pub fn evaluate(&self, theta: f64) -> (f64, f64) {
        let rotation = Self::rotation_matrix(theta);
        let derivative = Self::rotation_derivative(theta);
        let translation = self.optimal_translation(theta);

        let mut value = 0.0;
        let mut gradient = 0.0;
        for (p, q) in self.set.pairs() {
            let residual = rotation * p + translation - q;
            value += residual.norm_squared();
            gradient += 2.0 * residual.dot(&(derivative * p));
        }
        (value, gradient)
    }

    /// Residual sum of squares only.
    pub fn value(&self, theta: f64) -> f64 {
        self.evaluate(theta).0
    }
}

pub mod algorithms;
pub mod config;
pub mod error;
pub mod geometry;

pub use algorithms::*;
pub use error::AlignError;
pub use geometry::*;

/// Outcome of a single alignment solve.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AlignmentResult {
    /// Solved rigid transform, translation composed after rotation.
    pub transform: AffineTransform,
    /// Rotation angle in radians, wrapped into [-pi, pi).
    pub rotation: f64,
    pub translation: (f64, f64),
    /// Sum of squared residuals at the solution.
    pub residual: f64,
    /// Optimizer iterations consumed (1 for the closed-form solver).
    pub iterations: usize,
    /// False when the iteration cap was reached before the gradient
    /// tolerance was met; the transform is still the best one seen.
    pub converged: bool,
    pub processing_time_ms: f32,
    pub algorithm_used: String,
}

impl AlignmentResult {
    pub fn new(algorithm: &str) -> Self {
        Self {
            transform: AffineTransform::identity(),
            rotation: 0.0,
            translation: (0.0, 0.0),
            residual: 0.0,
            iterations: 0,
            converged: false,
            processing_time_ms: 0.0,
            algorithm_used: algorithm.to_string(),
        }
    }
}

pub type Result<T> = anyhow::Result<T>;

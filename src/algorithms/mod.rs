pub mod gradient_descent;
pub mod objective;
pub mod procrustes;

pub use gradient_descent::*;
pub use objective::*;
pub use procrustes::*;

use crate::error::AlignError;
use crate::geometry::Point2;
use crate::AlignmentResult;

/// Common interface for the point-set alignment solvers.
///
/// `source[i]` is assumed to correspond to `target[i]`; both solvers reject
/// invalid input before doing any work.
pub trait PointSetAligner {
    fn align(&self, source: &[Point2], target: &[Point2]) -> Result<AlignmentResult, AlignError>;

    fn name(&self) -> &'static str;
}

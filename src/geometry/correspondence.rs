use nalgebra::Vector2;

use crate::error::AlignError;
use crate::geometry::Point2;

/// Squared spread below which a source set is treated as coincident.
/// With zero spread any rotation produces the same transformed points, so
/// the gradient is identically zero and descent is uninformative.
const MIN_SPREAD_SQUARED: f64 = 1e-18;

/// Validated, index-paired source and target point sets.
///
/// Element i of the source corresponds to element i of the target; the
/// pairing is load-bearing, the order of the pairs is not. Construction
/// rejects mismatched lengths, fewer than 2 pairs, and coincident source
/// points. Immutable once built.
#[derive(Debug, Clone)]
pub struct CorrespondenceSet {
    source: Vec<Point2>,
    target: Vec<Point2>,
    source_centroid: Vector2<f64>,
    target_centroid: Vector2<f64>,
}

impl CorrespondenceSet {
    pub fn new(source: &[Point2], target: &[Point2]) -> Result<Self, AlignError> {
        if source.len() != target.len() {
            return Err(AlignError::MismatchedLengths {
                source_len: source.len(),
                target_len: target.len(),
            });
        }
        if source.len() < 2 {
            return Err(AlignError::InsufficientCorrespondences(source.len()));
        }

        let source_centroid = centroid(source);
        let target_centroid = centroid(target);

        let spread = source
            .iter()
            .map(|p| (p - source_centroid).norm_squared())
            .fold(0.0, f64::max);
        if spread < MIN_SPREAD_SQUARED {
            return Err(AlignError::DegenerateConfiguration);
        }

        Ok(Self {
            source: source.to_vec(),
            target: target.to_vec(),
            source_centroid,
            target_centroid,
        })
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Iterate over (source, target) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&Point2, &Point2)> {
        self.source.iter().zip(self.target.iter())
    }

    pub fn source_centroid(&self) -> Vector2<f64> {
        self.source_centroid
    }

    pub fn target_centroid(&self) -> Vector2<f64> {
        self.target_centroid
    }
}

/// Arithmetic mean position of a point set.
fn centroid(points: &[Point2]) -> Vector2<f64> {
    let mut sum = Vector2::zeros();
    for p in points {
        sum += p;
    }
    sum / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_lengths_rejected() {
        let source = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let target = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let err = CorrespondenceSet::new(&source, &target).unwrap_err();
        assert_eq!(
            err,
            AlignError::MismatchedLengths {
                source_len: 3,
                target_len: 2
            }
        );
    }

    #[test]
    fn test_single_pair_rejected() {
        let source = vec![Point2::new(1.0, 1.0)];
        let target = vec![Point2::new(2.0, 2.0)];
        let err = CorrespondenceSet::new(&source, &target).unwrap_err();
        assert_eq!(err, AlignError::InsufficientCorrespondences(1));
    }

    #[test]
    fn test_coincident_source_rejected() {
        let source = vec![
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 2.0),
        ];
        let target = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let err = CorrespondenceSet::new(&source, &target).unwrap_err();
        assert_eq!(err, AlignError::DegenerateConfiguration);
    }

    #[test]
    fn test_centroids() {
        let source = vec![Point2::new(0.0, 0.0), Point2::new(2.0, 4.0)];
        let target = vec![Point2::new(1.0, 1.0), Point2::new(3.0, 1.0)];
        let set = CorrespondenceSet::new(&source, &target).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.source_centroid(), Vector2::new(1.0, 2.0));
        assert_eq!(set.target_centroid(), Vector2::new(2.0, 1.0));
    }
}

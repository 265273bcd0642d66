use thiserror::Error;

/// Errors from alignment input validation and the optimization loop.
///
/// Reaching the iteration cap is deliberately not an error; it is reported
/// through `AlignmentResult::converged` so the caller can decide whether the
/// best-effort answer is acceptable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    #[error("source and target point counts differ: {source_len} vs {target_len}")]
    MismatchedLengths {
        source_len: usize,
        target_len: usize,
    },

    #[error("at least 2 correspondences are required, got {0}")]
    InsufficientCorrespondences(usize),

    #[error("source points are coincident; rotation is unobservable")]
    DegenerateConfiguration,

    #[error("objective became non-finite during descent from seed angle {seed_angle}")]
    NumericDivergence { seed_angle: f64 },
}

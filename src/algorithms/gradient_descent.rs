use instant::Instant;
use rayon::prelude::*;
use std::f64::consts::TAU;

use crate::algorithms::{Objective, PointSetAligner};
use crate::config::SolverConfig;
use crate::error::AlignError;
use crate::geometry::{wrap_angle, AffineTransform, CorrespondenceSet, Point2};
use crate::AlignmentResult;

/// Halvings of the learning rate attempted before a step is abandoned.
const MAX_BACKTRACKS: usize = 10;

/// Multi-start gradient-descent solver for the 2D rigid alignment problem.
///
/// The objective is periodic in the rotation angle and can have more than
/// one local minimum for near-symmetric point sets, so a single descent is
/// not guaranteed to find the global optimum. The solver descends from
/// several seed angles and keeps the run with the lowest final residual.
pub struct GradientDescentAligner {
    config: SolverConfig,
}

impl GradientDescentAligner {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Default for GradientDescentAligner {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl PointSetAligner for GradientDescentAligner {
    fn align(&self, source: &[Point2], target: &[Point2]) -> Result<AlignmentResult, AlignError> {
        align(source, target, &self.config)
    }

    fn name(&self) -> &'static str {
        "GradientDescent"
    }
}

/// Outcome of one descent run.
#[derive(Debug, Clone)]
pub(crate) struct DescentOutcome {
    pub theta: f64,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Objective value after each accepted step, starting at the seed.
    pub trace: Vec<f64>,
}

/// Align `source` onto `target`, estimating the rotation and translation
/// that minimize the sum of squared residuals.
///
/// Validation failures are reported before any iteration runs. A seed whose
/// descent diverges numerically is dropped; the error is surfaced only when
/// every seed diverges.
pub fn align(
    source: &[Point2],
    target: &[Point2],
    config: &SolverConfig,
) -> Result<AlignmentResult, AlignError> {
    let start = Instant::now();

    let set = CorrespondenceSet::new(source, target)?;
    let objective = Objective::new(&set);
    let seeds = seed_angles(config);

    let outcomes: Vec<Result<DescentOutcome, AlignError>> = seeds
        .par_iter()
        .map(|&seed| descend(&objective, seed, config))
        .collect();

    let mut best: Option<DescentOutcome> = None;
    let mut first_divergence = None;
    for outcome in outcomes {
        match outcome {
            Ok(run) => {
                log::debug!(
                    "seed run finished: theta={:.6} residual={:.6e} iterations={} accepted_steps={} converged={}",
                    run.theta,
                    run.residual,
                    run.iterations,
                    run.trace.len().saturating_sub(1),
                    run.converged
                );
                if best
                    .as_ref()
                    .map(|b| run.residual < b.residual)
                    .unwrap_or(true)
                {
                    best = Some(run);
                }
            }
            Err(err) => {
                log::warn!("seed dropped: {}", err);
                if first_divergence.is_none() {
                    first_divergence = Some(err);
                }
            }
        }
    }

    let best = match best {
        Some(run) => run,
        // seeds is never empty, so a missing best means every seed diverged
        None => {
            return Err(first_divergence.unwrap_or(AlignError::NumericDivergence {
                seed_angle: f64::NAN,
            }))
        }
    };

    let theta = best.theta;
    let translation = objective.optimal_translation(theta);
    let transform = AffineTransform::rotation(theta).translate(translation.x, translation.y);

    Ok(AlignmentResult {
        transform,
        rotation: theta,
        translation: (translation.x, translation.y),
        residual: best.residual,
        iterations: best.iterations,
        converged: best.converged,
        processing_time_ms: start.elapsed().as_secs_f32() * 1000.0,
        algorithm_used: "GradientDescent".to_string(),
    })
}

/// Seed angles for the multi-start sweep: either the configured list or
/// `seed_count` angles evenly spaced across [0, 2pi).
fn seed_angles(config: &SolverConfig) -> Vec<f64> {
    if let Some(angles) = config.initial_angles.as_ref().filter(|a| !a.is_empty()) {
        return angles.iter().map(|&a| wrap_angle(a)).collect();
    }
    let count = config.seed_count.max(1);
    (0..count)
        .map(|i| wrap_angle(i as f64 * TAU / count as f64))
        .collect()
}

/// Gradient descent over the rotation angle from a single seed.
///
/// Steps are `theta - rate * dL/dtheta`, wrapped into [-pi, pi). A step that
/// would increase the objective is retried with a halved rate, and after
/// every accepted step the rate decays by `rate_decay`, so accepted values
/// are non-increasing. A non-finite objective aborts the run.
pub(crate) fn descend(
    objective: &Objective,
    seed: f64,
    config: &SolverConfig,
) -> Result<DescentOutcome, AlignError> {
    let mut theta = wrap_angle(seed);
    let (mut value, mut gradient) = objective.evaluate(theta);
    if !value.is_finite() || !gradient.is_finite() {
        return Err(AlignError::NumericDivergence { seed_angle: seed });
    }

    let mut rate = config.learning_rate;
    let mut best_theta = theta;
    let mut best_value = value;
    let mut trace = vec![value];
    let mut converged = false;
    let mut iterations = 0;

    for iteration in 0..config.max_iterations {
        if gradient.abs() < config.gradient_tolerance {
            converged = true;
            break;
        }
        iterations = iteration + 1;

        let mut accepted = None;
        for _ in 0..=MAX_BACKTRACKS {
            let candidate = wrap_angle(theta - rate * gradient);
            let (candidate_value, candidate_gradient) = objective.evaluate(candidate);
            if !candidate_value.is_finite() || !candidate_gradient.is_finite() {
                return Err(AlignError::NumericDivergence { seed_angle: seed });
            }
            if candidate_value <= value {
                accepted = Some((candidate, candidate_value, candidate_gradient));
                break;
            }
            rate /= 2.0;
        }

        let Some((next_theta, next_value, next_gradient)) = accepted else {
            // No decreasing step at any tried rate; we are at the numeric
            // floor of this basin.
            break;
        };

        theta = next_theta;
        value = next_value;
        gradient = next_gradient;
        trace.push(value);
        if value < best_value {
            best_value = value;
            best_theta = theta;
        }
        rate *= config.rate_decay;

        log::trace!(
            "iter {}: theta={:.6} value={:.6e} gradient={:.3e} rate={:.3e}",
            iteration,
            theta,
            value,
            gradient,
            rate
        );
    }

    // The gradient may only drop under tolerance on the final iterate
    if !converged && gradient.abs() < config.gradient_tolerance {
        converged = true;
    }

    Ok(DescentOutcome {
        theta: best_theta,
        residual: best_value,
        iterations,
        converged,
        trace,
    })
}

//! Derivative-free compass (coordinate pattern) search
//!
//! Polls ±step along each free unit-box axis and takes the first strict
//! improvement. A full poll with no improvement halves the step. Tolerant of
//! the jump in the salinity penalty, which trips up finite differences.

use tracing::trace;

use crate::config::defaults::SOLVER_INITIAL_STEP;
use crate::types::{ConvergenceReason, FailureReason, OptimizationStatus, SearchVector};

use super::solver::{
    outcome, BoundedSolver, Counted, Objective, SolverOutcome, SolverSettings, UnitBox,
};

/// Pattern-search bounded minimizer
#[derive(Debug, Clone, Copy, Default)]
pub struct CompassSearch {
    settings: SolverSettings,
}

impl CompassSearch {
    pub const fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }
}

impl BoundedSolver for CompassSearch {
    fn name(&self) -> &'static str {
        "compass_search"
    }

    fn minimize(
        &self,
        objective: Objective<'_>,
        start: &SearchVector,
        lower: &SearchVector,
        upper: &SearchVector,
        max_iterations: usize,
    ) -> SolverOutcome {
        let unit = UnitBox::new(lower, upper);
        let mut f = Counted::new(objective);
        let mut x = *start;
        let mut fx = f.eval(&x);

        if !fx.is_finite() {
            let status = OptimizationStatus::Failed(FailureReason::NonFiniteObjective);
            return outcome(x, fx, status, 0, &f);
        }
        if unit.free().is_empty() {
            let status = OptimizationStatus::Converged(ConvergenceReason::NoFreeParameters);
            return outcome(x, fx, status, 0, &f);
        }

        let mut step = SOLVER_INITIAL_STEP;

        for iteration in 1..=max_iterations {
            let u = unit.to_unit(&x);
            let mut improved = None;

            'poll: for &i in unit.free() {
                for sign in [1.0, -1.0] {
                    let t = (u[i] + sign * step).clamp(0.0, 1.0);
                    if (t - u[i]).abs() < self.settings.x_tol {
                        continue;
                    }
                    let xt = unit.with_coordinate(&x, i, t);
                    let ft = f.eval(&xt);
                    if ft.is_finite() && ft < fx {
                        improved = Some((xt, ft));
                        break 'poll;
                    }
                }
            }

            match improved {
                Some((xt, ft)) => {
                    let decrease = fx - ft;
                    x = xt;
                    fx = ft;
                    // Small gains at a small step mean the pattern has collapsed
                    if decrease <= self.settings.f_tol * (1.0 + fx.abs())
                        && step <= self.settings.x_tol.sqrt()
                    {
                        let status =
                            OptimizationStatus::Converged(ConvergenceReason::ObjectiveTolerance);
                        return outcome(x, fx, status, iteration, &f);
                    }
                }
                None => {
                    step *= 0.5;
                    trace!(iteration, objective = fx, step, "Poll failed, step halved");
                    if step < self.settings.x_tol {
                        let status = OptimizationStatus::Converged(ConvergenceReason::StepTolerance);
                        return outcome(x, fx, status, iteration, &f);
                    }
                }
            }
        }

        let status = OptimizationStatus::Failed(FailureReason::IterationBudget);
        outcome(x, fx, status, max_iterations, &f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DIM;
    use std::cell::RefCell;

    const LOWER: SearchVector = [0.5, 0.9, 2.0, 1.0, 0.7];
    const UPPER: SearchVector = [0.8, 0.98, 7.0, 10.0, 0.9];

    fn bowl(center: SearchVector) -> impl Fn(&SearchVector) -> f64 {
        move |x: &SearchVector| {
            x.iter()
                .zip(center.iter())
                .zip(LOWER.iter().zip(UPPER.iter()))
                .map(|((xi, ci), (lo, hi))| ((xi - ci) / (hi - lo)).powi(2))
                .sum()
        }
    }

    #[test]
    fn finds_interior_minimum_of_bowl() {
        let center = [0.7, 0.95, 3.0, 6.0, 0.8];
        let objective = bowl(center);
        let out = CompassSearch::default().minimize(
            &objective,
            &[0.5, 0.9, 7.0, 1.0, 0.9],
            &LOWER,
            &UPPER,
            2000,
        );
        assert!(out.status.is_converged(), "status: {:?}", out.status);
        for i in 0..DIM {
            assert!((out.x[i] - center[i]).abs() / (UPPER[i] - LOWER[i]) < 1e-3, "dim {i}: {:?}", out.x);
        }
    }

    #[test]
    fn handles_step_discontinuity() {
        // Flat plateau with a cliff, gradient is zero almost everywhere
        let objective = |x: &SearchVector| if x[2] < 4.0 { 1.0 } else { 10.0 };
        let out = CompassSearch::default().minimize(
            &objective,
            &[0.6, 0.95, 4.2, 5.0, 0.8],
            &LOWER,
            &UPPER,
            500,
        );
        assert!(out.x[2] < 4.0);
        assert!((out.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn never_worsens_the_start() {
        let objective = bowl([0.65, 0.93, 4.0, 2.0, 0.75]);
        let start = [0.6, 0.95, 5.0, 5.0, 0.8];
        let f0 = objective(&start);
        for budget in [0, 1, 5, 50] {
            let out = CompassSearch::default().minimize(&objective, &start, &LOWER, &UPPER, budget);
            assert!(out.value <= f0);
            assert!((objective(&out.x) - out.value).abs() < 1e-15);
        }
    }

    #[test]
    fn keeps_pinned_dimensions() {
        let mut lower = LOWER;
        let mut upper = UPPER;
        lower[1] = 0.95;
        upper[1] = 0.95;
        let objective = bowl([0.0; DIM]);
        let out = CompassSearch::default().minimize(
            &objective,
            &[0.6, 0.95, 5.0, 5.0, 0.8],
            &lower,
            &upper,
            1000,
        );
        assert_eq!(out.x[1], 0.95);
        assert!((out.x[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn never_evaluates_outside_bounds() {
        let seen = RefCell::new(Vec::new());
        // Minimum sits outside the box on every axis
        let inner = bowl([0.0, 1.5, 9.0, -4.0, 0.95]);
        let objective = |x: &SearchVector| {
            seen.borrow_mut().push(*x);
            inner(x)
        };
        let _ = CompassSearch::default().minimize(
            &objective,
            &[0.6, 0.95, 5.0, 5.0, 0.8],
            &LOWER,
            &UPPER,
            300,
        );
        let seen = seen.borrow();
        assert!(seen.len() > 1);
        for x in seen.iter() {
            for i in 0..DIM {
                assert!(x[i] >= LOWER[i] && x[i] <= UPPER[i], "out of bounds: {x:?}");
            }
        }
    }
}

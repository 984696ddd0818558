//! Bounded local minimizer interface
//!
//! Solvers see only a scalar objective over a `SearchVector` and a box. They
//! never evaluate outside the box: every candidate is built through
//! `UnitBox::from_unit`, which projects onto the bounds.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{SOLVER_FD_STEP, SOLVER_F_TOL, SOLVER_G_TOL, SOLVER_X_TOL};
use crate::types::{OptimizationStatus, SearchVector, DIM};

/// Objective as seen by a solver.
pub type Objective<'a> = &'a dyn Fn(&SearchVector) -> f64;

/// Termination tolerances shared by all solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Relative objective change that counts as converged
    pub f_tol: f64,
    /// Step length (unit-box coordinates) that counts as converged
    pub x_tol: f64,
    /// Projected-gradient magnitude that counts as stationary
    pub g_tol: f64,
    /// Finite-difference step (unit-box coordinates)
    pub fd_step: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            f_tol: SOLVER_F_TOL,
            x_tol: SOLVER_X_TOL,
            g_tol: SOLVER_G_TOL,
            fd_step: SOLVER_FD_STEP,
        }
    }
}

impl SolverSettings {
    /// Human-readable problems with these settings; empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, value) in [("f_tol", self.f_tol), ("x_tol", self.x_tol), ("g_tol", self.g_tol)] {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("solver.{name} = {value} must be finite and non-negative"));
            }
        }
        if !self.fd_step.is_finite() || self.fd_step <= 0.0 || self.fd_step >= 0.5 {
            problems.push(format!("solver.fd_step = {} must lie in (0, 0.5)", self.fd_step));
        }
        problems
    }
}

/// Which concrete solver to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    #[default]
    ProjectedGradient,
    CompassSearch,
}

impl std::str::FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "projected_gradient" | "gradient" => Ok(Self::ProjectedGradient),
            "compass_search" | "compass" | "pattern" => Ok(Self::CompassSearch),
            other => Err(format!(
                "unknown solver '{other}' (expected projected_gradient or compass_search)"
            )),
        }
    }
}

/// What a solver hands back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOutcome {
    /// Best point found, always inside the box
    pub x: SearchVector,
    /// Objective at `x`
    pub value: f64,
    pub status: OptimizationStatus,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Bounded local minimization
///
/// Implementations start from `start` (already inside `[lower, upper]`),
/// accept only strict improvements, and return the best point seen even
/// when they run out of iterations.
pub trait BoundedSolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn minimize(
        &self,
        objective: Objective<'_>,
        start: &SearchVector,
        lower: &SearchVector,
        upper: &SearchVector,
        max_iterations: usize,
    ) -> SolverOutcome;
}

// ============================================================================
// Unit-box coordinates
// ============================================================================

/// Affine map between the search box and `[0, 1]` per free dimension
///
/// Zero-width dimensions are pinned: they map to 0 and back to their bound.
#[derive(Debug, Clone)]
pub(crate) struct UnitBox {
    lower: SearchVector,
    upper: SearchVector,
    width: SearchVector,
    free: Vec<usize>,
}

impl UnitBox {
    pub(crate) fn new(lower: &SearchVector, upper: &SearchVector) -> Self {
        let mut width = [0.0; DIM];
        let mut free = Vec::with_capacity(DIM);
        for i in 0..DIM {
            width[i] = (upper[i] - lower[i]).max(0.0);
            if width[i] > 0.0 {
                free.push(i);
            }
        }
        Self { lower: *lower, upper: *upper, width, free }
    }

    /// Indices of the dimensions a solver may move.
    pub(crate) fn free(&self) -> &[usize] {
        &self.free
    }

    pub(crate) fn to_unit(&self, x: &SearchVector) -> SearchVector {
        let mut u = [0.0; DIM];
        for &i in &self.free {
            u[i] = ((x[i] - self.lower[i]) / self.width[i]).clamp(0.0, 1.0);
        }
        u
    }

    /// Map back to the box, projecting any coordinate outside `[0, 1]`.
    pub(crate) fn from_unit(&self, u: &SearchVector) -> SearchVector {
        let mut x = self.lower;
        for &i in &self.free {
            let t = u[i].clamp(0.0, 1.0);
            x[i] = (self.lower[i] + t * self.width[i]).clamp(self.lower[i], self.upper[i]);
        }
        x
    }

    /// Move `x` along free dimension `i` to unit coordinate `t` without
    /// touching the other coordinates.
    pub(crate) fn with_coordinate(&self, x: &SearchVector, i: usize, t: f64) -> SearchVector {
        let mut moved = *x;
        let t = t.clamp(0.0, 1.0);
        moved[i] = (self.lower[i] + t * self.width[i]).clamp(self.lower[i], self.upper[i]);
        moved
    }
}

/// Objective wrapper that counts evaluations
pub(crate) struct Counted<'a> {
    objective: Objective<'a>,
    pub(crate) evaluations: usize,
}

impl<'a> Counted<'a> {
    pub(crate) fn new(objective: Objective<'a>) -> Self {
        Self { objective, evaluations: 0 }
    }

    pub(crate) fn eval(&mut self, x: &SearchVector) -> f64 {
        self.evaluations += 1;
        (self.objective)(x)
    }
}

/// Package the incumbent as a solver outcome.
pub(crate) fn outcome(
    x: SearchVector,
    value: f64,
    status: OptimizationStatus,
    iterations: usize,
    f: &Counted<'_>,
) -> SolverOutcome {
    SolverOutcome { x, value, status, iterations, evaluations: f.evaluations }
}

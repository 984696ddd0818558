//! Core ParameterOptimizer: bounded local search over the operating point

use tracing::{debug, info, warn};

use crate::physics_engine::simulate;
use crate::types::{
    FixedContext, InputError, OptimizationGoal, OptimizationResult, ParameterBounds,
    ProcessParameters, SearchVector, TargetRange,
};

use super::compass_search::CompassSearch;
use super::objective::ObjectiveFunction;
use super::projected_gradient::ProjectedGradient;
use super::solver::{BoundedSolver, SolverKind, SolverSettings};

/// Runs one local search from a caller-supplied starting point.
///
/// Holds only the solver, so one optimizer can serve any number of
/// scenarios, including concurrently.
pub struct ParameterOptimizer {
    solver: Box<dyn BoundedSolver>,
}

impl std::fmt::Debug for ParameterOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterOptimizer")
            .field("solver", &self.solver.name())
            .finish()
    }
}

impl Default for ParameterOptimizer {
    fn default() -> Self {
        Self::from_kind(SolverKind::default(), SolverSettings::default())
    }
}

impl ParameterOptimizer {
    pub fn new(solver: Box<dyn BoundedSolver>) -> Self {
        Self { solver }
    }

    pub fn from_kind(kind: SolverKind, settings: SolverSettings) -> Self {
        let solver: Box<dyn BoundedSolver> = match kind {
            SolverKind::ProjectedGradient => Box::new(ProjectedGradient::new(settings)),
            SolverKind::CompassSearch => Box::new(CompassSearch::new(settings)),
        };
        Self { solver }
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Minimize the objective for `goal` and `target` within `bounds`.
    ///
    /// Inputs are validated up front and rejected with an `InputError`.
    /// Running out of iterations is not an error: the result carries the best
    /// point found with `converged = false`.
    pub fn optimize(
        &self,
        initial_guess: &ProcessParameters,
        bounds: &ParameterBounds,
        ctx: &FixedContext,
        goal: OptimizationGoal,
        target: &TargetRange,
        max_iterations: usize,
    ) -> Result<OptimizationResult, InputError> {
        bounds.validate()?;
        ctx.validate()?;
        target.validate()?;
        initial_guess.validate(bounds)?;

        let objective = ObjectiveFunction::new(*ctx, goal, *target);
        let initial_objective = objective.score(initial_guess);
        let score = |v: &SearchVector| objective.score(&ProcessParameters::from_vector(v));

        debug!(
            solver = self.solver.name(),
            goal = %objective.goal(),
            free_dimensions = bounds.free_dimensions(),
            max_iterations,
            initial_objective,
            "Starting optimization"
        );

        let outcome = self.solver.minimize(
            &score,
            &initial_guess.to_vector(),
            &bounds.lower(),
            &bounds.upper(),
            max_iterations,
        );

        let optimal_parameters = ProcessParameters::from_vector(&outcome.x);
        let optimal_outputs = simulate(&optimal_parameters, ctx);
        let converged = outcome.status.is_converged();

        if converged {
            info!(
                solver = self.solver.name(),
                status = %outcome.status,
                iterations = outcome.iterations,
                evaluations = outcome.evaluations,
                objective = outcome.value,
                initial_objective,
                "Optimization converged"
            );
        } else {
            warn!(
                solver = self.solver.name(),
                status = %outcome.status,
                iterations = outcome.iterations,
                objective = outcome.value,
                "Optimization did not converge, returning best point found"
            );
        }

        Ok(OptimizationResult {
            converged,
            status: outcome.status,
            optimal_parameters,
            optimal_outputs,
            objective_value: outcome.value,
            initial_objective,
            iterations: outcome.iterations,
            evaluations: outcome.evaluations,
            solver: self.solver.name().to_string(),
            goal: objective.goal(),
            target: *objective.target(),
        })
    }
}

//! Optimization goal, target range and result types

use serde::{Deserialize, Serialize};

use super::{InputError, ProcessOutputs, ProcessParameters};
use crate::config::defaults::{TARGET_SALINITY_MAX_PPM, TARGET_SALINITY_MIN_PPM};

/// What the optimizer minimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationGoal {
    /// Operational cost ($/m³)
    #[default]
    MinimizeCost,
    /// Total specific energy (kWh/m³)
    MinimizeEnergy,
    /// Mean of operational cost and total energy
    #[serde(alias = "balance")]
    BalanceCostAndEnergy,
}

impl std::fmt::Display for OptimizationGoal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinimizeCost => write!(f, "minimize cost"),
            Self::MinimizeEnergy => write!(f, "minimize energy"),
            Self::BalanceCostAndEnergy => write!(f, "balance cost and energy"),
        }
    }
}

impl std::str::FromStr for OptimizationGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "minimize_cost" | "cost" => Ok(Self::MinimizeCost),
            "minimize_energy" | "energy" => Ok(Self::MinimizeEnergy),
            "balance_cost_and_energy" | "balance" => Ok(Self::BalanceCostAndEnergy),
            other => Err(format!(
                "unknown optimization goal '{other}' (expected minimize_cost, minimize_energy or balance)"
            )),
        }
    }
}

/// Acceptable product salinity window (ppm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min_salinity: f64,
    pub max_salinity: f64,
}

impl Default for TargetRange {
    fn default() -> Self {
        Self {
            min_salinity: TARGET_SALINITY_MIN_PPM,
            max_salinity: TARGET_SALINITY_MAX_PPM,
        }
    }
}

impl TargetRange {
    pub const fn new(min_salinity: f64, max_salinity: f64) -> Self {
        Self { min_salinity, max_salinity }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min_salinity + self.max_salinity) / 2.0
    }

    pub fn contains(&self, salinity: f64) -> bool {
        salinity >= self.min_salinity && salinity <= self.max_salinity
    }

    pub fn validate(&self) -> Result<(), InputError> {
        let finite = self.min_salinity.is_finite() && self.max_salinity.is_finite();
        if !finite || self.min_salinity > self.max_salinity {
            return Err(InputError::InvalidTargetRange {
                min: self.min_salinity,
                max: self.max_salinity,
            });
        }
        Ok(())
    }
}

/// Why a search stopped successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceReason {
    /// Accepted step improved the objective by less than `f_tol`
    ObjectiveTolerance,
    /// No improving step longer than `x_tol` exists
    StepTolerance,
    /// Projected gradient vanished within `g_tol`
    ProjectedGradient,
    /// Every parameter is pinned, nothing to search
    NoFreeParameters,
}

/// Why a search stopped without converging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// `max_iterations` reached first
    IterationBudget,
    /// Objective evaluated to NaN or infinity
    NonFiniteObjective,
}

/// Terminal state of one optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum OptimizationStatus {
    Converged(ConvergenceReason),
    Failed(FailureReason),
}

impl OptimizationStatus {
    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

impl std::fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converged(ConvergenceReason::ObjectiveTolerance) => {
                write!(f, "converged (objective change below tolerance)")
            }
            Self::Converged(ConvergenceReason::StepTolerance) => {
                write!(f, "converged (step below tolerance)")
            }
            Self::Converged(ConvergenceReason::ProjectedGradient) => {
                write!(f, "converged (stationary point)")
            }
            Self::Converged(ConvergenceReason::NoFreeParameters) => {
                write!(f, "converged (all parameters pinned)")
            }
            Self::Failed(FailureReason::IterationBudget) => {
                write!(f, "not converged (iteration budget exhausted)")
            }
            Self::Failed(FailureReason::NonFiniteObjective) => {
                write!(f, "not converged (objective not finite)")
            }
        }
    }
}

/// Outcome of `ParameterOptimizer::optimize`
///
/// A failed search is still a valid result: `optimal_parameters` holds the
/// best point found and `converged` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub converged: bool,
    pub status: OptimizationStatus,
    pub optimal_parameters: ProcessParameters,
    pub optimal_outputs: ProcessOutputs,
    /// Objective (base + penalty) at `optimal_parameters`
    pub objective_value: f64,
    /// Objective at the initial guess
    pub initial_objective: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// Solver that produced this result
    pub solver: String,
    pub goal: OptimizationGoal,
    pub target: TargetRange,
}

impl OptimizationResult {
    /// Product salinity of the optimum lies inside the target range.
    pub fn meets_target(&self) -> bool {
        self.target.contains(self.optimal_outputs.salinity_after_ro)
    }
}

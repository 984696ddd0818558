//! Scalar objective over the process model with a salinity-target penalty

use serde::{Deserialize, Serialize};

use crate::config::defaults::{SALINITY_PENALTY_BASE, SALINITY_PENALTY_SLOPE};
use crate::physics_engine::simulate;
use crate::types::{FixedContext, OptimizationGoal, ProcessOutputs, ProcessParameters, TargetRange};

/// Objective value split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBreakdown {
    /// Goal-dependent base score
    pub base: f64,
    /// Out-of-range salinity penalty, zero inside the target
    pub penalty: f64,
    /// `base + penalty`
    pub score: f64,
    pub outputs: ProcessOutputs,
}

/// Goal score before any penalty.
pub fn base_score(outputs: &ProcessOutputs, goal: OptimizationGoal) -> f64 {
    match goal {
        OptimizationGoal::MinimizeCost => outputs.operational_cost,
        OptimizationGoal::MinimizeEnergy => outputs.total_energy,
        OptimizationGoal::BalanceCostAndEnergy => {
            (outputs.operational_cost + outputs.total_energy) / 2.0
        }
    }
}

/// Penalty for product salinity outside `target`
///
/// Formula: 1000 + 10 × |sal_ro − midpoint| outside the range, 0 inside.
pub fn salinity_penalty(salinity_after_ro: f64, target: &TargetRange) -> f64 {
    if target.contains(salinity_after_ro) {
        0.0
    } else {
        SALINITY_PENALTY_BASE
            + SALINITY_PENALTY_SLOPE * (salinity_after_ro - target.midpoint()).abs()
    }
}

/// One-shot objective score.
pub fn score(
    params: &ProcessParameters,
    ctx: &FixedContext,
    goal: OptimizationGoal,
    target: &TargetRange,
) -> f64 {
    ObjectiveFunction::new(*ctx, goal, *target).score(params)
}

/// Objective bound to one scenario's context, goal and target
///
/// Plain `Copy` data with no interior mutability, so one instance can be
/// shared across threads and evaluated re-entrantly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveFunction {
    context: FixedContext,
    goal: OptimizationGoal,
    target: TargetRange,
}

impl ObjectiveFunction {
    pub const fn new(context: FixedContext, goal: OptimizationGoal, target: TargetRange) -> Self {
        Self { context, goal, target }
    }

    pub const fn goal(&self) -> OptimizationGoal {
        self.goal
    }

    pub const fn target(&self) -> &TargetRange {
        &self.target
    }

    pub fn evaluate(&self, params: &ProcessParameters) -> ObjectiveBreakdown {
        let outputs = simulate(params, &self.context);
        let base = base_score(&outputs, self.goal);
        let penalty = salinity_penalty(outputs.salinity_after_ro, &self.target);
        ObjectiveBreakdown { base, penalty, score: base + penalty, outputs }
    }

    pub fn score(&self, params: &ProcessParameters) -> f64 {
        self.evaluate(params).score
    }
}

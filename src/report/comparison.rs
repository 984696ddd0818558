//! Current vs optimized operating point comparison

use serde::{Deserialize, Serialize};

use crate::config::defaults::{MAX_ITERATIONS, TARGET_SALINITY_MAX_PPM, TARGET_SALINITY_MIN_PPM};
use crate::optimization::ParameterOptimizer;
use crate::physics_engine::simulate_checked;
use crate::types::{
    FixedContext, InputError, OptimizationGoal, OptimizationResult, ParameterBounds,
    ProcessOutputs, ProcessParameters, TargetRange,
};

/// Everything one comparison needs, fixed for its duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub context: FixedContext,
    /// Operating point in use today, also the optimizer's starting guess
    pub current: ProcessParameters,
    pub bounds: ParameterBounds,
    pub goal: OptimizationGoal,
    pub target: TargetRange,
    pub max_iterations: usize,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            context: FixedContext::default(),
            current: ProcessParameters::default(),
            bounds: ParameterBounds::default(),
            goal: OptimizationGoal::default(),
            target: TargetRange::default(),
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// Flat scenario record as handed over by an upstream data-selection layer
///
/// Every field is required on deserialization: a record missing part of its
/// operating point is rejected instead of being filled with defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub initial_salinity: f64,
    pub maintenance_flag: bool,
    pub membrane_age_days: u32,
    pub r_nano: f64,
    pub r_ro: f64,
    pub input_pressure: f64,
    pub flow_rate: f64,
    pub energy_efficiency: f64,
    pub optimization_goal: OptimizationGoal,
    pub target_salinity_min: f64,
    pub target_salinity_max: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        let context = FixedContext::default();
        let params = ProcessParameters::default();
        Self {
            initial_salinity: context.initial_salinity,
            maintenance_flag: context.maintenance_flag,
            membrane_age_days: context.membrane_age_days,
            r_nano: params.r_nano,
            r_ro: params.r_ro,
            input_pressure: params.input_pressure,
            flow_rate: params.flow_rate,
            energy_efficiency: params.energy_efficiency,
            optimization_goal: OptimizationGoal::default(),
            target_salinity_min: TARGET_SALINITY_MIN_PPM,
            target_salinity_max: TARGET_SALINITY_MAX_PPM,
        }
    }
}

impl ScenarioInput {
    /// Build a scenario searching within `bounds` under `max_iterations`.
    pub const fn into_scenario(self, bounds: ParameterBounds, max_iterations: usize) -> Scenario {
        Scenario {
            context: FixedContext {
                initial_salinity: self.initial_salinity,
                maintenance_flag: self.maintenance_flag,
                membrane_age_days: self.membrane_age_days,
            },
            current: ProcessParameters {
                r_nano: self.r_nano,
                r_ro: self.r_ro,
                input_pressure: self.input_pressure,
                flow_rate: self.flow_rate,
                energy_efficiency: self.energy_efficiency,
            },
            bounds,
            goal: self.optimization_goal,
            target: TargetRange::new(self.target_salinity_min, self.target_salinity_max),
            max_iterations,
        }
    }
}

impl From<ScenarioInput> for Scenario {
    fn from(input: ScenarioInput) -> Self {
        input.into_scenario(ParameterBounds::default(), MAX_ITERATIONS)
    }
}

/// Simulate the current point, optimize from it, and simulate the optimum.
///
/// Returns `(current outputs, optimization result, optimized outputs)`.
/// Invalid input fails before any optimization work starts.
pub fn compare(
    scenario: &Scenario,
    optimizer: &ParameterOptimizer,
) -> Result<(ProcessOutputs, OptimizationResult, ProcessOutputs), InputError> {
    let current = simulate_checked(&scenario.current, &scenario.bounds, &scenario.context)?;
    let result = optimizer.optimize(
        &scenario.current,
        &scenario.bounds,
        &scenario.context,
        scenario.goal,
        &scenario.target,
        scenario.max_iterations,
    )?;
    let optimized = simulate_checked(&result.optimal_parameters, &scenario.bounds, &scenario.context)?;
    Ok((current, result, optimized))
}

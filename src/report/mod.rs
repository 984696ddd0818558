//! Scenario reports: current vs optimized operating point
//!
//! Pairs the process outputs at today's operating point with those at the
//! optimizer's answer, adds savings and potability verdicts, and renders the
//! result as text or JSON for a presentation layer.

pub mod comparison;
pub mod templates;

pub use comparison::{compare, Scenario, ScenarioInput};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::optimization::ParameterOptimizer;
use crate::types::{
    FixedContext, InputError, OptimizationResult, PotabilityVerdict, ProcessOutputs,
    ProcessParameters,
};

/// Before/after comparison for one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub generated_at: DateTime<Utc>,
    pub context: FixedContext,
    pub current_parameters: ProcessParameters,
    /// Outputs at the current operating point
    pub current: ProcessOutputs,
    pub result: OptimizationResult,
    /// Outputs at the optimizer's parameters
    pub optimized: ProcessOutputs,
    /// Current minus optimized operational cost ($/m³)
    pub cost_savings: f64,
    pub cost_savings_pct: f64,
    /// Current minus optimized total energy (kWh/m³)
    pub energy_savings: f64,
    pub energy_savings_pct: f64,
    pub current_potability: PotabilityVerdict,
    pub optimized_potability: PotabilityVerdict,
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole.abs() > f64::EPSILON {
        part / whole * 100.0
    } else {
        0.0
    }
}

impl ScenarioReport {
    /// Run the comparison for `scenario` and assemble the report.
    pub fn compare(scenario: &Scenario, optimizer: &ParameterOptimizer) -> Result<Self, InputError> {
        let (current, result, optimized) = compare(scenario, optimizer)?;

        let cost_savings = current.operational_cost - optimized.operational_cost;
        let energy_savings = current.total_energy - optimized.total_energy;

        Ok(Self {
            generated_at: Utc::now(),
            context: scenario.context,
            current_parameters: scenario.current,
            cost_savings,
            cost_savings_pct: percent_of(cost_savings, current.operational_cost),
            energy_savings,
            energy_savings_pct: percent_of(energy_savings, current.total_energy),
            current_potability: current.potability(),
            optimized_potability: optimized.potability(),
            current,
            result,
            optimized,
        })
    }

    /// Compare independent scenarios in parallel, one result per scenario in input order.
    pub fn compare_many(
        scenarios: &[Scenario],
        optimizer: &ParameterOptimizer,
    ) -> Vec<Result<Self, InputError>> {
        scenarios
            .par_iter()
            .map(|scenario| Self::compare(scenario, optimizer))
            .collect()
    }

    pub fn to_text(&self) -> String {
        templates::render_report(self)
    }
}

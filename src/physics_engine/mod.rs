//! Physics Engine Module
//!
//! Deterministic process model of the two-stage desalination cascade.
//! All math here is closed-form: no state, no I/O, safe to call from any
//! number of threads at once.
//!
//! ## Entry Points
//! - `simulate()` - Outputs for an already-validated operating point
//! - `simulate_checked()` - Validates inputs first, fails fast on bad input
//!
//! ## Supporting Models
//! - `desalination_models` - Stage salinity, recovery, energy, cost
//! - `pressure` - Feed pressure formula and assessment

pub mod desalination_models;
pub mod pressure;

pub use desalination_models::{
    cost_breakdown, maintenance_cost, membrane_cost, nanofiltration_energy,
    nanofiltration_salinity, output_flow, reverse_osmosis_energy, reverse_osmosis_salinity,
    total_recovery,
};
pub use pressure::{
    assess_pressure, formula_pressure, pressure_contributions, FormulaPressurePredictor,
    PressureAssessment, PressureContributions, PressureFeatures, PressurePredictor,
};

use crate::types::{FixedContext, InputError, ParameterBounds, ProcessOutputs, ProcessParameters};

/// Evaluate the cascade at one operating point.
///
/// Total and side-effect free. Inputs are assumed in-bounds; use
/// `simulate_checked` at an API boundary.
pub fn simulate(params: &ProcessParameters, ctx: &FixedContext) -> ProcessOutputs {
    let salinity_after_nano = nanofiltration_salinity(ctx.initial_salinity, params.r_nano);
    let salinity_after_ro = reverse_osmosis_salinity(salinity_after_nano, params.r_ro);

    let energy_nano =
        nanofiltration_energy(params.input_pressure, params.flow_rate, params.energy_efficiency);
    let energy_ro =
        reverse_osmosis_energy(params.input_pressure, params.flow_rate, params.energy_efficiency);
    let total_energy = energy_nano + energy_ro;

    let breakdown = cost_breakdown(total_energy, ctx);

    ProcessOutputs {
        salinity_initial: ctx.initial_salinity,
        salinity_after_nano,
        salinity_after_ro,
        total_recovery: total_recovery(),
        output_flow: output_flow(params.flow_rate),
        energy_nano,
        energy_ro,
        total_energy,
        operational_cost: breakdown.total(),
        cost_breakdown: breakdown,
    }
}

/// Validate bounds, parameters and context, then simulate.
pub fn simulate_checked(
    params: &ProcessParameters,
    bounds: &ParameterBounds,
    ctx: &FixedContext,
) -> Result<ProcessOutputs, InputError> {
    bounds.validate()?;
    ctx.validate()?;
    params.validate(bounds)?;
    Ok(simulate(params, ctx))
}

//! Stage models for the nanofiltration → reverse-osmosis cascade
//!
//! Key calculations:
//! - Per-stage salinity rejection
//! - Fixed two-stage water recovery
//! - Specific pumping energy per stage
//! - Operational cost and its breakdown

use crate::config::defaults::{
    DAYS_PER_YEAR, ENERGY_PRICE_PER_KWH, MAINTENANCE_COST_ACTIVE, MAINTENANCE_COST_BASELINE,
    MEMBRANE_COST_PER_YEAR, NANO_ENERGY_FACTOR, NANO_STAGE_RECOVERY, RO_ENERGY_FACTOR,
    RO_STAGE_RECOVERY, SECONDS_PER_HOUR,
};
use crate::types::{CostBreakdown, FixedContext};

// ============================================================================
// Salinity
// ============================================================================

/// Salinity leaving the nanofiltration stage
///
/// Formula: TDS_nano = TDS_0 × (1 − R_nano)
pub fn nanofiltration_salinity(initial_salinity: f64, r_nano: f64) -> f64 {
    initial_salinity * (1.0 - r_nano)
}

/// Salinity leaving the reverse-osmosis stage
///
/// Formula: TDS_ro = TDS_nano × (1 − R_ro)
pub fn reverse_osmosis_salinity(salinity_after_nano: f64, r_ro: f64) -> f64 {
    salinity_after_nano * (1.0 - r_ro)
}

// ============================================================================
// Recovery
// ============================================================================

/// Overall recovery of the cascade (product of per-stage recoveries).
pub fn total_recovery() -> f64 {
    NANO_STAGE_RECOVERY * RO_STAGE_RECOVERY
}

/// Product flow for a given feed flow (m³/h).
pub fn output_flow(flow_rate: f64) -> f64 {
    flow_rate * total_recovery()
}

// ============================================================================
// Energy
// ============================================================================

/// Nanofiltration specific energy (kWh/m³)
///
/// Formula: E_nano = (P × Q) / (η × 3600) × 0.5
pub fn nanofiltration_energy(input_pressure: f64, flow_rate: f64, energy_efficiency: f64) -> f64 {
    (input_pressure * flow_rate) / (energy_efficiency * SECONDS_PER_HOUR) * NANO_ENERGY_FACTOR
}

/// Reverse-osmosis specific energy (kWh/m³)
///
/// Formula: E_ro = (P × Q × 1.5) / (η × 3600)
pub fn reverse_osmosis_energy(input_pressure: f64, flow_rate: f64, energy_efficiency: f64) -> f64 {
    (input_pressure * flow_rate * RO_ENERGY_FACTOR) / (energy_efficiency * SECONDS_PER_HOUR)
}

// ============================================================================
// Cost
// ============================================================================

/// Maintenance cost component ($/m³).
pub fn maintenance_cost(maintenance_flag: bool) -> f64 {
    if maintenance_flag {
        MAINTENANCE_COST_ACTIVE
    } else {
        MAINTENANCE_COST_BASELINE
    }
}

/// Membrane ageing cost component ($/m³), linear in membrane age.
pub fn membrane_cost(membrane_age_days: u32) -> f64 {
    MEMBRANE_COST_PER_YEAR * (f64::from(membrane_age_days) / DAYS_PER_YEAR)
}

/// Split operational cost into energy, maintenance and membrane terms.
pub fn cost_breakdown(total_energy: f64, ctx: &FixedContext) -> CostBreakdown {
    CostBreakdown {
        energy_cost: total_energy * ENERGY_PRICE_PER_KWH,
        maintenance_cost: maintenance_cost(ctx.maintenance_flag),
        membrane_cost: membrane_cost(ctx.membrane_age_days),
    }
}

//! System-wide default constants.
//!
//! Centralises the fixed numbers of the process model, the objective penalty
//! and the solver. Grouped by subsystem for easy discovery.

// ============================================================================
// Process Model
// ============================================================================

/// Fraction of feed flow recovered by the nanofiltration stage.
pub const NANO_STAGE_RECOVERY: f64 = 0.6;

/// Fraction of nanofiltration permeate recovered by the reverse-osmosis stage.
pub const RO_STAGE_RECOVERY: f64 = 0.4;

/// Seconds per hour, converts bar·m³/h into kWh/m³ scale.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Share of hydraulic energy attributed to the nanofiltration stage.
pub const NANO_ENERGY_FACTOR: f64 = 0.5;

/// Share of hydraulic energy attributed to the reverse-osmosis stage.
pub const RO_ENERGY_FACTOR: f64 = 1.5;

/// Electricity price applied to total specific energy ($ per kWh).
pub const ENERGY_PRICE_PER_KWH: f64 = 0.1;

/// Maintenance surcharge while a maintenance window is active ($/m³).
pub const MAINTENANCE_COST_ACTIVE: f64 = 0.2;

/// Baseline maintenance cost outside a maintenance window ($/m³).
pub const MAINTENANCE_COST_BASELINE: f64 = 0.05;

/// Membrane replacement cost accrued per year of membrane age ($/m³).
pub const MEMBRANE_COST_PER_YEAR: f64 = 0.01;

/// Days per membrane-age year.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Product water at or below this salinity is fit for drinking (ppm).
pub const POTABLE_SALINITY_MAX_PPM: f64 = 500.0;

// ============================================================================
// Feed Pressure Assessment
// ============================================================================

/// Below this feed pressure filtration is ineffective (bar).
pub const PRESSURE_TOO_LOW_BAR: f64 = 3.0;

/// Above this feed pressure membranes risk damage (bar).
pub const PRESSURE_TOO_HIGH_BAR: f64 = 6.0;

/// Pressure formula coefficient on feed salinity (bar per ppm).
pub const PRESSURE_SALINITY_COEFF: f64 = 0.0025;

/// Pressure formula coefficient on feed temperature (bar per °C).
pub const PRESSURE_TEMPERATURE_COEFF: f64 = 0.05;

/// Pressure formula coefficient on feed pH (bar per pH unit, negative).
pub const PRESSURE_PH_COEFF: f64 = -0.3;

// ============================================================================
// Objective
// ============================================================================

/// Fixed penalty added when product salinity leaves the target range.
pub const SALINITY_PENALTY_BASE: f64 = 1000.0;

/// Penalty slope per ppm of distance from the target midpoint.
pub const SALINITY_PENALTY_SLOPE: f64 = 10.0;

/// Default lower bound of the product salinity target (ppm).
pub const TARGET_SALINITY_MIN_PPM: f64 = 100.0;

/// Default upper bound of the product salinity target (ppm).
pub const TARGET_SALINITY_MAX_PPM: f64 = 500.0;

// ============================================================================
// Solver
// ============================================================================

/// Default iteration budget for one optimization run.
pub const MAX_ITERATIONS: usize = 100;

/// Relative objective change below which the search is converged.
pub const SOLVER_F_TOL: f64 = 1e-9;

/// Step length (unit-box coordinates) below which the search is converged.
pub const SOLVER_X_TOL: f64 = 1e-9;

/// Projected-gradient magnitude below which the search is converged.
pub const SOLVER_G_TOL: f64 = 1e-10;

/// Finite-difference step in unit-box coordinates.
pub const SOLVER_FD_STEP: f64 = 1e-6;

/// Initial trial step of the line search / pattern poll (unit-box coordinates).
pub const SOLVER_INITIAL_STEP: f64 = 0.25;

/// Armijo sufficient-decrease coefficient for the projected-gradient line search.
pub const ARMIJO_COEFF: f64 = 0.1;

// ============================================================================
// Configuration
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DESAL_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "desal_config.toml";

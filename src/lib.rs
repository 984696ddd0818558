//! Desal Optimizer: two-stage desalination simulation and parameter search
//!
//! Models a nanofiltration stage followed by reverse osmosis and searches
//! the operating point that minimizes cost or energy while keeping product
//! salinity inside a target window.
//!
//! ## Architecture
//!
//! - **Physics Engine**: Closed-form cascade model (salinity, energy, cost)
//! - **Optimization**: Penalty objective and bounded local solvers
//! - **Report**: Current vs optimized comparison, text and JSON output
//! - **Config**: TOML scenario and solver settings

pub mod config;
pub mod optimization;
pub mod physics_engine;
pub mod report;
pub mod types;

// Re-export plant configuration
pub use config::{ConfigError, DesalConfig};

// Re-export commonly used types
pub use types::{
    CostBreakdown, FixedContext, InputError, OptimizationGoal, OptimizationResult,
    OptimizationStatus, ParameterBounds, ParameterRange, PotabilityVerdict, ProcessOutputs,
    ProcessParameter, ProcessParameters, TargetRange,
};

// Re-export the process model and optimizer entry points
pub use optimization::{ObjectiveFunction, ParameterOptimizer, SolverKind, SolverSettings};
pub use physics_engine::{simulate, simulate_checked};
pub use report::{Scenario, ScenarioInput, ScenarioReport};

//! Process Optimization Engine
//!
//! Penalty-based objective over the process model and a bounded local search
//! that minimizes it from a caller-supplied starting point. No multi-start:
//! one run is one local search.
//!
//! ## Pieces
//! - `objective` - Goal score plus out-of-target salinity penalty
//! - `solver` - `BoundedSolver` trait, tolerances, unit-box coordinates
//! - `projected_gradient` - Default gradient-based solver
//! - `compass_search` - Derivative-free pattern search
//! - `optimizer` - `ParameterOptimizer`, validation and result assembly

mod compass_search;
pub mod objective;
mod optimizer;
mod projected_gradient;
pub mod solver;

pub use compass_search::CompassSearch;
pub use objective::{base_score, salinity_penalty, score, ObjectiveBreakdown, ObjectiveFunction};
pub use optimizer::ParameterOptimizer;
pub use projected_gradient::ProjectedGradient;
pub use solver::{BoundedSolver, Objective, SolverKind, SolverOutcome, SolverSettings};

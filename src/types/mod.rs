//! Shared data structures for the desalination process model
//!
//! - `ProcessParameters` / `ParameterBounds`: the five-dimensional search space
//! - `FixedContext`: per-scenario plant conditions
//! - `ProcessOutputs` / `CostBreakdown`: one simulation result
//! - `OptimizationGoal` / `TargetRange` / `OptimizationResult`: optimizer I/O
//! - `InputError`: boundary validation failures

mod errors;
mod optimization;
mod process;

pub use errors::*;
pub use optimization::*;
pub use process::*;

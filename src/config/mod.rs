//! Plant Configuration Module
//!
//! Scenario, search bounds and solver settings loaded from TOML, replacing
//! hardcoded operating points with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `DESAL_CONFIG` environment variable (path to TOML file)
//! 2. `desal_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Load once and thread the value through every call; there is no global
//! config:
//!
//! ```ignore
//! let config = DesalConfig::load();
//! let report = ScenarioReport::compare(&config.scenario(), &config.optimizer())?;
//! ```

pub mod defaults;
mod desal_config;
pub mod validation;

pub use desal_config::*;

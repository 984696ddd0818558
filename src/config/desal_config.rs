//! Plant Configuration - scenario, bounds and solver settings as TOML
//!
//! Every section implements `Default` with the built-in values, so an empty
//! or partial file behaves exactly like no file at all for the keys it omits.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults::{
    CONFIG_ENV_VAR, LOCAL_CONFIG_FILE, MAX_ITERATIONS, SOLVER_FD_STEP, SOLVER_F_TOL,
    SOLVER_G_TOL, SOLVER_X_TOL, TARGET_SALINITY_MAX_PPM, TARGET_SALINITY_MIN_PPM,
};
use crate::optimization::{ParameterOptimizer, SolverKind, SolverSettings};
use crate::report::Scenario;
use crate::types::{FixedContext, OptimizationGoal, ParameterBounds, ProcessParameters, TargetRange};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one plant scenario.
///
/// Load with `DesalConfig::load()` which searches:
/// 1. `$DESAL_CONFIG` env var
/// 2. `./desal_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesalConfig {
    /// Feed water and membrane conditions
    #[serde(default)]
    pub context: FixedContext,

    /// Current operating point, also the optimizer's starting guess
    #[serde(default)]
    pub parameters: ProcessParameters,

    /// Search bounds per parameter
    #[serde(default)]
    pub bounds: ParameterBounds,

    /// Goal, product salinity target and iteration budget
    #[serde(default)]
    pub optimization: OptimizationConfig,

    /// Solver choice and tolerances
    #[serde(default)]
    pub solver: SolverConfig,
}

// ============================================================================
// Optimization
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub goal: OptimizationGoal,
    /// Lower bound of acceptable product salinity (ppm)
    pub target_salinity_min: f64,
    /// Upper bound of acceptable product salinity (ppm)
    pub target_salinity_max: f64,
    pub max_iterations: usize,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            goal: OptimizationGoal::default(),
            target_salinity_min: TARGET_SALINITY_MIN_PPM,
            target_salinity_max: TARGET_SALINITY_MAX_PPM,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

// ============================================================================
// Solver
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub kind: SolverKind,
    pub f_tol: f64,
    pub x_tol: f64,
    pub g_tol: f64,
    pub fd_step: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            kind: SolverKind::default(),
            f_tol: SOLVER_F_TOL,
            x_tol: SOLVER_X_TOL,
            g_tol: SOLVER_G_TOL,
            fd_step: SOLVER_FD_STEP,
        }
    }
}

impl SolverConfig {
    pub const fn settings(&self) -> SolverSettings {
        SolverSettings {
            f_tol: self.f_tol,
            x_tol: self.x_tol,
            g_tol: self.g_tol,
            fd_step: self.fd_step,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl DesalConfig {
    /// Load configuration using the standard search order:
    /// 1. `$DESAL_CONFIG` environment variable
    /// 2. `./desal_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded plant config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        // 2. Check ./desal_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded plant config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| e.with_path(path))
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings with a suggested correction and
    /// never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Plant config saved");
        Ok(())
    }

    /// Validate every section, collecting all problems before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if let Err(e) = self.bounds.validate() {
            errors.push(format!("bounds: {e}"));
        }
        if let Err(e) = self.context.validate() {
            errors.push(format!("context: {e}"));
        }
        if let Err(e) = self.target().validate() {
            errors.push(format!("optimization: {e}"));
        }
        // Only meaningful once the bounds themselves are sane
        if errors.is_empty() {
            if let Err(e) = self.parameters.validate(&self.bounds) {
                errors.push(format!("parameters: {e}"));
            }
        }
        if self.optimization.max_iterations == 0 {
            errors.push("optimization.max_iterations must be > 0".to_string());
        }
        errors.extend(self.solver.settings().problems());

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub const fn target(&self) -> TargetRange {
        TargetRange::new(
            self.optimization.target_salinity_min,
            self.optimization.target_salinity_max,
        )
    }

    /// Scenario described by this config.
    pub const fn scenario(&self) -> Scenario {
        Scenario {
            context: self.context,
            current: self.parameters,
            bounds: self.bounds,
            goal: self.optimization.goal,
            target: self.target(),
            max_iterations: self.optimization.max_iterations,
        }
    }

    /// Optimizer running the configured solver.
    pub fn optimizer(&self) -> ParameterOptimizer {
        ParameterOptimizer::from_kind(self.solver.kind, self.solver.settings())
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

impl ConfigError {
    /// Attach the source file to a parse error raised on an in-memory string.
    fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Parse(_, e) => Self::Parse(path.to_path_buf(), e),
            other => other,
        }
    }
}

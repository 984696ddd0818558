//! Process parameters, fixed context and simulation outputs

use serde::{Deserialize, Serialize};

use super::InputError;
use crate::config::defaults::POTABLE_SALINITY_MAX_PPM;

/// Number of tunable process parameters in the search vector.
pub const DIM: usize = 5;

/// Flat parameter vector in `ProcessParameter::ALL` order.
pub type SearchVector = [f64; DIM];

// ============================================================================
// Parameter Identity
// ============================================================================

/// Tunable process parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessParameter {
    /// Nanofiltration rejection ratio
    RNano,
    /// Reverse-osmosis rejection ratio
    RRo,
    /// Feed pressure (bar)
    InputPressure,
    /// Feed flow rate (m³/h)
    FlowRate,
    /// Pump energy efficiency η
    EnergyEfficiency,
}

impl ProcessParameter {
    /// All parameters in search-vector order.
    pub const ALL: [Self; DIM] = [
        Self::RNano,
        Self::RRo,
        Self::InputPressure,
        Self::FlowRate,
        Self::EnergyEfficiency,
    ];

    /// Position of this parameter in a `SearchVector`.
    pub const fn index(self) -> usize {
        match self {
            Self::RNano => 0,
            Self::RRo => 1,
            Self::InputPressure => 2,
            Self::FlowRate => 3,
            Self::EnergyEfficiency => 4,
        }
    }

    /// Config / serialization key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RNano => "r_nano",
            Self::RRo => "r_ro",
            Self::InputPressure => "input_pressure",
            Self::FlowRate => "flow_rate",
            Self::EnergyEfficiency => "energy_efficiency",
        }
    }

    /// Physical domain a search bound may never leave.
    ///
    /// Rejection ratios lie in [0, 1) since a membrane never removes all
    /// salt, pressure is non-negative, flow and efficiency must stay
    /// strictly positive.
    fn admits_bound(self, min: f64, max: f64) -> Result<(), &'static str> {
        match self {
            Self::RNano | Self::RRo if min < 0.0 || max >= 1.0 => {
                Err("rejection ratio must lie in [0, 1)")
            }
            Self::InputPressure if min < 0.0 => Err("pressure cannot be negative"),
            Self::FlowRate if min <= 0.0 => Err("flow rate must be positive"),
            Self::EnergyEfficiency if min <= 0.0 || max > 1.0 => {
                Err("efficiency must lie in (0, 1]")
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for ProcessParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Closed interval `[min, max]` for one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// A zero-width range holds its parameter fixed during optimization.
    pub fn is_pinned(&self) -> bool {
        self.width() <= 0.0
    }
}

/// Per-parameter search bounds
///
/// Defaults are the physical operating envelope of the plant. Callers may
/// narrow any range; a range with `min == max` pins that parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterBounds {
    pub r_nano: ParameterRange,
    pub r_ro: ParameterRange,
    pub input_pressure: ParameterRange,
    pub flow_rate: ParameterRange,
    pub energy_efficiency: ParameterRange,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            r_nano: ParameterRange::new(0.5, 0.8),
            r_ro: ParameterRange::new(0.9, 0.98),
            input_pressure: ParameterRange::new(2.0, 7.0),
            flow_rate: ParameterRange::new(1.0, 10.0),
            energy_efficiency: ParameterRange::new(0.7, 0.9),
        }
    }
}

impl ParameterBounds {
    pub const fn range(&self, param: ProcessParameter) -> ParameterRange {
        match param {
            ProcessParameter::RNano => self.r_nano,
            ProcessParameter::RRo => self.r_ro,
            ProcessParameter::InputPressure => self.input_pressure,
            ProcessParameter::FlowRate => self.flow_rate,
            ProcessParameter::EnergyEfficiency => self.energy_efficiency,
        }
    }

    /// Returns a copy with `param` held at `value`.
    #[must_use]
    pub fn pinned(mut self, param: ProcessParameter, value: f64) -> Self {
        let range = ParameterRange::new(value, value);
        match param {
            ProcessParameter::RNano => self.r_nano = range,
            ProcessParameter::RRo => self.r_ro = range,
            ProcessParameter::InputPressure => self.input_pressure = range,
            ProcessParameter::FlowRate => self.flow_rate = range,
            ProcessParameter::EnergyEfficiency => self.energy_efficiency = range,
        }
        self
    }

    pub fn lower(&self) -> SearchVector {
        ProcessParameter::ALL.map(|p| self.range(p).min)
    }

    pub fn upper(&self) -> SearchVector {
        ProcessParameter::ALL.map(|p| self.range(p).max)
    }

    /// Number of parameters the optimizer is free to move.
    pub fn free_dimensions(&self) -> usize {
        ProcessParameter::ALL
            .iter()
            .filter(|&&p| !self.range(p).is_pinned())
            .count()
    }

    /// Check every range is finite, ordered and inside its physical domain.
    pub fn validate(&self) -> Result<(), InputError> {
        for param in ProcessParameter::ALL {
            let r = self.range(param);
            let reason = if !r.min.is_finite() || !r.max.is_finite() {
                Some("bounds must be finite")
            } else if r.min > r.max {
                Some("min must be <= max")
            } else {
                param.admits_bound(r.min, r.max).err()
            };
            if let Some(reason) = reason {
                return Err(InputError::InvalidBounds {
                    field: param,
                    min: r.min,
                    max: r.max,
                    reason,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Process Parameters
// ============================================================================

/// Operating point of the two-stage plant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParameters {
    /// Nanofiltration rejection ratio
    pub r_nano: f64,
    /// Reverse-osmosis rejection ratio
    pub r_ro: f64,
    /// Feed pressure (bar)
    pub input_pressure: f64,
    /// Feed flow rate (m³/h)
    pub flow_rate: f64,
    /// Pump energy efficiency η
    pub energy_efficiency: f64,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            r_nano: 0.6,
            r_ro: 0.95,
            input_pressure: 5.0,
            flow_rate: 5.0,
            energy_efficiency: 0.8,
        }
    }
}

impl ProcessParameters {
    pub const fn get(&self, param: ProcessParameter) -> f64 {
        match param {
            ProcessParameter::RNano => self.r_nano,
            ProcessParameter::RRo => self.r_ro,
            ProcessParameter::InputPressure => self.input_pressure,
            ProcessParameter::FlowRate => self.flow_rate,
            ProcessParameter::EnergyEfficiency => self.energy_efficiency,
        }
    }

    pub fn to_vector(&self) -> SearchVector {
        ProcessParameter::ALL.map(|p| self.get(p))
    }

    pub const fn from_vector(v: &SearchVector) -> Self {
        Self {
            r_nano: v[0],
            r_ro: v[1],
            input_pressure: v[2],
            flow_rate: v[3],
            energy_efficiency: v[4],
        }
    }

    /// Validate against `bounds`.
    ///
    /// Zero flow or efficiency is reported as `DegenerateInput` ahead of any
    /// range violation.
    pub fn validate(&self, bounds: &ParameterBounds) -> Result<(), InputError> {
        for field in [ProcessParameter::FlowRate, ProcessParameter::EnergyEfficiency] {
            if self.get(field) == 0.0 {
                return Err(InputError::DegenerateInput { field });
            }
        }
        for param in ProcessParameter::ALL {
            let value = self.get(param);
            let range = bounds.range(param);
            if !value.is_finite() || !range.contains(value) {
                return Err(InputError::InvalidParameterRange {
                    field: param,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Fixed Context
// ============================================================================

/// Per-scenario plant conditions, immutable for one simulation or optimization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedContext {
    /// Feed water salinity (ppm)
    pub initial_salinity: f64,
    /// A maintenance window is active
    pub maintenance_flag: bool,
    /// Days since membrane installation
    pub membrane_age_days: u32,
}

impl Default for FixedContext {
    fn default() -> Self {
        Self {
            initial_salinity: 6000.0,
            maintenance_flag: false,
            membrane_age_days: 365,
        }
    }
}

impl FixedContext {
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.initial_salinity.is_finite() || self.initial_salinity < 0.0 {
            return Err(InputError::InvalidContext {
                field: "initial_salinity",
                value: self.initial_salinity,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Outputs
// ============================================================================

/// Split of operational cost into its three drivers ($/m³)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub energy_cost: f64,
    pub maintenance_cost: f64,
    pub membrane_cost: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.energy_cost + self.maintenance_cost + self.membrane_cost
    }
}

/// Treatment stage along the salinity trajectory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalinityStage {
    Initial,
    Nanofiltration,
    ReverseOsmosis,
}

impl std::fmt::Display for SalinityStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "Feed"),
            Self::Nanofiltration => write!(f, "Nanofiltration"),
            Self::ReverseOsmosis => write!(f, "Reverse Osmosis"),
        }
    }
}

/// Drinking-water verdict on product salinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotabilityVerdict {
    Potable,
    NotPotable,
}

impl PotabilityVerdict {
    pub fn from_salinity(salinity_ppm: f64) -> Self {
        if salinity_ppm <= POTABLE_SALINITY_MAX_PPM {
            Self::Potable
        } else {
            Self::NotPotable
        }
    }
}

impl std::fmt::Display for PotabilityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Potable => write!(f, "potable"),
            Self::NotPotable => write!(f, "not potable"),
        }
    }
}

/// Physical and economic result of one process evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutputs {
    /// Feed salinity (ppm)
    pub salinity_initial: f64,
    /// Salinity after nanofiltration (ppm)
    pub salinity_after_nano: f64,
    /// Product salinity after reverse osmosis (ppm)
    pub salinity_after_ro: f64,
    /// Overall recovery (dimensionless)
    pub total_recovery: f64,
    /// Product water flow (m³/h)
    pub output_flow: f64,
    /// Nanofiltration specific energy (kWh/m³)
    pub energy_nano: f64,
    /// Reverse-osmosis specific energy (kWh/m³)
    pub energy_ro: f64,
    /// Total specific energy (kWh/m³)
    pub total_energy: f64,
    /// Operational cost ($/m³)
    pub operational_cost: f64,
    /// Cost split, sums to `operational_cost`
    pub cost_breakdown: CostBreakdown,
}

impl ProcessOutputs {
    /// Salinity at each stage, feed first.
    pub const fn salinity_trajectory(&self) -> [(SalinityStage, f64); 3] {
        [
            (SalinityStage::Initial, self.salinity_initial),
            (SalinityStage::Nanofiltration, self.salinity_after_nano),
            (SalinityStage::ReverseOsmosis, self.salinity_after_ro),
        ]
    }

    pub fn potability(&self) -> PotabilityVerdict {
        PotabilityVerdict::from_salinity(self.salinity_after_ro)
    }
}

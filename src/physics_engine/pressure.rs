//! Feed pressure estimation and assessment
//!
//! The trained pressure regressor lives outside this crate. It plugs in
//! through `PressurePredictor`; `FormulaPressurePredictor` is the closed-form
//! reference the regressor is compared against.

use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    PRESSURE_PH_COEFF, PRESSURE_SALINITY_COEFF, PRESSURE_TEMPERATURE_COEFF, PRESSURE_TOO_HIGH_BAR,
    PRESSURE_TOO_LOW_BAR,
};

/// Feature vector handed to a pressure predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureFeatures {
    /// Encoded region of the sampling site
    pub region_code: u32,
    /// Feed temperature (°C)
    pub temperature: f64,
    /// Feed salinity (ppm)
    pub salinity: f64,
    pub ph: f64,
    /// Measured feed pressure (bar)
    pub input_pressure: f64,
    /// Source water level (cm)
    pub water_level: f64,
}

/// Black-box outlet pressure predictor (bar)
pub trait PressurePredictor: Send + Sync {
    fn predict(&self, features: &PressureFeatures) -> f64;
}

/// Closed-form pressure estimate from salinity, temperature and pH
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaPressurePredictor;

impl PressurePredictor for FormulaPressurePredictor {
    fn predict(&self, features: &PressureFeatures) -> f64 {
        formula_pressure(features.salinity, features.temperature, features.ph)
    }
}

/// Per-factor contributions to the formula pressure (bar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureContributions {
    pub salinity: f64,
    pub temperature: f64,
    /// Negative: higher pH lowers required pressure
    pub ph: f64,
}

impl PressureContributions {
    pub fn total(&self) -> f64 {
        self.salinity + self.temperature + self.ph
    }
}

/// Break the formula pressure into its three terms.
pub fn pressure_contributions(salinity: f64, temperature: f64, ph: f64) -> PressureContributions {
    PressureContributions {
        salinity: PRESSURE_SALINITY_COEFF * salinity,
        temperature: PRESSURE_TEMPERATURE_COEFF * temperature,
        ph: PRESSURE_PH_COEFF * ph,
    }
}

/// Formula pressure estimate
///
/// Formula: P = 0.0025 × salinity + 0.05 × temperature − 0.3 × pH
pub fn formula_pressure(salinity: f64, temperature: f64, ph: f64) -> f64 {
    pressure_contributions(salinity, temperature, ph).total()
}

/// Operating verdict on a feed pressure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureAssessment {
    /// Below 3 bar: filtration ineffective
    TooLow,
    Optimal,
    /// Above 6 bar: membrane damage risk
    TooHigh,
}

impl std::fmt::Display for PressureAssessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLow => write!(f, "pressure too low, filtration ineffective"),
            Self::Optimal => write!(f, "pressure optimal"),
            Self::TooHigh => write!(f, "pressure too high, membrane damage possible"),
        }
    }
}

/// Classify a feed pressure in bar.
pub fn assess_pressure(pressure_bar: f64) -> PressureAssessment {
    if pressure_bar < PRESSURE_TOO_LOW_BAR {
        PressureAssessment::TooLow
    } else if pressure_bar > PRESSURE_TOO_HIGH_BAR {
        PressureAssessment::TooHigh
    } else {
        PressureAssessment::Optimal
    }
}

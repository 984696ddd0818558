//! Input validation errors shared by the process model and the optimizer

use thiserror::Error;

use super::ProcessParameter;

/// Rejected caller input. Raised eagerly at the component boundary, before
/// any simulation or optimization work is done. Values are never clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A process parameter lies outside its declared bound.
    #[error("{field} = {value} is outside its allowed range [{min}, {max}]")]
    InvalidParameterRange {
        field: ProcessParameter,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A search bound is inverted, non-finite or outside the physical domain.
    #[error("bounds for {field} [{min}, {max}] are invalid: {reason}")]
    InvalidBounds {
        field: ProcessParameter,
        min: f64,
        max: f64,
        reason: &'static str,
    },

    /// Target salinity range is inverted or non-finite.
    #[error("target salinity range [{min}, {max}] is invalid (min must be <= max)")]
    InvalidTargetRange { min: f64, max: f64 },

    /// Fixed context value is physically impossible.
    #[error("context field {field} = {value} is invalid")]
    InvalidContext { field: &'static str, value: f64 },

    /// Zero flow rate or zero efficiency leaves the specific-energy model undefined.
    #[error("{field} is zero, specific energy is undefined")]
    DegenerateInput { field: ProcessParameter },
}

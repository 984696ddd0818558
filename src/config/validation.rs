//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults::POTABLE_SALINITY_MAX_PPM;
use crate::types::ProcessParameter;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for DesalConfig.
///
/// Maintained by hand to match the struct hierarchy in desal_config.rs.
pub fn known_config_keys() -> HashSet<String> {
    let fixed: &[&str] = &[
        // [context]
        "context",
        "context.initial_salinity",
        "context.maintenance_flag",
        "context.membrane_age_days",
        // [optimization]
        "optimization",
        "optimization.goal",
        "optimization.target_salinity_min",
        "optimization.target_salinity_max",
        "optimization.max_iterations",
        // [solver]
        "solver",
        "solver.kind",
        "solver.f_tol",
        "solver.x_tol",
        "solver.g_tol",
        "solver.fd_step",
        // [parameters], [bounds]
        "parameters",
        "bounds",
    ];
    let mut keys: HashSet<String> = fixed.iter().map(|k| (*k).to_string()).collect();

    // [parameters] and [bounds.<param>] share the parameter names
    for param in ProcessParameter::ALL {
        let name = param.key();
        keys.insert(format!("parameters.{name}"));
        keys.insert(format!("bounds.{name}"));
        keys.insert(format!("bounds.{name}.min"));
        keys.insert(format!("bounds.{name}.max"));
    }
    keys
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the lexicographically smallest key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.clone())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed DesalConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent a run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::DesalConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let opt = &config.optimization;

    // Salinity cannot be negative
    if opt.target_salinity_min < 0.0 {
        errors.push(format!(
            "optimization.target_salinity_min = {:.1} cannot be negative",
            opt.target_salinity_min
        ));
    }

    // Feed salinity: brackish water through seawater sits well below 50000 ppm
    let feed = config.context.initial_salinity;
    if feed > 50_000.0 {
        warnings.push(ValidationWarning {
            field: "context.initial_salinity".to_string(),
            message: format!(
                "initial_salinity = {feed:.0} ppm is above typical feed range (0-50000 ppm)"
            ),
            suggestion: None,
        });
    }

    // Membranes are normally replaced within ten years
    let age = config.context.membrane_age_days;
    if age > 3650 {
        warnings.push(ValidationWarning {
            field: "context.membrane_age_days".to_string(),
            message: format!("membrane_age_days = {age} is beyond typical membrane life (3650 days)"),
            suggestion: None,
        });
    }

    // A target above the drinking-water limit accepts non-potable product
    if opt.target_salinity_max > POTABLE_SALINITY_MAX_PPM {
        warnings.push(ValidationWarning {
            field: "optimization.target_salinity_max".to_string(),
            message: format!(
                "target_salinity_max = {:.0} ppm exceeds the potable limit ({POTABLE_SALINITY_MAX_PPM:.0} ppm)",
                opt.target_salinity_max
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

//! Config Validation Tests
//!
//! Typo detection, range validation and file round-trips for the plant
//! config, exercised through the public API only.

use std::io::Write;

use desal_optimizer::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use desal_optimizer::config::{ConfigError, DesalConfig};
use desal_optimizer::{OptimizationGoal, ProcessParameter, SolverKind};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_bound_key_warns_with_suggestion() {
    let toml_str = r#"
[bounds.flow_rate]
mn = 2.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "bounds.flow_rate.mn");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("bounds.flow_rate.min"));
}

#[test]
fn typo_in_optimization_section_warns() {
    let toml_str = r#"
[optimization]
max_iteration = 50
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].suggestion.as_deref(), Some("optimization.max_iterations"));
}

#[test]
fn full_valid_config_produces_zero_warnings() {
    let toml_str = r#"
[context]
initial_salinity = 8000.0
maintenance_flag = false
membrane_age_days = 400

[parameters]
r_nano = 0.65
r_ro = 0.94
input_pressure = 4.5
flow_rate = 6.0
energy_efficiency = 0.85

[bounds.r_nano]
min = 0.5
max = 0.8

[bounds.energy_efficiency]
min = 0.7
max = 0.9

[optimization]
goal = "balance"
target_salinity_min = 80.0
target_salinity_max = 400.0
max_iterations = 150

[solver]
kind = "projected_gradient"
f_tol = 1e-9
x_tol = 1e-9
g_tol = 1e-10
fd_step = 1e-6
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
}

#[test]
fn multiple_typos_all_warned() {
    let toml_str = r#"
[contxt]
initial_salinity = 6000.0

[solver]
knd = "compass_search"
"#;
    let warnings = validate_unknown_keys(toml_str);
    // contxt, contxt.initial_salinity, solver.knd
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    assert!(warnings.iter().any(|w| w.suggestion.as_deref() == Some("context")));
    assert!(warnings.iter().any(|w| w.suggestion.as_deref() == Some("solver.kind")));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let known = known_config_keys();
    assert!(suggest_correction("zzzzzzzzzzzzzzzzzzzz", &known).is_none());
}

#[test]
fn unknown_keys_do_not_fail_the_load() {
    let config = DesalConfig::from_toml_str("[context]\nfeed_temperature = 25.0\n").unwrap();
    assert_eq!(config, DesalConfig::default());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn inverted_bounds_are_rejected() {
    let toml_str = r#"
[bounds.input_pressure]
min = 7.0
max = 2.0
"#;
    match DesalConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("input_pressure")), "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn rejection_bound_of_one_or_more_is_rejected() {
    for max in ["1.0", "1.2"] {
        let toml_str = format!("[bounds.r_ro]\nmin = 0.9\nmax = {max}\n");
        match DesalConfig::from_toml_str(&toml_str) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.contains("r_ro")), "{errors:?}");
            }
            other => panic!("max = {max}: expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn starting_point_outside_bounds_is_rejected() {
    let toml_str = r#"
[parameters]
flow_rate = 12.0
"#;
    match DesalConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.starts_with("parameters:")), "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn zero_flow_start_reports_degenerate_input() {
    let mut config = DesalConfig::default();
    config.parameters.flow_rate = 0.0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("specific energy is undefined")), "{errors:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn suspicious_values_warn_but_validate() {
    let mut config = DesalConfig::default();
    config.context.membrane_age_days = 5000;
    config.context.initial_salinity = 60_000.0;
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 2);
    assert!(config.validate().is_ok());
}

// ============================================================================
// File Round-Trips
// ============================================================================

#[test]
fn load_from_file_reads_every_section() {
    let file = write_config(
        r#"
[context]
initial_salinity = 9500.0
maintenance_flag = true

[bounds.r_ro]
min = 0.95
max = 0.95

[optimization]
goal = "minimize_energy"

[solver]
kind = "compass_search"
"#,
    );
    let config = DesalConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.context.initial_salinity, 9500.0);
    assert!(config.context.maintenance_flag);
    assert!(config.bounds.range(ProcessParameter::RRo).is_pinned());
    assert_eq!(config.optimization.goal, OptimizationGoal::MinimizeEnergy);
    assert_eq!(config.solver.kind, SolverKind::CompassSearch);
}

#[test]
fn parse_error_names_the_file() {
    let file = write_config("[context\ninitial_salinity = ");
    let err = DesalConfig::load_from_file(file.path()).unwrap_err();
    match &err {
        ConfigError::Parse(path, _) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other}"),
    }
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DesalConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desal_config.toml");

    let mut config = DesalConfig::default();
    config.context.membrane_age_days = 900;
    config.parameters.input_pressure = 3.5;
    config.optimization.target_salinity_max = 300.0;
    config.solver.kind = SolverKind::CompassSearch;
    config.save_to_file(&path).unwrap();

    let loaded = DesalConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

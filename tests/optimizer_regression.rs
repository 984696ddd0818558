//! Optimizer Regression Tests
//!
//! End-to-end checks through the public API: the reference operating point,
//! both solvers on the same scenarios, and batch comparison of flat records.

use std::sync::{Arc, Mutex};

use desal_optimizer::optimization::{
    BoundedSolver, CompassSearch, Objective, ProjectedGradient, SolverOutcome,
};
use desal_optimizer::types::SearchVector;
use desal_optimizer::{
    simulate, FixedContext, OptimizationGoal, ParameterBounds, ParameterOptimizer,
    ParameterRange, PotabilityVerdict, ProcessParameter, ProcessParameters, Scenario,
    ScenarioInput, ScenarioReport, SolverKind, SolverSettings, TargetRange,
};

fn reference_context() -> FixedContext {
    FixedContext { initial_salinity: 6000.0, maintenance_flag: false, membrane_age_days: 365 }
}

fn solvers() -> Vec<ParameterOptimizer> {
    [SolverKind::ProjectedGradient, SolverKind::CompassSearch]
        .into_iter()
        .map(|kind| ParameterOptimizer::from_kind(kind, SolverSettings::default()))
        .collect()
}

fn relative(a: f64, b: f64) -> f64 {
    (a - b).abs() / b.abs().max(1e-12)
}

// ============================================================================
// Reference Operating Point
// ============================================================================

#[test]
fn reference_point_salinity_cascade() {
    let params = ProcessParameters { r_nano: 0.6, r_ro: 0.95, ..Default::default() };
    let out = simulate(&params, &reference_context());
    assert!((out.salinity_after_nano - 2400.0).abs() < 1e-9);
    assert!((out.salinity_after_ro - 120.0).abs() < 1e-9);
}

#[test]
fn reference_point_product_flow() {
    let params = ProcessParameters { flow_rate: 5.0, ..Default::default() };
    let out = simulate(&params, &reference_context());
    assert!((out.total_recovery - 0.24).abs() < 1e-12);
    assert!((out.output_flow - 1.2).abs() < 1e-12);
}

#[test]
fn reference_point_fixed_cost_terms() {
    let out = simulate(&ProcessParameters::default(), &reference_context());
    assert!((out.cost_breakdown.maintenance_cost - 0.05).abs() < 1e-12);
    assert!((out.cost_breakdown.membrane_cost - 0.01).abs() < 1e-12);
    assert!((out.cost_breakdown.total() - out.operational_cost).abs() < 1e-12);
}

#[test]
fn reachable_target_carries_no_penalty() {
    // 120 ppm at the default point already sits inside [100, 500]
    for opt in solvers() {
        let result = opt
            .optimize(
                &ProcessParameters::default(),
                &ParameterBounds::default(),
                &reference_context(),
                OptimizationGoal::MinimizeCost,
                &TargetRange::new(100.0, 500.0),
                500,
            )
            .unwrap();
        assert!(result.meets_target(), "{}", opt.solver_name());
        assert!(
            (result.objective_value - result.optimal_outputs.operational_cost).abs() < 1e-12,
            "{}: objective should be cost alone",
            opt.solver_name()
        );
    }
}

#[test]
fn unreachable_target_is_reported_not_hidden() {
    let ctx = FixedContext { initial_salinity: 15_000.0, ..reference_context() };
    for opt in solvers() {
        let result = opt
            .optimize(
                &ProcessParameters::default(),
                &ParameterBounds::default(),
                &ctx,
                OptimizationGoal::MinimizeCost,
                &TargetRange::new(0.0, 50.0),
                300,
            )
            .unwrap();
        assert!(!result.converged || !result.meets_target(), "{}", opt.solver_name());
        assert!(result.objective_value >= 1000.0, "{}", opt.solver_name());
    }
}

// ============================================================================
// Solver Agreement
// ============================================================================

#[test]
fn solvers_agree_on_cost_optimum() {
    let results: Vec<_> = solvers()
        .iter()
        .map(|opt| {
            opt.optimize(
                &ProcessParameters::default(),
                &ParameterBounds::default(),
                &reference_context(),
                OptimizationGoal::MinimizeCost,
                &TargetRange::default(),
                1000,
            )
            .unwrap()
        })
        .collect();
    assert!(results.iter().all(|r| r.converged));
    let (a, b) = (&results[0], &results[1]);
    assert!(
        relative(a.objective_value, b.objective_value) < 1e-4,
        "projected_gradient {} vs compass_search {}",
        a.objective_value,
        b.objective_value
    );
}

#[test]
fn every_goal_improves_or_holds_for_every_solver() {
    let guess = ProcessParameters {
        r_nano: 0.55,
        r_ro: 0.97,
        input_pressure: 6.5,
        flow_rate: 8.0,
        energy_efficiency: 0.75,
    };
    for goal in [
        OptimizationGoal::MinimizeCost,
        OptimizationGoal::MinimizeEnergy,
        OptimizationGoal::BalanceCostAndEnergy,
    ] {
        for opt in solvers() {
            let result = opt
                .optimize(
                    &guess,
                    &ParameterBounds::default(),
                    &reference_context(),
                    goal,
                    &TargetRange::default(),
                    300,
                )
                .unwrap();
            assert!(
                result.objective_value <= result.initial_objective,
                "{} {goal}: {} > {}",
                opt.solver_name(),
                result.objective_value,
                result.initial_objective
            );
            let again = simulate(&result.optimal_parameters, &reference_context());
            assert!(relative(again.operational_cost, result.optimal_outputs.operational_cost) < 1e-6);
            assert!(relative(again.total_energy, result.optimal_outputs.total_energy) < 1e-6);
        }
    }
}

#[test]
fn optimum_stays_inside_bounds() {
    let bounds = ParameterBounds::default();
    for opt in solvers() {
        let result = opt
            .optimize(
                &ProcessParameters::default(),
                &bounds,
                &reference_context(),
                OptimizationGoal::MinimizeEnergy,
                &TargetRange::new(200.0, 400.0),
                300,
            )
            .unwrap();
        assert!(result.optimal_parameters.validate(&bounds).is_ok(), "{}", opt.solver_name());
    }
}

#[test]
fn point_target_still_drives_hydraulics_to_cheapest_corner() {
    // A zero-width window keeps the penalty active almost everywhere
    let target = TargetRange::new(150.0, 150.0);
    for opt in solvers() {
        let result = opt
            .optimize(
                &ProcessParameters::default(),
                &ParameterBounds::default(),
                &reference_context(),
                OptimizationGoal::MinimizeCost,
                &target,
                200,
            )
            .unwrap();
        let p = result.optimal_parameters;
        assert!(result.converged, "{}: {}", opt.solver_name(), result.status);
        assert!((p.input_pressure - 2.0).abs() < 1e-3, "{}: {p:?}", opt.solver_name());
        assert!((p.flow_rate - 1.0).abs() < 1e-3, "{}: {p:?}", opt.solver_name());
        assert!((p.energy_efficiency - 0.9).abs() < 1e-3, "{}: {p:?}", opt.solver_name());
        // Corner cost is about 0.0601; the start point costs about 0.0616
        assert!(result.objective_value < 1000.061, "{}: {}", opt.solver_name(), result.objective_value);
    }
}

// ============================================================================
// Bounds Contract
// ============================================================================

/// Solver wrapper recording every point the objective is evaluated at
struct Recording<S> {
    inner: S,
    seen: Arc<Mutex<Vec<SearchVector>>>,
}

impl<S: BoundedSolver> BoundedSolver for Recording<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn minimize(
        &self,
        objective: Objective<'_>,
        start: &SearchVector,
        lower: &SearchVector,
        upper: &SearchVector,
        max_iterations: usize,
    ) -> SolverOutcome {
        let record = |x: &SearchVector| {
            self.seen.lock().unwrap().push(*x);
            objective(x)
        };
        self.inner.minimize(&record, start, lower, upper, max_iterations)
    }
}

#[test]
fn every_evaluation_respects_narrowed_and_pinned_bounds() {
    let mut bounds = ParameterBounds::default().pinned(ProcessParameter::RRo, 0.95);
    bounds.r_nano = ParameterRange::new(0.55, 0.7);
    bounds.input_pressure = ParameterRange::new(3.0, 5.0);
    bounds.flow_rate = ParameterRange::new(2.0, 6.0);
    bounds.energy_efficiency = ParameterRange::new(0.75, 0.85);
    let guess = ProcessParameters { r_ro: 0.95, ..Default::default() };

    let seen = Arc::new(Mutex::new(Vec::new()));
    let optimizers = [
        ParameterOptimizer::new(Box::new(Recording {
            inner: ProjectedGradient::default(),
            seen: Arc::clone(&seen),
        })),
        ParameterOptimizer::new(Box::new(Recording {
            inner: CompassSearch::default(),
            seen: Arc::clone(&seen),
        })),
    ];

    for opt in &optimizers {
        for goal in [OptimizationGoal::MinimizeCost, OptimizationGoal::MinimizeEnergy] {
            seen.lock().unwrap().clear();
            let result = opt
                .optimize(&guess, &bounds, &reference_context(), goal, &TargetRange::new(200.0, 400.0), 300)
                .unwrap();
            assert_eq!(result.optimal_parameters.r_ro, 0.95);

            let seen = seen.lock().unwrap();
            assert!(seen.len() > 1, "{}: no evaluations recorded", opt.solver_name());
            for x in seen.iter() {
                let p = ProcessParameters::from_vector(x);
                assert!(p.validate(&bounds).is_ok(), "{} {goal}: evaluated {p:?}", opt.solver_name());
                assert_eq!(p.r_ro, 0.95);
            }
        }
    }
}

// ============================================================================
// Batch Comparison
// ============================================================================

/// Complete flat record: the default operating point with `overrides` applied.
fn record(overrides: serde_json::Value) -> serde_json::Value {
    let mut value = serde_json::to_value(ScenarioInput::default()).unwrap();
    if let (Some(base), Some(extra)) = (value.as_object_mut(), overrides.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    value
}

#[test]
fn flat_records_compare_in_parallel() {
    let batch = serde_json::Value::Array(vec![
        record(serde_json::json!({"initial_salinity": 6000.0, "optimization_goal": "minimize_cost"})),
        record(serde_json::json!({
            "initial_salinity": 9000.0,
            "maintenance_flag": true,
            "optimization_goal": "minimize_energy"
        })),
        record(serde_json::json!({
            "initial_salinity": 4000.0,
            "target_salinity_min": 300.0,
            "target_salinity_max": 100.0
        })),
    ]);
    let records: Vec<ScenarioInput> = serde_json::from_value(batch).unwrap();
    let scenarios: Vec<Scenario> = records.into_iter().map(Scenario::from).collect();

    let optimizer = ParameterOptimizer::default();
    let reports = ScenarioReport::compare_many(&scenarios, &optimizer);
    assert_eq!(reports.len(), 3);

    let first = reports[0].as_ref().unwrap();
    assert!(first.cost_savings >= 0.0);
    assert_eq!(first.optimized_potability, PotabilityVerdict::Potable);

    let second = reports[1].as_ref().unwrap();
    assert_eq!(second.result.goal, OptimizationGoal::MinimizeEnergy);
    assert!(second.context.maintenance_flag);
    assert!(second.energy_savings >= 0.0);

    assert!(reports[2].is_err(), "inverted target must be rejected");
}

#[test]
fn record_missing_operating_point_is_rejected() {
    let mut incomplete = record(serde_json::json!({}));
    if let Some(fields) = incomplete.as_object_mut() {
        fields.remove("flow_rate");
    }
    let err = serde_json::from_value::<Vec<ScenarioInput>>(serde_json::Value::Array(vec![
        record(serde_json::json!({})),
        incomplete,
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("flow_rate"), "{err}");
}

#[test]
fn parallel_batch_matches_sequential_runs() {
    let scenarios: Vec<Scenario> = [3000.0, 6000.0, 9000.0, 12_000.0]
        .into_iter()
        .map(|initial_salinity| Scenario {
            context: FixedContext { initial_salinity, ..reference_context() },
            goal: OptimizationGoal::BalanceCostAndEnergy,
            ..Default::default()
        })
        .collect();

    let optimizer = ParameterOptimizer::default();
    let batch = ScenarioReport::compare_many(&scenarios, &optimizer);
    for (scenario, parallel) in scenarios.iter().zip(batch) {
        let parallel = parallel.unwrap();
        let sequential = ScenarioReport::compare(scenario, &optimizer).unwrap();
        assert_eq!(parallel.result.optimal_parameters, sequential.result.optimal_parameters);
        assert_eq!(parallel.result.objective_value, sequential.result.objective_value);
    }
}

#[test]
fn text_report_names_solver_and_savings() {
    let scenario = Scenario { context: reference_context(), ..Default::default() };
    for opt in solvers() {
        let report = ScenarioReport::compare(&scenario, &opt).unwrap();
        let text = report.to_text();
        assert!(text.contains(opt.solver_name()), "{text}");
        assert!(text.contains("Operational cost"), "{text}");
    }
}

//! Plain-text rendering of a `ScenarioReport`

use crate::types::{ProcessOutputs, ProcessParameters};

use super::ScenarioReport;

/// Render a side-by-side current vs optimized summary.
pub fn render_report(report: &ScenarioReport) -> String {
    let mut sections: Vec<String> = Vec::new();
    let result = &report.result;

    sections.push(format!(
        "Desalination scenario report ({})\n\
         Goal: {}. Target product salinity: {:.0}-{:.0} ppm.\n\
         Feed: {:.0} ppm, membrane age {} days, maintenance {}.",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        result.goal,
        result.target.min_salinity,
        result.target.max_salinity,
        report.context.initial_salinity,
        report.context.membrane_age_days,
        if report.context.maintenance_flag { "active" } else { "inactive" },
    ));

    let status = if result.converged {
        format!("Optimizer ({}) converged: {}", result.solver, result.status)
    } else {
        format!(
            "WARNING: optimizer ({}) did not converge ({}). Optimized values are the best found, not a verified optimum.",
            result.solver, result.status
        )
    };
    sections.push(format!(
        "{status}\nIterations: {}, objective evaluations: {}, objective {:.6} -> {:.6}",
        result.iterations, result.evaluations, result.initial_objective, result.objective_value,
    ));

    sections.push(parameter_table(&report.current_parameters, &result.optimal_parameters));
    sections.push(output_table(&report.current, &report.optimized));

    sections.push(format!(
        "Cost savings: {:.4} $/m³ ({:.1}%)\nEnergy savings: {:.5} kWh/m³ ({:.1}%)",
        report.cost_savings,
        report.cost_savings_pct,
        report.energy_savings,
        report.energy_savings_pct,
    ));

    let mut verdict = format!(
        "Product water: current {} ({:.1} ppm), optimized {} ({:.1} ppm)",
        report.current_potability,
        report.current.salinity_after_ro,
        report.optimized_potability,
        report.optimized.salinity_after_ro,
    );
    if !result.meets_target() {
        verdict.push_str("\nOptimized salinity lies outside the target range.");
    }
    sections.push(verdict);

    sections.join("\n\n")
}

fn parameter_table(current: &ProcessParameters, optimal: &ProcessParameters) -> String {
    let rows = [
        ("Nanofiltration rejection", current.r_nano, optimal.r_nano, ""),
        ("Reverse-osmosis rejection", current.r_ro, optimal.r_ro, ""),
        ("Input pressure", current.input_pressure, optimal.input_pressure, "bar"),
        ("Flow rate", current.flow_rate, optimal.flow_rate, "m³/h"),
        ("Energy efficiency", current.energy_efficiency, optimal.energy_efficiency, ""),
    ];
    let mut lines = vec![format!("{:<28}{:>12}{:>12}", "Parameter", "Current", "Optimized")];
    for (name, cur, opt, unit) in rows {
        lines.push(format!("{name:<28}{cur:>12.4}{opt:>12.4}  {unit}"));
    }
    lines.join("\n")
}

fn output_table(current: &ProcessOutputs, optimized: &ProcessOutputs) -> String {
    let rows = [
        ("Salinity after NF", current.salinity_after_nano, optimized.salinity_after_nano, "ppm"),
        ("Salinity after RO", current.salinity_after_ro, optimized.salinity_after_ro, "ppm"),
        ("Output flow", current.output_flow, optimized.output_flow, "m³/h"),
        ("Total energy", current.total_energy, optimized.total_energy, "kWh/m³"),
        ("Energy cost", current.cost_breakdown.energy_cost, optimized.cost_breakdown.energy_cost, "$/m³"),
        (
            "Maintenance cost",
            current.cost_breakdown.maintenance_cost,
            optimized.cost_breakdown.maintenance_cost,
            "$/m³",
        ),
        (
            "Membrane cost",
            current.cost_breakdown.membrane_cost,
            optimized.cost_breakdown.membrane_cost,
            "$/m³",
        ),
        ("Operational cost", current.operational_cost, optimized.operational_cost, "$/m³"),
    ];
    let mut lines = vec![format!("{:<28}{:>12}{:>12}", "Output", "Current", "Optimized")];
    for (name, cur, opt, unit) in rows {
        lines.push(format!("{name:<28}{cur:>12.5}{opt:>12.5}  {unit}"));
    }
    lines.join("\n")
}

//! Solution Extractor
//!
//! Turns loaded variable values into the results table consumed by
//! downstream economics: one row per opened site with its sized ports, PV,
//! and storage, plus the node-to-site assignments for coverage reporting.

use std::time::Duration;

use serde::Serialize;

use solsite_core::{CandidateId, CandidateSite, NodeId};

use super::problem::SitingProblem;
use super::solver::SolvedModel;

/// A candidate's open-site value below this is treated as closed; MILP
/// backends report binaries with floating-point slop.
const OPEN_THRESHOLD: f64 = 0.5;

/// Assignment fractions at or below this are solver noise, not coverage.
const ASSIGN_TOLERANCE: f64 = 1e-6;

/// One row of the results table: an opened site with its configuration.
#[derive(Debug, Clone, Serialize)]
pub struct OpenSite {
    /// Original candidate attributes, passed through for downstream use
    pub candidate: CandidateSite,
    /// Number of DCFC ports to install
    pub ports: u32,
    /// PV array size (kW)
    pub pv_kw: f64,
    /// Battery storage size (kWh)
    pub storage_kwh: f64,
    /// Capital cost of this configuration (USD)
    pub capex_usd: f64,
}

/// A demand node served by an open site.
#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub node: NodeId,
    pub site: CandidateId,
    /// Assignment fraction in (0, 1]
    pub fraction: f64,
}

/// Unweighted sums behind each objective term.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveBreakdown {
    /// Σ pred_daily_kwh over open sites
    pub utilization_kwh: f64,
    /// Σ equity_score over open sites
    pub equity: f64,
    /// Σ safety_penalty over open sites
    pub safety_penalty: f64,
    /// Σ grid_penalty over open sites
    pub grid_penalty: f64,
    /// Total capex in millions of USD (the scale the cost weight applies to)
    pub cost_millions: f64,
}

/// Complete solution to a siting problem.
#[derive(Debug, Clone, Serialize)]
pub struct SitingSolution {
    /// Opened sites with their configurations
    pub sites: Vec<OpenSite>,
    /// Node-to-site assignments above tolerance
    pub assignments: Vec<Assignment>,
    /// Weighted objective value, recomputed from the extracted rows
    pub objective_value: f64,
    /// Unweighted term sums
    pub breakdown: ObjectiveBreakdown,
    /// Total capital cost of all opened sites (USD)
    pub total_capex_usd: f64,
    /// Wall-clock solve duration
    pub solve_time: Duration,
    /// Backend that produced the solution
    pub backend_name: String,
    /// Termination note from the driver
    pub status_message: String,
}

impl SitingSolution {
    pub fn num_sites_open(&self) -> usize {
        self.sites.len()
    }

    pub fn total_ports(&self) -> u32 {
        self.sites.iter().map(|s| s.ports).sum()
    }

    pub fn total_pv_kw(&self) -> f64 {
        self.sites.iter().map(|s| s.pv_kw).sum()
    }

    pub fn total_storage_kwh(&self) -> f64 {
        self.sites.iter().map(|s| s.storage_kwh).sum()
    }

    /// Number of distinct demand nodes with an assignment.
    pub fn covered_nodes(&self) -> usize {
        let mut nodes: Vec<usize> = self.assignments.iter().map(|a| a.node.value()).collect();
        nodes.sort_unstable();
        nodes.dedup();
        nodes.len()
    }

    /// Format a human-readable summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Siting Solution Summary\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Backend: {}\n", self.backend_name));
        s.push_str(&format!("Objective: {:.3}\n", self.objective_value));
        s.push_str(&format!(
            "Sites Open: {} ({} ports, {:.0} kW PV, {:.0} kWh storage)\n",
            self.num_sites_open(),
            self.total_ports(),
            self.total_pv_kw(),
            self.total_storage_kwh()
        ));
        s.push_str(&format!("Total CapEx: ${:.2}\n", self.total_capex_usd));
        s.push_str(&format!("Nodes Covered: {}\n", self.covered_nodes()));
        s.push_str(&format!("Solve Time: {:.2?}\n", self.solve_time));

        if !self.sites.is_empty() {
            s.push_str("\nOpened Sites:\n");
            for site in &self.sites {
                s.push_str(&format!(
                    "  [OPEN] cand {} at ({:.0}, {:.0}) - {} ports, {:.1} kW PV, {:.1} kWh storage, ${:.0}\n",
                    site.candidate.id.value(),
                    site.candidate.x_m,
                    site.candidate.y_m,
                    site.ports,
                    site.pv_kw,
                    site.storage_kwh,
                    site.capex_usd
                ));
            }
        }

        s
    }
}

/// Extract the results table from a solved model.
///
/// A site is open when its binary exceeds 0.5. No validation beyond that
/// threshold: the open-linked constraints already guarantee every row sits
/// inside the configured bounds, and the objective value is recomputed from
/// the extracted rows so it matches the table exactly.
pub fn extract_solution(problem: &SitingProblem, solved: &SolvedModel) -> SitingSolution {
    let values = &solved.values;
    let rates = &problem.capex;

    let mut sites = Vec::new();
    let mut breakdown = ObjectiveBreakdown::default();
    let mut total_capex = 0.0;

    for (i, cand) in problem.candidates.iter().enumerate() {
        if values.open[i] < OPEN_THRESHOLD {
            continue;
        }
        let ports = values.ports[i].round().max(0.0) as u32;
        let pv_kw = values.pv_kw[i].max(0.0);
        let storage_kwh = values.storage_kwh[i].max(0.0);
        let capex_usd = cand.site_capex_usd
            + pv_kw * rates.pv_per_kw_usd
            + storage_kwh * rates.storage_per_kwh_usd
            + f64::from(ports) * rates.per_port_usd;

        breakdown.utilization_kwh += cand.pred_daily_kwh;
        breakdown.equity += cand.equity_score;
        breakdown.safety_penalty += cand.safety_penalty;
        breakdown.grid_penalty += cand.grid_penalty;
        total_capex += capex_usd;

        sites.push(OpenSite {
            candidate: cand.clone(),
            ports,
            pv_kw,
            storage_kwh,
            capex_usd,
        });
    }
    breakdown.cost_millions = total_capex / 1e6;

    let mut assignments = Vec::new();
    for (i, row) in values.assign.iter().enumerate() {
        for (j, &fraction) in row.iter().enumerate() {
            if fraction > ASSIGN_TOLERANCE {
                assignments.push(Assignment {
                    node: problem.demand_nodes[j].id,
                    site: problem.candidates[i].id,
                    fraction,
                });
            }
        }
    }

    let w = &problem.config.weights;
    let objective_value = w.util * breakdown.utilization_kwh + w.equity * breakdown.equity
        - w.safety_penalty * breakdown.safety_penalty
        - w.grid_penalty * breakdown.grid_penalty
        - w.npc_cost * breakdown.cost_millions;

    SitingSolution {
        sites,
        assignments,
        objective_value,
        breakdown,
        total_capex_usd: total_capex,
        solve_time: solved.solve_time,
        backend_name: solved.backend.display_name().to_string(),
        status_message: solved.status_message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::problem::SitingProblemBuilder;
    use super::super::solver::{SiteValues, SolverBackend};
    use solsite_core::{CandidateSite, SitingConfig};

    fn solved_from_values(
        open: Vec<f64>,
        ports: Vec<f64>,
        pv_kw: Vec<f64>,
        storage_kwh: Vec<f64>,
        assign: Vec<Vec<f64>>,
    ) -> SolvedModel {
        SolvedModel {
            values: SiteValues {
                open,
                ports,
                pv_kw,
                storage_kwh,
                assign,
            },
            backend: SolverBackend::Highs,
            solve_time: Duration::from_millis(5),
            status_message: "test".to_string(),
        }
    }

    fn two_candidate_problem() -> SitingProblem {
        SitingProblemBuilder::new(SitingConfig::default())
            .candidate(
                CandidateSite::new(0, 0.0, 0.0)
                    .with_pred_daily_kwh(400.0)
                    .with_equity_score(0.6)
                    .with_safety_penalty(0.1)
                    .with_grid_penalty(0.2)
                    .with_site_capex(250_000.0),
            )
            .candidate(
                CandidateSite::new(1, 100_000.0, 0.0)
                    .with_pred_daily_kwh(300.0)
                    .with_site_capex(250_000.0),
            )
            .self_demand()
            .build()
            .unwrap()
    }

    #[test]
    fn test_open_threshold() {
        let problem = two_candidate_problem();
        // Site 0 open (0.99), site 1 closed (0.01 of floating slop).
        let solved = solved_from_values(
            vec![0.99, 0.01],
            vec![4.2, 0.0],
            vec![120.0, 0.0],
            vec![80.0, 0.0],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        assert_eq!(solution.num_sites_open(), 1);

        let site = &solution.sites[0];
        assert_eq!(site.candidate.id.value(), 0);
        assert_eq!(site.ports, 4); // 4.2 rounds to the integer the solver meant
        assert_eq!(site.pv_kw, 120.0);
    }

    #[test]
    fn test_capex_recomputed_from_rows() {
        let problem = two_candidate_problem();
        let solved = solved_from_values(
            vec![1.0, 0.0],
            vec![4.0, 0.0],
            vec![100.0, 0.0],
            vec![50.0, 0.0],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        // 250k site + 100 kW * 1600 + 50 kWh * 600 + 4 * 65k
        let expected = 250_000.0 + 160_000.0 + 30_000.0 + 260_000.0;
        assert!((solution.total_capex_usd - expected).abs() < 1e-6);
        assert!((solution.breakdown.cost_millions - expected / 1e6).abs() < 1e-12);
    }

    #[test]
    fn test_assignment_tolerance() {
        let problem = two_candidate_problem();
        let solved = solved_from_values(
            vec![1.0, 0.0],
            vec![4.0, 0.0],
            vec![50.0, 0.0],
            vec![0.0, 0.0],
            // 1e-9 is solver noise, 0.8 is real coverage
            vec![vec![1e-9, 0.8], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        assert_eq!(solution.assignments.len(), 1);
        assert_eq!(solution.assignments[0].node.value(), 1);
        assert_eq!(solution.assignments[0].site.value(), 0);
        assert_eq!(solution.covered_nodes(), 1);
    }

    #[test]
    fn test_summary_contains_totals() {
        let problem = two_candidate_problem();
        let solved = solved_from_values(
            vec![1.0, 1.0],
            vec![4.0, 5.0],
            vec![50.0, 60.0],
            vec![0.0, 10.0],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        let summary = solution.summary();
        assert!(summary.contains("Sites Open: 2"));
        assert!(summary.contains("9 ports"));
        assert!(summary.contains("[OPEN] cand 0"));
    }

    #[test]
    fn test_solution_serializes() {
        let problem = two_candidate_problem();
        let solved = solved_from_values(
            vec![1.0, 0.0],
            vec![4.0, 0.0],
            vec![50.0, 0.0],
            vec![0.0, 0.0],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        let json = serde_json::to_string(&solution).unwrap();
        assert!(json.contains("\"ports\":4"));
        assert!(json.contains("\"total_capex_usd\""));
    }

    #[test]
    fn test_empty_solution_is_valid() {
        let problem = two_candidate_problem();
        let solved = solved_from_values(
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
        );

        let solution = extract_solution(&problem, &solved);
        assert_eq!(solution.num_sites_open(), 0);
        assert_eq!(solution.objective_value, 0.0);
        assert_eq!(solution.total_capex_usd, 0.0);
    }
}

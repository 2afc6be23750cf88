//! Model Builder
//!
//! Translates a validated [`SitingProblem`] into decision variables, the
//! weighted objective, and the full constraint set. Construction is pure:
//! no solver is touched and two builds from identical inputs produce
//! structurally equivalent models.

use good_lp::{constraint, variable, variables, Constraint, Expression, ProblemVariables, Variable};
use tracing::debug;

use solsite_core::SolsiteResult;

use super::problem::SitingProblem;

/// Handles to the per-candidate and per-pair decision variables.
///
/// Created fresh for every run and discarded after extraction; the solver is
/// the only mutator of their values.
#[derive(Debug)]
pub(crate) struct SiteVariables {
    /// open[i] in {0,1}
    pub open: Vec<Variable>,
    /// ports[i] integer in [0, ports_max]
    pub ports: Vec<Variable>,
    /// pv_kw[i] continuous in [0, pv_kw_max]
    pub pv_kw: Vec<Variable>,
    /// storage_kwh[i] continuous in [0, storage_kwh_max]
    pub storage_kwh: Vec<Variable>,
    /// assign[i][j] continuous in [0,1]; upper bound 0 when node j is out of
    /// detour range of candidate i
    pub assign: Vec<Vec<Variable>>,
}

/// A fully specified siting MILP, ready for a backend.
pub struct SitingModel {
    pub(crate) variables: ProblemVariables,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) site_vars: SiteVariables,
    num_variables: usize,
}

impl SitingModel {
    /// Total decision variable count (for structural comparison of builds).
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Total constraint count (for structural comparison of builds).
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Construct the siting MILP from problem data.
///
/// Fails with `Configuration` or `DimensionMismatch` before any variable is
/// created if the inputs are inconsistent; otherwise pure construction with
/// no side effects.
pub fn build_model(problem: &SitingProblem) -> SolsiteResult<SitingModel> {
    problem.validate()?;

    let cfg = &problem.config;
    let n_cand = problem.num_candidates();
    let n_node = problem.num_demand_nodes();
    let max_detour_km = cfg.max_detour_km();

    let mut vars = variables!();
    let mut num_variables = 0usize;

    let mut open: Vec<Variable> = Vec::with_capacity(n_cand);
    let mut ports: Vec<Variable> = Vec::with_capacity(n_cand);
    let mut pv_kw: Vec<Variable> = Vec::with_capacity(n_cand);
    let mut storage_kwh: Vec<Variable> = Vec::with_capacity(n_cand);

    for _ in 0..n_cand {
        open.push(vars.add(variable().binary()));
        // Lower bounds stay at 0; the linking constraints below enforce the
        // minimums only when the site is open.
        ports.push(vars.add(variable().integer().min(0.0).max(f64::from(cfg.ports_max))));
        pv_kw.push(vars.add(variable().min(0.0).max(cfg.pv_kw_max)));
        storage_kwh.push(vars.add(variable().min(0.0).max(cfg.storage_kwh_max)));
        num_variables += 4;
    }

    // Assignment fractions. A node out of detour range gets a zero upper
    // bound at creation, which is the whole of constraint "assignment
    // feasibility" for that pair; in-range pairs are linked to open below.
    let mut assign: Vec<Vec<Variable>> = Vec::with_capacity(n_cand);
    for i in 0..n_cand {
        let mut row = Vec::with_capacity(n_node);
        for j in 0..n_node {
            let reachable = problem.dist_km.km(i, j) <= max_detour_km;
            let upper = if reachable { 1.0 } else { 0.0 };
            row.push(vars.add(variable().min(0.0).max(upper)));
            num_variables += 1;
        }
        assign.push(row);
    }

    // Total capital cost: site capex for open sites plus sized equipment.
    let mut cost = Expression::from(0.0);
    for i in 0..n_cand {
        cost += problem.candidates[i].site_capex_usd * open[i];
        cost += problem.capex.pv_per_kw_usd * pv_kw[i];
        cost += problem.capex.storage_per_kwh_usd * storage_kwh[i];
        cost += problem.capex.per_port_usd * ports[i];
    }

    // Objective: utilization scores open sites by predicted throughput
    // directly; assignments affect feasibility only. Cost enters in
    // millions of USD so all five terms share a comparable scale.
    let w = &cfg.weights;
    let mut objective = Expression::from(0.0);
    for i in 0..n_cand {
        let cand = &problem.candidates[i];
        objective += (w.util * cand.pred_daily_kwh) * open[i];
        objective += (w.equity * cand.equity_score) * open[i];
        objective -= (w.safety_penalty * cand.safety_penalty) * open[i];
        objective -= (w.grid_penalty * cand.grid_penalty) * open[i];
    }
    objective -= (w.npc_cost / 1e6) * cost.clone();

    let mut constraints: Vec<Constraint> = Vec::new();

    // Assignment linked to open for reachable pairs.
    for i in 0..n_cand {
        for j in 0..n_node {
            if problem.dist_km.km(i, j) <= max_detour_km {
                constraints.push(constraint!(assign[i][j] <= open[i]));
            }
        }
    }

    // Soft coverage: at most one open site per node. Deliberately <= rather
    // than ==, so nodes with no reachable open site stay unassigned instead
    // of making the model infeasible.
    for j in 0..n_node {
        let mut covered = Expression::from(0.0);
        for i in 0..n_cand {
            covered += assign[i][j];
        }
        constraints.push(constraint!(covered <= 1.0));
    }

    // Big-M style linking: closed sites carry zero ports/PV/storage, open
    // sites meet the configured minimums.
    let ports_min = f64::from(cfg.ports_min);
    let ports_max = f64::from(cfg.ports_max);
    for i in 0..n_cand {
        constraints.push(constraint!(ports[i] >= ports_min * open[i]));
        constraints.push(constraint!(ports[i] <= ports_max * open[i]));
        constraints.push(constraint!(pv_kw[i] >= cfg.pv_kw_min * open[i]));
        constraints.push(constraint!(pv_kw[i] <= cfg.pv_kw_max * open[i]));
        constraints.push(constraint!(storage_kwh[i] <= cfg.storage_kwh_max * open[i]));
    }

    // Spacing exclusion: never open both members of a too-close pair.
    let close_pairs = problem.close_pairs();
    for &(i, k) in &close_pairs {
        constraints.push(constraint!(open[i] + open[k] <= 1.0));
    }

    // Budget.
    constraints.push(constraint!(cost.clone() <= cfg.budget_usd));

    // Site count.
    let mut open_count = Expression::from(0.0);
    for i in 0..n_cand {
        open_count += open[i];
    }
    constraints.push(constraint!(open_count <= f64::from(cfg.max_sites)));

    debug!(
        candidates = n_cand,
        demand_nodes = n_node,
        close_pairs = close_pairs.len(),
        variables = num_variables,
        constraints = constraints.len(),
        "siting model built"
    );

    Ok(SitingModel {
        variables: vars,
        objective,
        constraints,
        site_vars: SiteVariables {
            open,
            ports,
            pv_kw,
            storage_kwh,
            assign,
        },
        num_variables,
    })
}

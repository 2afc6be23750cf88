//! Solar DCFC facility-location MILP
//!
//! This module selects a budget-constrained subset of candidate sites for
//! solar-powered EV fast-charging stations, sizing each selected site's
//! charging ports, solar array, and battery storage.
//!
//! ## Problem Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SOLAR DCFC SITING                                                       │
//! │  ─────────────────                                                       │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Candidate sites with predicted demand, equity/safety/grid scores   │
//! │    • Demand nodes with population/traffic weights                       │
//! │    • Candidate-to-node distance matrix (km)                             │
//! │    • Capital cost rates and a total budget                              │
//! │                                                                          │
//! │  Decide:                                                                 │
//! │    • Which sites to open (binary)                                       │
//! │    • Ports per open site (integer), PV kW and storage kWh (continuous)  │
//! │    • Fractional node-to-site assignments (continuous, feasibility only) │
//! │                                                                          │
//! │  Maximize:                                                               │
//! │    Weighted utilization + equity - safety - grid conflict - cost        │
//! │                                                                          │
//! │  Subject to:                                                             │
//! │    • Budget, site count, NEVI-style minimum spacing between open sites  │
//! │    • Detour-limited soft coverage of demand nodes                       │
//! │    • Open-linked sizing bounds (closed site => everything zero)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## MILP Formulation
//!
//! ```text
//! maximize    w_util Σ open[i]·kwh[i] + w_eq Σ open[i]·equity[i]
//!             - w_safe Σ open[i]·safety[i] - w_grid Σ open[i]·grid[i]
//!             - w_cost · cost / 1e6
//!
//! where cost = Σ open[i]·site_capex[i] + pv[i]·pv_rate
//!              + storage[i]·storage_rate + ports[i]·port_rate
//!
//! subject to:
//!   assign[i,j] ≤ open[i]            if dist[i,j] ≤ detour, else assign[i,j] = 0
//!   Σ_i assign[i,j] ≤ 1              soft coverage, unreachable nodes stay unassigned
//!   ports_min·open[i] ≤ ports[i] ≤ ports_max·open[i]
//!   pv_min·open[i] ≤ pv[i] ≤ pv_max·open[i]
//!   storage[i] ≤ storage_max·open[i]
//!   open[i] + open[k] ≤ 1            for candidate pairs closer than min spacing
//!   cost ≤ budget,  Σ open[i] ≤ max_sites
//!   open[i] ∈ {0,1},  ports[i] ∈ ℤ
//! ```
//!
//! ## Big-M Linking
//!
//! "Closed implies zero" is enforced structurally by multiplying each sizing
//! bound with the open binary (`ports ≤ ports_max·open` and so on). This is
//! the standard MILP idiom for conditional bounds; indicator constraints are
//! only worth considering on backends without efficient big-M handling.
//!
//! The assignment variables influence feasibility only: utilization in the
//! objective scores `open[i]·kwh[i]` directly, so coverage never drives the
//! score. Keep that decoupling unless requirements change.
//!
//! ## References
//!
//! - **Huangfu & Hall (2018)**: "Parallelizing the dual revised simplex
//!   method", doi:10.1007/s12532-017-0130-5 (the HiGHS backend)
//! - **Current & Schilling (1990)**: "Analysis of errors due to demand data
//!   aggregation in the set covering and maximal covering location problems"

mod model;
mod problem;
mod solution;
mod solver;

pub use model::{build_model, SitingModel};
pub use problem::{SitingProblem, SitingProblemBuilder};
pub use solution::{extract_solution, Assignment, ObjectiveBreakdown, OpenSite, SitingSolution};
pub use solver::{solve_model, OptionKeys, SolvedModel, SolverBackend};

use solsite_core::{SolsiteResult, SolverConfig};

/// Build, solve, and extract in one call.
///
/// # Example
///
/// ```no_run
/// use solsite_opt::siting::{optimize, SitingProblemBuilder};
/// use solsite_core::{CandidateSite, SitingConfig, SolverConfig};
///
/// let problem = SitingProblemBuilder::new(SitingConfig::default())
///     .candidate(CandidateSite::new(0, 0.0, 0.0).with_pred_daily_kwh(400.0))
///     .self_demand()
///     .build()?;
///
/// let solution = optimize(&problem, &SolverConfig::default())?;
/// println!("{}", solution.summary());
/// # Ok::<(), solsite_core::SolsiteError>(())
/// ```
pub fn optimize(
    problem: &SitingProblem,
    solver: &SolverConfig,
) -> SolsiteResult<SitingSolution> {
    let model = build_model(problem)?;
    let solved = solve_model(model, solver)?;
    Ok(extract_solution(problem, &solved))
}

//! # solsite-opt: Facility-Location MILP for Solar DCFC Siting
//!
//! This crate selects a budget-constrained subset of candidate sites for
//! solar-powered EV fast-charging stations, sizing each selected site's
//! charging ports, solar array, and battery storage to maximize a weighted
//! multi-objective score.
//!
//! ## Pipeline
//!
//! Three components run in sequence, with no shared state between runs:
//!
//! | Step | Entry point | Output |
//! |------|-------------|--------|
//! | Model Builder | [`siting::build_model`] | variables + objective + constraints |
//! | Solver Driver | [`siting::solve_model`] | loaded variable values |
//! | Solution Extractor | [`siting::extract_solution`] | opened-site table |
//!
//! [`siting::optimize`] chains all three. The solve step blocks for up to
//! the configured time limit; the backend may parallelize branch-and-bound
//! internally, but the caller-facing flow is single-threaded.
//!
//! ## Backends
//!
//! MILP backends are cargo features: `solver-highs` (default) and
//! `solver-cbc`. The driver maps the generic time-limit/gap knobs to each
//! backend's option names through a small strategy table, so adding a
//! backend does not touch the solve logic.
//!
//! ## Example
//!
//! ```no_run
//! use solsite_opt::siting::{optimize, SitingProblemBuilder};
//! use solsite_core::{CandidateSite, SitingConfig, SolverConfig};
//!
//! let problem = SitingProblemBuilder::new(SitingConfig::default())
//!     .candidate(
//!         CandidateSite::new(0, 0.0, 0.0)
//!             .with_pred_daily_kwh(420.0)
//!             .with_equity_score(0.7)
//!             .with_site_capex(250_000.0),
//!     )
//!     .self_demand()
//!     .build()?;
//!
//! let solution = optimize(&problem, &SolverConfig::default())?;
//! for site in &solution.sites {
//!     println!(
//!         "open candidate {}: {} ports, {:.0} kW PV",
//!         site.candidate.id.value(),
//!         site.ports,
//!         site.pv_kw
//!     );
//! }
//! # Ok::<(), solsite_core::SolsiteError>(())
//! ```

pub mod siting;

pub use siting::{
    build_model, extract_solution, optimize, solve_model, Assignment, ObjectiveBreakdown,
    OpenSite, SitingModel, SitingProblem, SitingProblemBuilder, SitingSolution, SolvedModel,
    SolverBackend,
};

// Re-export the core data model so callers need a single dependency.
pub use solsite_core::{
    CandidateId, CandidateSite, CapexRates, DemandNode, DistanceMatrix, NodeId, ObjectiveWeights,
    SitingConfig, SolsiteError, SolsiteResult, SolverConfig,
};

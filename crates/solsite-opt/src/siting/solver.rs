//! Solver Driver
//!
//! Hands a built [`SitingModel`] to a MILP backend, mapping the two generic
//! stopping knobs (wall-clock limit, relative gap) to backend-specific
//! option names, and interprets the termination status. There is no retry:
//! infeasible and unbounded outcomes propagate to the caller, who may widen
//! constraints and resubmit.

use std::time::{Duration, Instant};

#[cfg(any(feature = "solver-highs", feature = "solver-cbc"))]
use good_lp::Solution;
use tracing::{debug, info};

use solsite_core::{SolsiteError, SolsiteResult, SolverConfig};

use super::model::{SiteVariables, SitingModel};

/// Diagnostic attached to infeasible terminations, naming the parameters
/// that most commonly cause them.
const INFEASIBLE_HINT: &str = "no feasible site configuration satisfies all hard constraints. \
     This typically occurs when: \
     min_spacing_km is too large relative to candidate site density; \
     max_detour_m is too small (no sites within reach of some demand nodes); \
     budget_usd is too low to open any valid configuration. \
     Consider relaxing these parameters and resubmitting.";

const UNBOUNDED_HINT: &str =
    "the objective admits an unbounded direction; check the objective weights.";

/// Available MILP backends.
///
/// Both variants always parse; attempting to solve with a backend whose
/// cargo feature was not compiled in fails with a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverBackend {
    /// HiGHS, branch-and-cut. Built from vendored sources, the default.
    Highs,
    /// COIN-OR CBC. Links against the system libraries, opt-in.
    Cbc,
}

/// Backend-specific option names for the two generic solver knobs.
///
/// The driver consults this table instead of branching on option spellings
/// inline, which keeps adding a backend a one-row change.
#[derive(Debug, Clone, Copy)]
pub struct OptionKeys {
    /// Wall-clock limit in seconds
    pub time_limit: &'static str,
    /// Relative MIP gap tolerance
    pub mip_gap: &'static str,
}

impl SolverBackend {
    /// Parse a backend from its configured name.
    pub fn from_name(name: &str) -> SolsiteResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "highs" => Ok(SolverBackend::Highs),
            "cbc" => Ok(SolverBackend::Cbc),
            other => Err(SolsiteError::Configuration(format!(
                "unknown solver backend '{}'; expected one of: highs, cbc",
                other
            ))),
        }
    }

    /// Get the display name for this backend.
    pub fn display_name(&self) -> &'static str {
        match self {
            SolverBackend::Highs => "HiGHS",
            SolverBackend::Cbc => "CBC",
        }
    }

    /// The option-name row for this backend.
    pub fn option_keys(&self) -> OptionKeys {
        match self {
            SolverBackend::Highs => OptionKeys {
                time_limit: "time_limit",
                mip_gap: "mip_rel_gap",
            },
            SolverBackend::Cbc => OptionKeys {
                time_limit: "seconds",
                mip_gap: "ratioGap",
            },
        }
    }
}

/// Per-variable values loaded back from the solver.
#[derive(Debug, Clone)]
pub(crate) struct SiteValues {
    pub open: Vec<f64>,
    pub ports: Vec<f64>,
    pub pv_kw: Vec<f64>,
    pub storage_kwh: Vec<f64>,
    pub assign: Vec<Vec<f64>>,
}

/// A solved model: the decision-variable values plus solve metadata.
///
/// The backend stops at proven optimality or at the configured time/gap
/// limit; both outcomes are accepted and look identical here. Callers that
/// need the distinction should tighten `mip_gap` and re-run.
#[derive(Debug, Clone)]
pub struct SolvedModel {
    pub(crate) values: SiteValues,
    /// Backend that produced the values
    pub backend: SolverBackend,
    /// Wall-clock solve duration
    pub solve_time: Duration,
    /// Human-readable termination note
    pub status_message: String,
}

/// Solve a built model with the configured backend.
///
/// The three-way termination branch is the heart of this driver:
/// infeasible and unbounded fail with their dedicated errors, any usable
/// primal solution (optimal, or feasible when the gap was not closed within
/// the time limit) is loaded and returned, and anything else is a backend
/// failure.
pub fn solve_model(model: SitingModel, config: &SolverConfig) -> SolsiteResult<SolvedModel> {
    config.validate()?;
    let backend = SolverBackend::from_name(&config.name)?;

    info!(
        backend = backend.display_name(),
        time_limit_s = config.time_limit_s,
        mip_gap = config.mip_gap,
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "solving siting MILP"
    );

    let start = Instant::now();
    let values = match backend {
        #[cfg(feature = "solver-highs")]
        SolverBackend::Highs => solve_with_highs(model, config)?,
        #[cfg(feature = "solver-cbc")]
        SolverBackend::Cbc => solve_with_cbc(model, config)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(SolsiteError::Configuration(format!(
                "solver backend '{}' was not enabled at compile time",
                other.display_name()
            )))
        }
    };
    let solve_time = start.elapsed();
    debug!(elapsed_ms = solve_time.as_millis() as u64, "solve finished");

    Ok(SolvedModel {
        values,
        backend,
        solve_time,
        status_message: format!(
            "{} accepted a solution (optimal or within {:.0}s / {:.2}% gap limits)",
            backend.display_name(),
            config.time_limit_s,
            config.mip_gap * 100.0
        ),
    })
}

#[cfg(feature = "solver-highs")]
fn solve_with_highs(model: SitingModel, config: &SolverConfig) -> SolsiteResult<SiteValues> {
    use good_lp::solvers::highs::highs;
    use good_lp::SolverModel;

    let keys = SolverBackend::Highs.option_keys();
    let SitingModel {
        variables,
        objective,
        constraints,
        site_vars,
        ..
    } = model;

    let mut problem = variables
        .maximise(objective)
        .using(highs)
        .set_option(keys.time_limit, config.time_limit_s)
        .set_option(keys.mip_gap, config.mip_gap);
    for c in constraints {
        problem = problem.with(c);
    }

    let solution = problem.solve().map_err(map_resolution_error)?;
    Ok(read_values(&solution, &site_vars))
}

#[cfg(feature = "solver-cbc")]
fn solve_with_cbc(model: SitingModel, config: &SolverConfig) -> SolsiteResult<SiteValues> {
    use good_lp::solvers::coin_cbc::coin_cbc;
    use good_lp::SolverModel;

    let keys = SolverBackend::Cbc.option_keys();
    let SitingModel {
        variables,
        objective,
        constraints,
        site_vars,
        ..
    } = model;

    let mut problem = variables.maximise(objective).using(coin_cbc);
    problem.set_parameter("logLevel", "0");
    problem.set_parameter(keys.time_limit, &config.time_limit_s.to_string());
    problem.set_parameter(keys.mip_gap, &config.mip_gap.to_string());
    for c in constraints {
        problem = problem.with(c);
    }

    let solution = problem.solve().map_err(map_resolution_error)?;
    Ok(read_values(&solution, &site_vars))
}

#[cfg(any(feature = "solver-highs", feature = "solver-cbc"))]
fn map_resolution_error(err: good_lp::ResolutionError) -> SolsiteError {
    use good_lp::ResolutionError;
    match err {
        ResolutionError::Infeasible => SolsiteError::Infeasible(INFEASIBLE_HINT.to_string()),
        ResolutionError::Unbounded => SolsiteError::Unbounded(UNBOUNDED_HINT.to_string()),
        other => SolsiteError::Solver(format!(
            "backend terminated without a usable status: {:?}",
            other
        )),
    }
}

#[cfg(any(feature = "solver-highs", feature = "solver-cbc"))]
fn read_values(solution: &impl Solution, vars: &SiteVariables) -> SiteValues {
    let value_of =
        |vs: &[good_lp::Variable]| -> Vec<f64> { vs.iter().map(|v| solution.value(*v)).collect() };
    SiteValues {
        open: value_of(&vars.open),
        ports: value_of(&vars.ports),
        pv_kw: value_of(&vars.pv_kw),
        storage_kwh: value_of(&vars.storage_kwh),
        assign: vars
            .assign
            .iter()
            .map(|row| row.iter().map(|v| solution.value(*v)).collect())
            .collect(),
    }
}

//! Unified error types for the solsite ecosystem
//!
//! This module provides a common error type [`SolsiteError`] shared by the
//! data-model and optimization crates. The variants mirror the failure
//! taxonomy of the siting pipeline: bad configuration and inconsistent input
//! shapes are detected before a model is built, while infeasibility,
//! unboundedness, and backend failures surface from the solve step.
//!
//! # Example
//!
//! ```ignore
//! use solsite_core::{SolsiteError, SolsiteResult};
//!
//! fn run(problem: &SitingProblem) -> SolsiteResult<SitingSolution> {
//!     let model = build_model(problem)?;
//!     let solved = solve_model(model, &solver_config)?;
//!     Ok(extract_solution(problem, &solved))
//! }
//! ```

use thiserror::Error;

/// Unified error type for all siting operations.
///
/// The propagation policy is strict: the core raises and never substitutes a
/// degraded or partial answer. An empty solution table is a valid optimal
/// outcome only when the solver proves it, never a fallback for failure.
#[derive(Error, Debug, Clone)]
pub enum SolsiteError {
    /// Missing or invalid configuration values; fatal, no retry.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input array or matrix shapes disagree with the candidate/node counts.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// No feasible assignment of opens/ports/pv/storage satisfies all hard
    /// constraints simultaneously. The message names the most probable
    /// offending parameters; relaxing and resubmitting is the caller's call.
    #[error("model infeasible: {0}")]
    Infeasible(String),

    /// The objective admits an unbounded improving direction. Should not
    /// occur with the bounded-variable formulation, but guarded against.
    #[error("model unbounded: {0}")]
    Unbounded(String),

    /// The backend terminated without a usable status.
    #[error("solver error: {0}")]
    Solver(String),
}

/// Convenience type alias for Results using SolsiteError.
pub type SolsiteResult<T> = Result<T, SolsiteError>;

// JSON configuration documents that fail to deserialize are configuration
// errors from the caller's point of view.
impl From<serde_json::Error> for SolsiteError {
    fn from(err: serde_json::Error) -> Self {
        SolsiteError::Configuration(err.to_string())
    }
}

//! # solsite-core: Siting Data Model Core
//!
//! Fundamental data structures for solar DCFC siting optimization: candidate
//! sites, demand nodes, the dense distance matrix, the run configuration
//! surface, and the unified error type.
//!
//! ## Design Philosophy
//!
//! Everything here is plain, owned data prepared once per optimization run:
//!
//! - **Candidates and demand nodes** are read-only inputs keyed by stable
//!   newtype IDs; the optimizer consumes them as per-index parameter arrays.
//! - **Configuration** is a typed, serde-backed surface; missing keys fail
//!   at deserialization and out-of-range values fail `validate()`, both
//!   before any model is built.
//! - **No shared state between runs**: repeated optimizations reconstruct
//!   their inputs bottom-up, so nothing in this crate caches or memoizes.
//!
//! ## Quick Start
//!
//! ```rust
//! use solsite_core::*;
//!
//! let candidates = vec![
//!     CandidateSite::new(0, 0.0, 0.0)
//!         .with_pred_daily_kwh(420.0)
//!         .with_equity_score(0.7)
//!         .with_site_capex(250_000.0),
//!     CandidateSite::new(1, 80_000.0, 0.0)
//!         .with_pred_daily_kwh(310.0)
//!         .with_equity_score(0.4)
//!         .with_site_capex(250_000.0),
//! ];
//!
//! // Candidates double as demand points in the reference configuration.
//! let nodes: Vec<DemandNode> = candidates
//!     .iter()
//!     .map(|c| DemandNode::new(c.id.value(), c.x_m, c.y_m, 1.0))
//!     .collect();
//!
//! let dist = DistanceMatrix::from_planar(&candidates, &nodes);
//! assert_eq!(dist.n_candidates(), 2);
//!
//! let config = SitingConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod candidate;
pub mod config;
pub mod distance;
pub mod error;

pub use candidate::{CandidateId, CandidateSite, DemandNode, NodeId};
pub use config::{CapexRates, ObjectiveWeights, SitingConfig, SolverConfig};
pub use distance::DistanceMatrix;
pub use error::{SolsiteError, SolsiteResult};

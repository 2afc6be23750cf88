//! Candidate site and demand node data structures
//!
//! Defines the immutable per-run inputs to the siting optimizer. Candidates
//! and demand nodes are created once from upstream feature data and are
//! read-only during optimization; the model builder consumes them as
//! per-index parameter arrays.

use serde::{Deserialize, Serialize};

/// Unique identifier for a candidate site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub usize);

impl CandidateId {
    pub fn new(id: usize) -> Self {
        CandidateId(id)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

/// Unique identifier for a demand node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn new(id: usize) -> Self {
        NodeId(id)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

/// A potential station location.
///
/// Coordinates are projected meters (the upstream pipeline works in a metric
/// CRS), which keeps the spacing-exclusion check a plain planar distance.
/// Scores are expected fully populated: upstream feature engineering fills
/// nulls (demand to 0, equity to its policy default) before candidates reach
/// the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    /// Stable identifier carried through to the solution table
    pub id: CandidateId,
    /// Projected x coordinate (m)
    pub x_m: f64,
    /// Projected y coordinate (m)
    pub y_m: f64,
    /// Predicted daily energy demand (kWh)
    pub pred_daily_kwh: f64,
    /// Equity score, expected range roughly [0, 1]
    pub equity_score: f64,
    /// Safety penalty (>= 0)
    pub safety_penalty: f64,
    /// Grid-conflict penalty (>= 0)
    pub grid_penalty: f64,
    /// Fixed site capital cost in USD (base site + civil + interconnect)
    pub site_capex_usd: f64,
}

impl CandidateSite {
    /// Create a candidate at a projected location with zeroed scores.
    pub fn new(id: usize, x_m: f64, y_m: f64) -> Self {
        Self {
            id: CandidateId::new(id),
            x_m,
            y_m,
            pred_daily_kwh: 0.0,
            equity_score: 0.0,
            safety_penalty: 0.0,
            grid_penalty: 0.0,
            site_capex_usd: 0.0,
        }
    }

    /// Set the predicted daily energy demand
    pub fn with_pred_daily_kwh(mut self, kwh: f64) -> Self {
        self.pred_daily_kwh = kwh;
        self
    }

    /// Set the equity score
    pub fn with_equity_score(mut self, score: f64) -> Self {
        self.equity_score = score;
        self
    }

    /// Set the safety penalty
    pub fn with_safety_penalty(mut self, penalty: f64) -> Self {
        self.safety_penalty = penalty;
        self
    }

    /// Set the grid-conflict penalty
    pub fn with_grid_penalty(mut self, penalty: f64) -> Self {
        self.grid_penalty = penalty;
        self
    }

    /// Set the fixed site capital cost
    pub fn with_site_capex(mut self, usd: f64) -> Self {
        self.site_capex_usd = usd;
        self
    }

    /// Planar distance to another candidate in meters.
    pub fn planar_distance_m(&self, other: &CandidateSite) -> f64 {
        (self.x_m - other.x_m).hypot(self.y_m - other.y_m)
    }
}

/// A point of aggregated population/traffic demand.
///
/// In the reference configuration demand nodes coincide with the candidate
/// set (demand is self-referential), but the two index sets stay independent
/// so a decoupled demand surface can be swapped in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandNode {
    pub id: NodeId,
    /// Projected x coordinate (m)
    pub x_m: f64,
    /// Projected y coordinate (m)
    pub y_m: f64,
    /// Population/traffic weight (>= 0)
    pub weight: f64,
}

impl DemandNode {
    pub fn new(id: usize, x_m: f64, y_m: f64, weight: f64) -> Self {
        Self {
            id: NodeId::new(id),
            x_m,
            y_m,
            weight,
        }
    }
}

//! Dense candidate-by-demand-node distance matrix
//!
//! Computed once before model construction and read-only afterwards. Stored
//! row-major: row i holds the distances from candidate i to every demand
//! node, in kilometers.

use crate::candidate::{CandidateSite, DemandNode};
use crate::error::{SolsiteError, SolsiteResult};

/// Dense I x J matrix of candidate-to-demand-node distances in kilometers.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n_candidates: usize,
    n_nodes: usize,
    km: Vec<f64>,
}

impl DistanceMatrix {
    /// Build from a row-major vector of kilometers.
    ///
    /// Fails with [`SolsiteError::DimensionMismatch`] when the vector length
    /// is not `n_candidates * n_nodes`.
    pub fn from_vec(n_candidates: usize, n_nodes: usize, km: Vec<f64>) -> SolsiteResult<Self> {
        let expected = n_candidates * n_nodes;
        if km.len() != expected {
            return Err(SolsiteError::DimensionMismatch(format!(
                "distance matrix has {} entries, expected {} ({} candidates x {} nodes)",
                km.len(),
                expected,
                n_candidates,
                n_nodes
            )));
        }
        Ok(Self {
            n_candidates,
            n_nodes,
            km,
        })
    }

    /// Compute planar distances between projected coordinates.
    ///
    /// Both inputs carry projected meters; the result is in kilometers,
    /// matching what the upstream pipeline feeds the optimizer.
    pub fn from_planar(candidates: &[CandidateSite], nodes: &[DemandNode]) -> Self {
        let mut km = Vec::with_capacity(candidates.len() * nodes.len());
        for cand in candidates {
            for node in nodes {
                let d_m = (cand.x_m - node.x_m).hypot(cand.y_m - node.y_m);
                km.push(d_m / 1000.0);
            }
        }
        Self {
            n_candidates: candidates.len(),
            n_nodes: nodes.len(),
            km,
        }
    }

    /// Distance from candidate `i` to demand node `j` in kilometers.
    pub fn km(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.n_candidates && j < self.n_nodes);
        self.km[i * self.n_nodes + j]
    }

    pub fn n_candidates(&self) -> usize {
        self.n_candidates
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }
}

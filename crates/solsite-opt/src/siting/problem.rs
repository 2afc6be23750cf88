//! Siting problem data structures
//!
//! Combines candidates, demand nodes, the distance matrix, capital cost
//! rates, and the run configuration into one validated input bundle for the
//! model builder.

use solsite_core::{
    CandidateSite, CapexRates, DemandNode, DistanceMatrix, SitingConfig, SolsiteError,
    SolsiteResult,
};

/// Full input to one siting optimization run.
///
/// Construction is cheap and side-effect free; repeated runs (for example a
/// rerun with different weights) rebuild the problem bottom-up each time.
#[derive(Debug, Clone)]
pub struct SitingProblem {
    /// Candidate stations, index-aligned with the distance matrix rows
    pub candidates: Vec<CandidateSite>,
    /// Demand nodes, index-aligned with the distance matrix columns
    pub demand_nodes: Vec<DemandNode>,
    /// Candidate-by-node distances in kilometers
    pub dist_km: DistanceMatrix,
    /// Capital cost rates for PV, storage, and ports
    pub capex: CapexRates,
    /// Scalar knobs and objective weights
    pub config: SitingConfig,
}

impl SitingProblem {
    pub fn new(
        candidates: Vec<CandidateSite>,
        demand_nodes: Vec<DemandNode>,
        dist_km: DistanceMatrix,
        capex: CapexRates,
        config: SitingConfig,
    ) -> Self {
        Self {
            candidates,
            demand_nodes,
            dist_km,
            capex,
            config,
        }
    }

    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    pub fn num_demand_nodes(&self) -> usize {
        self.demand_nodes.len()
    }

    /// Validate configuration values and input shapes.
    ///
    /// Runs before every model construction. Shape disagreements surface as
    /// [`SolsiteError::DimensionMismatch`]; value problems (including
    /// non-finite scores, which the upstream pipeline should have filled)
    /// surface as [`SolsiteError::Configuration`].
    pub fn validate(&self) -> SolsiteResult<()> {
        self.config.validate()?;
        self.capex.validate()?;

        if self.candidates.is_empty() {
            return Err(SolsiteError::Configuration(
                "no candidate sites provided".into(),
            ));
        }
        if self.dist_km.n_candidates() != self.candidates.len() {
            return Err(SolsiteError::DimensionMismatch(format!(
                "distance matrix has {} rows but there are {} candidates",
                self.dist_km.n_candidates(),
                self.candidates.len()
            )));
        }
        if self.dist_km.n_nodes() != self.demand_nodes.len() {
            return Err(SolsiteError::DimensionMismatch(format!(
                "distance matrix has {} columns but there are {} demand nodes",
                self.dist_km.n_nodes(),
                self.demand_nodes.len()
            )));
        }

        for cand in &self.candidates {
            let named = [
                ("pred_daily_kwh", cand.pred_daily_kwh),
                ("equity_score", cand.equity_score),
                ("safety_penalty", cand.safety_penalty),
                ("grid_penalty", cand.grid_penalty),
                ("site_capex_usd", cand.site_capex_usd),
            ];
            for (name, value) in named {
                if !value.is_finite() {
                    return Err(SolsiteError::Configuration(format!(
                        "candidate {} has non-finite {}; fill scores upstream before optimizing",
                        cand.id.value(),
                        name
                    )));
                }
            }
        }
        for node in &self.demand_nodes {
            if !node.weight.is_finite() || node.weight < 0.0 {
                return Err(SolsiteError::Configuration(format!(
                    "demand node {} has invalid weight {}",
                    node.id.value(),
                    node.weight
                )));
            }
        }
        Ok(())
    }

    /// Unordered candidate pairs closer than the minimum spacing.
    ///
    /// Dense O(I^2) scan over planar coordinates; fine for candidate counts
    /// in the hundreds. A spatial index would produce the identical pair set
    /// at larger scale.
    pub fn close_pairs(&self) -> Vec<(usize, usize)> {
        let min_spacing_m = self.config.min_spacing_km * 1000.0;
        let mut pairs = Vec::new();
        for i in 0..self.candidates.len() {
            for k in (i + 1)..self.candidates.len() {
                if self.candidates[i].planar_distance_m(&self.candidates[k]) < min_spacing_m {
                    pairs.push((i, k));
                }
            }
        }
        pairs
    }

    /// Capital cost of the cheapest viable open configuration at candidate `i`
    /// (minimum ports and PV, zero storage). Used for diagnostics.
    pub fn min_open_capex(&self, i: usize) -> f64 {
        self.candidates[i].site_capex_usd
            + self.config.pv_kw_min * self.capex.pv_per_kw_usd
            + f64::from(self.config.ports_min) * self.capex.per_port_usd
    }
}

/// Builder for assembling siting problems.
pub struct SitingProblemBuilder {
    candidates: Vec<CandidateSite>,
    demand_nodes: Vec<DemandNode>,
    dist_km: Option<DistanceMatrix>,
    capex: CapexRates,
    config: SitingConfig,
}

impl SitingProblemBuilder {
    pub fn new(config: SitingConfig) -> Self {
        Self {
            candidates: Vec::new(),
            demand_nodes: Vec::new(),
            dist_km: None,
            capex: CapexRates::default(),
            config,
        }
    }

    /// Set capital cost rates
    pub fn capex(mut self, capex: CapexRates) -> Self {
        self.capex = capex;
        self
    }

    /// Add a candidate site
    pub fn candidate(mut self, candidate: CandidateSite) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Add a demand node
    pub fn demand_node(mut self, node: DemandNode) -> Self {
        self.demand_nodes.push(node);
        self
    }

    /// Use the candidates themselves as demand nodes, each with unit weight.
    ///
    /// This is the reference configuration: demand is self-referential.
    pub fn self_demand(mut self) -> Self {
        self.demand_nodes = self
            .candidates
            .iter()
            .map(|c| DemandNode::new(c.id.value(), c.x_m, c.y_m, 1.0))
            .collect();
        self
    }

    /// Supply a precomputed distance matrix. When omitted, distances are
    /// computed from the projected coordinates at build time.
    pub fn distances(mut self, dist_km: DistanceMatrix) -> Self {
        self.dist_km = Some(dist_km);
        self
    }

    /// Assemble and validate the problem.
    pub fn build(self) -> SolsiteResult<SitingProblem> {
        let dist_km = match self.dist_km {
            Some(d) => d,
            None => DistanceMatrix::from_planar(&self.candidates, &self.demand_nodes),
        };
        let problem = SitingProblem::new(
            self.candidates,
            self.demand_nodes,
            dist_km,
            self.capex,
            self.config,
        );
        problem.validate()?;
        Ok(problem)
    }
}

//! Configuration surface for one optimization run
//!
//! All knobs are supplied externally (typically the `opt` and `solver`
//! sections of a config document) and are invariant for the duration of a
//! run. Every field of [`SitingConfig`] is required when deserializing, so
//! an absent key fails before any model is constructed; `Default` provides
//! the reference values for programmatic construction.

use serde::{Deserialize, Serialize};

use crate::error::{SolsiteError, SolsiteResult};

/// Weights for the five competing objective terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Rewards predicted daily energy throughput at open sites
    pub util: f64,
    /// Rewards opening high-equity-score sites
    pub equity: f64,
    /// Penalizes opening high-safety-penalty sites
    pub safety_penalty: f64,
    /// Penalizes opening sites that conflict with grid infrastructure
    pub grid_penalty: f64,
    /// Penalizes total capital cost, applied to cost in millions of USD.
    ///
    /// The cost term is divided by 1e6 before weighting purely to bring its
    /// numeric scale in line with the other terms (roughly 0..1000 range).
    /// A weight of 0.8 therefore trades 0.8 objective points per million
    /// dollars of capex.
    pub npc_cost: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            util: 1.0,
            equity: 0.25,
            safety_penalty: 0.5,
            grid_penalty: 0.3,
            npc_cost: 0.8,
        }
    }
}

impl ObjectiveWeights {
    pub fn validate(&self) -> SolsiteResult<()> {
        let named = [
            ("util", self.util),
            ("equity", self.equity),
            ("safety_penalty", self.safety_penalty),
            ("grid_penalty", self.grid_penalty),
            ("npc_cost", self.npc_cost),
        ];
        for (name, w) in named {
            if !w.is_finite() || w < 0.0 {
                return Err(SolsiteError::Configuration(format!(
                    "objective weight '{}' must be finite and >= 0, got {}",
                    name, w
                )));
            }
        }
        Ok(())
    }
}

/// Scalar knobs for the siting model.
///
/// Field names follow the external configuration surface one-for-one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitingConfig {
    /// Rated power of one DCFC port (kW). Not used by the model itself but
    /// part of the run configuration consumed by downstream economics.
    pub port_power_kw: f64,
    /// Minimum ports at an open site
    pub ports_min: u32,
    /// Maximum ports at any site
    pub ports_max: u32,
    /// Minimum PV capacity at an open site (kW)
    pub pv_kw_min: f64,
    /// Maximum PV capacity at any site (kW)
    pub pv_kw_max: f64,
    /// Maximum battery storage at any site (kWh); no minimum other than 0
    pub storage_kwh_max: f64,
    /// Maximum number of sites to open
    pub max_sites: u32,
    /// Total capital budget (USD)
    pub budget_usd: f64,
    /// Minimum spacing between any two open sites (km)
    pub min_spacing_km: f64,
    /// Maximum demand-node detour; a node can only be assigned to a site
    /// within this distance (m)
    pub max_detour_m: f64,
    /// Objective weights
    pub weights: ObjectiveWeights,
}

impl Default for SitingConfig {
    fn default() -> Self {
        Self {
            port_power_kw: 150.0,
            ports_min: 4,
            ports_max: 8,
            pv_kw_min: 50.0,
            pv_kw_max: 300.0,
            storage_kwh_max: 500.0,
            max_sites: 40,
            budget_usd: 15_000_000.0,
            min_spacing_km: 50.0,
            max_detour_m: 5_000.0,
            weights: ObjectiveWeights::default(),
        }
    }
}

impl SitingConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Missing keys and malformed values are reported as
    /// [`SolsiteError::Configuration`].
    pub fn from_json_str(json: &str) -> SolsiteResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and cross-field consistency.
    pub fn validate(&self) -> SolsiteResult<()> {
        if !self.port_power_kw.is_finite() || self.port_power_kw <= 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "port_power_kw must be > 0, got {}",
                self.port_power_kw
            )));
        }
        if self.ports_min == 0 {
            return Err(SolsiteError::Configuration(
                "ports_min must be >= 1".into(),
            ));
        }
        if self.ports_min > self.ports_max {
            return Err(SolsiteError::Configuration(format!(
                "ports_min ({}) exceeds ports_max ({})",
                self.ports_min, self.ports_max
            )));
        }
        if !self.pv_kw_min.is_finite() || self.pv_kw_min < 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "pv_kw_min must be >= 0, got {}",
                self.pv_kw_min
            )));
        }
        if !self.pv_kw_max.is_finite() || self.pv_kw_min > self.pv_kw_max {
            return Err(SolsiteError::Configuration(format!(
                "pv_kw_min ({}) exceeds pv_kw_max ({})",
                self.pv_kw_min, self.pv_kw_max
            )));
        }
        if !self.storage_kwh_max.is_finite() || self.storage_kwh_max < 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "storage_kwh_max must be >= 0, got {}",
                self.storage_kwh_max
            )));
        }
        if !self.budget_usd.is_finite() || self.budget_usd < 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "budget_usd must be >= 0, got {}",
                self.budget_usd
            )));
        }
        if !self.min_spacing_km.is_finite() || self.min_spacing_km < 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "min_spacing_km must be >= 0, got {}",
                self.min_spacing_km
            )));
        }
        if !self.max_detour_m.is_finite() || self.max_detour_m <= 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "max_detour_m must be > 0, got {}",
                self.max_detour_m
            )));
        }
        self.weights.validate()
    }

    /// Maximum detour expressed in kilometers, the unit of the distance matrix.
    pub fn max_detour_km(&self) -> f64 {
        self.max_detour_m / 1000.0
    }
}

/// Capital cost rates applied to sized equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapexRates {
    /// PV array cost per kW installed
    pub pv_per_kw_usd: f64,
    /// Battery storage cost per kWh installed
    pub storage_per_kwh_usd: f64,
    /// Cost per DCFC port (charger hardware + install)
    pub per_port_usd: f64,
}

impl Default for CapexRates {
    fn default() -> Self {
        Self {
            pv_per_kw_usd: 1_600.0,
            storage_per_kwh_usd: 600.0,
            per_port_usd: 65_000.0,
        }
    }
}

impl CapexRates {
    pub fn validate(&self) -> SolsiteResult<()> {
        let named = [
            ("pv_per_kw_usd", self.pv_per_kw_usd),
            ("storage_per_kwh_usd", self.storage_per_kwh_usd),
            ("per_port_usd", self.per_port_usd),
        ];
        for (name, rate) in named {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SolsiteError::Configuration(format!(
                    "capex rate '{}' must be finite and >= 0, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}

/// Backend selection and stopping criteria for the MILP solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Backend name, e.g. "highs" or "cbc"
    pub name: String,
    /// Wall-clock time limit in seconds
    pub time_limit_s: f64,
    /// Relative MIP gap at which the solver may stop
    pub mip_gap: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            name: "highs".to_string(),
            time_limit_s: 600.0,
            mip_gap: 0.01,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolsiteResult<()> {
        if self.name.trim().is_empty() {
            return Err(SolsiteError::Configuration(
                "solver name must not be empty".into(),
            ));
        }
        if !self.time_limit_s.is_finite() || self.time_limit_s <= 0.0 {
            return Err(SolsiteError::Configuration(format!(
                "time_limit_s must be > 0, got {}",
                self.time_limit_s
            )));
        }
        if !self.mip_gap.is_finite() || self.mip_gap < 0.0 || self.mip_gap >= 1.0 {
            return Err(SolsiteError::Configuration(format!(
                "mip_gap must be in [0, 1), got {}",
                self.mip_gap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SitingConfig::default().validate().is_ok());
        assert!(CapexRates::default().validate().is_ok());
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        // budget_usd absent
        let json = r#"{
            "port_power_kw": 150.0,
            "ports_min": 4,
            "ports_max": 8,
            "pv_kw_min": 50.0,
            "pv_kw_max": 300.0,
            "storage_kwh_max": 500.0,
            "max_sites": 40,
            "min_spacing_km": 50.0,
            "max_detour_m": 5000.0,
            "weights": {
                "util": 1.0,
                "equity": 0.25,
                "safety_penalty": 0.5,
                "grid_penalty": 0.3,
                "npc_cost": 0.8
            }
        }"#;
        let err = SitingConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, SolsiteError::Configuration(_)));
        assert!(err.to_string().contains("budget_usd"));
    }

    #[test]
    fn test_full_document_parses() {
        let json = serde_json::to_string(&SitingConfig::default()).unwrap();
        let config = SitingConfig::from_json_str(&json).unwrap();
        assert_eq!(config, SitingConfig::default());
    }

    #[test]
    fn test_ports_ordering_rejected() {
        let config = SitingConfig {
            ports_min: 10,
            ports_max: 8,
            ..SitingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ports_min"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = SitingConfig {
            weights: ObjectiveWeights {
                util: -1.0,
                ..ObjectiveWeights::default()
            },
            ..SitingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_solver_gap_range() {
        let solver = SolverConfig {
            mip_gap: 1.5,
            ..SolverConfig::default()
        };
        assert!(solver.validate().is_err());
    }

    #[test]
    fn test_detour_conversion() {
        let config = SitingConfig {
            max_detour_m: 2500.0,
            ..SitingConfig::default()
        };
        assert!((config.max_detour_km() - 2.5).abs() < 1e-12);
    }
}

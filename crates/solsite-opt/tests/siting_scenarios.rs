//! End-to-end siting scenarios against the HiGHS backend
//!
//! Each test builds a small synthetic problem, runs the full
//! build/solve/extract pipeline, and checks the structural guarantees the
//! extracted table is supposed to carry.

#![cfg(feature = "solver-highs")]

use solsite_opt::siting::{build_model, optimize, solve_model, SitingProblemBuilder};
use solsite_opt::{
    CandidateSite, DemandNode, SitingConfig, SitingProblem, SitingSolution, SolverConfig,
};

const SITE_CAPEX: f64 = 250_000.0;

/// Opt-in solver/model logging via RUST_LOG.
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn candidate(id: usize, x_km: f64, y_km: f64, pred_daily_kwh: f64) -> CandidateSite {
    CandidateSite::new(id, x_km * 1000.0, y_km * 1000.0)
        .with_pred_daily_kwh(pred_daily_kwh)
        .with_equity_score(0.5)
        .with_safety_penalty(0.1)
        .with_grid_penalty(0.1)
        .with_site_capex(SITE_CAPEX)
}

fn solver() -> SolverConfig {
    SolverConfig {
        name: "highs".to_string(),
        time_limit_s: 30.0,
        mip_gap: 1e-6,
    }
}

/// Check every guarantee the extracted table is supposed to carry.
fn assert_solution_valid(problem: &SitingProblem, solution: &SitingSolution) {
    let cfg = &problem.config;

    // Open-implies-bounds.
    for site in &solution.sites {
        assert!(
            site.ports >= cfg.ports_min && site.ports <= cfg.ports_max,
            "ports {} outside [{}, {}]",
            site.ports,
            cfg.ports_min,
            cfg.ports_max
        );
        assert!(
            site.pv_kw >= cfg.pv_kw_min - 1e-6 && site.pv_kw <= cfg.pv_kw_max + 1e-6,
            "pv_kw {} outside [{}, {}]",
            site.pv_kw,
            cfg.pv_kw_min,
            cfg.pv_kw_max
        );
        assert!(
            site.storage_kwh >= 0.0 && site.storage_kwh <= cfg.storage_kwh_max + 1e-6,
            "storage_kwh {} outside [0, {}]",
            site.storage_kwh,
            cfg.storage_kwh_max
        );
    }

    // Budget and site count respected.
    assert!(
        solution.total_capex_usd <= cfg.budget_usd + 1.0,
        "capex {} exceeds budget {}",
        solution.total_capex_usd,
        cfg.budget_usd
    );
    assert!(solution.num_sites_open() <= cfg.max_sites as usize);

    // Spacing respected between every pair of opened sites.
    let min_spacing_m = cfg.min_spacing_km * 1000.0;
    for (a, site_a) in solution.sites.iter().enumerate() {
        for site_b in solution.sites.iter().skip(a + 1) {
            let d_m = site_a.candidate.planar_distance_m(&site_b.candidate);
            assert!(
                d_m >= min_spacing_m - 1e-3,
                "open sites {} and {} are {:.0} m apart, below {:.0} m",
                site_a.candidate.id.value(),
                site_b.candidate.id.value(),
                d_m,
                min_spacing_m
            );
        }
    }

    // Assignment validity: only open, in-range sites serve nodes.
    let open_ids: Vec<usize> = solution
        .sites
        .iter()
        .map(|s| s.candidate.id.value())
        .collect();
    for assignment in &solution.assignments {
        assert!(
            open_ids.contains(&assignment.site.value()),
            "node {} assigned to closed site {}",
            assignment.node.value(),
            assignment.site.value()
        );
        let i = problem
            .candidates
            .iter()
            .position(|c| c.id == assignment.site)
            .unwrap();
        let j = problem
            .demand_nodes
            .iter()
            .position(|n| n.id == assignment.node)
            .unwrap();
        assert!(
            problem.dist_km.km(i, j) <= cfg.max_detour_km() + 1e-9,
            "assignment beyond detour range"
        );
        assert!(assignment.fraction <= 1.0 + 1e-6);
    }
}

/// Scenario A: three candidates 100 km apart with 50 km spacing and a large
/// budget. Nothing binds, all three open at minimum-cost sizing.
#[test]
fn trivially_feasible_opens_all_sites() {
    init_logging();
    let config = SitingConfig {
        max_sites: 3,
        budget_usd: 50_000_000.0,
        ..SitingConfig::default()
    };
    let problem = SitingProblemBuilder::new(config)
        .candidate(candidate(0, 0.0, 0.0, 400.0))
        .candidate(candidate(1, 100.0, 0.0, 350.0))
        .candidate(candidate(2, 200.0, 0.0, 300.0))
        .self_demand()
        .build()
        .unwrap();

    let solution = optimize(&problem, &solver()).unwrap();

    assert_eq!(solution.num_sites_open(), 3);
    assert_solution_valid(&problem, &solution);

    // No term rewards oversizing, so every site sits at its minimums.
    for site in &solution.sites {
        assert_eq!(site.ports, problem.config.ports_min);
        assert!((site.pv_kw - problem.config.pv_kw_min).abs() < 1e-4);
        assert!(site.storage_kwh < 1e-4);
    }
}

/// Scenario B: two candidates 10 km apart under a 50 km spacing floor. At
/// most one opens, and it is the higher-demand one.
#[test]
fn spacing_conflict_opens_at_most_one() {
    let problem = SitingProblemBuilder::new(SitingConfig::default())
        .candidate(candidate(0, 0.0, 0.0, 400.0))
        .candidate(candidate(1, 10.0, 0.0, 300.0))
        .self_demand()
        .build()
        .unwrap();

    let solution = optimize(&problem, &solver()).unwrap();

    assert_eq!(solution.num_sites_open(), 1);
    assert_eq!(solution.sites[0].candidate.id.value(), 0);
    assert_solution_valid(&problem, &solution);
}

/// Scenario C: budget below the cheapest viable site. Zero open sites is
/// the optimum, not an error.
#[test]
fn exhausted_budget_opens_nothing() {
    let config = SitingConfig {
        budget_usd: 100_000.0,
        ..SitingConfig::default()
    };
    let problem = SitingProblemBuilder::new(config)
        .candidate(candidate(0, 0.0, 0.0, 400.0))
        .candidate(candidate(1, 100.0, 0.0, 350.0))
        .self_demand()
        .build()
        .unwrap();
    assert!(problem.min_open_capex(0) > problem.config.budget_usd);

    let solution = optimize(&problem, &solver()).unwrap();

    assert_eq!(solution.num_sites_open(), 0);
    assert!(solution.objective_value.abs() < 1e-9);
    assert!(solution.assignments.is_empty());
}

/// Scenario D: every demand node is beyond detour range. Coverage is a soft
/// constraint, so sites still open and nothing is assigned; the model must
/// not report infeasibility.
#[test]
fn unreachable_demand_is_not_infeasible() {
    let problem = SitingProblemBuilder::new(SitingConfig::default())
        .candidate(candidate(0, 0.0, 0.0, 400.0))
        .candidate(candidate(1, 100.0, 0.0, 350.0))
        .demand_node(DemandNode::new(0, 1_000_000.0, 1_000_000.0, 5.0))
        .demand_node(DemandNode::new(1, 1_200_000.0, 1_000_000.0, 3.0))
        .build()
        .unwrap();

    let solution = optimize(&problem, &solver()).unwrap();

    assert_eq!(solution.num_sites_open(), 2);
    assert!(solution.assignments.is_empty());
    assert_eq!(solution.covered_nodes(), 0);
    assert_solution_valid(&problem, &solution);
}

/// Scenario E: a moderately sized instance under a tight time limit. The
/// driver accepts the incumbent without raising and the table still holds
/// every bound.
#[test]
fn tight_time_limit_returns_feasible_solution() {
    init_logging();
    let config = SitingConfig {
        min_spacing_km: 5.0,
        ..SitingConfig::default()
    };
    let mut builder = SitingProblemBuilder::new(config);
    for row in 0..6 {
        for col in 0..10 {
            let id = row * 10 + col;
            let pred = 250.0 + 10.0 * (id % 7) as f64;
            builder = builder.candidate(candidate(id, col as f64 * 60.0, row as f64 * 60.0, pred));
        }
    }
    let problem = builder.self_demand().build().unwrap();

    let tight = SolverConfig {
        name: "highs".to_string(),
        time_limit_s: 0.5,
        mip_gap: 0.01,
    };
    let solution = optimize(&problem, &tight).unwrap();

    assert_solution_valid(&problem, &solution);
    // The 15M default budget pays for ~25 minimum-cost sites at most.
    assert!(solution.num_sites_open() <= problem.config.max_sites as usize);
}

/// Rebuilding and re-solving the identical problem lands on the same
/// optimum (same variable/constraint structure, deterministic backend).
#[test]
fn rebuild_and_resolve_is_reproducible() {
    let problem = SitingProblemBuilder::new(SitingConfig::default())
        .candidate(candidate(0, 0.0, 0.0, 400.0))
        .candidate(candidate(1, 100.0, 0.0, 350.0))
        .candidate(candidate(2, 200.0, 0.0, 300.0))
        .self_demand()
        .build()
        .unwrap();

    let model_a = build_model(&problem).unwrap();
    let model_b = build_model(&problem).unwrap();
    assert_eq!(model_a.num_variables(), model_b.num_variables());
    assert_eq!(model_a.num_constraints(), model_b.num_constraints());

    let first = extract_all(&problem, model_a);
    let second = extract_all(&problem, model_b);
    assert!((first.objective_value - second.objective_value).abs() < 1e-6);
    assert_eq!(first.num_sites_open(), second.num_sites_open());
}

fn extract_all(
    problem: &SitingProblem,
    model: solsite_opt::siting::SitingModel,
) -> SitingSolution {
    let solved = solve_model(model, &solver()).unwrap();
    solsite_opt::siting::extract_solution(problem, &solved)
}

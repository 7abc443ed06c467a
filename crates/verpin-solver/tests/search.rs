//! End-to-end behavior of the four search strategies against the in-memory
//! virtual-test oracle.

use verpin_core::cost::{CostFunction, Sum};
use verpin_core::dependency::{Dependency, VersionMapping};
use verpin_core::optimizer::Direction;
use verpin_core::runner::{Clause, LinearRunner, TestRunner, VirtualTest};
use verpin_core::version::{Version, VersionRange, VersionSpec};
use verpin_solver::algorithm::{build, AlgorithmKind, SolverConfig};
use verpin_util::errors::VerpinError;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn dep(name: &str, versions: &[&str]) -> Dependency {
    Dependency::new(
        name,
        versions.iter().map(|s| v(s)).collect(),
        VersionSpec::any(),
    )
}

/// A single test passing exactly when every named dependency is inside its
/// inclusive `[min, max]` interval.
fn range_test(entries: &[(&str, &str, &str)]) -> VirtualTest {
    let clause: Clause = entries
        .iter()
        .map(|(name, lo, hi)| {
            (
                name.to_string(),
                VersionRange::new(v(lo), v(hi)).unwrap(),
            )
        })
        .collect();
    VirtualTest::new(vec![clause])
}

/// Sums the first release component of every pinned version.
fn identity_cost() -> Box<dyn CostFunction> {
    Box::new(Sum::new(|ver: &Version| ver.components()[0] as f64))
}

fn mapping(pairs: &[(&str, &str)]) -> VersionMapping {
    pairs
        .iter()
        .map(|(name, ver)| (name.to_string(), v(ver)))
        .collect()
}

fn two_axis_deps() -> Vec<Dependency> {
    vec![dep("a", &["1.0", "2.0", "3.0"]), dep("b", &["1.0", "2.0"])]
}

/// Everything feasible: the AND over an empty test list is true.
fn all_feasible() -> Box<dyn TestRunner> {
    Box::new(LinearRunner::new(vec![]))
}

/// Nothing feasible: a test with no clause never passes.
fn never_feasible() -> Box<dyn TestRunner> {
    Box::new(LinearRunner::new(vec![VirtualTest::new(vec![])]))
}

/// Counts evaluations and checks each proposed mapping is complete and
/// admissible before delegating.
struct RecordingRunner {
    inner: LinearRunner,
    deps: Vec<Dependency>,
    evaluations: std::rc::Rc<std::cell::Cell<usize>>,
}

impl TestRunner for RecordingRunner {
    fn run_all(&mut self, mapping: &VersionMapping) -> Result<Vec<bool>, VerpinError> {
        self.evaluations.set(self.evaluations.get() + 1);
        assert_eq!(mapping.len(), self.deps.len());
        for dep in &self.deps {
            let pinned = mapping.get(dep.name()).expect("complete mapping");
            assert!(dep.admissible().contains(pinned));
        }
        self.inner.run_all(mapping)
    }
}

/// Fails every evaluation with an unrecoverable environment error.
struct BrokenRunner;

impl TestRunner for BrokenRunner {
    fn run_all(&mut self, _mapping: &VersionMapping) -> Result<Vec<bool>, VerpinError> {
        Err(VerpinError::Runner {
            message: "environment unavailable".to_string(),
        })
    }
}

#[test]
fn backtrack_returns_the_unique_best_feasible_leaf() {
    let runner = Box::new(LinearRunner::new(vec![range_test(&[
        ("a", "2.0", "3.0"),
        ("b", "1.0", "1.0"),
    ])]));
    let mut algo = build(
        AlgorithmKind::Backtrack,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 10,
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "3.0"), ("b", "1.0")]));
    assert_eq!(out.cost, 4.0);
}

#[test]
fn backtrack_is_deterministic() {
    let run_once = || {
        let runner = Box::new(LinearRunner::new(vec![range_test(&[("a", "1.0", "2.0")])]));
        build(
            AlgorithmKind::Backtrack,
            two_axis_deps(),
            runner,
            identity_cost(),
            Direction::Maximize,
            SolverConfig {
                iterations: 100,
                ..SolverConfig::default()
            },
        )
        .unwrap()
        .run()
        .unwrap()
    };
    assert_eq!(run_once(), run_once());
}

#[test]
fn backtrack_with_full_budget_finds_the_true_optimum() {
    let runner = Box::new(LinearRunner::new(vec![range_test(&[("a", "1.0", "2.0")])]));
    let mut algo = build(
        AlgorithmKind::Backtrack,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 6, // full Cartesian product
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "2.0"), ("b", "2.0")]));
    assert_eq!(out.cost, 4.0);
}

#[test]
fn backtrack_budget_aborts_mid_traversal() {
    // DFS visits (a=1, b=1) then (a=1, b=2); with a budget of 2 nothing
    // under a=2 or a=3 is ever evaluated.
    let evaluations = std::rc::Rc::new(std::cell::Cell::new(0));
    let runner = Box::new(RecordingRunner {
        inner: LinearRunner::new(vec![]),
        deps: two_axis_deps(),
        evaluations: evaluations.clone(),
    });
    let mut algo = build(
        AlgorithmKind::Backtrack,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 2,
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(evaluations.get(), 2);
    assert_eq!(out.mapping, mapping(&[("a", "1.0"), ("b", "2.0")]));
    assert_eq!(out.cost, 3.0);
}

#[test]
fn backtrack_exhausts_exactly_the_product_when_budget_allows() {
    let evaluations = std::rc::Rc::new(std::cell::Cell::new(0));
    let runner = Box::new(RecordingRunner {
        inner: LinearRunner::new(vec![]),
        deps: two_axis_deps(),
        evaluations: evaluations.clone(),
    });
    let mut algo = build(
        AlgorithmKind::Backtrack,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 100,
            ..SolverConfig::default()
        },
    )
    .unwrap();

    algo.run().unwrap();
    assert_eq!(evaluations.get(), 6);
}

#[test]
fn random_is_reproducible_under_a_seed() {
    let run_once = || {
        let runner = Box::new(LinearRunner::new(vec![range_test(&[("a", "1.0", "3.0")])]));
        build(
            AlgorithmKind::Random,
            two_axis_deps(),
            runner,
            identity_cost(),
            Direction::Minimize,
            SolverConfig {
                iterations: 40,
                seed: Some(42),
                ..SolverConfig::default()
            },
        )
        .unwrap()
        .run()
        .unwrap()
    };
    assert_eq!(run_once(), run_once());
}

#[test]
fn random_finds_the_only_feasible_mapping() {
    let runner = Box::new(LinearRunner::new(vec![range_test(&[
        ("a", "2.0", "2.0"),
        ("b", "1.0", "1.0"),
    ])]));
    let mut algo = build(
        AlgorithmKind::Random,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 200,
            seed: Some(3),
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "2.0"), ("b", "1.0")]));
    assert_eq!(out.cost, 3.0);
}

#[test]
fn annealing_seeds_the_optimizer_with_a_feasible_start() {
    // Only the starting mapping is feasible and neighbors never pass, so
    // the reported pair must be the start itself, with its cost reported in
    // the caller's direction (not sign-adjusted).
    let deps = vec![dep("a", &["1.0", "2.0", "3.0"])];
    let runner = Box::new(LinearRunner::new(vec![range_test(&[("a", "2.0", "2.0")])]));
    let mut algo = build(
        AlgorithmKind::Annealing,
        deps,
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 5,
            inimapping: Some(mapping(&[("a", "2.0")])),
            prob_restart: 0.0,
            seed: Some(1),
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "2.0")]));
    assert_eq!(out.cost, 2.0);
}

#[test]
fn annealing_climbs_to_the_maximum_of_a_free_axis() {
    let deps = vec![dep("a", &["1.0", "2.0", "3.0"])];
    let mut algo = build(
        AlgorithmKind::Annealing,
        deps,
        all_feasible(),
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 100,
            inimapping: Some(mapping(&[("a", "1.0")])),
            seed: Some(7),
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "3.0")]));
    assert_eq!(out.cost, 3.0);
}

#[test]
fn annealing_requires_an_initial_mapping() {
    let err = build(
        AlgorithmKind::Annealing,
        two_axis_deps(),
        all_feasible(),
        identity_cost(),
        Direction::Maximize,
        SolverConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, VerpinError::MissingInitialMapping { .. }));
}

#[test]
fn swarm_locates_the_only_feasible_cell() {
    let runner = Box::new(LinearRunner::new(vec![range_test(&[
        ("a", "3.0", "3.0"),
        ("b", "2.0", "2.0"),
    ])]));
    let mut algo = build(
        AlgorithmKind::Swarm,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Maximize,
        SolverConfig {
            iterations: 60,
            inimapping: Some(mapping(&[("a", "1.0"), ("b", "1.0")])),
            seed: Some(11),
            ..SolverConfig::default()
        },
    )
    .unwrap();

    let out = algo.run().unwrap();
    assert_eq!(out.mapping, mapping(&[("a", "3.0"), ("b", "2.0")]));
    assert_eq!(out.cost, 5.0);
}

#[test]
fn swarm_only_proposes_complete_admissible_mappings() {
    let evaluations = std::rc::Rc::new(std::cell::Cell::new(0));
    let runner = Box::new(RecordingRunner {
        inner: LinearRunner::new(vec![]),
        deps: two_axis_deps(),
        evaluations: evaluations.clone(),
    });
    let mut algo = build(
        AlgorithmKind::Swarm,
        two_axis_deps(),
        runner,
        identity_cost(),
        Direction::Minimize,
        SolverConfig {
            iterations: 20,
            particles: 5,
            inimapping: Some(mapping(&[("a", "2.0"), ("b", "1.0")])),
            seed: Some(5),
            ..SolverConfig::default()
        },
    )
    .unwrap();

    algo.run().unwrap();
    // 20 full-swarm steps, 5 particles, one evaluation each.
    assert_eq!(evaluations.get(), 100);
}

#[test]
fn every_strategy_reports_no_solution_distinctly() {
    for kind in AlgorithmKind::ALL {
        let mut algo = build(
            kind,
            two_axis_deps(),
            never_feasible(),
            identity_cost(),
            Direction::Maximize,
            SolverConfig {
                iterations: 30,
                inimapping: Some(mapping(&[("a", "1.0"), ("b", "1.0")])),
                seed: Some(2),
                ..SolverConfig::default()
            },
        )
        .unwrap();
        let err = algo.run().err().unwrap();
        assert!(matches!(err, VerpinError::NoSolution), "{kind}");
    }
}

#[test]
fn runner_environment_failures_propagate() {
    for kind in AlgorithmKind::ALL {
        let mut algo = build(
            kind,
            two_axis_deps(),
            Box::new(BrokenRunner),
            identity_cost(),
            Direction::Maximize,
            SolverConfig {
                iterations: 10,
                inimapping: Some(mapping(&[("a", "1.0"), ("b", "1.0")])),
                seed: Some(2),
                ..SolverConfig::default()
            },
        )
        .unwrap();
        let err = algo.run().err().unwrap();
        assert!(matches!(err, VerpinError::Runner { .. }), "{kind}");
    }
}

#[test]
fn empty_admissible_lists_are_rejected_before_search() {
    let narrow = Dependency::new("a", vec![v("1.0")], VersionSpec::parse(">=2.0").unwrap());
    let err = build(
        AlgorithmKind::Backtrack,
        vec![narrow],
        all_feasible(),
        identity_cost(),
        Direction::Maximize,
        SolverConfig::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, VerpinError::EmptyAdmissible { .. }));
}

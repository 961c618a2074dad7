//! Randomized restart driver with a wall-clock budget.
//!
//! Each restart shuffles the visitation order (Fisher–Yates) and runs a
//! [`SearchMode::FirstFeasible`] search. Only strictly smaller sets replace the
//! incumbent, so the incumbent size never increases. The budget is polled after
//! every completed restart; a restart is never interrupted.

use crate::config::SolveConfig;
use crate::domination::{DominationSearch, SearchMode, Solution};
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

// ============================================================================
// Clock
// ============================================================================

/// Monotonic time source polled by the restart loop.
pub trait Clock {
    /// Time elapsed since some fixed origin.
    fn elapsed(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Wall clock measured from its creation.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock at the current instant.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

// ============================================================================
// Driver
// ============================================================================

/// An incumbent replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Improvement {
    /// 1-based restart that produced the new incumbent.
    pub restart: u64,
    /// Size of the new incumbent.
    pub size: usize,
}

/// Outcome of one anytime run.
#[derive(Clone, Debug)]
pub struct AnytimeReport {
    /// Best dominating set found.
    pub solution: Solution,
    /// Completed restarts.
    pub restarts: u64,
    /// Incumbent history, strictly decreasing in size.
    pub improvements: Vec<Improvement>,
    /// Time spent according to the driver's clock.
    pub elapsed: Duration,
}

/// Repeats randomized first-feasible searches until the budget expires.
#[derive(Clone, Debug)]
pub struct AnytimeRestartDriver<R, C> {
    rng: R,
    clock: C,
    max_restarts: Option<u64>,
}

impl<R: Rng, C: Clock> AnytimeRestartDriver<R, C> {
    /// Creates a driver drawing permutations from `rng` and polling `clock`.
    pub fn new(rng: R, clock: C) -> Self {
        Self {
            rng,
            clock,
            max_restarts: None,
        }
    }

    /// Stops after `cap` restarts even if budget remains. A cap of zero still
    /// allows the mandatory first restart.
    #[must_use]
    pub fn with_max_restarts(mut self, cap: Option<u64>) -> Self {
        self.max_restarts = cap;
        self
    }

    /// Runs restarts on `graph` until `budget` has elapsed.
    pub fn run(&mut self, graph: &Graph, budget: Duration) -> AnytimeReport {
        self.run_observed(graph, budget, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_improvement` with the restart number
    /// and the new incumbent every time it is replaced.
    pub fn run_observed<F>(
        &mut self,
        graph: &Graph,
        budget: Duration,
        on_improvement: F,
    ) -> AnytimeReport
    where
        F: FnMut(u64, &Solution),
    {
        let started = self.clock.elapsed();
        self.restart_loop(graph, started, started.saturating_add(budget), on_improvement)
    }

    /// Runs restarts until the clock reads at least `deadline`. The first
    /// restart always runs, even if the deadline has already passed.
    pub fn run_until<F>(
        &mut self,
        graph: &Graph,
        deadline: Duration,
        on_improvement: F,
    ) -> AnytimeReport
    where
        F: FnMut(u64, &Solution),
    {
        let started = self.clock.elapsed();
        self.restart_loop(graph, started, deadline, on_improvement)
    }

    fn restart_loop<F>(
        &mut self,
        graph: &Graph,
        started: Duration,
        deadline: Duration,
        mut on_improvement: F,
    ) -> AnytimeReport
    where
        F: FnMut(u64, &Solution),
    {
        let mut search = DominationSearch::new(graph);
        let mut order: Vec<usize> = (0..graph.order()).collect();

        order.shuffle(&mut self.rng);
        let mut best = search.run(&order, SearchMode::FirstFeasible);
        let mut restarts = 1u64;
        let mut improvements = vec![Improvement {
            restart: restarts,
            size: best.size,
        }];
        tracing::debug!(restart = restarts, size = best.size, "new incumbent");
        on_improvement(restarts, &best);

        while !self.max_restarts.is_some_and(|cap| restarts >= cap)
            && self.clock.elapsed() < deadline
        {
            order.shuffle(&mut self.rng);
            let candidate = search.run(&order, SearchMode::FirstFeasible);
            restarts += 1;

            if candidate.size < best.size {
                tracing::debug!(restart = restarts, size = candidate.size, "new incumbent");
                improvements.push(Improvement {
                    restart: restarts,
                    size: candidate.size,
                });
                on_improvement(restarts, &candidate);
                best = candidate;
            }
        }

        let elapsed = self.clock.elapsed().saturating_sub(started);
        tracing::info!(
            vertices = graph.order(),
            size = best.size,
            restarts,
            elapsed_ms = elapsed.as_millis() as u64,
            "anytime search finished"
        );

        AnytimeReport {
            solution: best,
            restarts,
            improvements,
            elapsed,
        }
    }
}

/// Runs a single-threaded anytime search configured by `config`.
pub fn run_anytime(graph: &Graph, config: &SolveConfig) -> AnytimeReport {
    let rng = SmallRng::seed_from_u64(config.base_seed());
    AnytimeRestartDriver::new(rng, MonotonicClock::start())
        .with_max_restarts(config.max_restarts)
        .run(graph, config.budget)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domination::minimum_dominating_set;
    use rand_xorshift::XorShiftRng;
    use std::cell::Cell;

    /// Advances by a fixed step every time it is read.
    struct StepClock {
        now: Cell<Duration>,
        step: Duration,
    }

    impl StepClock {
        fn new(step: Duration) -> Self {
            Self {
                now: Cell::new(Duration::ZERO),
                step,
            }
        }
    }

    impl Clock for StepClock {
        fn elapsed(&self) -> Duration {
            let now = self.now.get();
            self.now.set(now + self.step);
            now
        }
    }

    fn cycle(n: usize) -> Graph {
        let edges: Vec<(usize, usize)> = (0..n).map(|v| (v, (v + 1) % n)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn zero_budget_runs_exactly_one_restart() {
        let g = cycle(9);
        let clock = StepClock::new(Duration::from_millis(1));
        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(1), &clock);
        let report = driver.run(&g, Duration::ZERO);

        assert_eq!(report.restarts, 1);
        assert_eq!(report.improvements.len(), 1);
        assert!(g.is_dominating(&report.solution.members));
    }

    #[test]
    fn budget_is_polled_once_per_restart() {
        let g = cycle(12);
        let step = Duration::from_millis(10);
        let clock = StepClock::new(step);
        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(2), &clock);
        let report = driver.run(&g, step * 5);

        assert_eq!(report.restarts, 5);
        assert!(report.elapsed >= step * 5);
    }

    #[test]
    fn restart_cap_stops_early() {
        let g = cycle(12);
        let clock = StepClock::new(Duration::ZERO);
        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(3), &clock)
            .with_max_restarts(Some(17));
        let report = driver.run(&g, Duration::from_secs(3600));
        assert_eq!(report.restarts, 17);

        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(3), &clock)
            .with_max_restarts(Some(0));
        assert_eq!(driver.run(&g, Duration::from_secs(3600)).restarts, 1);
    }

    #[test]
    fn run_until_stops_at_absolute_deadline() {
        let g = cycle(10);
        let step = Duration::from_millis(1);
        let clock = StepClock::new(step);
        let _ = clock.elapsed();
        let _ = clock.elapsed();

        // Clock already reads 2ms; a 1ms deadline has passed.
        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(4), &clock);
        assert_eq!(driver.run_until(&g, step, |_, _| {}).restarts, 1);

        // Started at 5ms; polls at 6, 7 and 8 fall before the 9ms deadline.
        let mut driver = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(4), &clock);
        assert_eq!(driver.run_until(&g, step * 9, |_, _| {}).restarts, 4);
    }

    #[test]
    fn incumbent_never_increases() {
        let mut rng = XorShiftRng::seed_from_u64(0x1CE);
        for _ in 0..10 {
            let g = Graph::random(&mut rng, 40, 0.1).unwrap();
            let clock = StepClock::new(Duration::ZERO);
            let seeded = XorShiftRng::seed_from_u64(rng.random());
            let mut driver =
                AnytimeRestartDriver::new(seeded, &clock).with_max_restarts(Some(200));

            let mut observed = Vec::new();
            let report = driver.run_observed(&g, Duration::from_secs(1), |restart, sol| {
                observed.push((restart, sol.size));
            });

            for pair in report.improvements.windows(2) {
                assert!(pair[1].size < pair[0].size);
                assert!(pair[1].restart > pair[0].restart);
            }
            let last = report.improvements.last().unwrap();
            assert_eq!(last.size, report.solution.size);
            let expected: Vec<(u64, usize)> =
                report.improvements.iter().map(|i| (i.restart, i.size)).collect();
            assert_eq!(observed, expected);
            assert!(g.is_dominating(&report.solution.members));
        }
    }

    #[test]
    fn anytime_never_beats_exact() {
        let mut rng = XorShiftRng::seed_from_u64(0xE4);
        for _ in 0..10 {
            let g = Graph::random(&mut rng, 11, 0.3).unwrap();
            let exact = minimum_dominating_set(&g);
            let clock = StepClock::new(Duration::ZERO);
            let seeded = XorShiftRng::seed_from_u64(rng.random());
            let report = AnytimeRestartDriver::new(seeded, &clock)
                .with_max_restarts(Some(300))
                .run(&g, Duration::from_secs(1));
            assert!(report.solution.size >= exact.size);
        }
    }

    #[test]
    fn anytime_finds_path_optimum() {
        let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        let clock = StepClock::new(Duration::ZERO);
        let report = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(9), &clock)
            .with_max_restarts(Some(500))
            .run(&g, Duration::from_secs(1));
        assert_eq!(report.solution.size, 2);
    }

    #[test]
    fn empty_graph_yields_empty_set() {
        let g = Graph::empty(0).unwrap();
        let clock = StepClock::new(Duration::from_millis(1));
        let report = AnytimeRestartDriver::new(XorShiftRng::seed_from_u64(0), &clock)
            .run(&g, Duration::ZERO);
        assert_eq!(report.solution.size, 0);
        assert_eq!(report.restarts, 1);
    }

    #[test]
    fn run_anytime_is_deterministic_for_a_seed() {
        let mut rng = XorShiftRng::seed_from_u64(0x5EED);
        let g = Graph::random(&mut rng, 30, 0.15).unwrap();
        let cfg = SolveConfig {
            seed: Some(77),
            max_restarts: Some(50),
            budget: Duration::from_secs(3600),
            ..Default::default()
        };
        let a = run_anytime(&g, &cfg);
        let b = run_anytime(&g, &cfg);
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.restarts, 50);
    }
}

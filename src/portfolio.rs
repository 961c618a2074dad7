//! Parallel restart portfolio.
//!
//! Several independent restart loops run on the rayon pool. Each worker owns its
//! search state and RNG (seeded with SplitMix64 from the base seed and its id)
//! and offers every improvement to a shared incumbent. Replacement is strict, so
//! among equal sizes the first one installed is kept.

use crate::anytime::{AnytimeRestartDriver, Clock};
use crate::bitset::BitSet;
use crate::config::{splitmix64, SolveConfig};
use crate::domination::Solution;
use crate::graph::Graph;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

/// Outcome of a portfolio run.
#[derive(Clone, Debug)]
pub struct PortfolioReport {
    /// Best dominating set across all workers.
    pub solution: Solution,
    /// Worker that installed the best set.
    pub worker: usize,
    /// Restarts completed by all workers together.
    pub restarts: u64,
    /// Number of workers that ran.
    pub workers: usize,
}

/// Best solution shared between workers.
struct SharedIncumbent {
    /// Best size seen, for lock-free rejection of non-improving offers.
    best_size: AtomicUsize,
    best: RwLock<Option<(usize, Solution)>>,
}

impl SharedIncumbent {
    fn new() -> Self {
        Self {
            best_size: AtomicUsize::new(usize::MAX),
            best: RwLock::new(None),
        }
    }

    /// Installs `solution` if it is strictly smaller than the incumbent.
    fn offer(&self, worker: usize, solution: &Solution) -> bool {
        if solution.size >= self.best_size.load(Ordering::Relaxed) {
            return false;
        }
        let mut slot = self.best.write().unwrap_or_else(PoisonError::into_inner);
        let improves = slot
            .as_ref()
            .is_none_or(|(_, incumbent)| solution.size < incumbent.size);
        if improves {
            *slot = Some((worker, solution.clone()));
            self.best_size.fetch_min(solution.size, Ordering::Relaxed);
        }
        improves
    }

    fn into_inner(self) -> Option<(usize, Solution)> {
        self.best.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs `config.workers` restart loops in parallel until the budget on `clock`
/// expires. The deadline is fixed once for all workers, so workers queued
/// behind a busy pool do not get a fresh budget. Every worker completes at least
/// one restart.
pub fn run_portfolio<C>(graph: &Graph, config: &SolveConfig, clock: &C) -> PortfolioReport
where
    C: Clock + Sync,
{
    let workers = config.workers.max(1);
    let base_seed = config.base_seed();
    let incumbent = SharedIncumbent::new();
    let deadline = clock.elapsed().saturating_add(config.budget);

    tracing::info!(
        workers,
        base_seed,
        budget_ms = config.budget.as_millis() as u64,
        "starting restart portfolio"
    );

    let restarts: u64 = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let rng = SmallRng::seed_from_u64(splitmix64(base_seed ^ worker as u64));
            let mut driver =
                AnytimeRestartDriver::new(rng, clock).with_max_restarts(config.max_restarts);
            let report = driver.run_until(graph, deadline, |restart, solution| {
                if incumbent.offer(worker, solution) {
                    tracing::debug!(
                        worker,
                        restart,
                        size = solution.size,
                        "shared incumbent improved"
                    );
                }
            });
            report.restarts
        })
        .sum();

    let (worker, solution) = incumbent.into_inner().unwrap_or_else(|| {
        // Only reachable if no worker ran; every vertex is a valid fallback.
        let mut members = BitSet::zeroed(graph.order());
        members.fill();
        (
            0,
            Solution {
                size: graph.order(),
                members,
            },
        )
    });

    tracing::info!(size = solution.size, worker, restarts, "restart portfolio finished");
    PortfolioReport {
        solution,
        worker,
        restarts,
        workers,
    }
}

// ============================================================================
// Tests
// ============================================================================

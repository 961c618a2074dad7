//! Solver configuration shared by the library drivers and the binary.

use std::time::Duration;

/// Which driver solves each graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveMode {
    /// Exact branch-and-bound; proves minimality.
    Exact,
    /// Randomized restarts under a wall-clock budget.
    Anytime,
}

/// Solver configuration parameters.
#[derive(Clone, Debug)]
pub struct SolveConfig {
    /// Driver selection.
    pub mode: SolveMode,
    /// Wall-clock budget for the anytime driver. At least one restart runs even
    /// when this is zero.
    pub budget: Duration,
    /// Number of parallel restart loops for the anytime driver.
    pub workers: usize,
    /// Optional deterministic base seed.
    pub seed: Option<u64>,
    /// Optional cap on restarts per worker.
    pub max_restarts: Option<u64>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZero::get)
            .unwrap_or(1);

        Self {
            mode: SolveMode::Exact,
            budget: Duration::from_secs(1),
            workers,
            seed: None,
            max_restarts: None,
        }
    }
}

impl SolveConfig {
    /// Returns the configured seed, or a fresh random one.
    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random::<u64>)
    }
}

/// Converts a budget in seconds into a [`Duration`]. Negative values and NaN
/// become zero; values too large to represent (including infinity) saturate to
/// [`Duration::MAX`].
pub fn budget_from_secs(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// SplitMix64 mixer for deriving per-worker seeds from a base seed.
#[inline]
pub fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

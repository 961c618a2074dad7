//! Branch-and-bound search for dominating sets.
//!
//! The search walks vertices in a caller-supplied visitation order and tries two
//! assignments for each one: **exclude** it from the dominating set, then
//! **include** it. Two counters per vertex drive pruning:
//!
//! - `num_choice[v]`: closed neighbors of `v` not yet excluded. When it reaches
//!   zero, `v` can never be dominated and the branch is infeasible.
//! - `num_dominated[v]`: included closed neighbors of `v`.
//!
//! In [`SearchMode::Exact`] a subtree is also cut when
//! `current_size + ceil(undominated / max_closed_degree)` cannot beat the
//! incumbent, since one more vertex dominates at most `max_closed_degree` others.
//!
//! Every branch mutation is applied through a guard whose `Drop` performs the
//! inverse, so unwinding early (a first feasible set was found) restores the
//! counters exactly like normal backtracking does.

use crate::bitset::BitSet;
use crate::error::DomSetError;
use crate::graph::Graph;
use std::iter;
use std::ops::{Deref, DerefMut};

// ============================================================================
// Public types
// ============================================================================

/// How a search treats complete assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Explore the whole pruned tree and return a minimum dominating set.
    Exact,
    /// Stop at the first complete assignment reached along the visitation order.
    FirstFeasible,
}

/// A dominating set together with its size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Number of members.
    pub size: usize,
    /// The members.
    pub members: BitSet,
}

impl Solution {
    /// Members in ascending order.
    pub fn vertices(&self) -> Vec<usize> {
        self.members.to_vec()
    }
}

/// Counters collected during one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search-tree nodes entered.
    pub nodes: u64,
    /// Nodes cut because some vertex ran out of possible dominators.
    pub infeasible_prunes: u64,
    /// Nodes cut by the lower bound (exact mode only).
    pub bound_prunes: u64,
    /// Times the incumbent was replaced by a smaller set.
    pub improvements: u64,
}

// ============================================================================
// DominationSearch
// ============================================================================

/// Reusable search state bound to one graph.
///
/// Scratch arrays are allocated once in [`DominationSearch::new`] and reset at the
/// start of every call, so a single instance can serve many restarts.
#[derive(Clone, Debug)]
pub struct DominationSearch<'g> {
    graph: &'g Graph,
    max_degree: usize,
    mode: SearchMode,
    num_choice: Vec<usize>,
    /// Number of vertices whose `num_choice` is zero.
    starved: usize,
    num_dominated: Vec<usize>,
    dominated_count: usize,
    current: BitSet,
    current_size: usize,
    best: BitSet,
    best_size: usize,
    stats: SearchStats,
}

impl<'g> DominationSearch<'g> {
    /// Creates search state for `graph`.
    pub fn new(graph: &'g Graph) -> Self {
        let n = graph.order();
        Self {
            graph,
            max_degree: graph.max_degree(),
            mode: SearchMode::Exact,
            num_choice: vec![0; n],
            starved: 0,
            num_dominated: vec![0; n],
            dominated_count: 0,
            current: BitSet::zeroed(n),
            current_size: 0,
            best: BitSet::zeroed(n),
            best_size: n,
            stats: SearchStats::default(),
        }
    }

    /// The graph being searched.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Statistics of the most recent call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Runs the search with vertices visited in `order`.
    ///
    /// # Errors
    /// Returns [`DomSetError::InvalidOrder`] if `order` is not a permutation of
    /// `[0, n)`.
    pub fn search(&mut self, order: &[usize], mode: SearchMode) -> Result<Solution, DomSetError> {
        self.check_order(order)?;
        Ok(self.run(order, mode))
    }

    /// Runs the search on an order already known to be a permutation.
    pub(crate) fn run(&mut self, order: &[usize], mode: SearchMode) -> Solution {
        debug_assert_eq!(order.len(), self.graph.order());
        self.reset(mode);
        if self.graph.order() > 0 {
            self.descend(order, 0);
        }
        debug_assert!(self.is_restored(), "search state leaked out of the recursion");

        tracing::debug!(
            mode = ?mode,
            size = self.best_size,
            nodes = self.stats.nodes,
            infeasible_prunes = self.stats.infeasible_prunes,
            bound_prunes = self.stats.bound_prunes,
            "search finished"
        );
        Solution {
            size: self.best_size,
            members: self.best.clone(),
        }
    }

    fn check_order(&self, order: &[usize]) -> Result<(), DomSetError> {
        let n = self.graph.order();
        let invalid = DomSetError::InvalidOrder { len: order.len(), n };
        if order.len() != n {
            return Err(invalid);
        }
        let mut seen = BitSet::zeroed(n);
        for &v in order {
            if v >= n || seen.contains(v) {
                return Err(invalid);
            }
            seen.add(v);
        }
        Ok(())
    }

    fn reset(&mut self, mode: SearchMode) {
        let graph = self.graph;
        self.mode = mode;
        for (v, choice) in self.num_choice.iter_mut().enumerate() {
            *choice = graph.closed_degree(v);
        }
        self.starved = 0;
        self.num_dominated.fill(0);
        self.dominated_count = 0;
        self.current.clear();
        self.current_size = 0;
        // All vertices: the trivial upper bound and a valid fallback.
        self.best.fill();
        self.best_size = graph.order();
        self.stats = SearchStats::default();
    }

    /// Explores the subtree below `level`. Returns `true` when the search should
    /// unwind without exploring further branches.
    fn descend(&mut self, order: &[usize], level: usize) -> bool {
        let n = self.graph.order();
        self.stats.nodes += 1;

        if self.starved > 0 {
            self.stats.infeasible_prunes += 1;
            return false;
        }

        if self.mode == SearchMode::Exact {
            let remaining = n - self.dominated_count;
            let lower_bound = remaining.div_ceil(self.max_degree);
            if self.current_size + lower_bound >= self.best_size {
                self.stats.bound_prunes += 1;
                return false;
            }
        }

        if level == n || self.dominated_count == n {
            return self.record();
        }

        let v = order[level];
        {
            let mut excluded = Excluded::apply(self, v);
            if excluded.descend(order, level + 1) {
                return true;
            }
        }
        let mut included = Included::apply(self, v);
        included.descend(order, level + 1)
    }

    /// Records the current complete assignment.
    fn record(&mut self) -> bool {
        match self.mode {
            SearchMode::Exact => {
                if self.current_size < self.best_size {
                    self.best.copy_from(&self.current);
                    self.best_size = self.current_size;
                    self.stats.improvements += 1;
                    tracing::trace!(size = self.best_size, "exact search improved incumbent");
                }
                false
            }
            SearchMode::FirstFeasible => {
                self.best.copy_from(&self.current);
                self.best_size = self.current_size;
                self.stats.improvements += 1;
                true
            }
        }
    }

    fn exclude(&mut self, v: usize) {
        let graph = self.graph;
        for i in closed_neighborhood(graph, v) {
            self.num_choice[i] -= 1;
            if self.num_choice[i] == 0 {
                self.starved += 1;
            }
        }
    }

    fn unexclude(&mut self, v: usize) {
        let graph = self.graph;
        for i in closed_neighborhood(graph, v) {
            if self.num_choice[i] == 0 {
                self.starved -= 1;
            }
            self.num_choice[i] += 1;
        }
    }

    fn include(&mut self, v: usize) {
        let graph = self.graph;
        self.current.add(v);
        self.current_size += 1;
        for i in closed_neighborhood(graph, v) {
            if self.num_dominated[i] == 0 {
                self.dominated_count += 1;
            }
            self.num_dominated[i] += 1;
        }
    }

    fn uninclude(&mut self, v: usize) {
        let graph = self.graph;
        for i in closed_neighborhood(graph, v) {
            self.num_dominated[i] -= 1;
            if self.num_dominated[i] == 0 {
                self.dominated_count -= 1;
            }
        }
        self.current.remove(v);
        self.current_size -= 1;
    }

    fn is_restored(&self) -> bool {
        let graph = self.graph;
        self.starved == 0
            && self.dominated_count == 0
            && self.current_size == 0
            && self.current.is_empty()
            && self.num_dominated.iter().all(|&d| d == 0)
            && self
                .num_choice
                .iter()
                .enumerate()
                .all(|(v, &c)| c == graph.closed_degree(v))
    }
}

/// \(N[v]\): `v` followed by its open neighborhood.
#[inline]
fn closed_neighborhood(graph: &Graph, v: usize) -> impl Iterator<Item = usize> + '_ {
    iter::once(v).chain(graph.neighbors(v).iter())
}

// ============================================================================
// Branch guards
// ============================================================================

/// Vertex marked excluded for as long as the guard lives.
struct Excluded<'s, 'g> {
    search: &'s mut DominationSearch<'g>,
    vertex: usize,
}

impl<'s, 'g> Excluded<'s, 'g> {
    fn apply(search: &'s mut DominationSearch<'g>, vertex: usize) -> Self {
        search.exclude(vertex);
        Self { search, vertex }
    }
}

impl Drop for Excluded<'_, '_> {
    fn drop(&mut self) {
        self.search.unexclude(self.vertex);
    }
}

impl<'g> Deref for Excluded<'_, 'g> {
    type Target = DominationSearch<'g>;

    fn deref(&self) -> &Self::Target {
        &*self.search
    }
}

impl DerefMut for Excluded<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.search
    }
}

/// Vertex committed to the dominating set for as long as the guard lives.
struct Included<'s, 'g> {
    search: &'s mut DominationSearch<'g>,
    vertex: usize,
}

impl<'s, 'g> Included<'s, 'g> {
    fn apply(search: &'s mut DominationSearch<'g>, vertex: usize) -> Self {
        search.include(vertex);
        Self { search, vertex }
    }
}

impl Drop for Included<'_, '_> {
    fn drop(&mut self) {
        self.search.uninclude(self.vertex);
    }
}

impl<'g> Deref for Included<'_, 'g> {
    type Target = DominationSearch<'g>;

    fn deref(&self) -> &Self::Target {
        &*self.search
    }
}

impl DerefMut for Included<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.search
    }
}

// ============================================================================
// Convenience
// ============================================================================

/// Returns a minimum dominating set of `graph`, visiting vertices in id order.
pub fn minimum_dominating_set(graph: &Graph) -> Solution {
    let order: Vec<usize> = (0..graph.order()).collect();
    DominationSearch::new(graph).run(&order, SearchMode::Exact)
}

// ============================================================================
// Tests
// ============================================================================

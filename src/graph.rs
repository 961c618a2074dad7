//! Undirected simple graphs stored as one neighborhood bitset per vertex.

use crate::bitset::BitSet;
use crate::error::DomSetError;
use rand::Rng;

// ============================================================================
// Graph
// ============================================================================

/// An `n`-vertex graph.
///
/// Representation:
/// - `neighbors[v]` is the **open** neighborhood of `v`.
/// - A vertex dominates itself; callers that need the closed neighborhood
///   \(N[v] = N(v) \cup \{v\}\) account for `v` explicitly instead of storing a
///   self-loop, so a graph is never modified by a search.
///
/// Symmetry and the absence of self-loops are preconditions supplied by the
/// constructor's caller. They are checked with `debug_assert!` only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    neighbors: Vec<BitSet>,
}

impl Graph {
    /// Creates a graph with `n` vertices and no edges.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] if `n` does not fit in a [`BitSet`].
    pub fn empty(n: usize) -> Result<Self, DomSetError> {
        let row = BitSet::new(n)?;
        Ok(Self {
            n,
            neighbors: vec![row; n],
        })
    }

    /// Builds a graph from `(vertex, neighbors)` adjacency lists.
    ///
    /// Every edge is expected to appear in both endpoints' lists. Vertices that
    /// never appear as a key keep an empty neighborhood.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] for oversized graphs and
    /// [`DomSetError::VertexOutOfRange`] for ids outside `[0, n)`.
    ///
    /// # Panics
    /// Panics in debug builds if the adjacency contains a self-loop or is not symmetric.
    pub fn build<I, J>(n: usize, adjacency: I) -> Result<Self, DomSetError>
    where
        I: IntoIterator<Item = (usize, J)>,
        J: IntoIterator<Item = usize>,
    {
        let mut graph = Self::empty(n)?;
        for (v, list) in adjacency {
            graph.check_vertex(v)?;
            for u in list {
                graph.check_vertex(u)?;
                graph.neighbors[v].add(u);
            }
        }

        for v in 0..n {
            debug_assert!(!graph.neighbors[v].contains(v), "self-loop at vertex {v}");
            for u in &graph.neighbors[v] {
                debug_assert!(
                    graph.neighbors[u].contains(v),
                    "adjacency is not symmetric at ({v},{u})"
                );
            }
        }
        Ok(graph)
    }

    /// Builds a graph from an undirected edge list, inserting both directions.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] for oversized graphs and
    /// [`DomSetError::VertexOutOfRange`] for ids outside `[0, n)`.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, DomSetError> {
        let mut graph = Self::empty(n)?;
        for &(u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Generates an Erdős–Rényi graph where each edge is present with probability `p`.
    ///
    /// # Errors
    /// Returns [`DomSetError::CapacityExceeded`] if `n` does not fit in a [`BitSet`].
    pub fn random<R: Rng>(rng: &mut R, n: usize, p: f64) -> Result<Self, DomSetError> {
        debug_assert!((0.0..=1.0).contains(&p), "p must be in [0, 1]");
        let mut graph = Self::empty(n)?;
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.random_bool(p) {
                    graph.neighbors[u].add(v);
                    graph.neighbors[v].add(u);
                }
            }
        }
        Ok(graph)
    }

    /// Adds the undirected edge `{u, v}`.
    ///
    /// # Errors
    /// Returns [`DomSetError::VertexOutOfRange`] for ids outside `[0, n)`.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v`.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), DomSetError> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;
        debug_assert_ne!(u, v, "self-loop at vertex {u}");
        self.neighbors[u].add(v);
        self.neighbors[v].add(u);
        Ok(())
    }

    /// Number of vertices.
    #[inline(always)]
    pub fn order(&self) -> usize {
        self.n
    }

    /// Open neighborhood of `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &BitSet {
        &self.neighbors[v]
    }

    /// Returns whether the edge `{u, v}` exists.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors[u].contains(v)
    }

    /// Open degree of `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors[v].size()
    }

    /// Closed degree of `v`: the number of vertices `v` dominates.
    #[inline]
    pub fn closed_degree(&self, v: usize) -> usize {
        self.degree(v) + 1
    }

    /// Maximum closed degree over all vertices, `0` for the empty graph.
    ///
    /// An included vertex newly dominates at most this many vertices.
    pub fn max_degree(&self) -> usize {
        (0..self.n).map(|v| self.closed_degree(v)).max().unwrap_or(0)
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        let twice: usize = self.neighbors.iter().map(BitSet::size).sum();
        twice / 2
    }

    /// Returns the set of vertices dominated by `set`.
    ///
    /// # Panics
    /// Panics if `set` ranges over a different number of vertices.
    pub fn dominated_by(&self, set: &BitSet) -> BitSet {
        assert_eq!(set.capacity(), self.n, "set and graph sizes differ");
        let mut dominated = set.clone();
        for v in set {
            dominated.union_with(&self.neighbors[v]);
        }
        dominated
    }

    /// Returns the smallest vertex not dominated by `set`, if any.
    ///
    /// # Panics
    /// Panics if `set` ranges over a different number of vertices.
    pub fn first_undominated(&self, set: &BitSet) -> Option<usize> {
        let dominated = self.dominated_by(set);
        (0..self.n).find(|&v| !dominated.contains(v))
    }

    /// Returns `true` if `set` dominates every vertex.
    ///
    /// # Panics
    /// Panics if `set` ranges over a different number of vertices.
    pub fn is_dominating(&self, set: &BitSet) -> bool {
        self.dominated_by(set).is_full()
    }

    #[inline]
    fn check_vertex(&self, v: usize) -> Result<(), DomSetError> {
        if v < self.n {
            Ok(())
        } else {
            Err(DomSetError::VertexOutOfRange { vertex: v, n: self.n })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Errors surfaced by the search core.

use std::fmt;

/// Errors raised while constructing graphs or starting a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomSetError {
    /// The requested vertex count does not fit in the fixed bitset word capacity.
    CapacityExceeded {
        /// Requested number of vertices.
        requested: usize,
        /// Largest supported number of vertices.
        max: usize,
    },
    /// A vertex id outside `[0, n)` was handed to graph construction.
    VertexOutOfRange {
        /// The offending id.
        vertex: usize,
        /// Number of vertices in the graph.
        n: usize,
    },
    /// The visitation order is not a permutation of `[0, n)`.
    InvalidOrder {
        /// Length of the supplied order.
        len: usize,
        /// Number of vertices in the graph.
        n: usize,
    },
}

impl fmt::Display for DomSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomSetError::CapacityExceeded { requested, max } => write!(
                f,
                "vertex count is {requested}, this build supports at most {max} vertices"
            ),
            DomSetError::VertexOutOfRange { vertex, n } => {
                if *n == 0 {
                    write!(f, "vertex {vertex} is out of range, the graph has no vertices")
                } else {
                    write!(f, "vertex {vertex} is not in the range [0, {}]", n - 1)
                }
            }
            DomSetError::InvalidOrder { len, n } => write!(
                f,
                "visitation order of length {len} is not a permutation of the {n} vertices"
            ),
        }
    }
}

impl std::error::Error for DomSetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_limits() {
        let err = DomSetError::CapacityExceeded {
            requested: 5000,
            max: 4096,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("4096"));
    }

    #[test]
    fn vertex_out_of_range_reports_inclusive_upper_end() {
        let err = DomSetError::VertexOutOfRange { vertex: 7, n: 5 };
        assert_eq!(err.to_string(), "vertex 7 is not in the range [0, 4]");
    }
}

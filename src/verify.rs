//! Verification of proposed dominating sets.

use crate::bitset::BitSet;
use crate::domination::Solution;
use crate::graph::Graph;
use std::fmt;

/// Reasons a proposed dominating set is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CertificateError {
    /// A listed id is not a vertex of the graph.
    VertexOutOfRange {
        /// The id as read.
        value: i64,
        /// Number of vertices in the graph.
        n: usize,
    },
    /// `vertex` is neither in the set nor adjacent to a member.
    NotDominated {
        /// Lowest undominated vertex.
        vertex: usize,
    },
    /// A solution's recorded size disagrees with its member count.
    SizeMismatch {
        /// Recorded size.
        declared: usize,
        /// Actual member count.
        actual: usize,
    },
}

impl fmt::Display for CertificateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateError::VertexOutOfRange { value, n } => write!(
                f,
                "value {value} in the certificate is not in the range [0, {}]",
                n.saturating_sub(1)
            ),
            CertificateError::NotDominated { vertex } => {
                write!(f, "vertex {vertex} is not dominated")
            }
            CertificateError::SizeMismatch { declared, actual } => {
                write!(f, "solution claims {declared} members but has {actual}")
            }
        }
    }
}

impl std::error::Error for CertificateError {}

// ============================================================================
// Public API
// ============================================================================

/// Checks that `members` (vertex ids as read) dominate `graph`.
///
/// Repeated ids are accepted.
///
/// # Errors
/// Returns [`CertificateError::VertexOutOfRange`] for the first id outside
/// `[0, n - 1]`, otherwise [`CertificateError::NotDominated`] for the lowest
/// vertex the set misses.
pub fn check_certificate(graph: &Graph, members: &[i64]) -> Result<(), CertificateError> {
    let n = graph.order();
    let mut set = BitSet::zeroed(n);
    for &value in members {
        match usize::try_from(value) {
            Ok(v) if v < n => set.add(v),
            _ => return Err(CertificateError::VertexOutOfRange { value, n }),
        }
    }
    check_set(graph, &set)
}

/// Checks a solver result: the member count must match the recorded size and
/// the members must dominate `graph`.
///
/// # Errors
/// Returns a [`CertificateError`] describing the first violation.
pub fn check_solution(graph: &Graph, solution: &Solution) -> Result<(), CertificateError> {
    let actual = solution.members.size();
    if actual != solution.size {
        return Err(CertificateError::SizeMismatch {
            declared: solution.size,
            actual,
        });
    }
    check_set(graph, &solution.members)
}

// ============================================================================
// Internal
// ============================================================================

fn check_set(graph: &Graph, set: &BitSet) -> Result<(), CertificateError> {
    match graph.first_undominated(set) {
        Some(vertex) => Err(CertificateError::NotDominated { vertex }),
        None => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Text format for graph streams, certificates and results.
//!
//! A stream holds any number of graphs. Each graph is the vertex count `n`
//! followed, for every vertex `0..n`, by its degree and that many neighbor ids.
//! All values are whitespace-separated integers, so line breaks carry no meaning.
//!
//! ```text
//! 3
//! 1 1
//! 2 0 2
//! 1 1
//! ```
//!
//! A certificate (a proposed dominating set) is its size `k` followed by `k`
//! vertex ids. Parsing is where graphs are validated: the search core assumes
//! every graph it receives is simple and symmetric.

use crate::bitset::{BitSet, MAX_VERTICES};
use crate::domination::Solution;
use crate::error::DomSetError;
use crate::graph::Graph;
use std::fmt;
use std::io::{self, Write};
use std::str::SplitWhitespace;

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while reading a graph stream.
///
/// `graph` is the 1-based position of the offending graph in the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphParseError {
    /// The stream ended in the middle of a graph or certificate.
    MissingValue {
        /// Graph number.
        graph: usize,
    },
    /// A token is not an integer.
    InvalidToken {
        /// Graph number.
        graph: usize,
        /// The token as read.
        token: String,
    },
    /// The vertex count is negative.
    NegativeVertexCount {
        /// Graph number.
        graph: usize,
        /// The count as read.
        n: i64,
    },
    /// The vertex count exceeds the bitset capacity.
    TooManyVertices {
        /// Graph number.
        graph: usize,
        /// The count as read.
        n: i64,
        /// Largest supported count.
        max: usize,
    },
    /// A degree outside `[0, n - 1]`.
    DegreeOutOfRange {
        /// Graph number.
        graph: usize,
        /// Vertex whose degree was read.
        vertex: usize,
        /// The degree as read.
        degree: i64,
    },
    /// A neighbor id outside `[0, n - 1]`.
    NeighborOutOfRange {
        /// Graph number.
        graph: usize,
        /// Vertex whose list contains the id.
        vertex: usize,
        /// The id as read.
        neighbor: i64,
    },
    /// A vertex lists itself.
    SelfLoop {
        /// Graph number.
        graph: usize,
        /// The vertex.
        vertex: usize,
    },
    /// A vertex lists the same neighbor twice.
    MultipleEdge {
        /// Graph number.
        graph: usize,
        /// Vertex whose list repeats an id.
        u: usize,
        /// The repeated neighbor.
        v: usize,
    },
    /// `v` is in the list of `u` but not the other way round.
    NotSymmetric {
        /// Graph number.
        graph: usize,
        /// Vertex listing `v`.
        u: usize,
        /// Vertex missing `u` in its list.
        v: usize,
    },
    /// A certificate size is negative.
    NegativeSetSize {
        /// Graph number.
        graph: usize,
        /// The size as read.
        size: i64,
    },
    /// Graph construction rejected the parsed lists.
    Construction {
        /// Graph number.
        graph: usize,
        /// Underlying error.
        error: DomSetError,
    },
}

impl GraphParseError {
    /// 1-based number of the graph the error belongs to.
    pub fn graph_number(&self) -> usize {
        match self {
            GraphParseError::MissingValue { graph }
            | GraphParseError::InvalidToken { graph, .. }
            | GraphParseError::NegativeVertexCount { graph, .. }
            | GraphParseError::TooManyVertices { graph, .. }
            | GraphParseError::DegreeOutOfRange { graph, .. }
            | GraphParseError::NeighborOutOfRange { graph, .. }
            | GraphParseError::SelfLoop { graph, .. }
            | GraphParseError::MultipleEdge { graph, .. }
            | GraphParseError::NotSymmetric { graph, .. }
            | GraphParseError::NegativeSetSize { graph, .. }
            | GraphParseError::Construction { graph, .. } => *graph,
        }
    }
}

impl fmt::Display for GraphParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphParseError::MissingValue { .. } => {
                write!(f, "improper graph format, failed to read value")
            }
            GraphParseError::InvalidToken { token, .. } => {
                write!(f, "improper graph format, {token:?} is not an integer")
            }
            GraphParseError::NegativeVertexCount { n, .. } => {
                write!(f, "improper graph format, negative vertex count {n}")
            }
            GraphParseError::TooManyVertices { n, max, .. } => {
                write!(f, "vertex count is {n}, max is {max}")
            }
            GraphParseError::DegreeOutOfRange { vertex, degree, .. } => write!(
                f,
                "invalid graph, degree {degree} of vertex {vertex} is out of range"
            ),
            GraphParseError::NeighborOutOfRange {
                vertex, neighbor, ..
            } => write!(
                f,
                "invalid graph, neighbor {neighbor} of vertex {vertex} is out of range"
            ),
            GraphParseError::SelfLoop { vertex, .. } => {
                write!(f, "graph is not simple, loop at vertex {vertex}")
            }
            GraphParseError::MultipleEdge { u, v, .. } => write!(
                f,
                "graph is not simple, multiple edges between vertex {u} and vertex {v}"
            ),
            GraphParseError::NotSymmetric { u, v, .. } => write!(
                f,
                "adjacency matrix is not symmetric: A[{u}][{v}] = 1, A[{v}][{u}] = 0"
            ),
            GraphParseError::NegativeSetSize { size, .. } => {
                write!(f, "improper certificate format, negative set size {size}")
            }
            GraphParseError::Construction { error, .. } => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for GraphParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphParseError::Construction { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// Reader
// ============================================================================

/// Reads graphs (and optionally a certificate after each graph) from text.
///
/// Iterating yields one graph at a time so callers can process earlier graphs
/// before a malformed later one is reported. Iteration stops after the first
/// error.
pub struct GraphReader<'a> {
    tokens: SplitWhitespace<'a>,
    graph_number: usize,
    failed: bool,
}

impl<'a> GraphReader<'a> {
    /// Creates a reader over `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
            graph_number: 0,
            failed: false,
        }
    }

    /// Number of graphs started so far (the current graph's 1-based number).
    pub fn graph_number(&self) -> usize {
        self.graph_number
    }

    /// Reads the next graph; `None` at a clean end of input.
    pub fn next_graph(&mut self) -> Option<Result<Graph, GraphParseError>> {
        if self.failed {
            return None;
        }
        let first = self.tokens.next()?;
        self.graph_number += 1;
        let result = self.parse_int(first).and_then(|n| self.read_graph_body(n));
        self.failed = result.is_err();
        Some(result)
    }

    /// Reads the certificate that follows the most recent graph.
    ///
    /// Ids are returned as read; range checking is the verifier's job.
    ///
    /// # Errors
    /// Returns a [`GraphParseError`] if the input ends early or a token is not
    /// an integer.
    pub fn next_certificate(&mut self) -> Result<Vec<i64>, GraphParseError> {
        let result = self.read_certificate();
        self.failed = result.is_err();
        result
    }

    fn read_certificate(&mut self) -> Result<Vec<i64>, GraphParseError> {
        let size = self.next_int()?;
        if size < 0 {
            return Err(GraphParseError::NegativeSetSize {
                graph: self.graph_number,
                size,
            });
        }
        (0..size).map(|_| self.next_int()).collect()
    }

    fn read_graph_body(&mut self, n: i64) -> Result<Graph, GraphParseError> {
        let graph = self.graph_number;
        if n < 0 {
            return Err(GraphParseError::NegativeVertexCount { graph, n });
        }
        let n = match usize::try_from(n) {
            Ok(n) if n <= MAX_VERTICES => n,
            _ => {
                return Err(GraphParseError::TooManyVertices {
                    graph,
                    n,
                    max: MAX_VERTICES,
                })
            }
        };

        let mut rows: Vec<BitSet> = Vec::with_capacity(n);
        for vertex in 0..n {
            rows.push(self.read_vertex(vertex, n)?);
        }

        for (u, row) in rows.iter().enumerate() {
            for v in row {
                if !rows[v].contains(u) {
                    return Err(GraphParseError::NotSymmetric { graph, u, v });
                }
            }
        }

        Graph::build(n, rows.iter().map(|row| row.iter()).enumerate())
            .map_err(|error| GraphParseError::Construction { graph, error })
    }

    fn read_vertex(&mut self, vertex: usize, n: usize) -> Result<BitSet, GraphParseError> {
        let graph = self.graph_number;
        let degree = self.next_int()?;
        let max_degree = n.saturating_sub(1);
        let degree = match usize::try_from(degree) {
            Ok(d) if d <= max_degree => d,
            _ => return Err(GraphParseError::DegreeOutOfRange { graph, vertex, degree }),
        };

        let mut row = BitSet::zeroed(n);
        for _ in 0..degree {
            let neighbor = self.next_int()?;
            let u = match usize::try_from(neighbor) {
                Ok(u) if u < n => u,
                _ => {
                    return Err(GraphParseError::NeighborOutOfRange {
                        graph,
                        vertex,
                        neighbor,
                    })
                }
            };
            if u == vertex {
                return Err(GraphParseError::SelfLoop { graph, vertex });
            }
            if row.contains(u) {
                return Err(GraphParseError::MultipleEdge {
                    graph,
                    u: vertex,
                    v: u,
                });
            }
            row.add(u);
        }
        Ok(row)
    }

    fn next_int(&mut self) -> Result<i64, GraphParseError> {
        let token = self.tokens.next().ok_or(GraphParseError::MissingValue {
            graph: self.graph_number,
        })?;
        self.parse_int(token)
    }

    fn parse_int(&self, token: &str) -> Result<i64, GraphParseError> {
        token.parse().map_err(|_| GraphParseError::InvalidToken {
            graph: self.graph_number,
            token: token.to_owned(),
        })
    }
}

impl Iterator for GraphReader<'_> {
    type Item = Result<Graph, GraphParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_graph()
    }
}

/// Parses every graph in `text`.
///
/// # Errors
/// Returns the first [`GraphParseError`] encountered.
pub fn parse_graphs(text: &str) -> Result<Vec<Graph>, GraphParseError> {
    GraphReader::new(text).collect()
}

// ============================================================================
// Writers
// ============================================================================

/// Writes `graph` in the stream format: the vertex count, then one line per
/// vertex with its degree and neighbors.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_graph<W: Write>(mut w: W, graph: &Graph) -> io::Result<()> {
    writeln!(w, "{:5}", graph.order())?;
    for v in 0..graph.order() {
        write!(w, "{:5}", graph.degree(v))?;
        write_members(&mut w, graph.neighbors(v))?;
    }
    Ok(())
}

/// Writes a result: its size on one line, the members on the next. No blank
/// lines separate consecutive results.
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_solution<W: Write>(mut w: W, solution: &Solution) -> io::Result<()> {
    writeln!(w, "{:5}", solution.size)?;
    write_members(&mut w, &solution.members)
}

fn write_members<W: Write>(w: &mut W, set: &BitSet) -> io::Result<()> {
    for v in set {
        write!(w, "{v:5}")?;
    }
    writeln!(w)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    const PATH3: &str = "3\n1 1\n2 0 2\n1 1\n";

    #[test]
    fn parses_a_single_graph() {
        let graphs = parse_graphs(PATH3).unwrap();
        assert_eq!(graphs.len(), 1);
        let g = &graphs[0];
        assert_eq!(g.order(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(0, 2));
    }

    #[test]
    fn line_breaks_do_not_matter() {
        let a = parse_graphs(PATH3).unwrap();
        let b = parse_graphs("3 1 1 2 0 2 1 1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_a_stream_including_the_empty_graph() {
        let text = format!("0\n{PATH3}1\n0\n");
        let graphs = parse_graphs(&text).unwrap();
        assert_eq!(graphs.len(), 3);
        assert_eq!(graphs[0].order(), 0);
        assert_eq!(graphs[2].order(), 1);
    }

    #[test]
    fn empty_input_has_no_graphs() {
        assert!(parse_graphs("").unwrap().is_empty());
        assert!(parse_graphs(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn reports_missing_values() {
        let err = parse_graphs("3\n1 1\n2 0").unwrap_err();
        assert_eq!(err, GraphParseError::MissingValue { graph: 1 });
    }

    #[test]
    fn reports_invalid_tokens() {
        let err = parse_graphs("2\n1 x\n").unwrap_err();
        assert!(matches!(err, GraphParseError::InvalidToken { graph: 1, .. }));
    }

    #[test]
    fn rejects_negative_and_oversized_counts() {
        let err = parse_graphs("-1").unwrap_err();
        assert_eq!(err, GraphParseError::NegativeVertexCount { graph: 1, n: -1 });

        let err = parse_graphs("5000").unwrap_err();
        assert!(matches!(err, GraphParseError::TooManyVertices { n: 5000, .. }));
    }

    #[test]
    fn rejects_degree_out_of_range() {
        let err = parse_graphs("2\n2 1 1\n").unwrap_err();
        assert_eq!(
            err,
            GraphParseError::DegreeOutOfRange {
                graph: 1,
                vertex: 0,
                degree: 2
            }
        );
    }

    #[test]
    fn rejects_neighbor_out_of_range() {
        let err = parse_graphs("2\n1 2\n1 0\n").unwrap_err();
        assert_eq!(
            err,
            GraphParseError::NeighborOutOfRange {
                graph: 1,
                vertex: 0,
                neighbor: 2
            }
        );
    }

    #[test]
    fn rejects_self_loops() {
        let err = parse_graphs("2\n1 0\n0\n").unwrap_err();
        assert_eq!(err, GraphParseError::SelfLoop { graph: 1, vertex: 0 });
    }

    #[test]
    fn rejects_multiple_edges() {
        let err = parse_graphs("3\n2 1 1\n1 0\n0\n").unwrap_err();
        assert_eq!(err, GraphParseError::MultipleEdge { graph: 1, u: 0, v: 1 });
    }

    #[test]
    fn rejects_asymmetric_lists() {
        let err = parse_graphs("3\n1 1\n1 0\n1 0\n").unwrap_err();
        assert_eq!(err, GraphParseError::NotSymmetric { graph: 1, u: 2, v: 0 });
    }

    #[test]
    fn reader_yields_good_graphs_before_the_error() {
        let text = format!("{PATH3}2\n1 0\n0\n{PATH3}");
        let mut reader = GraphReader::new(&text);
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.graph_number(), 2);
        assert!(reader.next().is_none());
    }

    #[test]
    fn reads_certificates_after_graphs() {
        let text = format!("{PATH3}1 1\n{PATH3}2 0 -4\n");
        let mut reader = GraphReader::new(&text);

        let _ = reader.next_graph().unwrap().unwrap();
        assert_eq!(reader.next_certificate().unwrap(), vec![1]);
        let _ = reader.next_graph().unwrap().unwrap();
        assert_eq!(reader.next_certificate().unwrap(), vec![0, -4]);
        assert!(reader.next_graph().is_none());
    }

    #[test]
    fn rejects_negative_certificate_size() {
        let text = format!("{PATH3}-2\n");
        let mut reader = GraphReader::new(&text);
        let _ = reader.next_graph().unwrap().unwrap();
        assert_eq!(
            reader.next_certificate(),
            Err(GraphParseError::NegativeSetSize { graph: 1, size: -2 })
        );
    }

    #[test]
    fn write_and_parse_roundtrip() {
        let mut rng = XorShiftRng::seed_from_u64(0xF0F0);
        let g = Graph::random(&mut rng, 25, 0.2).unwrap();
        let mut out = Vec::new();
        write_graph(&mut out, &g).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(parse_graphs(&text).unwrap(), vec![g]);
    }

    #[test]
    fn writes_solutions_with_fixed_width() {
        let solution = Solution {
            size: 2,
            members: BitSet::from_vertices(5, [1, 3]).unwrap(),
        };
        let mut out = Vec::new();
        write_solution(&mut out, &solution).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "    2\n    1    3\n");
    }

    #[test]
    fn consecutive_solutions_are_not_separated() {
        let first = Solution {
            size: 1,
            members: BitSet::from_vertices(3, [1]).unwrap(),
        };
        let second = Solution {
            size: 2,
            members: BitSet::from_vertices(4, [0, 2]).unwrap(),
        };
        let mut out = Vec::new();
        write_solution(&mut out, &first).unwrap();
        write_solution(&mut out, &second).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "    1\n    1\n    2\n    0    2\n"
        );
    }
}

//! # Dominating Set Search
//!
//! Exact and anytime search for minimum dominating sets of simple undirected
//! graphs.
//!
//! This crate provides:
//! - A fixed-capacity [`BitSet`](bitset::BitSet) vertex set and an adjacency
//!   [`Graph`](graph::Graph) built from it.
//! - A branch-and-bound [`DominationSearch`](domination::DominationSearch) with
//!   **incremental** per-vertex counters and a degree-based lower bound.
//! - A randomized restart driver that returns the best set found within a
//!   wall-clock budget, and a parallel portfolio of such drivers.
//! - Parsing and printing of the whitespace-separated graph stream format, plus
//!   certificate verification.
//!
//! ## Quick Start
//!
//! ```
//! use domset::domination::minimum_dominating_set;
//! use domset::graph::Graph;
//!
//! // Path 0-1-2-3-4
//! let g = Graph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
//! let best = minimum_dominating_set(&g);
//!
//! assert_eq!(best.size, 2);
//! assert!(g.is_dominating(&best.members));
//! ```
//!
//! ## Anytime Search
//!
//! ```
//! use domset::anytime::run_anytime;
//! use domset::config::{SolveConfig, SolveMode};
//! use domset::format::parse_graphs;
//! use std::time::Duration;
//!
//! let graphs = parse_graphs("4\n3 1 2 3\n1 0\n1 0\n1 0\n").unwrap();
//! let cfg = SolveConfig {
//!     mode: SolveMode::Anytime,
//!     budget: Duration::from_millis(10),
//!     seed: Some(7),
//!     ..Default::default()
//! };
//! let report = run_anytime(&graphs[0], &cfg);
//!
//! assert!(report.restarts >= 1);
//! assert!(graphs[0].is_dominating(&report.solution.members));
//! ```
//!
//! ## Verifying Certificates
//!
//! ```
//! use domset::format::GraphReader;
//! use domset::verify::{check_certificate, CertificateError};
//!
//! let mut reader = GraphReader::new("3  1 1  2 0 2  1 1   1 1");
//! let g = reader.next_graph().unwrap().unwrap();
//! let members = reader.next_certificate().unwrap();
//!
//! assert_eq!(check_certificate(&g, &members), Ok(()));
//! assert_eq!(
//!     check_certificate(&g, &[0]),
//!     Err(CertificateError::NotDominated { vertex: 2 })
//! );
//! ```
//!
//! ## Modules
//!
//! - [`bitset`]: Fixed-capacity vertex sets over `u64` words.
//! - [`graph`]: Adjacency rows and domination queries.
//! - [`domination`]: Branch-and-bound search core.
//! - [`anytime`]: Restart driver with an injectable clock.
//! - [`portfolio`]: Parallel restart workers sharing one incumbent.
//! - [`format`]: Graph stream parsing and result printing.
//! - [`verify`]: Certificate and solution checks.
//! - [`config`]: Solver configuration.
//! - [`error`]: Core error type.
//!
//! ## Performance Notes
//!
//! - Graphs are limited to [`MAX_VERTICES`](bitset::MAX_VERTICES) vertices.
//! - Counter updates cost O(closed degree) per branch; nothing is recomputed
//!   from scratch while descending.
//! - The exact search is exponential in the worst case. Use the anytime driver
//!   for large graphs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::inline_always)] // Hot-path bit operations
#![allow(clippy::many_single_char_names)] // Graph-theory variable names
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod anytime;
pub mod bitset;
pub mod config;
pub mod domination;
pub mod error;
pub mod format;
pub mod graph;
pub mod portfolio;
pub mod verify;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::anytime::{run_anytime, AnytimeReport, AnytimeRestartDriver, Clock};
    pub use crate::bitset::BitSet;
    pub use crate::config::{SolveConfig, SolveMode};
    pub use crate::domination::{minimum_dominating_set, DominationSearch, SearchMode, Solution};
    pub use crate::error::DomSetError;
    pub use crate::format::{parse_graphs, GraphParseError, GraphReader};
    pub use crate::graph::Graph;
    pub use crate::portfolio::{run_portfolio, PortfolioReport};
    pub use crate::verify::{check_certificate, CertificateError};
}

//! Error types shared by the solvers, the file formats and the session.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by this crate. Nothing is recovered silently: every variant reaches the
/// caller, which decides how to report it.
#[derive(Debug, Error)]
pub enum Error {
    /// No simple path connects the two vertices.
    #[error("no path exists between {from} and {to}")]
    NoPath { from: String, to: String },

    /// A vertex referenced by the caller isn't part of the network.
    #[error("vertex {0} is not part of the network")]
    UnknownVertex(String),

    /// An edge cost isn't a pair of finite numbers, or an edge has no cost at all.
    #[error("edge weight format is incorrect for edge {edge}: {reason}")]
    InvalidEdgeWeight { edge: String, reason: String },

    /// A path has zero unit cost, so the inverse-cost allocation is undefined.
    #[error("path {path} has a zero unit cost")]
    DivisionByZero { path: String },

    /// The total flow volume must be positive and finite.
    #[error("invalid flow volume: {0}")]
    InvalidVolume(f64),

    /// The valuation matrix, the price vector and the market size disagree.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    /// The matcher exceeded its round cap without reaching a conflict-free assignment.
    #[error("no conflict-free assignment after {iterations} rounds")]
    NonConvergence { iterations: usize },

    /// Raising a seller's price would overflow `i64`.
    #[error("price of seller {seller} overflowed")]
    PriceOverflow { seller: usize },

    /// A solver option is out of range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Malformed input file contents.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The session doesn't hold the state an operation needs.
    #[error("no {0} is currently loaded")]
    NotLoaded(&'static str),
}

impl Error {
    pub(crate) fn dimension_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

//! A module for working with directed edges and their cost functions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A pair of vertices representing a directed graph edge, flow travels from `source` to
/// `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_ne!(edge, Edge::new("b", "a"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the vertex the edge leaves from.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.source(), &"a");
    /// ```
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the vertex the edge points to.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::Edge;
    ///
    /// let edge = Edge::new("a", "b");
    /// assert_eq!(edge.target(), &"b");
    /// ```
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether the edge contains the given vertex at either end.
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == vertex || self.target() == vertex
    }
}

impl<T: fmt::Debug> fmt::Display for Edge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.source, self.target)
    }
}

/// Travel cost of an edge as a function of the flow `x` crossing it: `a * x + b`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineCost {
    pub a: f64,
    pub b: f64,
}

impl AffineCost {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Evaluates the cost for a flow volume of `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::AffineCost;
    ///
    /// assert_eq!(AffineCost::new(2.0, 1.0).eval(3.0), 7.0);
    /// ```
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x + self.b
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }

    /// Validates the untyped `(a, b)` weight attached to `edge`.
    pub(crate) fn from_weight<T: fmt::Debug>(edge: &Edge<T>, weight: &[f64]) -> Result<Self> {
        let cost = match weight {
            [a, b] => Self::new(*a, *b),
            _ => {
                return Err(Error::InvalidEdgeWeight {
                    edge: edge.to_string(),
                    reason: format!("expected 2 numbers, found {}", weight.len()),
                })
            }
        };

        cost.validate(edge)?;

        Ok(cost)
    }

    /// Both coefficients must be finite and non-negative.
    pub(crate) fn validate<T: fmt::Debug>(&self, edge: &Edge<T>) -> Result<()> {
        let reason = if !self.is_finite() {
            "non-finite"
        } else if self.a < 0.0 || self.b < 0.0 {
            "negative"
        } else {
            return Ok(());
        };

        Err(Error::InvalidEdgeWeight {
            edge: edge.to_string(),
            reason: format!("{reason} coefficients ({}, {})", self.a, self.b),
        })
    }
}

impl From<(f64, f64)> for AffineCost {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

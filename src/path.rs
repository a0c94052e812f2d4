//! A module for working with paths through a flow network.

use std::{fmt, iter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;

/// An ordered sequence of vertices, from a source to a destination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path<T> {
    vertices: Vec<T>,
}

impl<T> Path<T> {
    /// Creates a path from its vertices, in travel order.
    pub fn new(vertices: Vec<T>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[T] {
        &self.vertices
    }

    /// Returns the number of edges the path crosses.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::path::Path;
    ///
    /// assert_eq!(Path::new(vec![1, 2, 3]).hops(), 2);
    /// ```
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<&T> {
        self.vertices.first()
    }

    pub fn target(&self) -> Option<&T> {
        self.vertices.last()
    }

    /// Returns the edges crossed by the path, in travel order.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::Edge;
    /// use equilibria::path::Path;
    ///
    /// let path = Path::new(vec!["a", "b", "c"]);
    /// let edges: Vec<_> = path.edges().collect();
    ///
    /// assert_eq!(edges, vec![Edge::new("a", "b"), Edge::new("b", "c")]);
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = Edge<T>> + '_
    where
        T: Copy,
    {
        self.vertices
            .iter()
            .tuple_windows()
            .map(|(a, b)| Edge::new(*a, *b))
    }
}

impl<T: fmt::Display> fmt::Display for Path<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertices.iter().join(" -> "))
    }
}

/// Lazily enumerates every simple (no repeated vertex) directed path between two vertices.
///
/// The search is depth-first and visits successors in ascending vertex order, which fixes the
/// enumeration order the solvers rely on for tie-breaking. Created by
/// [`FlowNetwork::simple_paths`](crate::network::FlowNetwork::simple_paths).
#[derive(Clone, Debug)]
pub struct SimplePaths<T> {
    /// Vertices by index.
    vertices: Vec<T>,
    /// Successor indices of each vertex, sorted.
    adjacency: Vec<Vec<usize>>,
    target: usize,
    /// The current partial path: each frame is a vertex and the position of the next successor
    /// to try.
    stack: Vec<(usize, usize)>,
    on_path: Vec<bool>,
    /// A path found ahead of time to prove the sequence isn't empty.
    peeked: Option<Path<T>>,
}

impl<T: Copy> SimplePaths<T> {
    pub(crate) fn new(
        vertices: Vec<T>,
        adjacency: Vec<Vec<usize>>,
        source: usize,
        target: usize,
    ) -> Self {
        let mut on_path = vec![false; vertices.len()];
        on_path[source] = true;

        let mut paths = Self {
            vertices,
            adjacency,
            target,
            stack: vec![(source, 0)],
            on_path,
            peeked: None,
        };
        paths.peeked = paths.advance();

        paths
    }

    /// Whether nothing is left to yield.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.peeked.is_none() && self.stack.is_empty()
    }

    fn advance(&mut self) -> Option<Path<T>> {
        while let Some(frame) = self.stack.last_mut() {
            let node = frame.0;

            match self.adjacency[node].get(frame.1) {
                Some(&child) => {
                    frame.1 += 1;

                    if self.on_path[child] {
                        continue;
                    }

                    if child == self.target {
                        let vertices = self
                            .stack
                            .iter()
                            .map(|&(i, _)| self.vertices[i])
                            .chain(iter::once(self.vertices[child]))
                            .collect();

                        return Some(Path::new(vertices));
                    }

                    self.on_path[child] = true;
                    self.stack.push((child, 0));
                }
                None => {
                    // All successors tried, backtrack.
                    self.stack.pop();
                    self.on_path[node] = false;
                }
            }
        }

        None
    }
}

impl<T: Copy> Iterator for SimplePaths<T> {
    type Item = Path<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.peeked.take().or_else(|| self.advance())
    }
}

impl<T: Copy> iter::FusedIterator for SimplePaths<T> {}

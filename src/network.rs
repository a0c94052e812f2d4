//! A module for working with flow networks.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, VecDeque},
    fmt::Debug,
    hash::Hash,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    betweenness,
    edge::{AffineCost, Edge},
    error::{Error, Result},
    path::{Path, SimplePaths},
};

/// Scores closer than this are treated as equal when picking the link to cut.
const TIE_TOLERANCE: f64 = 1e-9;

/// Indexed vertices, sorted successor lists and the indices of a search's two endpoints.
type SearchSpace<T> = (Vec<T>, Vec<Vec<usize>>, usize, usize);

/// The outcome of [`FlowNetwork::partition`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Partition<T> {
    /// The directed edges removed from the network, in removal order.
    pub removed: Vec<Edge<T>>,
    /// The connected components of the vertices the network held before partitioning, each
    /// sorted, ordered by their smallest vertex.
    pub components: Vec<Vec<T>>,
}

/// A directed graph whose edges each carry an affine travel cost `a * x + b`.
#[derive(Clone, Debug)]
pub struct FlowNetwork<T> {
    /// The edges in the network, with their cost functions.
    edges: HashMap<Edge<T>, AffineCost>,
}

impl<T> Default for FlowNetwork<T>
where
    Edge<T>: Eq + Hash,
    T: Copy + Eq + Hash + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FlowNetwork<T>
where
    Edge<T>: Eq + Hash,
    T: Copy + Eq + Hash + Ord + Debug,
{
    /// Creates an empty network.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::network::FlowNetwork;
    ///
    /// let network: FlowNetwork<u32> = FlowNetwork::new();
    /// ```
    pub fn new() -> Self {
        Self {
            edges: Default::default(),
        }
    }

    /// Inserts an edge with its cost function into the network.
    ///
    /// Returns `true` if the edge is new, `false` if it replaced the cost of an existing edge.
    /// Non-finite coefficients are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    ///
    /// let mut network = FlowNetwork::new();
    ///
    /// assert!(network.insert(Edge::new(0, 1), AffineCost::new(1.0, 0.0)).unwrap());
    /// assert!(!network.insert(Edge::new(0, 1), AffineCost::new(2.0, 0.0)).unwrap());
    /// assert!(network.insert(Edge::new(1, 2), AffineCost::new(f64::NAN, 0.0)).is_err());
    /// ```
    pub fn insert(&mut self, edge: Edge<T>, cost: AffineCost) -> Result<bool> {
        cost.validate(&edge)?;

        Ok(self.edges.insert(edge, cost).is_none())
    }

    /// Inserts an edge whose cost is given as an untyped weight, which must hold exactly the two
    /// coefficients `[a, b]`.
    pub fn insert_weighted(&mut self, edge: Edge<T>, weight: &[f64]) -> Result<bool> {
        let cost = AffineCost::from_weight(&edge, weight)?;

        self.insert(edge, cost)
    }

    /// Removes an edge and returns its cost if it was present.
    pub fn remove(&mut self, edge: &Edge<T>) -> Option<AffineCost> {
        self.edges.remove(edge)
    }

    /// Checks if the network contains an edge.
    pub fn contains(&self, edge: &Edge<T>) -> bool {
        self.edges.contains_key(edge)
    }

    /// Returns the cost function of an edge.
    ///
    /// Fails with [`Error::InvalidEdgeWeight`] if the edge isn't part of the network, since a
    /// path crossing it can't be costed.
    pub fn cost(&self, edge: &Edge<T>) -> Result<AffineCost> {
        self.edges
            .get(edge)
            .copied()
            .ok_or_else(|| Error::InvalidEdgeWeight {
                edge: edge.to_string(),
                reason: "edge has no cost".to_owned(),
            })
    }

    /// Returns the edges and their costs, sorted by edge.
    pub fn edges(&self) -> Vec<(Edge<T>, AffineCost)> {
        let mut edges: Vec<_> = self.edges.iter().map(|(e, c)| (*e, *c)).collect();
        edges.sort_by(|(a, _), (b, _)| a.cmp(b));

        edges
    }

    /// Returns the vertices of the network in ascending order.
    pub fn vertices(&self) -> Vec<T> {
        self.vertices_from_edges().into_iter().collect()
    }

    /// Returns the vertex count of the network.
    ///
    /// Vertices only exist as edge endpoints, so the set is rebuilt from the edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    ///
    /// let mut network = FlowNetwork::new();
    /// network.insert(Edge::new("a", "b"), AffineCost::new(1.0, 0.0)).unwrap();
    ///
    /// assert_eq!(network.vertex_count(), 2);
    /// ```
    pub fn vertex_count(&self) -> usize {
        self.vertices_from_edges().len()
    }

    /// Returns the edge count of the network.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the travel time along `path` when every one of its edges carries a flow of `x`.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    /// use equilibria::path::Path;
    ///
    /// let mut network = FlowNetwork::new();
    /// network.insert(Edge::new(0, 1), AffineCost::new(1.0, 0.0)).unwrap();
    /// network.insert(Edge::new(1, 2), AffineCost::new(0.0, 45.0)).unwrap();
    ///
    /// assert_eq!(network.path_time(&Path::new(vec![0, 1, 2]), 10.0).unwrap(), 55.0);
    /// ```
    pub fn path_time(&self, path: &Path<T>, x: f64) -> Result<f64> {
        path.edges()
            .map(|edge| self.cost(&edge).map(|cost| cost.eval(x)))
            .sum()
    }

    /// Returns a lazy iterator over every simple directed path from `source` to `target`.
    ///
    /// Paths are enumerated depth-first, successors in ascending order. Fails with
    /// [`Error::NoPath`] if there are none, equilibria are undefined without a feasible path.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    ///
    /// let mut network = FlowNetwork::new();
    /// let cost = AffineCost::new(1.0, 0.0);
    /// network.insert(Edge::new(0, 1), cost).unwrap();
    /// network.insert(Edge::new(1, 2), cost).unwrap();
    /// network.insert(Edge::new(0, 2), cost).unwrap();
    ///
    /// let paths: Vec<String> = network
    ///     .simple_paths(0, 2)
    ///     .unwrap()
    ///     .map(|path| path.to_string())
    ///     .collect();
    ///
    /// assert_eq!(paths, vec!["0 -> 1 -> 2", "0 -> 2"]);
    /// ```
    pub fn simple_paths(&self, source: T, target: T) -> Result<SimplePaths<T>> {
        let (vertices, adjacency, source_index, target_index) =
            self.search_space(source, target)?;

        let paths = SimplePaths::new(vertices, adjacency, source_index, target_index);

        if paths.is_exhausted() {
            return Err(no_path(source, target));
        }

        Ok(paths)
    }

    /// Returns a path from `source` to `target` crossing the fewest edges.
    ///
    /// When several exist, the one found first in ascending successor order wins.
    pub fn shortest_path(&self, source: T, target: T) -> Result<Path<T>> {
        let (vertices, adjacency, source_index, target_index) =
            self.search_space(source, target)?;

        if source_index == target_index {
            return Ok(Path::new(vec![source]));
        }

        // Breadth-first search, remembering the vertex each one was reached from.
        let mut parent: Vec<Option<usize>> = vec![None; vertices.len()];
        let mut visited = vec![false; vertices.len()];
        let mut queue = VecDeque::new();

        visited[source_index] = true;
        queue.push_back(source_index);

        while let Some(m) = queue.pop_front() {
            for &n in &adjacency[m] {
                if visited[n] {
                    continue;
                }

                visited[n] = true;
                parent[n] = Some(m);

                if n == target_index {
                    queue.clear();
                    break;
                }

                queue.push_back(n);
            }
        }

        if !visited[target_index] {
            return Err(no_path(source, target));
        }

        // Walk the parents back from the target.
        let mut indices = vec![target_index];
        let mut current = target_index;
        while let Some(previous) = parent[current] {
            indices.push(previous);
            current = previous;
        }
        indices.reverse();

        Ok(Path::new(indices.into_iter().map(|i| vertices[i]).collect()))
    }

    /// Returns the connected components of the network with edge directions ignored, each
    /// sorted, ordered by their smallest vertex.
    pub fn components(&self) -> Vec<Vec<T>> {
        let (vertices, links) = self.undirected_links();
        let adjacency = betweenness::link_adjacency(vertices.len(), &links);

        resolve_components(&vertices, betweenness::components(&adjacency))
    }

    /// Returns the betweenness centrality of every link of the network with edge directions
    /// ignored: the number of vertex pairs whose shortest paths cross it, split evenly between
    /// equally short paths.
    ///
    /// Opposite edges share a link, reported as the edge from the lower vertex to the higher one.
    /// Links are sorted and self-loops are left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    ///
    /// let mut network = FlowNetwork::new();
    /// let cost = AffineCost::new(1.0, 0.0);
    /// network.insert(Edge::new(0, 1), cost).unwrap();
    /// network.insert(Edge::new(2, 1), cost).unwrap();
    ///
    /// assert_eq!(
    ///     network.edge_betweenness(),
    ///     vec![(Edge::new(0, 1), 2.0), (Edge::new(1, 2), 2.0)]
    /// );
    /// ```
    pub fn edge_betweenness(&self) -> Vec<(Edge<T>, f64)> {
        let (vertices, links) = self.undirected_links();
        let adjacency = betweenness::link_adjacency(vertices.len(), &links);
        let scores = betweenness::edge_betweenness(&adjacency, links.len());

        links
            .iter()
            .zip(scores)
            .map(|(&(i, j), score)| (Edge::new(vertices[i], vertices[j]), score))
            .collect()
    }

    /// Splits the network into at least `num_components` connected components (edge directions
    /// ignored) by repeatedly removing the link with the highest betweenness. Removing a link
    /// removes the edges in both directions. The first link in sorted order wins ties, and
    /// betweenness is recomputed after every removal.
    ///
    /// Vertices left without edges drop out of the network but still count, and are reported,
    /// as components of their own. Nothing is removed if the network already has enough
    /// components. Fails with [`Error::InvalidOption`] if `num_components` exceeds the vertex
    /// count, leaving the network untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use equilibria::edge::{AffineCost, Edge};
    /// use equilibria::network::FlowNetwork;
    ///
    /// // Two triangles joined by a bridge.
    /// let mut network = FlowNetwork::new();
    /// let cost = AffineCost::new(1.0, 0.0);
    /// for (a, b) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)] {
    ///     network.insert(Edge::new(a, b), cost).unwrap();
    /// }
    ///
    /// let partition = network.partition(2).unwrap();
    ///
    /// assert_eq!(partition.removed, vec![Edge::new(2, 3)]);
    /// assert_eq!(partition.components, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    /// ```
    pub fn partition(&mut self, num_components: usize) -> Result<Partition<T>> {
        let (vertices, mut links) = self.undirected_links();

        if num_components > vertices.len() {
            return Err(Error::InvalidOption(format!(
                "can't split {} vertices into {num_components} components",
                vertices.len()
            )));
        }

        let mut removed = Vec::new();

        loop {
            let adjacency = betweenness::link_adjacency(vertices.len(), &links);
            let components = betweenness::components(&adjacency);

            let cut = if components.len() < num_components {
                highest_score(&betweenness::edge_betweenness(&adjacency, links.len()))
            } else {
                None
            };

            let Some((link, score)) = cut else {
                debug!(
                    components = components.len(),
                    removed = removed.len(),
                    "partitioned network"
                );

                return Ok(Partition {
                    removed,
                    components: resolve_components(&vertices, components),
                });
            };

            let (i, j) = links.remove(link);
            let (a, b) = (vertices[i], vertices[j]);
            debug!(link = %Edge::new(a, b), score, "removing link");

            for edge in [Edge::new(a, b), Edge::new(b, a)] {
                if self.edges.remove(&edge).is_some() {
                    removed.push(edge);
                }
            }
        }
    }

    //
    // Private
    //

    /// Returns the set of unique vertices contained within the set of edges.
    fn vertices_from_edges(&self) -> BTreeSet<T> {
        let mut vertices = BTreeSet::new();
        for edge in self.edges.keys() {
            vertices.insert(*edge.source());
            vertices.insert(*edge.target());
        }

        vertices
    }

    /// Constructs an index of vertices for this set of edges, sorted by `T`'s implementation of
    /// `Ord`.
    fn generate_index(&self) -> BTreeMap<T, usize> {
        self.vertices_from_edges()
            .into_iter()
            .enumerate()
            .map(|(i, vertex)| (vertex, i))
            .collect()
    }

    /// Builds the indexed vertices and sorted successor lists a search runs over, and resolves
    /// the endpoints.
    fn search_space(&self, source: T, target: T) -> Result<SearchSpace<T>> {
        let index = self.generate_index();

        let lookup = |vertex: T| {
            index
                .get(&vertex)
                .copied()
                .ok_or_else(|| Error::UnknownVertex(format!("{vertex:?}")))
        };
        let source_index = lookup(source)?;
        let target_index = lookup(target)?;

        let mut adjacency = vec![Vec::new(); index.len()];
        for edge in self.edges.keys() {
            // Safety: the index was generated from this set of edges.
            let (i, j) = (index[edge.source()], index[edge.target()]);
            adjacency[i].push(j);
        }
        for successors in &mut adjacency {
            successors.sort_unstable();
        }

        Ok((index.into_keys().collect(), adjacency, source_index, target_index))
    }

    /// Returns the indexed vertices and the sorted, deduplicated undirected links between them,
    /// each as a pair of indices with the lower one first.
    fn undirected_links(&self) -> (Vec<T>, Vec<(usize, usize)>) {
        let index = self.generate_index();

        let links: BTreeSet<(usize, usize)> = self
            .edges
            .keys()
            .map(|edge| (index[edge.source()], index[edge.target()]))
            .filter(|(i, j)| i != j)
            .map(|(i, j)| (i.min(j), i.max(j)))
            .collect();

        (index.into_keys().collect(), links.into_iter().collect())
    }
}

/// The first link holding the highest score.
fn highest_score(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (link, &score) in scores.iter().enumerate() {
        let higher = match best {
            Some((_, top)) => score > top + TIE_TOLERANCE,
            None => true,
        };
        if higher {
            best = Some((link, score));
        }
    }

    best
}

fn resolve_components<T: Copy>(vertices: &[T], components: Vec<Vec<usize>>) -> Vec<Vec<T>> {
    components
        .into_iter()
        .map(|component| component.into_iter().map(|i| vertices[i]).collect())
        .collect()
}

fn no_path<T: Debug>(source: T, target: T) -> Error {
    Error::NoPath {
        from: format!("{source:?}"),
        to: format!("{target:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! network {
        ($(($a:expr, $b:expr) => ($ca:expr, $cb:expr)),* $(,)?) => {{
            let mut network = FlowNetwork::new();

            $(
                network
                    .insert(Edge::new($a, $b), AffineCost::new($ca, $cb))
                    .unwrap();
            )*

            network
        }};
    }

    fn rendered(network: &FlowNetwork<u32>, source: u32, target: u32) -> Vec<String> {
        network
            .simple_paths(source, target)
            .unwrap()
            .map(|path| path.to_string())
            .collect()
    }

    #[test]
    fn new() {
        let network: FlowNetwork<()> = FlowNetwork::new();

        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn insert() {
        let mut network = FlowNetwork::new();
        let edge = Edge::new("a", "b");

        assert!(network.insert(edge, AffineCost::new(1.0, 0.0)).unwrap());
        assert!(!network.insert(edge, AffineCost::new(2.0, 3.0)).unwrap());

        assert_eq!(network.cost(&edge).unwrap(), AffineCost::new(2.0, 3.0));
        assert_eq!(network.edge_count(), 1);
    }

    #[test]
    fn insert_rejects_non_finite_costs() {
        let mut network = FlowNetwork::new();

        assert!(matches!(
            network.insert(Edge::new(1, 2), AffineCost::new(1.0, f64::INFINITY)),
            Err(Error::InvalidEdgeWeight { .. })
        ));
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn insert_weighted() {
        let mut network = FlowNetwork::new();

        assert!(network.insert_weighted(Edge::new(1, 2), &[1.0, 0.0]).unwrap());

        match network.insert_weighted(Edge::new(2, 3), &[1.0]) {
            Err(Error::InvalidEdgeWeight { edge, .. }) => assert_eq!(edge, "(2, 3)"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!network.contains(&Edge::new(2, 3)));
    }

    #[test]
    fn remove() {
        let mut network = network![(1, 2) => (1.0, 0.0)];

        assert_eq!(network.remove(&Edge::new(1, 2)), Some(AffineCost::new(1.0, 0.0)));
        assert_eq!(network.remove(&Edge::new(1, 2)), None);
    }

    #[test]
    fn missing_cost() {
        let network = network![(1, 2) => (1.0, 0.0)];

        assert!(matches!(
            network.cost(&Edge::new(2, 1)),
            Err(Error::InvalidEdgeWeight { .. })
        ));
        assert!(network.path_time(&Path::new(vec![1, 2, 3]), 1.0).is_err());
    }

    #[test]
    fn vertices() {
        let network = network![(3, 1) => (1.0, 0.0), (1, 2) => (1.0, 0.0)];

        assert_eq!(network.vertices(), vec![1, 2, 3]);
        assert_eq!(network.vertex_count(), 3);
    }

    #[test]
    fn edges_are_sorted() {
        let network = network![(2, 3) => (1.0, 0.0), (1, 3) => (0.0, 2.0), (1, 2) => (1.0, 1.0)];
        let edges: Vec<_> = network.edges().into_iter().map(|(e, _)| e).collect();

        assert_eq!(edges, vec![Edge::new(1, 2), Edge::new(1, 3), Edge::new(2, 3)]);
    }

    #[test]
    fn path_time_uses_the_same_flow_on_every_edge() {
        let network = network![(0, 1) => (1.0, 0.0), (1, 2) => (2.0, 1.0)];

        // (1 * 3 + 0) + (2 * 3 + 1)
        assert_eq!(network.path_time(&Path::new(vec![0, 1, 2]), 3.0).unwrap(), 10.0);
    }

    #[test]
    fn simple_paths() {
        let network = network![
            (0, 1) => (1.0, 0.0),
            (1, 2) => (2.0, 1.0),
            (0, 2) => (1.0, 5.0),
            (1, 3) => (0.0, 2.0),
            (3, 2) => (1.0, 1.0),
        ];

        assert_eq!(
            rendered(&network, 0, 2),
            vec!["0 -> 1 -> 2", "0 -> 1 -> 3 -> 2", "0 -> 2"]
        );
    }

    #[test]
    fn simple_paths_respect_direction() {
        let network = network![(0, 1) => (1.0, 0.0), (2, 1) => (1.0, 0.0)];

        assert!(matches!(network.simple_paths(0, 2), Err(Error::NoPath { .. })));
    }

    #[test]
    fn simple_paths_unknown_vertex() {
        let network = network![(0, 1) => (1.0, 0.0)];

        assert!(matches!(network.simple_paths(0, 7), Err(Error::UnknownVertex(_))));
    }

    #[test]
    fn simple_paths_to_self() {
        let network = network![(0, 1) => (1.0, 0.0), (1, 0) => (1.0, 0.0)];

        assert!(matches!(network.simple_paths(0, 0), Err(Error::NoPath { .. })));
    }

    #[test]
    fn shortest_path() {
        let network = network![
            (0, 1) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
            (2, 3) => (1.0, 0.0),
            (0, 4) => (1.0, 0.0),
            (4, 3) => (1.0, 0.0),
        ];

        assert_eq!(network.shortest_path(0, 3).unwrap(), Path::new(vec![0, 4, 3]));
        assert_eq!(network.shortest_path(2, 3).unwrap(), Path::new(vec![2, 3]));
        assert_eq!(network.shortest_path(1, 1).unwrap(), Path::new(vec![1]));
    }

    #[test]
    fn shortest_path_prefers_lower_successors_on_ties() {
        let network = network![
            (0, 2) => (1.0, 0.0),
            (0, 1) => (1.0, 0.0),
            (1, 3) => (1.0, 0.0),
            (2, 3) => (1.0, 0.0),
        ];

        assert_eq!(network.shortest_path(0, 3).unwrap(), Path::new(vec![0, 1, 3]));
    }

    #[test]
    fn shortest_path_disconnected() {
        let network = network![(0, 1) => (1.0, 0.0), (2, 3) => (1.0, 0.0)];

        assert!(matches!(network.shortest_path(0, 3), Err(Error::NoPath { .. })));
    }

    #[test]
    fn components_ignore_direction() {
        let network = network![(1, 0) => (1.0, 0.0), (1, 2) => (1.0, 0.0), (4, 3) => (1.0, 0.0)];

        assert_eq!(network.components(), vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn edge_betweenness_merges_opposite_edges() {
        let network = network![
            (0, 1) => (1.0, 0.0),
            (1, 0) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
            (3, 2) => (1.0, 0.0),
            (3, 3) => (1.0, 0.0),
        ];

        assert_eq!(
            network.edge_betweenness(),
            vec![
                (Edge::new(0, 1), 3.0),
                (Edge::new(1, 2), 4.0),
                (Edge::new(2, 3), 3.0),
            ]
        );
    }

    #[test]
    fn partition_cuts_the_bridge() {
        let mut network = network![
            (0, 1) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
            (2, 0) => (1.0, 0.0),
            (2, 3) => (1.0, 0.0),
            (3, 4) => (1.0, 0.0),
            (4, 5) => (1.0, 0.0),
            (5, 3) => (1.0, 0.0),
        ];

        let partition = network.partition(2).unwrap();

        assert_eq!(partition.removed, vec![Edge::new(2, 3)]);
        assert_eq!(partition.components, vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(network.edge_count(), 6);
        assert_eq!(network.components(), partition.components);
    }

    #[test]
    fn partition_breaks_ties_towards_the_first_link() {
        // Every link of a square carries the same betweenness.
        let mut network = network![
            (0, 1) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
            (2, 3) => (1.0, 0.0),
            (3, 0) => (1.0, 0.0),
        ];

        let partition = network.partition(2).unwrap();

        // Cutting (0, 1) leaves the path 1 - 2 - 3 - 0, whose middle link goes next.
        assert_eq!(partition.removed, vec![Edge::new(0, 1), Edge::new(2, 3)]);
        assert_eq!(partition.components, vec![vec![0, 3], vec![1, 2]]);
    }

    #[test]
    fn partition_removes_both_directions() {
        let mut network = network![
            (0, 1) => (1.0, 0.0),
            (1, 0) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
        ];

        let partition = network.partition(2).unwrap();

        assert_eq!(partition.removed, vec![Edge::new(0, 1), Edge::new(1, 0)]);
        assert_eq!(partition.components, vec![vec![0], vec![1, 2]]);
        // The isolated vertex no longer belongs to the network.
        assert_eq!(network.vertices(), vec![1, 2]);
    }

    #[test]
    fn partition_into_single_vertices() {
        let mut network = network![
            (0, 1) => (1.0, 0.0),
            (1, 2) => (1.0, 0.0),
            (2, 0) => (1.0, 0.0),
        ];

        let partition = network.partition(3).unwrap();

        assert_eq!(
            partition.removed,
            vec![Edge::new(0, 1), Edge::new(2, 0), Edge::new(1, 2)]
        );
        assert_eq!(partition.components, vec![vec![0], vec![1], vec![2]]);
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn partition_at_or_below_current_count() {
        let mut network = network![(0, 1) => (1.0, 0.0), (2, 3) => (1.0, 0.0)];

        for target in [0, 1, 2] {
            let partition = network.partition(target).unwrap();

            assert!(partition.removed.is_empty());
            assert_eq!(partition.components, vec![vec![0, 1], vec![2, 3]]);
        }
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn partition_beyond_vertex_count() {
        let mut network = network![(0, 1) => (1.0, 0.0), (1, 2) => (1.0, 0.0)];

        assert!(matches!(network.partition(4), Err(Error::InvalidOption(_))));
        assert_eq!(network.edge_count(), 2);
    }
}

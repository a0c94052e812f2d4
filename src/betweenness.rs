//! Edge betweenness and connected components over an undirected view of a network.
//!
//! Both work on index adjacency lists where `adjacency[v]` holds `(neighbour, link)` pairs and
//! every undirected link appears in the lists of both its endpoints.

use std::collections::VecDeque;

/// Undirected adjacency lists over vertex indices: `(neighbour, link)` pairs.
pub(crate) type LinkAdjacency = Vec<Vec<(usize, usize)>>;

/// Builds the adjacency lists of `vertex_count` vertices joined by `links`, each list sorted by
/// neighbour.
pub(crate) fn link_adjacency(vertex_count: usize, links: &[(usize, usize)]) -> LinkAdjacency {
    let mut adjacency = vec![Vec::new(); vertex_count];

    for (link, &(i, j)) in links.iter().enumerate() {
        adjacency[i].push((j, link));
        adjacency[j].push((i, link));
    }
    for neighbours in &mut adjacency {
        neighbours.sort_unstable();
    }

    adjacency
}

/// Ulrik Brandes's "A Faster Algorithm for Betweenness Centrality", with the dependencies
/// accumulated on links instead of vertices. Counts are not normalised.
pub(crate) fn edge_betweenness(adjacency: &LinkAdjacency, link_count: usize) -> Vec<f64> {
    let mut scores = vec![0.0; link_count];

    for source in 0..adjacency.len() {
        betweenness_from(source, adjacency, &mut scores);
    }

    // Every pair was counted once from each end.
    for score in &mut scores {
        *score /= 2.0;
    }

    scores
}

/// Accumulates the link dependencies of the shortest paths starting at `source`.
fn betweenness_from(source: usize, adjacency: &LinkAdjacency, scores: &mut [f64]) {
    let num_nodes = adjacency.len();

    let mut sigma = vec![0.0; num_nodes];
    let mut distance: Vec<Option<usize>> = vec![None; num_nodes];
    let mut predecessors: Vec<Vec<(usize, usize)>> = vec![Vec::new(); num_nodes];
    let mut delta = vec![0.0; num_nodes];
    let mut queue = VecDeque::new();
    let mut stack = Vec::new();

    sigma[source] = 1.0;
    distance[source] = Some(0);
    queue.push_back((source, 0));

    while let Some((v, depth)) = queue.pop_front() {
        stack.push(v);

        for &(w, link) in &adjacency[v] {
            if distance[w].is_none() {
                distance[w] = Some(depth + 1);
                queue.push_back((w, depth + 1));
            }
            if distance[w] == Some(depth + 1) {
                sigma[w] += sigma[v];
                predecessors[w].push((v, link));
            }
        }
    }

    while let Some(w) = stack.pop() {
        for &(v, link) in &predecessors[w] {
            let credit = sigma[v] / sigma[w] * (1.0 + delta[w]);
            scores[link] += credit;
            delta[v] += credit;
        }
    }
}

/// Connected components, each sorted, ordered by their smallest vertex.
pub(crate) fn components(adjacency: &LinkAdjacency) -> Vec<Vec<usize>> {
    let mut visited = vec![false; adjacency.len()];
    let mut components = Vec::new();

    for start in 0..adjacency.len() {
        if visited[start] {
            continue;
        }

        visited[start] = true;
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);

        while let Some(v) = queue.pop_front() {
            for &(w, _) in &adjacency[v] {
                if !visited[w] {
                    visited[w] = true;
                    component.push(w);
                    queue.push_back(w);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}

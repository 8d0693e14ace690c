//! Contact Network
//!
//! Immutable undirected adjacency over community-partitioned nodes.

use opinion_events::NetworkSummary;

/// Undirected simple graph whose nodes are split into equal-size communities.
///
/// Node `i` belongs to community `i / block_size`. Adjacency lists are sorted
/// and never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    adjacency: Vec<Vec<usize>>,
    n_communities: usize,
    block_size: usize,
    edge_count: usize,
}

impl Network {
    /// Builds a network from an edge list.
    ///
    /// Self-loops, out-of-range endpoints and duplicate edges are discarded.
    pub fn from_edges(
        n_communities: usize,
        block_size: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let nodes = n_communities * block_size;
        let mut adjacency = vec![Vec::new(); nodes];

        for (u, v) in edges {
            if u == v || u >= nodes || v >= nodes {
                continue;
            }
            adjacency[u].push(v);
            adjacency[v].push(u);
        }

        let mut edge_count = 0;
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
            edge_count += neighbors.len();
        }

        Self {
            adjacency,
            n_communities,
            block_size,
            edge_count: edge_count / 2,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn n_communities(&self) -> usize {
        self.n_communities
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Sorted neighbor indices of a node; empty for unknown nodes.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Community of a node.
    pub fn community_of(&self, node: usize) -> usize {
        node / self.block_size.max(1)
    }

    pub fn same_community(&self, u: usize, v: usize) -> bool {
        self.community_of(u) == self.community_of(v)
    }

    /// Every edge once, as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&v| v > u)
                .map(move |v| (u, v))
        })
    }

    /// Node, edge and density statistics.
    pub fn summary(&self) -> NetworkSummary {
        let nodes = self.node_count();
        let (intra_edges, inter_edges) = self.edges().fold((0, 0), |(intra, inter), (u, v)| {
            if self.same_community(u, v) {
                (intra + 1, inter)
            } else {
                (intra, inter + 1)
            }
        });

        let all_pairs = pairs(nodes);
        let intra_pairs = self.n_communities * pairs(self.block_size);
        let inter_pairs = all_pairs - intra_pairs;

        NetworkSummary {
            nodes,
            edges: self.edge_count,
            communities: self.n_communities,
            block_size: self.block_size,
            mean_degree: if nodes == 0 {
                0.0
            } else {
                2.0 * self.edge_count as f64 / nodes as f64
            },
            isolated_nodes: self.adjacency.iter().filter(|n| n.is_empty()).count(),
            intra_edges,
            inter_edges,
            intra_density: density(intra_edges, intra_pairs),
            inter_density: density(inter_edges, inter_pairs),
        }
    }
}

fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn density(edges: usize, pairs: usize) -> f64 {
    if pairs == 0 {
        0.0
    } else {
        edges as f64 / pairs as f64
    }
}

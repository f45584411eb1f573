use crate::domain::cluster::TypeCluster;
use crate::domain::graph::TypeGraph;
use petgraph::Direction;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate measures over one dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DependencyMetrics {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Mean outgoing-dependency count.
    pub average_dependencies: f64,
    /// Largest outgoing-dependency count of any node.
    pub max_dependencies: usize,
    /// Clusters flagged circular.
    pub circular_dependencies: usize,
    pub cluster_count: usize,
    /// Longest dependency chain, as the maximum wave index of a Kahn
    /// zero-in-degree peel. Nodes inside cycles never reach zero in-degree
    /// and are excluded from the depth computation.
    pub max_depth: usize,
}

pub fn compute_metrics(graph: &TypeGraph, clusters: &[TypeCluster]) -> DependencyMetrics {
    let total_nodes = graph.node_count();
    let total_edges = graph.edge_count();

    let mut max_dependencies = 0;
    for idx in graph.graph.node_indices() {
        let out = graph
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .count();
        max_dependencies = max_dependencies.max(out);
    }
    let average_dependencies = if total_nodes == 0 {
        0.0
    } else {
        total_edges as f64 / total_nodes as f64
    };

    DependencyMetrics {
        total_nodes,
        total_edges,
        average_dependencies,
        max_dependencies,
        circular_dependencies: clusters.iter().filter(|c| c.is_circular).count(),
        cluster_count: clusters.len(),
        max_depth: topological_max_depth(graph),
    }
}

/// Kahn wave peel: remove all zero-in-degree nodes as wave 0, then every
/// node whose in-degree hits zero as the next wave, tracking the maximum
/// wave index reached.
fn topological_max_depth(graph: &TypeGraph) -> usize {
    let n = graph.node_count();
    if n == 0 {
        return 0;
    }

    let mut in_degree = vec![0usize; n];
    for idx in graph.graph.node_indices() {
        in_degree[idx.index()] = graph
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .count();
    }

    let mut wave: Vec<_> = graph
        .graph
        .node_indices()
        .filter(|idx| in_degree[idx.index()] == 0)
        .collect();
    let mut depth = 0usize;

    while !wave.is_empty() {
        let mut next = Vec::new();
        for idx in wave {
            for succ in graph.graph.neighbors_directed(idx, Direction::Outgoing) {
                in_degree[succ.index()] -= 1;
                if in_degree[succ.index()] == 0 {
                    next.push(succ);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        depth += 1;
        wave = next;
    }
    depth
}

use crate::domain::graph::TypeGraph;
use petgraph::graph::NodeIndex;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connected component of the dependency graph under its undirected closure,
/// reported only when it holds more than one type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeCluster {
    /// Member qualified names, in catalog order.
    pub types: Vec<String>,
    /// True iff a directed cycle exists among the component's internal edges.
    pub is_circular: bool,
    /// Edges with both endpoints inside the component.
    pub internal_edges: usize,
    /// Edges touching exactly one member.
    pub external_edges: usize,
}

/// DFS visitation state for the cycle check.
#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Partition the graph's nodes into connected components with union-find and
/// flag each reported component that contains a directed cycle.
///
/// Deterministic: components are ordered by their smallest member index and
/// members by node index, which follows catalog order.
pub fn detect_clusters(graph: &TypeGraph) -> Vec<TypeCluster> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut uf: UnionFind<usize> = UnionFind::new(n);
    for edge in graph.graph.edge_references() {
        uf.union(edge.source().index(), edge.target().index());
    }

    let mut components: HashMap<usize, Vec<NodeIndex>> = HashMap::new();
    for idx in graph.graph.node_indices() {
        components
            .entry(uf.find(idx.index()))
            .or_default()
            .push(idx);
    }

    let mut clusters: Vec<Vec<NodeIndex>> = components
        .into_values()
        .filter(|members| members.len() > 1)
        .collect();
    clusters.sort_by_key(|members| members[0].index());

    clusters
        .into_iter()
        .map(|members| {
            let mut membership = vec![false; n];
            for idx in &members {
                membership[idx.index()] = true;
            }

            // Induced subgraph adjacency, plus the internal/external counts
            // in the same pass over all edges.
            let mut adjacency: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
            let mut internal_edges = 0;
            let mut external_edges = 0;
            for edge in graph.graph.edge_references() {
                let inside_src = membership[edge.source().index()];
                let inside_dst = membership[edge.target().index()];
                if inside_src && inside_dst {
                    internal_edges += 1;
                    adjacency.entry(edge.source()).or_default().push(edge.target());
                } else if inside_src || inside_dst {
                    external_edges += 1;
                }
            }

            let is_circular = has_directed_cycle(&members, &adjacency);
            TypeCluster {
                types: members
                    .iter()
                    .map(|&idx| graph.record(idx).qualified_name.clone())
                    .collect(),
                is_circular,
                internal_edges,
                external_edges,
            }
        })
        .collect()
}

/// Iterative depth-first search over the induced subgraph. A back edge into
/// the gray set (the explicit recursion stack) marks a directed cycle.
fn has_directed_cycle(
    members: &[NodeIndex],
    adjacency: &HashMap<NodeIndex, Vec<NodeIndex>>,
) -> bool {
    let max_index = members.iter().map(|idx| idx.index()).max().unwrap_or(0);
    let mut color = vec![Color::White; max_index + 1];
    static EMPTY: Vec<NodeIndex> = Vec::new();

    for &start in members {
        if color[start.index()] != Color::White {
            continue;
        }
        // Work stack of (node, next-neighbor cursor) frames.
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        color[start.index()] = Color::Gray;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let neighbors = adjacency.get(&node).unwrap_or(&EMPTY);
            match neighbors.get(cursor) {
                Some(&next) => {
                    frame.1 += 1;
                    match color[next.index()] {
                        Color::White => {
                            color[next.index()] = Color::Gray;
                            stack.push((next, 0));
                        }
                        Color::Gray => return true,
                        Color::Black => {}
                    }
                }
                None => {
                    color[node.index()] = Color::Black;
                    stack.pop();
                }
            }
        }
    }
    false
}

use crate::domain::record::{TypeKind, TypeRecord};
use petgraph::graph::{DiGraph, NodeIndex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How one retained type refers to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Inheritance,
    Interface,
    Dependency,
}

impl RelationshipKind {
    /// Fixed per-kind edge weight.
    pub fn strength(self) -> f64 {
        match self {
            RelationshipKind::Inheritance => 1.0,
            RelationshipKind::Interface => 0.8,
            RelationshipKind::Dependency => 0.5,
        }
    }
}

/// Reported view of one retained type plus its computed degree data.
///
/// `centrality` is a normalized degree measure
/// ((|dependencies| + |dependents|) / total nodes), not true betweenness.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DependencyNode {
    pub qualified_name: String,
    pub kind: TypeKind,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
    pub centrality: f64,
}

/// Directed edge between two retained types. Edges exist only when both
/// endpoints are retained nodes; dangling references produce nothing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub relationship: RelationshipKind,
    pub strength: f64,
}

/// Dependency graph over one analysis snapshot.
///
/// Node payloads are the retained records themselves; node indices double as
/// the integer ids the cluster and metrics passes run their arrays over.
/// Insertion order follows catalog order, so indices are deterministic.
pub struct TypeGraph {
    pub graph: DiGraph<TypeRecord, RelationshipKind>,
    pub name_to_node: HashMap<String, NodeIndex>,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_node: HashMap::new(),
        }
    }

    pub fn add_record(&mut self, record: TypeRecord) -> NodeIndex {
        let name = record.qualified_name.clone();
        let idx = self.graph.add_node(record);
        self.name_to_node.insert(name, idx);
        idx
    }

    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: RelationshipKind) {
        self.graph.add_edge(from, to, kind);
    }

    pub fn node_by_name(&self, qualified: &str) -> Option<NodeIndex> {
        self.name_to_node.get(qualified).copied()
    }

    pub fn record(&self, idx: NodeIndex) -> &TypeRecord {
        &self.graph[idx]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Reported edge list, in insertion order.
    pub fn edge_views(&self) -> Vec<DependencyEdge> {
        self.graph
            .edge_indices()
            .map(|e| {
                let (from, to) = self.graph.edge_endpoints(e).expect("edge endpoints");
                let kind = self.graph[e];
                DependencyEdge {
                    from: self.graph[from].qualified_name.clone(),
                    to: self.graph[to].qualified_name.clone(),
                    relationship: kind,
                    strength: kind.strength(),
                }
            })
            .collect()
    }

    /// Reported node list with degree data, in catalog (insertion) order.
    pub fn node_views(&self) -> Vec<DependencyNode> {
        let total = self.graph.node_count();
        self.graph
            .node_indices()
            .map(|idx| {
                let record = &self.graph[idx];
                let dependencies: Vec<String> = self
                    .graph
                    .neighbors_directed(idx, petgraph::Direction::Outgoing)
                    .map(|n| self.graph[n].qualified_name.clone())
                    .collect();
                let dependents: Vec<String> = self
                    .graph
                    .neighbors_directed(idx, petgraph::Direction::Incoming)
                    .map(|n| self.graph[n].qualified_name.clone())
                    .collect();
                let centrality = if total == 0 {
                    0.0
                } else {
                    (dependencies.len() + dependents.len()) as f64 / total as f64
                };
                let mut dependencies = dependencies;
                let mut dependents = dependents;
                // petgraph yields neighbors in reverse insertion order.
                dependencies.reverse();
                dependents.reverse();
                DependencyNode {
                    qualified_name: record.qualified_name.clone(),
                    kind: record.kind,
                    dependencies,
                    dependents,
                    centrality,
                }
            })
            .collect()
    }
}

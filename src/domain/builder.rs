use crate::domain::graph::{RelationshipKind, TypeGraph};
use crate::domain::record::{TypeRecord, is_system_type, qualify};
use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Graph builder - turns a snapshot of retained records into a dependency
/// graph. Pure function of its inputs; an empty snapshot yields an empty
/// graph and the caller decides whether that is fatal.
pub struct GraphBuilder {
    include_system_types: bool,
}

impl GraphBuilder {
    pub fn new(include_system_types: bool) -> Self {
        Self {
            include_system_types,
        }
    }

    /// Two-pass build: allocate nodes in catalog order, then wire edges for
    /// every reference that resolves to a retained node. Dangling references
    /// (excluded or unknown targets) produce no edge and no synthetic node.
    pub fn build(&self, records: &[TypeRecord]) -> TypeGraph {
        let mut graph = TypeGraph::new();

        let mut ordered: Vec<&TypeRecord> = records
            .iter()
            .filter(|r| self.include_system_types || !is_system_type(&r.qualified_name))
            .collect();
        ordered.sort_by_key(|r| r.catalog_index);

        // Pass 1: node allocation. Simple names map to the first record
        // carrying them, in catalog order.
        let mut simple_names: HashMap<&str, NodeIndex> = HashMap::new();
        for record in &ordered {
            let idx = graph.add_record((*record).clone());
            simple_names.entry(record.simple_name()).or_insert(idx);
        }

        // Pass 2: edge wiring from base type and interface lists.
        for record in &ordered {
            let from = graph
                .node_by_name(&record.qualified_name)
                .expect("retained record was allocated in pass 1");

            let mut wired: HashSet<NodeIndex> = HashSet::new();
            for raw in record
                .base_type
                .iter()
                .chain(record.interfaces.iter())
            {
                if !self.include_system_types && is_system_type(raw) {
                    continue;
                }
                let Some(to) = resolve_reference(&graph, &simple_names, record, raw) else {
                    debug!(
                        from = %record.qualified_name,
                        reference = %raw,
                        "reference does not resolve to a retained type, skipping"
                    );
                    continue;
                };
                if to == from {
                    debug!(type_name = %record.qualified_name, "self-referential base or interface, skipping");
                    continue;
                }
                if !wired.insert(to) {
                    continue;
                }
                let kind = classify_reference(record, raw);
                graph.add_edge(from, to, kind);
            }
        }

        graph
    }
}

/// Resolve a raw base/interface name against the retained node set: exact
/// qualified match first, then the name qualified with the record's own
/// namespace, then a simple-name match.
fn resolve_reference(
    graph: &TypeGraph,
    simple_names: &HashMap<&str, NodeIndex>,
    record: &TypeRecord,
    raw: &str,
) -> Option<NodeIndex> {
    if let Some(idx) = graph.node_by_name(raw) {
        return Some(idx);
    }
    if !raw.contains('.') {
        let qualified = qualify(raw, record.namespace());
        if let Some(idx) = graph.node_by_name(&qualified) {
            return Some(idx);
        }
        return simple_names.get(raw).copied();
    }
    None
}

/// A dependency equal to the record's base type is inheritance, a listed
/// interface is an interface edge; anything else is a plain dependency.
fn classify_reference(record: &TypeRecord, raw: &str) -> RelationshipKind {
    if record.base_type.as_deref() == Some(raw) {
        RelationshipKind::Inheritance
    } else if record.interfaces.iter().any(|i| i == raw) {
        RelationshipKind::Interface
    } else {
        RelationshipKind::Dependency
    }
}

use crate::domain::record::{TypeRecord, qualify};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of a reconstructed inheritance tree.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyNode {
    pub type_name: String,
    pub base_type: Option<String>,
    /// Distance from this tree's root; never exceeds the configured maximum.
    pub depth: u32,
    pub interfaces: Vec<String>,
    pub derived_types: Vec<HierarchyNode>,
}

/// A completed tree plus the metrics of a full traversal over it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyTree {
    pub root: HierarchyNode,
    pub total_nodes: usize,
    pub max_depth: u32,
    pub has_interfaces: bool,
}

/// A type that both extends a base class and implements interfaces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MultipleInheritancePattern {
    pub type_name: String,
    pub base_type: String,
    pub interfaces: Vec<String>,
    /// Rank key: interface count plus the single base class.
    pub inheritance_count: usize,
}

/// Inheritance forest reconstruction over one snapshot.
///
/// Trees are rooted at types whose base is absent or not in the catalog, and
/// a shared visited set keeps them disjoint: each type lands in exactly one
/// tree. Construction uses an explicit work stack over record indices; the
/// recursive report shape is assembled afterwards from the flat arena.
pub struct HierarchyBuilder<'a> {
    records: &'a [TypeRecord],
    /// record index -> indices of records whose base resolves to it
    children: Vec<Vec<usize>>,
    /// record index -> resolved base record index
    resolved_base: Vec<Option<usize>>,
    max_depth: u32,
    include_interfaces: bool,
}

/// Flat arena slot used while a tree is under construction.
struct Slot {
    record: usize,
    depth: u32,
    children: Vec<usize>,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(records: &'a [TypeRecord], max_depth: u32, include_interfaces: bool) -> Self {
        let mut lookup: HashMap<&str, usize> = HashMap::new();
        let mut simple: HashMap<&str, usize> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            lookup.entry(record.qualified_name.as_str()).or_insert(i);
            simple.entry(record.simple_name()).or_insert(i);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
        let mut resolved_base: Vec<Option<usize>> = vec![None; records.len()];
        for (i, record) in records.iter().enumerate() {
            let Some(raw) = record.base_type.as_deref() else {
                continue;
            };
            let resolved = lookup
                .get(raw)
                .or_else(|| lookup.get(qualify(raw, record.namespace()).as_str()))
                .or_else(|| simple.get(raw))
                .copied()
                .filter(|&base| base != i);
            if let Some(base) = resolved {
                resolved_base[i] = Some(base);
                children[base].push(i);
            }
        }

        Self {
            records,
            children,
            resolved_base,
            max_depth,
            include_interfaces,
        }
    }

    /// Build every tree, rooted at each unvisited root candidate in catalog
    /// order.
    pub fn build_forest(&self) -> Vec<HierarchyTree> {
        let mut visited = vec![false; self.records.len()];
        let mut forest = Vec::new();
        for (i, _) in self.records.iter().enumerate() {
            if self.resolved_base[i].is_none() && !visited[i] {
                forest.push(self.build_tree(i, &mut visited));
            }
        }
        forest
    }

    /// Build the single tree rooted at `root` (its derived closure).
    pub fn build_rooted(&self, root: usize) -> HierarchyTree {
        let mut visited = vec![false; self.records.len()];
        self.build_tree(root, &mut visited)
    }

    fn build_tree(&self, root: usize, visited: &mut [bool]) -> HierarchyTree {
        // Frontier expansion into a flat arena. Children slots always follow
        // their parent slot, so assembly can run back-to-front.
        let mut slots: Vec<Slot> = Vec::new();
        let mut stack: Vec<usize> = Vec::new(); // slot indices to expand

        visited[root] = true;
        slots.push(Slot {
            record: root,
            depth: 0,
            children: Vec::new(),
        });
        stack.push(0);

        while let Some(slot_idx) = stack.pop() {
            let (record, depth) = (slots[slot_idx].record, slots[slot_idx].depth);
            if depth >= self.max_depth {
                // Nodes beyond the depth limit are simply not expanded.
                continue;
            }
            for &child in &self.children[record] {
                if visited[child] {
                    continue;
                }
                visited[child] = true;
                let child_slot = slots.len();
                slots.push(Slot {
                    record: child,
                    depth: depth + 1,
                    children: Vec::new(),
                });
                slots[slot_idx].children.push(child_slot);
                stack.push(child_slot);
            }
        }

        let total_nodes = slots.len();
        let max_depth = slots.iter().map(|s| s.depth).max().unwrap_or(0);
        let has_interfaces = slots
            .iter()
            .any(|s| !self.records[s.record].interfaces.is_empty());

        // Assemble the nested shape bottom-up; every slot's children have
        // larger indices, so a reverse pass completes children first.
        let mut built: Vec<Option<HierarchyNode>> = Vec::with_capacity(slots.len());
        built.resize_with(slots.len(), || None);
        for i in (0..slots.len()).rev() {
            let slot = &slots[i];
            let record = &self.records[slot.record];
            let mut node = HierarchyNode {
                type_name: record.qualified_name.clone(),
                base_type: record.base_type.clone(),
                depth: slot.depth,
                interfaces: if self.include_interfaces {
                    record.interfaces.clone()
                } else {
                    Vec::new()
                },
                derived_types: Vec::with_capacity(slot.children.len()),
            };
            for &child in &slot.children {
                node.derived_types
                    .push(built[child].take().expect("child slot already assembled"));
            }
            built[i] = Some(node);
        }

        HierarchyTree {
            root: built[0].take().expect("root slot assembled"),
            total_nodes,
            max_depth,
            has_interfaces,
        }
    }

    /// Types with both a base type and at least one interface, ranked by
    /// `interface count + 1` descending (catalog order breaks ties).
    pub fn multiple_inheritance_patterns(&self) -> Vec<MultipleInheritancePattern> {
        let mut patterns: Vec<MultipleInheritancePattern> = self
            .records
            .iter()
            .filter(|r| r.base_type.is_some() && !r.interfaces.is_empty())
            .map(|r| MultipleInheritancePattern {
                type_name: r.qualified_name.clone(),
                base_type: r.base_type.clone().unwrap_or_default(),
                interfaces: r.interfaces.clone(),
                inheritance_count: r.interfaces.len() + 1,
            })
            .collect();
        patterns.sort_by(|a, b| b.inheritance_count.cmp(&a.inheritance_count));
        patterns
    }

    /// Types with neither a resolvable base nor any derived types, by
    /// qualified name in catalog order.
    pub fn orphaned_types(&self) -> Vec<String> {
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| self.resolved_base[*i].is_none() && self.children[*i].is_empty())
            .map(|(_, r)| r.qualified_name.clone())
            .collect()
    }

    /// Index of the record matching `name` (qualified, then simple).
    pub fn find_record(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.qualified_name == name)
            .or_else(|| self.records.iter().position(|r| r.simple_name() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::TypeKind;

    fn record(name: &str, base: Option<&str>, index: usize) -> TypeRecord {
        TypeRecord {
            qualified_name: name.to_string(),
            kind: TypeKind::Class,
            base_type: base.map(String::from),
            interfaces: vec![],
            generic_parameters: vec![],
            constraints: vec![],
            field_types: vec![],
            method_types: vec![],
            catalog_index: index,
        }
    }

    fn chain(len: usize) -> Vec<TypeRecord> {
        (0..len)
            .map(|i| {
                let base = (i > 0).then(|| format!("Chain.Level{}", i - 1));
                record(&format!("Chain.Level{i}"), base.as_deref(), i)
            })
            .collect()
    }

    #[test]
    fn test_forest_roots_and_children() {
        let records = vec![
            record("M.Animal", None, 0),
            record("M.Dog", Some("M.Animal"), 1),
            record("M.Cat", Some("M.Animal"), 2),
            record("M.Puppy", Some("M.Dog"), 3),
        ];
        let builder = HierarchyBuilder::new(&records, 5, true);
        let forest = builder.build_forest();
        assert_eq!(forest.len(), 1);

        let tree = &forest[0];
        assert_eq!(tree.root.type_name, "M.Animal");
        assert_eq!(tree.total_nodes, 4);
        assert_eq!(tree.max_depth, 2);
        assert_eq!(tree.root.derived_types.len(), 2);
        assert_eq!(tree.root.derived_types[0].type_name, "M.Dog");
        assert_eq!(tree.root.derived_types[0].derived_types[0].type_name, "M.Puppy");
        assert_eq!(tree.root.derived_types[0].derived_types[0].depth, 2);
    }

    #[test]
    fn test_depth_bound_prunes_expansion() {
        let records = chain(10);
        let builder = HierarchyBuilder::new(&records, 3, true);
        let forest = builder.build_forest();
        assert_eq!(forest.len(), 1);
        let tree = &forest[0];
        assert_eq!(tree.max_depth, 3);
        assert_eq!(tree.total_nodes, 4, "Level4+ absent from the tree");

        fn deepest(node: &HierarchyNode) -> u32 {
            node.derived_types.iter().map(deepest).max().unwrap_or(node.depth)
        }
        assert!(deepest(&tree.root) <= 3);
    }

    #[test]
    fn test_unresolvable_base_starts_a_root() {
        let records = vec![
            record("M.Widget", Some("External.Control"), 0),
            record("M.Button", Some("M.Widget"), 1),
        ];
        let builder = HierarchyBuilder::new(&records, 5, true);
        let forest = builder.build_forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].root.type_name, "M.Widget");
        assert_eq!(forest[0].root.base_type.as_deref(), Some("External.Control"));
    }

    #[test]
    fn test_trees_partition_the_catalog() {
        let records = vec![
            record("A.Root", None, 0),
            record("A.Mid", Some("A.Root"), 1),
            record("B.Root", None, 2),
            record("B.Leaf", Some("B.Root"), 3),
            record("C.Alone", None, 4),
        ];
        let builder = HierarchyBuilder::new(&records, 10, true);
        let forest = builder.build_forest();

        let mut seen = std::collections::HashSet::new();
        fn collect(node: &HierarchyNode, seen: &mut std::collections::HashSet<String>) {
            assert!(seen.insert(node.type_name.clone()));
            for child in &node.derived_types {
                collect(child, seen);
            }
        }
        for tree in &forest {
            collect(&tree.root, &mut seen);
        }
        assert_eq!(seen.len(), records.len());
    }

    #[test]
    fn test_self_referential_base_does_not_loop() {
        let records = vec![record("M.Loop", Some("M.Loop"), 0)];
        let builder = HierarchyBuilder::new(&records, 5, true);
        let forest = builder.build_forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].total_nodes, 1);
    }

    #[test]
    fn test_orphans() {
        let records = vec![
            record("M.Animal", None, 0),
            record("M.Dog", Some("M.Animal"), 1),
            record("M.Standalone", None, 2),
        ];
        let builder = HierarchyBuilder::new(&records, 5, true);
        assert_eq!(builder.orphaned_types(), vec!["M.Standalone"]);
    }

    #[test]
    fn test_multiple_inheritance_ranking() {
        let mut two = record("M.Two", Some("M.Base"), 0);
        two.interfaces = vec!["M.IA".into(), "M.IB".into()];
        let mut one = record("M.One", Some("M.Base"), 1);
        one.interfaces = vec!["M.IA".into()];
        let records = vec![two, one, record("M.Base", None, 2)];

        let builder = HierarchyBuilder::new(&records, 5, true);
        let patterns = builder.multiple_inheritance_patterns();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].type_name, "M.Two");
        assert_eq!(patterns[0].inheritance_count, 3);
        assert_eq!(patterns[1].inheritance_count, 2);
    }

    #[test]
    fn test_interfaces_omitted_when_disabled() {
        let mut dog = record("M.Dog", None, 0);
        dog.interfaces = vec!["M.IFeedable".into()];
        let builder_records = vec![dog];
        let builder = HierarchyBuilder::new(&builder_records, 5, false);
        let forest = builder.build_forest();
        assert!(forest[0].root.interfaces.is_empty());
    }
}

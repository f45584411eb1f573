//! Catalog fixture generators for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use typescope::adapters::catalog::memory::InMemoryCatalog;
use typescope::app::engine::AnalysisEngine;
use typescope::domain::record::{TypeKind, TypeRecord};

pub fn record(qualified_name: &str, kind: TypeKind) -> TypeRecord {
    TypeRecord {
        qualified_name: qualified_name.to_string(),
        kind,
        base_type: None,
        interfaces: vec![],
        generic_parameters: vec![],
        constraints: vec![],
        field_types: vec![],
        method_types: vec![],
        catalog_index: 0,
    }
}

pub fn class(qualified_name: &str) -> TypeRecord {
    record(qualified_name, TypeKind::Class)
}

pub fn class_with_base(qualified_name: &str, base: &str) -> TypeRecord {
    let mut r = class(qualified_name);
    r.base_type = Some(base.to_string());
    r
}

pub fn interface(qualified_name: &str) -> TypeRecord {
    record(qualified_name, TypeKind::Interface)
}

pub fn engine_over(records: Vec<TypeRecord>) -> AnalysisEngine {
    AnalysisEngine::new(Arc::new(InMemoryCatalog::new(records)))
}

/// Small menagerie: a two-level class tree, one interface implementor, and
/// one standalone type.
pub fn menagerie() -> Vec<TypeRecord> {
    let mut dog = class_with_base("Zoo.Dog", "Zoo.Animal");
    dog.interfaces = vec!["Zoo.IFeedable".to_string()];
    vec![
        class("Zoo.Animal"),
        dog,
        class_with_base("Zoo.Cat", "Zoo.Animal"),
        class_with_base("Zoo.Puppy", "Zoo.Dog"),
        interface("Zoo.IFeedable"),
        class("Zoo.Standalone"),
    ]
}

/// A -> B -> C -> A base-type cycle.
pub fn base_cycle() -> Vec<TypeRecord> {
    vec![
        class_with_base("Cyc.A", "Cyc.B"),
        class_with_base("Cyc.B", "Cyc.C"),
        class_with_base("Cyc.C", "Cyc.A"),
    ]
}

/// Linear chain Chain.Level0 <- Chain.Level1 <- ... <- Chain.Level{len-1}.
pub fn linear_chain(len: usize) -> Vec<TypeRecord> {
    (0..len)
        .map(|i| {
            if i == 0 {
                class("Chain.Level0")
            } else {
                class_with_base(&format!("Chain.Level{i}"), &format!("Chain.Level{}", i - 1))
            }
        })
        .collect()
}

/// Built-in numeric keywords plus string/object for assignability checks.
pub fn primitives() -> Vec<TypeRecord> {
    vec![
        record("int", TypeKind::Struct),
        record("long", TypeKind::Struct),
        record("double", TypeKind::Struct),
        record("float", TypeKind::Struct),
        class("object"),
        class_with_base("string", "object"),
    ]
}

/// Generic definitions of varying complexity plus one non-generic consumer.
pub fn generics() -> Vec<TypeRecord> {
    let mut repository = class("Data.Repository");
    repository.generic_parameters = vec!["T".to_string()];
    repository.constraints = vec!["T : class".to_string(), "T : IEntity".to_string()];

    let mut cache = class("Data.Cache");
    cache.generic_parameters = vec!["K".to_string(), "V".to_string()];
    cache.constraints = vec!["K : notnull".to_string(), "V : new()".to_string()];

    let mut consumer = class("Data.Consumer");
    consumer.field_types = vec!["Dictionary<string, List<Entity>>".to_string()];
    consumer.method_types = vec!["Task<bool>".to_string()];

    vec![repository, cache, consumer, interface("Data.IEntity")]
}

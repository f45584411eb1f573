//! Ingestion schema for extracted type metadata.
//!
//! A `TypeRecord` is the unit the catalog hands to the analysis layer: one
//! structural snapshot per declared type, populated once at ingestion and
//! never mutated afterwards.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Declared kind of a type in the source metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
}

/// Structural description of one declared type.
///
/// `qualified_name` (namespace + simple name) is the unique key within a
/// catalog. `base_type` and `interfaces` may carry simple or qualified names
/// exactly as the extractor emitted them; resolution against the catalog
/// happens during analysis, not here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeRecord {
    pub qualified_name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Raw constraint expressions, e.g. `"T : class"`. Parsed tolerantly by
    /// the generic analyzer; malformed entries are skipped there.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Type strings of declared fields, scanned for generic instantiations.
    #[serde(default)]
    pub field_types: Vec<String>,
    /// Type strings appearing in method signatures (returns and parameters).
    #[serde(default)]
    pub method_types: Vec<String>,
    /// Stable ordinal from the source catalog.
    #[serde(default)]
    pub catalog_index: usize,
}

impl TypeRecord {
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }

    pub fn namespace(&self) -> Option<&str> {
        namespace_of(&self.qualified_name)
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// True if `name` is this record's qualified or simple name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.qualified_name == name || self.simple_name() == name
    }
}

/// `Ns.Outer.Name` → `Name`. Bare names pass through unchanged.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// `Ns.Outer.Name` → `Ns.Outer`. Bare names have no namespace.
pub fn namespace_of(qualified: &str) -> Option<&str> {
    qualified.rfind('.').map(|i| &qualified[..i])
}

/// Qualify a bare name with `namespace`; names that already carry a
/// namespace pass through unchanged.
pub fn qualify(name: &str, namespace: Option<&str>) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}.{name}"),
        _ => name.to_string(),
    }
}

/// Framework-owned names, excluded from graphs unless explicitly requested.
pub fn is_system_type(name: &str) -> bool {
    name == "System" || name.starts_with("System.") || name.starts_with("Microsoft.")
}

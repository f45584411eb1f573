//! In-memory catalog adapter over a JSON export of extracted type metadata.

use crate::domain::ports::{CatalogFilter, TypeCatalog};
use crate::domain::record::{TypeKind, TypeRecord};
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Shape of the extraction pipeline's JSON export.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    types: Vec<TypeRecord>,
}

/// Catalog held entirely in memory. Records keep the order of the source
/// export; `catalog_index` is reassigned sequentially at construction so it
/// is a stable ordinal regardless of what the export carried.
pub struct InMemoryCatalog {
    records: Vec<TypeRecord>,
}

impl InMemoryCatalog {
    pub fn new(mut records: Vec<TypeRecord>) -> Self {
        for (i, record) in records.iter_mut().enumerate() {
            record.catalog_index = i;
        }
        Self { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        Ok(Self::new(file.types))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            types = catalog.records.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TypeCatalog for InMemoryCatalog {
    fn find_by_name(&self, name: &str, kinds: &[TypeKind]) -> Result<Option<TypeRecord>> {
        let kind_matches =
            |r: &TypeRecord| kinds.is_empty() || kinds.contains(&r.kind);
        // Qualified match wins over the first simple-name match.
        let found = self
            .records
            .iter()
            .find(|r| r.qualified_name == name && kind_matches(r))
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.simple_name() == name && kind_matches(r))
            });
        Ok(found.cloned())
    }

    fn find_all(&self, filter: &CatalogFilter) -> Result<Vec<TypeRecord>> {
        let mut out: Vec<TypeRecord> = self
            .records
            .iter()
            .filter(|r| match &filter.namespace {
                Some(ns) => r
                    .namespace()
                    .is_some_and(|n| n == ns.as_str() || n.starts_with(&format!("{ns}."))),
                None => true,
            })
            .filter(|r| filter.kinds.is_empty() || filter.kinds.contains(&r.kind))
            .filter(|r| !filter.generic_only || r.is_generic())
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"{
        "types": [
            {"qualified_name": "Game.Player", "kind": "class", "base_type": "Game.Entity"},
            {"qualified_name": "Game.Entity", "kind": "class"},
            {"qualified_name": "Game.Items.Sword", "kind": "class"},
            {"qualified_name": "Game.IDamageable", "kind": "interface"}
        ]
    }"#;

    #[test]
    fn test_load_from_json_and_reindex() {
        let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 4);
        let all = catalog.find_all(&CatalogFilter::all()).unwrap();
        assert_eq!(all[2].catalog_index, 2);
    }

    #[test]
    fn test_find_by_simple_and_qualified_name() {
        let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON).unwrap();
        let by_simple = catalog.find_by_name("Player", &[]).unwrap().unwrap();
        assert_eq!(by_simple.qualified_name, "Game.Player");
        let by_qualified = catalog.find_by_name("Game.Items.Sword", &[]).unwrap();
        assert!(by_qualified.is_some());
        assert!(catalog.find_by_name("Missing", &[]).unwrap().is_none());
    }

    #[test]
    fn test_kind_filter() {
        let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON).unwrap();
        let found = catalog
            .find_by_name("Game.Player", &[TypeKind::Interface])
            .unwrap();
        assert!(found.is_none());

        let interfaces = catalog
            .find_all(&CatalogFilter {
                kinds: vec![TypeKind::Interface],
                ..CatalogFilter::all()
            })
            .unwrap();
        assert_eq!(interfaces.len(), 1);
    }

    #[test]
    fn test_namespace_filter_matches_nested() {
        let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON).unwrap();
        let game = catalog
            .find_all(&CatalogFilter::all().with_namespace(Some("Game".to_string())))
            .unwrap();
        assert_eq!(game.len(), 4, "Game.Items nests under Game");

        let items = catalog
            .find_all(&CatalogFilter::all().with_namespace(Some("Game.Items".to_string())))
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(InMemoryCatalog::from_json_str("not json").is_err());
    }
}

//! Mock catalog implementations for integration tests.
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use typescope::domain::ports::{CatalogFilter, TypeCatalog};
use typescope::domain::record::{TypeKind, TypeRecord};

/// Catalog whose every access fails, for exercising error propagation.
pub struct FailingCatalog;

impl TypeCatalog for FailingCatalog {
    fn find_by_name(&self, _name: &str, _kinds: &[TypeKind]) -> Result<Option<TypeRecord>> {
        Err(anyhow!("catalog store unreachable"))
    }

    fn find_all(&self, _filter: &CatalogFilter) -> Result<Vec<TypeRecord>> {
        Err(anyhow!("catalog store unreachable"))
    }
}

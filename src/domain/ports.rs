use crate::domain::record::{TypeKind, TypeRecord};
use anyhow::Result;

/// Filter for bulk catalog queries.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Restrict to types whose namespace starts with this prefix.
    pub namespace: Option<String>,
    /// Restrict to these kinds; empty means all kinds.
    pub kinds: Vec<TypeKind>,
    /// Only types with at least one generic parameter.
    pub generic_only: bool,
    pub limit: Option<usize>,
}

impl CatalogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn generic_only(mut self) -> Self {
        self.generic_only = true;
        self
    }
}

/// Type catalog port (implemented by adapters). The analysis layer only ever
/// reads from the catalog; one fetch per analysis call produces the snapshot
/// every algorithm then runs on.
pub trait TypeCatalog: Send + Sync {
    /// Look up a single type by qualified or simple name, optionally narrowed
    /// to `kinds` (empty slice means any kind).
    fn find_by_name(&self, name: &str, kinds: &[TypeKind]) -> Result<Option<TypeRecord>>;

    /// All records matching `filter`, in stable catalog order.
    fn find_all(&self, filter: &CatalogFilter) -> Result<Vec<TypeRecord>>;
}

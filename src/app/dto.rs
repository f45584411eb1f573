use crate::domain::cluster::TypeCluster;
use crate::domain::compat::CompatibilityVerdict;
use crate::domain::generics::{
    ConstraintRelationship, GenericComplexityMetrics, GenericInstantiation, GenericTypeDefinition,
};
use crate::domain::graph::{DependencyEdge, DependencyNode};
use crate::domain::hierarchy::{HierarchyTree, MultipleInheritancePattern};
use crate::domain::metrics::DependencyMetrics;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_max_depth() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_complexity_threshold() -> usize {
    1
}

fn default_matrix_limit() -> usize {
    20
}

/// Echo block attached to every analysis result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisMetadata {
    /// The request parameters exactly as resolved (defaults applied).
    pub parameters: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub types_analyzed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DependencyAnalysisRequest {
    /// Restrict the analysis to this type's neighborhood.
    pub target_type: Option<String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default = "default_true")]
    pub include_circular_detection: bool,
    #[serde(default)]
    pub include_system_types: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DependencyAnalysisResponse {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub clusters: Vec<TypeCluster>,
    pub metrics: DependencyMetrics,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyAnalysisRequest {
    /// Build only the tree rooted at this type.
    pub target_type: Option<String>,
    #[serde(default = "default_true")]
    pub include_interfaces: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    /// Restrict the snapshot to types under this namespace prefix.
    pub namespace_filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HierarchyAnalysisResponse {
    pub hierarchies: Vec<HierarchyTree>,
    pub multiple_inheritance_patterns: Vec<MultipleInheritancePattern>,
    pub orphaned_types: Vec<String>,
    /// The configured depth bound the trees were built under.
    pub max_depth: u32,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenericAnalysisRequest {
    /// Analyze this type only; it must be generic.
    pub target_type: Option<String>,
    #[serde(default = "default_true")]
    pub include_constraints: bool,
    #[serde(default)]
    pub include_instantiations: bool,
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenericAnalysisResponse {
    pub generic_type_definitions: Vec<GenericTypeDefinition>,
    pub constraint_relationships: Vec<ConstraintRelationship>,
    pub generic_instantiations: Vec<GenericInstantiation>,
    pub complexity_metrics: GenericComplexityMetrics,
    pub analysis_metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityAnalysisRequest {
    /// Pair mode: both `from_type` and `to_type`, or neither for matrix mode.
    pub from_type: Option<String>,
    pub to_type: Option<String>,
    #[serde(default = "default_true")]
    pub include_conversion_paths: bool,
    #[serde(default = "default_true")]
    pub include_implicit_conversions: bool,
    /// Matrix mode takes the first N types in catalog order.
    #[serde(default = "default_matrix_limit")]
    pub matrix_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityAnalysisResponse {
    /// Pair-mode verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<CompatibilityVerdict>,
    /// Matrix-mode verdict list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_matrix: Option<Vec<CompatibilityVerdict>>,
    pub analysis_metadata: AnalysisMetadata,
}

/// Liveness summary for the server surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub catalog_types: usize,
}

use crate::app::dto::*;
use crate::domain::builder::GraphBuilder;
use crate::domain::cluster::detect_clusters;
use crate::domain::compat::CompatibilityResolver;
use crate::domain::error::{AnalysisError, AnalysisResult};
use crate::domain::generics::GenericAnalyzer;
use crate::domain::graph::TypeGraph;
use crate::domain::hierarchy::HierarchyBuilder;
use crate::domain::metrics::compute_metrics;
use crate::domain::ports::{CatalogFilter, TypeCatalog};
use crate::domain::record::TypeRecord;
use chrono::Utc;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Analysis engine: one catalog fetch per call, then synchronous, CPU-bound
/// computation over the owned snapshot. Cloning shares the catalog handle
/// only; no state survives a call.
#[derive(Clone)]
pub struct AnalysisEngine {
    catalog: Arc<dyn TypeCatalog>,
}

impl AnalysisEngine {
    pub fn new(catalog: Arc<dyn TypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn health(&self) -> AnalysisResult<HealthResponse> {
        let records = self.catalog.find_all(&CatalogFilter::all())?;
        Ok(HealthResponse {
            catalog_types: records.len(),
        })
    }

    pub fn analyze_dependencies(
        &self,
        req: DependencyAnalysisRequest,
    ) -> AnalysisResult<DependencyAnalysisResponse> {
        validate_range(req.max_depth as usize, "max_depth")?;

        let records = self.catalog.find_all(&CatalogFilter::all())?;
        let mut graph = GraphBuilder::new(req.include_system_types).build(&records);
        if graph.node_count() == 0 {
            return Err(AnalysisError::EmptyCatalog { what: "types" });
        }

        if let Some(target) = req.target_type.as_deref() {
            let start = find_node(&graph, target)
                .ok_or_else(|| AnalysisError::not_found(target))?;
            graph = neighborhood(&graph, start, req.max_depth, req.include_system_types);
        }

        let clusters = if req.include_circular_detection {
            detect_clusters(&graph)
        } else {
            Vec::new()
        };
        let metrics = compute_metrics(&graph, &clusters);
        info!(
            nodes = metrics.total_nodes,
            edges = metrics.total_edges,
            clusters = metrics.cluster_count,
            "dependency analysis complete"
        );

        let types_analyzed = graph.node_count();
        Ok(DependencyAnalysisResponse {
            nodes: graph.node_views(),
            edges: graph.edge_views(),
            clusters,
            metrics,
            analysis_metadata: metadata(&req, types_analyzed),
        })
    }

    pub fn analyze_hierarchies(
        &self,
        req: HierarchyAnalysisRequest,
    ) -> AnalysisResult<HierarchyAnalysisResponse> {
        validate_range(req.max_depth as usize, "max_depth")?;

        let filter = CatalogFilter::all().with_namespace(req.namespace_filter.clone());
        let records = self.catalog.find_all(&filter)?;
        if records.is_empty() {
            return Err(AnalysisError::EmptyCatalog { what: "classes" });
        }

        let builder = HierarchyBuilder::new(&records, req.max_depth, req.include_interfaces);
        let hierarchies = match req.target_type.as_deref() {
            Some(target) => {
                let root = builder
                    .find_record(target)
                    .ok_or_else(|| AnalysisError::not_found(target))?;
                vec![builder.build_rooted(root)]
            }
            None => builder.build_forest(),
        };

        Ok(HierarchyAnalysisResponse {
            multiple_inheritance_patterns: builder.multiple_inheritance_patterns(),
            orphaned_types: builder.orphaned_types(),
            hierarchies,
            max_depth: req.max_depth,
            analysis_metadata: metadata(&req, records.len()),
        })
    }

    pub fn analyze_generic_types(
        &self,
        req: GenericAnalysisRequest,
    ) -> AnalysisResult<GenericAnalysisResponse> {
        validate_range(req.complexity_threshold, "complexity_threshold")?;

        let records = self.catalog.find_all(&CatalogFilter::all())?;
        let snapshot: Vec<TypeRecord> = match req.target_type.as_deref() {
            Some(target) => {
                let record = records
                    .iter()
                    .find(|r| r.matches_name(target))
                    .ok_or_else(|| AnalysisError::not_found(target))?;
                if !record.is_generic() {
                    return Err(AnalysisError::invalid(format!(
                        "{target} is not a generic type"
                    )));
                }
                vec![record.clone()]
            }
            None => records,
        };

        let generic_count = snapshot.iter().filter(|r| r.is_generic()).count();
        if generic_count == 0 {
            return Err(AnalysisError::EmptyCatalog {
                what: "generic types",
            });
        }

        let analyzer = GenericAnalyzer::new(req.complexity_threshold);
        let constraint_relationships = if req.include_constraints {
            analyzer.constraint_relationships(&snapshot)
        } else {
            Vec::new()
        };
        let generic_instantiations = if req.include_instantiations {
            analyzer.instantiations(&snapshot)
        } else {
            Vec::new()
        };

        Ok(GenericAnalysisResponse {
            generic_type_definitions: analyzer.definitions(&snapshot),
            constraint_relationships,
            generic_instantiations,
            complexity_metrics: analyzer.complexity_metrics(&snapshot),
            analysis_metadata: metadata(&req, generic_count),
        })
    }

    pub fn analyze_compatibility(
        &self,
        req: CompatibilityAnalysisRequest,
    ) -> AnalysisResult<CompatibilityAnalysisResponse> {
        match (req.from_type.as_deref(), req.to_type.as_deref()) {
            (Some(from), Some(to)) => {
                let from_record = self
                    .catalog
                    .find_by_name(from, &[])?
                    .ok_or_else(|| AnalysisError::not_found(from))?;
                let to_record = self
                    .catalog
                    .find_by_name(to, &[])?
                    .ok_or_else(|| AnalysisError::not_found(to))?;

                let records = self.catalog.find_all(&CatalogFilter::all())?;
                let resolver = CompatibilityResolver::new(
                    &records,
                    req.include_conversion_paths,
                    req.include_implicit_conversions,
                );
                let verdict = resolver.resolve(&from_record, &to_record);
                Ok(CompatibilityAnalysisResponse {
                    verdict: Some(verdict),
                    compatibility_matrix: None,
                    analysis_metadata: metadata(&req, 2),
                })
            }
            (None, None) => {
                if req.matrix_limit == 0 {
                    return Err(AnalysisError::invalid("matrix_limit must be at least 1"));
                }
                let records = self.catalog.find_all(&CatalogFilter::all())?;
                if records.is_empty() {
                    return Err(AnalysisError::EmptyCatalog { what: "types" });
                }
                let resolver = CompatibilityResolver::new(
                    &records,
                    req.include_conversion_paths,
                    req.include_implicit_conversions,
                );
                let matrix = resolver.resolve_matrix(&records, req.matrix_limit);
                let types_analyzed = records.len().min(req.matrix_limit);
                Ok(CompatibilityAnalysisResponse {
                    verdict: None,
                    compatibility_matrix: Some(matrix),
                    analysis_metadata: metadata(&req, types_analyzed),
                })
            }
            _ => Err(AnalysisError::invalid(
                "from_type and to_type must be provided together",
            )),
        }
    }
}

fn validate_range(value: usize, name: &str) -> AnalysisResult<()> {
    if (1..=10).contains(&value) {
        Ok(())
    } else {
        Err(AnalysisError::invalid(format!(
            "{name} must be between 1 and 10, got {value}"
        )))
    }
}

fn metadata<R: Serialize>(req: &R, types_analyzed: usize) -> AnalysisMetadata {
    AnalysisMetadata {
        parameters: serde_json::to_value(req).unwrap_or_default(),
        timestamp: Utc::now(),
        types_analyzed,
    }
}

/// Find a node by qualified name, falling back to a simple-name scan.
fn find_node(graph: &TypeGraph, name: &str) -> Option<NodeIndex> {
    graph.node_by_name(name).or_else(|| {
        graph
            .graph
            .node_indices()
            .find(|&idx| graph.record(idx).simple_name() == name)
    })
}

/// Rebuild the graph restricted to the records within `max_depth` undirected
/// hops of `start`.
fn neighborhood(graph: &TypeGraph, start: NodeIndex, max_depth: u32, include_system: bool) -> TypeGraph {
    let mut reached: HashSet<NodeIndex> = HashSet::new();
    reached.insert(start);
    let mut frontier = vec![start];
    for _ in 0..max_depth {
        let mut next = Vec::new();
        for &idx in &frontier {
            for dir in [Direction::Outgoing, Direction::Incoming] {
                for neighbor in graph.graph.neighbors_directed(idx, dir) {
                    if reached.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    let subset: Vec<TypeRecord> = graph
        .graph
        .node_indices()
        .filter(|idx| reached.contains(idx))
        .map(|idx| graph.record(idx).clone())
        .collect();
    GraphBuilder::new(include_system).build(&subset)
}

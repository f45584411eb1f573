//! Dependency analysis integration tests: graph shape, clusters, cycles,
//! and the metrics invariants.

mod common;

use common::fixtures::{base_cycle, class_with_base, engine_over, linear_chain, menagerie};
use typescope::app::dto::DependencyAnalysisRequest;

fn request() -> DependencyAnalysisRequest {
    DependencyAnalysisRequest {
        target_type: None,
        max_depth: 5,
        include_circular_detection: true,
        include_system_types: false,
    }
}

#[test]
fn test_dependency_counts_match_edge_count() {
    let engine = engine_over(menagerie());
    let res = engine.analyze_dependencies(request()).unwrap();

    let total_deps: usize = res.nodes.iter().map(|n| n.dependencies.len()).sum();
    assert_eq!(total_deps, res.edges.len());
    let total_dependents: usize = res.nodes.iter().map(|n| n.dependents.len()).sum();
    assert_eq!(total_dependents, res.edges.len());
}

#[test]
fn test_edges_only_between_retained_nodes() {
    let engine = engine_over(menagerie());
    let res = engine.analyze_dependencies(request()).unwrap();

    let names: std::collections::HashSet<_> =
        res.nodes.iter().map(|n| n.qualified_name.as_str()).collect();
    for edge in &res.edges {
        assert!(names.contains(edge.from.as_str()));
        assert!(names.contains(edge.to.as_str()));
    }
}

#[test]
fn test_three_cycle_is_one_circular_cluster() {
    let engine = engine_over(base_cycle());
    let res = engine.analyze_dependencies(request()).unwrap();

    assert_eq!(res.clusters.len(), 1);
    assert_eq!(res.clusters[0].types.len(), 3);
    assert!(res.clusters[0].is_circular);
    assert_eq!(res.metrics.circular_dependencies, 1);
}

#[test]
fn test_cluster_partition_is_disjoint() {
    let mut records = menagerie();
    records.extend(base_cycle());
    let engine = engine_over(records);
    let res = engine.analyze_dependencies(request()).unwrap();

    let mut seen = std::collections::HashSet::new();
    for cluster in &res.clusters {
        for name in &cluster.types {
            assert!(seen.insert(name.clone()), "{name} in two clusters");
        }
    }
}

#[test]
fn test_system_filtering_consistent_between_nodes_and_edges() {
    let records = vec![
        class_with_base("App.Config", "System.Object"),
        class_with_base("App.Settings", "App.Config"),
    ];
    let engine = engine_over(records.clone());

    let filtered = engine.analyze_dependencies(request()).unwrap();
    assert_eq!(filtered.nodes.len(), 2);
    assert_eq!(filtered.edges.len(), 1);
    let total_deps: usize = filtered.nodes.iter().map(|n| n.dependencies.len()).sum();
    assert_eq!(total_deps, filtered.edges.len());

    let mut req = request();
    req.include_system_types = true;
    let engine = engine_over(records);
    let kept = engine.analyze_dependencies(req).unwrap();
    // System.Object is not a retained record, so it still contributes no node.
    assert_eq!(kept.nodes.len(), 2);
    assert_eq!(kept.edges.len(), 1);
}

#[test]
fn test_chain_metrics_and_topological_depth() {
    let engine = engine_over(linear_chain(4));
    let res = engine.analyze_dependencies(request()).unwrap();

    assert_eq!(res.metrics.total_nodes, 4);
    assert_eq!(res.metrics.total_edges, 3);
    assert_eq!(res.metrics.max_depth, 3);
    assert_eq!(res.metrics.max_dependencies, 1);
    assert!((res.metrics.average_dependencies - 0.75).abs() < 1e-9);
}

#[test]
fn test_cycle_members_excluded_from_depth() {
    let mut records = base_cycle();
    records.extend(linear_chain(2));
    let engine = engine_over(records);
    let res = engine.analyze_dependencies(request()).unwrap();
    // The two-link chain still peels to depth 1; the cycle contributes nothing.
    assert_eq!(res.metrics.max_depth, 1);
}

#[test]
fn test_circular_detection_can_be_disabled() {
    let engine = engine_over(base_cycle());
    let mut req = request();
    req.include_circular_detection = false;
    let res = engine.analyze_dependencies(req).unwrap();
    assert!(res.clusters.is_empty());
    assert_eq!(res.metrics.circular_dependencies, 0);
    assert_eq!(res.metrics.cluster_count, 0);
}

#[test]
fn test_centrality_is_normalized_degree() {
    let engine = engine_over(menagerie());
    let res = engine.analyze_dependencies(request()).unwrap();
    let total = res.nodes.len() as f64;

    let animal = res
        .nodes
        .iter()
        .find(|n| n.qualified_name == "Zoo.Animal")
        .unwrap();
    assert_eq!(
        animal.centrality,
        (animal.dependencies.len() + animal.dependents.len()) as f64 / total
    );
    // Dog and Cat both derive from Animal.
    assert_eq!(animal.dependents.len(), 2);
}

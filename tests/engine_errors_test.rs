//! Engine-level error taxonomy and metadata tests across all operations.

mod common;

use common::fixtures::{engine_over, menagerie};
use common::mock::FailingCatalog;
use std::sync::Arc;
use typescope::app::dto::{
    CompatibilityAnalysisRequest, DependencyAnalysisRequest, GenericAnalysisRequest,
    HierarchyAnalysisRequest,
};
use typescope::app::engine::AnalysisEngine;
use typescope::domain::error::AnalysisError;

fn deps() -> DependencyAnalysisRequest {
    DependencyAnalysisRequest {
        target_type: None,
        max_depth: 5,
        include_circular_detection: true,
        include_system_types: false,
    }
}

fn hierarchies() -> HierarchyAnalysisRequest {
    HierarchyAnalysisRequest {
        target_type: None,
        include_interfaces: true,
        max_depth: 5,
        namespace_filter: None,
    }
}

fn generics() -> GenericAnalysisRequest {
    GenericAnalysisRequest {
        target_type: None,
        include_constraints: true,
        include_instantiations: false,
        complexity_threshold: 1,
    }
}

fn compatibility() -> CompatibilityAnalysisRequest {
    CompatibilityAnalysisRequest {
        from_type: None,
        to_type: None,
        include_conversion_paths: true,
        include_implicit_conversions: true,
        matrix_limit: 20,
    }
}

#[test]
fn test_every_operation_fails_on_empty_catalog() {
    let engine = engine_over(vec![]);

    assert!(matches!(
        engine.analyze_dependencies(deps()).unwrap_err(),
        AnalysisError::EmptyCatalog { .. }
    ));
    assert!(matches!(
        engine.analyze_hierarchies(hierarchies()).unwrap_err(),
        AnalysisError::EmptyCatalog { .. }
    ));
    assert!(matches!(
        engine.analyze_generic_types(generics()).unwrap_err(),
        AnalysisError::EmptyCatalog { .. }
    ));
    assert!(matches!(
        engine.analyze_compatibility(compatibility()).unwrap_err(),
        AnalysisError::EmptyCatalog { .. }
    ));
}

#[test]
fn test_catalog_access_errors_propagate() {
    let engine = AnalysisEngine::new(Arc::new(FailingCatalog));

    let err = engine.analyze_dependencies(deps()).unwrap_err();
    assert!(matches!(err, AnalysisError::CatalogAccess(_)));
    assert!(err.to_string().contains("catalog store unreachable"));

    assert!(matches!(
        engine.analyze_hierarchies(hierarchies()).unwrap_err(),
        AnalysisError::CatalogAccess(_)
    ));
    assert!(matches!(
        engine.analyze_generic_types(generics()).unwrap_err(),
        AnalysisError::CatalogAccess(_)
    ));
    assert!(matches!(
        engine.analyze_compatibility(compatibility()).unwrap_err(),
        AnalysisError::CatalogAccess(_)
    ));
}

#[test]
fn test_depth_bounds_enforced_on_both_ends() {
    let engine = engine_over(menagerie());

    let mut low = deps();
    low.max_depth = 0;
    assert!(matches!(
        engine.analyze_dependencies(low).unwrap_err(),
        AnalysisError::InvalidParameter { .. }
    ));

    let mut high = hierarchies();
    high.max_depth = 11;
    assert!(matches!(
        engine.analyze_hierarchies(high).unwrap_err(),
        AnalysisError::InvalidParameter { .. }
    ));
}

#[test]
fn test_metadata_present_on_every_operation() {
    let mut records = menagerie();
    let mut pool = common::fixtures::class("Zoo.Pool");
    pool.generic_parameters = vec!["T".to_string()];
    records.push(pool);
    let engine = engine_over(records);

    let deps_res = engine.analyze_dependencies(deps()).unwrap();
    assert_eq!(deps_res.analysis_metadata.types_analyzed, 7);
    assert_eq!(
        deps_res.analysis_metadata.parameters["include_system_types"],
        serde_json::json!(false)
    );

    let hier_res = engine.analyze_hierarchies(hierarchies()).unwrap();
    assert_eq!(hier_res.analysis_metadata.types_analyzed, 7);

    let gen_res = engine.analyze_generic_types(generics()).unwrap();
    assert_eq!(gen_res.analysis_metadata.types_analyzed, 1);

    let compat_res = engine.analyze_compatibility(compatibility()).unwrap();
    assert_eq!(compat_res.analysis_metadata.types_analyzed, 7);
    assert_eq!(
        compat_res.analysis_metadata.parameters["matrix_limit"],
        serde_json::json!(20)
    );
}

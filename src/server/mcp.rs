use crate::app::dto::*;
use crate::app::engine::AnalysisEngine;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};
use tokio::task::spawn_blocking;

#[derive(Clone)]
pub struct TypeScopeMcpServer {
    engine: AnalysisEngine,
    tool_router: ToolRouter<Self>,
}

impl TypeScopeMcpServer {
    pub fn new(engine: AnalysisEngine) -> Self {
        Self {
            engine,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl TypeScopeMcpServer {
    #[tool(
        description = "Build the dependency graph of the catalog (or one type's neighborhood) with cluster and cycle detection."
    )]
    async fn analyze_dependencies(
        &self,
        params: Parameters<DependencyAnalysisRequest>,
    ) -> Result<Json<DependencyAnalysisResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.analyze_dependencies(req))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Reconstruct inheritance trees, multiple-inheritance patterns, and orphaned types."
    )]
    async fn analyze_hierarchies(
        &self,
        params: Parameters<HierarchyAnalysisRequest>,
    ) -> Result<Json<HierarchyAnalysisResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.analyze_hierarchies(req))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Score generic type definitions, their constraints, and concrete instantiations."
    )]
    async fn analyze_generic_types(
        &self,
        params: Parameters<GenericAnalysisRequest>,
    ) -> Result<Json<GenericAnalysisResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.analyze_generic_types(req))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Judge assignability/convertibility of one type pair, or a bounded matrix of catalog types."
    )]
    async fn analyze_compatibility(
        &self,
        params: Parameters<CompatibilityAnalysisRequest>,
    ) -> Result<Json<CompatibilityAnalysisResponse>, String> {
        let engine = self.engine.clone();
        let req = params.0;
        spawn_blocking(move || engine.analyze_compatibility(req))
            .await
            .map_err(|e| format!("task join error: {e}"))?
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for TypeScopeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Structural analysis over a catalog of types extracted from decompiled assemblies."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

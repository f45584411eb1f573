use crate::adapters::catalog::memory::InMemoryCatalog;
use crate::app::dto::{
    CompatibilityAnalysisRequest, DependencyAnalysisRequest, GenericAnalysisRequest,
    HierarchyAnalysisRequest,
};
use crate::app::engine::AnalysisEngine;
use crate::server;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "tscope",
    version,
    about = "Structural analysis of type catalogs extracted from decompiled assemblies"
)]
pub struct Cli {
    /// Path to the extracted catalog JSON.
    #[arg(long, global = true, default_value = "catalog.json")]
    pub catalog: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Dependency graph with cluster/cycle detection and metrics.
    Deps {
        /// Restrict to this type's neighborhood.
        target: Option<String>,
        #[arg(long, default_value_t = 5)]
        max_depth: u32,
        #[arg(long)]
        include_system_types: bool,
        /// Skip cluster and cycle detection.
        #[arg(long)]
        no_cycles: bool,
    },
    /// Inheritance trees, multiple-inheritance patterns, and orphans.
    Hierarchy {
        /// Build only the tree rooted at this type.
        target: Option<String>,
        #[arg(long, default_value_t = 5)]
        max_depth: u32,
        /// Restrict to types under this namespace prefix.
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        no_interfaces: bool,
    },
    /// Generic type definitions, constraints, and instantiations.
    Generics {
        /// Analyze this (generic) type only.
        target: Option<String>,
        #[arg(long, default_value_t = 1)]
        threshold: usize,
        /// Also extract concrete instantiations from member types.
        #[arg(long)]
        instantiations: bool,
    },
    /// Compatibility verdict for a pair, or a bounded matrix.
    Compat {
        from: Option<String>,
        to: Option<String>,
        #[arg(long, default_value_t = 20)]
        matrix_limit: usize,
        #[arg(long)]
        no_implicit: bool,
    },
    /// Serve the engine over HTTP.
    Http {
        #[arg(long, default_value = "127.0.0.1:8087")]
        addr: SocketAddr,
    },
    /// Serve the engine as an MCP server on stdio.
    Mcp,
}

pub async fn run(cli: Cli) -> Result<()> {
    let catalog = InMemoryCatalog::load(&cli.catalog)?;
    let engine = AnalysisEngine::new(Arc::new(catalog));

    match cli.command {
        Command::Deps {
            target,
            max_depth,
            include_system_types,
            no_cycles,
        } => print_json(&engine.analyze_dependencies(DependencyAnalysisRequest {
            target_type: target,
            max_depth,
            include_circular_detection: !no_cycles,
            include_system_types,
        })?),
        Command::Hierarchy {
            target,
            max_depth,
            namespace,
            no_interfaces,
        } => print_json(&engine.analyze_hierarchies(HierarchyAnalysisRequest {
            target_type: target,
            include_interfaces: !no_interfaces,
            max_depth,
            namespace_filter: namespace,
        })?),
        Command::Generics {
            target,
            threshold,
            instantiations,
        } => print_json(&engine.analyze_generic_types(GenericAnalysisRequest {
            target_type: target,
            include_constraints: true,
            include_instantiations: instantiations,
            complexity_threshold: threshold,
        })?),
        Command::Compat {
            from,
            to,
            matrix_limit,
            no_implicit,
        } => print_json(&engine.analyze_compatibility(CompatibilityAnalysisRequest {
            from_type: from,
            to_type: to,
            include_conversion_paths: true,
            include_implicit_conversions: !no_implicit,
            matrix_limit,
        })?),
        Command::Http { addr } => server::http::serve(engine, addr).await,
        Command::Mcp => {
            server::mcp::TypeScopeMcpServer::new(engine)
                .serve_stdio()
                .await
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

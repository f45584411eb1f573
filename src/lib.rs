//! typescope library — dependency graphs, inheritance trees, generic
//! constraint scoring, and compatibility verdicts over a catalog of types
//! extracted from decompiled assemblies.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;

use crate::domain::record::{TypeKind, TypeRecord};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Classification of one parsed constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Class,
    Struct,
    Constructor,
    NotNull,
    Interface,
    Type,
}

/// One `<parameter> : <target>` pair parsed from a raw constraint string.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConstraintRelationship {
    pub source_type: String,
    pub target_parameter: String,
    pub constraint_kind: ConstraintKind,
    pub constraint_target: String,
}

/// A retained generic type with its scoring.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenericTypeDefinition {
    pub qualified_name: String,
    pub kind: TypeKind,
    pub generic_parameters: Vec<String>,
    pub constraint_count: usize,
    /// Parameter count plus raw constraint count.
    pub complexity_score: usize,
}

/// A concrete `Name<Arg1,...>` occurrence found in member type strings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenericInstantiation {
    /// Type whose member declared the instantiation.
    pub container_type: String,
    pub base_name: String,
    pub type_arguments: Vec<String>,
    /// Argument count.
    pub complexity_score: usize,
}

/// Aggregates over the retained generic definitions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenericComplexityMetrics {
    pub generic_type_count: usize,
    pub average_parameter_count: f64,
    pub max_parameter_count: usize,
    pub total_constraint_count: usize,
    /// Deepest run of nested generic brackets across parameter names.
    pub max_nesting_depth: usize,
}

/// Generic parameter/constraint analysis, independent of the dependency
/// graph: operates directly on records with a non-empty parameter list.
pub struct GenericAnalyzer {
    complexity_threshold: usize,
}

impl GenericAnalyzer {
    pub fn new(complexity_threshold: usize) -> Self {
        Self {
            complexity_threshold,
        }
    }

    /// Retained definitions: generic records whose parameter count meets the
    /// threshold, in catalog order.
    pub fn definitions(&self, records: &[TypeRecord]) -> Vec<GenericTypeDefinition> {
        records
            .iter()
            .filter(|r| r.generic_parameters.len() >= self.complexity_threshold)
            .map(|r| GenericTypeDefinition {
                qualified_name: r.qualified_name.clone(),
                kind: r.kind,
                generic_parameters: r.generic_parameters.clone(),
                constraint_count: r.constraints.len(),
                complexity_score: r.generic_parameters.len() + r.constraints.len(),
            })
            .collect()
    }

    /// Parse every raw constraint of the retained records. Malformed strings
    /// are skipped with a diagnostic, never a failure.
    pub fn constraint_relationships(&self, records: &[TypeRecord]) -> Vec<ConstraintRelationship> {
        let mut relationships = Vec::new();
        for record in records
            .iter()
            .filter(|r| r.generic_parameters.len() >= self.complexity_threshold)
        {
            for raw in &record.constraints {
                let Some((parameter, targets)) = split_constraint(raw) else {
                    debug!(
                        type_name = %record.qualified_name,
                        constraint = %raw,
                        "unparseable constraint expression, skipping"
                    );
                    continue;
                };
                for target in targets {
                    relationships.push(ConstraintRelationship {
                        source_type: record.qualified_name.clone(),
                        target_parameter: parameter.clone(),
                        constraint_kind: classify_constraint(&target),
                        constraint_target: target,
                    });
                }
            }
        }
        relationships
    }

    /// Aggregate metrics over the retained definitions.
    pub fn complexity_metrics(&self, records: &[TypeRecord]) -> GenericComplexityMetrics {
        let retained: Vec<&TypeRecord> = records
            .iter()
            .filter(|r| r.generic_parameters.len() >= self.complexity_threshold)
            .collect();

        let generic_type_count = retained.len();
        let total_parameters: usize = retained.iter().map(|r| r.generic_parameters.len()).sum();
        let average_parameter_count = if generic_type_count == 0 {
            0.0
        } else {
            total_parameters as f64 / generic_type_count as f64
        };
        let max_parameter_count = retained
            .iter()
            .map(|r| r.generic_parameters.len())
            .max()
            .unwrap_or(0);
        let total_constraint_count = retained.iter().map(|r| r.constraints.len()).sum();
        let max_nesting_depth = retained
            .iter()
            .flat_map(|r| r.generic_parameters.iter())
            .map(|p| nesting_depth(p))
            .max()
            .unwrap_or(0);

        GenericComplexityMetrics {
            generic_type_count,
            average_parameter_count,
            max_parameter_count,
            total_constraint_count,
            max_nesting_depth,
        }
    }

    /// Scan member type strings of every record for concrete instantiations.
    pub fn instantiations(&self, records: &[TypeRecord]) -> Vec<GenericInstantiation> {
        let mut found = Vec::new();
        for record in records {
            for member in record.field_types.iter().chain(record.method_types.iter()) {
                extract_instantiations(&record.qualified_name, member, &mut found);
            }
        }
        found
    }
}

/// Split a raw constraint into its parameter and comma-separated targets.
/// Tolerates a leading `where` and arbitrary spacing; returns `None` when
/// either side of the colon is missing.
fn split_constraint(raw: &str) -> Option<(String, Vec<String>)> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("where ").unwrap_or(trimmed).trim();
    let (parameter, rest) = trimmed.split_once(':')?;
    let parameter = parameter.trim();
    if parameter.is_empty() {
        return None;
    }
    let targets: Vec<String> = split_top_level(rest)
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if targets.is_empty() {
        return None;
    }
    Some((parameter.to_string(), targets))
}

/// Substring classification in priority order; the interface heuristic is a
/// leading `I` with an uppercase second letter and no generic brackets.
fn classify_constraint(target: &str) -> ConstraintKind {
    if target.contains("class") {
        ConstraintKind::Class
    } else if target.contains("struct") {
        ConstraintKind::Struct
    } else if target.contains("new()") {
        ConstraintKind::Constructor
    } else if target.contains("notnull") {
        ConstraintKind::NotNull
    } else if looks_like_interface(target) {
        ConstraintKind::Interface
    } else {
        ConstraintKind::Type
    }
}

fn looks_like_interface(name: &str) -> bool {
    if name.contains('<') {
        return false;
    }
    let simple = name.rsplit('.').next().unwrap_or(name);
    let mut chars = simple.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Deepest run of nested `<...>` brackets in a type string.
fn nesting_depth(s: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    for c in s.chars() {
        match c {
            '<' => {
                depth += 1;
                max = max.max(depth);
            }
            '>' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Split on commas outside any `<...>` nesting.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

static INSTANTIATION_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_.]*)\s*<").expect("instantiation regex"));

/// Find `Name<Arg1,...>` occurrences in one member type string. The regex
/// anchors the head; the argument list is completed with a bracket-depth
/// scan so nested instantiations keep their full argument text.
fn extract_instantiations(container: &str, member: &str, out: &mut Vec<GenericInstantiation>) {
    for caps in INSTANTIATION_HEAD.captures_iter(member) {
        let whole = caps.get(0).expect("regex match");
        let base_name = caps.get(1).expect("regex group").as_str();

        let args_start = whole.end();
        let Some(args) = balanced_prefix(&member[args_start..]) else {
            debug!(container, member, "unbalanced generic brackets, skipping");
            continue;
        };
        let type_arguments: Vec<String> = split_top_level(args)
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if type_arguments.is_empty() {
            continue;
        }
        out.push(GenericInstantiation {
            container_type: container.to_string(),
            base_name: base_name.to_string(),
            type_arguments: type_arguments.clone(),
            complexity_score: type_arguments.len(),
        });
    }
}

/// Text up to the `>` matching an already-consumed `<`.
fn balanced_prefix(s: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..i]);
                }
            }
            _ => {}
        }
    }
    None
}

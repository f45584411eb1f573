use crate::domain::record::{TypeKind, TypeRecord, qualify};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Compatibility class of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    Assignable,
    Convertible,
    Incompatible,
}

/// Outcome of one ordered type pair. Computed on demand, never cached.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompatibilityVerdict {
    pub from_type: String,
    pub to_type: String,
    pub is_compatible: bool,
    pub compatibility: Compatibility,
    /// The rule that decided the verdict, e.g. `inheritance_assignability`.
    pub rule: String,
    /// Evidence path for rule-based verdicts (the base-type chain walked).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<String>>,
    pub confidence: f64,
}

/// Assignability/convertibility reasoning over one snapshot.
///
/// Rules are evaluated in a fixed order: inheritance chain, interface
/// listing, shared generic definition, then the built-in numeric tables.
/// The tables are a practical approximation of the language rules, not a
/// full compiler type checker.
pub struct CompatibilityResolver<'a> {
    by_qualified: HashMap<&'a str, &'a TypeRecord>,
    by_simple: HashMap<&'a str, &'a TypeRecord>,
    include_conversion_paths: bool,
    include_implicit_conversions: bool,
}

impl<'a> CompatibilityResolver<'a> {
    pub fn new(
        records: &'a [TypeRecord],
        include_conversion_paths: bool,
        include_implicit_conversions: bool,
    ) -> Self {
        let mut by_qualified = HashMap::new();
        let mut by_simple = HashMap::new();
        for record in records {
            by_qualified
                .entry(record.qualified_name.as_str())
                .or_insert(record);
            by_simple.entry(record.simple_name()).or_insert(record);
        }
        Self {
            by_qualified,
            by_simple,
            include_conversion_paths,
            include_implicit_conversions,
        }
    }

    /// Evaluate one ordered pair.
    pub fn resolve(&self, from: &TypeRecord, to: &TypeRecord) -> CompatibilityVerdict {
        if let Some(chain) = self.inheritance_chain(from, to) {
            return CompatibilityVerdict {
                from_type: from.qualified_name.clone(),
                to_type: to.qualified_name.clone(),
                is_compatible: true,
                compatibility: Compatibility::Assignable,
                rule: "inheritance_assignability".to_string(),
                evidence: self.include_conversion_paths.then_some(chain),
                confidence: 0.95,
            };
        }

        if self.implements_interface(from, to) {
            return CompatibilityVerdict {
                from_type: from.qualified_name.clone(),
                to_type: to.qualified_name.clone(),
                is_compatible: true,
                compatibility: Compatibility::Assignable,
                rule: "interface_assignability".to_string(),
                evidence: self.include_conversion_paths.then(|| {
                    vec![from.qualified_name.clone(), to.qualified_name.clone()]
                }),
                confidence: 0.90,
            };
        }

        if shares_generic_definition(from, to) {
            return CompatibilityVerdict {
                from_type: from.qualified_name.clone(),
                to_type: to.qualified_name.clone(),
                is_compatible: true,
                compatibility: Compatibility::Convertible,
                rule: "shared_generic_definition".to_string(),
                evidence: None,
                confidence: 0.75,
            };
        }

        match numeric_conversion(&from.qualified_name, &to.qualified_name) {
            Some(NumericConversion::Implicit) if self.include_implicit_conversions => {
                return CompatibilityVerdict {
                    from_type: from.qualified_name.clone(),
                    to_type: to.qualified_name.clone(),
                    is_compatible: true,
                    compatibility: Compatibility::Convertible,
                    rule: "implicit_numeric_conversion".to_string(),
                    evidence: None,
                    confidence: 0.85,
                };
            }
            Some(NumericConversion::Explicit) => {
                return CompatibilityVerdict {
                    from_type: from.qualified_name.clone(),
                    to_type: to.qualified_name.clone(),
                    is_compatible: true,
                    compatibility: Compatibility::Convertible,
                    rule: "explicit_numeric_conversion".to_string(),
                    evidence: None,
                    confidence: 0.70,
                };
            }
            _ => {}
        }

        CompatibilityVerdict {
            from_type: from.qualified_name.clone(),
            to_type: to.qualified_name.clone(),
            is_compatible: false,
            compatibility: Compatibility::Incompatible,
            rule: "no_applicable_rule".to_string(),
            evidence: None,
            confidence: 0.95,
        }
    }

    /// Every ordered non-self pair among the first `limit` records in
    /// catalog order.
    pub fn resolve_matrix(
        &self,
        records: &[TypeRecord],
        limit: usize,
    ) -> Vec<CompatibilityVerdict> {
        let mut ordered: Vec<&TypeRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.catalog_index);
        ordered.truncate(limit);

        let mut verdicts = Vec::new();
        for from in &ordered {
            for to in &ordered {
                if from.qualified_name == to.qualified_name {
                    continue;
                }
                verdicts.push(self.resolve(from, to));
            }
        }
        verdicts
    }

    /// Walk the base-type chain from `from`, guarded against cycles; the
    /// returned evidence is the chain of names walked, ending at the target.
    fn inheritance_chain(&self, from: &TypeRecord, to: &TypeRecord) -> Option<Vec<String>> {
        let mut chain = vec![from.qualified_name.clone()];
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(from.qualified_name.clone());

        let mut current = from;
        while let Some(raw_base) = current.base_type.as_deref() {
            if raw_base == to.qualified_name
                || (!raw_base.contains('.') && raw_base == to.simple_name())
            {
                chain.push(to.qualified_name.clone());
                return Some(chain);
            }
            let Some(base) = self.lookup(raw_base, current) else {
                return None;
            };
            if !visited.insert(base.qualified_name.clone()) {
                return None;
            }
            chain.push(base.qualified_name.clone());
            current = base;
        }
        None
    }

    fn implements_interface(&self, from: &TypeRecord, to: &TypeRecord) -> bool {
        to.kind == TypeKind::Interface
            && from
                .interfaces
                .iter()
                .any(|i| *i == to.qualified_name || (!i.contains('.') && *i == to.simple_name()))
    }

    fn lookup(&self, raw: &str, context: &TypeRecord) -> Option<&'a TypeRecord> {
        if let Some(&record) = self.by_qualified.get(raw) {
            return Some(record);
        }
        if !raw.contains('.') {
            let qualified = qualify(raw, context.namespace());
            if let Some(&record) = self.by_qualified.get(qualified.as_str()) {
                return Some(record);
            }
            return self.by_simple.get(raw).copied();
        }
        None
    }
}

/// True when both names reduce to the same generic base (arity suffix and
/// argument list stripped) without being the very same type.
fn shares_generic_definition(from: &TypeRecord, to: &TypeRecord) -> bool {
    if from.qualified_name == to.qualified_name {
        return false;
    }
    let looks_generic =
        |r: &TypeRecord| r.is_generic() || r.qualified_name.contains('<') || r.qualified_name.contains('`');
    if !looks_generic(from) || !looks_generic(to) {
        return false;
    }
    generic_base_name(&from.qualified_name) == generic_base_name(&to.qualified_name)
}

/// `Ns.List<int>` and `` Ns.List`1 `` both reduce to `Ns.List`.
fn generic_base_name(name: &str) -> &str {
    let end = name
        .find('<')
        .or_else(|| name.find('`'))
        .unwrap_or(name.len());
    &name[..end]
}

enum NumericConversion {
    Implicit,
    Explicit,
}

/// C# keyword for a numeric type name, accepting the `System.*` spellings.
fn numeric_keyword(name: &str) -> Option<&'static str> {
    const ALIASES: &[(&str, &str)] = &[
        ("sbyte", "sbyte"),
        ("System.SByte", "sbyte"),
        ("byte", "byte"),
        ("System.Byte", "byte"),
        ("short", "short"),
        ("System.Int16", "short"),
        ("ushort", "ushort"),
        ("System.UInt16", "ushort"),
        ("int", "int"),
        ("System.Int32", "int"),
        ("uint", "uint"),
        ("System.UInt32", "uint"),
        ("long", "long"),
        ("System.Int64", "long"),
        ("ulong", "ulong"),
        ("System.UInt64", "ulong"),
        ("char", "char"),
        ("System.Char", "char"),
        ("float", "float"),
        ("System.Single", "float"),
        ("double", "double"),
        ("System.Double", "double"),
        ("decimal", "decimal"),
        ("System.Decimal", "decimal"),
    ];
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, keyword)| *keyword)
}

/// Implicit widening targets per numeric keyword; every other numeric pair
/// is an explicit conversion.
fn implicit_widening_targets(keyword: &str) -> &'static [&'static str] {
    match keyword {
        "sbyte" => &["short", "int", "long", "float", "double", "decimal"],
        "byte" => &[
            "short", "ushort", "int", "uint", "long", "ulong", "float", "double", "decimal",
        ],
        "short" => &["int", "long", "float", "double", "decimal"],
        "ushort" => &["int", "uint", "long", "ulong", "float", "double", "decimal"],
        "int" => &["long", "float", "double", "decimal"],
        "uint" => &["long", "ulong", "float", "double", "decimal"],
        "long" => &["float", "double", "decimal"],
        "ulong" => &["float", "double", "decimal"],
        "char" => &[
            "ushort", "int", "uint", "long", "ulong", "float", "double", "decimal",
        ],
        "float" => &["double"],
        _ => &[],
    }
}

fn numeric_conversion(from: &str, to: &str) -> Option<NumericConversion> {
    let from_kw = numeric_keyword(from)?;
    let to_kw = numeric_keyword(to)?;
    if from_kw == to_kw {
        return None;
    }
    if implicit_widening_targets(from_kw).contains(&to_kw) {
        Some(NumericConversion::Implicit)
    } else {
        Some(NumericConversion::Explicit)
    }
}

//! Structural checks over a decoded grammar artifact.
//!
//! A `grammar.json` that decodes cleanly can still be unusable: a rule may
//! reference a symbol that was never defined, or a combinator may be missing
//! the operands it needs. These checks run before any symbol is interned so a
//! damaged artifact is rejected instead of producing a half-built language.

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

/// A structural defect that makes a grammar unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The grammar defines no rules at all.
    #[error("grammar has no rules")]
    NoRules,

    /// A symbol is referenced but never defined.
    #[error("undefined symbol '{symbol}' referenced in {context}")]
    UndefinedSymbol {
        /// The missing symbol.
        symbol: String,
        /// Where the reference was found.
        context: String,
    },

    /// A combinator is missing one of its required parts.
    #[error("{kind} rule in '{context}' is missing its {part}")]
    Malformed {
        /// The rule type, e.g. `SEQ`.
        kind: &'static str,
        /// The missing part, e.g. `members`.
        part: &'static str,
        /// The top-level rule containing the defect.
        context: String,
    },
}

/// Non-fatal observations about a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The rule cannot be reached from the start rule or any other root.
    UnreachableRule(String),
    /// The rule's first step is a reference to itself.
    LeftRecursion(String),
    /// The rule uses more than one precedence level.
    MixedPrecedence {
        /// The rule name.
        rule: String,
        /// Every precedence level seen, in traversal order.
        levels: Vec<i32>,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnreachableRule(rule) => write!(f, "unreachable rule '{rule}'"),
            ValidationWarning::LeftRecursion(rule) => write!(f, "rule '{rule}' is left recursive"),
            ValidationWarning::MixedPrecedence { rule, levels } => {
                write!(f, "rule '{rule}' has multiple precedence levels: {levels:?}")
            }
        }
    }
}

/// The outcome of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// The rule parsing starts from.
    pub start_rule: String,
    /// Observations that did not prevent the grammar from loading.
    pub warnings: Vec<ValidationWarning>,
}

/// Performs structural validation of a decoded [`Grammar`].
///
/// This runs several consistency passes over the grammar:
///
/// - Checks that every combinator carries the operands its type requires.
/// - Checks that all referenced symbols are defined.
/// - Takes the first declared rule as the start rule and reports rules
///   unreachable from it.
/// - Notes immediate left recursion and mixed precedence levels.
///
/// Warnings are logged through [`tracing`] and returned in the report.
///
/// # Errors
///
/// Returns a [`ValidationError`] for the first fatal defect found.
pub fn validate(grammar: &Grammar) -> Result<ValidationReport, ValidationError> {
    if grammar.rules.is_empty() {
        return Err(ValidationError::NoRules);
    }

    for (context, rule) in labelled_rules(grammar) {
        check_well_formed(rule, &context)?;
    }

    check_undefined_symbols(grammar)?;

    let Some(start_rule) = grammar.start_rule() else {
        return Err(ValidationError::NoRules);
    };
    let mut warnings = check_unreachable_rules(grammar, start_rule);
    warnings.extend(check_left_recursion(grammar));
    warnings.extend(check_precedence(grammar));

    for warning in &warnings {
        match warning {
            ValidationWarning::UnreachableRule(_) => {
                tracing::warn!(grammar = %grammar.name, "{warning}");
            }
            ValidationWarning::MixedPrecedence { .. } => {
                tracing::info!(grammar = %grammar.name, "{warning}");
            }
            ValidationWarning::LeftRecursion(_) => {
                tracing::debug!(grammar = %grammar.name, "{warning}");
            }
        }
    }

    Ok(ValidationReport {
        start_rule: start_rule.to_string(),
        warnings,
    })
}

/// Every rule body in the grammar paired with a label for error messages.
/// Precedence entries are included since they are rule objects too.
fn labelled_rules(grammar: &Grammar) -> Vec<(String, &Rule)> {
    let mut labelled: Vec<(String, &Rule)> = grammar
        .rules
        .iter()
        .map(|(name, rule)| (name.clone(), rule))
        .collect();
    let lists = [
        ("extras", grammar.extras.as_deref()),
        ("externals", grammar.externals.as_deref()),
    ];
    for (label, rules) in lists {
        labelled.extend(rules.into_iter().flatten().map(|r| (label.to_string(), r)));
    }
    for level in grammar.precedences.iter().flatten() {
        labelled.extend(level.iter().map(|r| ("precedences".to_string(), r)));
    }
    for (set, rules) in grammar.reserved.iter().flatten() {
        labelled.extend(rules.iter().map(|r| (format!("reserved {set}"), r)));
    }
    labelled
}

fn check_well_formed(rule: &Rule, context: &str) -> Result<(), ValidationError> {
    let malformed = |part| ValidationError::Malformed {
        kind: rule.type_name(),
        part,
        context: context.to_string(),
    };

    match rule.rule_type {
        RuleType::Symbol | RuleType::Field if rule.name.is_none() => {
            return Err(malformed("name"));
        }
        RuleType::String | RuleType::Pattern | RuleType::Alias
            if rule
                .string_value()
                .or(rule.pattern_value())
                .or(rule.alias_name())
                .is_none() =>
        {
            return Err(malformed("value"));
        }
        t if t.is_compound() && rule.members.is_empty() => return Err(malformed("members")),
        t if t.is_unary() && rule.content.is_none() => return Err(malformed("content")),
        _ => {}
    }

    for child in rule.children() {
        check_well_formed(child, context)?;
    }
    Ok(())
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let defined: HashSet<&str> = grammar.rules.keys().map(String::as_str).collect();
    let externals: HashSet<&str> = grammar
        .externals
        .iter()
        .flatten()
        .filter_map(|r| r.name.as_deref())
        .collect();
    let is_defined = |name: &str| defined.contains(name) || externals.contains(name);

    let undefined = |symbol: &str, context: String| ValidationError::UndefinedSymbol {
        symbol: symbol.to_string(),
        context,
    };

    for (context, rule) in labelled_rules(grammar) {
        if let Some(symbol) = rule.referenced_symbols().into_iter().find(|s| !is_defined(*s)) {
            let context = if grammar.rules.contains_key(&context) {
                format!("rule '{context}'")
            } else {
                context
            };
            return Err(undefined(symbol, context));
        }
    }

    let named_lists = [
        ("word", grammar.word.iter().collect::<Vec<_>>()),
        ("inline", grammar.inline.iter().flatten().collect()),
        ("supertypes", grammar.supertypes.iter().flatten().collect()),
        ("conflicts", grammar.conflicts.iter().flatten().flatten().collect()),
    ];
    for (context, names) in named_lists {
        if let Some(symbol) = names.into_iter().find(|n| !is_defined(n.as_str())) {
            return Err(undefined(symbol.as_str(), context.to_string()));
        }
    }

    Ok(())
}

fn check_unreachable_rules(grammar: &Grammar, start_rule: &str) -> Vec<ValidationWarning> {
    let mut to_visit: Vec<&str> = vec![start_rule];
    to_visit.extend(grammar.word.as_deref());
    for root in grammar.extras.iter().chain(&grammar.externals).flatten() {
        to_visit.extend(root.referenced_symbols());
    }

    let mut reachable = HashSet::new();
    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name) {
            continue;
        }
        if let Some(rule) = grammar.rules.get(rule_name) {
            to_visit.extend(rule.referenced_symbols());
        }
    }

    grammar
        .sorted_rule_names()
        .into_iter()
        .filter(|name| !reachable.contains(name))
        .filter(|name| !grammar.inline.as_ref().is_some_and(|v| v.iter().any(|i| i == name)))
        .map(|name| ValidationWarning::UnreachableRule(name.to_string()))
        .collect()
}

fn check_left_recursion(grammar: &Grammar) -> Vec<ValidationWarning> {
    grammar
        .sorted_rule_names()
        .into_iter()
        .filter(|name| has_immediate_left_recursion(&grammar.rules[*name], name))
        .map(|name| ValidationWarning::LeftRecursion(name.to_string()))
        .collect()
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.name.as_deref() == Some(target),
        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),
        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),
        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),
        _ => false,
    }
}

fn check_precedence(grammar: &Grammar) -> Vec<ValidationWarning> {
    let mut prec_levels: BTreeMap<&str, Vec<i32>> = BTreeMap::new();

    for (rule_name, rule) in &grammar.rules {
        rule.visit(&mut |r| {
            if let Some(level) = r.precedence() {
                prec_levels.entry(rule_name.as_str()).or_default().push(level);
            }
        });
    }

    prec_levels
        .into_iter()
        .filter_map(|(rule, mut levels)| {
            let seen = levels.clone();
            levels.sort_unstable();
            levels.dedup();
            (levels.len() > 1).then(|| ValidationWarning::MixedPrecedence {
                rule: rule.to_string(),
                levels: seen,
            })
        })
        .collect()
}

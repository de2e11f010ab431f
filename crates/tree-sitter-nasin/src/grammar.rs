//! Decoded form of a compiled grammar artifact.
//!
//! A compiled artifact is the `grammar.json` emitted by `tree-sitter generate`.
//! This module decodes it with [`serde_json`] into a [`Grammar`] and offers the
//! lookups the runtime needs to intern symbols and fields.

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeSet;
use thiserror::Error;

mod rules;

pub use rules::{Rule, RuleType, RuleValue};

/// A full Tree-sitter grammar definition.
///
/// This structure directly mirrors the serialized JSON format produced by
/// `tree-sitter generate`. It captures the complete rule set along with
/// auxiliary metadata such as precedences, conflicts, and supertypes.
///
/// See <https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json>
#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    /// Optional `$schema` field from the JSON, typically used for schema
    /// validation or editor integration.
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,

    /// The short name of the grammar (e.g. `"nasin"`).
    pub name: String,

    /// Optional name of a base grammar that this one inherits from.
    #[serde(default)]
    pub inherits: Option<String>,

    /// Map of all rule identifiers to their corresponding definitions, in
    /// declaration order. The first rule is the start rule.
    pub rules: IndexMap<String, Rule>,

    /// Tokens that may appear between any other tokens, such as whitespace.
    #[serde(default)]
    pub extras: Option<Vec<Rule>>,

    /// Rules implemented externally via a scanner.
    #[serde(default)]
    pub externals: Option<Vec<Rule>>,

    /// Names of rules that should be inlined into other rules.
    #[serde(default)]
    pub inline: Option<Vec<String>>,

    /// Precedence orderings, highest first. Each entry is a `SYMBOL` or a
    /// named `STRING` level.
    #[serde(default)]
    pub precedences: Option<Vec<Vec<Rule>>>,

    /// Explicit conflict groups expected during parsing.
    #[serde(default)]
    pub conflicts: Option<Vec<Vec<String>>>,

    /// Context-specific reserved word definitions.
    #[serde(default)]
    pub reserved: Option<IndexMap<String, Vec<Rule>>>,

    /// The rule used to identify word tokens (keywords, identifiers, etc.).
    #[serde(default)]
    pub word: Option<String>,

    /// A list of node supertypes, grouping related syntactic forms.
    #[serde(default)]
    pub supertypes: Option<Vec<String>>,
}

/// Errors raised while decoding a grammar artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The input was not valid JSON or did not match the grammar schema.
    #[error("grammar artifact is corrupt: {0}")]
    Decode(String),
}

/// Decode a JSON grammar definition into a strongly typed [`Grammar`].
///
/// # Errors
///
/// Returns [`GrammarError::Decode`] if the provided string is not valid JSON
/// or fails schema deserialization.
pub fn parse_grammar(json: &str) -> Result<Grammar, GrammarError> {
    serde_json::from_str(json).map_err(|e| GrammarError::Decode(e.to_string()))
}

impl Grammar {
    /// The start rule: the first rule declared, as in `tree-sitter generate`.
    #[must_use]
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.keys().next().map(String::as_str)
    }

    /// Rule names in sorted order, so symbol numbering is stable across loads.
    #[must_use]
    pub fn sorted_rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every rule body reachable from the grammar's top level: rule
    /// definitions, extras, externals, and reserved word sets.
    pub fn top_level_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .values()
            .chain(self.extras.iter().flatten())
            .chain(self.externals.iter().flatten())
            .chain(self.reserved.iter().flat_map(IndexMap::values).flatten())
    }

    /// Literal string tokens used anywhere in the grammar, deduplicated and
    /// sorted. These become the anonymous symbols of the language.
    #[must_use]
    pub fn string_literals(&self) -> BTreeSet<&str> {
        let mut literals = BTreeSet::new();
        for rule in self.top_level_rules() {
            rule.visit(&mut |r| {
                if let Some(s) = r.string_value() {
                    literals.insert(s);
                }
            });
        }
        literals
    }

    /// Field names used anywhere in the grammar, deduplicated and sorted.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        for rule in self.rules.values() {
            rule.visit(&mut |r| {
                if r.rule_type == RuleType::Field {
                    if let Some(name) = r.name.as_deref() {
                        fields.insert(name);
                    }
                }
            });
        }
        fields
    }

    /// Alias names used anywhere in the grammar, paired with whether the
    /// alias produces a named node.
    #[must_use]
    pub fn alias_names(&self) -> BTreeSet<(&str, bool)> {
        let mut aliases = BTreeSet::new();
        for rule in self.rules.values() {
            rule.visit(&mut |r| {
                if let Some(name) = r.alias_name() {
                    aliases.insert((name, r.named.unwrap_or(false)));
                }
            });
        }
        aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grammar() {
        let json = r#"{
            "name": "test",
            "rules": {
                "source_file": {
                    "type": "SYMBOL",
                    "name": "expression"
                },
                "expression": {
                    "type": "CHOICE",
                    "members": [
                        {
                            "type": "STRING",
                            "value": "hello"
                        },
                        {
                            "type": "PATTERN",
                            "value": "[0-9]+"
                        }
                    ]
                }
            }
        }"#;

        let grammar = parse_grammar(json).unwrap();
        assert_eq!(grammar.name, "test");
        assert_eq!(grammar.rules.len(), 2);
        assert_eq!(grammar.sorted_rule_names(), ["expression", "source_file"]);
        assert_eq!(grammar.string_literals().into_iter().collect::<Vec<_>>(), ["hello"]);
    }

    #[test]
    fn test_parse_precedence() {
        let json = r#"{
            "name": "test",
            "rules": {
                "expr": {
                    "type": "PREC_LEFT",
                    "value": 1,
                    "content": {
                        "type": "SEQ",
                        "members": [
                            {"type": "FIELD", "name": "left", "content": {"type": "SYMBOL", "name": "expr"}},
                            {"type": "STRING", "value": "+"},
                            {"type": "FIELD", "name": "right", "content": {"type": "SYMBOL", "name": "expr"}}
                        ]
                    }
                }
            }
        }"#;

        let grammar = parse_grammar(json).unwrap();
        let expr_rule = grammar.rules.get("expr").unwrap();
        assert_eq!(expr_rule.precedence(), Some(1));
        assert_eq!(expr_rule.rule_type, RuleType::PrecLeft);
        assert_eq!(
            grammar.field_names().into_iter().collect::<Vec<_>>(),
            ["left", "right"]
        );
    }

    #[test]
    fn test_truncated_json_is_a_decode_error() {
        let err = parse_grammar(r#"{"name": "test", "rules": {"#).unwrap_err();
        assert!(matches!(err, GrammarError::Decode(_)));
        assert!(err.to_string().starts_with("grammar artifact is corrupt"));
    }

    #[test]
    fn test_embedded_nasin_grammar_decodes() {
        let grammar = parse_grammar(crate::artifact::NASIN_GRAMMAR).unwrap();
        assert_eq!(grammar.name, "nasin");
        assert_eq!(grammar.word.as_deref(), Some("_ident"));
        assert!(grammar.rules.contains_key("root"));
        assert!(grammar.field_names().contains("ret_type"));
    }

    #[test]
    fn test_rules_keep_declaration_order() {
        let json = r##"{
            "name": "test",
            "rules": {
                "program": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "item"}},
                "item": {"type": "STRING", "value": "x"},
                "comment": {"type": "PATTERN", "value": "#.*"}
            }
        }"##;

        let grammar = parse_grammar(json).unwrap();
        assert_eq!(grammar.start_rule(), Some("program"));
        assert_eq!(
            grammar.rules.keys().map(String::as_str).collect::<Vec<_>>(),
            ["program", "item", "comment"]
        );
        assert_eq!(grammar.sorted_rule_names(), ["comment", "item", "program"]);
    }

    #[test]
    fn test_parse_generated_schema_fields() {
        let json = r#"{
            "$schema": "https://tree-sitter.github.io/tree-sitter/assets/schemas/grammar.schema.json",
            "name": "test",
            "word": "identifier",
            "rules": {
                "source_file": {"type": "REPEAT", "content": {"type": "SYMBOL", "name": "expr"}},
                "expr": {
                    "type": "CHOICE",
                    "members": [
                        {"type": "SYMBOL", "name": "identifier"},
                        {"type": "PREC", "value": "unary", "content": {"type": "SYMBOL", "name": "negation"}}
                    ]
                },
                "negation": {
                    "type": "SEQ",
                    "members": [
                        {"type": "STRING", "value": "-"},
                        {"type": "RESERVED", "context_name": "strict", "content": {"type": "SYMBOL", "name": "identifier"}}
                    ]
                },
                "identifier": {"type": "PATTERN", "value": "[a-z]+"},
                "comment": {"type": "PATTERN", "value": "//.*"}
            },
            "extras": [
                {"type": "SYMBOL", "name": "comment"},
                {"type": "PATTERN", "value": "\\s"}
            ],
            "conflicts": [["expr", "negation"]],
            "precedences": [
                [{"type": "STRING", "value": "unary"}, {"type": "SYMBOL", "name": "expr"}]
            ],
            "externals": [
                {"type": "SYMBOL", "name": "heredoc"},
                {"type": "STRING", "value": "\n"}
            ],
            "inline": ["expr"],
            "supertypes": [],
            "reserved": {
                "global": [{"type": "STRING", "value": "let"}],
                "strict": [{"type": "STRING", "value": "let"}, {"type": "STRING", "value": "static"}]
            }
        }"#;

        let grammar = parse_grammar(json).unwrap();
        assert!(grammar.schema.is_some());
        assert_eq!(grammar.start_rule(), Some("source_file"));

        let precedences = grammar.precedences.as_ref().unwrap();
        assert_eq!(precedences[0][0].string_value(), Some("unary"));
        assert_eq!(precedences[0][1].symbol_name(), Some("expr"));

        let reserved = grammar.reserved.as_ref().unwrap();
        assert_eq!(reserved.keys().collect::<Vec<_>>(), ["global", "strict"]);

        let externals = grammar.externals.as_ref().unwrap();
        assert_eq!(externals[0].symbol_name(), Some("heredoc"));

        // Named precedence levels are not tokens.
        assert_eq!(
            grammar.string_literals().into_iter().collect::<Vec<_>>(),
            ["\n", "-", "let", "static"]
        );
    }
}

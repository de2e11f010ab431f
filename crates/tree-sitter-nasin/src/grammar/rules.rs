//! Rule nodes of a compiled grammar.
//!
//! Each rule is one combinator from the Tree-sitter JSON schema. Rules nest,
//! so most of the helpers here walk a rule together with its descendants.

use serde::Deserialize;

/// A grammar rule in the Tree-sitter format.
///
/// Each rule corresponds to a node in the grammar's rule graph, identified by a
/// [`RuleType`] and containing type-specific fields such as `members` or
/// `content`.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// The discriminant identifying what kind of rule this is.
    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Literal text for `STRING`, `PATTERN` and `ALIAS` rules, or the level
    /// of a precedence wrapper.
    #[serde(default)]
    pub value: Option<RuleValue>,

    /// Optional name used by `SYMBOL` and `FIELD` rules.
    #[serde(default)]
    pub name: Option<String>,

    /// Optional nested rule for unary constructs such as `REPEAT` or `PREC`.
    #[serde(default)]
    pub content: Option<Box<Rule>>,

    /// List of child rules for compound constructs (`SEQ`, `CHOICE`, etc.).
    #[serde(default)]
    pub members: Vec<Rule>,

    /// Whether the node produced by this rule is named.
    #[serde(default)]
    pub named: Option<bool>,

    /// Regex flags carried by `PATTERN` rules.
    #[serde(default)]
    pub flags: Option<String>,

    /// Optional context label used for reserved-word handling.
    #[serde(default)]
    pub context_name: Option<String>,
}

/// A literal or numeric value attached to a rule node.
///
/// The schema stores both under the same `value` key, so the variant is
/// picked from the JSON type: strings for `STRING`/`PATTERN`, integers for
/// the `PREC*` wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// A string literal value (e.g. `"+"`, `"if"`).
    String(String),

    /// An integer numeric value (used by precedence modifiers).
    Integer(i32),
}

/// The enumeration of all recognized Tree-sitter rule types.
///
/// Each variant corresponds to one of the `type` strings found in the JSON
/// grammar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RuleType {
    /// An empty (ε) production.
    #[serde(rename = "BLANK")]
    Blank,
    /// A literal string token.
    #[serde(rename = "STRING")]
    String,
    /// A regular-expression pattern token.
    #[serde(rename = "PATTERN")]
    Pattern,
    /// A reference to another named rule.
    #[serde(rename = "SYMBOL")]
    Symbol,
    /// A rule that matches one of several alternatives.
    #[serde(rename = "CHOICE")]
    Choice,
    /// A sequential composition of member rules.
    #[serde(rename = "SEQ")]
    Seq,
    /// A zero-or-more repetition of a rule.
    #[serde(rename = "REPEAT")]
    Repeat,
    /// A one-or-more repetition of a rule.
    #[serde(rename = "REPEAT1")]
    Repeat1,
    /// A generic precedence wrapper.
    #[serde(rename = "PREC")]
    Prec,
    /// A left-associative precedence wrapper.
    #[serde(rename = "PREC_LEFT")]
    PrecLeft,
    /// A right-associative precedence wrapper.
    #[serde(rename = "PREC_RIGHT")]
    PrecRight,
    /// A dynamic (runtime) precedence wrapper.
    #[serde(rename = "PREC_DYNAMIC")]
    PrecDynamic,
    /// A named field applied to a subrule.
    #[serde(rename = "FIELD")]
    Field,
    /// An alias providing an alternate node name.
    #[serde(rename = "ALIAS")]
    Alias,
    /// A tokenization wrapper.
    #[serde(rename = "TOKEN")]
    Token,
    /// A token that must appear immediately without leading trivia.
    #[serde(rename = "IMMEDIATE_TOKEN")]
    ImmediateToken,
    /// A reserved-word context wrapper.
    #[serde(rename = "RESERVED")]
    Reserved,
}

impl RuleType {
    /// Returns the canonical string name of this rule type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Blank => "BLANK",
            RuleType::String => "STRING",
            RuleType::Pattern => "PATTERN",
            RuleType::Symbol => "SYMBOL",
            RuleType::Choice => "CHOICE",
            RuleType::Seq => "SEQ",
            RuleType::Repeat => "REPEAT",
            RuleType::Repeat1 => "REPEAT1",
            RuleType::Prec => "PREC",
            RuleType::PrecLeft => "PREC_LEFT",
            RuleType::PrecRight => "PREC_RIGHT",
            RuleType::PrecDynamic => "PREC_DYNAMIC",
            RuleType::Field => "FIELD",
            RuleType::Alias => "ALIAS",
            RuleType::Token => "TOKEN",
            RuleType::ImmediateToken => "IMMEDIATE_TOKEN",
            RuleType::Reserved => "RESERVED",
        }
    }

    /// Whether rules of this type wrap exactly one `content` rule.
    #[must_use]
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            RuleType::Repeat
                | RuleType::Repeat1
                | RuleType::Prec
                | RuleType::PrecLeft
                | RuleType::PrecRight
                | RuleType::PrecDynamic
                | RuleType::Field
                | RuleType::Alias
                | RuleType::Token
                | RuleType::ImmediateToken
                | RuleType::Reserved
        )
    }

    /// Whether rules of this type combine a list of `members`.
    #[must_use]
    pub fn is_compound(self) -> bool {
        matches!(self, RuleType::Choice | RuleType::Seq)
    }
}

impl Rule {
    /// Returns the canonical string name of this rule type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.rule_type.as_str()
    }

    /// Returns `true` if this rule represents a terminal (lexical) token.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.rule_type, RuleType::String | RuleType::Pattern)
    }

    /// Returns the referenced symbol name, if this is a `SYMBOL` rule.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        if self.rule_type == RuleType::Symbol {
            self.name.as_deref()
        } else {
            None
        }
    }

    /// Returns the numeric precedence value if this rule is a precedence wrapper.
    #[must_use]
    pub fn precedence(&self) -> Option<i32> {
        match self.rule_type {
            RuleType::Prec | RuleType::PrecLeft | RuleType::PrecRight | RuleType::PrecDynamic => {
                self.value.as_ref().and_then(|v| match v {
                    RuleValue::Integer(i) => Some(*i),
                    RuleValue::String(_) => None,
                })
            }
            _ => None,
        }
    }

    /// Returns the literal string value if this is a `STRING` rule.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        if self.rule_type == RuleType::String {
            self.text_value()
        } else {
            None
        }
    }

    /// Returns the pattern source if this is a `PATTERN` rule.
    #[must_use]
    pub fn pattern_value(&self) -> Option<&str> {
        if self.rule_type == RuleType::Pattern {
            self.text_value()
        } else {
            None
        }
    }

    /// Returns the node name an `ALIAS` rule renames its content to.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        if self.rule_type == RuleType::Alias {
            self.text_value()
        } else {
            None
        }
    }

    fn text_value(&self) -> Option<&str> {
        self.value.as_ref().and_then(|v| match v {
            RuleValue::String(s) => Some(s.as_str()),
            RuleValue::Integer(_) => None,
        })
    }

    /// Direct children of this rule: `members` for compound rules, `content`
    /// for unary ones.
    pub fn children(&self) -> impl Iterator<Item = &Rule> {
        self.members.iter().chain(self.content.as_deref())
    }

    /// Calls `f` on this rule and every descendant, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Rule)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Names of every symbol referenced by this rule or its descendants.
    #[must_use]
    pub fn referenced_symbols(&self) -> Vec<&str> {
        let mut symbols = Vec::new();
        self.visit(&mut |r| {
            if let Some(name) = r.symbol_name() {
                symbols.push(name);
            }
        });
        symbols
    }
}

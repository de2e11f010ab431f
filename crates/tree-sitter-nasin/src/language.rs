//! Runtime-usable languages and the handles that carry them.

use crate::grammar::Grammar;
use std::fmt;
use std::sync::Arc;

/// A symbol identifier, as used in parse tables.
pub type Symbol = u16;

/// A field identifier. Zero is reserved for "no field".
pub type FieldId = u16;

/// The builtin end-of-input symbol.
pub const END_SYMBOL: Symbol = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SymbolInfo {
    name: String,
    named: bool,
    visible: bool,
}

/// A grammar interned into lookup tables.
///
/// Symbol numbering is deterministic: the builtin `end` symbol, then every
/// rule in sorted order, then aliases not already covered, then anonymous
/// string tokens in sorted order. Field ids follow the sorted field names
/// and start at one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    name: String,
    abi_version: u32,
    symbols: Vec<SymbolInfo>,
    fields: Vec<String>,
    start_symbol: Symbol,
    word_symbol: Option<Symbol>,
}

/// The symbol table outgrew the identifier space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolOverflow(pub usize);

impl Language {
    /// Interns a validated grammar.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolOverflow`] if the grammar has more symbols or fields
    /// than a [`Symbol`] can address.
    pub fn from_grammar(
        grammar: &Grammar,
        start_rule: &str,
        abi_version: u32,
    ) -> Result<Self, SymbolOverflow> {
        let mut symbols = vec![SymbolInfo {
            name: "end".to_string(),
            named: false,
            visible: false,
        }];

        for name in grammar.sorted_rule_names() {
            symbols.push(SymbolInfo {
                name: name.to_string(),
                named: true,
                visible: !name.starts_with('_'),
            });
        }
        let aliases = grammar.alias_names();
        let literals = grammar.string_literals().into_iter().map(|l| (l, false));
        for (name, named) in aliases.into_iter().chain(literals) {
            // The builtin `end` never stands in for a token of the same text.
            let interned = symbols[1..]
                .iter()
                .any(|s| s.name == name && s.named == named);
            if !interned {
                symbols.push(SymbolInfo {
                    name: name.to_string(),
                    named,
                    visible: true,
                });
            }
        }

        let fields: Vec<String> = grammar.field_names().into_iter().map(str::to_string).collect();

        if symbols.len() > usize::from(Symbol::MAX) || fields.len() >= usize::from(FieldId::MAX) {
            return Err(SymbolOverflow(symbols.len().max(fields.len())));
        }

        let mut language = Self {
            name: grammar.name.clone(),
            abi_version,
            symbols,
            fields,
            start_symbol: END_SYMBOL,
            word_symbol: None,
        };
        language.start_symbol = language.symbol_for_name(start_rule, true).unwrap_or(END_SYMBOL);
        language.word_symbol = grammar
            .word
            .as_deref()
            .and_then(|word| language.symbol_for_name(word, true));
        Ok(language)
    }

    /// The grammar's name, e.g. `"nasin"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ABI version the language was constructed for.
    #[must_use]
    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// Number of symbols, including the builtin `end` symbol.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Number of distinct field names.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// The name of a symbol, or `None` if the id is out of range.
    #[must_use]
    pub fn symbol_name(&self, symbol: Symbol) -> Option<&str> {
        self.symbols.get(usize::from(symbol)).map(|s| s.name.as_str())
    }

    /// Looks up a symbol by node kind and namedness.
    #[must_use]
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<Symbol> {
        self.symbols
            .iter()
            .position(|s| s.name == name && s.named == named)
            .and_then(|i| Symbol::try_from(i).ok())
    }

    /// Whether nodes of this symbol are named.
    #[must_use]
    pub fn node_kind_is_named(&self, symbol: Symbol) -> bool {
        self.symbols.get(usize::from(symbol)).is_some_and(|s| s.named)
    }

    /// Whether nodes of this symbol appear in syntax trees.
    #[must_use]
    pub fn node_kind_is_visible(&self, symbol: Symbol) -> bool {
        self.symbols.get(usize::from(symbol)).is_some_and(|s| s.visible)
    }

    /// The name of a field. Id zero and out-of-range ids have none.
    #[must_use]
    pub fn field_name_for_id(&self, id: FieldId) -> Option<&str> {
        let index = usize::from(id).checked_sub(1)?;
        self.fields.get(index).map(String::as_str)
    }

    /// Looks up a field id by name.
    #[must_use]
    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|f| f == name)
            .and_then(|i| FieldId::try_from(i + 1).ok())
    }

    /// The symbol parsing starts from.
    #[must_use]
    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    /// The keyword-extraction token, if the grammar declares one.
    #[must_use]
    pub fn word_symbol(&self) -> Option<Symbol> {
        self.word_symbol
    }
}

/// An opaque reference to a constructed [`Language`].
///
/// A handle is either valid or null. Null handles are what a parsing runtime
/// returns when construction fails. Clones share the same language, and two
/// handles compare equal only when they point at the same language or are
/// both null.
#[derive(Clone, Default)]
pub struct LanguageHandle(Option<Arc<Language>>);

impl LanguageHandle {
    /// Wraps a freshly constructed language.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self(Some(Arc::new(language)))
    }

    /// The null handle.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Whether this is the null handle.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// The language behind the handle, if any.
    #[must_use]
    pub fn language(&self) -> Option<&Language> {
        self.0.as_deref()
    }
}

impl PartialEq for LanguageHandle {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for LanguageHandle {}

impl fmt::Debug for LanguageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language() {
            Some(language) => f
                .debug_struct("LanguageHandle")
                .field("name", &language.name())
                .field("abi_version", &language.abi_version())
                .field("symbol_count", &language.symbol_count())
                .finish(),
            None => f.write_str("LanguageHandle(null)"),
        }
    }
}

impl From<Language> for LanguageHandle {
    fn from(language: Language) -> Self {
        Self::new(language)
    }
}

//! The parsing-runtime seam.
//!
//! A runtime exposes one capability: turn a compiled grammar artifact into a
//! language handle. Failure is signalled by the null handle, never a panic.

use crate::artifact::{GrammarArtifact, LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION};
use crate::grammar::{parse_grammar, GrammarError};
use crate::language::{Language, LanguageHandle, SymbolOverflow};
use crate::validate::{validate, ValidationError};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Constructs language handles from compiled grammar artifacts.
pub trait ParsingRuntime {
    /// Builds a handle for `artifact`, or the null handle if it cannot be loaded.
    fn construct(&self, artifact: &GrammarArtifact) -> LanguageHandle;
}

/// Why an artifact could not be turned into a language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The artifact carries no grammar data.
    #[error("grammar artifact '{0}' is absent")]
    Missing(String),

    /// The artifact was generated for an ABI this runtime cannot load.
    #[error("incompatible language version {found}, expected {min} through {max}")]
    IncompatibleAbi {
        /// The artifact's ABI version.
        found: u32,
        /// Oldest supported ABI version.
        min: u32,
        /// Newest supported ABI version.
        max: u32,
    },

    /// The artifact could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] GrammarError),

    /// The artifact decoded but is structurally unusable.
    #[error("invalid grammar: {0}")]
    Invalid(#[from] ValidationError),

    /// The grammar has more symbols than the runtime can address.
    #[error("grammar has too many symbols ({0})")]
    SymbolOverflow(usize),
}

impl From<SymbolOverflow> for LoadError {
    fn from(SymbolOverflow(count): SymbolOverflow) -> Self {
        LoadError::SymbolOverflow(count)
    }
}

/// The in-process grammar runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRuntime {
    abi_range: RangeInclusive<u32>,
}

impl Default for GrammarRuntime {
    fn default() -> Self {
        Self {
            abi_range: MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION,
        }
    }
}

impl GrammarRuntime {
    /// A runtime accepting the given inclusive range of ABI versions.
    #[must_use]
    pub fn with_abi_range(abi_range: RangeInclusive<u32>) -> Self {
        Self { abi_range }
    }

    /// The ABI versions this runtime accepts.
    #[must_use]
    pub fn abi_range(&self) -> &RangeInclusive<u32> {
        &self.abi_range
    }

    /// Loads `artifact`, reporting exactly why it failed.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the artifact is absent, targets an
    /// unsupported ABI, cannot be decoded, or fails structural validation.
    pub fn try_construct(&self, artifact: &GrammarArtifact) -> Result<Language, LoadError> {
        let source = artifact
            .source()
            .ok_or_else(|| LoadError::Missing(artifact.name().to_string()))?;

        if !self.abi_range.contains(&artifact.abi_version()) {
            return Err(LoadError::IncompatibleAbi {
                found: artifact.abi_version(),
                min: *self.abi_range.start(),
                max: *self.abi_range.end(),
            });
        }

        let grammar = parse_grammar(source)?;
        let report = validate(&grammar)?;
        let language = Language::from_grammar(&grammar, &report.start_rule, artifact.abi_version())?;

        tracing::debug!(
            artifact = %artifact,
            language = language.name(),
            symbols = language.symbol_count(),
            fields = language.field_count(),
            start = %report.start_rule,
            "constructed language"
        );
        Ok(language)
    }
}

impl ParsingRuntime for GrammarRuntime {
    fn construct(&self, artifact: &GrammarArtifact) -> LanguageHandle {
        match self.try_construct(artifact) {
            Ok(language) => LanguageHandle::new(language),
            Err(err) => {
                tracing::error!(artifact = %artifact, %err, "grammar failed to load");
                LanguageHandle::null()
            }
        }
    }
}

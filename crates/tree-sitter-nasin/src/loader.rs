//! Entry points that bridge a grammar artifact into a language handle.

use crate::artifact::GrammarArtifact;
use crate::language::LanguageHandle;
use crate::runtime::{GrammarRuntime, ParsingRuntime};

/// Loads the embedded Nasin grammar through the default runtime.
///
/// Returns the null handle if the grammar cannot be constructed; pair with
/// [`verify`](crate::verify::verify) to classify the result.
#[must_use]
pub fn load_language() -> LanguageHandle {
    load_language_with(&GrammarRuntime::default(), &GrammarArtifact::nasin())
}

/// Returns the handle for the Nasin grammar.
#[must_use]
pub fn language() -> LanguageHandle {
    load_language()
}

/// Loads `artifact` through `runtime`.
pub fn load_language_with<R>(runtime: &R, artifact: &GrammarArtifact) -> LanguageHandle
where
    R: ParsingRuntime + ?Sized,
{
    runtime.construct(artifact)
}

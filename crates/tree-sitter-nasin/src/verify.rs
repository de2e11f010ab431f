//! Handle validation and the single-shot verifier.

use crate::artifact::GrammarArtifact;
use crate::language::LanguageHandle;
use crate::runtime::ParsingRuntime;

/// Diagnostic attached to a null handle.
pub const LOAD_FAILURE: &str = "grammar failed to load";

/// Whether a handle is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The handle refers to a constructed language.
    Valid,
    /// The handle is null, with the reason.
    Invalid(String),
}

impl ValidationResult {
    /// Whether this is [`ValidationResult::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Classifies a handle: [`ValidationResult::Valid`] if and only if it is
/// non-null.
#[must_use]
pub fn verify(handle: &LanguageHandle) -> ValidationResult {
    if handle.is_null() {
        ValidationResult::Invalid(LOAD_FAILURE.to_string())
    } else {
        ValidationResult::Valid
    }
}

/// Where a [`Verifier`] is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierState {
    /// Nothing has been loaded yet.
    Unverified,
    /// The artifact loaded; the handle is kept for inspection.
    Verified(LanguageHandle),
    /// The artifact did not load.
    Failed(String),
}

impl VerifierState {
    /// Whether the verifier has reached a final state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerifierState::Unverified)
    }
}

/// Loads one artifact exactly once and records the outcome.
///
/// The first [`run`](Verifier::run) moves the verifier out of
/// [`VerifierState::Unverified`]; later calls return the recorded state
/// without loading again.
pub struct Verifier<'r, R: ?Sized> {
    runtime: &'r R,
    artifact: GrammarArtifact,
    state: VerifierState,
}

impl<'r, R> Verifier<'r, R>
where
    R: ParsingRuntime + ?Sized,
{
    /// A verifier for `artifact`, loading through `runtime`.
    #[must_use]
    pub fn new(runtime: &'r R, artifact: GrammarArtifact) -> Self {
        Self {
            runtime,
            artifact,
            state: VerifierState::Unverified,
        }
    }

    /// The artifact under test.
    #[must_use]
    pub fn artifact(&self) -> &GrammarArtifact {
        &self.artifact
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &VerifierState {
        &self.state
    }

    /// Loads and verifies the artifact if that has not happened yet.
    pub fn run(&mut self) -> &VerifierState {
        if !self.state.is_terminal() {
            let handle = self.runtime.construct(&self.artifact);
            self.state = match verify(&handle) {
                ValidationResult::Valid => VerifierState::Verified(handle),
                ValidationResult::Invalid(reason) => VerifierState::Failed(reason),
            };
        }
        &self.state
    }
}

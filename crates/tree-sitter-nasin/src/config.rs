//! Run configuration for grammar checks.

use crate::artifact::GrammarArtifact;
use crate::report::{check_can_load_grammar, Summary};
use crate::runtime::GrammarRuntime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming a `grammar.json` to check instead of the
/// embedded Nasin grammar.
pub const GRAMMAR_ENV: &str = "NASIN_GRAMMAR";

/// Environment variable holding the log filter for the CLI.
pub const LOG_ENV: &str = "NASIN_LOG";

/// Which artifacts to check, how often, and through which runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// The runtime every artifact is loaded through.
    pub runtime: GrammarRuntime,
    /// Artifacts to check, in order.
    pub artifacts: Vec<GrammarArtifact>,
    /// How many times each artifact is loaded. Zero is treated as one.
    pub repeat: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            runtime: GrammarRuntime::default(),
            artifacts: vec![GrammarArtifact::nasin()],
            repeat: 1,
        }
    }
}

impl CheckConfig {
    /// Resolves artifacts from command-line inputs and the process environment.
    #[must_use]
    pub fn from_env(inputs: &[PathBuf], all: bool) -> Self {
        Self {
            artifacts: resolve_artifacts(inputs, all, std::env::var_os(GRAMMAR_ENV)),
            ..Self::default()
        }
    }

    /// Sets the repeat count.
    #[must_use]
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Runs `CanLoadGrammar` for every artifact, `repeat` times each.
    #[must_use]
    pub fn run(&self) -> Summary {
        let mut summary = Summary::default();
        for artifact in &self.artifacts {
            for _ in 0..self.repeat.max(1) {
                summary.push(check_can_load_grammar(&self.runtime, artifact.clone()));
            }
        }
        summary
    }
}

/// Picks the artifacts to check.
///
/// `all` selects every embedded grammar followed by `inputs`. Otherwise
/// `inputs` win, then the grammar named by `env_grammar`, then Nasin. An input
/// that does not exist on disk but names an embedded grammar selects it.
#[must_use]
pub fn resolve_artifacts(
    inputs: &[PathBuf],
    all: bool,
    env_grammar: Option<OsString>,
) -> Vec<GrammarArtifact> {
    let from_inputs = inputs.iter().map(|p| artifact_for_input(p));

    if all {
        return GrammarArtifact::builtin().into_iter().chain(from_inputs).collect();
    }
    if !inputs.is_empty() {
        return from_inputs.collect();
    }
    match env_grammar.filter(|v| !v.is_empty()) {
        Some(path) => vec![artifact_for_input(Path::new(&path))],
        None => vec![GrammarArtifact::nasin()],
    }
}

fn artifact_for_input(input: &Path) -> GrammarArtifact {
    if !input.exists() {
        if let Some(builtin) = input.to_str().and_then(GrammarArtifact::builtin_named) {
            return builtin;
        }
    }
    GrammarArtifact::from_path(input)
}

//! Compiled grammar artifacts.
//!
//! An artifact is the `grammar.json` produced by `tree-sitter generate`,
//! tagged with the language ABI version it was generated for. The Nasin
//! grammar, and the Torvo grammar it grew out of, are compiled into the crate.

use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// The language ABI version this crate's artifacts are generated for.
pub const LANGUAGE_VERSION: u32 = 14;

/// The oldest language ABI version the runtime still accepts.
pub const MIN_COMPATIBLE_LANGUAGE_VERSION: u32 = 13;

/// The compiled Nasin grammar.
pub const NASIN_GRAMMAR: &str = include_str!("../grammars/nasin/grammar.json");

/// The compiled Torvo grammar.
pub const TORVO_GRAMMAR: &str = include_str!("../grammars/torvo/grammar.json");

/// An immutable, precompiled grammar descriptor.
///
/// `source` is `None` when the artifact is absent, for example a grammar that
/// was never linked or a file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarArtifact {
    name: Cow<'static, str>,
    abi_version: u32,
    source: Option<Cow<'static, str>>,
}

impl GrammarArtifact {
    /// The embedded Nasin grammar.
    #[must_use]
    pub const fn nasin() -> Self {
        Self::embedded("nasin", NASIN_GRAMMAR)
    }

    /// The embedded Torvo grammar.
    #[must_use]
    pub const fn torvo() -> Self {
        Self::embedded("torvo", TORVO_GRAMMAR)
    }

    /// Every grammar compiled into this crate.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::nasin(), Self::torvo()]
    }

    /// Looks up an embedded grammar by name.
    #[must_use]
    pub fn builtin_named(name: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|a| a.name == name)
    }

    const fn embedded(name: &'static str, json: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            abi_version: LANGUAGE_VERSION,
            source: Some(Cow::Borrowed(json)),
        }
    }

    /// An artifact built from grammar JSON held in memory.
    #[must_use]
    pub fn from_json(
        name: impl Into<Cow<'static, str>>,
        abi_version: u32,
        json: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name: name.into(),
            abi_version,
            source: Some(json.into()),
        }
    }

    /// An artifact that is missing entirely.
    #[must_use]
    pub fn absent(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            abi_version: LANGUAGE_VERSION,
            source: None,
        }
    }

    /// Reads a `grammar.json` from disk, assuming the current ABI version.
    ///
    /// The artifact takes the grammar's own `name`, or the file stem when
    /// the contents don't say. A file that cannot be read yields an absent
    /// artifact so the failure surfaces at load time.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let name = serde_json::from_str::<GrammarName>(&json).map_or(stem, |g| g.name);
                Self::from_json(name, LANGUAGE_VERSION, json)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot read grammar artifact");
                Self::absent(stem)
            }
        }
    }

    /// Overrides the ABI version the artifact claims to be generated for.
    #[must_use]
    pub fn with_abi_version(mut self, abi_version: u32) -> Self {
        self.abi_version = abi_version;
        self
    }

    /// The name the artifact is reported under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ABI version the artifact was generated for.
    #[must_use]
    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// The grammar JSON, or `None` if the artifact is absent.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the artifact carries any grammar data.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.source.is_some()
    }
}

impl fmt::Display for GrammarArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Just enough of a `grammar.json` to name the artifact.
#[derive(Deserialize)]
struct GrammarName {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_artifacts_are_present() {
        for artifact in GrammarArtifact::builtin() {
            assert!(artifact.is_present(), "{artifact} should be embedded");
            assert_eq!(artifact.abi_version(), LANGUAGE_VERSION);
        }
        assert_eq!(GrammarArtifact::builtin_named("torvo"), Some(GrammarArtifact::torvo()));
        assert_eq!(GrammarArtifact::builtin_named("python"), None);
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = GrammarArtifact::from_path(dir.path().join("grammar.json"));
        assert!(!artifact.is_present());
        assert_eq!(artifact.name(), "grammar");
    }

    #[test]
    fn test_from_path_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TORVO_GRAMMAR.as_bytes()).unwrap();

        let artifact = GrammarArtifact::from_path(file.path());
        assert_eq!(artifact.name(), "torvo");
        assert_eq!(artifact.source(), Some(TORVO_GRAMMAR));
    }

    #[test]
    fn test_unnamed_file_takes_its_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"rules": {"#).unwrap();

        let artifact = GrammarArtifact::from_path(&path);
        assert_eq!(artifact.name(), "broken");
        assert!(artifact.is_present());
    }
}

//! The compiled Nasin grammar and a harness that proves it loads.
//!
//! A grammar artifact goes through a [`ParsingRuntime`] to become a
//! [`LanguageHandle`]; [`verify`] then classifies the handle, and the
//! [`report`] module turns that into the `CanLoadGrammar` pass/fail every
//! binding exposes.
//!
//! ```
//! use tree_sitter_nasin::{load_language, verify, ValidationResult};
//!
//! let handle = load_language();
//! assert_eq!(verify(&handle), ValidationResult::Valid);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::multiple_crate_versions)]

/// Compiled grammar artifacts, including the embedded Nasin grammar.
pub mod artifact;

/// Run configuration: which artifacts to check and how often.
pub mod config;

/// Decoding of compiled `grammar.json` artifacts.
///
/// Everything the runtime knows about a grammar's shape comes from these
/// types; they mirror Tree-sitter's JSON schema field for field.
pub mod grammar;

/// Interned languages and the handles that reference them.
pub mod language;

/// Entry points that load a grammar into a language handle.
pub mod loader;

/// Turning verification outcomes into pass/fail reports.
pub mod report;

/// The parsing-runtime seam and its in-process implementation.
pub mod runtime;

/// Grammar validation and consistency checking.
///
/// Validation protects the runtime from artifacts that decode but cannot be
/// interned, such as dangling symbol references or truncated combinators.
pub mod validate;

/// Handle validation and the single-shot verifier.
pub mod verify;

pub use artifact::{GrammarArtifact, LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION};
pub use grammar::{parse_grammar, Grammar, GrammarError, Rule};
pub use language::{Language, LanguageHandle};
pub use loader::{language, load_language, load_language_with};
pub use report::{check_can_load_grammar, CheckReport, Outcome, Summary, CAN_LOAD_GRAMMAR};
pub use runtime::{GrammarRuntime, LoadError, ParsingRuntime};
pub use validate::{validate, ValidationError};
pub use verify::{verify, ValidationResult, Verifier, VerifierState};

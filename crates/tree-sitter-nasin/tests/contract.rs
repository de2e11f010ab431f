//! End-to-end checks of the load-and-verify contract.
//!
//! These drive the public API the way an embedding application or a binding
//! test would: load, verify, report.

use tree_sitter_nasin::{
    check_can_load_grammar, language, load_language, load_language_with, verify, GrammarArtifact,
    GrammarRuntime, LanguageHandle, Outcome, ParsingRuntime, ValidationResult, LANGUAGE_VERSION,
};

/// A runtime whose grammar was never linked.
struct UnlinkedRuntime;

impl ParsingRuntime for UnlinkedRuntime {
    fn construct(&self, _: &GrammarArtifact) -> LanguageHandle {
        LanguageHandle::null()
    }
}

#[test]
fn can_load_grammar() {
    let handle = language();
    assert!(!handle.is_null(), "Error loading Nasin grammar");
}

#[test]
fn valid_grammar_passes_end_to_end() {
    let handle = load_language();
    assert_eq!(verify(&handle), ValidationResult::Valid);

    let report = check_can_load_grammar(&GrammarRuntime::default(), GrammarArtifact::nasin());
    assert_eq!(report.outcome, Outcome::Pass);
}

#[test]
fn unlinked_grammar_fails_end_to_end() {
    let handle = load_language_with(&UnlinkedRuntime, &GrammarArtifact::nasin());
    assert!(handle.is_null());
    assert_eq!(
        verify(&handle),
        ValidationResult::Invalid("grammar failed to load".to_string())
    );

    let report = check_can_load_grammar(&UnlinkedRuntime, GrammarArtifact::nasin());
    assert_eq!(
        report.outcome,
        Outcome::Fail("grammar failed to load".to_string())
    );
    assert!(report.to_string().contains("nasin"));
}

#[test]
fn repeated_loads_are_each_valid() {
    let first = load_language();
    for _ in 0..100 {
        let handle = load_language();
        assert_eq!(verify(&handle), ValidationResult::Valid);
        assert_eq!(handle.language(), first.language());
    }
}

#[test]
fn verify_accepts_every_non_null_handle() {
    let runtime = GrammarRuntime::default();
    for artifact in GrammarArtifact::builtin() {
        let handle = runtime.construct(&artifact);
        assert!(verify(&handle).is_valid(), "{artifact} should load");
    }
    assert!(!verify(&LanguageHandle::null()).is_valid());
    assert!(!verify(&LanguageHandle::default()).is_valid());
}

#[test]
fn damaged_artifacts_never_panic() {
    let runtime = GrammarRuntime::default();
    let damaged = [
        GrammarArtifact::absent("nasin"),
        GrammarArtifact::from_json("empty", LANGUAGE_VERSION, ""),
        GrammarArtifact::from_json("garbage", LANGUAGE_VERSION, "\u{0}\u{1}not json"),
        GrammarArtifact::from_json("no-rules", LANGUAGE_VERSION, r#"{"name": "x", "rules": {}}"#),
        GrammarArtifact::nasin().with_abi_version(LANGUAGE_VERSION + 1),
        GrammarArtifact::nasin().with_abi_version(0),
    ];

    for artifact in damaged {
        let handle = runtime.construct(&artifact);
        assert!(
            matches!(verify(&handle), ValidationResult::Invalid(_)),
            "{artifact} should not load"
        );
    }
}

#[test]
fn symbol_tables_are_deterministic() {
    let runtime = GrammarRuntime::default();
    let a = runtime.try_construct(&GrammarArtifact::nasin()).unwrap();
    let b = runtime.try_construct(&GrammarArtifact::nasin()).unwrap();
    assert_eq!(a, b);

    let torvo = runtime.try_construct(&GrammarArtifact::torvo()).unwrap();
    assert_eq!(torvo.name(), "torvo");
    assert!(torvo.symbol_for_name("fn", false).is_some());
    assert!(torvo.symbol_for_name("type_decl", true).is_none());
}

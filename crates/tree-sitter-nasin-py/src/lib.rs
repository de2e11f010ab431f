use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::path::PathBuf;
use tree_sitter_nasin::{
    check_can_load_grammar, CheckReport, GrammarArtifact, GrammarRuntime, LanguageHandle,
};

/// Handle to the Nasin language, as returned by `language()`.
#[pyclass(name = "Language", module = "tree_sitter_nasin", frozen)]
struct PyLanguage {
    handle: LanguageHandle,
}

#[pymethods]
impl PyLanguage {
    /// Grammar name, or None if the grammar failed to load.
    #[getter]
    fn name(&self) -> Option<String> {
        self.handle.language().map(|l| l.name().to_string())
    }

    /// ABI version the language was built for.
    #[getter]
    fn abi_version(&self) -> Option<u32> {
        self.handle.language().map(tree_sitter_nasin::Language::abi_version)
    }

    #[getter]
    fn symbol_count(&self) -> usize {
        self.handle.language().map_or(0, tree_sitter_nasin::Language::symbol_count)
    }

    #[getter]
    fn field_count(&self) -> usize {
        self.handle.language().map_or(0, tree_sitter_nasin::Language::field_count)
    }

    /// True unless the handle is null.
    #[getter]
    fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    fn __repr__(&self) -> String {
        match self.handle.language() {
            Some(l) => format!("<Language {} abi={}>", l.name(), l.abi_version()),
            None => "<Language null>".to_string(),
        }
    }
}

/// Load the embedded Nasin grammar.
#[pyfunction]
fn language() -> PyLanguage {
    PyLanguage {
        handle: tree_sitter_nasin::language(),
    }
}

fn report_for(path: Option<PathBuf>) -> CheckReport {
    let artifact = path.map_or_else(GrammarArtifact::nasin, GrammarArtifact::from_path);
    check_can_load_grammar(&GrammarRuntime::default(), artifact)
}

/// True if the grammar loads: the embedded Nasin grammar, or the
/// `grammar.json` at `path`.
#[pyfunction]
#[pyo3(signature = (path=None))]
fn can_load_grammar(path: Option<PathBuf>) -> bool {
    report_for(path).passed()
}

/// Raise RuntimeError with the diagnostic if the grammar does not load.
#[pyfunction]
#[pyo3(signature = (path=None))]
fn check(path: Option<PathBuf>) -> PyResult<()> {
    let report = report_for(path);
    if report.passed() {
        Ok(())
    } else {
        Err(PyRuntimeError::new_err(report.to_string()))
    }
}

#[pymodule]
fn _binding(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyLanguage>()?;
    m.add_function(wrap_pyfunction!(language, m)?)?;
    m.add_function(wrap_pyfunction!(can_load_grammar, m)?)?;
    m.add_function(wrap_pyfunction!(check, m)?)?;
    m.add("LANGUAGE_VERSION", tree_sitter_nasin::LANGUAGE_VERSION)?;
    Ok(())
}

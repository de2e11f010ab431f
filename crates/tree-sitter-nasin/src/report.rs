//! The reporting boundary: turning verification outcomes into pass/fail.
//!
//! Test harnesses call [`CheckReport::assert_pass`], which panics with the
//! diagnostic the way a failed assertion would. The CLI maps a [`Summary`] to
//! a process exit code instead.

use crate::artifact::GrammarArtifact;
use crate::runtime::ParsingRuntime;
use crate::verify::{Verifier, VerifierState};
use std::fmt;
use std::process::ExitCode;

/// Name of the one check every binding exposes.
pub const CAN_LOAD_GRAMMAR: &str = "CanLoadGrammar";

/// Pass or fail, with the reason on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The grammar loaded.
    Pass,
    /// The grammar did not load.
    Fail(String),
}

/// The recorded result of one check against one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// The check that ran.
    pub check: &'static str,
    /// Which artifact it ran against.
    pub artifact: String,
    /// What happened.
    pub outcome: Outcome,
}

impl CheckReport {
    /// Builds a report from a verifier, running it first if needed.
    pub fn from_verifier<R>(verifier: &mut Verifier<'_, R>) -> Self
    where
        R: ParsingRuntime + ?Sized,
    {
        let outcome = match verifier.run() {
            VerifierState::Verified(_) => Outcome::Pass,
            VerifierState::Failed(reason) => Outcome::Fail(reason.clone()),
            VerifierState::Unverified => Outcome::Fail("grammar was not verified".to_string()),
        };
        Self {
            check: CAN_LOAD_GRAMMAR,
            artifact: verifier.artifact().name().to_string(),
            outcome,
        }
    }

    /// Whether the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// The process exit code for this report alone.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Panics with the diagnostic unless the check passed.
    ///
    /// # Panics
    ///
    /// Panics when the outcome is [`Outcome::Fail`].
    #[track_caller]
    pub fn assert_pass(&self) {
        assert!(self.passed(), "{self}");
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}): ", self.check, self.artifact)?;
        match &self.outcome {
            Outcome::Pass => f.write_str("pass"),
            Outcome::Fail(reason) => write!(f, "fail: {reason}"),
        }
    }
}

/// Runs `CanLoadGrammar` against `artifact`.
pub fn check_can_load_grammar<R>(runtime: &R, artifact: GrammarArtifact) -> CheckReport
where
    R: ParsingRuntime + ?Sized,
{
    let mut verifier = Verifier::new(runtime, artifact);
    CheckReport::from_verifier(&mut verifier)
}

/// An ordered collection of reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    reports: Vec<CheckReport>,
}

impl Summary {
    /// Appends a report.
    pub fn push(&mut self, report: CheckReport) {
        self.reports.push(report);
    }

    /// Every report, in the order they were recorded.
    #[must_use]
    pub fn reports(&self) -> &[CheckReport] {
        &self.reports
    }

    /// Reports that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CheckReport> {
        self.reports.iter().filter(|r| !r.passed())
    }

    /// Number of passing reports.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    /// Number of failing reports.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Success only if at least one check ran and none failed.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if !self.reports.is_empty() && self.failed() == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl FromIterator<CheckReport> for Summary {
    fn from_iter<I: IntoIterator<Item = CheckReport>>(iter: I) -> Self {
        Self {
            reports: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed(), self.failed())
    }
}

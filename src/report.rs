//! Report assembly
//!
//! Turns a reconciliation into the structure renderers consume: diagnostics
//! in manifest order, the skipped modules, the invalid tags and the overall
//! verdict.

use crate::domain::{Diagnostic, InvalidTag, SkippedModule};
use crate::reconcile::Reconciliation;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Overall outcome of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No module is outdated and every dependency is satisfied
    Pass,
    /// At least one module is outdated or has a dependency problem
    Fail,
}

impl Verdict {
    /// Returns true for `Pass`
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Presentation-ready result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Overall verdict
    pub verdict: Verdict,
    /// Whether passing modules are listed as well
    pub include_info: bool,
    diagnostics: Vec<Diagnostic>,
    /// Modules that could not be checked
    pub skipped: Vec<SkippedModule>,
    /// Declarations dropped for invalid tags
    pub invalid_tags: Vec<InvalidTag>,
}

impl Report {
    /// Assemble a report from reconciliation results
    ///
    /// Skipped modules and invalid tags are reported but never fail the
    /// verdict on their own.
    pub fn assemble(
        reconciliation: Reconciliation,
        invalid_tags: Vec<InvalidTag>,
        include_info: bool,
    ) -> Self {
        let verdict = if reconciliation.diagnostics.iter().any(Diagnostic::has_problems) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        Self {
            verdict,
            include_info,
            diagnostics: reconciliation.diagnostics,
            skipped: reconciliation.skipped,
            invalid_tags,
        }
    }

    /// Diagnostics to present: all in informational mode, otherwise failing ones
    pub fn entries(&self) -> impl Iterator<Item = &Diagnostic> {
        let include_info = self.include_info;
        self.diagnostics
            .iter()
            .filter(move |d| include_info || d.has_problems())
    }

    /// Every diagnostic, regardless of mode
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of modules checked against the registry
    pub fn checked_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of modules with problems
    pub fn failing_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.has_problems()).count()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let modules: Vec<&Diagnostic> = self.entries().collect();

        let mut state = serializer.serialize_struct("Report", 7)?;
        state.serialize_field("verdict", &self.verdict)?;
        state.serialize_field("include_info", &self.include_info)?;
        state.serialize_field("checked", &self.checked_count())?;
        state.serialize_field("failing", &self.failing_count())?;
        state.serialize_field("modules", &modules)?;
        state.serialize_field("skipped", &self.skipped)?;
        state.serialize_field("invalid_tags", &self.invalid_tags)?;
        state.end()
    }
}

//! Turns findings into positioned, ordered diagnostics.

use std::collections::HashSet;

use crate::error::AnalysisError;
use crate::syntax::LineIndex;

use super::{Diagnostic, Finding};

/// Collects findings for one analysis unit and produces the final
/// diagnostic sequence.
///
/// Output is ordered by start line, then start column, then rule
/// precedence, then the order findings were pushed. A finding with the
/// same rule and location as an earlier one is dropped.
pub struct Reporter<'a> {
    line_index: &'a LineIndex,
    findings: Vec<Finding>,
}

impl<'a> Reporter<'a> {
    pub fn new(line_index: &'a LineIndex) -> Self {
        Self {
            line_index,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Resolve positions and order the diagnostics.
    ///
    /// Fails if any finding points outside the source text.
    pub fn finish(self) -> Result<Vec<Diagnostic>, AnalysisError> {
        let mut diagnostics = self
            .findings
            .iter()
            .map(|finding| {
                let meta = finding.rule.meta();
                Ok(Diagnostic {
                    rule: finding.rule,
                    message: meta.message.to_string(),
                    severity: meta.default_severity,
                    location: self.line_index.span(finding.range)?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        // Stable sort keeps discovery order for full ties.
        diagnostics.sort_by_key(|d| (d.location.start_line, d.location.start_column, d.rule));

        let mut seen = HashSet::new();
        diagnostics.retain(|d| seen.insert((d.rule, d.location)));

        Ok(diagnostics)
    }
}

impl Extend<Finding> for Reporter<'_> {
    fn extend<I: IntoIterator<Item = Finding>>(&mut self, iter: I) {
        self.findings.extend(iter);
    }
}

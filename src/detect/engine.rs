//! One analysis pass: locate, validate, detect, report.

use std::sync::mpsc::Sender;

use tracing::trace;

use crate::error::AnalysisError;
use crate::syntax::SyntaxTree;

use super::{
    detect_dollar_brace, detect_unnecessary_interpolation, locate_interpolated_strings,
    Diagnostic, Reporter, RuleId, RuleSet,
};

/// Receives diagnostics once a pass has ordered them.
pub trait DiagnosticSink {
    /// Accept one diagnostic. Returns `false` when the sink no longer
    /// wants more.
    fn accept(&mut self, diagnostic: Diagnostic) -> bool;
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn accept(&mut self, diagnostic: Diagnostic) -> bool {
        self.push(diagnostic);
        true
    }
}

impl DiagnosticSink for Sender<Diagnostic> {
    fn accept(&mut self, diagnostic: Diagnostic) -> bool {
        self.send(diagnostic).is_ok()
    }
}

/// Runs the enabled rules over a syntax tree.
///
/// An engine holds no per-pass state, so one engine can serve many passes
/// on many threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    rules: RuleSet,
}

impl Engine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Analyze one tree and return its ordered diagnostics.
    ///
    /// Every located node is validated first; a malformed node aborts the
    /// pass rather than producing misleading positions.
    pub fn analyze(&self, tree: &SyntaxTree) -> Result<Vec<Diagnostic>, AnalysisError> {
        let nodes = locate_interpolated_strings(tree);
        for node in &nodes {
            node.validate()?;
        }

        let mut reporter = Reporter::new(&tree.line_index);
        for rule in self.rules.enabled() {
            match rule {
                RuleId::DollarBrace => {
                    for node in &nodes {
                        reporter.extend(detect_dollar_brace(node));
                    }
                }
                RuleId::UnnecessaryInterpolation => {
                    reporter.extend(
                        nodes
                            .iter()
                            .filter_map(|node| detect_unnecessary_interpolation(node)),
                    );
                }
            }
        }

        trace!(
            nodes = nodes.len(),
            findings = reporter.len(),
            "analysis pass complete"
        );
        reporter.finish()
    }

    /// Analyze one tree and push its ordered diagnostics onto `sink`.
    ///
    /// Nothing is delivered if the pass fails. Returns the number of
    /// diagnostics the sink accepted.
    pub fn analyze_into(
        &self,
        tree: &SyntaxTree,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<usize, AnalysisError> {
        let mut delivered = 0;
        for diagnostic in self.analyze(tree)? {
            if !sink.accept(diagnostic) {
                break;
            }
            delivered += 1;
        }
        Ok(delivered)
    }
}

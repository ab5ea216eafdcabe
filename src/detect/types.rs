//! Core types for detection results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RuleId;
use crate::syntax::{NodeId, SourceSpan, TextRange};

/// Severity levels for diagnostics, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A raw detector hit, before positions are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub rule: RuleId,
    /// Node the finding was raised on.
    pub node: NodeId,
    /// Characters to highlight.
    pub range: TextRange,
}

/// A positioned diagnostic for one analysis unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub message: String,
    pub severity: Severity,
    pub location: SourceSpan,
}

/// A diagnostic attributed to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub file: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl Violation {
    pub fn new(file: impl Into<String>, diagnostic: Diagnostic) -> Self {
        Self {
            file: file.into(),
            diagnostic,
        }
    }

    pub fn rule(&self) -> RuleId {
        self.diagnostic.rule
    }

    pub fn line(&self) -> usize {
        self.diagnostic.location.start_line
    }

    pub fn column(&self) -> usize {
        self.diagnostic.location.start_column
    }
}

/// A file the frontend could not scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub file: String,
    pub message: String,
    /// Line and column of the problem, when it could be resolved.
    #[serde(default)]
    pub position: Option<(usize, usize)>,
}

/// Results of running detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionResult {
    pub violations: Vec<Violation>,
    /// Violations that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<super::SuppressedViolation>,
    /// Files that could not be scanned
    #[serde(default)]
    pub failures: Vec<ParseFailure>,
    /// Number of files scanned
    pub scanned: usize,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: DetectionResult) {
        self.violations.extend(other.violations);
        self.suppressed.extend(other.suppressed);
        self.failures.extend(other.failures);
        self.scanned += other.scanned;
    }

    /// Number of suppressed violations.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Check if any active violation is at least as severe as `level`.
    pub fn has_at_least(&self, level: Severity) -> bool {
        self.violations
            .iter()
            .any(|v| v.diagnostic.severity >= level)
    }

    /// Active violation counts per rule, in rule precedence order.
    pub fn counts_by_rule(&self) -> BTreeMap<RuleId, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.rule()).or_insert(0) += 1;
        }
        counts
    }

    /// Order violations by file, then by position within the file.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line().cmp(&b.line()))
                .then(a.column().cmp(&b.column()))
                .then(a.rule().cmp(&b.rule()))
        });
        self.suppressed
            .sort_by(|a, b| a.violation.file.cmp(&b.violation.file));
        self.failures.sort_by(|a, b| a.file.cmp(&b.file));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(file: &str, rule: RuleId, line: usize, column: usize) -> Violation {
        Violation::new(
            file,
            Diagnostic {
                rule,
                message: rule.meta().message.to_string(),
                severity: Severity::Warning,
                location: SourceSpan {
                    start_line: line,
                    start_column: column,
                    end_line: line,
                    end_column: column + 1,
                },
            },
        )
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_has_at_least() {
        let mut result = DetectionResult::new();
        assert!(!result.has_at_least(Severity::Info));

        result
            .violations
            .push(violation("a.cs", RuleId::DollarBrace, 1, 1));
        assert!(result.has_at_least(Severity::Warning));
        assert!(!result.has_at_least(Severity::Error));
    }

    #[test]
    fn test_sort_and_counts() {
        let mut result = DetectionResult::new();
        result.violations = vec![
            violation("b.cs", RuleId::DollarBrace, 1, 1),
            violation("a.cs", RuleId::UnnecessaryInterpolation, 3, 5),
            violation("a.cs", RuleId::DollarBrace, 3, 5),
            violation("a.cs", RuleId::DollarBrace, 2, 9),
        ];
        result.sort();

        let order: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.file.as_str(), v.rule(), v.line(), v.column()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.cs", RuleId::DollarBrace, 2, 9),
                ("a.cs", RuleId::DollarBrace, 3, 5),
                ("a.cs", RuleId::UnnecessaryInterpolation, 3, 5),
                ("b.cs", RuleId::DollarBrace, 1, 1),
            ]
        );

        let counts = result.counts_by_rule();
        assert_eq!(counts[&RuleId::DollarBrace], 3);
        assert_eq!(counts[&RuleId::UnnecessaryInterpolation], 1);
    }

    #[test]
    fn test_violation_serializes_flat() {
        let v = violation("a.cs", RuleId::DollarBrace, 9, 19);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["file"], "a.cs");
        assert_eq!(json["rule"], "DollarBrace");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["location"]["start_column"], 19);
    }
}

//! Inline suppression of diagnostics via comments.
//!
//! Supports suppression comments like:
//! - `// interpcheck:ignore <rule> - <reason>`
//! - `// interpcheck:ignore-next-line <rule> - <reason>`
//! - `// interpcheck:ignore-file <rule> - <reason>`
//!
//! `<rule>` is a rule identifier such as `DollarBrace`, or `*` for all
//! rules. The `/* ... */` form is accepted as well.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{RuleId, Violation};
use crate::syntax::BYTE_ORDER_MARK;

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Rule to suppress (e.g., "DollarBrace") or "*" for all
    pub rule: String,
    /// Human-readable reason
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

/// A violation that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedViolation {
    pub violation: Violation,
    pub suppression: Suppression,
}

lazy_static::lazy_static! {
    /// Patterns for matching suppression comments.
    static ref SUPPRESSION_PATTERNS: Vec<Regex> = vec![
        // Line comment: // interpcheck:...
        Regex::new(r"//\s*interpcheck:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap(),
        // Block comment: /* interpcheck:... */
        Regex::new(r"/\*\s*interpcheck:(ignore(?:-file|-next-line)?)\s+(\S+?)\s*(?:-\s*(.*?))?\s*\*/").unwrap(),
    ];
}

/// File-level directives further down than this are ignored unless they
/// are still inside the leading comment block.
const FILE_DIRECTIVE_MAX_LINE: usize = 10;

/// Parse suppression directives from file content.
pub fn parse_suppressions(file_path: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;

        // The header is the leading run of comments and blank lines
        let trimmed = line.trim_start_matches(BYTE_ORDER_MARK).trim();
        if in_header && !is_comment_or_empty(trimmed) {
            in_header = false;
        }

        for pattern in SUPPRESSION_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                let rule = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                let reason = caps
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                let suppression_type = match directive {
                    "ignore-file" => {
                        if !in_header && line_number > FILE_DIRECTIVE_MAX_LINE {
                            continue;
                        }
                        SuppressionType::File
                    }
                    "ignore-next-line" => SuppressionType::NextLine,
                    "ignore" => {
                        // Alone on its line it covers the next line,
                        // after code it covers its own line.
                        let before = caps.get(0).map(|m| &line[..m.start()]).unwrap_or("");
                        if before.trim().is_empty() {
                            SuppressionType::NextLine
                        } else {
                            SuppressionType::Line
                        }
                    }
                    _ => continue,
                };

                suppressions.push(Suppression {
                    rule: rule.to_string(),
                    reason,
                    file: file_path.to_string(),
                    line: if suppression_type == SuppressionType::File {
                        0
                    } else {
                        line_number
                    },
                    suppression_type,
                });
                break; // Only one suppression per line
            }
        }
    }

    suppressions
}

fn is_comment_or_empty(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with("/*") || line.starts_with('*')
}

/// Check if a violation matches a suppression.
pub fn matches_suppression(violation: &Violation, suppression: &Suppression) -> bool {
    if violation.file != suppression.file {
        return false;
    }

    if suppression.rule != "*" {
        match RuleId::parse(&suppression.rule) {
            Some(rule) if rule == violation.rule() => {}
            _ => return false,
        }
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => violation.line() == suppression.line,
        SuppressionType::NextLine => violation.line() == suppression.line + 1,
    }
}

/// Separate violations into active and suppressed based on suppressions.
pub fn filter_suppressed(
    violations: Vec<Violation>,
    suppressions: &[Suppression],
) -> (Vec<Violation>, Vec<SuppressedViolation>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for violation in violations {
        match suppressions
            .iter()
            .find(|s| matches_suppression(&violation, s))
        {
            Some(suppression) => suppressed.push(SuppressedViolation {
                violation,
                suppression: suppression.clone(),
            }),
            None => active.push(violation),
        }
    }

    (active, suppressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Diagnostic, Severity};
    use crate::syntax::SourceSpan;

    fn violation(rule: RuleId, line: usize) -> Violation {
        Violation::new(
            "Program.cs",
            Diagnostic {
                rule,
                message: rule.meta().message.to_string(),
                severity: Severity::Warning,
                location: SourceSpan {
                    start_line: line,
                    start_column: 5,
                    end_line: line,
                    end_column: 6,
                },
            },
        )
    }

    fn suppression(rule: &str, line: usize, suppression_type: SuppressionType) -> Suppression {
        Suppression {
            rule: rule.to_string(),
            reason: String::new(),
            file: "Program.cs".to_string(),
            line,
            suppression_type,
        }
    }

    #[test]
    fn test_parse_suppressions() {
        let content = r#"// interpcheck:ignore-file UnnecessaryInterpolation - Generated code
using System;

class C
{
    string a = $"${b}"; // interpcheck:ignore DollarBrace - Intentional
    // interpcheck:ignore * - Legacy
    string c = $"x";
    /* interpcheck:ignore-next-line DollarBrace */
    string d = $"${e}";
}
"#;
        let suppressions = parse_suppressions("Program.cs", content);
        assert_eq!(suppressions.len(), 4);

        assert_eq!(suppressions[0].suppression_type, SuppressionType::File);
        assert_eq!(suppressions[0].rule, "UnnecessaryInterpolation");
        assert_eq!(suppressions[0].reason, "Generated code");
        assert_eq!(suppressions[0].line, 0);

        assert_eq!(suppressions[1].suppression_type, SuppressionType::Line);
        assert_eq!(suppressions[1].line, 6);
        assert_eq!(suppressions[1].reason, "Intentional");

        assert_eq!(suppressions[2].suppression_type, SuppressionType::NextLine);
        assert_eq!(suppressions[2].rule, "*");

        assert_eq!(suppressions[3].suppression_type, SuppressionType::NextLine);
        assert_eq!(suppressions[3].rule, "DollarBrace");
        assert_eq!(suppressions[3].line, 9);
    }

    #[test]
    fn test_header_after_byte_order_mark() {
        let mut content = String::from("\u{feff}// Copyright Shop\n");
        for _ in 0..12 {
            content.push_str("//\n");
        }
        content.push_str("// interpcheck:ignore-file DollarBrace\nusing System;\n");

        let suppressions = parse_suppressions("Program.cs", &content);
        assert_eq!(suppressions.len(), 1);
        assert_eq!(suppressions[0].suppression_type, SuppressionType::File);
    }

    #[test]
    fn test_late_file_directive_ignored() {
        let mut content = String::from("using System;\n");
        for _ in 0..12 {
            content.push_str("int x = 1;\n");
        }
        content.push_str("// interpcheck:ignore-file DollarBrace\n");
        assert!(parse_suppressions("Program.cs", &content).is_empty());
    }

    #[test]
    fn test_matches_suppression() {
        let v = violation(RuleId::DollarBrace, 5);

        assert!(matches_suppression(
            &v,
            &suppression("DollarBrace", 0, SuppressionType::File)
        ));
        assert!(matches_suppression(
            &v,
            &suppression("DollarBrace", 4, SuppressionType::NextLine)
        ));
        assert!(matches_suppression(
            &v,
            &suppression("DollarBrace", 5, SuppressionType::Line)
        ));
        assert!(matches_suppression(
            &v,
            &suppression("*", 0, SuppressionType::File)
        ));

        // wrong rule, unknown rule, wrong line
        assert!(!matches_suppression(
            &v,
            &suppression("UnnecessaryInterpolation", 0, SuppressionType::File)
        ));
        assert!(!matches_suppression(
            &v,
            &suppression("dollar_brace", 0, SuppressionType::File)
        ));
        assert!(!matches_suppression(
            &v,
            &suppression("DollarBrace", 5, SuppressionType::NextLine)
        ));

        // other file
        let mut other = suppression("*", 0, SuppressionType::File);
        other.file = "Other.cs".to_string();
        assert!(!matches_suppression(&v, &other));
    }

    #[test]
    fn test_filter_suppressed() {
        let violations = vec![
            violation(RuleId::DollarBrace, 3),
            violation(RuleId::UnnecessaryInterpolation, 7),
        ];
        let suppressions = vec![suppression("DollarBrace", 2, SuppressionType::NextLine)];

        let (active, suppressed) = filter_suppressed(violations, &suppressions);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].rule(), RuleId::UnnecessaryInterpolation);
        assert_eq!(suppressed.len(), 1);
        assert_eq!(suppressed[0].suppression.line, 2);
    }
}

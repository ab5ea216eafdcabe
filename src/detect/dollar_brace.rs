//! "Avoid `${}`" detection.
//!
//! Some templating languages spell a placeholder `${name}`. In a C#
//! interpolated string the `$` prefix belongs before the opening quote, so
//! `$"${name}"` renders a literal dollar sign followed by the value.

use crate::syntax::{InterpolatedStringNode, Segment, TextRange};

use super::{Finding, RuleId};

/// Report every literal segment ending in `$` that is immediately followed
/// by a hole. The finding covers just the trailing `$`.
///
/// A `$` followed by more literal text, or ending the string, is ordinary
/// text (`"costs $0.00"`) and is not reported.
pub fn detect_dollar_brace(node: &InterpolatedStringNode) -> Vec<Finding> {
    node.segments
        .windows(2)
        .filter_map(|pair| match (&pair[0], &pair[1]) {
            (Segment::Literal(lit), Segment::Hole(_)) if lit.text.ends_with('$') => {
                Some(Finding {
                    rule: RuleId::DollarBrace,
                    node: node.id,
                    range: TextRange::char_at(lit.range.end - 1),
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Expr, HoleSegment, LiteralSegment, NodeId, StringKind};

    /// Build a node from a compact description: `Some(text)` is a literal
    /// segment, `None` a one-character hole.
    fn node(parts: &[Option<&str>]) -> InterpolatedStringNode {
        let mut pos = 2;
        let mut segments = Vec::new();
        for part in parts {
            let start = pos;
            match part {
                Some(text) => {
                    pos += text.chars().count();
                    segments.push(Segment::Literal(LiteralSegment {
                        text: text.to_string(),
                        range: TextRange::new(start, pos),
                    }));
                }
                None => {
                    pos += 3;
                    segments.push(Segment::Hole(HoleSegment {
                        expression: Expr::Opaque(TextRange::char_at(start + 1)),
                        alignment: None,
                        format: None,
                        range: TextRange::new(start, pos),
                    }));
                }
            }
        }
        InterpolatedStringNode {
            id: NodeId(7),
            kind: StringKind::Regular,
            range: TextRange::new(0, pos + 1),
            content: TextRange::new(2, pos),
            segments,
        }
    }

    #[test]
    fn test_dollar_before_hole() {
        let n = node(&[Some("$"), None]);
        let findings = detect_dollar_brace(&n);
        assert_eq!(
            findings,
            vec![Finding {
                rule: RuleId::DollarBrace,
                node: NodeId(7),
                range: TextRange::new(2, 3),
            }]
        );
    }

    #[test]
    fn test_each_boundary_reported() {
        // $"${a}${b}"
        let n = node(&[Some("$"), None, Some("$"), None]);
        let ranges: Vec<_> = detect_dollar_brace(&n).iter().map(|f| f.range).collect();
        assert_eq!(ranges, vec![TextRange::new(2, 3), TextRange::new(6, 7)]);
    }

    #[test]
    fn test_only_trailing_dollar_counts() {
        let n = node(&[Some("cost: $"), None]);
        let findings = detect_dollar_brace(&n);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].range, TextRange::new(8, 9));

        let n = node(&[Some("$ "), None]);
        assert!(detect_dollar_brace(&n).is_empty());
    }

    #[test]
    fn test_dollar_not_followed_by_hole() {
        // $"{one} costs $0.00" and a string ending in '$'
        assert!(detect_dollar_brace(&node(&[None, Some(" costs $0.00")])).is_empty());
        assert!(detect_dollar_brace(&node(&[None, Some(" $")])).is_empty());
        assert!(detect_dollar_brace(&node(&[Some("$"), Some("x")])).is_empty());
    }

    #[test]
    fn test_consecutive_holes() {
        assert!(detect_dollar_brace(&node(&[None, None])).is_empty());
        assert!(detect_dollar_brace(&node(&[None, Some(""), None])).is_empty());
        // only the first of $"${one}{one}" is reported
        assert_eq!(detect_dollar_brace(&node(&[Some("$"), None, None])).len(), 1);
    }

    #[test]
    fn test_dollar_separated_by_empty_literal() {
        // The literal immediately before the hole is empty, so nothing fires.
        let n = node(&[Some("$"), Some(""), None]);
        assert!(detect_dollar_brace(&n).is_empty());
    }

    #[test]
    fn test_empty_node() {
        assert!(detect_dollar_brace(&node(&[])).is_empty());
    }
}

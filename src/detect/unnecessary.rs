//! "Unnecessary interpolation" detection.

use crate::syntax::{InterpolatedStringNode, Segment};

use super::{Finding, RuleId};

/// Report a node whose direct segments contain no hole.
///
/// The check is structural: a node with any hole is never reported, even
/// when every hole holds a constant. Nested nodes are located and checked
/// on their own. The finding covers the opening marker.
pub fn detect_unnecessary_interpolation(node: &InterpolatedStringNode) -> Option<Finding> {
    if node.segments.iter().any(Segment::is_hole) {
        return None;
    }
    Some(Finding {
        rule: RuleId::UnnecessaryInterpolation,
        node: node.id,
        range: node.opening(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::locate_interpolated_strings;
    use crate::syntax::{self, NodeId, TextRange};

    fn findings(source: &str) -> Vec<Finding> {
        let tree = syntax::parse(source).unwrap();
        locate_interpolated_strings(&tree)
            .into_iter()
            .filter_map(detect_unnecessary_interpolation)
            .collect()
    }

    #[test]
    fn test_literal_only() {
        let found = findings(r#"s = $"Hello World";"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, TextRange::new(4, 6));
    }

    #[test]
    fn test_empty_string() {
        let found = findings(r#"s = $"";"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node, NodeId(0));
    }

    #[test]
    fn test_escaped_braces_are_not_holes() {
        assert_eq!(findings(r#"$"{{literal}}""#).len(), 1);
    }

    #[test]
    fn test_constant_holes_are_holes() {
        for source in [
            r#"$"{1}""#,
            r#"$"{1.0:0.00}""#,
            r#"$"{'x'}""#,
            r#"$"{"x" + "y"}""#,
        ] {
            assert!(findings(source).is_empty(), "{}", source);
        }
    }

    #[test]
    fn test_nested_zero_hole_node() {
        // the outer node has a hole, the nested one has none
        let found = findings(r#"$"{$"x" + "y"}""#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].node, NodeId(1));
        assert_eq!(found[0].range, TextRange::new(3, 5));
    }

    #[test]
    fn test_raw_opening_marker() {
        let found = findings(r#"$$"""plain""""#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, TextRange::new(0, 5));
    }
}

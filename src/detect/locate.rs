//! Interpolated-string discovery.
//!
//! Walks the whole tree depth-first and returns every interpolated string
//! in source order, an outer node always before the nodes nested in its
//! holes. References point into the caller's tree; nothing is copied.

use crate::syntax::{Expr, InterpolatedStringNode, SyntaxTree};

/// Locate every interpolated-string node in `tree`, including nested ones.
pub fn locate_interpolated_strings(tree: &SyntaxTree) -> Vec<&InterpolatedStringNode> {
    let mut found = Vec::new();
    for item in &tree.items {
        visit(item, &mut found);
    }
    found
}

fn visit<'a>(expr: &'a Expr, found: &mut Vec<&'a InterpolatedStringNode>) {
    match expr {
        Expr::Interpolated(node) => {
            found.push(node);
            for hole in node.holes() {
                visit(&hole.expression, found);
                if let Some(alignment) = &hole.alignment {
                    visit(alignment, found);
                }
            }
        }
        Expr::Group(group) => {
            for child in &group.children {
                visit(child, found);
            }
        }
        Expr::Literal(_) | Expr::Opaque(_) => {}
    }
}

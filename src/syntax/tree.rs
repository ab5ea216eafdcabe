//! Tree model consumed by the detectors.
//!
//! The tree is deliberately shallow: the engine only cares about
//! interpolated strings, so everything else is kept as opaque ranges or
//! bracketed groups that may contain more interpolated strings.

use std::fmt;

use super::span::{LineIndex, TextRange};
use crate::error::AnalysisError;

/// Identifier of an interpolated-string node, unique within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bracket kind of a [`Group`]. `None` is used for juxtaposed items, such
/// as the tokens making up a hole expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub delimiter: Delimiter,
    pub range: TextRange,
    pub children: Vec<Expr>,
}

/// An opaque sub-tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Interpolated(InterpolatedStringNode),
    /// Plain string, character or numeric literal.
    Literal(TextRange),
    /// Any other run of tokens.
    Opaque(TextRange),
    Group(Group),
}

impl Expr {
    pub fn range(&self) -> TextRange {
        match self {
            Expr::Interpolated(node) => node.range,
            Expr::Literal(range) | Expr::Opaque(range) => *range,
            Expr::Group(group) => group.range,
        }
    }
}

/// Raw text between holes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSegment {
    /// Source text of the segment, escapes left as written.
    pub text: String,
    pub range: TextRange,
}

/// An embedded expression, including its delimiting braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleSegment {
    pub expression: Expr,
    pub alignment: Option<Expr>,
    pub format: Option<TextRange>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(LiteralSegment),
    Hole(HoleSegment),
}

impl Segment {
    pub fn range(&self) -> TextRange {
        match self {
            Segment::Literal(lit) => lit.range,
            Segment::Hole(hole) => hole.range,
        }
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, Segment::Hole(_))
    }
}

/// Which opening marker introduced the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// `$"..."`
    Regular,
    /// `$@"..."` or `@$"..."`
    Verbatim,
    /// `$"""..."""`, `$$"""..."""`, ...
    Raw { dollars: usize, quotes: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolatedStringNode {
    pub id: NodeId,
    pub kind: StringKind,
    /// Whole construct, opening marker through closing quotes.
    pub range: TextRange,
    /// Region tiled by `segments`.
    pub content: TextRange,
    pub segments: Vec<Segment>,
}

impl InterpolatedStringNode {
    /// Range of the opening marker (`$"`, `@$"`, `$$"""`, ...).
    pub fn opening(&self) -> TextRange {
        TextRange::new(self.range.start, self.content.start)
    }

    pub fn hole_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_hole()).count()
    }

    pub fn holes(&self) -> impl Iterator<Item = &HoleSegment> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Hole(hole) => Some(hole),
            Segment::Literal(_) => None,
        })
    }

    /// Check that the segments tile `content` in order with no gaps or
    /// overlaps, and that `content` sits inside `range`.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let malformed = |reason: String| AnalysisError::MalformedNode {
            id: self.id,
            reason,
        };

        if !self.range.contains_range(self.content) {
            return Err(malformed(format!(
                "content {} lies outside node {}",
                self.content, self.range
            )));
        }

        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ if self.content.is_empty() => return Ok(()),
            _ => {
                return Err(malformed(format!(
                    "no segments but content {} is not empty",
                    self.content
                )))
            }
        };

        if first.range().start != self.content.start {
            return Err(malformed(format!(
                "first segment starts at {}, content starts at {}",
                first.range().start,
                self.content.start
            )));
        }
        for segment in &self.segments {
            if let Segment::Literal(lit) = segment {
                if lit.text.chars().count() != lit.range.len() {
                    return Err(malformed(format!(
                        "literal text {:?} does not match range {}",
                        lit.text, lit.range
                    )));
                }
            }
        }
        for pair in self.segments.windows(2) {
            let (a, b) = (pair[0].range(), pair[1].range());
            if a.end != b.start {
                return Err(malformed(format!("segments {} and {} are not contiguous", a, b)));
            }
        }
        if last.range().end != self.content.end {
            return Err(malformed(format!(
                "last segment ends at {}, content ends at {}",
                last.range().end,
                self.content.end
            )));
        }
        Ok(())
    }
}

/// Root of one analysis unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub items: Vec<Expr>,
    pub line_index: LineIndex,
}

impl SyntaxTree {
    pub fn new(items: Vec<Expr>, line_index: LineIndex) -> Self {
        Self { items, line_index }
    }
}

//! Syntax layer: the tree model the detectors consume, character-level
//! positions, and a C# frontend that builds the tree from source text.
//!
//! Any host that can produce a [`SyntaxTree`] can drive the engine; the
//! bundled [`parse`] function is what the CLI uses.

mod parser;
mod span;
mod tree;

pub use parser::parse;
pub use span::{LineIndex, SourceSpan, TextRange, BYTE_ORDER_MARK};
pub use tree::{
    Delimiter, Expr, Group, HoleSegment, InterpolatedStringNode, LiteralSegment, NodeId, Segment,
    StringKind, SyntaxTree,
};

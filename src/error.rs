//! Error types shared by the frontend and the analysis engine.
//!
//! Both are programming errors from the point of view of the host: a
//! frontend that emits a malformed tree, or a position that cannot be
//! mapped back into the source. Neither is ever swallowed.

use thiserror::Error;

use crate::syntax::NodeId;

/// Failures raised while analyzing a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A node's segments do not tile its content range.
    #[error("malformed interpolated string {id}: {reason}")]
    MalformedNode { id: NodeId, reason: String },
    /// A character offset could not be mapped to a line and column.
    #[error("cannot resolve offset {offset} (source has {len} characters)")]
    UnresolvedLocation { offset: usize, len: usize },
}

/// Failures raised while scanning source text into a syntax tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),
    #[error("unterminated interpolation hole starting at offset {0}")]
    UnterminatedHole(usize),
    #[error("unterminated block comment starting at offset {0}")]
    UnterminatedComment(usize),
    #[error("unbalanced '{found}' at offset {offset}")]
    UnbalancedDelimiter { found: char, offset: usize },
}

impl ParseError {
    /// Character offset where the problem was detected.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnterminatedString(o)
            | ParseError::UnterminatedHole(o)
            | ParseError::UnterminatedComment(o) => *o,
            ParseError::UnbalancedDelimiter { offset, .. } => *offset,
        }
    }
}

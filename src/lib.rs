//! Interpcheck - interpolated-string analyzer for C# sources.
//!
//! Interpcheck reports two mistakes in interpolated strings:
//!
//! - `DollarBrace`: a literal `$` directly before a hole, as in
//!   `$"${name}"`, which emits a stray dollar sign.
//! - `UnnecessaryInterpolation`: an interpolated string without holes,
//!   which should be an ordinary string literal.
//!
//! # Architecture
//!
//! - `syntax`: the tree model, character spans and the C# scanner
//! - `detect`: locator, rules, reporter, engine and the file runner
//! - `config`: YAML config schema
//! - `report`: output formatting (pretty, JSON, SARIF)
//! - `cli`: command-line front end
//!
//! Analysis of one tree is pure and synchronous; the [`Runner`] fans
//! files out across threads, one independent pass per file.

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod report;
pub mod syntax;

pub use config::Config;
pub use detect::{DetectionResult, Diagnostic, Engine, RuleId, RuleSet, Runner, Violation};
pub use error::{AnalysisError, ParseError};
pub use syntax::{parse, SourceSpan, SyntaxTree};

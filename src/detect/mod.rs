//! Detection of interpolated-string misuse.
//!
//! The pipeline for one analysis unit is: locate interpolated strings in
//! the tree, run each enabled rule over every node, then resolve and
//! order the findings through a [`Reporter`].

mod dollar_brace;
mod engine;
mod locate;
mod reporter;
mod rules;
mod runner;
mod suppress;
mod types;
mod unnecessary;

pub use dollar_brace::detect_dollar_brace;
pub use engine::{DiagnosticSink, Engine};
pub use locate::locate_interpolated_strings;
pub use reporter::Reporter;
pub use rules::{RuleId, RuleMeta, RuleSet, RULES};
pub use runner::Runner;
pub use suppress::{
    filter_suppressed, matches_suppression, parse_suppressions, SuppressedViolation, Suppression,
    SuppressionType,
};
pub use types::{DetectionResult, Diagnostic, Finding, ParseFailure, Severity, Violation};
pub use unnecessary::detect_unnecessary_interpolation;

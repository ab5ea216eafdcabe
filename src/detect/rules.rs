//! Rule identifiers and their static metadata.
//!
//! Rule identifiers are stable: hosts and users refer to them in
//! configuration files and suppression comments.

use phf::phf_map;
use serde::{Deserialize, Serialize};

use super::Severity;

/// Stable identifier of a rule.
///
/// Variant order is rule precedence: when two diagnostics share a
/// position, the one with the lower rule sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    DollarBrace,
    UnnecessaryInterpolation,
}

impl RuleId {
    /// All rules, in precedence order.
    pub const ALL: [RuleId; 2] = [RuleId::DollarBrace, RuleId::UnnecessaryInterpolation];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::DollarBrace => "DollarBrace",
            RuleId::UnnecessaryInterpolation => "UnnecessaryInterpolation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RULES.get(s).map(|meta| meta.rule)
    }

    pub fn meta(&self) -> &'static RuleMeta {
        match self {
            RuleId::DollarBrace => &DOLLAR_BRACE,
            RuleId::UnnecessaryInterpolation => &UNNECESSARY_INTERPOLATION,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registration data for a rule.
#[derive(Debug)]
pub struct RuleMeta {
    pub rule: RuleId,
    pub title: &'static str,
    /// Diagnostic message, identical for every occurrence.
    pub message: &'static str,
    pub category: &'static str,
    pub default_severity: Severity,
    pub description: &'static str,
    pub help_anchor: &'static str,
}

static DOLLAR_BRACE: RuleMeta = RuleMeta {
    rule: RuleId::DollarBrace,
    title: "Avoid ${} in interpolated strings",
    message: "Avoid using ${} in interpolated strings.",
    category: "Usage",
    default_severity: Severity::Warning,
    description: "A '$' written directly before an interpolation hole is emitted as a literal dollar sign. Interpolated strings only need the '$' prefix before the opening quote.",
    help_anchor: "#dollarbrace",
};

static UNNECESSARY_INTERPOLATION: RuleMeta = RuleMeta {
    rule: RuleId::UnnecessaryInterpolation,
    title: "Unnecessary interpolated string",
    message: "Avoid using an interpolated string where an equivalent literal string exists.",
    category: "Usage",
    default_severity: Severity::Warning,
    description: "An interpolated string without any interpolation holes has the same value as a plain string literal and should be written as one.",
    help_anchor: "#unnecessaryinterpolation",
};

/// Rule table keyed by stable identifier.
pub static RULES: phf::Map<&'static str, &'static RuleMeta> = phf_map! {
    "DollarBrace" => &DOLLAR_BRACE,
    "UnnecessaryInterpolation" => &UNNECESSARY_INTERPOLATION,
};

/// Which rules an engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    dollar_brace: bool,
    unnecessary_interpolation: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

impl RuleSet {
    pub fn all() -> Self {
        Self {
            dollar_brace: true,
            unnecessary_interpolation: true,
        }
    }

    pub fn none() -> Self {
        Self {
            dollar_brace: false,
            unnecessary_interpolation: false,
        }
    }

    pub fn with(mut self, rule: RuleId, enabled: bool) -> Self {
        self.set(rule, enabled);
        self
    }

    pub fn set(&mut self, rule: RuleId, enabled: bool) {
        match rule {
            RuleId::DollarBrace => self.dollar_brace = enabled,
            RuleId::UnnecessaryInterpolation => self.unnecessary_interpolation = enabled,
        }
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        match rule {
            RuleId::DollarBrace => self.dollar_brace,
            RuleId::UnnecessaryInterpolation => self.unnecessary_interpolation,
        }
    }

    /// Enabled rules, in precedence order.
    pub fn enabled(&self) -> impl Iterator<Item = RuleId> + '_ {
        RuleId::ALL.into_iter().filter(|r| self.is_enabled(*r))
    }
}

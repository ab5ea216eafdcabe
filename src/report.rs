//! Output formatting for interpcheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use std::collections::BTreeMap;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::detect::{
    DetectionResult, ParseFailure, RuleId, Severity, SuppressedViolation, SuppressionType,
    Violation,
};
use crate::syntax::SourceSpan;

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub config: String,
    pub files_scanned: usize,
    pub violations: Vec<JsonViolation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedViolation>,
    pub suppressed_count: usize,
    /// Active violations per rule identifier.
    pub counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JsonFailure>,
}

/// One violation in the JSON report.
#[derive(Serialize, Deserialize)]
pub struct JsonViolation {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
}

/// Suppressed violation with suppression info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppressedViolation {
    pub violation: JsonViolation,
    pub suppression: JsonSuppression,
}

/// Suppression directive info.
#[derive(Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub file: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

/// A file that could not be scanned.
#[derive(Serialize, Deserialize)]
pub struct JsonFailure {
    pub file: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Build the JSON report for a detection result.
pub fn build_json_report(path: &str, config_path: &str, result: &DetectionResult) -> JsonReport {
    let suppressed = result
        .suppressed
        .iter()
        .map(|sv| JsonSuppressedViolation {
            violation: violation_to_json(&sv.violation),
            suppression: JsonSuppression {
                rule: sv.suppression.rule.clone(),
                reason: sv.suppression.reason.clone(),
                file: sv.suppression.file.clone(),
                line: sv.suppression.line,
                suppression_type: format!("{:?}", sv.suppression.suppression_type).to_lowercase(),
            },
        })
        .collect();

    let counts = result
        .counts_by_rule()
        .into_iter()
        .map(|(rule, count)| (rule.as_str().to_string(), count))
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.to_string(),
        files_scanned: result.scanned,
        violations: result.violations.iter().map(violation_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed.len(),
        counts,
        failures: result.failures.iter().map(failure_to_json).collect(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, config_path: &str, result: &DetectionResult) -> anyhow::Result<()> {
    let report = build_json_report(path, config_path, result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

fn violation_to_json(v: &Violation) -> JsonViolation {
    let SourceSpan {
        start_line,
        start_column,
        end_line,
        end_column,
    } = v.diagnostic.location;
    JsonViolation {
        rule: v.rule().as_str().to_string(),
        severity: v.diagnostic.severity.to_string(),
        file: v.file.clone(),
        line: start_line,
        column: start_column,
        end_line,
        end_column,
        message: v.diagnostic.message.clone(),
    }
}

fn failure_to_json(f: &ParseFailure) -> JsonFailure {
    JsonFailure {
        file: f.file.clone(),
        message: f.message.clone(),
        line: f.position.map(|(line, _)| line),
        column: f.position.map(|(_, column)| column),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "interpcheck";
const INFO_URI: &str = "https://github.com/zen-systems/interpcheck";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription", skip_serializing_if = "Option::is_none")]
    pub full_description: Option<SarifMessage>,
    #[serde(rename = "helpUri", skip_serializing_if = "Option::is_none")]
    pub help_uri: Option<String>,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
    #[serde(rename = "endLine")]
    pub end_line: usize,
    #[serde(rename = "endColumn")]
    pub end_column: usize,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn sarif_rule(rule: RuleId) -> SarifRule {
    let meta = rule.meta();
    SarifRule {
        id: rule.as_str().to_string(),
        name: rule.as_str().to_string(),
        short_description: SarifMessage {
            text: meta.title.to_string(),
        },
        full_description: Some(SarifMessage {
            text: meta.description.to_string(),
        }),
        help_uri: Some(format!("{}{}", INFO_URI, meta.help_anchor)),
        default_config: SarifRuleConfig {
            level: map_severity_to_level(meta.default_severity).to_string(),
        },
    }
}

/// Build the SARIF report for a detection result.
///
/// Every known rule is listed in the driver so that consumers can show
/// rule help even for runs without results.
pub fn build_sarif_report(result: &DetectionResult) -> SarifReport {
    let rules = RuleId::ALL.iter().copied().map(sarif_rule).collect();

    let results = result
        .violations
        .iter()
        .map(|v| {
            let span = v.diagnostic.location;
            SarifResult {
                rule_id: v.rule().as_str().to_string(),
                level: map_severity_to_level(v.diagnostic.severity).to_string(),
                message: SarifMessage {
                    text: v.diagnostic.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifact {
                            uri: v.file.clone(),
                        },
                        region: SarifRegion {
                            start_line: span.start_line,
                            start_column: span.start_column,
                            end_line: span.end_line,
                            end_column: span.end_column,
                        },
                    },
                }],
            }
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(result: &DetectionResult) -> anyhow::Result<()> {
    let report = build_sarif_report(result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(
    path: &str,
    config_path: &str,
    result: &DetectionResult,
    show_suppressed: bool,
) {
    // Header
    println!();
    print!("  ");
    print!("{}", "interpcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config_path);
    println!();

    write_result_summary(result);
    println!();

    if !result.violations.is_empty() {
        write_violations(&result.violations);
        println!();
    }

    if !result.failures.is_empty() {
        write_failures(&result.failures);
        println!();
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&result.suppressed, show_suppressed);
        println!();
    }

    if !result.violations.is_empty() {
        write_breakdown(result);
        println!();
    }
}

fn write_result_summary(result: &DetectionResult) {
    if result.violations.is_empty() {
        print!("  {}", "✓ CLEAN".green());
    } else {
        print!("  {}", "✗ ISSUES".red());
    }

    let plural = if result.scanned != 1 { "s" } else { "" };
    print!("  {} file{} scanned", result.scanned, plural);

    if !result.suppressed.is_empty() {
        print!(
            "  {}",
            format!("({} suppressed)", result.suppressed.len()).dimmed()
        );
    }

    println!();
}

fn write_violations(violations: &[Violation]) {
    println!("  {} ({}):", "Violations".bold(), violations.len());
    println!();

    for v in violations {
        write_severity_tag(v.diagnostic.severity);
        print!("   ");
        print!("{:<26}", v.rule().as_str().dimmed());
        print!("{}", v.file.blue());
        print!("{}", format!(":{}:{}", v.line(), v.column()).dimmed());
        println!();

        // Message on next line, indented
        println!("            {}", v.diagnostic.message);
        println!();
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_failures(failures: &[ParseFailure]) {
    println!("  {} ({}):", "Not scanned".yellow().bold(), failures.len());

    for f in failures {
        print!("    {}", f.file.blue());
        if let Some((line, column)) = f.position {
            print!("{}", format!(":{}:{}", line, column).dimmed());
        }
        println!("  {}", f.message.dimmed());
    }
}

fn write_breakdown(result: &DetectionResult) {
    println!("  {}", "Breakdown:".bold());

    for (rule, count) in result.counts_by_rule() {
        let plural = if count != 1 { "s" } else { "" };
        println!("    {:<26} {} violation{}", rule.as_str(), count, plural);
    }
}

fn write_suppressed_summary(suppressed: &[SuppressedViolation], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    println!();
    for sv in suppressed {
        let v = &sv.violation;
        let s = &sv.suppression;

        print!("    {:<26}", v.rule().as_str().dimmed());
        print!("{}", v.file.blue());
        if s.suppression_type == SuppressionType::File {
            print!("{}", ":* (file)".dimmed());
        } else {
            print!("{}", format!(":{}:{}", v.line(), v.column()).dimmed());
        }
        println!();

        if !s.reason.is_empty() {
            println!("            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}

// =============================================================================
// Rule table
// =============================================================================

/// Print the rule table for `interpcheck rules`.
pub fn write_rules() {
    println!();
    for rule in RuleId::ALL {
        let meta = rule.meta();
        print!("  {}", rule.as_str().cyan().bold());
        println!("  {}", format!("[{}, {}]", meta.category, meta.default_severity).dimmed());
        println!("    {}", meta.message);
        println!("    {}", meta.description.dimmed());
        println!();
    }
}

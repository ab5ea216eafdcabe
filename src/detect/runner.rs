//! Detection runner that checks a set of files.
//!
//! Each file is one analysis pass: read, scan into a syntax tree, run the
//! engine, apply inline suppressions. Passes share nothing and run in
//! parallel.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::syntax::{self, LineIndex};

use super::{
    filter_suppressed, parse_suppressions, DetectionResult, Engine, ParseFailure, RuleSet,
    Violation,
};

/// Executes the enabled rules against a set of files.
pub struct Runner {
    base_dir: PathBuf,
    engine: Engine,
}

impl Runner {
    /// Create a new detection runner. Reported file names are relative to
    /// `base_dir`.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            engine: Engine::default(),
        }
    }

    /// Set which rules to run.
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.engine = Engine::new(rules);
        self
    }

    /// Check every file and collect the results.
    ///
    /// A file the frontend cannot scan is recorded as a failure. An
    /// internal analysis error aborts the run.
    pub fn run(&self, files: &[PathBuf]) -> anyhow::Result<DetectionResult> {
        debug!(files = files.len(), "starting detection");

        let outcomes = files
            .par_iter()
            .map(|file| self.check_file(file))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut result = DetectionResult::new();
        for outcome in outcomes {
            result.merge(outcome);
        }
        result.sort();

        debug!(
            violations = result.violations.len(),
            suppressed = result.suppressed_count(),
            failures = result.failures.len(),
            "detection finished"
        );
        Ok(result)
    }

    fn check_file(&self, path: &Path) -> anyhow::Result<DetectionResult> {
        let file = self.display_path(path);
        let source =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", file))?;

        let mut result = DetectionResult::new();
        result.scanned = 1;

        let tree = match syntax::parse(&source) {
            Ok(tree) => tree,
            Err(e) => {
                warn!(file = %file, error = %e, "skipping file that could not be scanned");
                let position = LineIndex::new(&source).line_col(e.offset()).ok();
                result.failures.push(ParseFailure {
                    file,
                    message: e.to_string(),
                    position,
                });
                return Ok(result);
            }
        };

        let diagnostics = self
            .engine
            .analyze(&tree)
            .with_context(|| format!("internal error while analyzing {}", file))?;

        let violations = diagnostics
            .into_iter()
            .map(|d| Violation::new(file.clone(), d))
            .collect();

        let suppressions = parse_suppressions(&file, &source);
        let (active, suppressed) = filter_suppressed(violations, &suppressions);
        debug!(
            file = %file,
            active = active.len(),
            suppressed = suppressed.len(),
            "checked file"
        );

        result.violations = active;
        result.suppressed = suppressed;
        Ok(result)
    }

    /// Path as reported: relative to the base directory, or the bare file
    /// name when the base is the file itself.
    fn display_path(&self, path: &Path) -> String {
        if path == self.base_dir {
            return path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
        }

        path.strip_prefix(&self.base_dir)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::RuleId;
    use tempfile::TempDir;

    #[test]
    fn test_runner_basic() {
        let temp = TempDir::new().unwrap();
        let program = temp.path().join("Program.cs");
        std::fs::write(
            &program,
            r#"class Program
{
    static void Main()
    {
        var name = "world";
        System.Console.WriteLine($"Hello ${name}");
        System.Console.WriteLine($"Done");
    }
}
"#,
        )
        .unwrap();

        let runner = Runner::new(temp.path());
        let result = runner.run(&[program]).unwrap();

        assert_eq!(result.scanned, 1);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.violations[0].file, "Program.cs");
        assert_eq!(result.violations[0].rule(), RuleId::DollarBrace);
        assert_eq!(result.violations[0].line(), 6);
        assert_eq!(result.violations[0].column(), 42);
        assert_eq!(result.violations[1].rule(), RuleId::UnnecessaryInterpolation);
        assert_eq!(result.violations[1].line(), 7);
    }

    #[test]
    fn test_runner_with_suppression() {
        let temp = TempDir::new().unwrap();
        let program = temp.path().join("Program.cs");
        std::fs::write(
            &program,
            r#"class Program
{
    // interpcheck:ignore-next-line DollarBrace - Price template
    string price = $"${amount}";
}
"#,
        )
        .unwrap();

        let runner = Runner::new(temp.path());
        let result = runner.run(&[program]).unwrap();

        assert_eq!(result.violations.len(), 0);
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(result.suppressed[0].suppression.reason, "Price template");
    }

    #[test]
    fn test_runner_disabled_rule() {
        let temp = TempDir::new().unwrap();
        let program = temp.path().join("Program.cs");
        std::fs::write(&program, "class P { string s = $\"x\"; }\n").unwrap();

        let runner = Runner::new(temp.path())
            .rules(RuleSet::all().with(RuleId::UnnecessaryInterpolation, false));
        let result = runner.run(&[program]).unwrap();
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_runner_records_parse_failure() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("Broken.cs");
        let good = temp.path().join("Good.cs");
        std::fs::write(&broken, "class B {\n  string s = $\"open;\n}\n").unwrap();
        std::fs::write(&good, "class G { string s = $\"\"; }\n").unwrap();

        let runner = Runner::new(temp.path());
        let result = runner.run(&[broken, good]).unwrap();

        assert_eq!(result.scanned, 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].file, "Broken.cs");
        assert_eq!(result.failures[0].position, Some((2, 14)));
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].file, "Good.cs");
    }

    #[test]
    fn test_single_file_base() {
        let temp = TempDir::new().unwrap();
        let program = temp.path().join("Single.cs");
        std::fs::write(&program, "var s = $\"\";\n").unwrap();

        let runner = Runner::new(&program);
        let result = runner.run(&[program.clone()]).unwrap();
        assert_eq!(result.violations[0].file, "Single.cs");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(temp.path());
        assert!(runner.run(&[temp.path().join("Missing.cs")]).is_err());
    }
}

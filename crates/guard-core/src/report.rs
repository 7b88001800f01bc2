//! Aggregated contract-violation reports.
//!
//! A rejected call produces exactly one [`ContractViolation`] carrying every
//! [`Violation`] found, the call site that made the call, and the callable's
//! context label. Its `Display` form is the operator-facing report:
//!
//! ```text
//! ======================================================================
//! TYPE VALIDATION ERROR - MULTIPLE ERRORS FOUND
//! ======================================================================
//! File: src/main.rs
//! Line: 12
//! Function: sum()
//! Total errors: 1
//! ======================================================================
//!
//! --- ERROR 1 ---
//! Parameter: 'y' (position 2)
//! Expected types: int | float
//! Received type: str
//! Received value: str('3.5')
//!
//! ======================================================================
//! ```

use crate::config::GuardConfig;
use crate::validator::Violation;
use serde::Serialize;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Where a guarded call was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// The location of the caller of the function this is invoked from.
    ///
    /// Every function between the guarded call and this one must be
    /// `#[track_caller]` for the location to point at user code.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// The file name without its directories.
    pub fn file_name(&self) -> &str {
        Path::new(&self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file)
    }
}

impl From<&Location<'_>> for CallSite {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), location.column())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The single failure raised when one or more arguments break their contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractViolation {
    pub call_site: CallSite,
    /// `Function: name()` or `Method: Owner.name()`.
    pub context: String,
    pub total_errors: usize,
    pub violations: Vec<Violation>,
    #[serde(skip)]
    config: GuardConfig,
}

impl ContractViolation {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false: a report is only built for at least one violation.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// First violation recorded for `parameter`.
    pub fn violation_for(&self, parameter: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.parameter == parameter)
    }

    /// Re-render with a different configuration.
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(self.config.rule_width);
        let file = if self.config.full_paths {
            self.call_site.file.as_str()
        } else {
            self.call_site.file_name()
        };

        writeln!(f, "{}", rule)?;
        writeln!(f, "TYPE VALIDATION ERROR - MULTIPLE ERRORS FOUND")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "File: {}", file)?;
        writeln!(f, "Line: {}", self.call_site.line)?;
        writeln!(f, "{}", self.context)?;
        writeln!(f, "Total errors: {}", self.total_errors)?;
        writeln!(f, "{}", rule)?;

        for (index, violation) in self.violations.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "--- ERROR {} ---", index + 1)?;
            writeln!(f, "Parameter: {}", violation.parameter_identity())?;
            writeln!(f, "Expected types: {}", violation.expected_label())?;
            writeln!(f, "Received type: {}", violation.actual_type)?;
            writeln!(f, "Received value: {}", violation.preview)?;
        }

        writeln!(f)?;
        write!(f, "{}", rule)
    }
}

impl std::error::Error for ContractViolation {}

/// Raise the aggregated report when `violations` is non-empty; no-op otherwise.
pub fn report(
    violations: Vec<Violation>,
    call_site: CallSite,
    context: impl Into<String>,
    config: &GuardConfig,
) -> Result<(), ContractViolation> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(ContractViolation {
        call_site,
        context: context.into(),
        total_errors: violations.len(),
        violations,
        config: config.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::ArgumentOrigin;
    use crate::constraints::ConstraintSource;

    fn violation(name: &str, origin: ArgumentOrigin) -> Violation {
        Violation {
            parameter: name.to_string(),
            origin,
            expected: vec!["int".into(), "float".into()],
            actual_type: "str".into(),
            preview: "str('3.5')".into(),
            source: ConstraintSource::ExplicitPositional,
        }
    }

    #[test]
    fn test_no_violations_is_noop() {
        let site = CallSite::new("src/lib.rs", 1, 1);
        assert!(report(Vec::new(), site, "Function: f()", &GuardConfig::default()).is_ok());
    }

    #[test]
    fn test_rendered_layout() {
        let site = CallSite::new("/work/app/src/main.rs", 12, 5);
        let err = report(
            vec![
                violation("y", ArgumentOrigin::Positional { position: 2 }),
                violation("z", ArgumentOrigin::Named),
            ],
            site,
            "Function: sum()",
            &GuardConfig::default(),
        )
        .unwrap_err();

        let text = err.to_string();
        let lines: Vec<&str> = text.lines().collect();
        let rule = "=".repeat(70);
        assert_eq!(lines[0], rule);
        assert_eq!(lines[1], "TYPE VALIDATION ERROR - MULTIPLE ERRORS FOUND");
        assert_eq!(lines[3], "File: /work/app/src/main.rs");
        assert_eq!(lines[4], "Line: 12");
        assert_eq!(lines[5], "Function: sum()");
        assert_eq!(lines[6], "Total errors: 2");
        assert_eq!(lines[9], "--- ERROR 1 ---");
        assert_eq!(lines[10], "Parameter: 'y' (position 2)");
        assert_eq!(lines[11], "Expected types: int | float");
        assert_eq!(lines[12], "Received type: str");
        assert_eq!(lines[13], "Received value: str('3.5')");
        assert_eq!(lines[16], "Parameter: 'z' (named argument)");
        assert_eq!(*lines.last().unwrap(), rule);
    }

    #[test]
    fn test_short_paths_and_width() {
        let site = CallSite::new("/work/app/src/main.rs", 3, 1);
        let config = GuardConfig::default()
            .with_rule_width(10)
            .with_full_paths(false);
        let err = report(
            vec![violation("a", ArgumentOrigin::Named)],
            site,
            "Function: f()",
            &config,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("==========\n"));
        assert!(text.contains("File: main.rs\n"));
    }

    #[test]
    fn test_serialized_report() {
        let site = CallSite::new("src/main.rs", 7, 2);
        let err = report(
            vec![violation("y", ArgumentOrigin::Positional { position: 2 })],
            site,
            "Function: sum()",
            &GuardConfig::default(),
        )
        .unwrap_err();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["total_errors"], 1);
        assert_eq!(json["call_site"]["line"], 7);
        assert_eq!(json["violations"][0]["origin"]["kind"], "positional");
        assert_eq!(json["violations"][0]["origin"]["position"], 2);
        assert_eq!(json["violations"][0]["source"], "explicit-positional");
        assert!(json.get("config").is_none());
    }

    #[test]
    fn test_caller_location_points_here() {
        let site = CallSite::caller();
        assert!(site.file.ends_with("report.rs"));
        assert_eq!(site.line, line!() - 2);
    }
}

//! Conformance report types: results, severity levels, and report aggregation.

use std::collections::BTreeSet;
use std::fmt;

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check identified a warning (non-blocking).
    Warning,
    /// The check failed (blocks conformance).
    Failure,
}

impl Severity {
    /// Returns the status label printed for this severity.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Short identifier of the validator that produced this result.
    pub validator: String,
    /// Human-readable message describing the outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Optional additional detail lines.
    pub details: Vec<String>,
}

impl TestResult {
    fn with(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(validator, message, Severity::Pass)
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(validator, message, Severity::Failure)
    }

    /// Creates a failure result with additional detail lines.
    pub fn fail_with_details(
        validator: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::fail(validator, message)
        }
    }

    /// Creates a warning result.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(validator, message, Severity::Warning)
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// One status line, then one indented line per detail.
impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.label(),
            self.validator,
            self.message
        )?;
        for detail in &self.details {
            write!(f, "\n       {detail}")?;
        }
        Ok(())
    }
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// All individual test results across all validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Returns the number of results with `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Validators with at least one failure, in first-failure order.
    pub fn failing_validators(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| r.validator.as_str())
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// `"<n> passed, <n> warnings, <n> failed"`.
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} warnings, {} failed",
            self.count(Severity::Pass),
            self.count(Severity::Warning),
            self.failure_count()
        )
    }
}

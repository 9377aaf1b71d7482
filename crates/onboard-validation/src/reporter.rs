//! Validation reporter

use std::fmt::Write as _;

use crate::engine::{ValidationEngine, ValidationResult, ValidationSummary};
use crate::errors::EnhancedValidationError;

/// Renders validation results as plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationReporter {
    /// Show only the prioritized subset of errors
    prioritized_only: bool,
}

impl ValidationReporter {
    /// Create a new validation reporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit error output to the prioritized subset
    #[must_use]
    pub fn prioritized_only(mut self, enabled: bool) -> Self {
        self.prioritized_only = enabled;
        self
    }

    /// Render a single step or field result
    #[must_use]
    pub fn render_result(&self, engine: &ValidationEngine, result: &ValidationResult) -> String {
        let mut out = String::new();
        let verdict = match (result.is_valid, result.can_proceed) {
            (true, _) => "valid",
            (false, true) => "has errors (can proceed)",
            (false, false) => "blocked",
        };
        let _ = writeln!(out, "Status: {verdict}");

        let errors: Vec<&EnhancedValidationError> = if self.prioritized_only {
            engine.prioritized_errors(result)
        } else {
            result.errors.iter().collect()
        };
        if result.has_errors() {
            let _ = writeln!(out, "Errors ({} of {}):", errors.len(), result.errors.len());
            for error in errors {
                write_issue(&mut out, error);
            }
        }
        if result.has_warnings() {
            let _ = writeln!(out, "Warnings ({}):", result.warnings.len());
            for warning in &result.warnings {
                write_issue(&mut out, warning);
            }
        }
        if let Some(message) = &result.success_message {
            let _ = writeln!(out, "{message}");
        }
        out
    }

    /// Render the cross-step summary
    #[must_use]
    pub fn render_summary(&self, summary: &ValidationSummary) -> String {
        let mut out = String::new();
        for (step, result) in &summary.results {
            let mark = if result.is_valid { "ok" } else { "FAIL" };
            let _ = writeln!(
                out,
                "{step:<16} {mark:<4} errors={} warnings={}",
                result.errors.len(),
                result.warnings.len()
            );
        }
        let _ = writeln!(
            out,
            "Total: {} error(s), {} warning(s); onboarding {}",
            summary.total_errors,
            summary.total_warnings,
            if summary.can_complete_onboarding {
                "can be completed"
            } else {
                "cannot be completed yet"
            }
        );
        out
    }
}

fn write_issue(out: &mut String, issue: &EnhancedValidationError) {
    let _ = writeln!(out, "  {issue}");
    if let Some(suggestion) = &issue.suggestion {
        let _ = writeln!(out, "    hint: {suggestion}");
    }
}

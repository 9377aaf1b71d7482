//! Validation error model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validation finding
///
/// Lower numeral means more severe. Findings at [`Priority::High`] or above
/// are errors; the rest are warnings. Only [`Priority::Critical`] blocks
/// progression to the next step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical = 1,
    High = 2,
    Medium = 3,
    Low = 4,
}

impl Priority {
    /// Ordinal value (1 = critical ... 4 = low)
    #[must_use]
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Whether findings of this priority land in the errors bucket
    #[must_use]
    pub fn is_error(self) -> bool {
        self <= Priority::High
    }

    /// Whether findings of this priority prevent leaving the step
    #[must_use]
    pub fn is_blocking(self) -> bool {
        self == Priority::Critical
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        };
        f.pad(label)
    }
}

/// Field and message of a failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// A failed check with priority and remediation hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedValidationError {
    pub field: String,
    pub message: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub can_auto_fix: bool,
}

impl EnhancedValidationError {
    /// Create an error without hints
    pub fn new(field: impl Into<String>, message: impl Into<String>, priority: Priority) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            priority,
            context: None,
            suggestion: None,
            can_auto_fix: false,
        }
    }

    /// Attach a remediation hint
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach free-form context
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Mark the problem as mechanically fixable
    #[must_use]
    pub fn auto_fixable(mut self) -> Self {
        self.can_auto_fix = true;
        self
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.priority.is_blocking()
    }
}

impl From<&EnhancedValidationError> for ValidationError {
    fn from(error: &EnhancedValidationError) -> Self {
        Self {
            field: error.field.clone(),
            message: error.message.clone(),
        }
    }
}

impl fmt::Display for EnhancedValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.priority, self.field, self.message)
    }
}

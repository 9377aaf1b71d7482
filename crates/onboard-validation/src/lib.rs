#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-validation
//!
//! Rule-based validation engine for the lawyer onboarding wizard.
//!
//! Each wizard step has a table of fields and ordered validators. The engine
//! runs the table against an [`EnhancedOnboardingState`], stops at the first
//! failing validator per field, and buckets findings by priority: critical and
//! high findings are errors, medium and low are warnings, and only critical
//! errors stop the user from moving on.
//!
//! ## Example Usage
//!
//! ```rust
//! use onboard_model::{EnhancedOnboardingState, OnboardingStep};
//! use onboard_validation::ValidationEngine;
//!
//! let engine = ValidationEngine::new();
//! let state = EnhancedOnboardingState::default();
//!
//! let result = engine.validate_step(OnboardingStep::PracticeInfo, &state);
//! assert!(!result.is_valid);
//! assert!(!result.can_proceed);
//! assert_eq!(engine.prioritized_errors(&result).len(), 3);
//! ```

pub mod engine;
pub mod errors;
pub mod reporter;
pub mod rules;
pub mod tables;

// Re-export main types
pub use engine::{
    DisplayLimits, ValidationConfig, ValidationEngine, ValidationResult, ValidationSummary,
};
pub use errors::{EnhancedValidationError, Priority, ValidationError};
pub use reporter::ValidationReporter;
pub use rules::{
    CustomValidator, MAX_YEARS_OF_EXPERIENCE, Validator, validate_array_max_length,
    validate_array_min_length, validate_documents_clean, validate_email, validate_max_length,
    validate_min_length, validate_non_negative_integer, validate_phone, validate_required,
    validate_specialization_entries, validate_uploads_complete,
};
pub use tables::{FieldRule, RuleSet, StepRules};

use onboard_model::{EnhancedOnboardingState, OnboardingStep};
use thiserror::Error;

/// Errors that can occur while configuring validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid rule table for step '{step}': {reason}")]
    InvalidRuleSet { step: OnboardingStep, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a rule-table error for the given step.
    pub fn invalid_rule_set(step: OnboardingStep, reason: impl Into<String>) -> Self {
        Self::InvalidRuleSet {
            step,
            reason: reason.into(),
        }
    }

    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Convenience function to validate a step with the standard rules
#[must_use]
pub fn validate_step(step: OnboardingStep, state: &EnhancedOnboardingState) -> ValidationResult {
    ValidationEngine::new().validate_step(step, state)
}

/// Convenience function to summarize a state with the standard rules
#[must_use]
pub fn validation_summary(state: &EnhancedOnboardingState) -> ValidationSummary {
    ValidationEngine::new().validation_summary(state)
}

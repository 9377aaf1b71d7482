//! Validation engine
//!
//! Runs the rule tables against an onboarding state. The engine holds only
//! immutable rules and configuration, so the same inputs always produce the
//! same result and a shared engine can be called from any thread.

use onboard_model::{EnhancedOnboardingState, ErrorMap, OnboardingStep, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

use crate::errors::{EnhancedValidationError, Priority};
use crate::tables::{FieldRule, RuleSet, StepRules};

/// How many errors [`ValidationEngine::prioritized_errors`] shows per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLimits {
    /// Shown when any critical error exists
    pub critical: usize,
    /// Shown when the worst error is high
    pub high: usize,
    /// Shown otherwise
    pub other: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            critical: 3,
            high: 2,
            other: 1,
        }
    }
}

/// Validation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub display_limits: DisplayLimits,
}

impl ValidationConfig {
    /// Parse a configuration from YAML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| crate::Error::config(e.to_string()))
    }
}

/// Outcome of validating a step or a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// No errors (warnings allowed)
    pub is_valid: bool,
    /// Critical and high findings, most severe first
    pub errors: Vec<EnhancedValidationError>,
    /// Medium and low findings, most severe first
    pub warnings: Vec<EnhancedValidationError>,
    /// No critical error; high errors do not block
    pub can_proceed: bool,
    pub has_blocking_errors: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl ValidationResult {
    /// Create a valid result with no findings
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            can_proceed: true,
            has_blocking_errors: false,
            success_message: None,
        }
    }

    /// Check if there are any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Errors for a single field
    pub fn errors_for<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a EnhancedValidationError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Field name to error messages, in the shape the onboarding store keeps.
    ///
    /// Only the errors bucket is included; warnings never reach the store.
    #[must_use]
    pub fn error_map(&self) -> ErrorMap {
        let mut map = ErrorMap::new();
        for error in &self.errors {
            map.entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        map
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Collects findings while a step is validated
#[derive(Default)]
struct ResultBuilder {
    errors: Vec<EnhancedValidationError>,
    warnings: Vec<EnhancedValidationError>,
    successes: Vec<String>,
}

impl ResultBuilder {
    fn record(&mut self, rule: &FieldRule, outcome: Option<EnhancedValidationError>) {
        match outcome {
            Some(error) if error.priority.is_error() => self.errors.push(error),
            Some(warning) => self.warnings.push(warning),
            None => {
                if let Some(message) = &rule.success_message {
                    self.successes.push(message.clone());
                }
            }
        }
    }

    fn finish(mut self) -> ValidationResult {
        // Stable sort keeps declared order within a priority
        self.errors.sort_by_key(|e| e.priority);
        self.warnings.sort_by_key(|e| e.priority);
        let has_blocking_errors = self.errors.iter().any(EnhancedValidationError::is_blocking);
        ValidationResult {
            is_valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
            can_proceed: !has_blocking_errors,
            has_blocking_errors,
            success_message: (!self.successes.is_empty()).then(|| self.successes.join(" ")),
        }
    }
}

/// Cross-step rollup of the data steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub valid_steps: Vec<OnboardingStep>,
    pub invalid_steps: Vec<OnboardingStep>,
    pub can_proceed_steps: Vec<OnboardingStep>,
    pub is_all_valid: bool,
    pub can_complete_onboarding: bool,
    pub results: BTreeMap<OnboardingStep, ValidationResult>,
}

/// Main validation engine
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    rules: RuleSet,
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine with the standard onboarding rules
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific rule tables
    #[must_use]
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules,
            config: ValidationConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate every field a step owns against the current state.
    ///
    /// Composite steps (review) validate each member step and concatenate
    /// their errors and warnings. A step without a registered table is valid.
    #[must_use]
    pub fn validate_step(
        &self,
        step: OnboardingStep,
        state: &EnhancedOnboardingState,
    ) -> ValidationResult {
        let result = match self.rules.get(step) {
            Some(StepRules::Fields(fields)) => validate_fields(fields, state),
            Some(StepRules::Composite(members)) => self.validate_composite(step, members, state),
            None => {
                warn!(step = %step, "No rule table registered, treating step as valid");
                ValidationResult::valid()
            }
        };
        debug!(
            step = %step,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            can_proceed = result.can_proceed,
            "Validated step"
        );
        result
    }

    /// Validate one field against a caller-supplied value.
    ///
    /// The value is used as given rather than read from `state`, so input can
    /// be checked before the store commits it. Fields the step does not
    /// declare are valid.
    #[must_use]
    pub fn validate_field(
        &self,
        step: OnboardingStep,
        field: &str,
        value: &Value,
        state: &EnhancedOnboardingState,
    ) -> ValidationResult {
        let Some(rule) = self.rules.field_rule(step, field) else {
            trace!(step = %step, field, "Field not declared for step");
            return ValidationResult::valid();
        };
        let mut builder = ResultBuilder::default();
        builder.record(rule, run_rule(rule, value, state));
        let result = builder.finish();
        debug!(step = %step, field, is_valid = result.is_valid, "Validated field");
        result
    }

    /// The handful of errors worth showing first.
    ///
    /// Up to `critical` critical errors if any exist, otherwise up to `high`
    /// high errors, otherwise up to `other` of whatever remains in the errors
    /// bucket. Warnings are never included.
    #[must_use]
    pub fn prioritized_errors<'a>(
        &self,
        result: &'a ValidationResult,
    ) -> Vec<&'a EnhancedValidationError> {
        let limits = self.config.display_limits;
        let of_priority = move |priority: Priority| {
            result
                .errors
                .iter()
                .filter(move |e| e.priority == priority)
        };

        if of_priority(Priority::Critical).next().is_some() {
            return of_priority(Priority::Critical).take(limits.critical).collect();
        }
        if of_priority(Priority::High).next().is_some() {
            return of_priority(Priority::High).take(limits.high).collect();
        }
        result.errors.iter().take(limits.other).collect()
    }

    /// Whether the step declares the field as required
    #[must_use]
    pub fn is_field_required(&self, step: OnboardingStep, field: &str) -> bool {
        self.rules
            .field_rule(step, field)
            .is_some_and(|rule| rule.required)
    }

    /// Names of the step's required fields, in declared order
    #[must_use]
    pub fn required_fields(&self, step: OnboardingStep) -> Vec<&str> {
        self.rules
            .fields(step)
            .iter()
            .filter(|rule| rule.required)
            .map(|rule| rule.field.as_str())
            .collect()
    }

    /// Validate each step independently
    #[must_use]
    pub fn validate_multiple_steps(
        &self,
        steps: &[OnboardingStep],
        state: &EnhancedOnboardingState,
    ) -> BTreeMap<OnboardingStep, ValidationResult> {
        steps
            .iter()
            .map(|&step| (step, self.validate_step(step, state)))
            .collect()
    }

    /// Roll up the three data steps into a single completion verdict
    #[must_use]
    pub fn validation_summary(&self, state: &EnhancedOnboardingState) -> ValidationSummary {
        let results = self.validate_multiple_steps(&OnboardingStep::DATA_STEPS, state);

        let mut summary = ValidationSummary {
            total_errors: 0,
            total_warnings: 0,
            valid_steps: Vec::new(),
            invalid_steps: Vec::new(),
            can_proceed_steps: Vec::new(),
            is_all_valid: false,
            can_complete_onboarding: false,
            results: BTreeMap::new(),
        };

        for (step, result) in &results {
            summary.total_errors += result.errors.len();
            summary.total_warnings += result.warnings.len();
            if result.is_valid {
                summary.valid_steps.push(*step);
            } else {
                summary.invalid_steps.push(*step);
            }
            if result.can_proceed {
                summary.can_proceed_steps.push(*step);
            }
        }

        summary.is_all_valid = summary.total_errors == 0;
        summary.can_complete_onboarding = summary.invalid_steps.is_empty();
        summary.results = results;
        summary
    }

    fn validate_composite(
        &self,
        step: OnboardingStep,
        members: &[OnboardingStep],
        state: &EnhancedOnboardingState,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for &member in members {
            let fields = match self.rules.get(member) {
                Some(StepRules::Fields(fields)) => fields,
                Some(StepRules::Composite(_)) => {
                    warn!(step = %step, member = %member, "Skipping nested composite step");
                    continue;
                }
                None => continue,
            };
            let result = validate_fields(fields, state);
            errors.extend(result.errors);
            warnings.extend(result.warnings);
        }

        let has_blocking_errors = errors.iter().any(EnhancedValidationError::is_blocking);
        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            can_proceed: !has_blocking_errors,
            has_blocking_errors,
            success_message: None,
        }
    }
}

fn validate_fields(fields: &[FieldRule], state: &EnhancedOnboardingState) -> ValidationResult {
    let mut builder = ResultBuilder::default();
    for rule in fields {
        let value = state.field_value(&rule.field);
        builder.record(rule, run_rule(rule, &value, state));
    }
    builder.finish()
}

/// First failure among the rule's validators, in declared order
fn run_rule(
    rule: &FieldRule,
    value: &Value,
    state: &EnhancedOnboardingState,
) -> Option<EnhancedValidationError> {
    rule.validators.iter().find_map(|validator| {
        let outcome = validator.check(&rule.field, value, state);
        trace!(
            field = %rule.field,
            validator = validator.name(),
            failed = outcome.is_some(),
            "Ran validator"
        );
        outcome
    })
}

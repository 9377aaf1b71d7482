//! Step rule tables
//!
//! Which fields each onboarding step owns, whether they are required, and the
//! ordered validators that run against them. Tables are plain data so callers
//! can list required fields without running any validation.

use onboard_model::OnboardingStep;
use std::collections::HashMap;

use crate::errors::Priority;
use crate::rules::Validator;
use crate::{Error, Result};

/// Validation configuration for one field
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field name as used in the state and the error map
    pub field: String,
    pub required: bool,
    /// Declared importance of the field; individual validators report their
    /// own priority
    pub priority: Priority,
    /// Run in order; the first failure is the field's error
    pub validators: Vec<Validator>,
    /// Shown when the field passes every validator
    pub success_message: Option<String>,
}

impl FieldRule {
    /// Create an optional field with no validators
    pub fn new(field: impl Into<String>, priority: Priority) -> Self {
        Self {
            field: field.into(),
            required: false,
            priority,
            validators: Vec::new(),
            success_message: None,
        }
    }

    /// Mark the field as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Append a validator
    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Set the success message
    #[must_use]
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }
}

/// Rules attached to a step
#[derive(Debug, Clone)]
pub enum StepRules {
    /// The step owns these fields, checked in declared order
    Fields(Vec<FieldRule>),
    /// The step owns no fields; validating it validates each listed step
    Composite(Vec<OnboardingStep>),
}

impl StepRules {
    /// An empty field table
    #[must_use]
    pub fn empty() -> Self {
        StepRules::Fields(Vec::new())
    }

    /// Own field rules; empty for composite steps
    #[must_use]
    pub fn fields(&self) -> &[FieldRule] {
        match self {
            StepRules::Fields(fields) => fields,
            StepRules::Composite(_) => &[],
        }
    }
}

/// Registry of rule tables keyed by step
#[derive(Debug, Clone)]
pub struct RuleSet {
    steps: HashMap<OnboardingStep, StepRules>,
}

impl RuleSet {
    /// Create a registry with no tables
    #[must_use]
    pub fn empty() -> Self {
        Self {
            steps: HashMap::new(),
        }
    }

    /// The lawyer onboarding tables
    #[must_use]
    pub fn standard() -> Self {
        let mut steps = HashMap::new();
        steps.insert(OnboardingStep::PracticeInfo, StepRules::Fields(practice_info_rules()));
        steps.insert(OnboardingStep::Documents, StepRules::Fields(document_rules()));
        steps.insert(
            OnboardingStep::Specializations,
            StepRules::Fields(specialization_rules()),
        );
        steps.insert(
            OnboardingStep::Review,
            StepRules::Composite(OnboardingStep::DATA_STEPS.to_vec()),
        );
        steps.insert(OnboardingStep::Submitted, StepRules::empty());
        Self { steps }
    }

    /// Register or replace the rules for a step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRuleSet`] when a field is declared twice within
    /// the step, or when a composite step lists itself or another composite
    /// step.
    pub fn insert(&mut self, step: OnboardingStep, rules: StepRules) -> Result<()> {
        match &rules {
            StepRules::Fields(fields) => {
                for (idx, rule) in fields.iter().enumerate() {
                    if fields[..idx].iter().any(|r| r.field == rule.field) {
                        return Err(Error::invalid_rule_set(
                            step,
                            format!("field '{}' declared twice", rule.field),
                        ));
                    }
                }
            }
            StepRules::Composite(members) => {
                for member in members {
                    if *member == step || matches!(self.get(*member), Some(StepRules::Composite(_))) {
                        return Err(Error::invalid_rule_set(
                            step,
                            format!("composite member '{member}' must own fields"),
                        ));
                    }
                }
            }
        }
        self.steps.insert(step, rules);
        Ok(())
    }

    /// Rules for a step, if registered
    #[must_use]
    pub fn get(&self, step: OnboardingStep) -> Option<&StepRules> {
        self.steps.get(&step)
    }

    /// Own field rules of a step; empty for composite or unregistered steps
    #[must_use]
    pub fn fields(&self, step: OnboardingStep) -> &[FieldRule] {
        match self.get(step) {
            Some(rules) => rules.fields(),
            None => &[],
        }
    }

    /// Look up a single field's rule within a step
    #[must_use]
    pub fn field_rule(&self, step: OnboardingStep, field: &str) -> Option<&FieldRule> {
        self.fields(step).iter().find(|rule| rule.field == field)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn name_rule(field: &str) -> FieldRule {
    FieldRule::new(field, Priority::Critical)
        .required()
        .validator(Validator::Required)
        .validator(Validator::MinLength(2))
        .validator(Validator::MaxLength(50))
}

fn practice_info_rules() -> Vec<FieldRule> {
    vec![
        name_rule("firstName"),
        name_rule("lastName"),
        FieldRule::new("email", Priority::Critical)
            .required()
            .validator(Validator::Required)
            .validator(Validator::Email)
            .success_message("Email address looks good."),
        FieldRule::new("phoneNumber", Priority::Critical)
            .required()
            .validator(Validator::Required)
            .validator(Validator::Phone)
            .success_message("Phone number looks good."),
        FieldRule::new("country", Priority::Critical)
            .required()
            .validator(Validator::Required),
        FieldRule::new("city", Priority::Low).validator(Validator::MaxLength(100)),
    ]
}

fn document_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("documents", Priority::Critical)
            .required()
            .validator(Validator::ArrayMinLength(1))
            .validator(Validator::UploadsComplete)
            .validator(Validator::DocumentsClean)
            .success_message("All documents uploaded successfully."),
    ]
}

fn specialization_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("specializations", Priority::Critical)
            .required()
            .validator(Validator::ArrayMinLength(1))
            .validator(Validator::ArrayMaxLength(5))
            .validator(Validator::SpecializationEntries)
            .success_message("Specializations look good."),
    ]
}

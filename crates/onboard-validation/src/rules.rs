//! Field validators
//!
//! Every validator is a pure check over a field's current [`Value`] and the
//! whole onboarding state. A check that does not apply to the value it is
//! given (a length bound on a number, a cardinality bound on a string) passes.

use onboard_model::{EnhancedOnboardingState, Value};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::errors::{EnhancedValidationError, Priority};

/// Years of experience above which an entry is flagged as implausible
pub const MAX_YEARS_OF_EXPERIENCE: f64 = 70.0;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone pattern compiles"));

type CheckFn =
    dyn Fn(&str, &Value, &EnhancedOnboardingState) -> Option<EnhancedValidationError> + Send + Sync;

/// A named, caller-supplied check
#[derive(Clone)]
pub struct CustomValidator {
    name: String,
    check: Arc<CheckFn>,
}

impl CustomValidator {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A single check in a field's validator list
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must not be falsy
    Required,
    /// Trimmed string must have at least this many characters
    MinLength(usize),
    /// Trimmed string must have at most this many characters
    MaxLength(usize),
    Email,
    Phone,
    NonNegativeInteger,
    /// List must have at least this many elements
    ArrayMinLength(usize),
    /// List must have at most this many elements
    ArrayMaxLength(usize),
    /// Every document finished uploading
    UploadsComplete,
    /// No document carries validation errors
    DocumentsClean,
    /// Each specialization row is selected and has a plausible experience value
    SpecializationEntries,
    Custom(CustomValidator),
}

impl Validator {
    /// Wrap a closure as a validator
    #[must_use]
    pub fn custom<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, &Value, &EnhancedOnboardingState) -> Option<EnhancedValidationError>
            + Send
            + Sync
            + 'static,
    {
        Validator::Custom(CustomValidator {
            name: name.into(),
            check: Arc::new(check),
        })
    }

    /// Short identifier, for logs and rule listings
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Validator::Required => "required",
            Validator::MinLength(_) => "minLength",
            Validator::MaxLength(_) => "maxLength",
            Validator::Email => "email",
            Validator::Phone => "phone",
            Validator::NonNegativeInteger => "nonNegativeInteger",
            Validator::ArrayMinLength(_) => "arrayMinLength",
            Validator::ArrayMaxLength(_) => "arrayMaxLength",
            Validator::UploadsComplete => "uploadsComplete",
            Validator::DocumentsClean => "documentsClean",
            Validator::SpecializationEntries => "specializationEntries",
            Validator::Custom(custom) => custom.name(),
        }
    }

    /// Run the check for `field`
    #[must_use]
    pub fn check(
        &self,
        field: &str,
        value: &Value,
        state: &EnhancedOnboardingState,
    ) -> Option<EnhancedValidationError> {
        match self {
            Validator::Required => validate_required(field, value),
            Validator::MinLength(min) => validate_min_length(field, value, *min),
            Validator::MaxLength(max) => validate_max_length(field, value, *max),
            Validator::Email => validate_email(field, value),
            Validator::Phone => validate_phone(field, value),
            Validator::NonNegativeInteger => validate_non_negative_integer(field, value),
            Validator::ArrayMinLength(min) => validate_array_min_length(field, value, *min),
            Validator::ArrayMaxLength(max) => validate_array_max_length(field, value, *max),
            Validator::UploadsComplete => validate_uploads_complete(field, value),
            Validator::DocumentsClean => validate_documents_clean(field, value),
            Validator::SpecializationEntries => validate_specialization_entries(field, value),
            Validator::Custom(custom) => (custom.check)(field, value, state),
        }
    }
}

/// Upper-case the first character only
fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Length in UTF-16 code units, matching what the web form counts
fn text_length(s: &str) -> usize {
    s.trim().encode_utf16().count()
}

fn plural_verb(count: usize) -> &'static str {
    if count == 1 { "is" } else { "are" }
}

#[must_use]
pub fn validate_required(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    if !value.is_falsy() {
        return None;
    }
    Some(
        EnhancedValidationError::new(
            field,
            format!("{} is required", capitalize(field)),
            Priority::Critical,
        )
        .with_suggestion(format!("Please enter your {field}")),
    )
}

#[must_use]
pub fn validate_min_length(field: &str, value: &Value, min: usize) -> Option<EnhancedValidationError> {
    let text = value.as_str()?;
    if text_length(text) >= min {
        return None;
    }
    Some(EnhancedValidationError::new(
        field,
        format!("{} must be at least {min} characters", capitalize(field)),
        Priority::High,
    ))
}

#[must_use]
pub fn validate_max_length(field: &str, value: &Value, max: usize) -> Option<EnhancedValidationError> {
    let text = value.as_str()?;
    if text_length(text) <= max {
        return None;
    }
    Some(
        EnhancedValidationError::new(
            field,
            format!("{} must be less than {max} characters", capitalize(field)),
            Priority::High,
        )
        .auto_fixable(),
    )
}

#[must_use]
pub fn validate_email(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    let text = value.as_str()?.trim();
    if text.is_empty() || EMAIL_PATTERN.is_match(text) {
        return None;
    }
    Some(
        EnhancedValidationError::new(field, "Please enter a valid email address", Priority::High)
            .with_suggestion("Use format: example@domain.com"),
    )
}

#[must_use]
pub fn validate_phone(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let compact: String = text
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();
    if PHONE_PATTERN.is_match(&compact) {
        return None;
    }
    Some(
        EnhancedValidationError::new(field, "Please enter a valid phone number", Priority::High)
            .with_suggestion("Include country code (e.g., +1234567890)"),
    )
}

#[must_use]
pub fn validate_non_negative_integer(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    let number = value.as_number()?;
    if is_whole(number) && number >= 0.0 {
        return None;
    }
    Some(EnhancedValidationError::new(
        field,
        format!("{} must be a non-negative whole number", capitalize(field)),
        Priority::High,
    ))
}

#[must_use]
pub fn validate_array_min_length(
    field: &str,
    value: &Value,
    min: usize,
) -> Option<EnhancedValidationError> {
    let len = value.array_len()?;
    if len >= min {
        return None;
    }
    let noun = field.to_lowercase();
    Some(
        EnhancedValidationError::new(
            field,
            format!("At least {min} {noun} {} required", plural_verb(min)),
            Priority::Critical,
        )
        .with_suggestion(format!("Add {} more {noun}", min - len)),
    )
}

#[must_use]
pub fn validate_array_max_length(
    field: &str,
    value: &Value,
    max: usize,
) -> Option<EnhancedValidationError> {
    let len = value.array_len()?;
    if len <= max {
        return None;
    }
    let noun = field.to_lowercase();
    Some(
        EnhancedValidationError::new(
            field,
            format!("Maximum {max} {noun} allowed"),
            Priority::High,
        )
        .with_suggestion(format!("Remove {} {noun}", len - max)),
    )
}

#[must_use]
pub fn validate_uploads_complete(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    let documents = value.as_documents()?;
    let pending: Vec<&str> = documents
        .iter()
        .filter(|d| !d.is_uploaded())
        .map(|d| d.id.as_str())
        .collect();
    if pending.is_empty() {
        return None;
    }
    Some(
        EnhancedValidationError::new(
            field,
            format!(
                "{} document(s) are still uploading or failed",
                pending.len()
            ),
            Priority::Critical,
        )
        .with_suggestion("Wait for uploads to finish or re-upload failed documents")
        .with_context(format!("documents: {}", pending.join(", "))),
    )
}

#[must_use]
pub fn validate_documents_clean(field: &str, value: &Value) -> Option<EnhancedValidationError> {
    let documents = value.as_documents()?;
    let flagged: Vec<&str> = documents
        .iter()
        .filter(|d| d.has_validation_errors())
        .map(|d| d.id.as_str())
        .collect();
    if flagged.is_empty() {
        return None;
    }
    Some(
        EnhancedValidationError::new(
            field,
            format!("{} document(s) have validation errors", flagged.len()),
            Priority::High,
        )
        .with_suggestion("Replace the flagged documents")
        .with_context(format!("documents: {}", flagged.join(", "))),
    )
}

/// Reports the first problem found, scanning entries in order
#[must_use]
pub fn validate_specialization_entries(
    field: &str,
    value: &Value,
) -> Option<EnhancedValidationError> {
    let entries = value.as_specializations()?;
    for (idx, entry) in entries.iter().enumerate() {
        let position = idx + 1;

        if entry.specialization_id.as_deref().is_none_or(str::is_empty) {
            return Some(
                EnhancedValidationError::new(
                    field,
                    format!("Specialization {position} is missing selection"),
                    Priority::High,
                )
                .with_suggestion("Select a specialization from the list"),
            );
        }

        let Some(years) = entry.years_of_experience else {
            return Some(
                EnhancedValidationError::new(
                    field,
                    format!("Years of experience required for specialization {position}"),
                    Priority::High,
                )
                .with_suggestion("Enter your years of experience"),
            );
        };

        if !is_whole(years) || years < 0.0 {
            return Some(
                EnhancedValidationError::new(
                    field,
                    format!("Invalid experience value for specialization {position}"),
                    Priority::High,
                )
                .with_suggestion("Enter a whole number of years, 0 or more"),
            );
        }

        if years > MAX_YEARS_OF_EXPERIENCE {
            return Some(
                EnhancedValidationError::new(
                    field,
                    format!("Experience seems too high for specialization {position}"),
                    Priority::Medium,
                )
                .with_suggestion("Double-check the years of experience"),
            );
        }
    }
    None
}

fn is_whole(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_model::{DocumentRecord, SpecializationEntry, UploadStatus};

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    #[test]
    fn test_patterns_compile() {
        assert!(EMAIL_PATTERN.is_match("a@b"));
        assert!(PHONE_PATTERN.is_match("12"));
    }

    #[test]
    fn test_capitalize_first_letter_only() {
        assert_eq!(capitalize("firstName"), "FirstName");
        assert_eq!(capitalize("phoneNumber"), "PhoneNumber");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_required() {
        let error = validate_required("firstName", &text("")).unwrap();
        assert_eq!(error.message, "FirstName is required");
        assert_eq!(error.suggestion.as_deref(), Some("Please enter your firstName"));
        assert_eq!(error.priority, Priority::Critical);

        assert!(validate_required("firstName", &text("   ")).is_some());
        assert!(validate_required("firstName", &Value::Null).is_some());
        assert!(validate_required("count", &Value::Integer(0)).is_some());
        assert!(validate_required("firstName", &text("Jo")).is_none());
        assert!(validate_required("documents", &Value::Documents(Vec::new())).is_none());
    }

    #[test]
    fn test_length_bounds_trim_first() {
        let error = validate_min_length("firstName", &text(" A "), 2).unwrap();
        assert_eq!(error.message, "FirstName must be at least 2 characters");
        assert_eq!(error.priority, Priority::High);
        assert!(validate_min_length("firstName", &text("Al"), 2).is_none());

        let error = validate_max_length("city", &text(&"x".repeat(101)), 100).unwrap();
        assert_eq!(error.message, "City must be less than 100 characters");
        assert!(error.can_auto_fix);
        assert!(validate_max_length("city", &text(&"x".repeat(100)), 100).is_none());
        assert!(validate_max_length("city", &text(&format!("  {}  ", "x".repeat(100))), 100).is_none());
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // One astral-plane character is two UTF-16 code units
        assert!(validate_min_length("firstName", &text("\u{1F600}"), 2).is_none());
        assert!(validate_min_length("firstName", &text("é"), 2).is_some());
    }

    #[test]
    fn test_type_mismatch_passes() {
        assert!(validate_min_length("firstName", &Value::Integer(1), 2).is_none());
        assert!(validate_email("email", &Value::Integer(1)).is_none());
        assert!(validate_array_min_length("documents", &text(""), 1).is_none());
        assert!(validate_non_negative_integer("years", &text("-1")).is_none());
        assert!(validate_uploads_complete("documents", &Value::Null).is_none());
        assert!(validate_specialization_entries("specializations", &Value::List(Vec::new())).is_none());
    }

    #[test]
    fn test_email_format() {
        for ok in [
            "john.doe@example.com",
            "a+tag@sub.example.co",
            "o'brien@law-firm.ng",
            "x@localhost",
        ] {
            assert!(validate_email("email", &text(ok)).is_none(), "{ok}");
        }
        for bad in [
            "invalid-email",
            "a@-example.com",
            "a@example-.com",
            "a@exa mple.com",
            "@example.com",
            "a@example..com",
        ] {
            let error = validate_email("email", &text(bad)).unwrap();
            assert_eq!(error.message, "Please enter a valid email address", "{bad}");
            assert_eq!(error.suggestion.as_deref(), Some("Use format: example@domain.com"));
        }
        assert!(validate_email("email", &text("  ")).is_none());
    }

    #[test]
    fn test_phone_ignores_any_whitespace() {
        for ok in ["+1\t234 567", "+1\u{a0}234\u{a0}567\u{a0}890", " +44\n20 7946 0958 "] {
            assert!(validate_phone("phoneNumber", &text(ok)).is_none(), "{ok:?}");
        }
        assert!(validate_phone("phoneNumber", &text("+1\t234x567")).is_some());
    }

    #[test]
    fn test_phone_format() {
        for ok in ["+1234567890", "+1 (234) 567-890", "12", "+123456789012345"] {
            assert!(validate_phone("phoneNumber", &text(ok)).is_none(), "{ok}");
        }
        for bad in ["+0123456789", "1", "+1234567890123456", "12345abc", "+"] {
            let error = validate_phone("phoneNumber", &text(bad)).unwrap();
            assert_eq!(error.message, "Please enter a valid phone number", "{bad}");
            assert_eq!(error.priority, Priority::High);
        }
        assert!(validate_phone("phoneNumber", &text("")).is_none());
    }

    #[test]
    fn test_non_negative_integer() {
        assert!(validate_non_negative_integer("years", &Value::Integer(0)).is_none());
        assert!(validate_non_negative_integer("years", &Value::Decimal(4.0)).is_none());
        let error = validate_non_negative_integer("years", &Value::Integer(-1)).unwrap();
        assert_eq!(error.message, "Years must be a non-negative whole number");
        assert!(validate_non_negative_integer("years", &Value::Decimal(2.5)).is_some());
    }

    #[test]
    fn test_array_bounds() {
        let error = validate_array_min_length("documents", &Value::Documents(Vec::new()), 1).unwrap();
        assert_eq!(error.message, "At least 1 documents is required");
        assert_eq!(error.suggestion.as_deref(), Some("Add 1 more documents"));
        assert_eq!(error.priority, Priority::Critical);

        let error = validate_array_min_length("Items", &Value::List(vec![Value::Null]), 3).unwrap();
        assert_eq!(error.message, "At least 3 items are required");
        assert_eq!(error.suggestion.as_deref(), Some("Add 2 more items"));

        let six = Value::Specializations(vec![SpecializationEntry::new("x", 1.0); 6]);
        let error = validate_array_max_length("specializations", &six, 5).unwrap();
        assert_eq!(error.message, "Maximum 5 specializations allowed");
        assert_eq!(error.suggestion.as_deref(), Some("Remove 1 specializations"));
        assert_eq!(error.priority, Priority::High);
    }

    #[test]
    fn test_document_checks() {
        let docs = Value::Documents(vec![
            DocumentRecord::new("d1", "license").with_status(UploadStatus::Completed),
            DocumentRecord::new("d2", "id").with_status(UploadStatus::Uploading),
            DocumentRecord::new("d3", "id").with_status(UploadStatus::Error),
        ]);
        let error = validate_uploads_complete("documents", &docs).unwrap();
        assert_eq!(error.message, "2 document(s) are still uploading or failed");
        assert_eq!(error.context.as_deref(), Some("documents: d2, d3"));
        assert_eq!(error.priority, Priority::Critical);

        let flagged = Value::Documents(vec![
            DocumentRecord::new("d1", "license")
                .with_status(UploadStatus::Completed)
                .with_validation_errors(vec!["expired".to_string()]),
        ]);
        assert!(validate_uploads_complete("documents", &flagged).is_none());
        let error = validate_documents_clean("documents", &flagged).unwrap();
        assert_eq!(error.message, "1 document(s) have validation errors");
        assert_eq!(error.priority, Priority::High);
    }

    #[test]
    fn test_specialization_entries_report_first_problem() {
        let entries = Value::Specializations(vec![
            SpecializationEntry::new("tax", 3.0),
            SpecializationEntry {
                specialization_id: Some(String::new()),
                years_of_experience: Some(2.0),
            },
            SpecializationEntry::new("family", -1.0),
        ]);
        let error = validate_specialization_entries("specializations", &entries).unwrap();
        assert_eq!(error.message, "Specialization 2 is missing selection");

        let missing_years = Value::Specializations(vec![SpecializationEntry {
            specialization_id: Some("tax".to_string()),
            years_of_experience: None,
        }]);
        let error = validate_specialization_entries("specializations", &missing_years).unwrap();
        assert_eq!(error.message, "Years of experience required for specialization 1");

        let fractional = Value::Specializations(vec![SpecializationEntry::new("tax", 1.5)]);
        let error = validate_specialization_entries("specializations", &fractional).unwrap();
        assert_eq!(error.message, "Invalid experience value for specialization 1");
        assert_eq!(error.priority, Priority::High);

        let veteran = Value::Specializations(vec![SpecializationEntry::new("tax", 71.0)]);
        let error = validate_specialization_entries("specializations", &veteran).unwrap();
        assert_eq!(error.message, "Experience seems too high for specialization 1");
        assert_eq!(error.priority, Priority::Medium);

        let boundary = Value::Specializations(vec![SpecializationEntry::new("tax", 70.0)]);
        assert!(validate_specialization_entries("specializations", &boundary).is_none());
    }

    #[test]
    fn test_custom_validator_sees_state() {
        let validator = Validator::custom("cityNeedsCountry", |field, value, state| {
            (!value.is_falsy() && state.practice_info.country.is_empty()).then(|| {
                EnhancedValidationError::new(field, "Pick a country first", Priority::Low)
            })
        });
        assert_eq!(validator.name(), "cityNeedsCountry");

        let mut state = EnhancedOnboardingState::default();
        assert!(validator.check("city", &text("Lagos"), &state).is_some());
        state.practice_info.country = "NG".to_string();
        assert!(validator.check("city", &text("Lagos"), &state).is_none());
    }
}

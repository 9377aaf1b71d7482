//! Aggregate onboarding state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::records::{DocumentRecord, PracticeInfo, SpecializationEntry};
use crate::step::{ApplicationStatus, OnboardingStep};
use crate::value::Value;

/// Field name to error messages, as recorded by the onboarding store
pub type ErrorMap = BTreeMap<String, Vec<String>>;

/// Saved copy of a step's form data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub saved_at: DateTime<Utc>,
    pub data: serde_json::Value,
}

/// Everything the wizard knows about an application in progress
///
/// Every field has a default so partially saved states deserialize and the
/// wizard can resume where the user left off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnhancedOnboardingState {
    pub current_step: OnboardingStep,
    pub completed_steps: Vec<OnboardingStep>,
    pub practice_info: PracticeInfo,
    pub documents: Vec<DocumentRecord>,
    pub specializations: Vec<SpecializationEntry>,
    pub errors: ErrorMap,
    pub application_status: ApplicationStatus,
    pub progress_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved_at: Option<DateTime<Utc>>,
    pub drafts: BTreeMap<OnboardingStep, DraftSnapshot>,
}

impl EnhancedOnboardingState {
    /// Create a fresh draft state at the first step
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: Some(now),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Current value of a field, looked up by rule-table field name.
    ///
    /// Practice fields read from `practice_info`; `documents` and
    /// `specializations` read the corresponding lists. Any other name yields
    /// [`Value::Null`].
    #[must_use]
    pub fn field_value(&self, field: &str) -> Value {
        match field {
            "firstName" | "lastName" | "email" | "phoneNumber" | "country" | "state" | "city" => {
                self.practice_info
                    .get(field)
                    .map_or(Value::Null, |s| Value::String(s.to_string()))
            }
            "documents" => Value::Documents(self.documents.clone()),
            "specializations" => Value::Specializations(self.specializations.clone()),
            _ => Value::Null,
        }
    }

    /// Whether the given step has been completed
    #[must_use]
    pub fn is_step_completed(&self, step: OnboardingStep) -> bool {
        self.completed_steps.contains(&step)
    }
}

//! Wizard steps and application status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A stage of the onboarding wizard, in the order the user walks through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    /// Name, contact and location details
    #[default]
    PracticeInfo,
    /// License and supporting document uploads
    Documents,
    /// Areas of practice with years of experience
    Specializations,
    /// Final review of everything entered so far
    Review,
    /// Application handed off; nothing left to validate
    Submitted,
}

impl OnboardingStep {
    /// Every step, in wizard order.
    pub const ALL: [OnboardingStep; 5] = [
        OnboardingStep::PracticeInfo,
        OnboardingStep::Documents,
        OnboardingStep::Specializations,
        OnboardingStep::Review,
        OnboardingStep::Submitted,
    ];

    /// Steps that own form fields.
    pub const DATA_STEPS: [OnboardingStep; 3] = [
        OnboardingStep::PracticeInfo,
        OnboardingStep::Documents,
        OnboardingStep::Specializations,
    ];

    /// Steps the user completes before submitting.
    pub const WIZARD_STEPS: [OnboardingStep; 4] = [
        OnboardingStep::PracticeInfo,
        OnboardingStep::Documents,
        OnboardingStep::Specializations,
        OnboardingStep::Review,
    ];

    /// Wire tag of the step (`practice_info`, `documents`, ...)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStep::PracticeInfo => "practice_info",
            OnboardingStep::Documents => "documents",
            OnboardingStep::Specializations => "specializations",
            OnboardingStep::Review => "review",
            OnboardingStep::Submitted => "submitted",
        }
    }

    /// The step that follows this one, if any
    #[must_use]
    pub fn next(self) -> Option<OnboardingStep> {
        match self {
            OnboardingStep::PracticeInfo => Some(OnboardingStep::Documents),
            OnboardingStep::Documents => Some(OnboardingStep::Specializations),
            OnboardingStep::Specializations => Some(OnboardingStep::Review),
            OnboardingStep::Review => Some(OnboardingStep::Submitted),
            OnboardingStep::Submitted => None,
        }
    }

    /// Whether the step is terminal
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == OnboardingStep::Submitted
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OnboardingStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OnboardingStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| Error::unknown_step(s))
    }
}

/// Lifecycle status of a lawyer's application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Created, nothing entered yet
    #[default]
    Draft,
    /// The user has started filling in the wizard
    InProgress,
    /// Handed off for review
    Submitted,
    /// Being reviewed by an admin
    UnderReview,
    /// Accepted onto the marketplace
    Approved,
    /// Declined
    Rejected,
}

impl ApplicationStatus {
    /// Whether the application has reached a final state
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Submitted | ApplicationStatus::Approved | ApplicationStatus::Rejected
        )
    }

    /// Whether the applicant may still edit the onboarding data
    #[must_use]
    pub fn is_editable(self) -> bool {
        matches!(self, ApplicationStatus::Draft | ApplicationStatus::InProgress)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        };
        f.write_str(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_tags_round_trip_through_from_str() {
        for step in OnboardingStep::ALL {
            assert_eq!(step.as_str().parse::<OnboardingStep>().unwrap(), step);
        }
        assert_eq!(
            "billing".parse::<OnboardingStep>(),
            Err(Error::unknown_step("billing"))
        );
    }

    #[test]
    fn test_step_order_follows_wizard() {
        assert!(OnboardingStep::PracticeInfo < OnboardingStep::Documents);
        assert!(OnboardingStep::Review < OnboardingStep::Submitted);
        assert_eq!(OnboardingStep::Specializations.next(), Some(OnboardingStep::Review));
        assert_eq!(OnboardingStep::Submitted.next(), None);
        assert!(OnboardingStep::Submitted.is_terminal());
    }

    #[test]
    fn test_step_serde_uses_snake_case() {
        let json = serde_json::to_string(&OnboardingStep::PracticeInfo).unwrap();
        assert_eq!(json, "\"practice_info\"");
        let step: OnboardingStep = serde_json::from_str("\"specializations\"").unwrap();
        assert_eq!(step, OnboardingStep::Specializations);
    }

    #[test]
    fn test_status_terminal_and_editable() {
        assert!(ApplicationStatus::Draft.is_editable());
        assert!(ApplicationStatus::InProgress.is_editable());
        assert!(!ApplicationStatus::UnderReview.is_editable());
        assert!(!ApplicationStatus::UnderReview.is_terminal());
        assert!(ApplicationStatus::Approved.is_terminal());
        assert_eq!(ApplicationStatus::UnderReview.to_string(), "under_review");
    }
}

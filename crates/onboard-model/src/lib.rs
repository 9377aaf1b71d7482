#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-model
//!
//! State model for the lawyer onboarding wizard.
//!
//! The types here mirror the JSON documents produced by the onboarding store:
//! the current step, practice details, uploaded documents, declared
//! specializations and the per-field error map. Validation code reads these
//! types but never mutates them.

/// Practice details, document records and specialization entries.
pub mod records;
/// Aggregate onboarding state and draft snapshots.
pub mod state;
/// Wizard steps and application status.
pub mod step;
/// Dynamic field values handed to validators.
pub mod value;

pub use records::{DocumentRecord, PracticeInfo, SpecializationEntry, UploadStatus};
pub use state::{DraftSnapshot, EnhancedOnboardingState, ErrorMap};
pub use step::{ApplicationStatus, OnboardingStep};
pub use value::Value;

use thiserror::Error;

/// Errors that can occur when working with the onboarding model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown onboarding step: '{0}'")]
    UnknownStep(String),

    #[error("Unknown practice field: '{0}'")]
    UnknownField(String),

    #[error("Unknown upload status: '{0}'")]
    UnknownUploadStatus(String),
}

impl Error {
    /// Build an unknown-step error from the rejected tag.
    pub fn unknown_step(tag: impl Into<String>) -> Self {
        Self::UnknownStep(tag.into())
    }

    /// Build an unknown-field error from the rejected field name.
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;

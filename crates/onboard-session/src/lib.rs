#![deny(warnings)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # onboard-session
//!
//! The stateful side of the onboarding wizard.
//!
//! The validation engine is pure; this crate owns everything that changes over
//! time: the onboarding state and its error map, step navigation, per-field
//! debounce timers and the auto-hiding success notice.

pub mod config;
pub mod debounce;
pub mod notice;
pub mod store;

pub use config::SessionConfig;
pub use debounce::{FieldValidation, FieldValidationScheduler};
pub use notice::SuccessNotice;
pub use store::OnboardingStore;

use onboard_model::{ApplicationStatus, OnboardingStep};
use thiserror::Error;

/// Errors that can occur while driving an onboarding session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Application is {status} and can no longer be edited")]
    Locked { status: ApplicationStatus },

    #[error("Step '{step}' has {blocking} blocking error(s)")]
    StepBlocked { step: OnboardingStep, blocking: usize },

    #[error("Step '{step}' is not reachable yet")]
    StepUnavailable { step: OnboardingStep },

    #[error("Cannot submit: {reason}")]
    SubmitRejected { reason: String },

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No specialization at position {0}")]
    SpecializationNotFound(usize),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Model(#[from] onboard_model::Error),
}

impl Error {
    /// Build a submit rejection with a reason
    pub fn submit_rejected(reason: impl Into<String>) -> Self {
        Self::SubmitRejected {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

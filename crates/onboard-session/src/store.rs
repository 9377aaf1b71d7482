//! Onboarding store
//!
//! Owns the mutable onboarding state. Every write goes through here; the
//! validation engine only ever sees read-only snapshots.

use chrono::Utc;
use onboard_model::{
    ApplicationStatus, DocumentRecord, DraftSnapshot, EnhancedOnboardingState, ErrorMap,
    OnboardingStep, SpecializationEntry, UploadStatus, Value,
};
use onboard_validation::{ValidationEngine, ValidationResult};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{Error, Result};

/// Mutable onboarding state plus the engine that validates it
#[derive(Debug, Clone)]
pub struct OnboardingStore {
    state: EnhancedOnboardingState,
    engine: Arc<ValidationEngine>,
}

impl OnboardingStore {
    /// Start a fresh application
    #[must_use]
    pub fn new(engine: Arc<ValidationEngine>) -> Self {
        Self::from_state(EnhancedOnboardingState::new(), engine)
    }

    /// Resume a previously saved application
    #[must_use]
    pub fn from_state(state: EnhancedOnboardingState, engine: Arc<ValidationEngine>) -> Self {
        Self { state, engine }
    }

    #[must_use]
    pub fn state(&self) -> &EnhancedOnboardingState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> EnhancedOnboardingState {
        self.state
    }

    /// Shareable copy of the current state, for deferred validation
    #[must_use]
    pub fn snapshot(&self) -> Arc<EnhancedOnboardingState> {
        Arc::new(self.state.clone())
    }

    #[must_use]
    pub fn current_step(&self) -> OnboardingStep {
        self.state.current_step
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorMap {
        &self.state.errors
    }

    /// Set a practice field by its camelCase name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] once the application left draft, or a model
    /// error for an unknown field.
    pub fn update_practice_info(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.state.practice_info.set(field, value)?;
        self.touch();
        Ok(())
    }

    /// Append a document record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] once the application left draft.
    pub fn add_document(&mut self, document: DocumentRecord) -> Result<()> {
        self.ensure_editable()?;
        debug!(id = %document.id, doc_type = %document.doc_type, "Adding document");
        self.state.documents.push(document);
        self.touch();
        Ok(())
    }

    /// Record an upload status change for a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] for an unknown id, or
    /// [`Error::Locked`] once the application left draft.
    pub fn set_document_status(
        &mut self,
        id: &str,
        status: UploadStatus,
        validation_errors: Option<Vec<String>>,
    ) -> Result<()> {
        self.ensure_editable()?;
        let document = self
            .state
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        document.upload_status = status;
        document.validation_errors = validation_errors;
        debug!(id, status = %status, "Document status updated");
        self.touch();
        Ok(())
    }

    /// Remove a document by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] for an unknown id, or
    /// [`Error::Locked`] once the application left draft.
    pub fn remove_document(&mut self, id: &str) -> Result<DocumentRecord> {
        self.ensure_editable()?;
        let idx = self
            .state
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::DocumentNotFound(id.to_string()))?;
        let removed = self.state.documents.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Append a specialization row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Locked`] once the application left draft.
    pub fn add_specialization(&mut self, entry: SpecializationEntry) -> Result<()> {
        self.ensure_editable()?;
        self.state.specializations.push(entry);
        self.touch();
        Ok(())
    }

    /// Replace the specialization row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpecializationNotFound`] for an out-of-range index, or
    /// [`Error::Locked`] once the application left draft.
    pub fn update_specialization(&mut self, index: usize, entry: SpecializationEntry) -> Result<()> {
        self.ensure_editable()?;
        let slot = self
            .state
            .specializations
            .get_mut(index)
            .ok_or(Error::SpecializationNotFound(index))?;
        *slot = entry;
        self.touch();
        Ok(())
    }

    /// Remove the specialization row at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpecializationNotFound`] for an out-of-range index, or
    /// [`Error::Locked`] once the application left draft.
    pub fn remove_specialization(&mut self, index: usize) -> Result<SpecializationEntry> {
        self.ensure_editable()?;
        if index >= self.state.specializations.len() {
            return Err(Error::SpecializationNotFound(index));
        }
        let removed = self.state.specializations.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Validate a step and replace the whole error map with its errors
    pub fn validate_step(&mut self, step: OnboardingStep) -> ValidationResult {
        let result = self.engine.validate_step(step, &self.state);
        self.state.errors = result.error_map();
        result
    }

    /// Validate the step the user is on
    pub fn validate_current_step(&mut self) -> ValidationResult {
        self.validate_step(self.state.current_step)
    }

    /// Validate one field of the current step against a candidate value
    pub fn validate_field(&mut self, field: &str, value: &Value) -> ValidationResult {
        let result = self
            .engine
            .validate_field(self.state.current_step, field, value, &self.state);
        self.apply_field_result(field, &result);
        result
    }

    /// Record a field-level result, replacing only that field's errors
    pub fn apply_field_result(&mut self, field: &str, result: &ValidationResult) {
        let messages: Vec<String> = result
            .errors_for(field)
            .map(|e| e.message.clone())
            .collect();
        if messages.is_empty() {
            self.state.errors.remove(field);
        } else {
            self.state.errors.insert(field.to_string(), messages);
        }
    }

    pub fn clear_field_errors(&mut self, field: &str) {
        self.state.errors.remove(field);
    }

    pub fn clear_errors(&mut self) {
        self.state.errors.clear();
    }

    /// Move to the next step if the current one has no blocking errors.
    ///
    /// From the review step this submits the application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepBlocked`] when the current step has critical
    /// errors, or [`Error::Locked`] once the application left draft.
    pub fn advance(&mut self) -> Result<OnboardingStep> {
        self.ensure_editable()?;
        let step = self.state.current_step;
        if step == OnboardingStep::Review {
            self.submit()?;
            return Ok(self.state.current_step);
        }

        let result = self.validate_step(step);
        if !result.can_proceed {
            let blocking = result.errors.iter().filter(|e| e.is_blocking()).count();
            info!(step = %step, blocking, "Step blocked");
            return Err(Error::StepBlocked { step, blocking });
        }

        let Some(next) = step.next() else {
            return Ok(step);
        };
        self.mark_completed(step);
        self.state.current_step = next;
        self.touch();
        info!(from = %step, to = %next, progress = self.state.progress_percentage, "Advanced step");
        Ok(next)
    }

    /// Jump to a step the user has already reached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StepUnavailable`] for steps past the first uncompleted
    /// one, or [`Error::Locked`] once the application left draft.
    pub fn go_to_step(&mut self, step: OnboardingStep) -> Result<()> {
        self.ensure_editable()?;
        let frontier = OnboardingStep::WIZARD_STEPS
            .into_iter()
            .find(|s| !self.state.is_step_completed(*s))
            .unwrap_or(OnboardingStep::Review);
        if step.is_terminal() || (step > frontier && !self.state.is_step_completed(step)) {
            return Err(Error::StepUnavailable { step });
        }
        self.state.current_step = step;
        self.state.errors.clear();
        debug!(step = %step, "Moved to step");
        Ok(())
    }

    /// Submit the application from the review step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubmitRejected`] when not on the review step or when
    /// any data step still has errors, or [`Error::Locked`] once the
    /// application left draft.
    pub fn submit(&mut self) -> Result<()> {
        self.ensure_editable()?;
        if self.state.current_step != OnboardingStep::Review {
            return Err(Error::submit_rejected(format!(
                "current step is '{}', not review",
                self.state.current_step
            )));
        }

        let review = self.validate_step(OnboardingStep::Review);
        let summary = self.engine.validation_summary(&self.state);
        if !summary.can_complete_onboarding {
            let steps: Vec<&str> = summary
                .invalid_steps
                .iter()
                .copied()
                .map(OnboardingStep::as_str)
                .collect();
            return Err(Error::submit_rejected(format!(
                "{} error(s) remain in {}",
                review.errors.len(),
                steps.join(", ")
            )));
        }

        self.mark_completed(OnboardingStep::Review);
        self.state.current_step = OnboardingStep::Submitted;
        self.state.application_status = ApplicationStatus::Submitted;
        self.state.progress_percentage = 100;
        self.state.updated_at = Some(Utc::now());
        info!("Application submitted");
        Ok(())
    }

    /// Snapshot the current step's form data into the drafts map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the data cannot be encoded, or
    /// [`Error::Locked`] once the application left draft.
    pub fn save_draft(&mut self) -> Result<()> {
        self.ensure_editable()?;
        let step = self.state.current_step;
        let data = match step {
            OnboardingStep::PracticeInfo => serde_json::to_value(&self.state.practice_info)?,
            OnboardingStep::Documents => serde_json::to_value(&self.state.documents)?,
            OnboardingStep::Specializations => serde_json::to_value(&self.state.specializations)?,
            OnboardingStep::Review | OnboardingStep::Submitted => serde_json::json!({
                "practiceInfo": serde_json::to_value(&self.state.practice_info)?,
                "documents": serde_json::to_value(&self.state.documents)?,
                "specializations": serde_json::to_value(&self.state.specializations)?,
            }),
        };
        let now = Utc::now();
        self.state.drafts.insert(step, DraftSnapshot { saved_at: now, data });
        self.state.last_saved_at = Some(now);
        debug!(step = %step, "Draft saved");
        Ok(())
    }

    /// Percentage of pre-submit steps completed
    #[must_use]
    pub fn progress(&self) -> u8 {
        if self.state.application_status.is_terminal() {
            return 100;
        }
        let total = OnboardingStep::WIZARD_STEPS.len();
        let done = OnboardingStep::WIZARD_STEPS
            .iter()
            .filter(|s| self.state.is_step_completed(**s))
            .count();
        u8::try_from(done * 100 / total).unwrap_or(100)
    }

    fn mark_completed(&mut self, step: OnboardingStep) {
        if !self.state.is_step_completed(step) {
            self.state.completed_steps.push(step);
            self.state.completed_steps.sort();
        }
        self.state.progress_percentage = self.progress();
    }

    fn ensure_editable(&self) -> Result<()> {
        let status = self.state.application_status;
        if status.is_editable() {
            Ok(())
        } else {
            Err(Error::Locked { status })
        }
    }

    fn touch(&mut self) {
        self.state.updated_at = Some(Utc::now());
        if self.state.application_status == ApplicationStatus::Draft {
            self.state.application_status = ApplicationStatus::InProgress;
        }
    }
}

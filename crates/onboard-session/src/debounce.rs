//! Debounced per-field validation
//!
//! Keystrokes in a non-empty field schedule a validation that fires once the
//! field has been quiet for the debounce window; each new keystroke supersedes
//! the pending one. Clearing a field validates immediately so the "required"
//! error shows without delay.

use dashmap::DashMap;
use onboard_model::{EnhancedOnboardingState, OnboardingStep, Value};
use onboard_validation::{ValidationEngine, ValidationResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::config::SessionConfig;

/// A completed debounced validation
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidation {
    pub step: OnboardingStep,
    pub field: String,
    /// The value that was validated
    pub value: Value,
    pub result: ValidationResult,
}

#[derive(Debug)]
struct PendingValidation {
    ticket: u64,
    handle: JoinHandle<()>,
}

/// Schedules field validations on the tokio runtime
///
/// Must be used from within a tokio runtime. Dropping the scheduler aborts
/// every pending validation.
#[derive(Debug)]
pub struct FieldValidationScheduler {
    engine: Arc<ValidationEngine>,
    debounce: Duration,
    pending: Arc<DashMap<String, PendingValidation>>,
    next_ticket: AtomicU64,
    results: mpsc::UnboundedSender<FieldValidation>,
}

impl FieldValidationScheduler {
    /// Create a scheduler and the receiver that debounced results arrive on
    #[must_use]
    pub fn new(
        engine: Arc<ValidationEngine>,
        config: &SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<FieldValidation>) {
        let (results, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            engine,
            debounce: config.debounce_duration(),
            pending: Arc::new(DashMap::new()),
            next_ticket: AtomicU64::new(0),
            results,
        };
        (scheduler, receiver)
    }

    /// Validate `value` for `field`, now or after the debounce window.
    ///
    /// Any validation still pending for the field is cancelled first. Blank
    /// values are validated synchronously and the result is returned; other
    /// values return `None` and their result is delivered on the channel.
    pub fn schedule(
        &self,
        step: OnboardingStep,
        field: impl Into<String>,
        value: Value,
        state: Arc<EnhancedOnboardingState>,
    ) -> Option<ValidationResult> {
        let field = field.into();
        self.cancel(&field);

        if value.is_blank() {
            trace!(step = %step, field = %field, "Validating blank field immediately");
            return Some(self.engine.validate_field(step, &field, &value, &state));
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let engine = Arc::clone(&self.engine);
        let pending = Arc::clone(&self.pending);
        let results = self.results.clone();
        let delay = self.debounce;
        let key = field.clone();

        // Held until the entry below is registered, so remove_if always sees it
        let (registered, wait_registered) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            if wait_registered.await.is_err() {
                return;
            }
            tokio::time::sleep(delay).await;
            pending.remove_if(&key, |_, p| p.ticket == ticket);

            let result = engine.validate_field(step, &key, &value, &state);
            debug!(step = %step, field = %key, is_valid = result.is_valid, "Debounced validation fired");
            let outcome = FieldValidation {
                step,
                field: key,
                value,
                result,
            };
            if results.send(outcome).is_err() {
                trace!("Validation receiver dropped; discarding result");
            }
        });

        self.pending.insert(field, PendingValidation { ticket, handle });
        // Fails only if the task was already aborted
        let _ = registered.send(());
        None
    }

    /// Cancel the pending validation for a field, if any
    pub fn cancel(&self, field: &str) -> bool {
        match self.pending.remove(field) {
            Some((_, pending)) => {
                pending.handle.abort();
                trace!(field, "Cancelled pending validation");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending validation
    pub fn cancel_all(&self) {
        self.pending.retain(|_, pending| {
            pending.handle.abort();
            false
        });
    }

    /// Whether a validation is waiting to fire for the field
    #[must_use]
    pub fn is_pending(&self, field: &str) -> bool {
        self.pending.contains_key(field)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for FieldValidationScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

//! Auto-hiding success notice

use onboard_validation::ValidationResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SessionConfig;

/// A success message that clears itself after a fixed display window
///
/// Must be used from within a tokio runtime. Dropping the notice aborts the
/// pending clear.
#[derive(Debug)]
pub struct SuccessNotice {
    message: Arc<watch::Sender<Option<String>>>,
    display: Duration,
    timer: Option<JoinHandle<()>>,
}

impl SuccessNotice {
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let (message, _) = watch::channel(None);
        Self {
            message: Arc::new(message),
            display: config.success_display_duration(),
            timer: None,
        }
    }

    /// Watch the displayed message
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }

    /// The message currently displayed
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    /// Display a message, replacing any message still on screen
    pub fn show(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.abort_timer();
        self.message.send_replace(Some(text.clone()));

        let message = Arc::clone(&self.message);
        let display = self.display;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(display).await;
            message.send_if_modified(|current| {
                if current.as_deref() == Some(text.as_str()) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        }));
    }

    /// Display the result's success message, if it has one
    pub fn show_result(&mut self, result: &ValidationResult) -> bool {
        match &result.success_message {
            Some(text) => {
                self.show(text.clone());
                true
            }
            None => false,
        }
    }

    /// Hide the message now
    pub fn dismiss(&mut self) {
        self.abort_timer();
        self.message.send_replace(None);
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for SuccessNotice {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

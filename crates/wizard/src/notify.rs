//! Operator-facing alerts.
//!
//! Remote failures are shown to the operator through a [`Notifier`]. The
//! presentation layer supplies its own; [`TracingNotifier`] only logs.

use std::sync::Mutex;

/// Receives blocking alerts meant for the operator.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Logs alerts at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(%message, "Operator alert");
    }
}

/// Keeps every alert in memory, oldest first.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

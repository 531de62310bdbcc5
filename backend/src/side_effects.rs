//! View side effects emitted after successful mutations.

use std::sync::Mutex;
use tracing::info;

/// Signals consumed by the rendering layer: marking a cached view stale
/// and transferring control to a canonical view path.
pub trait ViewNotifier: Send + Sync {
    /// Mark the cached view at `view_path` stale so the next read
    /// recomputes it. Called exactly once per successful mutation, after
    /// persistence and before any redirect.
    fn invalidate(&self, view_path: &str);

    /// Transfer control to the view at `view_path`. The calling handler
    /// performs no further work after emitting this.
    fn redirect_to(&self, view_path: &str);
}

/// Notifier that surfaces the signals in the log stream. The host
/// framework hooks real cache invalidation and navigation in behind this
/// trait; the pipeline itself only emits.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

impl ViewNotifier for LoggingNotifier {
    fn invalidate(&self, view_path: &str) {
        info!("Invalidating cached view: {}", view_path);
    }

    fn redirect_to(&self, view_path: &str) {
        info!("Redirecting to: {}", view_path);
    }
}

/// One emitted side-effect signal, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    Invalidated(String),
    Redirected(String),
}

/// Notifier that records every signal for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    signals: Mutex<Vec<ViewSignal>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All signals emitted so far, in order.
    pub fn signals(&self) -> Vec<ViewSignal> {
        self.signals.lock().expect("signal log poisoned").clone()
    }
}

impl ViewNotifier for RecordingNotifier {
    fn invalidate(&self, view_path: &str) {
        self.signals
            .lock()
            .expect("signal log poisoned")
            .push(ViewSignal::Invalidated(view_path.to_string()));
    }

    fn redirect_to(&self, view_path: &str) {
        self.signals
            .lock()
            .expect("signal log poisoned")
            .push(ViewSignal::Redirected(view_path.to_string()));
    }
}

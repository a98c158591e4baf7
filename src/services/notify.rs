use tracing::{error, info, warn};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Non-blocking notification sink
///
/// The rendering layer supplies its own implementation (a toast, typically);
/// the pipeline only ever calls through this trait and never waits on it.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Notifier that routes messages to the log
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!("{}: {}", title, message),
            Severity::Warning => warn!("{}: {}", title, message),
            Severity::Error => error!("{}: {}", title, message),
        }
    }
}

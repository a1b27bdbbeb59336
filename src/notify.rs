use tracing::{error, warn};

/// Sink for user-visible alerts. The application owning this crate decides
/// how to render them; errors are reported here and then dropped.
pub trait Notifier: Send + Sync {
    fn error(&self, summary: &str, detail: &str);
    fn warning(&self, summary: &str, detail: &str);
}

/// Notifier that forwards alerts to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, summary: &str, detail: &str) {
        error!("{} {}", summary, detail);
    }

    fn warning(&self, summary: &str, detail: &str) {
        warn!("{} {}", summary, detail);
    }
}

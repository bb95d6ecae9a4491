// Console notifier - User alerts on stderr

use tracing::warn;

use crate::ports::NotifyPort;

/// Writes alerts to stderr, where they interrupt the terminal session
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifyPort for ConsoleNotifier {
    fn alert(&self, message: &str) {
        warn!(alert = message, "User notified");
        eprintln!("{}", message);
    }
}

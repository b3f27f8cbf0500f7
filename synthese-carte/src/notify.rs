//! Notifications utilisateur (toasts)

use std::sync::Mutex;

use tracing::{error, info, warn};

/// Niveau d'une notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Info,
    Warning,
    Error,
}

/// Service de notification consommé par le contrôleur
pub trait Notifier {
    fn notify(&self, kind: NotifyKind, message: &str);
}

/// Notifieur journalisant via tracing (pas d'interface utilisateur)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Success | NotifyKind::Info => info!("{}", message),
            NotifyKind::Warning => warn!("{}", message),
            NotifyKind::Error => error!("{}", message),
        }
    }
}

/// Notifieur mémorisant les messages, pour les tests
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotifyKind, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(NotifyKind, String)> {
        self.messages.lock().expect("mutex empoisonné").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        self.messages
            .lock()
            .expect("mutex empoisonné")
            .push((kind, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NotifyKind::Warning, "attention");

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], (NotifyKind::Warning, "attention".to_string()));
    }
}

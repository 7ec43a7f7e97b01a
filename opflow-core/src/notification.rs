use opflow_types::tracing::{error, warn};
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Non-fatal messages for the user.
pub enum Notification {
    /// The replacement operator could not be created; nothing was changed.
    CannotInstantiate { operator: String, error: String },
    /// The operator was replaced, but `count` connections could not be restored.
    FailedConnectionsRestored { count: usize },
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::CannotInstantiate { operator, error } => {
                write!(f, "Cannot instantiate operator {operator}: {error}")
            }
            Notification::FailedConnectionsRestored { count } => write!(
                f,
                "The operator was replaced, but {count} connection(s) could not be restored"
            ),
        }
    }
}

pub trait Notifier: Debug {
    fn notify(&mut self, notification: Notification);
}

#[derive(Debug, Default, Clone, Copy)]
/// Writes notifications to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match &notification {
            Notification::CannotInstantiate { .. } => error!("{}", notification),
            Notification::FailedConnectionsRestored { .. } => warn!("{}", notification),
        }
    }
}

#[derive(Debug, Default, Clone)]
/// Keeps notifications for an embedding UI to pick up.
pub struct CollectingNotifier {
    notifications: Vec<Notification>,
}

impl CollectingNotifier {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

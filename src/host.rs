//! Host process integration
//!
//! The backup runs on its own worker thread, but user messaging, broadcasts
//! and console commands are only safe on the host's primary context. The
//! worker therefore never touches a [`Host`] directly: it queues closures
//! through a [`Scheduler`], and the host drains them from its own loop with
//! [`TaskQueue::run_pending`].

use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

/// Permission node that opts a user into completion notices
pub const NOTIFY_PERMISSION: &str = "backup.notify";

/// Load state of one server extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionStatus {
    pub name: String,
    pub enabled: bool,
}

impl ExtensionStatus {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// Operations that must run on the host's primary context
pub trait Host {
    /// Names of the users currently connected
    fn online_users(&self) -> Vec<String>;

    fn has_permission(&self, user: &str, node: &str) -> bool;

    fn send_message(&self, user: &str, message: &str);

    /// Send a message to every connected user
    fn broadcast(&self, message: &str);

    /// Run a console command, e.g. `save-on`
    fn dispatch_command(&self, command: &str);

    /// Whether permission checks are available at all
    fn has_permission_system(&self) -> bool;

    fn loaded_extensions(&self) -> Vec<ExtensionStatus>;
}

/// A unit of work to run on the host's primary context
pub type Task = Box<dyn FnOnce(&dyn Host) + Send + 'static>;

/// Defers work onto the host's primary context
///
/// Each scheduled task runs at most once, after every task scheduled before
/// it from the same caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: Task);
}

/// FIFO task queue drained by the host loop
pub struct TaskQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// A cloneable scheduling handle for worker threads
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            sender: self.sender.clone(),
        }
    }

    /// Run every queued task in submission order
    ///
    /// Returns the number of tasks executed.
    pub fn run_pending(&self, host: &dyn Host) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(host);
            executed += 1;
        }
        executed
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending side of a [`TaskQueue`]
#[derive(Clone)]
pub struct QueueHandle {
    sender: Sender<Task>,
}

impl Scheduler for QueueHandle {
    fn schedule(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::warn!("host task queue is closed; dropping scheduled task");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Host double that records every side effect
    #[derive(Default)]
    pub(crate) struct RecordingHost {
        pub(crate) users: Vec<(String, bool)>,
        pub(crate) permissions: bool,
        pub(crate) extensions: Vec<ExtensionStatus>,
        pub(crate) sent: Mutex<Vec<(String, String)>>,
        pub(crate) broadcasts: Mutex<Vec<String>>,
        pub(crate) commands: Mutex<Vec<String>>,
    }

    impl Host for RecordingHost {
        fn online_users(&self) -> Vec<String> {
            self.users.iter().map(|(name, _)| name.clone()).collect()
        }

        fn has_permission(&self, user: &str, node: &str) -> bool {
            node == NOTIFY_PERMISSION
                && self
                    .users
                    .iter()
                    .any(|(name, allowed)| name == user && *allowed)
        }

        fn send_message(&self, user: &str, message: &str) {
            self.sent
                .lock()
                .unwrap()
                .push((user.to_string(), message.to_string()));
        }

        fn broadcast(&self, message: &str) {
            self.broadcasts.lock().unwrap().push(message.to_string());
        }

        fn dispatch_command(&self, command: &str) {
            self.commands.lock().unwrap().push(command.to_string());
        }

        fn has_permission_system(&self) -> bool {
            self.permissions
        }

        fn loaded_extensions(&self) -> Vec<ExtensionStatus> {
            self.extensions.clone()
        }
    }
}

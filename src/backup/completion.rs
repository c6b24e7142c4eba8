//! Work handed back to the host's primary context

use crate::host::{Host, Task, NOTIFY_PERMISSION};
use crate::logging::{send_log, LogLevel};

/// Console command that turns world autosave back on
pub const AUTOSAVE_ON_COMMAND: &str = "save-on";

/// The deferred step that closes a run
///
/// Re-enables autosave when asked to, tells users the backup finished
/// (only those holding [`NOTIFY_PERMISSION`] when the host has a permission
/// system, everyone otherwise) and logs the completion message.
pub fn completion_task(enable_autosave: bool, message: String) -> Task {
    Box::new(move |host: &dyn Host| {
        if enable_autosave {
            host.dispatch_command(AUTOSAVE_ON_COMMAND);
        }

        if !message.trim().is_empty() {
            if host.has_permission_system() {
                for user in host.online_users() {
                    if host.has_permission(&user, NOTIFY_PERMISSION) {
                        host.send_message(&user, &message);
                    }
                }
            } else {
                host.broadcast(&message);
            }
        }

        send_log(LogLevel::Info, &message, false);
    })
}

/// Tell every connected user that part of the backup failed
pub fn failure_broadcast_task(message: String) -> Task {
    Box::new(move |host: &dyn Host| host.broadcast(&message))
}

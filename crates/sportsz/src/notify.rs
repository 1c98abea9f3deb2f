//! Practice reminders delivered through a notification capability.
//!
//! The capability may be missing, and the user may grant or refuse it. The
//! reminder flow asks once when the permission is still undecided.

use std::io::IsTerminal;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Title of the practice reminder.
pub const REMINDER_TITLE: &str = "SportsZ Reminder";

/// Body of the practice reminder.
pub const REMINDER_BODY: &str = "Time for your weekly practice!";

const CAPABILITY: &str = "Notifications";

/// Whether notifications may be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Not decided yet; the user will be asked.
    #[default]
    Default,
    /// Allowed.
    Granted,
    /// Refused.
    Denied,
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A platform notification capability.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether notifications exist on this platform at all.
    fn is_supported(&self) -> bool;

    /// Current permission state.
    fn permission(&self) -> Permission;

    /// Ask the user for permission and return their answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown or answered.
    async fn request_permission(&self) -> Result<Permission>;

    /// Show a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification cannot be displayed.
    async fn show(&self, title: &str, body: &str) -> Result<()>;
}

/// Send the weekly practice reminder.
///
/// Returns `true` if the reminder was shown and `false` if the user declined
/// the permission prompt just now.
///
/// # Errors
///
/// Returns [`Error::Unsupported`] when there is no notification capability and
/// [`Error::PermissionDenied`] when permission was refused earlier.
pub async fn send_practice_reminder(notifier: &dyn Notifier) -> Result<bool> {
    if !notifier.is_supported() {
        return Err(Error::unsupported(CAPABILITY));
    }

    let permission = match notifier.permission() {
        Permission::Default => {
            debug!("requesting notification permission");
            notifier.request_permission().await?
        }
        Permission::Denied => return Err(Error::permission_denied(CAPABILITY)),
        Permission::Granted => Permission::Granted,
    };

    if permission != Permission::Granted {
        info!(%permission, "practice reminder not shown");
        return Ok(false);
    }

    notifier.show(REMINDER_TITLE, REMINDER_BODY).await?;
    info!("practice reminder shown");
    Ok(true)
}

/// Notifications on the terminal: a y/N prompt for permission and a line on
/// stdout for each notification.
#[derive(Debug)]
pub struct ConsoleNotifier {
    supported: bool,
    permission: Mutex<Permission>,
}

impl ConsoleNotifier {
    /// A notifier starting at `permission`, supported when stdin is a terminal.
    #[must_use]
    pub fn new(permission: Permission) -> Self {
        Self {
            supported: std::io::stdin().is_terminal(),
            permission: Mutex::new(permission),
        }
    }

    fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = permission;
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn request_permission(&self) -> Result<Permission> {
        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"Allow SportsZ to show practice reminders? [y/N] ")
            .await?;
        stderr.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await?;

        let permission = if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            Permission::Granted
        } else {
            Permission::Denied
        };
        self.set_permission(permission);
        Ok(permission)
    }

    async fn show(&self, title: &str, body: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("🔔 {title}: {body}\n").as_bytes())
            .await?;
        stdout.flush().await?;
        Ok(())
    }
}

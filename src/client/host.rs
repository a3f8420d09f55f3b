//! The page the guard runs in.

use std::time::Duration;

/// How long a banner stays up before dismissing itself.
pub const BANNER_DISMISS_AFTER: Duration = Duration::from_secs(3);

/// A transient, auto-dismissing error notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub dismiss_after: Duration,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            dismiss_after: BANNER_DISMISS_AFTER,
        }
    }
}

/// Navigation and notification surface of a page.
pub trait PageHost: Send + Sync {
    /// Leave the current page for `path`.
    fn navigate(&self, path: &str);

    /// Show a transient banner. Never fatal to the page.
    fn show_banner(&self, banner: Banner);
}

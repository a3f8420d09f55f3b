//! Shared page header.
//!
//! The header fragment loads independently of the page script. It resolves
//! a readiness signal exactly once when loaded, and everything that touches
//! the header awaits that signal first.

use std::sync::{PoisonError, RwLock};

use tokio::sync::watch;

use super::http::DashboardApi;
use super::session::Session;

/// Where the header markup is served from.
pub const HEADER_FRAGMENT_PATH: &str = "/components/header.html";

/// Icon shown when a page sets a title without one.
pub const DEFAULT_HEADER_ICON: &str = "fas fa-chart-line";

/// Which navigation the header shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMenu {
    /// Links for visitors without a verified session.
    Public,
    /// User menu with the signed-in name and a logout action.
    User { username: String },
}

/// Snapshot of everything the header displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub menu: HeaderMenu,
    pub title: Option<String>,
    pub icon: String,
    /// Target of the back button, when one is shown.
    pub back_button: Option<String>,
    pub fragment: String,
}

impl Default for HeaderView {
    fn default() -> Self {
        Self {
            menu: HeaderMenu::Public,
            title: None,
            icon: DEFAULT_HEADER_ICON.to_string(),
            back_button: None,
            fragment: String::new(),
        }
    }
}

pub struct Header {
    view: RwLock<HeaderView>,
    ready: watch::Sender<bool>,
}

impl Header {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            view: RwLock::new(HeaderView::default()),
            ready,
        }
    }

    /// Fetch the header fragment and resolve readiness.
    ///
    /// A failed fetch leaves the fragment empty but still resolves, so pages
    /// waiting on the header are never stuck.
    pub async fn load<A: DashboardApi + ?Sized>(&self, api: &A) {
        match api.fragment(HEADER_FRAGMENT_PATH).await {
            Ok(markup) => self.update(|view| view.fragment = markup),
            Err(e) => tracing::error!(error = %e, "Error loading shared header"),
        }
        self.mark_ready();
    }

    /// Resolve readiness. Returns true only for the call that resolved it.
    pub fn mark_ready(&self) -> bool {
        self.ready.send_if_modified(|ready| !std::mem::replace(ready, true))
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait until the header has loaded.
    pub async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Show the menu matching the verified session.
    pub fn sync(&self, session: Option<&Session>) {
        let menu = match session {
            Some(session) => HeaderMenu::User {
                username: session.user.username.clone(),
            },
            None => HeaderMenu::Public,
        };
        self.update(|view| view.menu = menu);
    }

    pub fn set_title(&self, title: &str, icon: Option<&str>) {
        self.update(|view| {
            view.title = Some(title.to_string());
            view.icon = icon.unwrap_or(DEFAULT_HEADER_ICON).to_string();
        });
    }

    /// Add a back button pointing at `url` (the dashboard by default).
    ///
    /// Returns false if the header already has one.
    pub fn add_back_button(&self, url: Option<&str>) -> bool {
        let mut added = false;
        self.update(|view| {
            if view.back_button.is_none() {
                view.back_button = Some(url.unwrap_or(super::DASHBOARD_PATH).to_string());
                added = true;
            }
        });
        added
    }

    pub fn view(&self) -> HeaderView {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn menu(&self) -> HeaderMenu {
        self.view().menu
    }

    fn update(&self, apply: impl FnOnce(&mut HeaderView)) {
        let mut view = self.view.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut view);
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

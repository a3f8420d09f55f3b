//! Client-side session guard.
//!
//! Everything a page does about authentication:
//! - `SessionState`: the verified session and its persisted `authToken` /
//!   `currentUser` pair, always written and cleared together
//! - `SessionGuard`: per-page bootstrap, login, logout and authenticated
//!   dashboard fetches, plus the periodic refresh task
//! - `Header`: the shared header, with a one-shot readiness signal
//! - `AccessPolicy`: which pages are public, gated or conditional
//!
//! Browser facilities (storage, navigation, banners) sit behind the
//! `SessionStorage` and `PageHost` traits; the server sits behind
//! `DashboardApi`.

mod error;
mod guard;
mod header;
mod host;
mod http;
mod policy;
mod refresh;
mod session;
mod storage;

#[cfg(test)]
mod testing;

pub use error::{ClientError, ClientResult};
pub use guard::{AccessDecision, BootstrapOutcome, SessionGuard};
pub use header::{Header, HeaderMenu, HeaderView, DEFAULT_HEADER_ICON, HEADER_FRAGMENT_PATH};
pub use host::{Banner, PageHost, BANNER_DISMISS_AFTER};
pub use http::{DashboardApi, HttpDashboardApi};
pub use policy::{AccessPolicy, PageAccess, DASHBOARD_PATH, LOGIN_PATH};
pub use refresh::DEFAULT_REFRESH_PERIOD;
pub use session::{Session, SessionState, StoredSession};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, AUTH_TOKEN_KEY, CURRENT_USER_KEY};

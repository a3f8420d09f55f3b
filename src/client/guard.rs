//! Session guard.
//!
//! One bootstrap routine shared by every page: classify the path from local
//! state, wait for the header, verify the stored token once, render.
//!
//! The local presence check is authoritative for presence and runs to
//! completion before any request is made; the server is authoritative for
//! validity. A bootstrap issues at most one redirect.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::header::Header;
use super::host::{Banner, PageHost};
use super::http::DashboardApi;
use super::policy::{AccessPolicy, PageAccess, DASHBOARD_PATH, LOGIN_PATH};
use super::session::{Session, SessionState, StoredSession};
use super::{ClientError, ClientResult};
use crate::domain::{DashboardData, SessionUser};

/// Result of the synchronous access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render without a session; no request needed.
    Render,
    /// Already sent to the login page.
    Redirected,
    /// A stored pair exists and must be confirmed by the server.
    Verify { token: String, user: SessionUser },
}

/// How a page bootstrap ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Verified session; content and user menu rendered.
    Authenticated(Session),
    /// Rendered with public navigation.
    Public,
    /// Sent to the login page.
    Redirected,
    /// This guard already ran its bootstrap.
    AlreadyBootstrapped,
}

pub struct SessionGuard<A, H> {
    api: Arc<A>,
    host: Arc<H>,
    session: SessionState,
    header: Arc<Header>,
    policy: AccessPolicy,
    bootstrapped: AtomicBool,
}

impl<A, H> SessionGuard<A, H>
where
    A: DashboardApi,
    H: PageHost,
{
    pub fn new(api: Arc<A>, host: Arc<H>, session: SessionState, header: Arc<Header>) -> Self {
        Self {
            api,
            host,
            session,
            header,
            policy: AccessPolicy::default(),
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// Replace the default page policy.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Bootstrap a page with no page-specific initializer.
    pub async fn bootstrap(&self, path: &str) -> BootstrapOutcome {
        self.bootstrap_with(path, |_| async {}).await
    }

    /// Bootstrap a page, running `on_authenticated` once a session verifies.
    pub async fn bootstrap_with<F, Fut>(&self, path: &str, on_authenticated: F) -> BootstrapOutcome
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            tracing::debug!(path, "Page already bootstrapped");
            return BootstrapOutcome::AlreadyBootstrapped;
        }

        let access = self.policy.classify(path);
        let (token, user) = match self.check_page_access(path) {
            AccessDecision::Redirected => return BootstrapOutcome::Redirected,
            AccessDecision::Render => {
                self.header.ready().await;
                self.header.sync(self.session.read().as_ref());
                return BootstrapOutcome::Public;
            }
            AccessDecision::Verify { token, user } => (token, user),
        };

        self.header.ready().await;

        let session = if access == PageAccess::Gated {
            self.verify_session(&token, &user).await
        } else {
            self.confirm(&token, &user).await.ok()
        };

        match session {
            Some(session) => {
                on_authenticated(session.clone()).await;
                BootstrapOutcome::Authenticated(session)
            }
            None if access == PageAccess::Gated => BootstrapOutcome::Redirected,
            None => BootstrapOutcome::Public,
        }
    }

    /// Classify `path` from local state alone.
    ///
    /// A gated page without a stored token redirects here, before any
    /// request. A half-written pair is cleared and counts as absent.
    pub fn check_page_access(&self, path: &str) -> AccessDecision {
        let access = self.policy.classify(path);
        if access == PageAccess::Public {
            return AccessDecision::Render;
        }

        match self.session.stored() {
            StoredSession::Present { token, user } => AccessDecision::Verify { token, user },
            stored => {
                if stored == StoredSession::Broken {
                    tracing::warn!("Discarding incomplete stored session");
                    self.clear_session();
                }
                if access == PageAccess::Gated {
                    tracing::debug!(path, "No stored session for gated page");
                    self.redirect_to_login();
                    AccessDecision::Redirected
                } else {
                    AccessDecision::Render
                }
            }
        }
    }

    /// Confirm a stored token with the server, redirecting to login on any
    /// failure. Returns the committed session on success.
    pub async fn verify_session(&self, token: &str, stored_user: &SessionUser) -> Option<Session> {
        match self.confirm(token, stored_user).await {
            Ok(session) => Some(session),
            Err(_) => {
                self.redirect_to_login();
                None
            }
        }
    }

    /// One verification request. Any refusal from the server clears the
    /// stored pair; a transport failure leaves it for the next page load but
    /// still counts as unverified.
    async fn confirm(&self, token: &str, stored_user: &SessionUser) -> ClientResult<Session> {
        let result = match self.api.profile(token).await {
            Ok(profile) => {
                let user = profile.session_user();
                if user != *stored_user {
                    tracing::debug!(
                        stored = %stored_user.username,
                        verified = %user.username,
                        "Stored user differs from server record"
                    );
                }
                let session = Session {
                    token: token.to_string(),
                    user,
                };
                self.session.commit(session.clone()).map(|_| session)
            }
            Err(e) if e.is_server_rejection() => {
                tracing::info!(error = %e, "Stored session rejected");
                self.clear_session();
                Err(e)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error verifying token");
                Err(e)
            }
        };

        self.header.sync(self.session.read().as_ref());
        result
    }

    /// Log in and go to the dashboard. Failures are shown in a banner and
    /// the page stays put.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<SessionUser> {
        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                let message = match &e {
                    ClientError::Unauthorized(message)
                    | ClientError::Forbidden(message)
                    | ClientError::Rejected { message, .. } => message.clone(),
                    _ => "Network error. Please try again.".to_string(),
                };
                tracing::warn!(error = %e, username, "Login failed");
                self.host.show_banner(Banner::error(message));
                return Err(e);
            }
        };

        let user = response.user.clone();
        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(e) = self.session.commit(session) {
            tracing::error!(error = %e, "Failed to persist session");
            self.clear_session();
            self.host
                .show_banner(Banner::error("Could not save your session. Please try again."));
            return Err(e);
        }

        tracing::info!(username = %user.username, "Logged in");
        self.header.sync(self.session.read().as_ref());
        self.host.navigate(DASHBOARD_PATH);
        Ok(user)
    }

    /// Fetch dashboard data with the verified session's token.
    ///
    /// A rejected token logs out; other failures show a banner.
    pub async fn load_dashboard(&self) -> Option<DashboardData> {
        let Some(session) = self.session.read() else {
            tracing::debug!("No authentication found, redirecting to login");
            self.redirect_to_login();
            return None;
        };

        match self.api.dashboard(&session.token).await {
            Ok(data) => Some(data),
            Err(e) if e.is_auth_rejection() => {
                tracing::info!(error = %e, "Dashboard request rejected, logging out");
                self.logout();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error loading dashboard data");
                self.host
                    .show_banner(Banner::error("Failed to load dashboard data"));
                None
            }
        }
    }

    /// End the session and go to the login page. Idempotent.
    pub fn logout(&self) {
        self.clear_session();
        self.header.sync(None);
        self.redirect_to_login();
    }

    fn clear_session(&self) {
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
    }

    fn redirect_to_login(&self) {
        self.host.navigate(LOGIN_PATH);
    }
}

//! In-process doubles for guard tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::host::{Banner, PageHost};
use super::http::DashboardApi;
use super::{ClientError, ClientResult};
use crate::api::types::{LoginResponse, ProfileResponse};
use crate::domain::{DashboardData, Role, SessionUser};

pub const VALID_TOKEN: &str = "valid-token";

pub fn admin() -> SessionUser {
    SessionUser {
        id: 1,
        username: "admin".to_string(),
        role: Role::Admin,
    }
}

/// Server double accepting `admin`/`admin123` and [`VALID_TOKEN`].
#[derive(Default)]
pub struct FakeApi {
    offline: AtomicBool,
    revoked: AtomicBool,
    profile_calls: AtomicUsize,
    dashboard_calls: AtomicUsize,
    dashboard_latency: Mutex<Duration>,
    dashboard_in_flight: AtomicUsize,
    dashboard_peak_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Start rejecting [`VALID_TOKEN`].
    pub fn revoke_tokens(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }

    /// Make every dashboard response take `latency`.
    pub fn set_dashboard_latency(&self, latency: Duration) {
        *self.dashboard_latency.lock().unwrap() = latency;
    }

    /// Most dashboard requests ever outstanding at once.
    pub fn dashboard_peak_in_flight(&self) -> usize {
        self.dashboard_peak_in_flight.load(Ordering::SeqCst)
    }

    fn check_token(&self, token: &str) -> ClientResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if token.is_empty() {
            return Err(ClientError::Unauthorized("Access token required".to_string()));
        }
        if token != VALID_TOKEN || self.revoked.load(Ordering::SeqCst) {
            return Err(ClientError::Forbidden("Invalid or expired token".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if username != "admin" || password != "admin123" {
            return Err(ClientError::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token: VALID_TOKEN.to_string(),
            user: admin(),
        })
    }

    async fn profile(&self, token: &str) -> ClientResult<ProfileResponse> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.check_token(token)?;
        let user = admin();
        Ok(ProfileResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            last_login: chrono::Utc::now().to_rfc3339(),
        })
    }

    async fn dashboard(&self, token: &str) -> ClientResult<DashboardData> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.dashboard_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.dashboard_peak_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        let latency = *self.dashboard_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.dashboard_in_flight.fetch_sub(1, Ordering::SeqCst);

        self.check_token(token)?;
        Ok(DashboardData::sample())
    }

    async fn fragment(&self, _path: &str) -> ClientResult<String> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        Ok("<header id=\"shared-header\"></header>".to_string())
    }
}

/// Page double recording navigations and banners.
#[derive(Default)]
pub struct RecordingHost {
    navigations: Mutex<Vec<String>>,
    banners: Mutex<Vec<Banner>>,
}

impl RecordingHost {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn banners(&self) -> Vec<Banner> {
        self.banners.lock().unwrap().clone()
    }
}

impl PageHost for RecordingHost {
    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn show_banner(&self, banner: Banner) {
        self.banners.lock().unwrap().push(banner);
    }
}

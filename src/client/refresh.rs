//! Periodic dashboard refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::guard::SessionGuard;
use super::host::PageHost;
use super::http::DashboardApi;
use crate::domain::DashboardData;

/// Dashboard re-fetch period.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(30);

impl<A, H> SessionGuard<A, H>
where
    A: DashboardApi + 'static,
    H: PageHost + 'static,
{
    /// Re-fetch dashboard data every `period` while a session is present.
    ///
    /// The first fetch happens one period after the call. Each tick checks
    /// for a session before fetching and fetches are awaited in turn, so a
    /// slow response delays the next tick instead of overlapping it. The
    /// task ends when the session is cleared.
    pub fn spawn_dashboard_refresh<F>(self: &Arc<Self>, period: Duration, mut on_data: F) -> JoinHandle<()>
    where
        F: FnMut(DashboardData) + Send + 'static,
    {
        let guard = Arc::clone(self);
        let mut changes = guard.session().subscribe();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !guard.session().is_authenticated() {
                            tracing::debug!("No session, skipping dashboard refresh");
                            continue;
                        }
                        if let Some(data) = guard.load_dashboard().await {
                            on_data(data);
                        }
                    }
                    changed = changes.changed() => {
                        if changed.is_err() || !guard.session().is_authenticated() {
                            tracing::debug!("Session ended, stopping dashboard refresh");
                            break;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::client::storage::MemoryStorage;
    use crate::client::testing::{FakeApi, RecordingHost};
    use crate::client::{Header, SessionState};

    async fn logged_in_guard(api: &Arc<FakeApi>) -> Arc<SessionGuard<FakeApi, RecordingHost>> {
        let header = Arc::new(Header::new());
        header.mark_ready();
        let guard = SessionGuard::new(
            api.clone(),
            Arc::new(RecordingHost::default()),
            SessionState::new(Arc::new(MemoryStorage::new())),
            header,
        );
        guard.login("admin", "admin123").await.unwrap();
        Arc::new(guard)
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_ticks_until_logout() {
        let api = Arc::new(FakeApi::new());
        let guard = logged_in_guard(&api).await;
        let received = Arc::new(AtomicUsize::new(0));

        let handle = {
            let received = received.clone();
            guard.spawn_dashboard_refresh(DEFAULT_REFRESH_PERIOD, move |data| {
                assert_eq!(data.stats.total_users, 1250);
                received.fetch_add(1, Ordering::SeqCst);
            })
        };

        // Nothing before the first period elapses
        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(api.dashboard_calls(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(received.load(Ordering::SeqCst), 1);

        tokio::time::sleep(DEFAULT_REFRESH_PERIOD).await;
        assert_eq!(received.load(Ordering::SeqCst), 2);

        guard.logout();
        handle.await.unwrap();

        tokio::time::sleep(DEFAULT_REFRESH_PERIOD * 3).await;
        assert_eq!(api.dashboard_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_stops_when_token_revoked() {
        let api = Arc::new(FakeApi::new());
        let guard = logged_in_guard(&api).await;

        let handle = guard.spawn_dashboard_refresh(Duration::from_secs(5), |_| {});

        api.revoke_tokens();
        tokio::time::sleep(Duration::from_secs(6)).await;

        // The rejected fetch logged out, which ends the task
        handle.await.unwrap();
        assert!(!guard.session().is_authenticated());
        assert_eq!(api.dashboard_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_skips_ticks_without_session() {
        let api = Arc::new(FakeApi::new());
        let host = Arc::new(RecordingHost::default());
        let guard = Arc::new(SessionGuard::new(
            api.clone(),
            host.clone(),
            SessionState::new(Arc::new(MemoryStorage::new())),
            Arc::new(Header::new()),
        ));

        let handle = guard.spawn_dashboard_refresh(Duration::from_secs(5), |_| {});
        tokio::time::sleep(Duration::from_secs(21)).await;

        assert_eq!(api.dashboard_calls(), 0);
        assert!(host.navigations().is_empty());
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetches_never_overlap() {
        let api = Arc::new(FakeApi::new());
        let guard = logged_in_guard(&api).await;
        api.set_dashboard_latency(Duration::from_secs(12));
        let received = Arc::new(AtomicUsize::new(0));

        let handle = {
            let received = received.clone();
            guard.spawn_dashboard_refresh(Duration::from_secs(5), move |_| {
                received.fetch_add(1, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(api.dashboard_peak_in_flight(), 1);
        // Fetches start at 5s then back to back every 12s
        let calls = api.dashboard_calls();
        assert!((4..=5).contains(&calls), "calls = {calls}");
        assert!(received.load(Ordering::SeqCst) >= 3);

        guard.logout();
        handle.await.unwrap();
    }
}

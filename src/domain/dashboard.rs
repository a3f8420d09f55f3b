//! Dashboard statistics.
//!
//! The service reports fixed sample figures; the shapes are what the
//! dashboard page renders.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload of `GET /api/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent_activity: Vec<ActivityEntry>,
    pub charts: DashboardCharts,
}

/// Headline counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub revenue: u64,
    /// Growth in percent.
    pub growth: f64,
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntry {
    pub id: u64,
    pub action: String,
    /// Relative time label, e.g. "2 minutes ago".
    pub time: String,
    pub user: String,
}

/// Six-month chart series, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub monthly_revenue: Vec<u64>,
    pub user_growth: Vec<u64>,
}

impl DashboardData {
    /// Sample figures served to every authenticated user.
    pub fn sample() -> Self {
        let activity = [
            (1, "New user registered", "2 minutes ago", "john.doe"),
            (2, "Payment received", "15 minutes ago", "jane.smith"),
            (3, "Support ticket closed", "1 hour ago", "admin"),
            (4, "System backup completed", "2 hours ago", "system"),
        ];

        Self {
            stats: DashboardStats {
                total_users: 1250,
                active_users: 892,
                revenue: 45600,
                growth: 12.5,
            },
            recent_activity: activity
                .into_iter()
                .map(|(id, action, time, user)| ActivityEntry {
                    id,
                    action: action.to_string(),
                    time: time.to_string(),
                    user: user.to_string(),
                })
                .collect(),
            charts: DashboardCharts {
                monthly_revenue: vec![32000, 35000, 38000, 42000, 45000, 45600],
                user_growth: vec![1000, 1100, 1200, 1250, 1300, 1350],
            },
        }
    }
}

use serde::{Deserialize, Serialize};

/// Organic sessions and active users for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicTrafficRecord {
    /// Compact `YYYYMMDD` date as returned by the backend.
    pub date: String,
    pub sessions: u64,
    pub active_users: u64,
}

/// Organic totals for one landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicLandingPageRecord {
    /// Landing page path including its query string.
    pub landing_page: String,
    pub sessions: u64,
    pub active_users: u64,
    pub conversions: f64,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Identifier wrapper for registered sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(pub String);

/// Lifecycle status of a candidate site.
///
/// Only `Approved` sites participate in the separation constraint; the other
/// statuses are bookkeeping states that never block a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteStatus {
    Pending,
    Process,
    Approved,
    Rejected,
}

impl SiteStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SiteStatus::Pending => "Pending",
            SiteStatus::Process => "Process",
            SiteStatus::Approved => "Approved",
            SiteStatus::Rejected => "Rejected",
        }
    }
}

impl Default for SiteStatus {
    fn default() -> Self {
        SiteStatus::Pending
    }
}

/// Registry record for a franchise candidate site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: SiteId,
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub status: SiteStatus,
    pub created_at: DateTime<Utc>,
}

/// Intake payload for a new site.
///
/// Coordinates may be omitted when an address is supplied; the service then
/// asks the configured [`crate::placement::AddressResolver`] for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSubmission {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub status: SiteStatus,
}

/// Partial update for an existing site; absent fields keep their stored
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub status: Option<SiteStatus>,
}

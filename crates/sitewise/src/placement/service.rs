use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::{SiteId, SitePatch, SiteRecord, SiteSubmission};
use super::feasibility::{self, FeasibilityReport};
use super::geocode::{AddressResolver, GeocodeError};
use super::policy::decide_status;
use super::repository::{RepositoryError, SiteRepository};
use crate::geo::{Coordinate, CoordinateError};

/// Threshold applied before any setting has been stored.
pub const DEFAULT_SEPARATION_MILES: f64 = 5.0;
/// Inclusive bounds accepted for the separation setting.
pub const MIN_SEPARATION_MILES: f64 = 5.0;
pub const MAX_SEPARATION_MILES: f64 = 100.0;

static SITE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_site_id() -> SiteId {
    let id = SITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SiteId(format!("site-{id:06}"))
}

/// Service composing the registry, the feasibility engine, and the placement
/// policy. This is the single authoritative implementation of the separation
/// rule: both the read-only check path and the write path go through it.
pub struct PlacementService<R, G> {
    repository: Arc<R>,
    resolver: Arc<G>,
}

/// Result of a create or update: the persisted record, the report the
/// decision was based on, and whether an approval was overridden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementOutcome {
    pub site: SiteRecord,
    pub report: FeasibilityReport,
    pub was_auto_rejected: bool,
}

impl<R, G> PlacementService<R, G>
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    pub fn new(repository: Arc<R>, resolver: Arc<G>) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// Read-only feasibility check against the current snapshot and setting.
    pub fn check_feasibility(
        &self,
        lat: f64,
        lng: f64,
        exclude: Option<&SiteId>,
    ) -> Result<FeasibilityReport, PlacementError> {
        let candidate = Coordinate::new(lat, lng)?;
        self.evaluate(candidate, exclude)
    }

    /// Register a new site, running the placement policy before persisting.
    pub fn create_site(
        &self,
        submission: SiteSubmission,
    ) -> Result<PlacementOutcome, PlacementError> {
        let coordinate = match (submission.lat, submission.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng)?,
            _ => self.resolver.resolve(&submission.address)?,
        };

        let report = self.evaluate(coordinate, None)?;
        let decision = decide_status(submission.status, &report);

        let record = SiteRecord {
            id: next_site_id(),
            name: submission.name,
            address: submission.address,
            coordinate,
            status: decision.final_status,
            created_at: Utc::now(),
        };
        let stored = self.repository.insert(record)?;

        if decision.was_auto_rejected {
            info!(
                site = %stored.id.0,
                distance = report.distance_to_nearest_approved(),
                threshold = report.threshold_miles,
                "approval auto-rejected: candidate inside separation threshold"
            );
        }

        Ok(PlacementOutcome {
            site: stored,
            report,
            was_auto_rejected: decision.was_auto_rejected,
        })
    }

    /// Partially update a site. The placement policy re-runs only when the
    /// coordinate materially moved or the requested status changed; a
    /// touch-up of name or address keeps the stored status exactly as the
    /// user last set it.
    pub fn update_site(
        &self,
        id: &SiteId,
        patch: SitePatch,
    ) -> Result<PlacementOutcome, PlacementError> {
        let existing = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let coordinate = match (patch.lat, patch.lng) {
            (None, None) => existing.coordinate,
            (lat, lng) => Coordinate::new(
                lat.unwrap_or_else(|| existing.coordinate.lat()),
                lng.unwrap_or_else(|| existing.coordinate.lng()),
            )?,
        };
        let requested = patch.status.unwrap_or(existing.status);

        let moved = !coordinate.is_same_point(existing.coordinate);
        let status_changed = requested != existing.status;

        // The report itself is a pure read and always fresh; only the
        // status decision is gated on a material change.
        let report = self.evaluate(coordinate, Some(id))?;
        let (final_status, was_auto_rejected) = if moved || status_changed {
            let decision = decide_status(requested, &report);
            (decision.final_status, decision.was_auto_rejected)
        } else {
            (existing.status, false)
        };

        let record = SiteRecord {
            id: existing.id,
            name: patch.name.unwrap_or(existing.name),
            address: patch.address.unwrap_or(existing.address),
            coordinate,
            status: final_status,
            created_at: existing.created_at,
        };
        let stored = self.repository.update(record)?;

        Ok(PlacementOutcome {
            site: stored,
            report,
            was_auto_rejected,
        })
    }

    pub fn get_site(&self, id: &SiteId) -> Result<SiteRecord, PlacementError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list_sites(&self) -> Result<Vec<SiteRecord>, PlacementError> {
        Ok(self.repository.list()?)
    }

    pub fn delete_site(&self, id: &SiteId) -> Result<(), PlacementError> {
        if self.repository.delete(id)? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound.into())
        }
    }

    /// Current separation threshold, falling back to
    /// [`DEFAULT_SEPARATION_MILES`] when nothing has been stored.
    pub fn separation_miles(&self) -> Result<f64, PlacementError> {
        Ok(self
            .repository
            .separation_miles()?
            .unwrap_or(DEFAULT_SEPARATION_MILES))
    }

    /// Store a new separation threshold, overwriting the previous value.
    pub fn set_separation_miles(&self, miles: f64) -> Result<f64, PlacementError> {
        if !miles.is_finite() || !(MIN_SEPARATION_MILES..=MAX_SEPARATION_MILES).contains(&miles) {
            return Err(SeparationError::OutOfRange(miles).into());
        }
        Ok(self.repository.set_separation_miles(miles)?)
    }

    fn evaluate(
        &self,
        candidate: Coordinate,
        exclude: Option<&SiteId>,
    ) -> Result<FeasibilityReport, PlacementError> {
        let threshold = self.separation_miles()?;
        let sites = self.repository.list()?;
        Ok(feasibility::evaluate(
            candidate,
            &sites,
            threshold,
            exclude,
        ))
    }
}

/// Rejected separation setting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeparationError {
    #[error("separation must be between 5 and 100 miles, got {0}")]
    OutOfRange(f64),
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Separation(#[from] SeparationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

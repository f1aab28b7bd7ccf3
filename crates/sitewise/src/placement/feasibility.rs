use serde::Serialize;

use super::domain::{SiteId, SiteRecord, SiteStatus};
use crate::geo::{self, Coordinate};

/// An existing site paired with its great-circle distance from the candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestSite {
    pub site: SiteRecord,
    pub distance_miles: f64,
}

/// Outcome of a single feasibility evaluation.
///
/// Recomputed on every call; carries no identity. Feasibility is governed
/// exclusively by the distance to the nearest Approved site, while
/// `nearest_any` exists so callers can surface the closest site of any
/// status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub is_feasible: bool,
    pub threshold_miles: f64,
    /// Number of sites that survived self/exclusion filtering.
    pub considered: usize,
    pub nearest_approved: Option<NearestSite>,
    pub nearest_any: Option<NearestSite>,
}

impl FeasibilityReport {
    /// Distance to the nearest Approved site, or `+inf` when none exist.
    pub fn distance_to_nearest_approved(&self) -> f64 {
        self.nearest_approved
            .as_ref()
            .map_or(f64::INFINITY, |nearest| nearest.distance_miles)
    }

    /// Distance to the nearest site of any status, or `+inf` when none exist.
    pub fn distance_to_nearest_any(&self) -> f64 {
        self.nearest_any
            .as_ref()
            .map_or(f64::INFINITY, |nearest| nearest.distance_miles)
    }
}

/// Evaluate a candidate coordinate against a snapshot of existing sites.
///
/// Pure function of its arguments: no clock, no hidden state, and the
/// snapshot is never mutated. Sites matching `exclude` (an edit re-check of
/// that site) or sitting at the candidate's own point are dropped before any
/// distance is computed, so a site can never vacuously conflict with itself.
/// A threshold of zero or below makes every candidate feasible.
pub fn evaluate(
    candidate: Coordinate,
    sites: &[SiteRecord],
    threshold_miles: f64,
    exclude: Option<&SiteId>,
) -> FeasibilityReport {
    let mut considered = 0;
    let mut nearest_any: Option<NearestSite> = None;
    let mut nearest_approved: Option<NearestSite> = None;

    for site in sites {
        if exclude.is_some_and(|id| *id == site.id) {
            continue;
        }
        if site.coordinate.is_same_point(candidate) {
            continue;
        }
        considered += 1;

        let distance_miles = geo::distance_miles(candidate, site.coordinate);
        if nearest_any
            .as_ref()
            .map_or(true, |nearest| distance_miles < nearest.distance_miles)
        {
            nearest_any = Some(NearestSite {
                site: site.clone(),
                distance_miles,
            });
        }
        if site.status == SiteStatus::Approved
            && nearest_approved
                .as_ref()
                .map_or(true, |nearest| distance_miles < nearest.distance_miles)
        {
            nearest_approved = Some(NearestSite {
                site: site.clone(),
                distance_miles,
            });
        }
    }

    let distance_to_approved = nearest_approved
        .as_ref()
        .map_or(f64::INFINITY, |nearest| nearest.distance_miles);

    FeasibilityReport {
        is_feasible: distance_to_approved >= threshold_miles,
        threshold_miles,
        considered,
        nearest_approved,
        nearest_any,
    }
}

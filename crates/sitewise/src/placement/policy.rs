use serde::Serialize;

use super::domain::SiteStatus;
use super::feasibility::FeasibilityReport;

/// Status the registry should persist, plus whether the policy overrode the
/// caller's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementDecision {
    pub final_status: SiteStatus,
    pub was_auto_rejected: bool,
}

/// Apply the auto-rejection rule to a requested status.
///
/// Only an attempt to place a site into `Approved` can be overridden: when
/// the feasibility report says the candidate sits inside the separation
/// threshold of an Approved site, the request becomes `Rejected`. Every
/// other requested status records the user's intent unchanged, however close
/// the nearest site is.
pub fn decide_status(requested: SiteStatus, report: &FeasibilityReport) -> PlacementDecision {
    if requested == SiteStatus::Approved && !report.is_feasible {
        return PlacementDecision {
            final_status: SiteStatus::Rejected,
            was_auto_rejected: true,
        };
    }

    PlacementDecision {
        final_status: requested,
        was_auto_rejected: false,
    }
}

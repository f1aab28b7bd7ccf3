//! Site placement: registry records, feasibility evaluation, and the
//! auto-rejection policy applied when an approval would violate the
//! minimum-separation rule.

pub mod domain;
pub mod feasibility;
pub mod geocode;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{SiteId, SitePatch, SiteRecord, SiteStatus, SiteSubmission};
pub use feasibility::{evaluate, FeasibilityReport, NearestSite};
pub use geocode::{AddressResolver, GeocodeError};
pub use policy::{decide_status, PlacementDecision};
pub use repository::{RepositoryError, SiteRepository};
pub use router::placement_router;
pub use service::{
    PlacementError, PlacementOutcome, PlacementService, SeparationError, DEFAULT_SEPARATION_MILES,
    MAX_SEPARATION_MILES, MIN_SEPARATION_MILES,
};

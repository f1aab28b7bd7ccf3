use std::sync::Arc;

use super::common::*;
use crate::geo::CoordinateError;
use crate::placement::domain::{SitePatch, SiteStatus, SiteSubmission};
use crate::placement::geocode::GeocodeError;
use crate::placement::repository::RepositoryError;
use crate::placement::service::{
    PlacementError, PlacementService, SeparationError, DEFAULT_SEPARATION_MILES,
};

#[test]
fn create_persists_feasible_approved_site() {
    let service = service_with([site("existing", 41.0, -75.0, SiteStatus::Approved)]);

    let outcome = service
        .create_site(submission(40.0, -75.0, SiteStatus::Approved))
        .expect("create succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Approved);
    assert!(!outcome.was_auto_rejected);
    assert!(outcome.site.id.0.starts_with("site-"));
    assert_eq!(
        service.get_site(&outcome.site.id).expect("stored").status,
        SiteStatus::Approved
    );
}

#[test]
fn create_auto_rejects_approval_inside_threshold() {
    let service = service_with([site("existing", 40.0, -75.0, SiteStatus::Approved)]);

    let outcome = service
        .create_site(submission(40.005, -75.0, SiteStatus::Approved))
        .expect("create succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Rejected);
    assert!(outcome.was_auto_rejected);
    assert!(!outcome.report.is_feasible);
}

#[test]
fn create_keeps_pending_request_next_to_approved_site() {
    let service = service_with([site("existing", 40.0, -75.0, SiteStatus::Approved)]);

    let outcome = service
        .create_site(submission(40.005, -75.0, SiteStatus::Pending))
        .expect("create succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Pending);
    assert!(!outcome.was_auto_rejected);
}

#[test]
fn create_rejects_malformed_coordinates() {
    let service = service_with([]);

    let result = service.create_site(submission(95.0, -75.0, SiteStatus::Pending));
    assert!(matches!(
        result,
        Err(PlacementError::Coordinate(
            CoordinateError::LatitudeOutOfRange(_)
        ))
    ));
}

#[test]
fn create_geocodes_when_coordinates_missing() {
    let repository = Arc::new(MemorySites::default());
    let resolver =
        Arc::new(StaticResolver::default().with("100 Grand Avenue", coord(41.59, -93.62)));
    let service = PlacementService::new(repository, resolver);

    let outcome = service
        .create_site(SiteSubmission {
            name: "Geocoded Branch".to_string(),
            address: "100 Grand Avenue".to_string(),
            lat: None,
            lng: None,
            status: SiteStatus::Pending,
        })
        .expect("create succeeds");

    assert_eq!(outcome.site.coordinate, coord(41.59, -93.62));
}

#[test]
fn create_surfaces_unresolved_addresses() {
    let service = service_with([]);

    let result = service.create_site(SiteSubmission {
        name: "Nowhere".to_string(),
        address: "1 Unknown Road".to_string(),
        lat: None,
        lng: None,
        status: SiteStatus::Pending,
    });

    assert!(matches!(
        result,
        Err(PlacementError::Geocode(GeocodeError::Unresolved(_)))
    ));
}

#[test]
fn update_without_material_change_keeps_status() {
    let service = service_with([
        site("target", 40.005, -75.0, SiteStatus::Approved),
        site("blocker", 40.0, -75.0, SiteStatus::Approved),
    ]);

    // Renaming only: even though the blocker is now inside the threshold,
    // the stored status must not silently flip.
    let outcome = service
        .update_site(
            &crate::placement::SiteId("target".to_string()),
            SitePatch {
                name: Some("Renamed Branch".to_string()),
                ..SitePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Approved);
    assert!(!outcome.was_auto_rejected);
    assert_eq!(outcome.site.name, "Renamed Branch");
}

#[test]
fn update_with_moved_coordinates_reevaluates() {
    let service = service_with([
        site("target", 41.0, -75.0, SiteStatus::Approved),
        site("blocker", 40.0, -75.0, SiteStatus::Approved),
    ]);

    // Moving next to the blocker while Approved triggers auto-rejection.
    let outcome = service
        .update_site(
            &crate::placement::SiteId("target".to_string()),
            SitePatch {
                lat: Some(40.005),
                lng: Some(-75.0),
                ..SitePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Rejected);
    assert!(outcome.was_auto_rejected);
}

#[test]
fn update_excludes_the_edited_site_from_its_own_check() {
    let service = service_with([site("target", 40.0, -75.0, SiteStatus::Approved)]);

    // Nudge the site by more than the epsilon; the only potential conflict
    // is its own previous position, which must be excluded by id.
    let outcome = service
        .update_site(
            &crate::placement::SiteId("target".to_string()),
            SitePatch {
                lat: Some(40.0003),
                lng: Some(-75.0),
                ..SitePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Approved);
    assert!(!outcome.was_auto_rejected);
    assert_eq!(outcome.report.considered, 0);
}

#[test]
fn update_with_status_change_runs_policy() {
    let service = service_with([
        site("target", 40.005, -75.0, SiteStatus::Pending),
        site("blocker", 40.0, -75.0, SiteStatus::Approved),
    ]);

    let outcome = service
        .update_site(
            &crate::placement::SiteId("target".to_string()),
            SitePatch {
                status: Some(SiteStatus::Approved),
                ..SitePatch::default()
            },
        )
        .expect("update succeeds");

    assert_eq!(outcome.site.status, SiteStatus::Rejected);
    assert!(outcome.was_auto_rejected);
}

#[test]
fn update_unknown_site_is_not_found() {
    let service = service_with([]);

    let result = service.update_site(
        &crate::placement::SiteId("missing".to_string()),
        SitePatch::default(),
    );
    assert!(matches!(
        result,
        Err(PlacementError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn delete_removes_and_then_reports_not_found() {
    let service = service_with([site("target", 40.0, -75.0, SiteStatus::Pending)]);
    let id = crate::placement::SiteId("target".to_string());

    service.delete_site(&id).expect("delete succeeds");
    let result = service.delete_site(&id);
    assert!(matches!(
        result,
        Err(PlacementError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn separation_defaults_to_five_miles() {
    let service = service_with([]);
    assert_eq!(
        service.separation_miles().expect("setting loads"),
        DEFAULT_SEPARATION_MILES
    );
}

#[test]
fn separation_upserts_a_single_value() {
    let service = service_with([]);

    assert_eq!(service.set_separation_miles(10.0).expect("stores"), 10.0);
    assert_eq!(service.separation_miles().expect("loads"), 10.0);

    // Overwrite, never append.
    assert_eq!(service.set_separation_miles(25.0).expect("stores"), 25.0);
    assert_eq!(service.separation_miles().expect("loads"), 25.0);
}

#[test]
fn separation_outside_range_is_rejected() {
    let service = service_with([]);

    for value in [4.9, 100.1, f64::NAN, -1.0] {
        let result = service.set_separation_miles(value);
        assert!(
            matches!(
                result,
                Err(PlacementError::Separation(SeparationError::OutOfRange(_)))
            ),
            "{value} should be rejected"
        );
    }

    // Bounds are inclusive.
    assert!(service.set_separation_miles(5.0).is_ok());
    assert!(service.set_separation_miles(100.0).is_ok());
}

#[test]
fn wider_separation_setting_blocks_more_candidates() {
    let service = service_with([site("existing", 40.0, -75.0, SiteStatus::Approved)]);

    // ~69 miles away: fine at the default threshold.
    let report = service
        .check_feasibility(41.0, -75.0, None)
        .expect("check succeeds");
    assert!(report.is_feasible);

    service.set_separation_miles(100.0).expect("stores");
    let report = service
        .check_feasibility(41.0, -75.0, None)
        .expect("check succeeds");
    assert!(!report.is_feasible);
}

#[test]
fn check_feasibility_does_not_mutate_registry() {
    let service = service_with([site("existing", 40.0, -75.0, SiteStatus::Approved)]);

    let _ = service
        .check_feasibility(40.005, -75.0, None)
        .expect("check succeeds");

    let sites = service.list_sites().expect("list succeeds");
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].status, SiteStatus::Approved);
}

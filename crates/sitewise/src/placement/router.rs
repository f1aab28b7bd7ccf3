use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{SiteId, SitePatch, SiteSubmission};
use super::geocode::AddressResolver;
use super::repository::{RepositoryError, SiteRepository};
use super::service::{PlacementError, PlacementService};

/// Router builder exposing the registry CRUD, the separation setting, and
/// the read-only feasibility check.
pub fn placement_router<R, G>(service: Arc<PlacementService<R, G>>) -> Router
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    Router::new()
        .route(
            "/api/v1/sites",
            get(list_handler::<R, G>).post(create_handler::<R, G>),
        )
        .route(
            "/api/v1/sites/:site_id",
            get(get_handler::<R, G>)
                .put(update_handler::<R, G>)
                .delete(delete_handler::<R, G>),
        )
        .route(
            "/api/v1/separation",
            get(separation_handler::<R, G>).put(set_separation_handler::<R, G>),
        )
        .route("/api/v1/feasibility", post(feasibility_handler::<R, G>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeasibilityRequest {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
    #[serde(default)]
    pub(crate) exclude_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeparationRequest {
    pub(crate) miles: f64,
}

pub(crate) async fn list_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.list_sites() {
        Ok(sites) => (StatusCode::OK, axum::Json(sites)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    axum::Json(submission): axum::Json<SiteSubmission>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.create_site(submission) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    Path(site_id): Path<String>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.get_site(&SiteId(site_id)) {
        Ok(site) => (StatusCode::OK, axum::Json(site)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    Path(site_id): Path<String>,
    axum::Json(patch): axum::Json<SitePatch>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.update_site(&SiteId(site_id), patch) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    Path(site_id): Path<String>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    let id = SiteId(site_id);
    match service.delete_site(&id) {
        Ok(()) => {
            let payload = json!({ "deleted": id.0 });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn separation_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.separation_miles() {
        Ok(miles) => (StatusCode::OK, axum::Json(json!({ "miles": miles }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn set_separation_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    axum::Json(request): axum::Json<SeparationRequest>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    match service.set_separation_miles(request.miles) {
        Ok(miles) => (StatusCode::OK, axum::Json(json!({ "miles": miles }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn feasibility_handler<R, G>(
    State(service): State<Arc<PlacementService<R, G>>>,
    axum::Json(request): axum::Json<FeasibilityRequest>,
) -> Response
where
    R: SiteRepository + 'static,
    G: AddressResolver + 'static,
{
    let exclude = request.exclude_id.map(SiteId);
    match service.check_feasibility(request.lat, request.lng, exclude.as_ref()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PlacementError) -> Response {
    let status = match &error {
        PlacementError::Coordinate(_) | PlacementError::Geocode(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PlacementError::Separation(_) => StatusCode::BAD_REQUEST,
        PlacementError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PlacementError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PlacementError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::geo::Coordinate;
use crate::placement::domain::{SiteId, SiteRecord, SiteStatus, SiteSubmission};
use crate::placement::geocode::{AddressResolver, GeocodeError};
use crate::placement::repository::{RepositoryError, SiteRepository};
use crate::placement::service::PlacementService;

pub(super) fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("valid coordinate")
}

pub(super) fn site(id: &str, lat: f64, lng: f64, status: SiteStatus) -> SiteRecord {
    SiteRecord {
        id: SiteId(id.to_string()),
        name: format!("Franchise {id}"),
        address: format!("{id} Main Street"),
        coordinate: coord(lat, lng),
        status,
        created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid timestamp"),
    }
}

pub(super) fn submission(lat: f64, lng: f64, status: SiteStatus) -> SiteSubmission {
    SiteSubmission {
        name: "Downtown Branch".to_string(),
        address: "100 Grand Avenue".to_string(),
        lat: Some(lat),
        lng: Some(lng),
        status,
    }
}

/// In-memory registry double mirroring the production implementation in the
/// API crate.
#[derive(Default)]
pub(super) struct MemorySites {
    records: Mutex<HashMap<SiteId, SiteRecord>>,
    separation: Mutex<Option<f64>>,
}

impl SiteRepository for MemorySites {
    fn insert(&self, record: SiteRecord) -> Result<SiteRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SiteRecord) -> Result<SiteRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SiteId) -> Result<Option<SiteRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SiteRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut sites: Vec<SiteRecord> = guard.values().cloned().collect();
        sites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(sites)
    }

    fn delete(&self, id: &SiteId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }

    fn separation_miles(&self) -> Result<Option<f64>, RepositoryError> {
        Ok(*self.separation.lock().expect("setting mutex poisoned"))
    }

    fn set_separation_miles(&self, miles: f64) -> Result<f64, RepositoryError> {
        *self.separation.lock().expect("setting mutex poisoned") = Some(miles);
        Ok(miles)
    }
}

impl MemorySites {
    pub(super) fn seeded(sites: impl IntoIterator<Item = SiteRecord>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for site in sites {
                guard.insert(site.id.clone(), site);
            }
        }
        repository
    }
}

/// Repository double that fails every call, for surfacing 500s in routing
/// tests.
pub(super) struct UnavailableSites;

impl SiteRepository for UnavailableSites {
    fn insert(&self, _record: SiteRecord) -> Result<SiteRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn update(&self, _record: SiteRecord) -> Result<SiteRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn fetch(&self, _id: &SiteId) -> Result<Option<SiteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn list(&self) -> Result<Vec<SiteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn delete(&self, _id: &SiteId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn separation_miles(&self) -> Result<Option<f64>, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }

    fn set_separation_miles(&self, _miles: f64) -> Result<f64, RepositoryError> {
        Err(RepositoryError::Unavailable("registry offline".to_string()))
    }
}

/// Table-backed geocoder double.
#[derive(Default)]
pub(super) struct StaticResolver {
    entries: HashMap<String, Coordinate>,
}

impl StaticResolver {
    pub(super) fn with(mut self, address: &str, coordinate: Coordinate) -> Self {
        self.entries.insert(address.to_string(), coordinate);
        self
    }
}

impl AddressResolver for StaticResolver {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.entries
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::Unresolved(address.to_string()))
    }
}

pub(super) fn service_with(
    sites: impl IntoIterator<Item = SiteRecord>,
) -> PlacementService<MemorySites, StaticResolver> {
    PlacementService::new(
        Arc::new(MemorySites::seeded(sites)),
        Arc::new(StaticResolver::default()),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

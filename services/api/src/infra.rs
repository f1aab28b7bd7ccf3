use metrics_exporter_prometheus::PrometheusHandle;
use sitewise::geo::Coordinate;
use sitewise::placement::{
    AddressResolver, GeocodeError, RepositoryError, SiteId, SiteRecord, SiteRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory registry backing the service until a real database is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemorySiteRepository {
    records: Arc<Mutex<HashMap<SiteId, SiteRecord>>>,
    separation: Arc<Mutex<Option<f64>>>,
}

impl SiteRepository for InMemorySiteRepository {
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
        // Newest first, with a stable tie-break for identical timestamps.
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
        // Single logical row: overwrite under one lock acquisition, so there
        // is no check-then-insert race.
        *self.separation.lock().expect("setting mutex poisoned") = Some(miles);
        Ok(miles)
    }
}

/// Geocoder fed from a static table. Deployments with a real resolver (e.g.
/// ArcGIS) swap this out; submissions carrying coordinates never hit it.
#[derive(Default, Clone)]
pub(crate) struct StaticAddressResolver {
    entries: Arc<Mutex<HashMap<String, Coordinate>>>,
}

impl StaticAddressResolver {
    #[cfg(test)]
    pub(crate) fn insert(&self, address: &str, coordinate: Coordinate) {
        self.entries
            .lock()
            .expect("resolver mutex poisoned")
            .insert(address.to_string(), coordinate);
    }
}

impl AddressResolver for StaticAddressResolver {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.entries
            .lock()
            .expect("resolver mutex poisoned")
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::Unresolved(address.to_string()))
    }
}

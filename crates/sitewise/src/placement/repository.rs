use super::domain::{SiteId, SiteRecord};

/// Storage abstraction for the site registry and the single separation
/// setting, so the service module can be exercised in isolation.
///
/// `set_separation_miles` has upsert semantics: there is at most one logical
/// setting row, and a new value overwrites it atomically rather than
/// appending. Implementations are responsible for whatever transactional
/// discipline keeps list snapshots consistent with concurrent writes.
pub trait SiteRepository: Send + Sync {
    fn insert(&self, record: SiteRecord) -> Result<SiteRecord, RepositoryError>;
    fn update(&self, record: SiteRecord) -> Result<SiteRecord, RepositoryError>;
    fn fetch(&self, id: &SiteId) -> Result<Option<SiteRecord>, RepositoryError>;
    /// All sites, newest first.
    fn list(&self) -> Result<Vec<SiteRecord>, RepositoryError>;
    /// Returns whether a record was removed.
    fn delete(&self, id: &SiteId) -> Result<bool, RepositoryError>;
    /// `None` when no setting has ever been stored.
    fn separation_miles(&self) -> Result<Option<f64>, RepositoryError>;
    fn set_separation_miles(&self, miles: f64) -> Result<f64, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("site already exists")]
    Conflict,
    #[error("site not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

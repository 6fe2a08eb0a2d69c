use super::domain::{ResearcherId, ResearcherProfile};
use super::payload::RawBreakdown;

/// Read-only view of the persistence layer so the service can be exercised in isolation.
pub trait ActivityRepository: Send + Sync {
    fn researcher(&self, id: ResearcherId) -> Result<Option<ResearcherProfile>, RepositoryError>;
    fn researchers(&self) -> Result<Vec<ResearcherProfile>, RepositoryError>;
    /// Activity payload for one researcher; researchers without records yield an empty payload.
    fn activities(&self, id: ResearcherId) -> Result<RawBreakdown, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

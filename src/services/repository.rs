use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use crate::models::{Dog, DogWalker, Match};

/// Errors that can occur when reading or writing match data
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam between the matcher and the rest of the application
///
/// `replace_matches` must be atomic: a reader either sees the previous set or
/// the new one in full.
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// All dogs with their availability windows, in a stable order
    async fn list_dogs_with_availability(&self) -> Result<Vec<Dog>, RepositoryError>;

    /// All walkers with their availability windows, in a stable order
    async fn list_walkers_with_availability(&self) -> Result<Vec<DogWalker>, RepositoryError>;

    /// Swap the stored match set for `matches`, keeping their order
    async fn replace_matches(&self, run_id: Uuid, matches: &[Match]) -> Result<(), RepositoryError>;

    /// The last stored match set, in stored order
    async fn list_matches(&self) -> Result<Vec<Match>, RepositoryError>;

    async fn health_check(&self) -> Result<bool, RepositoryError>;
}

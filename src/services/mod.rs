// Service exports
pub mod match_store;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use match_store::{MatchRun, MatchRunError, MatchStore};
pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use repository::{MatchRepository, RepositoryError};

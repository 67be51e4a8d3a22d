use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;
use crate::core::Matcher;
use crate::models::Match;
use crate::services::repository::{MatchRepository, RepositoryError};

/// Errors that abort a match run
#[derive(Debug, Error)]
pub enum MatchRunError {
    #[error("Failed to load availability: {0}")]
    Load(#[source] RepositoryError),

    #[error("Failed to persist matches: {0}")]
    Persist(#[source] RepositoryError),
}

/// Outcome of one recompute
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub run_id: Uuid,
    pub computed_at: chrono::DateTime<chrono::Utc>,
    pub min_overlap_minutes: u32,
    pub pairs_evaluated: usize,
    pub skipped_windows: usize,
    pub matches: Vec<Match>,
}

/// Owns the persisted match set
///
/// Runs are serialized: a second `run_match` waits until the first has
/// stored its result. Reads through `current_matches` don't wait.
pub struct MatchStore {
    repository: Arc<dyn MatchRepository>,
    matcher: Matcher,
    run_lock: Mutex<()>,
}

impl MatchStore {
    pub fn new(repository: Arc<dyn MatchRepository>, matcher: Matcher) -> Self {
        Self {
            repository,
            matcher,
            run_lock: Mutex::new(()),
        }
    }

    pub fn repository(&self) -> &Arc<dyn MatchRepository> {
        &self.repository
    }

    /// Recompute all matches with the configured threshold and store them
    pub async fn run_match(&self) -> Result<MatchRun, MatchRunError> {
        self.run_with_matcher(self.matcher).await
    }

    /// Same as [`run_match`](Self::run_match) with an explicit threshold
    pub async fn run_match_with(&self, min_overlap_minutes: u32) -> Result<MatchRun, MatchRunError> {
        self.run_with_matcher(Matcher::new(min_overlap_minutes)).await
    }

    /// The last stored match set
    pub async fn current_matches(&self) -> Result<Vec<Match>, RepositoryError> {
        self.repository.list_matches().await
    }

    async fn run_with_matcher(&self, matcher: Matcher) -> Result<MatchRun, MatchRunError> {
        let _guard = self.run_lock.lock().await;

        let run_id = Uuid::new_v4();
        tracing::debug!("Starting match run {}", run_id);

        let dogs = self
            .repository
            .list_dogs_with_availability()
            .await
            .map_err(MatchRunError::Load)?;
        let walkers = self
            .repository
            .list_walkers_with_availability()
            .await
            .map_err(MatchRunError::Load)?;

        let result = matcher.find_matches(&dogs, &walkers);

        if result.skipped_windows > 0 {
            tracing::warn!(
                "Match run {} skipped {} malformed availability windows",
                run_id,
                result.skipped_windows
            );
        }

        // The full set is built before the store is touched
        if let Err(e) = self.repository.replace_matches(run_id, &result.matches).await {
            tracing::error!("Match run {} failed to persist, previous set kept: {}", run_id, e);
            return Err(MatchRunError::Persist(e));
        }

        tracing::info!(
            "Match run {} stored {} matches ({} dogs, {} walkers, threshold {} min)",
            run_id,
            result.matches.len(),
            dogs.len(),
            walkers.len(),
            matcher.min_overlap_minutes()
        );

        Ok(MatchRun {
            run_id,
            computed_at: chrono::Utc::now(),
            min_overlap_minutes: matcher.min_overlap_minutes(),
            pairs_evaluated: result.pairs_evaluated,
            skipped_windows: result.skipped_windows,
            matches: result.matches,
        })
    }
}

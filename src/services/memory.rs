use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::models::{Dog, DogWalker, Match};
use crate::services::repository::{MatchRepository, RepositoryError};

#[derive(Debug, Default)]
struct StoredMatches {
    run_id: Option<Uuid>,
    matches: Vec<Match>,
}

/// In-memory repository for fixtures, tests and local development
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    dogs: Arc<RwLock<Vec<Dog>>>,
    walkers: Arc<RwLock<Vec<DogWalker>>>,
    matches: Arc<RwLock<StoredMatches>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(dogs: Vec<Dog>, walkers: Vec<DogWalker>) -> Self {
        Self {
            dogs: Arc::new(RwLock::new(dogs)),
            walkers: Arc::new(RwLock::new(walkers)),
            matches: Arc::default(),
        }
    }

    pub async fn add_dog(&self, dog: Dog) {
        self.dogs.write().await.push(dog);
    }

    pub async fn add_walker(&self, walker: DogWalker) {
        self.walkers.write().await.push(walker);
    }

    /// Remove a dog by id; returns whether it existed
    pub async fn remove_dog(&self, id: i64) -> bool {
        let mut dogs = self.dogs.write().await;
        let before = dogs.len();
        dogs.retain(|dog| dog.id != id);
        dogs.len() != before
    }

    /// Remove a walker by id; returns whether it existed
    pub async fn remove_walker(&self, id: i64) -> bool {
        let mut walkers = self.walkers.write().await;
        let before = walkers.len();
        walkers.retain(|walker| walker.id != id);
        walkers.len() != before
    }

    /// Run id of the currently stored match set, if any run has been stored
    pub async fn stored_run_id(&self) -> Option<Uuid> {
        self.matches.read().await.run_id
    }
}

#[async_trait]
impl MatchRepository for InMemoryRepository {
    async fn list_dogs_with_availability(&self) -> Result<Vec<Dog>, RepositoryError> {
        Ok(self.dogs.read().await.clone())
    }

    async fn list_walkers_with_availability(&self) -> Result<Vec<DogWalker>, RepositoryError> {
        Ok(self.walkers.read().await.clone())
    }

    async fn replace_matches(&self, run_id: Uuid, matches: &[Match]) -> Result<(), RepositoryError> {
        // Built before taking the lock so the swap is a single assignment
        let next = StoredMatches {
            run_id: Some(run_id),
            matches: matches.to_vec(),
        };
        *self.matches.write().await = next;
        Ok(())
    }

    async fn list_matches(&self) -> Result<Vec<Match>, RepositoryError> {
        Ok(self.matches.read().await.matches.clone())
    }

    async fn health_check(&self) -> Result<bool, RepositoryError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn sample_match(dog_name: &str) -> Match {
        Match {
            dog_id: 1,
            dog_name: dog_name.to_string(),
            walker_id: 1,
            walker_name: "Ann".to_string(),
            weekday: Weekday::Mon,
            start_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_replace_discards_previous_set() {
        tokio_test::block_on(async {
            let repo = InMemoryRepository::new();
            assert!(repo.list_matches().await.unwrap().is_empty());
            assert_eq!(repo.stored_run_id().await, None);

            let first = Uuid::new_v4();
            repo.replace_matches(first, &[sample_match("Rex"), sample_match("Max")])
                .await
                .unwrap();
            assert_eq!(repo.list_matches().await.unwrap().len(), 2);

            let second = Uuid::new_v4();
            repo.replace_matches(second, &[sample_match("Fido")]).await.unwrap();
            let stored = repo.list_matches().await.unwrap();
            assert_eq!(stored, vec![sample_match("Fido")]);
            assert_eq!(repo.stored_run_id().await, Some(second));
        });
    }

    #[test]
    fn test_add_and_remove_entities() {
        tokio_test::block_on(async {
            let repo = InMemoryRepository::new();
            repo.add_dog(Dog {
                id: 7,
                name: "Rex".to_string(),
                breed: Some("Beagle".to_string()),
                owner_id: 1,
                availabilities: vec![],
            })
            .await;
            repo.add_walker(DogWalker {
                id: 3,
                name: "Ann".to_string(),
                phone: None,
                availabilities: vec![],
            })
            .await;

            assert_eq!(repo.list_dogs_with_availability().await.unwrap().len(), 1);
            assert!(repo.remove_dog(7).await);
            assert!(!repo.remove_dog(7).await);
            assert!(repo.list_dogs_with_availability().await.unwrap().is_empty());

            assert!(repo.remove_walker(3).await);
            assert!(repo.list_walkers_with_availability().await.unwrap().is_empty());
        });
    }
}

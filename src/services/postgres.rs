use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;
use crate::models::domain::{weekday_from_index, weekday_index};
use crate::models::{AvailabilityWindow, Dog, DogWalker, Match, WindowOwner};
use crate::services::repository::{MatchRepository, RepositoryError};

/// PostgreSQL-backed repository
///
/// Reads the dog, walker and availability tables populated by the CRUD side
/// of the application and owns the `matches` table.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new repository from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, RepositoryError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Availability windows of one owner kind, grouped by owner id in id order
    async fn load_windows(
        &self,
        kind: OwnerKind,
    ) -> Result<HashMap<i64, Vec<AvailabilityWindow>>, RepositoryError> {
        let query = match kind {
            OwnerKind::Dog => r#"
                SELECT id, weekday, start_time, end_time, dog_id, walker_id
                FROM availability
                WHERE dog_id IS NOT NULL
                ORDER BY id
            "#,
            OwnerKind::Walker => r#"
                SELECT id, weekday, start_time, end_time, dog_id, walker_id
                FROM availability
                WHERE walker_id IS NOT NULL
                ORDER BY id
            "#,
        };

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let mut windows = Vec::with_capacity(rows.len());
        for row in &rows {
            windows.extend(window_from_row(row)?);
        }

        Ok(group_by_owner(kind, windows))
    }
}

/// Group windows of `kind` by owner id, keeping input order in each group
fn group_by_owner(
    kind: OwnerKind,
    windows: impl IntoIterator<Item = AvailabilityWindow>,
) -> HashMap<i64, Vec<AvailabilityWindow>> {
    let mut grouped: HashMap<i64, Vec<AvailabilityWindow>> = HashMap::new();

    for window in windows {
        match (kind, window.owner) {
            (OwnerKind::Dog, WindowOwner::Dog(id)) | (OwnerKind::Walker, WindowOwner::Walker(id)) => {
                grouped.entry(id).or_default().push(window)
            }
            _ => {}
        }
    }

    grouped
}

#[derive(Debug, Clone, Copy)]
enum OwnerKind {
    Dog,
    Walker,
}

fn window_from_row(row: &PgRow) -> Result<Option<AvailabilityWindow>, RepositoryError> {
    Ok(window_from_columns(
        row.try_get("id")?,
        row.try_get("weekday")?,
        row.try_get("start_time")?,
        row.try_get("end_time")?,
        row.try_get("dog_id")?,
        row.try_get("walker_id")?,
    ))
}

/// Build a window from decoded availability columns
///
/// Rows with an out-of-range weekday, or owned by both or neither entity,
/// are skipped with a warning. Inverted bounds are kept; the matcher reports
/// and skips them.
fn window_from_columns(
    id: i64,
    weekday: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
    dog_id: Option<i64>,
    walker_id: Option<i64>,
) -> Option<AvailabilityWindow> {
    let weekday = match weekday_from_index(i64::from(weekday)) {
        Ok(weekday) => weekday,
        Err(e) => {
            tracing::warn!("Skipping availability {}: {}", id, e);
            return None;
        }
    };

    let owner = match (dog_id, walker_id) {
        (Some(dog), None) => WindowOwner::Dog(dog),
        (None, Some(walker)) => WindowOwner::Walker(walker),
        _ => {
            tracing::warn!("Skipping availability {}: must belong to exactly one dog or walker", id);
            return None;
        }
    };

    Some(AvailabilityWindow {
        id,
        weekday,
        start_time,
        end_time,
        owner,
    })
}

fn match_from_row(row: &PgRow) -> Result<Match, RepositoryError> {
    let weekday: i16 = row.try_get("weekday")?;
    let weekday = weekday_from_index(i64::from(weekday))
        .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

    Ok(Match {
        dog_id: row.try_get("dog_id")?,
        dog_name: row.try_get("dog_name")?,
        walker_id: row.try_get("walker_id")?,
        walker_name: row.try_get("walker_name")?,
        weekday,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
    })
}

#[async_trait]
impl MatchRepository for PostgresRepository {
    async fn list_dogs_with_availability(&self) -> Result<Vec<Dog>, RepositoryError> {
        let query = r#"
            SELECT id, name, breed, owner_id
            FROM dog
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let mut by_dog = self.load_windows(OwnerKind::Dog).await?;

        let dogs: Result<Vec<Dog>, RepositoryError> = rows
            .iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                Ok(Dog {
                    id,
                    name: row.try_get("name")?,
                    breed: row.try_get("breed")?,
                    owner_id: row.try_get("owner_id")?,
                    availabilities: by_dog.remove(&id).unwrap_or_default(),
                })
            })
            .collect();

        let dogs = dogs?;
        tracing::debug!("Loaded {} dogs", dogs.len());
        Ok(dogs)
    }

    async fn list_walkers_with_availability(&self) -> Result<Vec<DogWalker>, RepositoryError> {
        let query = r#"
            SELECT id, name, phone
            FROM dog_walker
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let mut by_walker = self.load_windows(OwnerKind::Walker).await?;

        let walkers: Result<Vec<DogWalker>, RepositoryError> = rows
            .iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                Ok(DogWalker {
                    id,
                    name: row.try_get("name")?,
                    phone: row.try_get("phone")?,
                    availabilities: by_walker.remove(&id).unwrap_or_default(),
                })
            })
            .collect();

        let walkers = walkers?;
        tracing::debug!("Loaded {} walkers", walkers.len());
        Ok(walkers)
    }

    /// Delete and re-insert inside one transaction
    ///
    /// Concurrent readers keep seeing the old rows until commit. Any error
    /// drops the transaction, which rolls it back.
    async fn replace_matches(&self, run_id: Uuid, matches: &[Match]) -> Result<(), RepositoryError> {
        let insert = r#"
            INSERT INTO matches
                (run_id, position, dog_id, dog_name, walker_id, walker_name, weekday, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM matches").execute(&mut *tx).await?;

        for (position, m) in matches.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| RepositoryError::InvalidData(format!("Match position {} overflows", position)))?;

            sqlx::query(insert)
                .bind(run_id)
                .bind(position)
                .bind(m.dog_id)
                .bind(&m.dog_name)
                .bind(m.walker_id)
                .bind(&m.walker_name)
                .bind(weekday_index(m.weekday))
                .bind(m.start_time)
                .bind(m.end_time)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Replaced {} stored matches with {} (run {})",
            deleted.rows_affected(),
            matches.len(),
            run_id
        );

        Ok(())
    }

    async fn list_matches(&self) -> Result<Vec<Match>, RepositoryError> {
        let query = r#"
            SELECT dog_id, dog_name, walker_id, walker_name, weekday, start_time, end_time
            FROM matches
            ORDER BY position
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(match_from_row).collect()
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, RepositoryError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

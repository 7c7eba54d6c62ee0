//! SQLite-based observation persistence
//!
//! The hourly series is stored as a JSON blob per location, replaced wholesale
//! on every refresh.

use std::sync::Arc;

use application::{error::ApplicationError, ports::ObservationStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{HourlySeries, LocationId, Observation};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

const UPSERT_SQL: &str = "INSERT INTO observations (location_id, data, updated_at)
     VALUES (?1, ?2, ?3)
     ON CONFLICT(location_id) DO UPDATE SET
        data = excluded.data,
        updated_at = excluded.updated_at";

/// SQLite-based observation store
#[derive(Debug, Clone)]
pub struct SqliteObservationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteObservationStore {
    /// Create a new SQLite observation store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ObservationStore for SqliteObservationStore {
    #[instrument(skip(self), fields(location_id = %location_id))]
    async fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Observation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let id_str = location_id.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let result = conn
                .query_row(
                    "SELECT location_id, data, updated_at
                     FROM observations WHERE location_id = ?1",
                    [&id_str],
                    row_to_observation,
                )
                .optional()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            Ok(result)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, observation), fields(location_id = %observation.location_id))]
    async fn upsert(&self, observation: &Observation) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let observation = observation.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let data = serde_json::to_string(&observation.hourly)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.execute(
                UPSERT_SQL,
                params![
                    observation.location_id.to_string(),
                    data,
                    observation.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            debug!("Stored observation");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, observations), fields(count = observations.len()))]
    async fn upsert_batch(&self, observations: &[Observation]) -> Result<(), ApplicationError> {
        if observations.is_empty() {
            return Ok(());
        }

        let pool = Arc::clone(&self.pool);
        let observations = observations.to_vec();

        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let tx = conn
                .transaction()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            {
                let mut stmt = tx
                    .prepare(UPSERT_SQL)
                    .map_err(|e| ApplicationError::Storage(e.to_string()))?;

                for observation in &observations {
                    let data = serde_json::to_string(&observation.hourly)
                        .map_err(|e| ApplicationError::Internal(e.to_string()))?;

                    stmt.execute(params![
                        observation.location_id.to_string(),
                        data,
                        observation.updated_at.to_rfc3339(),
                    ])
                    .map_err(|e| ApplicationError::Storage(e.to_string()))?;
                }
            }

            // Dropping the transaction without commit rolls everything back
            tx.commit()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            debug!(count = observations.len(), "Committed observation batch");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Convert a database row to an Observation entity
fn row_to_observation(row: &Row<'_>) -> rusqlite::Result<Observation> {
    let id_str: String = row.get(0)?;
    let data: String = row.get(1)?;
    let updated_at_str: String = row.get(2)?;

    let location_id = LocationId::parse(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let hourly: HourlySeries = serde_json::from_str(&data)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Observation {
        location_id,
        hourly,
        updated_at,
    })
}

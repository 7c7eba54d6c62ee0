//! SQLite-based location persistence

use std::sync::Arc;

use application::{error::ApplicationError, ports::LocationStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{GeoLocation, Location, LocationId, LocationName};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// SQLite-based location store
#[derive(Debug, Clone)]
pub struct SqliteLocationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteLocationStore {
    /// Create a new SQLite location store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for SqliteLocationStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Location>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let mut stmt = conn
                .prepare(
                    "SELECT id, name, latitude, longitude, created_at
                     FROM locations ORDER BY name",
                )
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let locations: Vec<Location> = stmt
                .query_map([], row_to_location)
                .map_err(|e| ApplicationError::Storage(e.to_string()))?
                .filter_map(Result::ok)
                .collect();

            debug!(count = locations.len(), "Listed locations");
            Ok(locations)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn find_by_name(
        &self,
        name: &LocationName,
    ) -> Result<Option<Location>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let name_str = name.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let result = conn
                .query_row(
                    "SELECT id, name, latitude, longitude, created_at
                     FROM locations WHERE name = ?1",
                    [name_str.as_str()],
                    row_to_location,
                )
                .optional()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            Ok(result)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self, location), fields(location_id = %location.id, name = %location.name))]
    async fn insert(&self, location: &Location) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let location = location.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            conn.execute(
                "INSERT INTO locations (id, name, latitude, longitude, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    location.id.to_string(),
                    location.name.as_str(),
                    location.coordinates.latitude(),
                    location.coordinates.longitude(),
                    location.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(f, _)
                    if f.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    ApplicationError::AlreadyExists(format!(
                        "Location {} is already registered",
                        location.name
                    ))
                }
                other => ApplicationError::Storage(other.to_string()),
            })?;

            debug!("Inserted location");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(name = %name))]
    async fn delete_by_name(&self, name: &LocationName) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let name_str = name.as_str().to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let affected = conn
                .execute(
                    "DELETE FROM locations WHERE name = ?1",
                    [name_str.as_str()],
                )
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            if affected == 0 {
                return Err(ApplicationError::NotFound(format!(
                    "Location {name_str} not found"
                )));
            }

            debug!("Deleted location");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Convert a database row to a Location entity
///
/// Stored values were validated on write; a failure here means the row was
/// edited out of band.
fn row_to_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    let id_str: String = row.get(0)?;
    let name_str: String = row.get(1)?;
    let latitude: f64 = row.get(2)?;
    let longitude: f64 = row.get(3)?;
    let created_at_str: String = row.get(4)?;

    let id = LocationId::parse(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let name = LocationName::new(&name_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let coordinates = GeoLocation::new(latitude, longitude)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Real, Box::new(e)))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Location {
        id,
        name,
        coordinates,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, persistence::connection::create_pool};

    fn create_test_store() -> SqliteLocationStore {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        };
        let pool = create_pool(&config).unwrap();
        SqliteLocationStore::new(Arc::new(pool))
    }

    fn location(name: &str, latitude: f64, longitude: f64) -> Location {
        Location::new(
            LocationName::new(name).unwrap(),
            GeoLocation::new(latitude, longitude).unwrap(),
        )
    }

    #[tokio::test]
    async fn insert_and_find_roundtrip() {
        let store = create_test_store();
        let paris = location("Paris", 48.85, 2.35);

        store.insert(&paris).await.unwrap();

        let found = store.find_by_name(&paris.name).await.unwrap().unwrap();
        assert_eq!(found.id, paris.id);
        assert_eq!(found.name.as_str(), "Paris");
        assert!((found.coordinates.latitude() - 48.85).abs() < 1e-9);
        assert!((found.coordinates.longitude() - 2.35).abs() < 1e-9);
    }

    #[tokio::test]
    async fn find_unknown_returns_none() {
        let store = create_test_store();
        let name = LocationName::new("Nowhere").unwrap();

        let found = store.find_by_name(&name).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_already_exists() {
        let store = create_test_store();
        store.insert(&location("Paris", 48.85, 2.35)).await.unwrap();

        let result = store.insert(&location("Paris", 0.0, 0.0)).await;
        assert!(matches!(result, Err(ApplicationError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let store = create_test_store();
        store.insert(&location("Tokyo", 35.68, 139.69)).await.unwrap();
        store.insert(&location("Berlin", 52.52, 13.40)).await.unwrap();
        store.insert(&location("Paris", 48.85, 2.35)).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["Berlin", "Paris", "Tokyo"]);
    }

    #[tokio::test]
    async fn delete_removes_location() {
        let store = create_test_store();
        let paris = location("Paris", 48.85, 2.35);
        store.insert(&paris).await.unwrap();

        store.delete_by_name(&paris.name).await.unwrap();

        let found = store.find_by_name(&paris.name).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let store = create_test_store();
        let name = LocationName::new("Nowhere").unwrap();

        let result = store.delete_by_name(&name).await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn created_at_survives_roundtrip() {
        let store = create_test_store();
        let paris = location("Paris", 48.85, 2.35);
        store.insert(&paris).await.unwrap();

        let found = store.find_by_name(&paris.name).await.unwrap().unwrap();
        assert_eq!(found.created_at, paris.created_at);
    }
}

//! Ride store backed by PostgreSQL.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};
use std::time::Duration;

use rides_common::{AggregateRow, GroupValue, RidesError, RidesResult, COUNT_COLUMN};

use crate::query::{AggregateQuery, ColumnKind};

/// Read access to the rides dataset.
///
/// Handlers only see this trait so tests can swap in an in-memory store.
#[async_trait]
pub trait RideStore: Send + Sync {
    /// Run a grouped count and return its rows in store order.
    async fn aggregate(&self, query: &AggregateQuery) -> RidesResult<Vec<AggregateRow>>;

    /// First ride record, as stored.
    async fn example_ride(&self) -> RidesResult<Option<Value>>;

    /// Location and time columns of every ride.
    async fn locations_and_times(&self) -> RidesResult<Vec<Value>>;

    /// Check store connectivity.
    async fn ping(&self) -> RidesResult<()>;
}

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct PgStoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PgStoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Rides store over a shared Postgres pool.
pub struct PgRideStore {
    pool: PgPool,
}

impl PgRideStore {
    /// Create a new store connection from configuration.
    pub async fn connect(config: &PgStoreConfig) -> RidesResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| RidesError::QueryFailure(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RideStore for PgRideStore {
    async fn aggregate(&self, query: &AggregateQuery) -> RidesResult<Vec<AggregateRow>> {
        let sql = query.sql();

        let mut statement = sqlx::query(&sql);
        for value in query.binds() {
            statement = statement.bind(value);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RidesError::QueryFailure(format!("Query failed: {}", e)))?;

        tracing::debug!(rows = rows.len(), grouping = ?query.grouping, "Aggregate query finished");

        rows.iter().map(|row| decode_row(row, query)).collect()
    }

    async fn example_ride(&self) -> RidesResult<Option<Value>> {
        let row = sqlx::query(
            "SELECT row_to_json(r)::text AS ride FROM (SELECT * FROM rides LIMIT 1) r",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RidesError::QueryFailure(format!("Query failed: {}", e)))?;

        row.map(|r| decode_json(&r)).transpose()
    }

    async fn locations_and_times(&self) -> RidesResult<Vec<Value>> {
        let rows = sqlx::query(
            "SELECT row_to_json(r)::text AS ride FROM (\
             SELECT rental_id, start_lat, start_lon, end_lat, end_lon, start_time, end_time \
             FROM rides) r",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RidesError::QueryFailure(format!("Query failed: {}", e)))?;

        rows.iter().map(decode_json).collect()
    }

    async fn ping(&self) -> RidesResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RidesError::QueryFailure(format!("Ping failed: {}", e)))?;
        Ok(())
    }
}

fn decode_row(row: &PgRow, query: &AggregateQuery) -> RidesResult<AggregateRow> {
    let mut decoded = AggregateRow::new();

    for dim in query.dimensions() {
        let column = dim.column();
        let value: GroupValue = match dim.kind() {
            ColumnKind::Integer => row.try_get::<Option<i32>, _>(column).map(GroupValue::from),
            ColumnKind::Text => row.try_get::<Option<String>, _>(column).map(GroupValue::from),
        }
        .map_err(|e| RidesError::QueryFailure(format!("Failed to decode {}: {}", column, e)))?;
        decoded.set(column, value);
    }

    let count: i64 = row
        .try_get(COUNT_COLUMN)
        .map_err(|e| RidesError::MalformedAggregateRow(format!("Failed to decode count: {}", e)))?;
    decoded.set(COUNT_COLUMN, count);

    Ok(decoded)
}

fn decode_json(row: &PgRow) -> RidesResult<Value> {
    let text: String = row
        .try_get("ride")
        .map_err(|e| RidesError::QueryFailure(format!("Failed to decode ride: {}", e)))?;
    serde_json::from_str(&text)
        .map_err(|e| RidesError::QueryFailure(format!("Invalid ride JSON: {}", e)))
}

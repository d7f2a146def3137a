//! Application state for the rides API.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use rides_common::StationTable;
use storage::{PgRideStore, RideStore};

use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    /// Rides store used for every query.
    pub store: Arc<dyn RideStore>,

    /// Station id -> bounding box, fixed for the process lifetime.
    pub stations: Arc<StationTable>,

    /// Prometheus handle for `/metrics`, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state around an existing store.
    pub fn new(store: Arc<dyn RideStore>, stations: StationTable) -> Self {
        Self {
            store,
            stations: Arc::new(stations),
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Load stations and connect to PostgreSQL.
    pub async fn from_config(config: &ApiConfig) -> Result<Self> {
        let stations = config.load_stations()?;

        let store = PgRideStore::connect(&config.store_config())
            .await
            .context("Failed to connect to the rides database")?;

        Ok(Self::new(Arc::new(store), stations))
    }
}

//! Station listing handler.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use rides_common::StationTable;

use crate::state::AppState;

/// GET /stations - Loaded station table (id -> bounding box)
pub async fn list_stations_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<StationTable> {
    Json(StationTable::clone(&state.stations))
}

//! Route table for the rides API.

use axum::{routing::get, Extension, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health, rides, stations};
use crate::state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Raw ride records
        .route("/example", get(rides::example_handler))
        .route(
            "/locations_and_times",
            get(rides::locations_and_times_handler),
        )
        // Global counts
        .route("/count", get(rides::count_handler))
        .route("/count/per_month", get(rides::count_per_month_handler))
        .route("/count/per_year", get(rides::count_per_year_handler))
        .route("/count/per_hour", get(rides::count_per_hour_handler))
        // Station-to-station count
        .route(
            "/count/from/:start/to/:end",
            get(rides::count_between_handler),
        )
        // Station counts
        .route("/count/:station", get(rides::station_count_handler))
        .route(
            "/count/:station/per_month",
            get(rides::station_per_month_handler),
        )
        .route(
            "/count/:station/per_day",
            get(rides::station_per_day_handler),
        )
        .route(
            "/count/:station/per_day_of_year",
            get(rides::station_per_day_of_year_handler),
        )
        .route(
            "/count/:station/per_year",
            get(rides::station_per_year_handler),
        )
        .route(
            "/count/:station/per_month/memberships",
            get(rides::station_memberships_per_month_handler),
        )
        .route(
            "/count/:station/per_week/memberships",
            get(rides::station_memberships_per_week_handler),
        )
        // Stations, health and metrics
        .route("/stations", get(stations::list_stations_handler))
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .route("/metrics", get(health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

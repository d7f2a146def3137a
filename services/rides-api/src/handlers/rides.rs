//! Ride count handlers.
//!
//! Station-scoped handlers resolve every station id before touching the
//! store, so an unknown id answers 404 without issuing a query.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use rides_common::transform::{
    self, PeriodCounts, YearMonthSeries, YearPeriodBreakdown, YearPeriodCounts,
};
use rides_common::AggregateRow;
use storage::{AggregateQuery, Grouping};

use super::error::{ApiError, AtEndpoint};
use crate::metrics;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Body of the plain count endpoints: the `COUNT(*)` row, count as text.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CountResponse {
    pub count: String,
}

async fn aggregate(
    state: &AppState,
    endpoint: &'static str,
    query: AggregateQuery,
) -> Result<Vec<AggregateRow>, ApiError> {
    let started = Instant::now();
    let result = state.store.aggregate(&query).await;
    metrics::record_query_duration(endpoint, started.elapsed());
    result.at(endpoint)
}

async fn count(
    state: &AppState,
    endpoint: &'static str,
    query: AggregateQuery,
) -> ApiResult<CountResponse> {
    let rows = aggregate(state, endpoint, query).await?;
    let total = transform::total_count(&rows).at(endpoint)?;
    Ok(Json(CountResponse {
        count: total.to_string(),
    }))
}

/// GET /example - First ride record
pub async fn example_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Option<Value>> {
    const ENDPOINT: &str = "example";
    metrics::record_request(ENDPOINT);
    state.store.example_ride().await.map(Json).at(ENDPOINT)
}

/// GET /locations_and_times - Coordinates and times of every ride
pub async fn locations_and_times_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Vec<Value>> {
    const ENDPOINT: &str = "locations_and_times";
    metrics::record_request(ENDPOINT);
    state.store.locations_and_times().await.map(Json).at(ENDPOINT)
}

/// GET /count
pub async fn count_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<CountResponse> {
    const ENDPOINT: &str = "count";
    metrics::record_request(ENDPOINT);
    count(&state, ENDPOINT, AggregateQuery::global(Grouping::Total)).await
}

/// GET /count/per_month
pub async fn count_per_month_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<YearMonthSeries> {
    const ENDPOINT: &str = "count_per_month";
    metrics::record_request(ENDPOINT);
    let rows = aggregate(&state, ENDPOINT, AggregateQuery::global(Grouping::YearMonth)).await?;
    transform::by_year_and_month(&rows).map(Json).at(ENDPOINT)
}

/// GET /count/per_year
pub async fn count_per_year_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<PeriodCounts> {
    const ENDPOINT: &str = "count_per_year";
    metrics::record_request(ENDPOINT);
    let rows = aggregate(&state, ENDPOINT, AggregateQuery::global(Grouping::Year)).await?;
    transform::by_period(&rows, "year").map(Json).at(ENDPOINT)
}

/// GET /count/per_hour
pub async fn count_per_hour_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<PeriodCounts> {
    const ENDPOINT: &str = "count_per_hour";
    metrics::record_request(ENDPOINT);
    let rows = aggregate(&state, ENDPOINT, AggregateQuery::global(Grouping::Hour)).await?;
    transform::by_period(&rows, "hour").map(Json).at(ENDPOINT)
}

/// GET /count/from/:start/to/:end - Rides from one station to another
pub async fn count_between_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> ApiResult<CountResponse> {
    const ENDPOINT: &str = "count_between";
    metrics::record_request(ENDPOINT);
    let (start_box, end_box) = state.stations.resolve_pair(&start, &end).at(ENDPOINT)?;
    count(
        &state,
        ENDPOINT,
        AggregateQuery::between(Grouping::Total, start_box, end_box),
    )
    .await
}

/// GET /count/:station
pub async fn station_count_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<CountResponse> {
    const ENDPOINT: &str = "station_count";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    count(&state, ENDPOINT, AggregateQuery::station(Grouping::Total, bbox)).await
}

/// GET /count/:station/per_month
pub async fn station_per_month_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<YearMonthSeries> {
    const ENDPOINT: &str = "station_per_month";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(
        &state,
        ENDPOINT,
        AggregateQuery::station(Grouping::YearMonth, bbox),
    )
    .await?;
    transform::by_year_and_month(&rows).map(Json).at(ENDPOINT)
}

/// GET /count/:station/per_day
pub async fn station_per_day_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<YearPeriodBreakdown> {
    const ENDPOINT: &str = "station_per_day";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(
        &state,
        ENDPOINT,
        AggregateQuery::station(Grouping::YearMonthDay, bbox),
    )
    .await?;
    transform::by_year_and_month_and_day(&rows).map(Json).at(ENDPOINT)
}

/// GET /count/:station/per_day_of_year
pub async fn station_per_day_of_year_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<YearPeriodCounts> {
    const ENDPOINT: &str = "station_per_day_of_year";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(
        &state,
        ENDPOINT,
        AggregateQuery::station(Grouping::YearDayOfYear, bbox),
    )
    .await?;
    transform::by_year_and_day_of_year(&rows).map(Json).at(ENDPOINT)
}

/// GET /count/:station/per_year
pub async fn station_per_year_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<PeriodCounts> {
    const ENDPOINT: &str = "station_per_year";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(&state, ENDPOINT, AggregateQuery::station(Grouping::Year, bbox)).await?;
    transform::by_period(&rows, "year").map(Json).at(ENDPOINT)
}

/// GET /count/:station/per_month/memberships
pub async fn station_memberships_per_month_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<YearPeriodBreakdown> {
    const ENDPOINT: &str = "station_memberships_per_month";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(
        &state,
        ENDPOINT,
        AggregateQuery::station(Grouping::YearMonthMembership, bbox),
    )
    .await?;
    transform::memberships_by_year_and_month(&rows).map(Json).at(ENDPOINT)
}

/// GET /count/:station/per_week/memberships
pub async fn station_memberships_per_week_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(station): Path<String>,
) -> ApiResult<YearPeriodBreakdown> {
    const ENDPOINT: &str = "station_memberships_per_week";
    metrics::record_request(ENDPOINT);
    let bbox = state.stations.resolve(&station).at(ENDPOINT)?;
    let rows = aggregate(
        &state,
        ENDPOINT,
        AggregateQuery::station(Grouping::YearWeekMembership, bbox),
    )
    .await?;
    transform::memberships_by_year_and_week(&rows).map(Json).at(ENDPOINT)
}

//! Mapping of rides errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use rides_common::{RidesError, RidesResult};

use crate::metrics;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A failed request, tagged with the endpoint it failed on.
#[derive(Debug)]
pub struct ApiError {
    pub endpoint: &'static str,
    pub error: RidesError,
}

impl ApiError {
    pub fn new(endpoint: &'static str, error: RidesError) -> Self {
        Self { endpoint, error }
    }
}

/// Attach the endpoint name to a rides result.
pub trait AtEndpoint<T> {
    fn at(self, endpoint: &'static str) -> Result<T, ApiError>;
}

impl<T> AtEndpoint<T> for RidesResult<T> {
    fn at(self, endpoint: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(endpoint, e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        metrics::record_error(self.endpoint, self.error.kind());

        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Unknown stations answer with an empty 404.
        if let RidesError::StationNotFound(id) = &self.error {
            tracing::debug!(endpoint = self.endpoint, station = %id, "Unknown station");
            return status.into_response();
        }

        tracing::error!(
            endpoint = self.endpoint,
            kind = self.error.kind(),
            "Request failed: {}",
            self.error
        );

        (
            status,
            Json(ErrorResponse {
                error: self.error.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::new("count_station", RidesError::StationNotFound("zz".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failures_map_to_500() {
        for error in [
            RidesError::QueryFailure("connection reset".into()),
            RidesError::MalformedAggregateRow("count is missing".into()),
        ] {
            let response = ApiError::new("count", error).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_at_endpoint() {
        let result: RidesResult<u64> = Err(RidesError::QueryFailure("boom".into()));
        let err = result.at("count").unwrap_err();
        assert_eq!(err.endpoint, "count");
    }
}

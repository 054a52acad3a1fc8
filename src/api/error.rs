use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// JSON body of every failed API call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", e);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").with_details(e)
    }

    pub fn with_details(mut self, details: impl std::fmt::Display) -> Self {
        self.body.details = Some(details.to_string());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        if !e.is_client_error() {
            return Self::internal(e);
        }
        let status = match e {
            RosterError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::warn!("Rejected request: {}", e);
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Invalid request body: {}", rejection.body_text());
        Self::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!("Invalid query string: {}", rejection.body_text());
        Self::bad_request("Invalid query string").with_details(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        let cases = [
            (RosterError::validation("bad"), StatusCode::BAD_REQUEST),
            (RosterError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (RosterError::conflict("dup"), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn store_errors_map_to_500_with_details() {
        let err = ApiError::from(RosterError::Store(rusqlite::Error::InvalidQuery));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body.details.is_some());
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let body = ErrorBody {
            error: "Invalid name".to_string(),
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Invalid name" })
        );
    }
}

//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::DistributionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Add instance URI
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized").with_detail(detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<DistributionError> for Problem {
    fn from(error: DistributionError) -> Self {
        map_domain_error(error)
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: DistributionError) -> Problem {
    match error {
        DistributionError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource))
                .with_detail(format!("{} with id '{}' was not found", resource, id))
        }

        DistributionError::Conflict { reason } => {
            Problem::new(StatusCode::CONFLICT, "Conflict").with_detail(reason)
        }

        DistributionError::Validation { message } => Problem::bad_request(message),

        DistributionError::Unauthorized { reason } => Problem::unauthorized(reason),

        DistributionError::Forbidden { reason } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(reason)
        }

        e @ DistributionError::InvalidTransition { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Invalid Status Transition")
                .with_detail(e.to_string())
        }

        DistributionError::InsufficientBalance {
            required,
            available,
        } => Problem::new(StatusCode::BAD_REQUEST, "Insufficient Wallet Balance").with_detail(
            format!("Required {required}, available {available}"),
        ),

        e @ DistributionError::NegativeBalanceNotAllowed { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Negative Balance Not Allowed")
                .with_detail(e.to_string())
        }

        e @ DistributionError::CreditLimitExceeded { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Credit Limit Exceeded")
                .with_detail(e.to_string())
        }

        DistributionError::InvalidSignature { reason } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Invalid Signature").with_detail(reason)
        }

        DistributionError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail("An unexpected error occurred")
        }
    }
}

//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::analytics::{AnalyticsError, AskError};
use crate::services::forecast::ForecastError;
use crate::services::snapshot::PublishError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Request body could not be read (size limit, malformed form)
    Rejected { status: StatusCode, message: String },
    /// Dataset publish failed
    Publish(PublishError),
    /// Reading the published analytics failed
    Analytics(AnalyticsError),
    /// Answering a question failed
    Ask(AskError),
}

impl AppError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Rejected {
            status,
            message: message.into(),
        }
    }
}

const NO_DATASET: &str = "NO_DATASET";

fn forecast_status(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::InsufficientHistory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::InvalidHorizon(_) | ForecastError::Model(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Rejected { status, message } => {
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                (status, ApiError::new(code, message))
            }
            AppError::Publish(e) => {
                let status = match &e {
                    PublishError::Load(_) => StatusCode::BAD_REQUEST,
                    PublishError::Empty(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    PublishError::Forecast(f) => forecast_status(f),
                    PublishError::Persist(_) | PublishError::NoWorkingFile => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                let error = ApiError::new(e.code(), "Dataset was not accepted; the previous dataset stays active")
                    .with_details(e.to_string());
                (status, error)
            }
            AppError::Analytics(e) => match e {
                AnalyticsError::NotReady => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::new(NO_DATASET, e.to_string()),
                ),
                AnalyticsError::Forecast(f) => (forecast_status(&f), ApiError::new(f.code(), f.to_string())),
            },
            AppError::Ask(e) => match e {
                AskError::EmptyQuestion | AskError::QuestionTooLong { .. } => (
                    StatusCode::BAD_REQUEST,
                    ApiError::new("INVALID_QUERY", e.to_string()),
                ),
                AskError::NotReady => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::new(NO_DATASET, e.to_string()),
                ),
                AskError::Generation(g) => {
                    let error = ApiError::new(g.code(), "AI processing failed").with_details(g.to_string());
                    (StatusCode::BAD_GATEWAY, error)
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<PublishError> for AppError {
    fn from(err: PublishError) -> Self {
        AppError::Publish(err)
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        AppError::Analytics(err)
    }
}

impl From<AskError> for AppError {
    fn from(err: AskError) -> Self {
        AppError::Ask(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! [`AnalyticsService`](crate::services::AnalyticsService).

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use tracing::{info, warn};

use super::dto::{
    AnalyticsResponse, AskRequest, AskResponse, DatasetInfoResponse, ForecastResponse,
    HealthResponse, MonthlySeriesResponse, UploadResponse,
};
use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports the published dataset version, if any.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        dataset_version: state.service.dataset_version().map(|v| v.sequence),
        assistant: state.service.generator_name().to_string(),
    }))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /v1/analytics
///
/// Revenue trends, cancellation rate, top countries and lead-time distribution,
/// all taken from the same snapshot.
pub async fn get_analytics(State(state): State<AppState>) -> HandlerResult<AnalyticsResponse> {
    let snapshot = state.service.snapshot()?;
    Ok(Json(AnalyticsResponse::from(snapshot.as_ref())))
}

/// GET /v1/revenue/monthly
pub async fn get_monthly_revenue(
    State(state): State<AppState>,
) -> HandlerResult<MonthlySeriesResponse> {
    let series = state.service.get_monthly_revenue()?;
    Ok(Json(MonthlySeriesResponse::from(&series)))
}

/// GET /v1/revenue/forecast
pub async fn get_forecast(State(state): State<AppState>) -> HandlerResult<ForecastResponse> {
    let forecast = state.service.get_forecast()?;
    Ok(Json(ForecastResponse::from(&forecast)))
}

/// GET /v1/cancellations/monthly
pub async fn get_monthly_cancellations(
    State(state): State<AppState>,
) -> HandlerResult<MonthlySeriesResponse> {
    let series = state.service.get_monthly_cancellation_rate()?;
    Ok(Json(MonthlySeriesResponse::from(&series)))
}

// =============================================================================
// Dataset
// =============================================================================

/// GET /v1/dataset
pub async fn get_dataset(State(state): State<AppState>) -> HandlerResult<DatasetInfoResponse> {
    let snapshot = state.service.snapshot()?;
    Ok(Json(DatasetInfoResponse::from(snapshot.as_ref())))
}

/// POST /v1/dataset
///
/// Replace the dataset with an uploaded CSV, sent either as the `file` field of
/// a `multipart/form-data` form or as the raw request body. Parsing, metrics
/// and the forecast refit run on the blocking pool.
pub async fn upload_dataset(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let body = read_upload(request).await?;
    if body.is_empty() {
        return Err(AppError::BadRequest("File upload failed: request body is empty".to_string()));
    }

    let service = state.service.clone();
    let size = body.len();
    let version = tokio::task::spawn_blocking(move || service.replace_dataset(&body))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| {
            warn!(error = %e, bytes = size, "Dataset upload rejected");
            AppError::from(e)
        })?;

    info!(version = version.sequence, rows = version.rows, "Dataset replaced");
    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            message: "Dataset updated successfully!".to_string(),
            version,
        }),
    ))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// CSV bytes of an upload: the `file` form field, or the whole body otherwise.
async fn read_upload(request: Request) -> Result<Bytes, AppError> {
    if !is_multipart(&request) {
        return Bytes::from_request(request, &())
            .await
            .map_err(|e| AppError::rejected(e.status(), e.body_text()));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| AppError::rejected(e.status(), e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::rejected(e.status(), e.body_text()))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::rejected(e.status(), e.body_text()));
        }
    }

    Err(AppError::BadRequest(
        "File upload failed: no 'file' field in the form".to_string(),
    ))
}

// =============================================================================
// Assistant
// =============================================================================

/// POST /v1/ask
///
/// Answer a natural-language question about the current analytics.
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> HandlerResult<AskResponse> {
    let query = payload
        .ok()
        .and_then(|Json(request)| request.query)
        .ok_or_else(|| AppError::BadRequest("Invalid request. Please provide a query.".to_string()))?;

    let answer = state.service.ask(&query).await?;
    Ok(Json(AskResponse { answer }))
}

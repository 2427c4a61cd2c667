use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::Instrument;
use validator::Validate;
use crate::core::flows::build_flow_points;
use crate::core::{MatchError, Matcher};
use crate::models::{
    ErrorResponse, FlowMapQuery, FlowMapResponse, HealthResponse, MatchReport, MatchesPath, OfficerId,
};
use crate::services::{CacheError, CacheManager, PostgresClient, PostgresError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub cache: Arc<CacheManager>,
    pub matcher: Matcher,
    pub request_timeout: Duration,
}

/// Everything a handler can fail with, mapped onto HTTP statuses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("storage unavailable: {0}")]
    Storage(#[from] PostgresError),

    #[error("reference data unavailable: {0}")]
    Cache(#[from] CacheError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Short machine-readable error code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::Match(MatchError::OfficerNotFound(_)) => "officer_not_found",
            ApiError::Match(MatchError::CandidateSetTooLarge { .. }) => "candidate_set_too_large",
            ApiError::Match(MatchError::ComputationFailed(_)) => "computation_failed",
            ApiError::Storage(_) | ApiError::Cache(_) => "storage_error",
            ApiError::Timeout(_) => "timeout",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Match(MatchError::OfficerNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::CandidateSetTooLarge { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Match(MatchError::ComputationFailed(_))
            | ApiError::Storage(_)
            | ApiError::Cache(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.code(), self);
        } else {
            tracing::info!("{}: {}", self.code(), self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/officers/{officer_id}/matches", web::get().to(find_matches))
        .route("/map", web::get().to(flow_map));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: state.cache.stats().await,
    })
}

/// Find matches endpoint
///
/// GET /api/v1/officers/{officerId}/matches
///
/// Returns interested officers, direct swaps and triangular swaps for
/// the officer, plus the scope rule that was applied.
async fn find_matches(
    state: web::Data<AppState>,
    path: web::Path<MatchesPath>,
) -> Result<HttpResponse, ApiError> {
    path.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let officer_id = OfficerId(path.officer_id);
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("find_matches", %request_id, %officer_id);
    let timeout = state.request_timeout;
    let deadline = Instant::now() + timeout;

    let report = tokio::time::timeout(timeout, compute_report(&state, officer_id, deadline))
        .instrument(span)
        .await
        .map_err(|_| ApiError::Timeout(timeout))??;

    Ok(HttpResponse::Ok().json(report))
}

/// Load a consistent snapshot, then run the matcher on the blocking pool
async fn compute_report(
    state: &AppState,
    officer_id: OfficerId,
    deadline: Instant,
) -> Result<MatchReport, ApiError> {
    let locations = state
        .cache
        .location_index(|| state.postgres.load_location_tables())
        .await?;

    let snapshot = state
        .postgres
        .load_snapshot(officer_id, state.matcher.limits().candidate_ceiling, locations)
        .await?;

    tracing::debug!("Loaded {} officers for matching", snapshot.officer_count());

    // A blocking job is not cancelled when the request times out; it runs
    // to completion, bounded by the candidate ceiling. Don't start one late.
    ensure_budget(deadline, state.request_timeout)?;

    let matcher = state.matcher.clone();
    let report = web::block(move || matcher.compute_matches(officer_id, &snapshot))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(report)
}

fn ensure_budget(deadline: Instant, timeout: Duration) -> Result<(), ApiError> {
    if Instant::now() >= deadline {
        return Err(ApiError::Timeout(timeout));
    }
    Ok(())
}

/// Demand map endpoint
///
/// GET /api/v1/map?kind=leaving|arriving|balance&stateId=&forceId=
async fn flow_map(
    state: web::Data<AppState>,
    query: web::Query<FlowMapQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let locations = state
        .cache
        .location_index(|| state.postgres.load_location_tables())
        .await?;

    let (leaving, arriving) = state
        .postgres
        .load_flow_counts(query.kind, query.state_id, query.force_id)
        .await?;

    let points = build_flow_points(query.kind, &leaving, &arriving, &locations);

    tracing::debug!("Demand map ({:?}): {} points", query.kind, points.len());

    Ok(HttpResponse::Ok().json(FlowMapResponse {
        kind: query.kind,
        points,
        generated_at: chrono::Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_errors_map_to_statuses() {
        let not_found = ApiError::from(MatchError::OfficerNotFound(OfficerId(9)));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.code(), "officer_not_found");

        let too_large = ApiError::from(MatchError::CandidateSetTooLarge { count: 5001, ceiling: 5000 });
        assert_eq!(too_large.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(too_large.to_string().contains("narrow your criteria"));

        let failed = ApiError::from(MatchError::ComputationFailed("boom".to_string()));
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transport_errors_map_to_statuses() {
        assert_eq!(
            ApiError::Timeout(Duration::from_millis(5)).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Validation("officer_id: range".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CacheError::Loader("down".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_spent_budget_refuses_blocking_work() {
        let timeout = Duration::from_millis(250);

        let spent = ensure_budget(Instant::now(), timeout);
        assert!(matches!(spent, Err(ApiError::Timeout(t)) if t == timeout));

        assert!(ensure_budget(Instant::now() + Duration::from_secs(60), timeout).is_ok());
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = ApiError::from(MatchError::OfficerNotFound(OfficerId(3))).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "officer_not_found");
        assert_eq!(body["status_code"], 404);
        assert_eq!(body["message"], "officer 3 not found");
    }
}

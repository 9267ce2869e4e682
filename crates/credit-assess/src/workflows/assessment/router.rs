use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use super::domain::QualitativeScores;
use super::error::AssessmentError;
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::service::{AssessmentService, AssessmentServiceError, IntakeSubmission};

/// Router builder exposing the assessment workflow actions over HTTP.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: SessionRepository + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(open_handler::<R>))
        .route(
            "/api/v1/assessments/:session_id",
            get(view_handler::<R>).delete(close_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/intake",
            put(intake_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/advance",
            post(advance_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/retreat",
            post(retreat_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:session_id/report",
            post(report_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: SessionRepository + 'static,
{
    match service.open() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn view_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn intake_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(submission): axum::Json<IntakeSubmission>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.submit_intake(&SessionId(session_id), submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.advance(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn retreat_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.retreat(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
    axum::Json(scores): axum::Json<QualitativeScores>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.generate_report(&SessionId(session_id), scores) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report.summary_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn close_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Assessment(AssessmentError::Validation(_))
        | AssessmentServiceError::Assessment(AssessmentError::Computation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::Assessment(AssessmentError::Storage(_)) => StatusCode::BAD_GATEWAY,
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

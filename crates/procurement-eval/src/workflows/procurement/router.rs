use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

use super::domain::{ProcessDefinition, ProcessId, ProponentId};
use super::repository::{ProcessRepository, RepositoryError};
use super::service::{
    EvaluationBundle, ProcurementEvaluationService, ProponentRegistration, ScoringUpdate,
    ServiceError, VerificationUpdate,
};

type SharedService<R> = Arc<ProcurementEvaluationService<R>>;

/// Router builder exposing HTTP endpoints for process registration, scoring and evaluation.
pub fn process_router<R>(service: SharedService<R>) -> Router
where
    R: ProcessRepository + 'static,
{
    Router::new()
        .route("/api/v1/processes", post(register_process_handler::<R>))
        .route("/api/v1/processes/:process_id", get(process_handler::<R>))
        .route(
            "/api/v1/processes/:process_id/proponents",
            post(register_proponent_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/proponents/:proponent_id/scoring",
            put(scoring_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/proponents/:proponent_id/verification",
            put(verification_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/proponents/:proponent_id/evaluation",
            get(evaluation_handler::<R>),
        )
        .route(
            "/api/v1/processes/:process_id/report",
            get(report_handler::<R>),
        )
        .route("/api/v1/evaluate", post(bundle_handler::<R>))
        .with_state(service)
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::NotFound)
        | ServiceError::UnknownProponent { .. } => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn register_process_handler<R>(
    State(service): State<SharedService<R>>,
    Json(process): Json<ProcessDefinition>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.register_process(process) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn process_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<String>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.get(&ProcessId(process_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn register_proponent_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<String>,
    Json(registration): Json<ProponentRegistration>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.register_proponent(&ProcessId(process_id), registration) {
        Ok(proponent) => (StatusCode::CREATED, Json(proponent)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scoring_handler<R>(
    State(service): State<SharedService<R>>,
    Path((process_id, proponent_id)): Path<(String, String)>,
    Json(update): Json<ScoringUpdate>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.score_proponent(&ProcessId(process_id), &ProponentId(proponent_id), update) {
        Ok(proponent) => (StatusCode::OK, Json(proponent)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verification_handler<R>(
    State(service): State<SharedService<R>>,
    Path((process_id, proponent_id)): Path<(String, String)>,
    Json(update): Json<VerificationUpdate>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.verify_proponent(&ProcessId(process_id), &ProponentId(proponent_id), update) {
        Ok(proponent) => (StatusCode::OK, Json(proponent)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluation_handler<R>(
    State(service): State<SharedService<R>>,
    Path((process_id, proponent_id)): Path<(String, String)>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.evaluate(&ProcessId(process_id), &ProponentId(proponent_id)) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<SharedService<R>>,
    Path(process_id): Path<String>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.report(&ProcessId(process_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bundle_handler<R>(
    State(service): State<SharedService<R>>,
    Json(bundle): Json<EvaluationBundle>,
) -> Response
where
    R: ProcessRepository + 'static,
{
    match service.evaluate_bundle(bundle) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

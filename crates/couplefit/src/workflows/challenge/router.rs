use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::analysis::TransformationAnalyzer;
use super::domain::{ChallengeId, NewChallenge, ProgressUpdate, ScoreRequest};
use super::repository::ChallengeRepository;
use super::service::{ChallengeServiceError, CoupleChallengeService, JudgeRequest};
use crate::error::AppError;

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    limit: Option<usize>,
}

/// Router builder exposing HTTP endpoints for challenges and direct scoring.
pub fn challenge_router<R, A>(service: Arc<CoupleChallengeService<R, A>>) -> Router
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    Router::new()
        .route(
            "/api/v1/challenges",
            get(list_handler::<R, A>).post(create_handler::<R, A>),
        )
        .route(
            "/api/v1/challenges/:challenge_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/challenges/:challenge_id/progress",
            post(progress_handler::<R, A>),
        )
        .route(
            "/api/v1/challenges/:challenge_id/judge",
            post(judge_handler::<R, A>),
        )
        .route("/api/v1/scoring/winner", post(score_handler::<R, A>))
        .with_state(service)
}

pub(crate) async fn create_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    axum::Json(request): axum::Json<NewChallenge>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    match service.create(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    match service.active(limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (
                StatusCode::OK,
                axum::Json(json!({ "count": views.len(), "challenges": views })),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    Path(challenge_id): Path<String>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    match service.get(&ChallengeId(challenge_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    Path(challenge_id): Path<String>,
    axum::Json(update): axum::Json<ProgressUpdate>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    match service.record_progress(&ChallengeId(challenge_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn judge_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    Path(challenge_id): Path<String>,
    axum::Json(request): axum::Json<JudgeRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    match service.judge(&ChallengeId(challenge_id), request) {
        Ok(winner) => (StatusCode::OK, axum::Json(winner)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, A>(
    State(service): State<Arc<CoupleChallengeService<R, A>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    R: ChallengeRepository + 'static,
    A: TransformationAnalyzer + 'static,
{
    match service.score(request) {
        Ok(winner) => (StatusCode::OK, axum::Json(winner)).into_response(),
        Err(err) => error_response(err.into()),
    }
}

fn error_response(err: ChallengeServiceError) -> Response {
    AppError::from(err).into_response()
}

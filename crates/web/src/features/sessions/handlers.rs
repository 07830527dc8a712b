use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    dto::{
        consensus::{ConfirmMenuRequest, ShareResponse},
        session::{
            CreateSessionRequest, OpenDuelRequest, SelectCourseRequest, SessionResponse,
            SessionVoteRequest,
        },
    },
    models::FinalMenuRecord,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session started on the dashboard", body = SessionResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let session = services::create_session(&state.db.store(), &state.sessions, &req.user_name).await?;

    Ok((StatusCode::CREATED, Json(session)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Current view of the session", body = SessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let session = services::get_session(&state.db.store(), &state.sessions, id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_session(&state.sessions, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/course",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    request_body = SelectCourseRequest,
    responses(
        (status = 200, description = "Duel selection for the course", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Not allowed from the current view")
    ),
    tag = "sessions"
)]
pub async fn select_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectCourseRequest>,
) -> Result<Response, WebError> {
    let session =
        services::select_course(&state.db.store(), &state.sessions, id, req.course).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/dashboard",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Back on the dashboard", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Not allowed from the current view")
    ),
    tag = "sessions"
)]
pub async fn back_to_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let session = services::back_to_dashboard(&state.db.store(), &state.sessions, id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/duel",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    request_body = OpenDuelRequest,
    responses(
        (status = 200, description = "Duel opened for voting", body = SessionResponse),
        (status = 400, description = "Not a duel of the selected course"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Duel already voted on, or no course selected")
    ),
    tag = "sessions"
)]
pub async fn open_duel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OpenDuelRequest>,
) -> Result<Response, WebError> {
    let session = services::open_duel(&state.db.store(), &state.sessions, id, &req).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/vote",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    request_body = SessionVoteRequest,
    responses(
        (status = 200, description = "Vote stored, back to duel selection", body = SessionResponse),
        (status = 400, description = "Winner is not part of the duel"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "No duel is open")
    ),
    tag = "sessions"
)]
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SessionVoteRequest>,
) -> Result<Response, WebError> {
    let session = services::vote(&state.db.store(), &state.sessions, id, req.winner_id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Duel left without voting", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "No duel is open")
    ),
    tag = "sessions"
)]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let session = services::cancel(&state.db.store(), &state.sessions, id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/waiting",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Waiting for the others, with current progress", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Not allowed from the current view")
    ),
    tag = "sessions"
)]
pub async fn enter_waiting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let session =
        services::enter_waiting(&state.db.store(), state.settings, &state.sessions, id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/reveal",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Final menu revealed", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Not everyone is ready, or not waiting")
    ),
    tag = "sessions"
)]
pub async fn reveal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let session = services::reveal(&state.db.store(), state.settings, &state.sessions, id).await?;

    Ok(Json(session).into_response())
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/confirm",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    request_body = ConfirmMenuRequest,
    responses(
        (status = 200, description = "Final menu stored; repeated calls return the same record", body = FinalMenuRecord),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Results not revealed yet")
    ),
    tag = "sessions"
)]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmMenuRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record =
        services::confirm(&state.db.store(), &state.sessions, id, req.event_key).await?;

    Ok(Json(record).into_response())
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/share",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Shareable text of the revealed menu", body = ShareResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Results not revealed yet")
    ),
    tag = "sessions"
)]
pub async fn share(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let share = services::share(&state.sessions, id).await?;

    Ok(Json(share).into_response())
}

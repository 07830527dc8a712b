use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::draft::{ChooseWinnerRequest, CreateDraftRequest, PlayMatchRequest, SwipesRequest},
    models::{Course, Dish, UserMenu},
    services::{
        draft::{CourseDraft, MenuDraft},
        tournament::BracketState,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/drafts",
    request_body = CreateDraftRequest,
    responses(
        (status = 201, description = "Empty draft started", body = MenuDraft),
        (status = 400, description = "Validation error")
    ),
    tag = "drafts"
)]
pub async fn create_draft(
    State(state): State<AppState>,
    Json(req): Json<CreateDraftRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let draft = services::create_draft(&state.drafts, &req.user_name).await;

    Ok((StatusCode::CREATED, Json(draft)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    responses(
        (status = 200, description = "Draft found", body = MenuDraft),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let draft = services::get_draft(&state.drafts, id).await?;

    Ok(Json(draft).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_draft(&state.drafts, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/drafts/{id}/swipes/{course}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("course" = Course, Path, description = "Course tag: voor, hoofd or na")
    ),
    request_body = SwipesRequest,
    responses(
        (status = 200, description = "Liked dishes of the course, ranking restarted", body = CourseDraft),
        (status = 400, description = "Swipe on a dish outside the deck, or nothing liked"),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn record_swipes(
    State(state): State<AppState>,
    Path((id, course)): Path<(Uuid, Course)>,
    Json(req): Json<SwipesRequest>,
) -> Result<Response, WebError> {
    let course_draft =
        services::record_swipes(&state.db.store(), &state.drafts, id, course, &req.swipes).await?;

    Ok(Json(course_draft).into_response())
}

#[utoipa::path(
    post,
    path = "/api/drafts/{id}/matches/{course}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("course" = Course, Path, description = "Course tag: voor, hoofd or na")
    ),
    request_body = PlayMatchRequest,
    responses(
        (status = 200, description = "Next match, or the finished ranking", body = BracketState),
        (status = 400, description = "Winner is not part of the pending match"),
        (status = 404, description = "Draft not found")
    ),
    tag = "drafts"
)]
pub async fn play_match(
    State(state): State<AppState>,
    Path((id, course)): Path<(Uuid, Course)>,
    Json(req): Json<PlayMatchRequest>,
) -> Result<Response, WebError> {
    let bracket = services::play_match(&state.drafts, id, course, req.winner_id).await?;

    Ok(Json(bracket).into_response())
}

#[utoipa::path(
    post,
    path = "/api/drafts/{id}/winner/{course}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("course" = Course, Path, description = "Course tag: voor, hoofd or na")
    ),
    request_body = ChooseWinnerRequest,
    responses(
        (status = 200, description = "Chosen dish for the course", body = Dish),
        (status = 400, description = "Index outside the top three"),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "Ranking not finished")
    ),
    tag = "drafts"
)]
pub async fn choose_winner(
    State(state): State<AppState>,
    Path((id, course)): Path<(Uuid, Course)>,
    Json(req): Json<ChooseWinnerRequest>,
) -> Result<Response, WebError> {
    let dish = services::choose_winner(&state.drafts, id, course, req.index).await?;

    Ok(Json(dish).into_response())
}

#[utoipa::path(
    post,
    path = "/api/drafts/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    responses(
        (status = 201, description = "Menu stored and draft closed", body = UserMenu),
        (status = 404, description = "Draft not found"),
        (status = 409, description = "A course has no chosen dish yet")
    ),
    tag = "drafts"
)]
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let menu = services::submit_draft(&state.db.store(), &state.drafts, id).await?;

    Ok((StatusCode::CREATED, Json(menu)).into_response())
}

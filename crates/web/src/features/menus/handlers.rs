use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::menu::{ParticipantsResponse, SubmitMenuRequest},
    models::{UserMenu, UserMenuWithDishes},
};
use validator::Validate;

use crate::error::WebError;
use crate::state::ConsensusSettings;

use super::services;

#[utoipa::path(
    get,
    path = "/api/menus",
    responses(
        (status = 200, description = "Submitted menus with their dishes, newest first", body = Vec<UserMenuWithDishes>)
    ),
    tag = "menus"
)]
pub async fn list_menus(State(db): State<Database>) -> Result<Response, WebError> {
    let menus = services::list_menus(&db.store()).await?;

    Ok(Json(menus).into_response())
}

#[utoipa::path(
    post,
    path = "/api/menus",
    request_body = SubmitMenuRequest,
    responses(
        (status = 201, description = "Menu stored", body = UserMenu),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Menu references an unknown dish")
    ),
    tag = "menus"
)]
pub async fn submit_menu(
    State(db): State<Database>,
    Json(req): Json<SubmitMenuRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let menu = services::submit_menu(&db.store(), &req).await?;

    Ok((StatusCode::CREATED, Json(menu)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/participants",
    responses(
        (status = 200, description = "Everyone who submitted a menu", body = ParticipantsResponse)
    ),
    tag = "menus"
)]
pub async fn list_participants(
    State(db): State<Database>,
    State(settings): State<ConsensusSettings>,
) -> Result<Response, WebError> {
    let response = services::participants(&db.store(), settings.expected_participants).await?;

    Ok(Json(response).into_response())
}

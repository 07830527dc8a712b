use axum::{
    Json,
    response::{IntoResponse, Response},
};
use storage::dto::tournament::{RankRequest, RankResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/tournament/rank",
    request_body = RankRequest,
    responses(
        (status = 200, description = "Next match to play, or the final ranking with its top three", body = RankResponse),
        (status = 400, description = "A winner is not part of its match")
    ),
    tag = "tournament"
)]
pub async fn rank(Json(req): Json<RankRequest>) -> Result<Response, WebError> {
    let response = services::rank(req)?;

    Ok(Json(response).into_response())
}

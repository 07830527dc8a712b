use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::consensus::{
        CandidatesResponse, CastVoteRequest, ConfirmMenuRequest, ProgressResponse, ResultsQuery,
        ShareResponse, VoteFilter,
    },
    models::{Course, DuelVote, FinalMenuRecord},
    services::{consensus::ConsensusResolution, duels::Duel},
};
use validator::Validate;

use crate::error::WebError;
use crate::state::ConsensusSettings;

use super::services;

#[utoipa::path(
    get,
    path = "/api/consensus/candidates",
    responses(
        (status = 200, description = "Distinct dishes per course across all submitted menus", body = CandidatesResponse)
    ),
    tag = "consensus"
)]
pub async fn get_candidates(State(db): State<Database>) -> Result<Response, WebError> {
    let candidates = services::candidates(&db.store()).await?;

    Ok(Json(candidates).into_response())
}

#[utoipa::path(
    get,
    path = "/api/consensus/duels/{course}",
    params(
        ("course" = Course, Path, description = "Course tag: voor, hoofd or na"),
        VoteFilter
    ),
    responses(
        (status = 200, description = "Every duel of the course, with the participant's own choice when known", body = Vec<Duel>)
    ),
    tag = "consensus"
)]
pub async fn get_duels(
    State(db): State<Database>,
    Path(course): Path<Course>,
    Query(filter): Query<VoteFilter>,
) -> Result<Response, WebError> {
    let duels = services::duels(&db.store(), course, filter.user_name.as_deref()).await?;

    Ok(Json(duels).into_response())
}

#[utoipa::path(
    get,
    path = "/api/consensus/votes",
    params(VoteFilter),
    responses(
        (status = 200, description = "Stored duel votes", body = Vec<DuelVote>)
    ),
    tag = "consensus"
)]
pub async fn list_votes(
    State(db): State<Database>,
    Query(filter): Query<VoteFilter>,
) -> Result<Response, WebError> {
    let votes = services::list_votes(&db.store(), &filter).await?;

    Ok(Json(votes).into_response())
}

#[utoipa::path(
    post,
    path = "/api/consensus/votes",
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote stored, replacing an earlier vote on the same duel", body = DuelVote),
        (status = 400, description = "Invalid vote")
    ),
    tag = "consensus"
)]
pub async fn cast_vote(
    State(db): State<Database>,
    Json(req): Json<CastVoteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let vote = services::cast_vote(&db.store(), req).await?;

    Ok(Json(vote).into_response())
}

#[utoipa::path(
    get,
    path = "/api/consensus/progress",
    responses(
        (status = 200, description = "Completion per participant and the readiness gate", body = ProgressResponse)
    ),
    tag = "consensus"
)]
pub async fn get_progress(
    State(db): State<Database>,
    State(settings): State<ConsensusSettings>,
) -> Result<Response, WebError> {
    let progress = services::progress(&db.store(), settings).await?;

    Ok(Json(progress).into_response())
}

#[utoipa::path(
    get,
    path = "/api/consensus/results",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Winners and ties per course", body = ConsensusResolution),
        (status = 409, description = "Not every participant has finished voting")
    ),
    tag = "consensus"
)]
pub async fn get_results(
    State(db): State<Database>,
    State(settings): State<ConsensusSettings>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, WebError> {
    let resolution = services::results(&db.store(), settings, query.force).await?;

    Ok(Json(resolution).into_response())
}

#[utoipa::path(
    post,
    path = "/api/consensus/confirm",
    request_body = ConfirmMenuRequest,
    responses(
        (status = 201, description = "Final menu stored", body = FinalMenuRecord),
        (status = 409, description = "Not every participant has finished voting")
    ),
    tag = "consensus"
)]
pub async fn confirm_menu(
    State(db): State<Database>,
    State(settings): State<ConsensusSettings>,
    Json(req): Json<ConfirmMenuRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::confirm(&db.store(), settings, req.event_key).await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/consensus/share",
    responses(
        (status = 200, description = "Shareable text of the final menu", body = ShareResponse),
        (status = 409, description = "Not every participant has finished voting")
    ),
    tag = "consensus"
)]
pub async fn get_share(
    State(db): State<Database>,
    State(settings): State<ConsensusSettings>,
) -> Result<Response, WebError> {
    let share = services::share(&db.store(), settings).await?;

    Ok(Json(share).into_response())
}

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    cast_vote, confirm_menu, get_candidates, get_duels, get_progress, get_results, get_share,
    list_votes,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/candidates", get(get_candidates))
        .route("/duels/:course", get(get_duels))
        .route("/votes", get(list_votes).post(cast_vote))
        .route("/progress", get(get_progress))
        .route("/results", get(get_results))
        .route("/confirm", post(confirm_menu))
        .route("/share", get(get_share))
}

use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    choose_winner, create_draft, delete_draft, get_draft, play_match, record_swipes,
    submit_draft,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_draft))
        .route("/:id", get(get_draft).delete(delete_draft))
        .route("/:id/swipes/:course", put(record_swipes))
        .route("/:id/matches/:course", post(play_match))
        .route("/:id/winner/:course", post(choose_winner))
        .route("/:id/submit", post(submit_draft))
}

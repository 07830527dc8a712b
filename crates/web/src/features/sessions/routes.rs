use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{
    back_to_dashboard, cancel, confirm, create_session, delete_session, enter_waiting,
    get_session, open_duel, reveal, select_course, share, vote,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/course", post(select_course))
        .route("/:id/dashboard", post(back_to_dashboard))
        .route("/:id/duel", post(open_duel))
        .route("/:id/vote", post(vote))
        .route("/:id/cancel", post(cancel))
        .route("/:id/waiting", post(enter_waiting))
        .route("/:id/reveal", post(reveal))
        .route("/:id/confirm", post(confirm))
        .route("/:id/share", get(share))
}

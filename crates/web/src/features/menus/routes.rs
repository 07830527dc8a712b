use axum::{Router, routing::get};

use super::handlers::{list_menus, list_participants, submit_menu};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_menus).post(submit_menu))
}

pub fn participant_routes() -> Router<AppState> {
    Router::new().route("/", get(list_participants))
}

use axum::{Router, routing::post};

use super::handlers::rank;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/rank", post(rank))
}

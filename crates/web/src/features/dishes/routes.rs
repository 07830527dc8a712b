use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_dish, delete_dish, dish_stats, get_deck, get_dish, list_dishes, update_dish,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_dish))
        .route("/:id", put(update_dish).delete(delete_dish))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_dishes))
        .route("/stats", get(dish_stats))
        .route("/deck/:course", get(get_deck))
        .route("/:id", get(get_dish))
        .merge(protected)
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::dish::{CreateDishRequest, DishFilter, DishStats, UpdateDishRequest},
    models::{Course, Dish},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/dishes",
    params(DishFilter),
    responses(
        (status = 200, description = "Dishes, newest first", body = Vec<Dish>)
    ),
    tag = "dishes"
)]
pub async fn list_dishes(
    State(db): State<Database>,
    Query(filter): Query<DishFilter>,
) -> Result<Json<Vec<Dish>>, WebError> {
    let dishes = services::list_dishes(db.pool(), &filter).await?;

    Ok(Json(dishes))
}

#[utoipa::path(
    get,
    path = "/api/dishes/stats",
    responses(
        (status = 200, description = "Number of dishes per course", body = DishStats)
    ),
    tag = "dishes"
)]
pub async fn dish_stats(State(db): State<Database>) -> Result<Response, WebError> {
    let stats = services::dish_stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dishes/deck/{course}",
    params(
        ("course" = Course, Path, description = "Course tag: voor, hoofd or na")
    ),
    responses(
        (status = 200, description = "The newest dishes of the course to swipe through", body = Vec<Dish>)
    ),
    tag = "dishes"
)]
pub async fn get_deck(
    State(db): State<Database>,
    Path(course): Path<Course>,
) -> Result<Response, WebError> {
    let deck = services::deck(&db.store(), course).await?;

    Ok(Json(deck).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dishes/{id}",
    params(
        ("id" = Uuid, Path, description = "Dish id")
    ),
    responses(
        (status = 200, description = "Dish found", body = Dish),
        (status = 404, description = "Dish not found")
    ),
    tag = "dishes"
)]
pub async fn get_dish(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let dish = services::get_dish(db.pool(), id).await?;

    Ok(Json(dish).into_response())
}

#[utoipa::path(
    post,
    path = "/api/dishes",
    request_body = CreateDishRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Dish created", body = Dish),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "dishes"
)]
pub async fn create_dish(
    State(db): State<Database>,
    Json(req): Json<CreateDishRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let dish = services::create_dish(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(dish)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/dishes/{id}",
    params(
        ("id" = Uuid, Path, description = "Dish id")
    ),
    request_body = UpdateDishRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dish updated", body = Dish),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish not found")
    ),
    tag = "dishes"
)]
pub async fn update_dish(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDishRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let dish = services::update_dish(db.pool(), id, &req).await?;

    Ok(Json(dish).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/dishes/{id}",
    params(
        ("id" = Uuid, Path, description = "Dish id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Dish deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Dish not found")
    ),
    tag = "dishes"
)]
pub async fn delete_dish(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_dish(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Course;

/// Catalog entry. Immutable outside of the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Dish {
    pub id: Uuid,
    pub category: Course,
    pub name: String,
    pub subtitle: String,
    pub ingredients: String,
    pub preparation: String,
    pub image_url: String,
    pub created_at: NaiveDateTime,
}

/// A dish as judged during one participant's swipe session.
///
/// `score` is 0 for rejected, 1 for liked and 2 for favorited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredDish {
    #[serde(flatten)]
    pub dish: Dish,
    pub score: u8,
}

impl ScoredDish {
    pub fn new(dish: Dish, score: u8) -> Self {
        Self { dish, score }
    }

    pub fn id(&self) -> Uuid {
        self.dish.id
    }

    pub fn is_liked(&self) -> bool {
        self.score > 0
    }
}

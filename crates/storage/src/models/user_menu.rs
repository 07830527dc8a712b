use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Course, Dish};

/// Row of `user_menus`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserMenu {
    pub id: Uuid,
    pub user_name: String,
    pub starter_id: Option<Uuid>,
    pub main_id: Option<Uuid>,
    pub dessert_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

/// A submitted menu with its three dish references resolved.
///
/// Slots are optional because a dish can be removed from the catalog after
/// the menu was submitted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMenuWithDishes {
    pub id: Uuid,
    pub user_name: String,
    pub starter: Option<Dish>,
    pub main: Option<Dish>,
    pub dessert: Option<Dish>,
    pub created_at: NaiveDateTime,
}

impl UserMenuWithDishes {
    pub fn slot(&self, course: Course) -> Option<&Dish> {
        match course {
            Course::Voor => self.starter.as_ref(),
            Course::Hoofd => self.main.as_ref(),
            Course::Na => self.dessert.as_ref(),
        }
    }
}

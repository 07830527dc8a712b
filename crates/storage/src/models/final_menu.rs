use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Confirmed shared menu as stored in `final_menus`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FinalMenuRecord {
    pub id: Uuid,
    pub event_key: Option<String>,
    pub starter_id: Option<Uuid>,
    pub main_id: Option<Uuid>,
    pub dessert_id: Option<Uuid>,
    /// JSON snapshot of the resolved menu at confirmation time
    pub final_text: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewFinalMenu {
    pub event_key: Option<String>,
    pub starter_id: Option<Uuid>,
    pub main_id: Option<Uuid>,
    pub dessert_id: Option<Uuid>,
    pub final_text: String,
}

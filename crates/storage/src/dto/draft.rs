use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_user_name;
use crate::services::draft::Swipe;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDraftRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_user_name")
    )]
    pub user_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SwipesRequest {
    pub swipes: Vec<Swipe>,
}

/// Winner of the pending match; omit to only read the bracket
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct PlayMatchRequest {
    pub winner_id: Option<Uuid>,
}

/// Position in the top three, starting at 0
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ChooseWinnerRequest {
    pub index: usize,
}

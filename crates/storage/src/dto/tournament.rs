use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ScoredDish;
use crate::services::tournament::BracketState;

/// Replay a bracket from the winners picked so far
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RankRequest {
    pub dishes: Vec<ScoredDish>,
    /// Winners of the already decided matches, in play order
    #[serde(default)]
    pub winners: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankResponse {
    #[serde(flatten)]
    pub state: BracketState,
    /// Empty until the bracket is finished
    pub top3: Vec<ScoredDish>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_user_name;
use crate::models::Course;
use crate::services::duels::Duel;
use crate::services::progress::ProgressReport;
use crate::services::session::ConsensusSession;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateSessionRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_user_name")
    )]
    pub user_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SelectCourseRequest {
    pub course: Course,
}

/// Identifies a duel by its two contenders; the order does not matter
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct OpenDuelRequest {
    pub dish_a_id: Uuid,
    pub dish_b_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SessionVoteRequest {
    pub winner_id: Uuid,
}

/// A session together with what its current view needs to render
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: ConsensusSession,
    /// Duels of the selected course, empty outside of duel selection
    pub duels: Vec<Duel>,
    pub progress: Option<ProgressReport>,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Course;

/// One participant's choice in one duel.
///
/// At most one row exists per `(user_name, course, duel_id)`; a later vote
/// for the same key replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DuelVote {
    pub user_name: String,
    pub course: Course,
    pub duel_id: String,
    pub dish_a_id: Uuid,
    pub dish_b_id: Uuid,
    pub winner_id: Uuid,
}

impl DuelVote {
    pub fn winner_is_contender(&self) -> bool {
        self.winner_id == self.dish_a_id || self.winner_id == self.dish_b_id
    }

    pub fn conflict_key(&self) -> (&str, Course, &str) {
        (&self.user_name, self.course, &self.duel_id)
    }
}

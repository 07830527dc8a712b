use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::validate_user_name;
use crate::models::{Course, Dish, DuelVote};
use crate::services::duels::DuelId;
use crate::services::progress::ProgressReport;

/// A vote on a single duel, keyed by its contenders
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CastVoteRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_user_name")
    )]
    pub user_name: String,
    pub course: Course,
    pub dish_a_id: Uuid,
    pub dish_b_id: Uuid,
    pub winner_id: Uuid,
}

impl CastVoteRequest {
    pub fn validate_winner(&self) -> Result<(), &'static str> {
        if self.dish_a_id == self.dish_b_id {
            return Err("A duel needs two different dishes");
        }
        if self.winner_id != self.dish_a_id && self.winner_id != self.dish_b_id {
            return Err("Winner must be one of the two dishes");
        }
        Ok(())
    }

    pub fn into_vote(self) -> DuelVote {
        DuelVote {
            duel_id: DuelId::new(self.course, self.dish_a_id, self.dish_b_id).into_string(),
            user_name: self.user_name,
            course: self.course,
            dish_a_id: self.dish_a_id,
            dish_b_id: self.dish_b_id,
            winner_id: self.winner_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct VoteFilter {
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ResultsQuery {
    /// Resolve even when not every participant is done
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct ConfirmMenuRequest {
    /// Makes repeated confirms return the same record
    #[validate(length(min = 1, max = 255))]
    pub event_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandidatesResponse {
    pub voor: Vec<Dish>,
    pub hoofd: Vec<Dish>,
    pub na: Vec<Dish>,
    pub total_needed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    #[serde(flatten)]
    pub report: ProgressReport,
    /// How often clients should poll while waiting
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    pub summary: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(winner: u128) -> CastVoteRequest {
        CastVoteRequest {
            user_name: "anna".to_string(),
            course: Course::Na,
            dish_a_id: Uuid::from_u128(5),
            dish_b_id: Uuid::from_u128(3),
            winner_id: Uuid::from_u128(winner),
        }
    }

    #[test]
    fn test_winner_must_be_contender() {
        assert!(request(5).validate_winner().is_ok());
        assert!(request(3).validate_winner().is_ok());
        assert!(request(9).validate_winner().is_err());
    }

    #[test]
    fn test_vote_uses_canonical_duel_id() {
        let vote = request(5).into_vote();
        assert_eq!(
            vote.duel_id,
            format!("na_{}_{}", Uuid::from_u128(3), Uuid::from_u128(5))
        );
        assert!(vote.winner_is_contender());
    }
}

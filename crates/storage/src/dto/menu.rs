use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_user_name;

/// Request to store a participant's final three-course menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitMenuRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_user_name")
    )]
    pub user_name: String,

    pub starter_id: Uuid,
    pub main_id: Uuid,
    pub dessert_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantsResponse {
    /// Distinct names, sorted
    pub participants: Vec<String>,
    pub count: usize,
    pub expected_participants: usize,
    /// Enough menus are in to start the consensus flow
    pub consensus_open: bool,
}

impl ParticipantsResponse {
    pub fn new(participants: Vec<String>, expected_participants: usize) -> Self {
        let count = participants.len();
        Self {
            participants,
            count,
            expected_participants,
            consensus_open: count >= expected_participants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_name: &str) -> SubmitMenuRequest {
        SubmitMenuRequest {
            user_name: user_name.to_string(),
            starter_id: Uuid::from_u128(1),
            main_id: Uuid::from_u128(2),
            dessert_id: Uuid::from_u128(3),
        }
    }

    #[test]
    fn test_user_name_validation() {
        assert!(request("anna").validate().is_ok());
        assert!(request("").validate().is_err());
        assert!(request("   ").validate().is_err());
        assert!(request(&"x".repeat(101)).validate().is_err());
    }

    #[test]
    fn test_consensus_opens_at_expected_count() {
        let names = vec!["anna".to_string(), "bram".to_string()];
        assert!(!ParticipantsResponse::new(names.clone(), 3).consensus_open);
        assert!(ParticipantsResponse::new(names, 2).consensus_open);
    }
}

use storage::{
    dto::tournament::{RankRequest, RankResponse},
    services::tournament::{TournamentError, replay_tournament, top3},
};

/// Replay the bracket from the submitted winners.
///
/// Only liked dishes take part; the response carries either the next match
/// or the finished ranking with its top three.
pub fn rank(req: RankRequest) -> Result<RankResponse, TournamentError> {
    let state = replay_tournament(req.dishes, &req.winners)?;
    let top3 = state
        .result
        .as_ref()
        .map(|result| top3(result).to_vec())
        .unwrap_or_default();

    Ok(RankResponse { state, top3 })
}

#[cfg(test)]
mod tests {
    use storage::models::{Course, ScoredDish};
    use uuid::Uuid;

    use super::*;
    use crate::test_support::dish;

    fn scored(n: u128, score: u8) -> ScoredDish {
        ScoredDish::new(dish(Course::Hoofd, n, "Hoofdgerecht"), score)
    }

    #[test]
    fn test_rank_walks_through_bracket() {
        let dishes = vec![scored(1, 1), scored(2, 2), scored(3, 0), scored(4, 1)];

        let first = rank(RankRequest {
            dishes: dishes.clone(),
            winners: Vec::new(),
        })
        .unwrap();
        let pending = first.state.next_match.unwrap();
        assert_eq!(pending.dish1.id(), Uuid::from_u128(1));
        assert_eq!(pending.dish2.id(), Uuid::from_u128(2));
        assert!(first.top3.is_empty());

        let second = rank(RankRequest {
            dishes: dishes.clone(),
            winners: vec![Uuid::from_u128(2)],
        })
        .unwrap();
        // the disliked dish never enters the bracket, so dish 4 got a bye
        let pending = second.state.next_match.unwrap();
        assert_eq!(pending.dish1.id(), Uuid::from_u128(2));
        assert_eq!(pending.dish2.id(), Uuid::from_u128(4));

        let done = rank(RankRequest {
            dishes,
            winners: vec![Uuid::from_u128(2), Uuid::from_u128(2)],
        })
        .unwrap();
        assert!(done.state.next_match.is_none());
        let ids: Vec<Uuid> = done.top3.iter().map(ScoredDish::id).collect();
        // 1 and 4 have no wins and equal scores, so seeding order decides
        assert_eq!(ids, vec![Uuid::from_u128(2), Uuid::from_u128(1), Uuid::from_u128(4)]);
    }

    #[test]
    fn test_rank_rejects_outsider() {
        let err = rank(RankRequest {
            dishes: vec![scored(1, 1), scored(2, 1)],
            winners: vec![Uuid::from_u128(9)],
        })
        .unwrap_err();
        assert!(matches!(err, TournamentError::InvalidWinner { .. }));
    }
}

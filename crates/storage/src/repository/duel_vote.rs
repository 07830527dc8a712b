use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::DuelVote;

/// Repository for `consensus_duel_votes`
pub struct DuelVoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DuelVoteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every vote, or only those of one participant
    pub async fn list(&self, user_name: Option<&str>) -> Result<Vec<DuelVote>> {
        let votes = sqlx::query_as::<_, DuelVote>(
            r#"
            SELECT user_name, course, duel_id, dish_a_id, dish_b_id, winner_id
            FROM consensus_duel_votes
            WHERE ($1::text IS NULL OR user_name = $1)
            ORDER BY user_name, course, duel_id
            "#,
        )
        .bind(user_name)
        .fetch_all(self.pool)
        .await?;

        Ok(votes)
    }

    /// Insert a vote, replacing an earlier one on the same duel
    pub async fn upsert(&self, vote: &DuelVote) -> Result<DuelVote> {
        let result = sqlx::query_as::<_, DuelVote>(
            r#"
            INSERT INTO consensus_duel_votes
                (user_name, course, duel_id, dish_a_id, dish_b_id, winner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_name, course, duel_id) DO UPDATE
            SET dish_a_id = EXCLUDED.dish_a_id,
                dish_b_id = EXCLUDED.dish_b_id,
                winner_id = EXCLUDED.winner_id,
                voted_at = CURRENT_TIMESTAMP
            RETURNING user_name, course, duel_id, dish_a_id, dish_b_id, winner_id
            "#,
        )
        .bind(&vote.user_name)
        .bind(vote.course)
        .bind(&vote.duel_id)
        .bind(vote.dish_a_id)
        .bind(vote.dish_b_id)
        .bind(vote.winner_id)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(vote) => Ok(vote),
            Err(e) => {
                let err = StorageError::from(e);
                if err.is_check_violation() {
                    Err(StorageError::ConstraintViolation(
                        "Winner must be one of the two dishes".to_string(),
                    ))
                } else {
                    Err(err)
                }
            }
        }
    }
}

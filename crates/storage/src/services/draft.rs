use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::menu::SubmitMenuRequest;
use crate::models::{Course, Dish, ScoredDish};
use crate::services::tournament::{
    BracketState, TournamentError, TournamentResult, replay_tournament, select_winner, top3,
};

/// Dishes shown per course in the swipe deck
pub const DECK_SIZE: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Dish {0} is not in the deck for this course")]
    UnknownDish(Uuid),

    #[error("No dish was liked for {0}")]
    NoLikedDishes(Course),

    #[error("The ranking for {0} is not finished")]
    NotRanked(Course),

    #[error("No winner chosen yet for: {}", .0.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "))]
    Incomplete(Vec<Course>),

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
}

impl SwipeDirection {
    /// left rejects, right likes, up favorites
    pub fn score(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Swipe {
    pub dish_id: Uuid,
    pub direction: SwipeDirection,
}

/// Newest dishes of a course, at most [`DECK_SIZE`]
pub fn build_deck(mut dishes: Vec<Dish>) -> Vec<Dish> {
    dishes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    dishes.truncate(DECK_SIZE);
    dishes
}

/// Apply swipes to a deck. Dishes without a swipe count as rejected; a
/// repeated swipe on the same dish overrides the earlier one.
pub fn score_swipes(deck: &[Dish], swipes: &[Swipe]) -> Result<Vec<ScoredDish>, DraftError> {
    let mut scores: HashMap<Uuid, u8> = HashMap::new();
    for swipe in swipes {
        if !deck.iter().any(|d| d.id == swipe.dish_id) {
            return Err(DraftError::UnknownDish(swipe.dish_id));
        }
        scores.insert(swipe.dish_id, swipe.direction.score());
    }

    Ok(deck
        .iter()
        .map(|d| ScoredDish::new(d.clone(), scores.get(&d.id).copied().unwrap_or(0)))
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CourseDraft {
    /// Liked dishes only
    pub liked: Vec<ScoredDish>,
    pub winners: Vec<Uuid>,
    pub result: Option<TournamentResult>,
    pub chosen: Option<Dish>,
}

/// One participant's single-player progress towards a submitted menu
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuDraft {
    pub id: Uuid,
    pub user_name: String,
    pub voor: CourseDraft,
    pub hoofd: CourseDraft,
    pub na: CourseDraft,
    pub created_at: NaiveDateTime,
}

impl MenuDraft {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            voor: CourseDraft::default(),
            hoofd: CourseDraft::default(),
            na: CourseDraft::default(),
            created_at: Utc::now().naive_utc(),
        }
    }

    pub fn course(&self, course: Course) -> &CourseDraft {
        match course {
            Course::Voor => &self.voor,
            Course::Hoofd => &self.hoofd,
            Course::Na => &self.na,
        }
    }

    fn course_mut(&mut self, course: Course) -> &mut CourseDraft {
        match course {
            Course::Voor => &mut self.voor,
            Course::Hoofd => &mut self.hoofd,
            Course::Na => &mut self.na,
        }
    }

    /// Store the outcome of a swipe pass; restarts that course's ranking
    pub fn record_swipes(
        &mut self,
        course: Course,
        scored: Vec<ScoredDish>,
    ) -> Result<&CourseDraft, DraftError> {
        let liked: Vec<ScoredDish> = scored.into_iter().filter(ScoredDish::is_liked).collect();
        if liked.is_empty() {
            return Err(DraftError::NoLikedDishes(course));
        }

        let draft = self.course_mut(course);
        *draft = CourseDraft {
            liked,
            ..CourseDraft::default()
        };
        Ok(draft)
    }

    /// Decide the pending match (if a winner is given) and report the bracket
    pub fn play(&mut self, course: Course, winner: Option<Uuid>) -> Result<BracketState, DraftError> {
        let draft = self.course_mut(course);
        if draft.liked.is_empty() {
            return Err(DraftError::NoLikedDishes(course));
        }

        let mut winners = draft.winners.clone();
        winners.extend(winner);

        let state = replay_tournament(draft.liked.clone(), &winners)?;
        draft.winners = winners;
        draft.result = state.result.clone();
        Ok(state)
    }

    /// Pick the course winner from the top three by position
    pub fn choose_winner(&mut self, course: Course, index: usize) -> Result<&Dish, DraftError> {
        let draft = self.course_mut(course);
        let result = draft.result.as_ref().ok_or(DraftError::NotRanked(course))?;
        let winner = select_winner(top3(result), index)?.dish.clone();
        Ok(draft.chosen.insert(winner))
    }

    pub fn missing_courses(&self) -> Vec<Course> {
        Course::ALL
            .into_iter()
            .filter(|c| self.course(*c).chosen.is_none())
            .collect()
    }

    /// The menu to submit once every course has a winner
    pub fn assemble(&self) -> Result<SubmitMenuRequest, DraftError> {
        match (&self.voor.chosen, &self.hoofd.chosen, &self.na.chosen) {
            (Some(starter), Some(main), Some(dessert)) => Ok(SubmitMenuRequest {
                user_name: self.user_name.clone(),
                starter_id: starter.id,
                main_id: main.id,
                dessert_id: dessert.id,
            }),
            _ => Err(DraftError::Incomplete(self.missing_courses())),
        }
    }

    pub fn reset(&mut self) {
        self.voor = CourseDraft::default();
        self.hoofd = CourseDraft::default();
        self.na = CourseDraft::default();
    }
}

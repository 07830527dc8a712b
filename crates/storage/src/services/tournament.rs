use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ScoredDish;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Dish {winner} is not part of the match between {dish1} and {dish2}")]
    InvalidWinner { winner: Uuid, dish1: Uuid, dish2: Uuid },

    #[error("No match is pending, the tournament is complete")]
    NoPendingMatch,

    #[error("Invalid selection: index {index} out of {available} finalists")]
    InvalidSelection { index: usize, available: usize },
}

/// Which side of a match won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Second,
}

impl Pick {
    /// Resolve a chosen dish id against a pairing
    pub fn for_winner(
        winner: Uuid,
        dish1: &ScoredDish,
        dish2: &ScoredDish,
    ) -> Result<Self, TournamentError> {
        if winner == dish1.id() {
            Ok(Self::First)
        } else if winner == dish2.id() {
            Ok(Self::Second)
        } else {
            Err(TournamentError::InvalidWinner {
                winner,
                dish1: dish1.id(),
                dish2: dish2.id(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TournamentMatch {
    pub dish1: ScoredDish,
    pub dish2: ScoredDish,
    pub winner: ScoredDish,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TournamentResult {
    pub ranked_dishes: Vec<ScoredDish>,
    pub matches: Vec<TournamentMatch>,
}

impl TournamentResult {
    /// A single liked dish wins without playing
    pub fn is_auto_win(&self) -> bool {
        self.ranked_dishes.len() == 1 && self.matches.is_empty()
    }
}

/// Single-elimination bracket that is played one match at a time.
///
/// Dishes are paired by position within a round; the unpaired last dish of
/// an odd round advances on a bye. Rounds repeat until one dish is left.
#[derive(Debug, Clone)]
pub struct Bracket {
    entrants: Vec<ScoredDish>,
    round: Vec<ScoredDish>,
    next_round: Vec<ScoredDish>,
    position: usize,
    matches: Vec<TournamentMatch>,
    complete: bool,
}

impl Bracket {
    pub fn new(dishes: Vec<ScoredDish>) -> Self {
        let mut bracket = Self {
            round: dishes.clone(),
            entrants: dishes,
            next_round: Vec::new(),
            position: 0,
            matches: Vec::new(),
            complete: false,
        };
        bracket.settle();
        bracket
    }

    /// Advance over byes and finished rounds until a match is pending or the
    /// bracket is decided.
    fn settle(&mut self) {
        loop {
            if self.position == 0 && self.next_round.is_empty() && self.round.len() <= 1 {
                self.complete = true;
                return;
            }

            let remaining = self.round.len().saturating_sub(self.position);
            match remaining {
                0 => {
                    self.round = std::mem::take(&mut self.next_round);
                    self.position = 0;
                }
                1 => {
                    if let Some(bye) = self.round.get(self.position) {
                        self.next_round.push(bye.clone());
                    }
                    self.position += 1;
                }
                _ => return,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The two dishes that meet next, if any
    pub fn pending(&self) -> Option<(&ScoredDish, &ScoredDish)> {
        if self.complete {
            return None;
        }
        let dish1 = self.round.get(self.position)?;
        let dish2 = self.round.get(self.position + 1)?;
        Some((dish1, dish2))
    }

    pub fn matches(&self) -> &[TournamentMatch] {
        &self.matches
    }

    pub fn record(&mut self, pick: Pick) -> Result<&TournamentMatch, TournamentError> {
        let (dish1, dish2) = self
            .pending()
            .map(|(a, b)| (a.clone(), b.clone()))
            .ok_or(TournamentError::NoPendingMatch)?;

        let winner = match pick {
            Pick::First => dish1.clone(),
            Pick::Second => dish2.clone(),
        };

        self.next_round.push(winner.clone());
        self.matches.push(TournamentMatch {
            dish1,
            dish2,
            winner,
        });
        self.position += 2;
        self.settle();

        self.matches
            .last()
            .ok_or(TournamentError::NoPendingMatch)
    }

    /// Record the match by the id of the chosen dish
    pub fn record_winner(&mut self, winner: Uuid) -> Result<&TournamentMatch, TournamentError> {
        let pick = {
            let (dish1, dish2) = self.pending().ok_or(TournamentError::NoPendingMatch)?;
            Pick::for_winner(winner, dish1, dish2)?
        };
        self.record(pick)
    }

    /// Rank every entrant by the matches played so far
    pub fn finish(self) -> TournamentResult {
        let ranked_dishes = create_ranking_from_matches(self.entrants, &self.matches);
        TournamentResult {
            ranked_dishes,
            matches: self.matches,
        }
    }
}

/// Non-interactive choice: the higher swipe score wins, the first dish on a tie
pub fn prefer_higher_score(dish1: &ScoredDish, dish2: &ScoredDish) -> Pick {
    if dish2.score > dish1.score {
        Pick::Second
    } else {
        Pick::First
    }
}

/// Play a full bracket, asking `choose` for the winner of every match
pub fn run_tournament_with<F, E>(dishes: Vec<ScoredDish>, mut choose: F) -> Result<TournamentResult, E>
where
    F: FnMut(&ScoredDish, &ScoredDish) -> Result<Pick, E>,
{
    let mut bracket = Bracket::new(dishes);

    while let Some((dish1, dish2)) = bracket.pending() {
        let pick = choose(dish1, dish2)?;
        // pending() just returned a match, so recording cannot fail
        if bracket.record(pick).is_err() {
            break;
        }
    }

    Ok(bracket.finish())
}

pub fn run_tournament(dishes: Vec<ScoredDish>) -> TournamentResult {
    let result: Result<TournamentResult, std::convert::Infallible> =
        run_tournament_with(dishes, |a, b| Ok(prefer_higher_score(a, b)));
    match result {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pairing {
    pub dish1: ScoredDish,
    pub dish2: ScoredDish,
}

/// Progress of a bracket replayed from a list of chosen winners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BracketState {
    pub matches: Vec<TournamentMatch>,
    /// Next pairing to decide, absent once the bracket is decided
    pub next_match: Option<Pairing>,
    pub result: Option<TournamentResult>,
}

/// Replay a bracket with the winners chosen so far, in match order.
///
/// Stops at the first undecided match. Rejected dishes (score 0) are
/// dropped before the bracket is seeded.
pub fn replay_tournament(
    dishes: Vec<ScoredDish>,
    winners: &[Uuid],
) -> Result<BracketState, TournamentError> {
    let liked: Vec<ScoredDish> = dishes.into_iter().filter(ScoredDish::is_liked).collect();
    let mut bracket = Bracket::new(liked);

    for winner in winners {
        bracket.record_winner(*winner)?;
    }

    if let Some((dish1, dish2)) = bracket.pending() {
        return Ok(BracketState {
            matches: bracket.matches().to_vec(),
            next_match: Some(Pairing {
                dish1: dish1.clone(),
                dish2: dish2.clone(),
            }),
            result: None,
        });
    }

    let result = bracket.finish();
    Ok(BracketState {
        matches: result.matches.clone(),
        next_match: None,
        result: Some(result),
    })
}

/// Order dishes by match wins, then by swipe score. Both descending.
pub fn create_ranking_from_matches(
    mut dishes: Vec<ScoredDish>,
    matches: &[TournamentMatch],
) -> Vec<ScoredDish> {
    let mut wins: HashMap<Uuid, usize> = dishes.iter().map(|d| (d.id(), 0)).collect();
    for m in matches {
        *wins.entry(m.winner.id()).or_insert(0) += 1;
    }

    dishes.sort_by(|a, b| {
        let a_wins = wins.get(&a.id()).copied().unwrap_or(0);
        let b_wins = wins.get(&b.id()).copied().unwrap_or(0);
        b_wins.cmp(&a_wins).then(b.score.cmp(&a.score))
    });

    dishes
}

pub fn top3(result: &TournamentResult) -> &[ScoredDish] {
    let end = result.ranked_dishes.len().min(3);
    &result.ranked_dishes[..end]
}

pub fn select_winner(top3: &[ScoredDish], index: usize) -> Result<&ScoredDish, TournamentError> {
    top3.get(index).ok_or(TournamentError::InvalidSelection {
        index,
        available: top3.len(),
    })
}

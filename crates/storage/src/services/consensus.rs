use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, Dish, DuelVote};
use crate::services::candidates::CandidateSet;
use crate::services::duels::duel_ids;

const UNDECIDED: &str = "Onbeslist";

/// Pair-wins credited to one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PairWins {
    pub dish_id: Uuid,
    pub wins: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CourseOutcome {
    pub winner: Option<Dish>,
    /// Candidates sharing the top pair-win count when there is no winner
    pub ties: Vec<Dish>,
    pub pair_wins: Vec<PairWins>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinalMenu {
    pub voor: Option<Dish>,
    pub hoofd: Option<Dish>,
    pub na: Option<Dish>,
}

impl FinalMenu {
    pub fn get(&self, course: Course) -> Option<&Dish> {
        match course {
            Course::Voor => self.voor.as_ref(),
            Course::Hoofd => self.hoofd.as_ref(),
            Course::Na => self.na.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        Course::ALL.iter().all(|c| self.get(*c).is_some())
    }

    /// `"{starter} / {main} / {dessert}"`, undecided courses included
    pub fn summary(&self) -> String {
        Course::ALL
            .iter()
            .map(|c| self.get(*c).map_or(UNDECIDED, |d| d.name.as_str()))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Text handed to the clipboard or a share sheet
    pub fn share_text(&self) -> String {
        let line = |course: Course, icon: &str| {
            format!(
                "{} {}",
                icon,
                self.get(course).map_or(UNDECIDED, |d| d.name.as_str())
            )
        };

        format!(
            "🍽️ Ons Dinner Tinder Menu:\n\n{}\n{}\n{}\n\nEet smakelijk! 🥂",
            line(Course::Voor, "🥗"),
            line(Course::Hoofd, "🥩"),
            line(Course::Na, "🍰"),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TieSets {
    pub voor: Vec<Dish>,
    pub hoofd: Vec<Dish>,
    pub na: Vec<Dish>,
}

impl TieSets {
    pub fn get(&self, course: Course) -> &[Dish] {
        match course {
            Course::Voor => &self.voor,
            Course::Hoofd => &self.hoofd,
            Course::Na => &self.na,
        }
    }

    pub fn is_empty(&self) -> bool {
        Course::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConsensusResolution {
    pub menu: FinalMenu,
    pub ties: TieSets,
    pub voor: CourseOutcome,
    pub hoofd: CourseOutcome,
    pub na: CourseOutcome,
}

impl ConsensusResolution {
    pub fn outcome(&self, course: Course) -> &CourseOutcome {
        match course {
            Course::Voor => &self.voor,
            Course::Hoofd => &self.hoofd,
            Course::Na => &self.na,
        }
    }
}

/// Winner of a single duel: the dish picked by a strict majority of the votes
/// cast for it. Split decisions credit nobody.
pub fn duel_winner<'a, I>(winners: I) -> Option<Uuid>
where
    I: IntoIterator<Item = &'a Uuid>,
{
    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    let mut cast = 0usize;
    for winner in winners {
        *counts.entry(*winner).or_insert(0) += 1;
        cast += 1;
    }

    counts
        .into_iter()
        .find(|(_, count)| count * 2 > cast)
        .map(|(dish_id, _)| dish_id)
}

/// Resolve one course from every participant's votes.
///
/// Only votes on duels between the current candidates count, so votes for
/// other courses or on pairings with a dish that has since dropped out are
/// ignored.
pub fn resolve_course(course: Course, candidates: &[Dish], votes: &[DuelVote]) -> CourseOutcome {
    if let [only] = candidates {
        return CourseOutcome {
            winner: Some(only.clone()),
            ties: Vec::new(),
            pair_wins: vec![PairWins {
                dish_id: only.id,
                wins: 0,
            }],
        };
    }

    let current = duel_ids(course, candidates);
    let mut by_duel: BTreeMap<&str, Vec<&Uuid>> = BTreeMap::new();
    for vote in votes.iter().filter(|v| current.contains(&v.duel_id)) {
        by_duel
            .entry(vote.duel_id.as_str())
            .or_default()
            .push(&vote.winner_id);
    }

    let mut wins: HashMap<Uuid, usize> = candidates.iter().map(|d| (d.id, 0)).collect();
    for duel_votes in by_duel.values() {
        if let Some(winner) = duel_winner(duel_votes.iter().copied())
            && let Some(count) = wins.get_mut(&winner)
        {
            *count += 1;
        }
    }

    let mut ranked: Vec<(&Dish, usize)> = candidates
        .iter()
        .map(|d| (d, wins.get(&d.id).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let pair_wins = ranked
        .iter()
        .map(|(d, w)| PairWins {
            dish_id: d.id,
            wins: *w,
        })
        .collect();

    let Some(&(_, top)) = ranked.first() else {
        return CourseOutcome::default();
    };

    let leaders: Vec<Dish> = ranked
        .iter()
        .take_while(|(_, w)| *w == top)
        .map(|(d, _)| (*d).clone())
        .collect();

    match leaders.as_slice() {
        [winner] => CourseOutcome {
            winner: Some(winner.clone()),
            ties: Vec::new(),
            pair_wins,
        },
        _ => CourseOutcome {
            winner: None,
            ties: leaders,
            pair_wins,
        },
    }
}

/// Recompute the shared menu from scratch
pub fn resolve(candidates: &CandidateSet, votes: &[DuelVote]) -> ConsensusResolution {
    let voor = resolve_course(Course::Voor, candidates.get(Course::Voor), votes);
    let hoofd = resolve_course(Course::Hoofd, candidates.get(Course::Hoofd), votes);
    let na = resolve_course(Course::Na, candidates.get(Course::Na), votes);

    ConsensusResolution {
        menu: FinalMenu {
            voor: voor.winner.clone(),
            hoofd: hoofd.winner.clone(),
            na: na.winner.clone(),
        },
        ties: TieSets {
            voor: voor.ties.clone(),
            hoofd: hoofd.ties.clone(),
            na: na.ties.clone(),
        },
        voor,
        hoofd,
        na,
    }
}

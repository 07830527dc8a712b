use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, Dish};

/// Identifier of an unordered pairing of two dishes within a course.
///
/// The two dish ids are put in lexicographic order before they are joined,
/// so participants enumerating duels independently, from candidate lists in
/// any order, land on the same key.
///
/// ```
/// use storage::models::Course;
/// use storage::services::duels::DuelId;
/// use uuid::Uuid;
///
/// let a = Uuid::from_u128(1);
/// let b = Uuid::from_u128(2);
/// assert_eq!(DuelId::new(Course::Voor, a, b), DuelId::new(Course::Voor, b, a));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DuelId(String);

impl DuelId {
    pub fn new(course: Course, a: Uuid, b: Uuid) -> Self {
        let (first, second) = canonical_pair(a, b);
        Self(format!("{}_{}_{}", course.as_str(), first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DuelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DuelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a.hyphenated().to_string() <= b.hyphenated().to_string() {
        (a, b)
    } else {
        (b, a)
    }
}

/// A pairing of two candidates, annotated with the caller's vote if any
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Duel {
    pub id: DuelId,
    pub course: Course,
    /// The candidate with the lexicographically smaller id
    pub dish_a: Dish,
    pub dish_b: Dish,
    pub winner_id: Option<Uuid>,
}

impl Duel {
    pub fn contains(&self, dish_id: Uuid) -> bool {
        self.dish_a.id == dish_id || self.dish_b.id == dish_id
    }

    pub fn is_voted(&self) -> bool {
        self.winner_id.is_some()
    }
}

/// Number of duels needed to compare `n` candidates pairwise
pub fn duel_count(n: usize) -> usize {
    if n < 2 { 0 } else { n * (n - 1) / 2 }
}

/// Ids of every duel that exists between `candidates`
pub fn duel_ids(course: Course, candidates: &[Dish]) -> HashSet<String> {
    let mut ids = HashSet::with_capacity(duel_count(candidates.len()));
    for (i, a) in candidates.iter().enumerate() {
        for b in candidates.iter().skip(i + 1) {
            ids.insert(DuelId::new(course, a.id, b.id).into_string());
        }
    }
    ids
}

/// Enumerate every unordered pair of `candidates`.
///
/// `my_votes` maps a duel id to the dish the caller picked; matching duels
/// carry that choice in `winner_id`.
pub fn generate_duels(
    course: Course,
    candidates: &[Dish],
    my_votes: &HashMap<String, Uuid>,
) -> Vec<Duel> {
    if candidates.len() < 2 {
        return Vec::new();
    }

    let mut duels = Vec::with_capacity(duel_count(candidates.len()));

    for (i, a) in candidates.iter().enumerate() {
        for b in candidates.iter().skip(i + 1) {
            let id = DuelId::new(course, a.id, b.id);
            let (first, second) = if canonical_pair(a.id, b.id).0 == a.id {
                (a, b)
            } else {
                (b, a)
            };

            duels.push(Duel {
                winner_id: my_votes.get(id.as_str()).copied(),
                id,
                course,
                dish_a: first.clone(),
                dish_b: second.clone(),
            });
        }
    }

    duels
}

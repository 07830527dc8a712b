use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Course, DuelVote};
use crate::services::candidates::CandidateSet;
use crate::services::duels::{duel_count, duel_ids};

/// Party size the readiness gate waits for unless configured otherwise
pub const DEFAULT_EXPECTED_PARTICIPANTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantProgress {
    pub user_name: String,
    pub completed_duels: usize,
    pub is_done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgressReport {
    pub total_needed: usize,
    pub expected_participants: usize,
    pub participants: Vec<ParticipantProgress>,
    pub everyone_ready: bool,
}

impl ProgressReport {
    pub fn participant(&self, user_name: &str) -> Option<&ParticipantProgress> {
        self.participants.iter().find(|p| p.user_name == user_name)
    }
}

/// Duels every participant has to vote on, summed over the three courses
pub fn total_needed(candidates: &CandidateSet) -> usize {
    Course::ALL
        .iter()
        .map(|c| duel_count(candidates.get(*c).len()))
        .sum()
}

/// A participant is done once candidates are known and they voted on at
/// least every required duel.
pub fn is_done(candidates_loaded: bool, completed_duels: usize, total_needed: usize) -> bool {
    candidates_loaded && completed_duels >= total_needed
}

fn valid_duel_ids(candidates: &CandidateSet) -> HashSet<String> {
    Course::ALL
        .into_iter()
        .flat_map(|course| duel_ids(course, candidates.get(course)))
        .collect()
}

/// Distinct participant names in sorted order
pub fn participants<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compute per-participant completion and the readiness gate.
///
/// Only votes on duels that exist for the current candidates count, so votes
/// left over from an earlier candidate set cannot complete a participant.
pub fn track(
    participants: &[String],
    votes: &[DuelVote],
    candidates: &CandidateSet,
    expected_participants: usize,
) -> ProgressReport {
    let total_needed = total_needed(candidates);
    let loaded = candidates.is_loaded();
    let valid = valid_duel_ids(candidates);

    let mut completed: HashMap<&str, usize> = HashMap::new();
    for vote in votes.iter().filter(|v| valid.contains(&v.duel_id)) {
        *completed.entry(vote.user_name.as_str()).or_insert(0) += 1;
    }

    let participants: Vec<ParticipantProgress> = participants
        .iter()
        .map(|name| {
            let completed_duels = completed.get(name.as_str()).copied().unwrap_or(0);
            ParticipantProgress {
                user_name: name.clone(),
                completed_duels,
                is_done: is_done(loaded, completed_duels, total_needed),
            }
        })
        .collect();

    let everyone_ready =
        participants.len() >= expected_participants && participants.iter().all(|p| p.is_done);

    ProgressReport {
        total_needed,
        expected_participants,
        participants,
        everyone_ready,
    }
}

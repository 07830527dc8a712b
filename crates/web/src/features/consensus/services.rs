use std::collections::HashMap;

use storage::{
    ConsensusStore,
    dto::consensus::{
        CandidatesResponse, CastVoteRequest, ProgressResponse, ShareResponse, VoteFilter,
    },
    error::StorageError,
    models::{Course, DuelVote, FinalMenuRecord, NewFinalMenu},
    services::{
        candidates::{CandidateSet, extract_candidates},
        consensus::{ConsensusResolution, resolve},
        duels::{Duel, generate_duels},
        progress::{ProgressReport, total_needed, track},
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::state::ConsensusSettings;

/// Everything the resolver and the progress tracker read, loaded together
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub candidates: CandidateSet,
    pub votes: Vec<DuelVote>,
    pub participants: Vec<String>,
}

impl Snapshot {
    pub async fn load<S>(store: &S) -> Result<Self, StorageError>
    where
        S: ConsensusStore + ?Sized,
    {
        let menus = store.list_user_menus().await?;
        let votes = store.list_duel_votes(None).await?;
        let participants = store.list_participants().await?;

        Ok(Self {
            candidates: extract_candidates(&menus),
            votes,
            participants,
        })
    }

    pub fn progress(&self, expected_participants: usize) -> ProgressReport {
        track(
            &self.participants,
            &self.votes,
            &self.candidates,
            expected_participants,
        )
    }

    pub fn resolve(&self) -> ConsensusResolution {
        resolve(&self.candidates, &self.votes)
    }

    /// The resolution, or a conflict while someone is still voting
    pub fn resolve_when_ready(&self, expected_participants: usize) -> WebResult<ConsensusResolution> {
        if !self.progress(expected_participants).everyone_ready {
            return Err(WebError::Conflict(
                "Not every participant has finished voting".to_string(),
            ));
        }
        Ok(self.resolve())
    }
}

pub async fn load_candidates<S>(store: &S) -> Result<CandidateSet, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let menus = store.list_user_menus().await?;
    Ok(extract_candidates(&menus))
}

/// duel id -> chosen dish, for one participant
pub async fn votes_of<S>(store: &S, user_name: &str) -> Result<HashMap<String, Uuid>, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let votes = store.list_duel_votes(Some(user_name)).await?;
    Ok(votes.into_iter().map(|v| (v.duel_id, v.winner_id)).collect())
}

pub async fn candidates<S>(store: &S) -> Result<CandidatesResponse, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let set = load_candidates(store).await?;
    let total_needed = total_needed(&set);

    Ok(CandidatesResponse {
        voor: set.voor,
        hoofd: set.hoofd,
        na: set.na,
        total_needed,
    })
}

/// Every duel of a course, annotated with the participant's own choices
pub async fn duels<S>(store: &S, course: Course, user_name: Option<&str>) -> Result<Vec<Duel>, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let set = load_candidates(store).await?;
    let my_votes = match user_name {
        Some(name) => votes_of(store, name).await?,
        None => HashMap::new(),
    };

    Ok(generate_duels(course, set.get(course), &my_votes))
}

pub async fn list_votes<S>(store: &S, filter: &VoteFilter) -> Result<Vec<DuelVote>, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    store.list_duel_votes(filter.user_name.as_deref()).await
}

/// Check a vote against the current candidates and store it
pub async fn cast_vote<S>(store: &S, req: CastVoteRequest) -> WebResult<DuelVote>
where
    S: ConsensusStore + ?Sized,
{
    req.validate_winner()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let set = load_candidates(store).await?;
    for dish_id in [req.dish_a_id, req.dish_b_id] {
        if set.find(req.course, dish_id).is_none() {
            return Err(WebError::BadRequest(format!(
                "Dish {} is not a candidate for {}",
                dish_id, req.course
            )));
        }
    }

    let mut vote = req.into_vote();
    vote.user_name = vote.user_name.trim().to_string();
    let stored = store.upsert_duel_vote(&vote).await?;
    tracing::debug!(user_name = %stored.user_name, duel_id = %stored.duel_id, "Vote stored");
    Ok(stored)
}

pub async fn progress<S>(store: &S, settings: ConsensusSettings) -> Result<ProgressResponse, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let snapshot = Snapshot::load(store).await?;

    Ok(ProgressResponse {
        report: snapshot.progress(settings.expected_participants),
        poll_interval_secs: settings.poll_interval_secs,
    })
}

/// Final menu and ties; refused until everyone is ready unless forced
pub async fn results<S>(store: &S, settings: ConsensusSettings, force: bool) -> WebResult<ConsensusResolution>
where
    S: ConsensusStore + ?Sized,
{
    let snapshot = Snapshot::load(store).await?;
    if force {
        return Ok(snapshot.resolve());
    }
    snapshot.resolve_when_ready(settings.expected_participants)
}

/// Persist a resolved menu with a JSON snapshot of it
pub async fn record_final_menu<S>(
    store: &S,
    resolution: &ConsensusResolution,
    event_key: Option<String>,
) -> Result<FinalMenuRecord, StorageError>
where
    S: ConsensusStore + ?Sized,
{
    let menu = &resolution.menu;
    let new_menu = NewFinalMenu {
        event_key,
        starter_id: menu.voor.as_ref().map(|d| d.id),
        main_id: menu.hoofd.as_ref().map(|d| d.id),
        dessert_id: menu.na.as_ref().map(|d| d.id),
        final_text: serde_json::to_string(resolution)?,
    };

    let record = store.insert_final_menu(&new_menu).await?;
    tracing::info!(final_menu_id = %record.id, summary = %menu.summary(), "Final menu confirmed");
    Ok(record)
}

pub async fn confirm<S>(
    store: &S,
    settings: ConsensusSettings,
    event_key: Option<String>,
) -> WebResult<FinalMenuRecord>
where
    S: ConsensusStore + ?Sized,
{
    let snapshot = Snapshot::load(store).await?;
    let resolution = snapshot.resolve_when_ready(settings.expected_participants)?;
    Ok(record_final_menu(store, &resolution, event_key).await?)
}

pub async fn share<S>(store: &S, settings: ConsensusSettings) -> WebResult<ShareResponse>
where
    S: ConsensusStore + ?Sized,
{
    let snapshot = Snapshot::load(store).await?;
    let resolution = snapshot.resolve_when_ready(settings.expected_participants)?;

    Ok(ShareResponse {
        summary: resolution.menu.summary(),
        text: resolution.menu.share_text(),
    })
}

#[cfg(test)]
mod tests {
    use storage::MemoryStore;
    use storage::models::Dish;

    use super::*;
    use crate::test_support::{dish, submission};

    const SETTINGS: ConsensusSettings = ConsensusSettings {
        expected_participants: 3,
        poll_interval_secs: 3,
    };

    /// Three participants: two distinct starters, one shared main, one shared dessert
    async fn party() -> (MemoryStore, Dish, Dish) {
        let s1 = dish(Course::Voor, 1, "Carpaccio");
        let s2 = dish(Course::Voor, 2, "Tomatensoep");
        let store = MemoryStore::with_dishes([
            s1.clone(),
            s2.clone(),
            dish(Course::Hoofd, 10, "Stamppot"),
            dish(Course::Na, 20, "Tiramisu"),
        ]);

        store.insert_user_menu(&submission("anna", 1, 10, 20)).await.unwrap();
        store.insert_user_menu(&submission("bram", 2, 10, 20)).await.unwrap();
        store.insert_user_menu(&submission("cees", 1, 10, 20)).await.unwrap();

        (store, s1, s2)
    }

    fn ballot(user: &str, a: &Dish, b: &Dish, winner: &Dish) -> CastVoteRequest {
        CastVoteRequest {
            user_name: user.to_string(),
            course: a.category,
            dish_a_id: a.id,
            dish_b_id: b.id,
            winner_id: winner.id,
        }
    }

    #[tokio::test]
    async fn test_candidates_and_duels() {
        let (store, s1, s2) = party().await;

        let response = candidates(&store).await.unwrap();
        assert_eq!(response.voor.len(), 2);
        assert_eq!(response.total_needed, 1);

        let open = duels(&store, Course::Voor, Some("anna")).await.unwrap();
        assert_eq!(open.len(), 1);
        assert!(open[0].winner_id.is_none());

        cast_vote(&store, ballot("anna", &s2, &s1, &s2)).await.unwrap();
        let voted = duels(&store, Course::Voor, Some("anna")).await.unwrap();
        assert_eq!(voted[0].winner_id, Some(s2.id));
        assert!(duels(&store, Course::Hoofd, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vote_on_non_candidate_is_rejected() {
        let (store, s1, _) = party().await;
        let outsider = dish(Course::Voor, 3, "Bitterballen");
        store.add_dish(outsider.clone());

        let err = cast_vote(&store, ballot("anna", &s1, &outsider, &s1))
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::BadRequest(_)));

        let err = cast_vote(&store, ballot("anna", &s1, &s1, &s1)).await.unwrap_err();
        assert!(matches!(err, WebError::BadRequest(_)));
        assert!(store.list_duel_votes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_results_gated_until_everyone_voted() {
        let (store, s1, s2) = party().await;

        cast_vote(&store, ballot("anna", &s1, &s2, &s1)).await.unwrap();
        cast_vote(&store, ballot("bram", &s1, &s2, &s2)).await.unwrap();

        let report = progress(&store, SETTINGS).await.unwrap();
        assert_eq!(report.poll_interval_secs, 3);
        assert!(!report.report.everyone_ready);
        assert!(matches!(
            results(&store, SETTINGS, false).await,
            Err(WebError::Conflict(_))
        ));

        // forced results show the current split as a tie
        let forced = results(&store, SETTINGS, true).await.unwrap();
        assert!(forced.menu.voor.is_none());
        assert_eq!(forced.ties.voor.len(), 2);

        cast_vote(&store, ballot("cees", &s2, &s1, &s1)).await.unwrap();
        let resolution = results(&store, SETTINGS, false).await.unwrap();
        assert_eq!(resolution.menu.voor.as_ref().map(|d| d.id), Some(s1.id));
        assert_eq!(resolution.menu.hoofd.as_ref().map(|d| d.name.as_str()), Some("Stamppot"));
        assert!(resolution.ties.is_empty());

        let shared = share(&store, SETTINGS).await.unwrap();
        assert_eq!(shared.summary, "Carpaccio / Stamppot / Tiramisu");
        assert!(shared.text.contains("Carpaccio"));
    }

    #[tokio::test]
    async fn test_confirm_stores_snapshot() {
        let (store, s1, s2) = party().await;
        for user in ["anna", "bram", "cees"] {
            cast_vote(&store, ballot(user, &s1, &s2, &s2)).await.unwrap();
        }

        let first = confirm(&store, SETTINGS, Some("vrijdag".to_string())).await.unwrap();
        assert_eq!(first.starter_id, Some(s2.id));
        let snapshot: ConsensusResolution = serde_json::from_str(&first.final_text).unwrap();
        assert_eq!(snapshot.menu.voor.map(|d| d.id), Some(s2.id));

        let again = confirm(&store, SETTINGS, Some("vrijdag".to_string())).await.unwrap();
        assert_eq!(first.id, again.id);
    }

    #[tokio::test]
    async fn test_confirm_refused_before_ready() {
        let (store, _, _) = party().await;
        assert!(matches!(
            confirm(&store, SETTINGS, None).await,
            Err(WebError::Conflict(_))
        ));
    }
}

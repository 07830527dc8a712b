use storage::{
    ConsensusStore,
    dto::{
        consensus::ShareResponse,
        session::{OpenDuelRequest, SessionResponse},
    },
    models::{Course, FinalMenuRecord},
    services::{
        candidates::CandidateSet,
        duels::{Duel, DuelId, generate_duels},
        progress::ProgressReport,
        session::{ConsensusSession, View},
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};
use crate::features::consensus::services::{
    Snapshot, load_candidates, record_final_menu, votes_of,
};
use crate::state::{ConsensusSettings, Registry};

async fn respond<S>(
    store: &S,
    session: &ConsensusSession,
    progress: Option<ProgressReport>,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let duels = match session.view {
        View::DuelSelect { course } => {
            let candidates = load_candidates(store).await?;
            generate_duels(course, candidates.get(course), &session.my_votes)
        }
        _ => Vec::new(),
    };

    Ok(SessionResponse {
        session: session.clone(),
        duels,
        progress,
    })
}

/// The duel between two current candidates, whatever order they are given in
fn find_duel(candidates: &CandidateSet, req: &OpenDuelRequest) -> Option<Duel> {
    let course = Course::ALL.into_iter().find(|c| {
        candidates.find(*c, req.dish_a_id).is_some() && candidates.find(*c, req.dish_b_id).is_some()
    })?;
    let id = DuelId::new(course, req.dish_a_id, req.dish_b_id);

    generate_duels(course, candidates.get(course), &Default::default())
        .into_iter()
        .find(|duel| duel.id == id)
}

/// Start a session, picking up votes the participant already cast
pub async fn create_session<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    user_name: &str,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let user_name = user_name.trim();
    let my_votes = votes_of(store, user_name).await?;
    let session = ConsensusSession::new(user_name, my_votes);
    sessions.insert(session.id, session.clone()).await;

    tracing::info!(session_id = %session.id, user_name = %session.user_name, "Session started");
    respond(store, &session, None).await
}

pub async fn get_session<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let session = entry.lock().await;
    respond(store, &session, None).await
}

pub async fn delete_session(sessions: &Registry<ConsensusSession>, id: Uuid) -> WebResult<()> {
    if sessions.remove(id).await {
        Ok(())
    } else {
        Err(WebError::NotFound)
    }
}

pub async fn select_course<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
    course: Course,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;
    session.select_course(course)?;
    respond(store, &session, None).await
}

pub async fn back_to_dashboard<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;
    session.back_to_dashboard()?;
    respond(store, &session, None).await
}

pub async fn open_duel<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
    req: &OpenDuelRequest,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let candidates = load_candidates(store).await?;
    let duel = find_duel(&candidates, req).ok_or_else(|| {
        WebError::BadRequest("Both dishes must be candidates of the same course".to_string())
    })?;

    let mut session = entry.lock().await;
    session.open_duel(duel)?;
    respond(store, &session, None).await
}

/// Store the vote first; the session only moves on once it is persisted
pub async fn vote<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
    winner_id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;

    let vote = session.prepare_vote(winner_id)?;
    let stored = store.upsert_duel_vote(&vote).await?;
    session.commit_vote(&stored)?;

    tracing::debug!(session_id = %id, duel_id = %stored.duel_id, "Session vote stored");
    respond(store, &session, None).await
}

pub async fn cancel<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;
    session.cancel()?;
    respond(store, &session, None).await
}

pub async fn enter_waiting<S>(
    store: &S,
    settings: ConsensusSettings,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;
    session.enter_waiting()?;

    let snapshot = Snapshot::load(store).await?;
    let progress = snapshot.progress(settings.expected_participants);
    respond(store, &session, Some(progress)).await
}

/// Resolve and show the final menu once everyone is ready
pub async fn reveal<S>(
    store: &S,
    settings: ConsensusSettings,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
) -> WebResult<SessionResponse>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;

    let snapshot = Snapshot::load(store).await?;
    let progress = snapshot.progress(settings.expected_participants);
    session.reveal(&progress, || snapshot.resolve())?;

    respond(store, &session, Some(progress)).await
}

/// Persist the revealed menu; repeated confirms return the first record
pub async fn confirm<S>(
    store: &S,
    sessions: &Registry<ConsensusSession>,
    id: Uuid,
    event_key: Option<String>,
) -> WebResult<FinalMenuRecord>
where
    S: ConsensusStore + ?Sized,
{
    let entry = sessions.fetch(id).await?;
    let mut session = entry.lock().await;

    if let Some(record) = &session.confirmed {
        return Ok(record.clone());
    }

    let resolution = session.require_final("confirm")?.clone();
    let record = record_final_menu(store, &resolution, event_key).await?;
    session.mark_confirmed(record.clone())?;
    Ok(record)
}

pub async fn share(sessions: &Registry<ConsensusSession>, id: Uuid) -> WebResult<ShareResponse> {
    let entry = sessions.fetch(id).await?;
    let session = entry.lock().await;

    let summary = session.require_final("share")?.menu.summary();
    let text = session.share_text()?;
    Ok(ShareResponse { summary, text })
}

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, DuelVote, FinalMenuRecord};
use crate::services::consensus::ConsensusResolution;
use crate::services::duels::Duel;
use crate::services::progress::ProgressReport;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while in {view}")]
    InvalidTransition {
        action: &'static str,
        view: &'static str,
    },

    #[error("Duel {0} was already voted on")]
    AlreadyVoted(String),

    #[error("Duel {duel} belongs to {actual}, not {expected}")]
    CourseMismatch {
        duel: String,
        expected: Course,
        actual: Course,
    },

    #[error("Dish {0} is not part of the active duel")]
    InvalidWinner(Uuid),

    #[error("Not every participant has finished voting")]
    NotReady,
}

/// Screen a participant is on during the consensus flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Dashboard,
    DuelSelect { course: Course },
    DuelVote { course: Course, duel: Duel },
    Waiting,
    Final { resolution: ConsensusResolution },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::DuelSelect { .. } => "duel_select",
            Self::DuelVote { .. } => "duel_vote",
            Self::Waiting => "waiting",
            Self::Final { .. } => "final",
        }
    }
}

/// Per-participant navigation state for the consensus flow.
///
/// Lives from the moment a participant joins until they leave; never
/// persisted. Votes are only recorded here after the store accepted them.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsensusSession {
    pub id: Uuid,
    pub user_name: String,
    pub view: View,
    /// duel id -> chosen dish
    pub my_votes: HashMap<String, Uuid>,
    pub confirmed: Option<FinalMenuRecord>,
    pub created_at: NaiveDateTime,
}

impl ConsensusSession {
    pub fn new(user_name: impl Into<String>, my_votes: HashMap<String, Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            view: View::Dashboard,
            my_votes,
            confirmed: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            view: self.view.name(),
        }
    }

    pub fn select_course(&mut self, course: Course) -> Result<(), SessionError> {
        match self.view {
            View::Dashboard | View::DuelSelect { .. } => {
                self.view = View::DuelSelect { course };
                Ok(())
            }
            _ => Err(self.invalid("select a course")),
        }
    }

    pub fn back_to_dashboard(&mut self) -> Result<(), SessionError> {
        match self.view {
            View::Dashboard | View::DuelSelect { .. } | View::Waiting => {
                self.view = View::Dashboard;
                Ok(())
            }
            _ => Err(self.invalid("return to the dashboard")),
        }
    }

    /// Open an unvoted duel of the selected course
    pub fn open_duel(&mut self, duel: Duel) -> Result<(), SessionError> {
        let View::DuelSelect { course } = self.view else {
            return Err(self.invalid("open a duel"));
        };

        if duel.course != course {
            return Err(SessionError::CourseMismatch {
                duel: duel.id.into_string(),
                expected: course,
                actual: duel.course,
            });
        }

        if self.my_votes.contains_key(duel.id.as_str()) {
            return Err(SessionError::AlreadyVoted(duel.id.into_string()));
        }

        self.view = View::DuelVote { course, duel };
        Ok(())
    }

    /// Build the vote for the active duel. The view does not change until
    /// [`ConsensusSession::commit_vote`] is called with the stored vote.
    pub fn prepare_vote(&self, winner_id: Uuid) -> Result<DuelVote, SessionError> {
        let View::DuelVote { course, duel } = &self.view else {
            return Err(self.invalid("vote"));
        };

        if !duel.contains(winner_id) {
            return Err(SessionError::InvalidWinner(winner_id));
        }

        Ok(DuelVote {
            user_name: self.user_name.clone(),
            course: *course,
            duel_id: duel.id.to_string(),
            dish_a_id: duel.dish_a.id,
            dish_b_id: duel.dish_b.id,
            winner_id,
        })
    }

    pub fn commit_vote(&mut self, vote: &DuelVote) -> Result<(), SessionError> {
        let View::DuelVote { course, duel } = &self.view else {
            return Err(self.invalid("record a vote"));
        };

        if duel.id.as_str() != vote.duel_id {
            return Err(self.invalid("record a vote for another duel"));
        }

        let course = *course;
        self.my_votes.insert(vote.duel_id.clone(), vote.winner_id);
        self.view = View::DuelSelect { course };
        Ok(())
    }

    /// Leave the active duel without voting
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let View::DuelVote { course, .. } = &self.view else {
            return Err(self.invalid("cancel"));
        };

        self.view = View::DuelSelect { course: *course };
        Ok(())
    }

    pub fn enter_waiting(&mut self) -> Result<(), SessionError> {
        match self.view {
            View::Dashboard | View::Waiting => {
                self.view = View::Waiting;
                Ok(())
            }
            _ => Err(self.invalid("wait for the others")),
        }
    }

    /// Move to the final reveal once the readiness gate is open.
    ///
    /// `resolve` is only invoked when the gate is open.
    pub fn reveal<F>(&mut self, progress: &ProgressReport, resolve: F) -> Result<(), SessionError>
    where
        F: FnOnce() -> ConsensusResolution,
    {
        if !matches!(self.view, View::Waiting) {
            return Err(self.invalid("reveal the results"));
        }

        if !progress.everyone_ready {
            return Err(SessionError::NotReady);
        }

        self.view = View::Final {
            resolution: resolve(),
        };
        Ok(())
    }

    pub fn resolution(&self) -> Option<&ConsensusResolution> {
        match &self.view {
            View::Final { resolution } => Some(resolution),
            _ => None,
        }
    }

    /// The revealed resolution, or an error naming the refused action
    pub fn require_final(&self, action: &'static str) -> Result<&ConsensusResolution, SessionError> {
        self.resolution().ok_or_else(|| self.invalid(action))
    }

    /// Remember the stored record so repeated confirms reuse it
    pub fn mark_confirmed(&mut self, record: FinalMenuRecord) -> Result<(), SessionError> {
        self.require_final("confirm")?;
        self.confirmed = Some(record);
        Ok(())
    }

    pub fn share_text(&self) -> Result<String, SessionError> {
        self.require_final("share").map(|r| r.menu.share_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dish;
    use crate::services::candidates::CandidateSet;
    use crate::services::consensus::resolve;
    use crate::services::duels::generate_duels;
    use crate::services::fixtures::{dish, vote};
    use crate::services::progress::track;

    fn starters() -> Vec<Dish> {
        vec![dish(Course::Voor, 1, "S1"), dish(Course::Voor, 2, "S2")]
    }

    fn first_duel(session: &ConsensusSession) -> Duel {
        generate_duels(Course::Voor, &starters(), &session.my_votes)
            .into_iter()
            .next()
            .unwrap()
    }

    fn ready_report(ready: bool) -> ProgressReport {
        ProgressReport {
            total_needed: 1,
            expected_participants: 1,
            participants: Vec::new(),
            everyone_ready: ready,
        }
    }

    #[test]
    fn test_vote_flow_returns_to_duel_select() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        session.select_course(Course::Voor).unwrap();

        let duel = first_duel(&session);
        session.open_duel(duel.clone()).unwrap();
        assert_eq!(session.view.name(), "duel_vote");

        let vote = session.prepare_vote(duel.dish_b.id).unwrap();
        assert_eq!(vote.user_name, "anna");
        assert_eq!(vote.duel_id, duel.id.as_str());
        // nothing is recorded before the vote is committed
        assert!(session.my_votes.is_empty());

        session.commit_vote(&vote).unwrap();
        assert_eq!(session.view, View::DuelSelect { course: Course::Voor });
        assert_eq!(session.my_votes.get(duel.id.as_str()), Some(&duel.dish_b.id));
    }

    #[test]
    fn test_voted_duels_are_inert() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        session.select_course(Course::Voor).unwrap();
        let duel = first_duel(&session);
        session.my_votes.insert(duel.id.to_string(), duel.dish_a.id);

        let err = session.open_duel(duel).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyVoted(_)));
        assert_eq!(session.view, View::DuelSelect { course: Course::Voor });
    }

    #[test]
    fn test_cancel_discards_choice() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        session.select_course(Course::Voor).unwrap();
        let duel = first_duel(&session);
        session.open_duel(duel).unwrap();

        session.cancel().unwrap();
        assert_eq!(session.view, View::DuelSelect { course: Course::Voor });
        assert!(session.my_votes.is_empty());
    }

    #[test]
    fn test_rejects_foreign_winner_and_wrong_course() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        session.select_course(Course::Hoofd).unwrap();
        let duel = first_duel(&session);
        assert!(matches!(
            session.open_duel(duel.clone()),
            Err(SessionError::CourseMismatch { .. })
        ));

        session.select_course(Course::Voor).unwrap();
        session.open_duel(duel).unwrap();
        assert_eq!(
            session.prepare_vote(Uuid::from_u128(42)),
            Err(SessionError::InvalidWinner(Uuid::from_u128(42)))
        );
    }

    #[test]
    fn test_reveal_requires_waiting_and_readiness() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        assert!(matches!(
            session.reveal(&ready_report(true), ConsensusResolution::default),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.enter_waiting().unwrap();
        assert_eq!(
            session.reveal(&ready_report(false), ConsensusResolution::default),
            Err(SessionError::NotReady)
        );
        assert_eq!(session.view, View::Waiting);

        let candidates = CandidateSet {
            voor: starters(),
            ..CandidateSet::default()
        };
        let anna = ["anna".to_string()];
        let report = track(&anna, &[], &candidates, 1);
        assert_eq!(
            session.reveal(&report, || resolve(&candidates, &[])),
            Err(SessionError::NotReady)
        );

        let s = starters();
        let votes = vec![vote("anna", Course::Voor, &s[0], &s[1], &s[1])];
        let report = track(&anna, &votes, &candidates, 1);
        assert!(report.everyone_ready);

        session
            .reveal(&report, || resolve(&candidates, &votes))
            .unwrap();
        let resolution = session.resolution().unwrap();
        assert_eq!(resolution.menu.voor.as_ref().map(|d| d.id), Some(s[1].id));
        assert!(session.share_text().unwrap().contains("🥗 S2"));
    }

    #[test]
    fn test_final_is_terminal() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        session.enter_waiting().unwrap();
        session
            .reveal(&ready_report(true), ConsensusResolution::default)
            .unwrap();

        assert!(session.back_to_dashboard().is_err());
        assert!(session.select_course(Course::Na).is_err());
        assert!(session.enter_waiting().is_err());
        // share is repeatable
        assert_eq!(session.share_text(), session.share_text());
    }

    #[test]
    fn test_confirm_only_in_final() {
        let mut session = ConsensusSession::new("anna", HashMap::new());
        let record = FinalMenuRecord {
            id: Uuid::new_v4(),
            event_key: None,
            starter_id: None,
            main_id: None,
            dessert_id: None,
            final_text: "{}".to_string(),
            created_at: NaiveDateTime::default(),
        };

        assert!(session.mark_confirmed(record.clone()).is_err());
        session.enter_waiting().unwrap();
        session
            .reveal(&ready_report(true), ConsensusResolution::default)
            .unwrap();
        session.mark_confirmed(record.clone()).unwrap();
        assert_eq!(session.confirmed.as_ref().map(|r| r.id), Some(record.id));
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use chrono::{NaiveDateTime, Utc};
use storage::Database;
use storage::services::draft::MenuDraft;
use storage::services::session::ConsensusSession;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{WebError, WebResult};

/// Readiness gate and polling hints shared by the consensus endpoints
#[derive(Debug, Clone, Copy)]
pub struct ConsensusSettings {
    pub expected_participants: usize,
    pub poll_interval_secs: u64,
}

impl From<&Config> for ConsensusSettings {
    fn from(config: &Config) -> Self {
        Self {
            expected_participants: config.expected_participants,
            poll_interval_secs: config.poll_interval_secs,
        }
    }
}

/// Entries that can be swept once they are old enough
pub trait Expiring {
    fn created_at(&self) -> NaiveDateTime;
}

impl Expiring for ConsensusSession {
    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl Expiring for MenuDraft {
    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

/// In-memory entries keyed by id.
///
/// Each entry has its own lock so a slow request on one session never
/// blocks the others.
#[derive(Debug)]
pub struct Registry<T> {
    entries: Arc<RwLock<HashMap<Uuid, Arc<Mutex<T>>>>>,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Registry<T> {
    pub async fn insert(&self, id: Uuid, value: T) -> Arc<Mutex<T>> {
        let entry = Arc::new(Mutex::new(value));
        self.entries.write().await.insert(id, Arc::clone(&entry));
        entry
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<T>>> {
        self.entries.read().await.get(&id).cloned()
    }

    /// Like [`Registry::get`], with unknown ids reported as not found
    pub async fn fetch(&self, id: Uuid) -> WebResult<Arc<Mutex<T>>> {
        self.get(id).await.ok_or(WebError::NotFound)
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }
}

impl<T: Expiring> Registry<T> {
    /// Drop entries created before `cutoff`. Entries locked by a request in
    /// flight are kept until the next sweep.
    pub async fn sweep(&self, cutoff: NaiveDateTime) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| match entry.try_lock() {
            Ok(value) => value.created_at() >= cutoff,
            Err(_) => true,
        });
        before - entries.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: ConsensusSettings,
    pub sessions: Registry<ConsensusSession>,
    pub drafts: Registry<MenuDraft>,
}

impl AppState {
    pub fn new(db: Database, settings: ConsensusSettings) -> Self {
        Self {
            db,
            settings,
            sessions: Registry::default(),
            drafts: Registry::default(),
        }
    }

    /// Drop sessions and drafts older than `max_age`
    pub async fn sweep_expired(&self, max_age: chrono::Duration) {
        let Some(cutoff) = Utc::now().naive_utc().checked_sub_signed(max_age) else {
            return;
        };
        let sessions = self.sessions.sweep(cutoff).await;
        let drafts = self.drafts.sweep(cutoff).await;
        if sessions + drafts > 0 {
            tracing::info!(sessions, drafts, "Swept expired entries");
        }
    }
}

/// Sweep expired sessions and drafts in the background for the lifetime of
/// the process
pub fn spawn_sweeper(state: AppState, ttl: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Ok(max_age) = chrono::Duration::from_std(ttl) else {
            tracing::warn!(?ttl, "Session TTL out of range, sweeping disabled");
            return;
        };
        let mut ticker = tokio::time::interval((ttl / 4).max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            state.sweep_expired(max_age).await;
        }
    })
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for ConsensusSettings {
    fn from_ref(state: &AppState) -> Self {
        state.settings
    }
}

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::dish::DishRepository;
use super::duel_vote::DuelVoteRepository;
use super::final_menu::FinalMenuRepository;
use super::user_menu::UserMenuRepository;
use crate::dto::menu::SubmitMenuRequest;
use crate::error::{Result, StorageError};
use crate::models::{
    Course, Dish, DuelVote, FinalMenuRecord, NewFinalMenu, UserMenu, UserMenuWithDishes,
};
use crate::services::progress::participants;

/// Persistence needed by the menu and consensus flows
#[async_trait]
pub trait ConsensusStore: Send + Sync {
    async fn list_dishes(&self, category: Option<Course>) -> Result<Vec<Dish>>;

    async fn list_user_menus(&self) -> Result<Vec<UserMenuWithDishes>>;

    async fn list_participants(&self) -> Result<Vec<String>>;

    async fn insert_user_menu(&self, req: &SubmitMenuRequest) -> Result<UserMenu>;

    async fn list_duel_votes(&self, user_name: Option<&str>) -> Result<Vec<DuelVote>>;

    /// Last write wins per `(user_name, course, duel_id)`
    async fn upsert_duel_vote(&self, vote: &DuelVote) -> Result<DuelVote>;

    async fn insert_final_menu(&self, menu: &NewFinalMenu) -> Result<FinalMenuRecord>;
}

/// [`ConsensusStore`] backed by the Postgres repositories
pub struct PgConsensusStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgConsensusStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsensusStore for PgConsensusStore<'_> {
    async fn list_dishes(&self, category: Option<Course>) -> Result<Vec<Dish>> {
        DishRepository::new(self.pool).list(category).await
    }

    async fn list_user_menus(&self) -> Result<Vec<UserMenuWithDishes>> {
        UserMenuRepository::new(self.pool).list_with_dishes().await
    }

    async fn list_participants(&self) -> Result<Vec<String>> {
        UserMenuRepository::new(self.pool).participants().await
    }

    async fn insert_user_menu(&self, req: &SubmitMenuRequest) -> Result<UserMenu> {
        UserMenuRepository::new(self.pool).insert(req).await
    }

    async fn list_duel_votes(&self, user_name: Option<&str>) -> Result<Vec<DuelVote>> {
        DuelVoteRepository::new(self.pool).list(user_name).await
    }

    async fn upsert_duel_vote(&self, vote: &DuelVote) -> Result<DuelVote> {
        DuelVoteRepository::new(self.pool).upsert(vote).await
    }

    async fn insert_final_menu(&self, menu: &NewFinalMenu) -> Result<FinalMenuRecord> {
        FinalMenuRepository::new(self.pool).insert(menu).await
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    dishes: Vec<Dish>,
    menus: Vec<UserMenu>,
    votes: Vec<DuelVote>,
    final_menus: Vec<FinalMenuRecord>,
}

/// In-process [`ConsensusStore`] with the same semantics as Postgres
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dishes(dishes: impl IntoIterator<Item = Dish>) -> Self {
        let store = Self::new();
        store.lock().dishes.extend(dishes);
        store
    }

    pub fn add_dish(&self, dish: Dish) {
        self.lock().dishes.push(dish);
    }

    /// Drop a dish; menus keep their row with the slot cleared
    pub fn remove_dish(&self, id: Uuid) -> bool {
        let mut state = self.lock();
        let before = state.dishes.len();
        state.dishes.retain(|d| d.id != id);

        for menu in &mut state.menus {
            for slot in [&mut menu.starter_id, &mut menu.main_id, &mut menu.dessert_id] {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
        }

        state.dishes.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ConsensusStore for MemoryStore {
    async fn list_dishes(&self, category: Option<Course>) -> Result<Vec<Dish>> {
        let state = self.lock();
        let mut dishes: Vec<Dish> = state
            .dishes
            .iter()
            .filter(|d| category.is_none_or(|c| d.category == c))
            .cloned()
            .collect();
        dishes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(dishes)
    }

    async fn list_user_menus(&self) -> Result<Vec<UserMenuWithDishes>> {
        let state = self.lock();
        let find = |id: Option<Uuid>| id.and_then(|id| state.dishes.iter().find(|d| d.id == id).cloned());

        Ok(state
            .menus
            .iter()
            .rev()
            .map(|m| UserMenuWithDishes {
                id: m.id,
                user_name: m.user_name.clone(),
                starter: find(m.starter_id),
                main: find(m.main_id),
                dessert: find(m.dessert_id),
                created_at: m.created_at,
            })
            .collect())
    }

    async fn list_participants(&self) -> Result<Vec<String>> {
        let state = self.lock();
        Ok(participants(state.menus.iter().map(|m| m.user_name.as_str())))
    }

    async fn insert_user_menu(&self, req: &SubmitMenuRequest) -> Result<UserMenu> {
        let mut state = self.lock();
        let known = |id: Uuid| state.dishes.iter().any(|d| d.id == id);
        if ![req.starter_id, req.main_id, req.dessert_id].into_iter().all(known) {
            return Err(StorageError::ConstraintViolation(
                "Menu references an unknown dish".to_string(),
            ));
        }

        let menu = UserMenu {
            id: Uuid::new_v4(),
            user_name: req.user_name.trim().to_string(),
            starter_id: Some(req.starter_id),
            main_id: Some(req.main_id),
            dessert_id: Some(req.dessert_id),
            created_at: Utc::now().naive_utc(),
        };
        state.menus.push(menu.clone());
        Ok(menu)
    }

    async fn list_duel_votes(&self, user_name: Option<&str>) -> Result<Vec<DuelVote>> {
        let state = self.lock();
        let mut votes: Vec<DuelVote> = state
            .votes
            .iter()
            .filter(|v| user_name.is_none_or(|u| v.user_name == u))
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.conflict_key().cmp(&b.conflict_key()));
        Ok(votes)
    }

    async fn upsert_duel_vote(&self, vote: &DuelVote) -> Result<DuelVote> {
        if !vote.winner_is_contender() {
            return Err(StorageError::ConstraintViolation(
                "Winner must be one of the two dishes".to_string(),
            ));
        }

        let mut state = self.lock();
        match state
            .votes
            .iter_mut()
            .find(|v| v.conflict_key() == vote.conflict_key())
        {
            Some(existing) => *existing = vote.clone(),
            None => state.votes.push(vote.clone()),
        }
        Ok(vote.clone())
    }

    async fn insert_final_menu(&self, menu: &NewFinalMenu) -> Result<FinalMenuRecord> {
        let mut state = self.lock();

        if let Some(key) = menu.event_key.as_deref()
            && let Some(existing) = state
                .final_menus
                .iter()
                .find(|r| r.event_key.as_deref() == Some(key))
        {
            return Ok(existing.clone());
        }

        let record = FinalMenuRecord {
            id: Uuid::new_v4(),
            event_key: menu.event_key.clone(),
            starter_id: menu.starter_id,
            main_id: menu.main_id,
            dessert_id: menu.dessert_id,
            final_text: menu.final_text.clone(),
            created_at: Utc::now().naive_utc(),
        };
        state.final_menus.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{dish, vote};

    fn seeded() -> (MemoryStore, Vec<Dish>) {
        let dishes = vec![
            dish(Course::Voor, 1, "Soep"),
            dish(Course::Hoofd, 2, "Stamppot"),
            dish(Course::Na, 3, "Vla"),
        ];
        (MemoryStore::with_dishes(dishes.clone()), dishes)
    }

    fn submit(user_name: &str, d: &[Dish]) -> SubmitMenuRequest {
        SubmitMenuRequest {
            user_name: user_name.to_string(),
            starter_id: d[0].id,
            main_id: d[1].id,
            dessert_id: d[2].id,
        }
    }

    #[tokio::test]
    async fn test_menus_join_dishes_newest_first() {
        let (store, d) = seeded();
        store.insert_user_menu(&submit("anna", &d)).await.unwrap();
        store.insert_user_menu(&submit(" bram ", &d)).await.unwrap();

        let menus = store.list_user_menus().await.unwrap();
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].user_name, "bram");
        assert_eq!(menus[1].main.as_ref().map(|m| m.name.as_str()), Some("Stamppot"));

        assert_eq!(store.list_participants().await.unwrap(), vec!["anna", "bram"]);
    }

    #[tokio::test]
    async fn test_menu_with_unknown_dish_is_rejected() {
        let (store, mut d) = seeded();
        d[2] = dish(Course::Na, 99, "Onbekend");
        let err = store.insert_user_menu(&submit("anna", &d)).await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_removed_dish_clears_menu_slot() {
        let (store, d) = seeded();
        store.insert_user_menu(&submit("anna", &d)).await.unwrap();
        assert!(store.remove_dish(d[1].id));

        let menus = store.list_user_menus().await.unwrap();
        assert!(menus[0].main.is_none());
        assert!(menus[0].starter.is_some());
    }

    #[tokio::test]
    async fn test_vote_upsert_replaces_previous_choice() {
        let (store, _) = seeded();
        let a = dish(Course::Voor, 10, "A");
        let b = dish(Course::Voor, 11, "B");

        store.upsert_duel_vote(&vote("anna", Course::Voor, &a, &b, &a)).await.unwrap();
        store.upsert_duel_vote(&vote("anna", Course::Voor, &b, &a, &b)).await.unwrap();
        store.upsert_duel_vote(&vote("bram", Course::Voor, &a, &b, &a)).await.unwrap();

        let anna = store.list_duel_votes(Some("anna")).await.unwrap();
        assert_eq!(anna.len(), 1);
        assert_eq!(anna[0].winner_id, b.id);
        assert_eq!(store.list_duel_votes(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_vote_for_outsider_is_rejected() {
        let (store, _) = seeded();
        let a = dish(Course::Voor, 10, "A");
        let b = dish(Course::Voor, 11, "B");
        let mut bad = vote("anna", Course::Voor, &a, &b, &a);
        bad.winner_id = Uuid::from_u128(12);

        assert!(store.upsert_duel_vote(&bad).await.is_err());
        assert!(store.list_duel_votes(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_final_menu_event_key_is_idempotent() {
        let store = MemoryStore::new();
        let menu = |key: Option<&str>| NewFinalMenu {
            event_key: key.map(str::to_string),
            starter_id: None,
            main_id: None,
            dessert_id: None,
            final_text: "{}".to_string(),
        };

        let first = store.insert_final_menu(&menu(Some("diner"))).await.unwrap();
        let again = store.insert_final_menu(&menu(Some("diner"))).await.unwrap();
        assert_eq!(first.id, again.id);

        let plain1 = store.insert_final_menu(&menu(None)).await.unwrap();
        let plain2 = store.insert_final_menu(&menu(None)).await.unwrap();
        assert_ne!(plain1.id, plain2.id);
    }

    #[tokio::test]
    async fn test_list_dishes_by_category() {
        let (store, _) = seeded();
        assert_eq!(store.list_dishes(None).await.unwrap().len(), 3);

        let mains = store.list_dishes(Some(Course::Hoofd)).await.unwrap();
        assert_eq!(mains.len(), 1);
        assert_eq!(mains[0].name, "Stamppot");
    }
}

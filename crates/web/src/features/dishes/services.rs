use sqlx::PgPool;
use storage::{
    ConsensusStore,
    dto::dish::{CreateDishRequest, DishFilter, DishStats, UpdateDishRequest},
    error::Result,
    models::{Course, Dish},
    repository::dish::DishRepository,
    services::draft::build_deck,
};
use uuid::Uuid;

/// List dishes, newest first
pub async fn list_dishes(pool: &PgPool, filter: &DishFilter) -> Result<Vec<Dish>> {
    let repo = DishRepository::new(pool);
    repo.list(filter.category).await
}

pub async fn get_dish(pool: &PgPool, id: Uuid) -> Result<Dish> {
    let repo = DishRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_dish(pool: &PgPool, req: &CreateDishRequest) -> Result<Dish> {
    let repo = DishRepository::new(pool);
    let dish = repo.create(req).await?;
    tracing::info!(dish_id = %dish.id, category = %dish.category, "Dish created");
    Ok(dish)
}

pub async fn update_dish(pool: &PgPool, id: Uuid, req: &UpdateDishRequest) -> Result<Dish> {
    let repo = DishRepository::new(pool);
    repo.update(id, req).await
}

pub async fn delete_dish(pool: &PgPool, id: Uuid) -> Result<()> {
    let repo = DishRepository::new(pool);
    repo.delete(id).await?;
    tracing::info!(dish_id = %id, "Dish deleted");
    Ok(())
}

pub async fn dish_stats(pool: &PgPool) -> Result<DishStats> {
    let repo = DishRepository::new(pool);
    repo.stats().await
}

/// The swipe deck of one course
pub async fn deck<S>(store: &S, course: Course) -> Result<Vec<Dish>>
where
    S: ConsensusStore + ?Sized,
{
    let dishes = store.list_dishes(Some(course)).await?;
    Ok(build_deck(dishes))
}

#[cfg(test)]
mod tests {
    use storage::MemoryStore;
    use storage::services::draft::DECK_SIZE;

    use super::*;
    use crate::test_support::dish;

    #[tokio::test]
    async fn test_deck_is_newest_dishes_of_course() {
        let store = MemoryStore::with_dishes((0..12).map(|n| dish(Course::Na, n, "Toetje")));
        store.add_dish(dish(Course::Voor, 50, "Soep"));

        let deck = deck(&store, Course::Na).await.unwrap();
        assert_eq!(deck.len(), DECK_SIZE);
        assert!(deck.iter().all(|d| d.category == Course::Na));
        assert_eq!(deck[0].id, Uuid::from_u128(11));
    }

    #[tokio::test]
    async fn test_empty_course_has_empty_deck() {
        let store = MemoryStore::new();
        assert!(deck(&store, Course::Hoofd).await.unwrap().is_empty());
    }
}

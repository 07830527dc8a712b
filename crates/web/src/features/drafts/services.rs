use storage::{
    ConsensusStore,
    models::{Course, Dish, UserMenu},
    services::{
        draft::{CourseDraft, MenuDraft, Swipe, build_deck, score_swipes},
        tournament::BracketState,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{WebError, WebResult};
use crate::state::Registry;

pub async fn create_draft(drafts: &Registry<MenuDraft>, user_name: &str) -> MenuDraft {
    let draft = MenuDraft::new(user_name.trim());
    drafts.insert(draft.id, draft.clone()).await;
    tracing::debug!(draft_id = %draft.id, user_name = %draft.user_name, "Draft started");
    draft
}

pub async fn get_draft(drafts: &Registry<MenuDraft>, id: Uuid) -> WebResult<MenuDraft> {
    let entry = drafts.fetch(id).await?;
    let draft = entry.lock().await;
    Ok(draft.clone())
}

pub async fn delete_draft(drafts: &Registry<MenuDraft>, id: Uuid) -> WebResult<()> {
    if drafts.remove(id).await {
        Ok(())
    } else {
        Err(WebError::NotFound)
    }
}

/// Score the course deck with the given swipes and restart its ranking
pub async fn record_swipes<S>(
    store: &S,
    drafts: &Registry<MenuDraft>,
    id: Uuid,
    course: Course,
    swipes: &[Swipe],
) -> WebResult<CourseDraft>
where
    S: ConsensusStore + ?Sized,
{
    let entry = drafts.fetch(id).await?;
    let deck = build_deck(store.list_dishes(Some(course)).await?);
    let scored = score_swipes(&deck, swipes)?;

    let mut draft = entry.lock().await;
    Ok(draft.record_swipes(course, scored)?.clone())
}

pub async fn play_match(
    drafts: &Registry<MenuDraft>,
    id: Uuid,
    course: Course,
    winner: Option<Uuid>,
) -> WebResult<BracketState> {
    let entry = drafts.fetch(id).await?;
    let mut draft = entry.lock().await;
    Ok(draft.play(course, winner)?)
}

pub async fn choose_winner(
    drafts: &Registry<MenuDraft>,
    id: Uuid,
    course: Course,
    index: usize,
) -> WebResult<Dish> {
    let entry = drafts.fetch(id).await?;
    let mut draft = entry.lock().await;
    Ok(draft.choose_winner(course, index)?.clone())
}

/// Store the assembled menu and close the draft
pub async fn submit_draft<S>(store: &S, drafts: &Registry<MenuDraft>, id: Uuid) -> WebResult<UserMenu>
where
    S: ConsensusStore + ?Sized,
{
    let entry = drafts.fetch(id).await?;
    let draft = entry.lock().await;

    let req = draft.assemble()?;
    req.validate()?;

    let menu = store.insert_user_menu(&req).await?;
    drop(draft);
    drafts.remove(id).await;

    tracing::info!(user_name = %menu.user_name, menu_id = %menu.id, "Draft submitted");
    Ok(menu)
}

#[cfg(test)]
mod tests {
    use storage::MemoryStore;
    use storage::services::draft::SwipeDirection;

    use super::*;
    use crate::test_support::dish;

    fn catalog() -> MemoryStore {
        MemoryStore::with_dishes([
            dish(Course::Voor, 1, "Soep"),
            dish(Course::Voor, 2, "Salade"),
            dish(Course::Hoofd, 10, "Stoof"),
            dish(Course::Na, 20, "Vla"),
            dish(Course::Na, 21, "Taart"),
        ])
    }

    fn like(n: u128) -> Swipe {
        Swipe {
            dish_id: Uuid::from_u128(n),
            direction: SwipeDirection::Right,
        }
    }

    #[tokio::test]
    async fn test_draft_to_submitted_menu() {
        let store = catalog();
        let drafts = Registry::default();
        let draft = create_draft(&drafts, " anna ").await;
        assert_eq!(draft.user_name, "anna");

        record_swipes(&store, &drafts, draft.id, Course::Voor, &[like(1), like(2)])
            .await
            .unwrap();
        let state = play_match(&drafts, draft.id, Course::Voor, None).await.unwrap();
        let picked = state.next_match.unwrap().dish1.id();
        let state = play_match(&drafts, draft.id, Course::Voor, Some(picked))
            .await
            .unwrap();
        assert!(state.result.is_some());
        let starter = choose_winner(&drafts, draft.id, Course::Voor, 0).await.unwrap();
        assert_eq!(starter.id, picked);

        record_swipes(&store, &drafts, draft.id, Course::Hoofd, &[like(10)])
            .await
            .unwrap();
        play_match(&drafts, draft.id, Course::Hoofd, None).await.unwrap();
        choose_winner(&drafts, draft.id, Course::Hoofd, 0).await.unwrap();

        // submitting with a course missing is refused
        assert!(matches!(
            submit_draft(&store, &drafts, draft.id).await,
            Err(WebError::Conflict(_))
        ));

        let favorite = Swipe {
            dish_id: Uuid::from_u128(21),
            direction: SwipeDirection::Up,
        };
        record_swipes(&store, &drafts, draft.id, Course::Na, &[favorite])
            .await
            .unwrap();
        play_match(&drafts, draft.id, Course::Na, None).await.unwrap();
        choose_winner(&drafts, draft.id, Course::Na, 0).await.unwrap();

        let menu = submit_draft(&store, &drafts, draft.id).await.unwrap();
        assert_eq!(menu.starter_id, Some(picked));
        assert_eq!(menu.dessert_id, Some(Uuid::from_u128(21)));
        assert_eq!(store.list_participants().await.unwrap(), vec!["anna"]);
        assert!(matches!(get_draft(&drafts, draft.id).await, Err(WebError::NotFound)));
    }

    #[tokio::test]
    async fn test_swipe_outside_deck_is_rejected() {
        let store = catalog();
        let drafts = Registry::default();
        let draft = create_draft(&drafts, "bram").await;

        // dish 10 is a main, not a starter
        let err = record_swipes(&store, &drafts, draft.id, Course::Voor, &[like(10)])
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_unknown_draft() {
        let drafts: Registry<MenuDraft> = Registry::default();
        assert!(matches!(
            play_match(&drafts, Uuid::new_v4(), Course::Na, None).await,
            Err(WebError::NotFound)
        ));
        assert!(delete_draft(&drafts, Uuid::new_v4()).await.is_err());
    }
}

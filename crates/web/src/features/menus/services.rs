use storage::{
    ConsensusStore,
    dto::menu::{ParticipantsResponse, SubmitMenuRequest},
    error::Result,
    models::{UserMenu, UserMenuWithDishes},
};

pub async fn list_menus<S>(store: &S) -> Result<Vec<UserMenuWithDishes>>
where
    S: ConsensusStore + ?Sized,
{
    store.list_user_menus().await
}

pub async fn submit_menu<S>(store: &S, req: &SubmitMenuRequest) -> Result<UserMenu>
where
    S: ConsensusStore + ?Sized,
{
    let menu = store.insert_user_menu(req).await?;
    tracing::info!(user_name = %menu.user_name, menu_id = %menu.id, "Menu submitted");
    Ok(menu)
}

pub async fn participants<S>(store: &S, expected_participants: usize) -> Result<ParticipantsResponse>
where
    S: ConsensusStore + ?Sized,
{
    let names = store.list_participants().await?;
    Ok(ParticipantsResponse::new(names, expected_participants))
}

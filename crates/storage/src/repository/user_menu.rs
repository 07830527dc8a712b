use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::dish::DishRepository;
use crate::dto::menu::SubmitMenuRequest;
use crate::error::{Result, StorageError};
use crate::models::{UserMenu, UserMenuWithDishes};

/// Repository for submitted participant menus
pub struct UserMenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserMenuRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, req: &SubmitMenuRequest) -> Result<UserMenu> {
        let result = sqlx::query_as::<_, UserMenu>(
            r#"
            INSERT INTO user_menus (user_name, starter_id, main_id, dessert_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_name, starter_id, main_id, dessert_id, created_at
            "#,
        )
        .bind(req.user_name.trim())
        .bind(req.starter_id)
        .bind(req.main_id)
        .bind(req.dessert_id)
        .fetch_one(self.pool)
        .await;

        match result {
            Ok(menu) => Ok(menu),
            Err(e) => {
                let err = StorageError::from(e);
                if err.is_foreign_key_violation() {
                    Err(StorageError::ConstraintViolation(
                        "Menu references an unknown dish".to_string(),
                    ))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// All menus, newest first
    pub async fn list(&self) -> Result<Vec<UserMenu>> {
        let menus = sqlx::query_as::<_, UserMenu>(
            r#"
            SELECT id, user_name, starter_id, main_id, dessert_id, created_at
            FROM user_menus
            ORDER BY created_at DESC, id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(menus)
    }

    /// All menus, newest first, with their dishes resolved
    pub async fn list_with_dishes(&self) -> Result<Vec<UserMenuWithDishes>> {
        let menus = self.list().await?;

        let mut ids: Vec<Uuid> = menus
            .iter()
            .flat_map(|m| [m.starter_id, m.main_id, m.dessert_id])
            .flatten()
            .collect();
        ids.sort();
        ids.dedup();

        let dishes: HashMap<Uuid, _> = DishRepository::new(self.pool)
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        Ok(menus
            .into_iter()
            .map(|m| UserMenuWithDishes {
                starter: m.starter_id.and_then(|id| dishes.get(&id).cloned()),
                main: m.main_id.and_then(|id| dishes.get(&id).cloned()),
                dessert: m.dessert_id.and_then(|id| dishes.get(&id).cloned()),
                id: m.id,
                user_name: m.user_name,
                created_at: m.created_at,
            })
            .collect())
    }

    /// Distinct participant names in sorted order
    pub async fn participants(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT user_name FROM user_menus ORDER BY user_name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }
}

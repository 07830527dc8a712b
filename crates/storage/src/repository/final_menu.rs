use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{FinalMenuRecord, NewFinalMenu};

const FINAL_MENU_COLUMNS: &str =
    "id, event_key, starter_id, main_id, dessert_id, final_text, created_at";

/// Repository for confirmed shared menus
pub struct FinalMenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FinalMenuRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a confirmed menu.
    ///
    /// Without an event key every call adds a row. With one, the first
    /// record stored under that key is returned on later calls.
    pub async fn insert(&self, menu: &NewFinalMenu) -> Result<FinalMenuRecord> {
        let sql = format!(
            r#"
            INSERT INTO final_menus (event_key, starter_id, main_id, dessert_id, final_text)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (event_key) DO NOTHING
            RETURNING {FINAL_MENU_COLUMNS}
            "#
        );

        let inserted = sqlx::query_as::<_, FinalMenuRecord>(&sql)
            .bind(menu.event_key.as_deref())
            .bind(menu.starter_id)
            .bind(menu.main_id)
            .bind(menu.dessert_id)
            .bind(&menu.final_text)
            .fetch_optional(self.pool)
            .await?;

        if let Some(record) = inserted {
            return Ok(record);
        }

        let key = menu.event_key.as_deref().ok_or(StorageError::NotFound)?;
        self.find_by_event_key(key).await
    }

    pub async fn find_by_event_key(&self, event_key: &str) -> Result<FinalMenuRecord> {
        let sql = format!("SELECT {FINAL_MENU_COLUMNS} FROM final_menus WHERE event_key = $1");

        sqlx::query_as::<_, FinalMenuRecord>(&sql)
            .bind(event_key)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

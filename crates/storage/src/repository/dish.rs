use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::dish::{CreateDishRequest, DishStats, UpdateDishRequest};
use crate::error::{Result, StorageError};
use crate::models::{Course, Dish};

const DISH_COLUMNS: &str =
    "id, category, name, subtitle, ingredients, preparation, image_url, created_at";

/// Repository for the dish catalog
pub struct DishRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DishRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List dishes, newest first, optionally limited to one course
    pub async fn list(&self, category: Option<Course>) -> Result<Vec<Dish>> {
        let sql = format!(
            r#"
            SELECT {DISH_COLUMNS}
            FROM dishes
            WHERE ($1::course IS NULL OR category = $1)
            ORDER BY created_at DESC, id
            "#
        );

        let dishes = sqlx::query_as::<_, Dish>(&sql)
            .bind(category)
            .fetch_all(self.pool)
            .await?;

        Ok(dishes)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Dish> {
        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1");

        sqlx::query_as::<_, Dish>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Fetch several dishes at once; unknown ids are skipped
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Dish>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {DISH_COLUMNS} FROM dishes WHERE id = ANY($1)");

        let dishes = sqlx::query_as::<_, Dish>(&sql)
            .bind(ids)
            .fetch_all(self.pool)
            .await?;

        Ok(dishes)
    }

    pub async fn create(&self, req: &CreateDishRequest) -> Result<Dish> {
        let sql = format!(
            r#"
            INSERT INTO dishes (category, name, subtitle, ingredients, preparation, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {DISH_COLUMNS}
            "#
        );

        let dish = sqlx::query_as::<_, Dish>(&sql)
            .bind(req.category)
            .bind(&req.name)
            .bind(&req.subtitle)
            .bind(&req.ingredients)
            .bind(&req.preparation)
            .bind(&req.image_url)
            .fetch_one(self.pool)
            .await?;

        Ok(dish)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateDishRequest) -> Result<Dish> {
        let sql = format!(
            r#"
            UPDATE dishes
            SET category = COALESCE($2, category),
                name = COALESCE($3, name),
                subtitle = COALESCE($4, subtitle),
                ingredients = COALESCE($5, ingredients),
                preparation = COALESCE($6, preparation),
                image_url = COALESCE($7, image_url)
            WHERE id = $1
            RETURNING {DISH_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Dish>(&sql)
            .bind(id)
            .bind(req.category)
            .bind(req.name.as_deref())
            .bind(req.subtitle.as_deref())
            .bind(req.ingredients.as_deref())
            .bind(req.preparation.as_deref())
            .bind(req.image_url.as_deref())
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Menus referencing the dish keep their row with the slot cleared
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM dishes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn stats(&self) -> Result<DishStats> {
        let counts = sqlx::query_as::<_, (Course, i64)>(
            "SELECT category, COUNT(*) FROM dishes GROUP BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(DishStats::from_counts(counts))
    }
}

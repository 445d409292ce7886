use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Cat, CatChanges, NewCat};
use crate::{error::AppError, users::Role};

#[async_trait]
pub trait CatStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Cat>, AppError>;
    /// Fails with `NotFound` when no row has this id.
    async fn get_by_id(&self, id: i32) -> Result<Cat, AppError>;
    async fn create(&self, cat: NewCat) -> Result<i32, AppError>;
    /// Admins may update any cat, everyone else only their own.
    /// A cat that is missing or not the caller's is reported as `NotFound`.
    async fn update(
        &self,
        changes: CatChanges,
        id: i32,
        caller_id: i32,
        caller_role: Role,
    ) -> Result<(), AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgCatStore {
    db: PgPool,
}

impl PgCatStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatStore for PgCatStore {
    async fn list_all(&self) -> Result<Vec<Cat>, AppError> {
        let rows = sqlx::query_as::<_, Cat>(
            r#"
            SELECT cat_id, cat_name, weight, birthdate, filename, lat, lng, owner
              FROM cats
             ORDER BY cat_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> Result<Cat, AppError> {
        sqlx::query_as::<_, Cat>(
            r#"
            SELECT cat_id, cat_name, weight, birthdate, filename, lat, lng, owner
              FROM cats
             WHERE cat_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No cats found".into()))
    }

    async fn create(&self, cat: NewCat) -> Result<i32, AppError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO cats (cat_name, weight, birthdate, filename, lat, lng, owner)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING cat_id
            "#,
        )
        .bind(cat.cat_name)
        .bind(cat.weight)
        .bind(cat.birthdate)
        .bind(cat.filename)
        .bind(cat.lat)
        .bind(cat.lng)
        .bind(cat.owner)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        changes: CatChanges,
        id: i32,
        caller_id: i32,
        caller_role: Role,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE cats
               SET cat_name  = COALESCE($1, cat_name),
                   weight    = COALESCE($2, weight),
                   birthdate = COALESCE($3, birthdate)
             WHERE cat_id = $4
               AND ($5 OR owner = $6)
            "#,
        )
        .bind(changes.cat_name)
        .bind(changes.weight)
        .bind(changes.birthdate)
        .bind(id)
        .bind(caller_role == Role::Admin)
        .bind(caller_id)
        .execute(&self.db)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("No cats updated".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cats WHERE cat_id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("No cats deleted".into()));
        }
        Ok(())
    }
}

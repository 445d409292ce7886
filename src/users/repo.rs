use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User, UserChanges, UserCredentials};
use crate::error::AppError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<User>, AppError>;
    /// Fails with `NotFound` when no row has this id.
    async fn get_by_id(&self, id: i32) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError>;
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<i32, AppError>;
    async fn update(&self, changes: UserChanges, id: i32) -> Result<(), AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

pub const EMAIL_TAKEN: &str = "Email already registered";

// users.email is UNIQUE; anything else stays a database error
fn email_conflict(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(EMAIL_TAKEN.into())
        }
        other => AppError::Database(other),
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, email, role
              FROM users
             ORDER BY user_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, email, role
              FROM users
             WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No users found".into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, AppError> {
        let row = sqlx::query_as::<_, UserCredentials>(
            r#"
            SELECT user_id, user_name, email, role, password
              FROM users
             WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, user: NewUser) -> Result<i32, AppError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (user_name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id
            "#,
        )
        .bind(user.user_name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await
        .map_err(email_conflict)?;
        Ok(id)
    }

    async fn update(&self, changes: UserChanges, id: i32) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET user_name = COALESCE($1, user_name),
                   email     = COALESCE($2, email),
                   password  = COALESCE($3, password),
                   role      = COALESCE($4, role)
             WHERE user_id = $5
            "#,
        )
        .bind(changes.user_name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.role)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(email_conflict)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("No users updated".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("No users deleted".into()));
        }
        Ok(())
    }
}

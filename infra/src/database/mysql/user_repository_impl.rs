//! MySQL implementation of the UserRepository trait.
//!
//! Ids are stored as their hyphenated text form in `CHAR(36)` columns and
//! roles as a MySQL `ENUM`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use cb_core::domain::entities::user::{Role, User};
use cb_core::errors::DomainError;
use cb_core::repositories::UserRepository;

use super::errors::{column_error, map_sqlx_error, map_write_error};

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, refresh_token, \
                            role, confirmed, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
        let role: String = row.try_get("role").map_err(|e| column_error("role", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| column_error("id", e))?,
            username: row
                .try_get("username")
                .map_err(|e| column_error("username", e))?,
            email: row.try_get("email").map_err(|e| column_error("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| column_error("password_hash", e))?,
            avatar: row.try_get("avatar").map_err(|e| column_error("avatar", e))?,
            refresh_token: row
                .try_get("refresh_token")
                .map_err(|e| column_error("refresh_token", e))?,
            role: role.parse::<Role>().map_err(|e| column_error("role", e))?,
            confirmed: row
                .try_get("confirmed")
                .map_err(|e| column_error("confirmed", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_error("updated_at", e))?,
        })
    }

    async fn fetch_one_by(&self, column: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE {} = ? LIMIT 1",
            USER_COLUMNS, column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email.to_string()).await
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, username, email, password_hash, avatar, refresh_token,
                role, confirmed, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.avatar)
            .bind(&user.refresh_token)
            .bind(user.role.as_str())
            .bind(user.confirmed)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "Account already exists"))?;

        Ok(user)
    }

    async fn update_refresh_token(
        &self,
        user: &User,
        token: Option<&str>,
    ) -> Result<(), DomainError> {
        sqlx::query("UPDATE users SET refresh_token = ?, updated_at = ? WHERE id = ?")
            .bind(token)
            .bind(Utc::now())
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET confirmed = TRUE, updated_at = ? WHERE email = ?")
            .bind(Utc::now())
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 && self.find_by_email(email).await?.is_none() {
            return Err(DomainError::not_found("User not found"));
        }
        Ok(())
    }

    async fn set_avatar(&self, email: &str, url: &str) -> Result<User, DomainError> {
        sqlx::query("UPDATE users SET avatar = ?, updated_at = ? WHERE email = ?")
            .bind(url)
            .bind(Utc::now())
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

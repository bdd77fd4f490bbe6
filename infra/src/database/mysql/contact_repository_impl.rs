//! MySQL implementation of the ContactRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use uuid::Uuid;

use cb_core::domain::entities::contact::Contact;
use cb_core::errors::DomainError;
use cb_core::repositories::{ContactFilter, ContactRepository};
use cb_shared::types::Pagination;

use super::errors::{column_error, map_sqlx_error, map_write_error};

const CONTACT_COLUMNS: &str = "id, owner_id, first_name, last_name, email, phone, birthday, \
                               comments, favorite, created_at, updated_at";

const DUPLICATE_EMAIL: &str = "Email is exist!";

/// MySQL implementation of ContactRepository
pub struct MySqlContactRepository {
    pool: MySqlPool,
}

impl MySqlContactRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_contact(row: &MySqlRow) -> Result<Contact, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
        let owner_id: String = row
            .try_get("owner_id")
            .map_err(|e| column_error("owner_id", e))?;

        Ok(Contact {
            id: Uuid::parse_str(&id).map_err(|e| column_error("id", e))?,
            owner_id: Uuid::parse_str(&owner_id).map_err(|e| column_error("owner_id", e))?,
            first_name: row
                .try_get("first_name")
                .map_err(|e| column_error("first_name", e))?,
            last_name: row
                .try_get("last_name")
                .map_err(|e| column_error("last_name", e))?,
            email: row.try_get("email").map_err(|e| column_error("email", e))?,
            phone: row.try_get("phone").map_err(|e| column_error("phone", e))?,
            birthday: row
                .try_get::<Option<NaiveDate>, _>("birthday")
                .map_err(|e| column_error("birthday", e))?,
            comments: row
                .try_get("comments")
                .map_err(|e| column_error("comments", e))?,
            favorite: row
                .try_get("favorite")
                .map_err(|e| column_error("favorite", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_error("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_error("updated_at", e))?,
        })
    }

    fn rows_to_contacts(rows: Vec<MySqlRow>) -> Result<Vec<Contact>, DomainError> {
        rows.iter().map(Self::row_to_contact).collect()
    }
}

/// WHERE clause for a listing filter; binds follow in owner, favorite order
fn filter_clause(filter: &ContactFilter) -> String {
    let mut conditions = Vec::new();
    if filter.owner_id.is_some() {
        conditions.push("owner_id = ?");
    }
    if filter.favorite.is_some() {
        conditions.push("favorite = ?");
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// `LIKE` pattern matching `query` anywhere, with wildcards escaped
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ContactRepository for MySqlContactRepository {
    async fn list(
        &self,
        filter: ContactFilter,
        page: Pagination,
    ) -> Result<Vec<Contact>, DomainError> {
        let query = format!(
            "SELECT {} FROM contacts {} ORDER BY created_at, id LIMIT ? OFFSET ?",
            CONTACT_COLUMNS,
            filter_clause(&filter)
        );

        let mut statement = sqlx::query(&query);
        if let Some(owner_id) = filter.owner_id {
            statement = statement.bind(owner_id.to_string());
        }
        if let Some(favorite) = filter.favorite {
            statement = statement.bind(favorite);
        }

        let rows = statement
            .bind(page.limit_i64())
            .bind(page.offset_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Self::rows_to_contacts(rows)
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError> {
        let query = format!(
            "SELECT {} FROM contacts WHERE owner_id = ? AND id = ? LIMIT 1",
            CONTACT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_contact).transpose()
    }

    async fn find_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> Result<Option<Contact>, DomainError> {
        let query = format!(
            "SELECT {} FROM contacts WHERE owner_id = ? AND email = ? LIMIT 1",
            CONTACT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(owner_id.to_string())
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(Self::row_to_contact).transpose()
    }

    async fn create(&self, contact: Contact) -> Result<Contact, DomainError> {
        let query = r#"
            INSERT INTO contacts (
                id, owner_id, first_name, last_name, email, phone, birthday,
                comments, favorite, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(contact.id.to_string())
            .bind(contact.owner_id.to_string())
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.birthday)
            .bind(&contact.comments)
            .bind(contact.favorite)
            .bind(contact.created_at)
            .bind(contact.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_EMAIL))?;

        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, DomainError> {
        let query = r#"
            UPDATE contacts
            SET first_name = ?, last_name = ?, email = ?, phone = ?, birthday = ?,
                comments = ?, favorite = ?, updated_at = ?
            WHERE id = ? AND owner_id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.birthday)
            .bind(&contact.comments)
            .bind(contact.favorite)
            .bind(contact.updated_at)
            .bind(contact.id.to_string())
            .bind(contact.owner_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, DUPLICATE_EMAIL))?;

        // MySQL reports zero affected rows when nothing changed, so recheck
        if result.rows_affected() == 0
            && self.find(contact.owner_id, contact.id).await?.is_none()
        {
            return Err(DomainError::not_found("Not found"));
        }
        Ok(contact)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError> {
        let existing = match self.find(owner_id, id).await? {
            Some(contact) => contact,
            None => return Ok(None),
        };

        let result = sqlx::query("DELETE FROM contacts WHERE owner_id = ? AND id = ?")
            .bind(owner_id.to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok((result.rows_affected() > 0).then_some(existing))
    }

    async fn search(&self, owner_id: Uuid, query: &str) -> Result<Vec<Contact>, DomainError> {
        let statement = format!(
            "SELECT {} FROM contacts \
             WHERE owner_id = ? AND (LOWER(first_name) LIKE ? OR LOWER(last_name) LIKE ? OR LOWER(email) LIKE ?) \
             ORDER BY created_at, id",
            CONTACT_COLUMNS
        );
        let pattern = like_pattern(query);

        let rows = sqlx::query(&statement)
            .bind(owner_id.to_string())
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Self::rows_to_contacts(rows)
    }

    async fn with_birthdays(&self, owner_id: Uuid) -> Result<Vec<Contact>, DomainError> {
        let query = format!(
            "SELECT {} FROM contacts WHERE owner_id = ? AND birthday IS NOT NULL",
            CONTACT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Self::rows_to_contacts(rows)
    }
}

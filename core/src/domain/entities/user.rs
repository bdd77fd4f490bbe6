//! User entity representing an authenticated principal of the contact book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including every user's contacts
    Admin,
    /// May browse all contacts and curate favorites
    Moderator,
    /// Regular account limited to its own contacts
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// User entity
///
/// The email is the identity key. The persistent store owns this record;
/// services read it, cache it and mutate one field at a time through the
/// repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Display name
    pub username: String,

    /// Unique, normalized email address
    pub email: String,

    /// Self-describing adaptive hash of the password
    pub password_hash: String,

    /// Avatar image URL
    pub avatar: Option<String>,

    /// The single refresh token currently accepted for this account
    pub refresh_token: Option<String>,

    pub role: Role,

    /// Whether the email address has been confirmed
    pub confirmed: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, unconfirmed user with the default role
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            avatar: None,
            refresh_token: None,
            role: Role::User,
            confirmed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the role, builder style
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the avatar, builder style
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Marks the email as confirmed
    pub fn confirm(&mut self) {
        self.confirmed = true;
        self.updated_at = Utc::now();
    }

    /// Replaces (or clears) the active refresh token
    pub fn set_refresh_token(&mut self, token: Option<String>) {
        self.refresh_token = token;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, url: impl Into<String>) {
        self.avatar = Some(url.into());
        self.updated_at = Utc::now();
    }

    /// Checks the user's role against an allowed set
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            "alice".to_string(),
            "a@x.com".to_string(),
            "$2b$04$hash".to_string(),
        )
    }

    #[test]
    fn test_new_user_is_unconfirmed_regular_user() {
        let user = sample();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::User);
        assert!(!user.confirmed);
        assert!(user.refresh_token.is_none());
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_mutators() {
        let mut user = sample();
        user.confirm();
        user.set_refresh_token(Some("r1".to_string()));
        user.set_avatar("https://img/1");
        assert!(user.confirmed);
        assert_eq!(user.refresh_token.as_deref(), Some("r1"));
        assert_eq!(user.avatar.as_deref(), Some("https://img/1"));

        user.set_refresh_token(None);
        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn test_role_checks() {
        let admin = sample().with_role(Role::Admin);
        assert!(admin.has_any_role(&[Role::Admin, Role::Moderator]));
        assert!(!sample().has_any_role(&[Role::Admin, Role::Moderator]));
    }

    #[test]
    fn test_role_parsing_and_serde() {
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}

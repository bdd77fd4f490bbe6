//! Versioned wire format of cached users.
//!
//! The cache stores an explicit projection of the user rather than the
//! entity itself, tagged with a schema version. Entries written by a
//! different version are treated as misses, so a rolling deploy never reads
//! a record it does not understand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::{Role, User};
use crate::errors::CacheError;

/// Current layout of [`CachedUser`]
pub const USER_CACHE_SCHEMA_VERSION: u32 = 1;

/// Cached projection of a user, field for field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub refresh_token: Option<String>,
    pub role: Role,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            avatar: user.avatar.clone(),
            refresh_token: user.refresh_token.clone(),
            role: user.role,
            confirmed: user.confirmed,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserSnapshot> for User {
    fn from(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            username: snapshot.username,
            email: snapshot.email,
            password_hash: snapshot.password_hash,
            avatar: snapshot.avatar,
            refresh_token: snapshot.refresh_token,
            role: snapshot.role,
            confirmed: snapshot.confirmed,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }
}

/// Envelope stored under `user:{email}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    pub schema_version: u32,
    pub user: UserSnapshot,
}

#[derive(Deserialize)]
struct VersionProbe {
    schema_version: u32,
}

impl CachedUser {
    pub fn encode(user: &User) -> Result<String, CacheError> {
        let envelope = CachedUser {
            schema_version: USER_CACHE_SCHEMA_VERSION,
            user: UserSnapshot::from(user),
        };
        serde_json::to_string(&envelope).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    /// Decodes a stored payload, rejecting other schema versions
    pub fn decode(payload: &str) -> Result<User, CacheError> {
        let probe: VersionProbe = serde_json::from_str(payload)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        if probe.schema_version != USER_CACHE_SCHEMA_VERSION {
            return Err(CacheError::Serialization(format!(
                "unsupported schema version {}",
                probe.schema_version
            )));
        }

        let envelope: CachedUser = serde_json::from_str(payload)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        Ok(envelope.user.into())
    }
}

//! Avatar identifiers and upload results.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Result of storing an avatar image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUpload {
    /// URL of the stored original
    pub url: String,
    /// Storage version, changes on every overwrite
    pub version: String,
}

fn email_digest(email: &str) -> String {
    hex::encode(Sha256::digest(email.trim().to_lowercase().as_bytes()))
}

/// Deterministic storage id for a user's avatar
///
/// Every upload for the same email lands on the same object, so a new
/// avatar overwrites the previous one.
pub fn avatar_public_id(folder: &str, email: &str) -> String {
    format!("{}/{}", folder, &email_digest(email)[..12])
}

/// Default avatar served by Gravatar for an email
pub fn gravatar_url(email: &str) -> String {
    format!("https://www.gravatar.com/avatar/{}?d=identicon", email_digest(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_is_stable_and_short() {
        let a = avatar_public_id("ContactBook", "a@x.com");
        let b = avatar_public_id("ContactBook", "A@X.com ");
        assert_eq!(a, b);
        assert!(a.starts_with("ContactBook/"));
        assert_eq!(a.len(), "ContactBook/".len() + 12);
        assert_ne!(a, avatar_public_id("ContactBook", "b@x.com"));
    }

    #[test]
    fn test_gravatar_url_uses_full_digest() {
        let url = gravatar_url("a@x.com");
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.contains(&email_digest("a@x.com")));
    }
}

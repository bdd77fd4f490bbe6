//! Input of the signup flow.

use serde::Deserialize;

use cb_shared::utils::validation::{is_valid_email, length_between, normalize_email};

use crate::errors::ValidationError;

pub const USERNAME_MAX_LENGTH: usize = 25;
pub const PASSWORD_MIN_LENGTH: usize = 4;
pub const PASSWORD_MAX_LENGTH: usize = 15;

/// New account request
#[derive(Debug, Clone, Deserialize)]
pub struct SignupCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupCommand {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks field bounds and returns the normalized email
    pub fn validate(&self) -> Result<String, ValidationError> {
        if !length_between(&self.username, 1, USERNAME_MAX_LENGTH) {
            return Err(ValidationError::InvalidLength {
                field: "username".to_string(),
                min: 1,
                max: USERNAME_MAX_LENGTH,
            });
        }
        if !length_between(&self.password, PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH) {
            return Err(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: PASSWORD_MIN_LENGTH,
                max: PASSWORD_MAX_LENGTH,
            });
        }

        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_normalizes_email() {
        let cmd = SignupCommand::new("alice", " A@X.com", "pw123");
        assert_eq!(cmd.validate().unwrap(), "a@x.com");
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(matches!(
            SignupCommand::new("", "a@x.com", "pw123").validate(),
            Err(ValidationError::InvalidLength { .. })
        ));
        assert!(matches!(
            SignupCommand::new("alice", "a@x.com", "pw").validate(),
            Err(ValidationError::InvalidLength { .. })
        ));
        assert_eq!(
            SignupCommand::new("alice", "not-an-email", "pw123").validate(),
            Err(ValidationError::InvalidEmail)
        );
    }
}

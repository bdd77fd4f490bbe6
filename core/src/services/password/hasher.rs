//! One-way password hashing backed by bcrypt.

use tracing::warn;

use crate::errors::DomainError;

/// Password hashing contract
///
/// The hash output embeds its algorithm and cost, so verification needs no
/// configuration of its own.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// `false` on mismatch and on malformed stored hashes
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// bcrypt with a tunable cost factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}

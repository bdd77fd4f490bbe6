//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::entities::token::{Claims, TokenPair, TokenPurpose};
use crate::errors::{DomainError, TokenError};
use crate::services::clock::Clock;

use super::config::TokenServiceConfig;

/// Service for issuing and verifying purpose-tagged JWTs
///
/// Verification is purely structural: signature, issuer, expiry and purpose.
/// No store is consulted here. Expiry is judged against the injected clock
/// rather than the library's wall-clock check.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    /// * `clock` - Time source for `iat`, `exp` and expiry checks
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or an error for non-HMAC algorithms
    pub fn new(config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::Internal {
                message: format!("Unsupported JWT algorithm: {:?}", config.algorithm),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            clock,
        })
    }

    /// Issues a short-lived access token for `subject`
    pub fn issue_access(&self, subject: &str) -> Result<String, DomainError> {
        self.issue(subject, TokenPurpose::Access)
    }

    /// Issues a refresh token for `subject`
    pub fn issue_refresh(&self, subject: &str) -> Result<String, DomainError> {
        self.issue(subject, TokenPurpose::Refresh)
    }

    /// Issues an email confirmation token for `subject`
    pub fn issue_email_confirmation(&self, subject: &str) -> Result<String, DomainError> {
        self.issue(subject, TokenPurpose::EmailConfirmation)
    }

    /// Issues an access and refresh token together
    pub fn issue_pair(&self, subject: &str) -> Result<TokenPair, DomainError> {
        Ok(TokenPair::new(
            self.issue_access(subject)?,
            self.issue_refresh(subject)?,
        ))
    }

    fn issue(&self, subject: &str, purpose: TokenPurpose) -> Result<String, DomainError> {
        let claims = Claims::new(
            subject,
            purpose,
            self.clock.now(),
            self.config.lifetime(purpose),
            self.config.issuer.clone(),
        );
        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies a token for the expected purpose and returns its subject
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The subject (email) of a valid token
    /// * `Err(TokenError)` - Bad signature, expired, malformed, wrong purpose
    ///   or empty subject
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Result<String, TokenError> {
        let claims = self.decode_claims(token)?;

        if claims.scope != expected {
            debug!(
                "Rejected {} token presented as {}",
                claims.scope, expected
            );
            return Err(TokenError::PurposeMismatch);
        }
        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::TokenExpired);
        }
        if claims.sub.trim().is_empty() {
            return Err(TokenError::MissingClaim {
                claim: "sub".to_string(),
            });
        }

        Ok(claims.sub)
    }

    /// Decodes and checks the signature of a token without judging expiry or purpose
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                    claim: claim.clone(),
                },
                _ => TokenError::InvalidTokenFormat,
            })
    }
}

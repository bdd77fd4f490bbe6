//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use cb_shared::utils::validation::{mask_email, normalize_email};

use crate::domain::entities::token::{TokenPair, TokenPurpose};
use crate::domain::entities::user::{Role, User};
use crate::domain::value_objects::{
    avatar_public_id, gravatar_url, ConfirmationOutcome, EmailRequestOutcome,
};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::UserRepository;
use crate::services::avatar::AvatarStorage;
use crate::services::cache::UserCache;
use crate::services::notification::{ConfirmationEmail, ConfirmationMailer};
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::commands::SignupCommand;
use super::config::AuthServiceConfig;

/// Authentication service for the complete account lifecycle
pub struct AuthService<U, H, M, S>
where
    U: UserRepository,
    H: PasswordHasher,
    M: ConfirmationMailer,
    S: AvatarStorage,
{
    /// Source of truth for accounts
    user_repository: Arc<U>,
    password_hasher: Arc<H>,
    token_service: Arc<TokenService>,
    /// Overwritten after every account mutation
    user_cache: Arc<dyn UserCache>,
    mailer: Arc<M>,
    avatar_storage: Arc<S>,
    config: AuthServiceConfig,
}

impl<U, H, M, S> AuthService<U, H, M, S>
where
    U: UserRepository,
    H: PasswordHasher,
    M: ConfirmationMailer,
    S: AvatarStorage,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for account persistence
    /// * `password_hasher` - One-way password hashing
    /// * `token_service` - Issuer and verifier of purpose-tagged tokens
    /// * `user_cache` - Cache refreshed after each mutation
    /// * `mailer` - Delivery of confirmation mails
    /// * `avatar_storage` - Image CDN for avatars
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        password_hasher: Arc<H>,
        token_service: Arc<TokenService>,
        user_cache: Arc<dyn UserCache>,
        mailer: Arc<M>,
        avatar_storage: Arc<S>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_service,
            user_cache,
            mailer,
            avatar_storage,
            config,
        }
    }

    /// Register a new, unconfirmed account
    ///
    /// Hashes the password, assigns a Gravatar avatar, stores the account and
    /// dispatches a confirmation mail on a background task. The mail is never
    /// awaited, so delivery trouble cannot fail the signup.
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The stored account
    /// * `Err(DomainError::Conflict)` - The email is already registered
    /// * `Err(DomainError::ValidationErr)` - Malformed input
    pub async fn signup(&self, command: SignupCommand, base_url: &str) -> DomainResult<User> {
        let email = command.validate()?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Account already exists"));
        }

        let role = if self.config.bootstrap_first_admin && self.user_repository.count().await? == 0
        {
            Role::Admin
        } else {
            Role::User
        };

        let password_hash = self.password_hasher.hash(&command.password)?;
        let user = User::new(command.username, email.clone(), password_hash)
            .with_role(role)
            .with_avatar(gravatar_url(&email));
        let user = self.user_repository.save(user).await?;
        info!("Registered {} as {}", mask_email(&user.email), user.role);

        let token = self.token_service.issue_email_confirmation(&user.email)?;
        self.dispatch_confirmation(&user, base_url, token);

        Ok(user)
    }

    /// Exchange credentials for an access/refresh token pair
    ///
    /// Unknown emails and wrong passwords fail identically. The new refresh
    /// token replaces whatever was stored before.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let email = normalize_email(email);

        let mut user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login for unknown account {}", mask_email(&email));
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.password_hasher.verify(password, &user.password_hash) {
            debug!("Wrong password for {}", mask_email(&email));
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.confirmed {
            return Err(AuthError::EmailNotConfirmed.into());
        }

        let pair = self.rotate_tokens(&mut user).await?;
        info!("User {} logged in", mask_email(&user.email));
        Ok(pair)
    }

    /// Rotate a refresh token into a fresh pair
    ///
    /// The account is read from the store, never from the cache. A token that
    /// verifies but is not the stored one revokes the session: the stored
    /// value is cleared and the request fails.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let email = self
            .token_service
            .verify(refresh_token, TokenPurpose::Refresh)?;

        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!(
                "Stale refresh token presented for {}, revoking session",
                mask_email(&user.email)
            );
            self.user_repository
                .update_refresh_token(&user, None)
                .await?;
            user.set_refresh_token(None);
            self.user_cache.put(&user).await;
            return Err(AuthError::InvalidRefreshToken.into());
        }

        self.rotate_tokens(&mut user).await
    }

    /// Confirm the email address named by a confirmation token
    pub async fn confirm_email(&self, token: &str) -> DomainResult<ConfirmationOutcome> {
        let email = self
            .token_service
            .verify(token, TokenPurpose::EmailConfirmation)
            .map_err(|e| {
                debug!("Confirmation token rejected: {}", e);
                TokenError::InvalidEmailToken
            })?;

        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::VerificationFailed)?;

        if user.confirmed {
            return Ok(ConfirmationOutcome::AlreadyConfirmed);
        }

        self.user_repository.set_confirmed(&email).await?;
        user.confirm();
        self.user_cache.put(&user).await;
        info!("Email confirmed for {}", mask_email(&email));

        Ok(ConfirmationOutcome::Confirmed)
    }

    /// Send another confirmation mail
    ///
    /// Unknown addresses get the same answer as a successful dispatch.
    pub async fn request_confirmation_email(
        &self,
        email: &str,
        base_url: &str,
    ) -> DomainResult<EmailRequestOutcome> {
        let email = normalize_email(email);

        if let Some(user) = self.user_repository.find_by_email(&email).await? {
            if user.confirmed {
                return Ok(EmailRequestOutcome::AlreadyConfirmed);
            }
            let token = self.token_service.issue_email_confirmation(&user.email)?;
            self.dispatch_confirmation(&user, base_url, token);
        }

        Ok(EmailRequestOutcome::CheckInbox)
    }

    /// Replace the avatar of `user` with an uploaded image
    ///
    /// Uploads always land on the same public id for a given email, so the
    /// previous image is overwritten rather than orphaned.
    pub async fn update_avatar(&self, user: &User, image: Vec<u8>) -> DomainResult<User> {
        if image.is_empty() {
            return Err(ValidationError::InvalidImage.into());
        }

        let public_id = avatar_public_id(&self.config.avatar_folder, &user.email);
        let upload = self
            .avatar_storage
            .upload(&public_id, image)
            .await
            .map_err(|e| {
                error!("Avatar upload failed: {}", e);
                DomainError::store_failure("avatar storage unavailable")
            })?;

        let url = self
            .avatar_storage
            .rendition_url(&public_id, &upload.version, self.config.avatar_size);
        let updated = self.user_repository.set_avatar(&user.email, &url).await?;
        self.user_cache.put(&updated).await;

        Ok(updated)
    }

    /// Revoke the stored refresh token of `user`
    pub async fn logout(&self, user: &User) -> DomainResult<()> {
        self.user_repository.update_refresh_token(user, None).await?;

        let mut user = user.clone();
        user.set_refresh_token(None);
        self.user_cache.put(&user).await;
        info!("User {} logged out", mask_email(&user.email));

        Ok(())
    }

    /// Issue a new pair and make its refresh token the only accepted one
    async fn rotate_tokens(&self, user: &mut User) -> DomainResult<TokenPair> {
        let pair = self.token_service.issue_pair(&user.email)?;
        self.user_repository
            .update_refresh_token(user, Some(&pair.refresh_token))
            .await?;
        user.set_refresh_token(Some(pair.refresh_token.clone()));
        self.user_cache.put(user).await;
        Ok(pair)
    }

    fn dispatch_confirmation(&self, user: &User, base_url: &str, token: String) {
        let mail = ConfirmationEmail {
            email: user.email.clone(),
            username: user.username.clone(),
            base_url: base_url.to_string(),
            token,
        };
        let mailer = Arc::clone(&self.mailer);

        tokio::spawn(async move {
            match mailer.send_confirmation(&mail).await {
                Ok(message_id) => debug!(
                    "Confirmation mail for {} accepted as {}",
                    mask_email(&mail.email),
                    message_id
                ),
                Err(e) => error!(
                    "Confirmation mail for {} failed: {}",
                    mask_email(&mail.email),
                    e
                ),
            }
        });
    }
}

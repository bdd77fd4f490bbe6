//! Contact service implementation

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use cb_shared::types::Pagination;
use cb_shared::utils::validation::normalize_email;

use crate::domain::entities::contact::{Contact, ContactDraft};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{ContactFilter, ContactRepository};
use crate::services::clock::Clock;
use crate::services::rate_limit::{create_contact_key, RateLimiterTrait};

use super::access::RoleAccess;
use super::config::ContactServiceConfig;

/// Contact management scoped to the calling user
///
/// A contact owned by someone else reads exactly like a missing one.
pub struct ContactService<C, R>
where
    C: ContactRepository,
    R: RateLimiterTrait,
{
    contact_repository: Arc<C>,
    rate_limiter: Arc<R>,
    clock: Arc<dyn Clock>,
    config: ContactServiceConfig,
}

impl<C, R> ContactService<C, R>
where
    C: ContactRepository,
    R: RateLimiterTrait,
{
    pub fn new(
        contact_repository: Arc<C>,
        rate_limiter: Arc<R>,
        clock: Arc<dyn Clock>,
        config: ContactServiceConfig,
    ) -> Self {
        Self {
            contact_repository,
            rate_limiter,
            clock,
            config,
        }
    }

    /// The caller's contacts, optionally filtered by the favorite flag
    pub async fn list(
        &self,
        owner: &User,
        favorite: Option<bool>,
        page: Pagination,
    ) -> DomainResult<Vec<Contact>> {
        check_limit(&page, self.config.list_limit_range)?;
        let filter = ContactFilter::owned_by(owner.id).with_favorite(favorite);
        self.contact_repository.list(filter, page).await
    }

    /// Every user's contacts; curators only
    pub async fn list_all(
        &self,
        actor: &User,
        favorite: Option<bool>,
        page: Pagination,
    ) -> DomainResult<Vec<Contact>> {
        RoleAccess::CURATORS.check(actor)?;
        check_limit(&page, self.config.list_limit_range)?;
        let filter = ContactFilter::default().with_favorite(favorite);
        self.contact_repository.list(filter, page).await
    }

    pub async fn get(&self, owner: &User, id: Uuid) -> DomainResult<Contact> {
        self.find_owned(owner, id).await
    }

    /// Create a contact, subject to the per-user creation budget
    ///
    /// The limiter fails open: if it cannot be reached the request proceeds.
    pub async fn create(&self, owner: &User, draft: ContactDraft) -> DomainResult<Contact> {
        self.check_create_budget(owner).await?;

        let draft = normalized(draft)?;
        if self
            .contact_repository
            .find_by_email(owner.id, &draft.email)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("Email is exist!"));
        }

        let contact = Contact::from_draft(owner.id, draft, self.clock.now());
        let contact = self.contact_repository.create(contact).await?;
        info!("Contact {} created", contact.id);
        Ok(contact)
    }

    /// Replace every editable field of an owned contact
    pub async fn update(
        &self,
        owner: &User,
        id: Uuid,
        draft: ContactDraft,
    ) -> DomainResult<Contact> {
        let draft = normalized(draft)?;
        let mut contact = self.find_owned(owner, id).await?;

        if contact.email != draft.email {
            let clash = self
                .contact_repository
                .find_by_email(owner.id, &draft.email)
                .await?;
            if clash.map_or(false, |other| other.id != id) {
                return Err(DomainError::conflict("Email is exist!"));
            }
        }

        contact.apply(draft, self.clock.now());
        self.contact_repository.update(contact).await
    }

    /// Flip the favorite flag; curators only
    pub async fn set_favorite(
        &self,
        actor: &User,
        id: Uuid,
        favorite: bool,
    ) -> DomainResult<Contact> {
        RoleAccess::CURATORS.check(actor)?;
        let mut contact = self.find_owned(actor, id).await?;
        contact.set_favorite(favorite, self.clock.now());
        self.contact_repository.update(contact).await
    }

    /// Remove an owned contact and return it
    pub async fn delete(&self, owner: &User, id: Uuid) -> DomainResult<Contact> {
        let removed = self
            .contact_repository
            .delete(owner.id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Not found"))?;
        info!("Contact {} deleted", removed.id);
        Ok(removed)
    }

    /// Case-insensitive substring search over names and email
    pub async fn search(&self, owner: &User, query: &str) -> DomainResult<Vec<Contact>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "query".to_string(),
            }
            .into());
        }

        let found = self.contact_repository.search(owner.id, query).await?;
        if found.is_empty() {
            return Err(DomainError::not_found("Contact Not Found"));
        }
        Ok(found)
    }

    /// Contacts whose next birthday falls within `days` days from today
    ///
    /// Ordered by how soon the birthday comes; the page is taken after
    /// filtering.
    pub async fn upcoming_birthdays(
        &self,
        owner: &User,
        days: u32,
        page: Pagination,
    ) -> DomainResult<Vec<Contact>> {
        let (min_days, max_days) = self.config.birthday_days_range;
        if !(min_days..=max_days).contains(&days) {
            return Err(ValidationError::OutOfRange {
                field: "days".to_string(),
                min: min_days as i64,
                max: max_days as i64,
            }
            .into());
        }
        check_limit(&page, self.config.birthday_limit_range)?;

        let today = self.clock.now().date_naive();
        let mut upcoming: Vec<_> = self
            .contact_repository
            .with_birthdays(owner.id)
            .await?
            .into_iter()
            .filter(|c| c.birthday_within(today, days))
            .filter_map(|c| c.next_birthday(today).map(|next| (next, c)))
            .collect();
        upcoming.sort_by_key(|(next, _)| *next);

        let contacts = page.apply(upcoming.into_iter().map(|(_, c)| c));
        if contacts.is_empty() {
            return Err(DomainError::not_found("No contacts found"));
        }
        Ok(contacts)
    }

    async fn find_owned(&self, owner: &User, id: Uuid) -> DomainResult<Contact> {
        self.contact_repository
            .find(owner.id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("Not found"))
    }

    async fn check_create_budget(&self, owner: &User) -> DomainResult<()> {
        if !self.config.rate_limit.enabled {
            return Ok(());
        }

        let key = create_contact_key(&owner.id);
        match self
            .rate_limiter
            .hit(&key, self.config.rate_limit.create_contact)
            .await
        {
            Ok(decision) if decision.allowed => Ok(()),
            Ok(decision) => {
                debug!("Contact creation throttled for {}", owner.id);
                Err(AuthError::RateLimitExceeded {
                    retry_after_seconds: decision.retry_after_seconds,
                }
                .into())
            }
            Err(e) => {
                warn!("Rate limiter unavailable, allowing request: {}", e);
                Ok(())
            }
        }
    }
}

fn check_limit(page: &Pagination, (min, max): (u32, u32)) -> DomainResult<()> {
    if page.limit_within(min, max) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: min as i64,
            max: max as i64,
        }
        .into())
    }
}

fn normalized(mut draft: ContactDraft) -> DomainResult<ContactDraft> {
    draft.email = normalize_email(&draft.email);
    draft.validate()?;
    Ok(draft)
}

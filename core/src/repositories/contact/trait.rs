//! Contact repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use cb_shared::types::Pagination;

use crate::domain::entities::contact::Contact;
use crate::errors::DomainError;

/// Optional filters for contact listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFilter {
    /// Restrict to contacts of one owner; `None` lists every owner's contacts
    pub owner_id: Option<Uuid>,
    /// Restrict by favorite flag
    pub favorite: Option<bool>,
}

impl ContactFilter {
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
            favorite: None,
        }
    }

    pub fn with_favorite(mut self, favorite: Option<bool>) -> Self {
        self.favorite = favorite;
        self
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        self.owner_id.map_or(true, |owner| contact.owner_id == owner)
            && self.favorite.map_or(true, |fav| contact.favorite == fav)
    }
}

/// Repository trait for Contact persistence
///
/// Every lookup that takes an `owner_id` only ever sees that owner's
/// contacts; a foreign id reads as absent.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List contacts matching the filter, ordered by creation time
    async fn list(
        &self,
        filter: ContactFilter,
        page: Pagination,
    ) -> Result<Vec<Contact>, DomainError>;

    /// Find one of the owner's contacts by id
    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError>;

    /// Find one of the owner's contacts by email
    async fn find_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> Result<Option<Contact>, DomainError>;

    /// Persist a new contact
    async fn create(&self, contact: Contact) -> Result<Contact, DomainError>;

    /// Overwrite an existing contact
    async fn update(&self, contact: Contact) -> Result<Contact, DomainError>;

    /// Remove one of the owner's contacts, returning it if it existed
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError>;

    /// Case-insensitive substring search over first name, last name and email
    async fn search(&self, owner_id: Uuid, query: &str) -> Result<Vec<Contact>, DomainError>;

    /// All of the owner's contacts that have a birthday recorded
    async fn with_birthdays(&self, owner_id: Uuid) -> Result<Vec<Contact>, DomainError>;
}

//! Mock implementation of ContactRepository for testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use cb_shared::types::Pagination;

use crate::domain::entities::contact::Contact;
use crate::errors::DomainError;

use super::trait_::{ContactFilter, ContactRepository};

/// In-memory contact store preserving insertion order
pub struct MockContactRepository {
    contacts: Arc<RwLock<Vec<Contact>>>,
}

impl MockContactRepository {
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.contacts.read().await.len()
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list(
        &self,
        filter: ContactFilter,
        page: Pagination,
    ) -> Result<Vec<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(page.apply(contacts.iter().filter(|c| filter.matches(c)).cloned()))
    }

    async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .find(|c| c.id == id && c.owner_id == owner_id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        owner_id: Uuid,
        email: &str,
    ) -> Result<Option<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .find(|c| c.owner_id == owner_id && c.email == email)
            .cloned())
    }

    async fn create(&self, contact: Contact) -> Result<Contact, DomainError> {
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact, DomainError> {
        let mut contacts = self.contacts.write().await;
        let slot = contacts
            .iter_mut()
            .find(|c| c.id == contact.id && c.owner_id == contact.owner_id)
            .ok_or_else(|| DomainError::not_found("Not found"))?;
        *slot = contact.clone();
        Ok(contact)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Contact>, DomainError> {
        let mut contacts = self.contacts.write().await;
        let position = contacts
            .iter()
            .position(|c| c.id == id && c.owner_id == owner_id);
        Ok(position.map(|index| contacts.remove(index)))
    }

    async fn search(&self, owner_id: Uuid, query: &str) -> Result<Vec<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| c.owner_id == owner_id && c.matches_query(query))
            .cloned()
            .collect())
    }

    async fn with_birthdays(&self, owner_id: Uuid) -> Result<Vec<Contact>, DomainError> {
        let contacts = self.contacts.read().await;
        Ok(contacts
            .iter()
            .filter(|c| c.owner_id == owner_id && c.birthday.is_some())
            .cloned()
            .collect())
    }
}

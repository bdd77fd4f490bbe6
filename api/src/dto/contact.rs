use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use cb_core::domain::entities::contact::{Contact, ContactDraft};
use cb_shared::types::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 25))]
    pub first_name: String,
    #[validate(length(min = 1, max = 25))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 25))]
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub comments: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl From<ContactRequest> for ContactDraft {
    fn from(request: ContactRequest) -> Self {
        ContactDraft {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            birthday: request.birthday,
            comments: request.comments,
            favorite: request.favorite,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRequest {
    pub favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub comments: Option<String>,
    pub favorite: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
            phone: contact.phone,
            birthday: contact.birthday,
            comments: contact.comments,
            favorite: contact.favorite,
            user_id: contact.owner_id,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

pub fn to_responses(contacts: Vec<Contact>) -> Vec<ContactResponse> {
    contacts.into_iter().map(ContactResponse::from).collect()
}

/// `?skip=&limit=&favorite=` on listing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_list_limit")]
    pub limit: u32,
    pub favorite: Option<bool>,
}

impl ListQuery {
    pub fn page(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

/// `?days=&skip=&limit=` on the birthday endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BirthdayQuery {
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_list_limit")]
    pub limit: u32,
}

impl BirthdayQuery {
    pub fn page(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

fn default_list_limit() -> u32 {
    10
}

fn default_days() -> u32 {
    7
}

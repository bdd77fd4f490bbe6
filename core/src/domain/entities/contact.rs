//! Contact entity: an address book entry owned by exactly one user.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cb_shared::utils::validation::{is_valid_email, length_between};

use crate::errors::ValidationError;

/// Maximum length of first and last names
pub const NAME_MAX_LENGTH: usize = 25;

/// Maximum length of a phone number
pub const PHONE_MAX_LENGTH: usize = 25;

/// Contact entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    /// The user this contact belongs to
    pub owner_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub comments: Option<String>,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller supplied contact fields, used for both create and full update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub comments: Option<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl ContactDraft {
    /// Checks field lengths and the email format
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if !length_between(value, 1, NAME_MAX_LENGTH) {
                return Err(ValidationError::InvalidLength {
                    field: field.to_string(),
                    min: 1,
                    max: NAME_MAX_LENGTH,
                });
            }
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if let Some(phone) = &self.phone {
            if !length_between(phone, 0, PHONE_MAX_LENGTH) {
                return Err(ValidationError::InvalidLength {
                    field: "phone".to_string(),
                    min: 0,
                    max: PHONE_MAX_LENGTH,
                });
            }
        }
        Ok(())
    }
}

impl Contact {
    /// Builds a new contact for `owner_id` from a draft
    pub fn from_draft(owner_id: Uuid, draft: ContactDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            birthday: draft.birthday,
            comments: draft.comments,
            favorite: draft.favorite,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every editable field with the draft
    pub fn apply(&mut self, draft: ContactDraft, now: DateTime<Utc>) {
        self.first_name = draft.first_name;
        self.last_name = draft.last_name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.birthday = draft.birthday;
        self.comments = draft.comments;
        self.favorite = draft.favorite;
        self.updated_at = now;
    }

    pub fn set_favorite(&mut self, favorite: bool, now: DateTime<Utc>) {
        self.favorite = favorite;
        self.updated_at = now;
    }

    /// Case-insensitive substring match on first name, last name and email
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [&self.first_name, &self.last_name, &self.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// The next anniversary of the birthday on or after `today`
    ///
    /// A Feb 29 birthday falls on Feb 28 in non-leap years.
    pub fn next_birthday(&self, today: NaiveDate) -> Option<NaiveDate> {
        let birthday = self.birthday?;
        let this_year = anniversary_in(birthday, today.year())?;
        if this_year >= today {
            Some(this_year)
        } else {
            anniversary_in(birthday, today.year() + 1)
        }
    }

    /// Whether the next birthday lies within `[today, today + days]`
    pub fn birthday_within(&self, today: NaiveDate, days: u32) -> bool {
        match self.next_birthday(today) {
            Some(next) => next <= today + Duration::days(days as i64),
            None => false,
        }
    }
}

fn anniversary_in(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> ContactDraft {
        ContactDraft {
            first_name: "Ivan".to_string(),
            last_name: "Batig".to_string(),
            email: "ivan@example.com".to_string(),
            phone: Some("+380441234567".to_string()),
            birthday: Some(date(1990, 3, 10)),
            comments: None,
            favorite: false,
        }
    }

    fn contact_born(birthday: NaiveDate) -> Contact {
        let mut d = draft();
        d.birthday = Some(birthday);
        Contact::from_draft(Uuid::new_v4(), d, Utc::now())
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft().validate().is_ok());

        let mut bad = draft();
        bad.first_name = String::new();
        assert!(matches!(bad.validate(), Err(ValidationError::InvalidLength { .. })));

        let mut bad = draft();
        bad.last_name = "x".repeat(26);
        assert!(bad.validate().is_err());

        let mut bad = draft();
        bad.email = "not-an-email".to_string();
        assert_eq!(bad.validate(), Err(ValidationError::InvalidEmail));

        let mut bad = draft();
        bad.phone = Some("1".repeat(26));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let contact = Contact::from_draft(Uuid::new_v4(), draft(), Utc::now());
        assert!(contact.matches_query("iva"));
        assert!(contact.matches_query("BATIG"));
        assert!(contact.matches_query("example.COM"));
        assert!(!contact.matches_query("oleg"));
    }

    #[test]
    fn test_birthday_window_is_inclusive() {
        let today = date(2024, 3, 1);
        assert!(contact_born(date(1990, 3, 1)).birthday_within(today, 7));
        assert!(contact_born(date(1990, 3, 8)).birthday_within(today, 7));
        assert!(!contact_born(date(1990, 3, 9)).birthday_within(today, 7));
        assert!(!contact_born(date(1990, 2, 28)).birthday_within(today, 7));
    }

    #[test]
    fn test_birthday_rolls_over_year_end() {
        let today = date(2023, 12, 28);
        let contact = contact_born(date(1985, 1, 2));
        assert_eq!(contact.next_birthday(today), Some(date(2024, 1, 2)));
        assert!(contact.birthday_within(today, 7));
    }

    #[test]
    fn test_leap_day_birthday_in_common_year() {
        let contact = contact_born(date(2000, 2, 29));
        assert_eq!(contact.next_birthday(date(2023, 2, 1)), Some(date(2023, 2, 28)));
        assert_eq!(contact.next_birthday(date(2024, 2, 1)), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_no_birthday_never_matches() {
        let mut d = draft();
        d.birthday = None;
        let contact = Contact::from_draft(Uuid::new_v4(), d, Utc::now());
        assert!(!contact.birthday_within(date(2024, 1, 1), 30));
    }

    #[test]
    fn test_apply_overwrites_fields() {
        let mut contact = Contact::from_draft(Uuid::new_v4(), draft(), Utc::now());
        let mut update = draft();
        update.first_name = "Oleg".to_string();
        update.favorite = true;
        contact.apply(update, Utc::now());
        assert_eq!(contact.first_name, "Oleg");
        assert!(contact.favorite);
    }
}

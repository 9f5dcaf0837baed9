use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, ContactStatus, Document};

/// Contact form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactFilters {
    pub status: Option<ContactStatus>,
}

impl Contact {
    pub fn from_request(request: CreateContactRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(Self::ID_PREFIX),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            subject: request
                .subject
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            message: request.message.trim().to_string(),
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ContactStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn matches_filters(&self, filters: &ContactFilters) -> bool {
        filters.status.map_or(true, |status| self.status == status)
    }
}

impl Document for Contact {
    const KIND: &'static str = "Contact";
    const ID_PREFIX: char = 'C';

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_starts_new() {
        let contact = Contact::from_request(CreateContactRequest {
            name: " Dana Whitfield ".to_string(),
            email: "Dana@Example.com".to_string(),
            subject: Some("  ".to_string()),
            message: "Is the linen set available in sage?".to_string(),
        });

        assert!(contact.id.starts_with('C'));
        assert_eq!(contact.name, "Dana Whitfield");
        assert_eq!(contact.email, "dana@example.com");
        assert_eq!(contact.subject, None);
        assert_eq!(contact.status, ContactStatus::New);
    }

    #[test]
    fn test_any_status_transition_allowed() {
        let mut contact = Contact::from_request(CreateContactRequest {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            subject: None,
            message: "Hello there, quick question".to_string(),
        });

        contact.set_status(ContactStatus::Resolved);
        assert_eq!(contact.status, ContactStatus::Resolved);
        contact.set_status(ContactStatus::New);
        assert_eq!(contact.status, ContactStatus::New);

        assert!(contact.matches_filters(&ContactFilters::default()));
        assert!(!contact.matches_filters(&ContactFilters {
            status: Some(ContactStatus::InProgress)
        }));
    }
}

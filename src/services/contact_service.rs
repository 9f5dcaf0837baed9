use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    sort_newest_first, validate_document_id, Contact, ContactFilters, ContactStatus,
    CreateContactRequest, Document, ListResponse, PageRequest, ServiceError, ServiceResult,
    Validate,
};
use crate::repositories::DocumentRepository;

use super::catalog_service::not_found_or;

/// Contact form intake and admin handling
pub struct ContactService {
    repository: Arc<dyn DocumentRepository<Contact>>,
}

impl ContactService {
    pub fn new(repository: Arc<dyn DocumentRepository<Contact>>) -> Self {
        Self { repository }
    }

    /// Store a submission with status `new`
    #[instrument(skip(self, request))]
    pub async fn submit(&self, request: CreateContactRequest) -> ServiceResult<Contact> {
        request.validate()?;

        let contact = self
            .repository
            .create(Contact::from_request(request))
            .await?;

        crate::info_with_trace!("Contact submission {} stored", contact.id);
        Ok(contact)
    }

    /// Newest first
    #[instrument(skip(self), fields(filters = ?filters))]
    pub async fn list(
        &self,
        filters: ContactFilters,
        page: PageRequest,
    ) -> ServiceResult<ListResponse<Contact>> {
        page.validate()?;

        let mut contacts: Vec<Contact> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|contact| contact.matches_filters(&filters))
            .collect();
        sort_newest_first(&mut contacts);

        Ok(ListResponse::from_page(contacts, &page))
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    pub async fn get(&self, id: &str) -> ServiceResult<Contact> {
        validate_document_id("contact_id", id, Contact::ID_PREFIX)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Contact::KIND, id))
    }

    /// Any status may follow any other
    #[instrument(skip(self), fields(contact_id = %id, status = %status))]
    pub async fn update_status(&self, id: &str, status: ContactStatus) -> ServiceResult<Contact> {
        let mut contact = self.get(id).await?;
        let previous = contact.status;
        contact.set_status(status);

        let updated = self
            .repository
            .update(contact)
            .await
            .map_err(|e| not_found_or(e, Contact::KIND, id))?;

        crate::info_with_trace!("Contact {} moved from {} to {}", id, previous, status);
        Ok(updated)
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        validate_document_id("contact_id", id, Contact::ID_PREFIX)?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| not_found_or(e, Contact::KIND, id))?;

        crate::info_with_trace!("Contact {} deleted", id);
        Ok(())
    }

    /// Count per status, every status present
    pub async fn count_by_status(&self) -> ServiceResult<BTreeMap<ContactStatus, usize>> {
        let mut counts: BTreeMap<ContactStatus, usize> =
            ContactStatus::ALL.iter().map(|status| (*status, 0)).collect();
        for contact in self.repository.find_all().await? {
            *counts.entry(contact.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

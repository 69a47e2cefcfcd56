use crate::application::services::{require_credentials, required};
use crate::domain::entities::{Contact, ContactSearchResult, IdentificationMethod};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::crm_client::{CrmClient, CrmObjectType};
use crate::shared::LookupRateLimiter;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CONTACT_PROPERTIES: &[&str] = &["firstname", "lastname", "email", "mobilephone"];

const MISSING_IDENTIFICATION: &str = "Identification method and value are required";

#[derive(Clone)]
pub struct ContactService {
    crm: Arc<dyn CrmClient>,
    rate_limiter: LookupRateLimiter,
    phone_country_code: String,
}

impl ContactService {
    pub fn new(
        crm: Arc<dyn CrmClient>,
        rate_limiter: LookupRateLimiter,
        phone_country_code: impl Into<String>,
    ) -> Self {
        Self {
            crm,
            rate_limiter,
            phone_country_code: phone_country_code.into(),
        }
    }

    pub fn rate_limiter(&self) -> LookupRateLimiter {
        self.rate_limiter.clone()
    }

    /// Look a contact up by phone or email
    ///
    /// Phone values are normalized to international format first. A missing
    /// contact is a regular `found: false` result, not an error.
    pub async fn search_contact(
        &self,
        method: Option<&str>,
        value: Option<&str>,
    ) -> DomainResult<ContactSearchResult> {
        let method = required(method, MISSING_IDENTIFICATION)?;
        let value = required(value, MISSING_IDENTIFICATION)?;
        let method: IdentificationMethod = method
            .parse()
            .map_err(|_| DomainError::ValidationError(MISSING_IDENTIFICATION.to_string()))?;

        require_credentials(self.crm.as_ref())?;

        let normalized = method.normalize(value, &self.phone_country_code);

        if let Err(wait) = self.rate_limiter.check(&normalized) {
            warn!("Contact lookup rate limited for method {}", method);
            return Err(DomainError::RateLimited {
                retry_after_seconds: wait.as_secs().max(1),
            });
        }

        info!("Searching contact by {}", method);
        debug!("Normalized identification value: {}", normalized);

        let found = self
            .crm
            .search_one(
                CrmObjectType::Contacts,
                method.crm_property(),
                &normalized,
                CONTACT_PROPERTIES,
            )
            .await?;

        match found {
            Some(object) => {
                let contact = Contact::from_parts(
                    object.id.clone(),
                    object.prop("firstname"),
                    object.prop("lastname"),
                    object.prop("email"),
                    object.prop("mobilephone"),
                );
                info!("Contact {} found", contact.contact_id);
                Ok(ContactSearchResult::found(contact))
            }
            None => {
                info!("No contact found by {}", method);
                Ok(ContactSearchResult::not_found(method))
            }
        }
    }
}

pub mod contact_service;
pub mod deal_service;
pub mod message_service;
pub mod ticket_service;

pub use contact_service::ContactService;
pub use deal_service::DealService;
pub use message_service::MessageService;
pub use ticket_service::TicketService;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::crm_client::{CrmClient, CrmError};

/// Fail fast when no CRM credential is available, before any side effect
pub(crate) fn require_credentials(crm: &dyn CrmClient) -> DomainResult<()> {
    if crm.is_configured() {
        Ok(())
    } else {
        Err(DomainError::from(CrmError::MissingCredential))
    }
}

/// Trimmed required text field, or a validation error carrying `message`
pub(crate) fn required<'a>(value: Option<&'a str>, message: &str) -> DomainResult<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::ValidationError(message.to_string()))
}

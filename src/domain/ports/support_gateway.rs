use crate::domain::entities::{
    ContactSearchResult, CreatedTicket, Deal, IdentificationMethod, NewTicket, PhotoAttachment,
    Ticket, TicketMessage,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway unreachable: {0}")]
    Transport(String),
    #[error("Gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The gateway operations the ticket wizard depends on
#[async_trait]
pub trait SupportGateway: Send + Sync {
    async fn search_contact(
        &self,
        method: IdentificationMethod,
        value: &str,
    ) -> GatewayResult<ContactSearchResult>;

    async fn search_tickets(&self, contact_id: &str) -> GatewayResult<Vec<Ticket>>;

    async fn search_deals(&self, contact_id: &str) -> GatewayResult<Vec<Deal>>;

    async fn create_ticket(&self, ticket: NewTicket) -> GatewayResult<CreatedTicket>;

    async fn ticket_messages(&self, ticket_id: &str) -> GatewayResult<Vec<TicketMessage>>;

    async fn attachments(&self, attachment_ids: &[String]) -> GatewayResult<Vec<PhotoAttachment>>;
}

//! JSON bodies exchanged between the ticket wizard and the gateway

use crate::domain::entities::{
    ContactSession, CreatedTicket, Deal, PhotoAttachment, Ticket, TicketMessage,
};
use serde::{Deserialize, Serialize};

/// Part names of the `create-ticket` multipart form
pub mod ticket_form {
    pub const CONTACT_ID: &str = "contactId";
    pub const DEAL_ID: &str = "dealId";
    pub const SUBJECT: &str = "subject";
    pub const DESCRIPTION: &str = "description";
    pub const ADMIN_EMAIL: &str = "adminEmail";
    pub const ADMIN_NOTES: &str = "adminNotes";
    pub const FILES: &str = "files";
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchContactRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactIdRequest {
    #[serde(default)]
    pub contact_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketIdRequest {
    #[serde(default)]
    pub ticket_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentIdsRequest {
    #[serde(default)]
    pub attachment_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketsResponse {
    pub success: bool,
    pub tickets: Vec<Ticket>,
    pub count: usize,
}

impl From<Vec<Ticket>> for TicketsResponse {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self {
            success: true,
            count: tickets.len(),
            tickets,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DealsResponse {
    pub success: bool,
    pub deals: Vec<Deal>,
    pub count: usize,
}

impl From<Vec<Deal>> for DealsResponse {
    fn from(deals: Vec<Deal>) -> Self {
        Self {
            success: true,
            count: deals.len(),
            deals,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<TicketMessage>,
    pub count: usize,
}

impl From<Vec<TicketMessage>> for MessagesResponse {
    fn from(messages: Vec<TicketMessage>) -> Self {
        Self {
            success: true,
            count: messages.len(),
            messages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttachmentsResponse {
    pub success: bool,
    pub attachments: Vec<PhotoAttachment>,
    pub count: usize,
}

impl From<Vec<PhotoAttachment>> for AttachmentsResponse {
    fn from(attachments: Vec<PhotoAttachment>) -> Self {
        Self {
            success: true,
            count: attachments.len(),
            attachments,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    pub success: bool,
    pub ticket: CreatedTicket,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactSessionResponse {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<ContactSession>,
}

/// Error body shared by every route; `found` replaces `success` on contact search
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

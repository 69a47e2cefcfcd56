use crate::shared::utils::crm_time::parse_crm_timestamp;
use serde::{Deserialize, Serialize};

/// Direction of an email engagement, as coded by the CRM
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDirection {
    /// Written by the customer
    Incoming,
    /// Written by a support agent
    Outgoing,
    Other(String),
}

impl MessageDirection {
    pub fn as_str(&self) -> &str {
        match self {
            MessageDirection::Incoming => "INCOMING_EMAIL",
            MessageDirection::Outgoing => "EMAIL",
            MessageDirection::Other(code) => code,
        }
    }
}

impl From<&str> for MessageDirection {
    fn from(code: &str) -> Self {
        match code {
            "INCOMING_EMAIL" => MessageDirection::Incoming,
            "EMAIL" => MessageDirection::Outgoing,
            other => MessageDirection::Other(other.to_string()),
        }
    }
}

/// One email exchanged on a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: String,
    pub timestamp: Option<String>,
    /// Sanitized HTML body
    pub text: String,
    pub direction: String,
    pub subject: String,
    pub attachment_ids: Vec<String>,
    pub is_client: bool,
    #[serde(rename = "isEnsol")]
    pub is_agent: bool,
}

impl TicketMessage {
    /// Build a message, returning `None` for directions the customer must not see
    pub fn classify(
        id: String,
        timestamp: Option<String>,
        text: String,
        direction: MessageDirection,
        subject: String,
        attachment_ids: Vec<String>,
    ) -> Option<Self> {
        let (is_client, is_agent) = match direction {
            MessageDirection::Incoming => (true, false),
            MessageDirection::Outgoing => (false, true),
            MessageDirection::Other(_) => return None,
        };

        Some(Self {
            id,
            timestamp,
            text,
            direction: direction.as_str().to_string(),
            subject,
            attachment_ids,
            is_client,
            is_agent,
        })
    }
}

/// Split the CRM `hs_attachment_ids` value
pub fn split_attachment_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Oldest first; undated messages go last, ties keep input order
pub fn sort_chronologically(messages: &mut [TicketMessage]) {
    messages.sort_by(|a, b| {
        let a = a.timestamp.as_deref().and_then(parse_crm_timestamp);
        let b = b.timestamp.as_deref().and_then(parse_crm_timestamp);
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Every attachment id referenced by a conversation, first occurrence order
pub fn collect_attachment_ids(messages: &[TicketMessage]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in messages.iter().flat_map(|m| m.attachment_ids.iter()) {
        if !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

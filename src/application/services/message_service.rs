use crate::application::services::{require_credentials, required};
use crate::domain::entities::{
    sort_chronologically, split_attachment_ids, MessageDirection, PhotoAttachment, TicketMessage,
};
use crate::domain::errors::DomainResult;
use crate::domain::ports::crm_client::{CrmClient, CrmObject, CrmObjectType};
use crate::shared::html_sanitizer::sanitize_message_html;
use std::sync::Arc;
use tracing::{debug, info};

const EMAIL_PROPERTIES: &[&str] = &[
    "hs_timestamp",
    "hs_email_text",
    "hs_email_html",
    "hs_email_direction",
    "hs_email_subject",
    "hs_attachment_ids",
];

/// Conversation of a ticket and the photos attached to it
#[derive(Clone)]
pub struct MessageService {
    crm: Arc<dyn CrmClient>,
}

impl MessageService {
    pub fn new(crm: Arc<dyn CrmClient>) -> Self {
        Self { crm }
    }

    /// Customer-visible emails of a ticket, oldest first
    pub async fn ticket_messages(
        &self,
        ticket_id: Option<&str>,
    ) -> DomainResult<Vec<TicketMessage>> {
        let ticket_id = required(ticket_id, "Ticket ID is required")?;
        require_credentials(self.crm.as_ref())?;

        info!("Fetching messages for ticket {}", ticket_id);

        let email_ids = self
            .crm
            .associated_ids(CrmObjectType::Tickets, ticket_id, CrmObjectType::Emails)
            .await?;
        if email_ids.is_empty() {
            info!("Ticket {} has no messages", ticket_id);
            return Ok(Vec::new());
        }

        let objects = self
            .crm
            .batch_read(CrmObjectType::Emails, &email_ids, EMAIL_PROPERTIES)
            .await?;

        let mut messages: Vec<TicketMessage> =
            objects.iter().filter_map(message_from_object).collect();
        sort_chronologically(&mut messages);

        info!(
            "Ticket {} has {} visible message(s) out of {}",
            ticket_id,
            messages.len(),
            objects.len()
        );
        Ok(messages)
    }

    /// Photo metadata for the given file ids
    ///
    /// Files are read one at a time; a file that no longer exists is skipped.
    pub async fn attachments(
        &self,
        attachment_ids: &[String],
    ) -> DomainResult<Vec<PhotoAttachment>> {
        let ids: Vec<&str> = attachment_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        require_credentials(self.crm.as_ref())?;

        info!("Fetching {} attachment(s)", ids.len());

        let mut photos = Vec::new();
        for id in ids {
            let Some(file) = self.crm.get_file(id).await? else {
                debug!("Attachment {} no longer exists", id);
                continue;
            };

            let file_id = if file.id.is_empty() {
                id.to_string()
            } else {
                file.id
            };

            match PhotoAttachment::from_file(
                file_id,
                file.name,
                file.extension,
                file.file_type,
                file.size,
                file.url,
                file.created_at,
            ) {
                Some(photo) => photos.push(photo),
                None => debug!("Attachment {} is not a displayable photo", id),
            }
        }

        info!("{} photo attachment(s) kept", photos.len());
        Ok(photos)
    }
}

fn message_from_object(object: &CrmObject) -> Option<TicketMessage> {
    let direction = MessageDirection::from(object.prop("hs_email_direction").unwrap_or_default());

    let text = object
        .prop("hs_email_html")
        .or_else(|| object.prop("hs_email_text"))
        .map(sanitize_message_html)
        .unwrap_or_default();

    TicketMessage::classify(
        object.id.clone(),
        object.prop_owned("hs_timestamp"),
        text,
        direction,
        object.prop_owned("hs_email_subject").unwrap_or_default(),
        split_attachment_ids(object.prop("hs_attachment_ids")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrmConfig;
    use crate::domain::errors::DomainError;
    use crate::infrastructure::crm::HubSpotClient;
    use std::collections::HashMap;

    fn email(id: &str, props: &[(&str, &str)]) -> CrmObject {
        CrmObject {
            id: id.to_string(),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_html_body_preferred_and_sanitized() {
        let message = message_from_object(&email(
            "1",
            &[
                ("hs_email_direction", "INCOMING_EMAIL"),
                ("hs_email_html", "<p>Bonjour</p><script>x()</script>"),
                ("hs_email_text", "Bonjour texte"),
                ("hs_attachment_ids", "11;12"),
            ],
        ))
        .unwrap();

        assert_eq!(message.text, "<p>Bonjour</p>");
        assert!(message.is_client);
        assert!(!message.is_agent);
        assert_eq!(message.attachment_ids, vec!["11", "12"]);
    }

    #[test]
    fn test_plain_text_fallback() {
        let message = message_from_object(&email(
            "2",
            &[("hs_email_direction", "EMAIL"), ("hs_email_text", "Réponse")],
        ))
        .unwrap();
        assert_eq!(message.text, "Réponse");
        assert!(message.is_agent);
    }

    #[test]
    fn test_unclassified_direction_dropped() {
        let forwarded = email("3", &[("hs_email_direction", "FORWARDED_EMAIL")]);
        assert!(message_from_object(&forwarded).is_none());
        assert!(message_from_object(&email("4", &[])).is_none());
    }

    #[tokio::test]
    async fn test_empty_attachment_list_needs_no_credential() {
        let crm = HubSpotClient::new(&CrmConfig::new("http://127.0.0.1:9", None)).unwrap();
        let service = MessageService::new(Arc::new(crm));

        let photos = service.attachments(&[" ".to_string()]).await.unwrap();
        assert!(photos.is_empty());

        let result = service.ticket_messages(Some("5")).await;
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}

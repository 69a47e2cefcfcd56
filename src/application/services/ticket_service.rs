use crate::application::services::{require_credentials, required};
use crate::config::{CrmConfig, SupportMailbox};
use crate::domain::entities::{
    sort_newest_first, AdminNote, CreatedTicket, NewTicket, Ticket, MAX_TICKET_FILES,
    NEW_TICKET_PIPELINE_STAGE,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::crm_client::{
    association_types, CrmAssociation, CrmClient, CrmObject, CrmObjectType, NewCrmObject,
};
use crate::shared::html_sanitizer::{escape_html, text_to_html};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

const TICKET_PROPERTIES: &[&str] = &[
    "hs_ticket_id",
    "subject",
    "hs_pipeline_stage",
    "hs_ticket_priority",
    "createdate",
    "hs_lastmodifieddate",
];

const CONTACT_DETAIL_PROPERTIES: &[&str] = &["email", "firstname", "lastname"];

/// Sender shown on the engagement of a ticket
#[derive(Debug, Clone, PartialEq)]
struct EngagementSender {
    email: String,
    first_name: String,
    last_name: String,
}

impl EngagementSender {
    fn fallback() -> Self {
        Self {
            email: "unknown@example.com".to_string(),
            first_name: "Unknown".to_string(),
            last_name: "Contact".to_string(),
        }
    }

    fn from_contact(object: &CrmObject) -> Self {
        let fallback = Self::fallback();
        Self {
            email: object.prop_owned("email").unwrap_or(fallback.email),
            first_name: object.prop_owned("firstname").unwrap_or(fallback.first_name),
            last_name: object.prop_owned("lastname").unwrap_or(fallback.last_name),
        }
    }
}

#[derive(Clone)]
pub struct TicketService {
    crm: Arc<dyn CrmClient>,
    upload_folder_id: String,
    support_mailbox: SupportMailbox,
}

impl TicketService {
    pub fn new(crm: Arc<dyn CrmClient>, config: &CrmConfig) -> Self {
        Self {
            crm,
            upload_folder_id: config.upload_folder_id.clone(),
            support_mailbox: config.support_mailbox.clone(),
        }
    }

    /// Tickets associated to a contact, newest first
    pub async fn search_tickets(&self, contact_id: Option<&str>) -> DomainResult<Vec<Ticket>> {
        let contact_id = required(contact_id, "Contact ID is required")?;
        require_credentials(self.crm.as_ref())?;

        info!("Searching tickets for contact {}", contact_id);

        let ticket_ids = self
            .crm
            .associated_ids(CrmObjectType::Contacts, contact_id, CrmObjectType::Tickets)
            .await?;
        if ticket_ids.is_empty() {
            info!("Contact {} has no tickets", contact_id);
            return Ok(Vec::new());
        }

        let objects = self
            .crm
            .batch_read(CrmObjectType::Tickets, &ticket_ids, TICKET_PROPERTIES)
            .await?;

        let mut tickets: Vec<Ticket> = objects.iter().map(ticket_from_object).collect();
        sort_newest_first(&mut tickets);

        info!("Contact {} has {} ticket(s)", contact_id, tickets.len());
        Ok(tickets)
    }

    /// Open a ticket on behalf of a contact
    ///
    /// Files are uploaded one by one and a failed upload is skipped. Once the
    /// ticket exists, failures of the engagement or admin note are only
    /// logged: the ticket is never rolled back.
    pub async fn create_ticket(&self, ticket: NewTicket) -> DomainResult<CreatedTicket> {
        let contact_id =
            required(Some(ticket.contact_id.as_str()), "Contact ID is required")?.to_string();
        let subject = required(Some(ticket.subject.as_str()), "Subject is required")?.to_string();
        required(Some(ticket.description.as_str()), "Description is required")?;
        if ticket.files.len() > MAX_TICKET_FILES {
            return Err(DomainError::ValidationError(format!(
                "At most {} files can be attached",
                MAX_TICKET_FILES
            )));
        }
        let deal_id = ticket
            .deal_id
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        require_credentials(self.crm.as_ref())?;

        info!(
            "Creating ticket for contact {} (deal: {:?}, files: {})",
            contact_id,
            deal_id,
            ticket.files.len()
        );

        let uploaded_ids = self.upload_files(&ticket).await;

        let mut new_ticket = NewCrmObject::default()
            .property("hs_pipeline_stage", NEW_TICKET_PIPELINE_STAGE)
            .property("subject", subject.as_str())
            .property("is_created_from_support_portal", "true")
            .associate(CrmAssociation::new(
                contact_id.as_str(),
                association_types::CONTACT_TO_TICKET,
            ));
        if let Some(deal_id) = &deal_id {
            new_ticket = new_ticket.associate(CrmAssociation::new(
                deal_id.as_str(),
                association_types::DEAL_TO_TICKET,
            ));
        }

        let ticket_id = self
            .crm
            .create_object(CrmObjectType::Tickets, new_ticket)
            .await?;
        info!("Ticket {} created for contact {}", ticket_id, contact_id);

        let sender = self.engagement_sender(&contact_id).await;
        let engagement = self.engagement(
            &contact_id,
            &ticket_id,
            &subject,
            &ticket.description,
            &sender,
            &uploaded_ids,
        );
        match self.crm.create_object(CrmObjectType::Emails, engagement).await {
            Ok(id) => info!("Engagement {} attached to ticket {}", id, ticket_id),
            Err(e) => error!("Failed to create engagement for ticket {}: {}", ticket_id, e),
        }

        if let Some(note) = &ticket.admin_note {
            match self
                .crm
                .create_object(CrmObjectType::Notes, admin_note(&ticket_id, note))
                .await
            {
                Ok(id) => info!("Admin note {} attached to ticket {}", id, ticket_id),
                Err(e) => error!("Failed to create admin note for ticket {}: {}", ticket_id, e),
            }
        }

        Ok(CreatedTicket {
            id: ticket_id,
            subject,
        })
    }

    async fn upload_files(&self, ticket: &NewTicket) -> Vec<String> {
        let mut uploaded = Vec::with_capacity(ticket.files.len());

        for file in &ticket.files {
            match self.crm.upload_file(file, &self.upload_folder_id).await {
                Ok(id) => {
                    info!("Uploaded {} ({} bytes) as file {}", file.name, file.size(), id);
                    uploaded.push(id);
                }
                Err(e) => {
                    warn!("Skipping file {}: upload failed: {}", file.name, e);
                    metrics::counter!("ticket_uploads_failed_total").increment(1);
                }
            }
        }

        uploaded
    }

    async fn engagement_sender(&self, contact_id: &str) -> EngagementSender {
        match self
            .crm
            .get_object(CrmObjectType::Contacts, contact_id, CONTACT_DETAIL_PROPERTIES)
            .await
        {
            Ok(contact) => EngagementSender::from_contact(&contact),
            Err(e) => {
                warn!("Failed to fetch details of contact {}: {}", contact_id, e);
                EngagementSender::fallback()
            }
        }
    }

    fn engagement(
        &self,
        contact_id: &str,
        ticket_id: &str,
        subject: &str,
        description: &str,
        sender: &EngagementSender,
        uploaded_ids: &[String],
    ) -> NewCrmObject {
        let headers = json!({
            "from": {
                "email": sender.email,
                "firstName": sender.first_name,
                "lastName": sender.last_name,
            },
            "to": [{
                "email": self.support_mailbox.email,
                "firstName": self.support_mailbox.first_name,
                "lastName": self.support_mailbox.last_name,
            }],
            "cc": [],
            "bcc": [],
        });

        let mut engagement = NewCrmObject::default()
            .property("hs_email_direction", "INCOMING_EMAIL")
            .property("hs_timestamp", chrono::Utc::now().timestamp_millis())
            .property("hs_email_status", "SENT")
            .property("hs_email_subject", subject)
            .property("hs_email_html", text_to_html(description))
            .property("hs_email_headers", headers.to_string())
            .associate(CrmAssociation::new(
                contact_id,
                association_types::EMAIL_TO_CONTACT,
            ))
            .associate(CrmAssociation::new(
                ticket_id,
                association_types::EMAIL_TO_TICKET,
            ));

        if !uploaded_ids.is_empty() {
            engagement = engagement.property("hs_attachment_ids", uploaded_ids.join(";"));
        }

        engagement
    }
}

fn ticket_from_object(object: &CrmObject) -> Ticket {
    Ticket::new(
        object.id.clone(),
        object.prop_owned("hs_ticket_id"),
        object.prop_owned("subject"),
        object.prop_owned("hs_pipeline_stage"),
        object.prop_owned("hs_ticket_priority"),
        object.prop_owned("createdate"),
        object.prop_owned("hs_lastmodifieddate"),
    )
}

fn admin_note(ticket_id: &str, note: &AdminNote) -> NewCrmObject {
    NewCrmObject::default()
        .property("hs_timestamp", chrono::Utc::now().timestamp_millis())
        .property("hs_note_body", admin_note_html(note))
        .associate(CrmAssociation::new(
            ticket_id,
            association_types::NOTE_TO_TICKET,
        ))
}

/// Highlighted author line followed by one paragraph per note line
fn admin_note_html(note: &AdminNote) -> String {
    let paragraphs: String = note
        .notes
        .replace("\r\n", "\n")
        .split('\n')
        .map(|line| format!("<p style=\"margin:0;\">{}</p>", escape_html(line)))
        .collect();

    format!(
        "<div dir=\"auto\" data-top-level=\"true\">\
         <p style=\"margin:0;\"><strong><span style=\"background-color: #FFF2CC;\">\
         Notes partagées par l'Ensolien [{}]</span></strong></p>{}<br></div>",
        escape_html(&note.email),
        paragraphs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UploadedFile;
    use crate::infrastructure::crm::HubSpotClient;
    use std::collections::HashMap;

    fn service(token: Option<&str>) -> TicketService {
        let config = CrmConfig::new("http://127.0.0.1:9", token.map(str::to_string));
        let crm = HubSpotClient::new(&config).unwrap();
        TicketService::new(Arc::new(crm), &config)
    }

    fn validation_message(result: DomainResult<CreatedTicket>) -> String {
        match result {
            Err(DomainError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_required_fields() {
        let svc = service(Some("token"));

        let missing_contact = NewTicket::new(" ".into(), "Panne".into(), "Onduleur".into());
        assert_eq!(
            validation_message(svc.create_ticket(missing_contact).await),
            "Contact ID is required"
        );

        let missing_subject = NewTicket::new("1".into(), "".into(), "Onduleur".into());
        assert_eq!(
            validation_message(svc.create_ticket(missing_subject).await),
            "Subject is required"
        );

        let missing_description = NewTicket::new("1".into(), "Panne".into(), "\n".into());
        assert_eq!(
            validation_message(svc.create_ticket(missing_description).await),
            "Description is required"
        );
    }

    #[tokio::test]
    async fn test_too_many_files() {
        let mut ticket = NewTicket::new("1".into(), "Panne".into(), "Onduleur".into());
        ticket.files = (0..7)
            .map(|i| UploadedFile::new(format!("photo{}.jpg", i), "image/jpeg", vec![0u8; 4]))
            .collect();

        assert_eq!(
            validation_message(service(Some("token")).create_ticket(ticket).await),
            "At most 6 files can be attached"
        );
    }

    #[tokio::test]
    async fn test_missing_credential_before_side_effects() {
        let ticket = NewTicket::new("1".into(), "Panne".into(), "Onduleur".into());
        let result = service(None).create_ticket(ticket).await;
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_ticket_defaults() {
        let ticket = ticket_from_object(&CrmObject {
            id: "42".to_string(),
            properties: HashMap::new(),
        });
        assert_eq!(ticket.ticket_id, "42");
        assert_eq!(ticket.subject, "Sans titre");
        assert_eq!(ticket.status, "unknown");
        assert_eq!(ticket.pipeline_stage, "unknown");
        assert_eq!(ticket.priority, "medium");
    }

    #[test]
    fn test_admin_note_escapes_and_splits_lines() {
        let html = admin_note_html(&AdminNote {
            email: "agent@goensol.com".to_string(),
            notes: "Client rappelé\n<urgent>".to_string(),
        });
        assert!(html.contains("Notes partagées par l'Ensolien [agent@goensol.com]"));
        assert!(html.contains("<p style=\"margin:0;\">Client rappelé</p>"));
        assert!(html.contains("<p style=\"margin:0;\">&lt;urgent&gt;</p>"));
    }

    #[test]
    fn test_engagement_sender_fallback() {
        let sender = EngagementSender::from_contact(&CrmObject {
            id: "1".to_string(),
            properties: HashMap::from([("email".to_string(), Some("a@b.fr".to_string()))]),
        });
        assert_eq!(sender.email, "a@b.fr");
        assert_eq!(sender.first_name, "Unknown");
        assert_eq!(sender.last_name, "Contact");
    }
}

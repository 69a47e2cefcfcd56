use crate::domain::entities::{Deal, UploadedFile};
use crate::shared::utils::crm_time::parse_crm_timestamp;
use serde::{Deserialize, Serialize};

/// Pipeline stage assigned to tickets opened from the portal
pub const NEW_TICKET_PIPELINE_STAGE: &str = "1";

/// Pipeline stage meaning the ticket is resolved
pub const RESOLVED_PIPELINE_STAGE: &str = "4";

/// Maximum number of files attached to a new ticket
pub const MAX_TICKET_FILES: usize = 6;

/// Support ticket as listed to the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub ticket_id: String,
    pub subject: String,
    /// Pipeline stage code
    pub status: String,
    pub priority: String,
    pub created_date: Option<String>,
    pub last_modified: Option<String>,
    pub pipeline_stage: String,
    #[serde(default)]
    pub status_label: String,
    #[serde(default)]
    pub is_resolved: bool,
}

impl Ticket {
    pub fn new(
        id: String,
        ticket_id: Option<String>,
        subject: Option<String>,
        stage: Option<String>,
        priority: Option<String>,
        created_date: Option<String>,
        last_modified: Option<String>,
    ) -> Self {
        let status = stage.unwrap_or_else(|| "unknown".to_string());
        Self {
            ticket_id: ticket_id.unwrap_or_else(|| id.clone()),
            id,
            subject: subject.unwrap_or_else(|| "Sans titre".to_string()),
            status_label: display_status(&status, last_modified.as_deref()),
            is_resolved: status == RESOLVED_PIPELINE_STAGE,
            pipeline_stage: status.clone(),
            status,
            priority: priority.unwrap_or_else(|| "medium".to_string()),
            created_date,
            last_modified,
        }
    }
}

/// Customer wording for a pipeline stage
pub fn status_label(stage: &str) -> &'static str {
    match stage {
        "1" => "Nous allons bientôt traiter votre demande",
        "2" => "Nous vous demandons plus d'informations",
        "573356530" => "En cours de traitement",
        "573359340" => "Intervention planifiée",
        "573356532" => "Intervention effectuée",
        RESOLVED_PIPELINE_STAGE => "Résolu",
        _ => "Statut inconnu",
    }
}

/// Badge text shown on a ticket; resolved tickets carry their closing date
pub fn display_status(stage: &str, last_modified: Option<&str>) -> String {
    let closed_on = last_modified
        .filter(|_| stage == RESOLVED_PIPELINE_STAGE)
        .and_then(parse_crm_timestamp);

    match closed_on {
        Some(date) => format!("Résolu le {}", date.format("%d/%m/%y")),
        None => status_label(stage).to_string(),
    }
}

/// Order tickets newest first; undated tickets go last, ties keep input order
pub fn sort_newest_first(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        let a = a.created_date.as_deref().and_then(parse_crm_timestamp);
        let b = b.created_date.as_deref().and_then(parse_crm_timestamp);
        match (a, b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// Internal note attached by a support agent filling the form on a customer's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNote {
    pub email: String,
    pub notes: String,
}

/// Everything needed to open a ticket
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub contact_id: String,
    pub deal_id: Option<String>,
    pub subject: String,
    pub description: String,
    pub files: Vec<UploadedFile>,
    pub admin_note: Option<AdminNote>,
}

impl NewTicket {
    pub fn new(contact_id: String, subject: String, description: String) -> Self {
        Self {
            contact_id,
            deal_id: None,
            subject,
            description,
            files: Vec::new(),
            admin_note: None,
        }
    }

    pub fn for_deal(mut self, deal: Option<&Deal>) -> Self {
        self.deal_id = deal.map(|d| d.deal_id.clone());
        self
    }
}

/// Ticket returned after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedTicket {
    pub id: String,
    pub subject: String,
}

#![allow(dead_code)]
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ticket_portal::domain::entities::{
    Contact, ContactSearchResult, CreatedTicket, Deal, IdentificationMethod, MessageDirection,
    NewTicket, PhotoAttachment, Ticket, TicketMessage,
};
use ticket_portal::domain::ports::support_gateway::{GatewayError, GatewayResult, SupportGateway};

/// Scripted answer of the contact lookup
#[derive(Clone, Debug)]
pub enum ContactReply {
    Found(Contact),
    NotFound,
    Rejected(u16, String),
    Unreachable,
}

/// In-memory gateway with canned answers and optional latency per call
#[derive(Clone)]
pub struct FakeGateway {
    pub contact: ContactReply,
    pub contact_delay: Duration,
    pub tickets: Vec<Ticket>,
    pub tickets_delay: Duration,
    /// Answer of every ticket search after the first one
    pub refreshed_tickets: Option<Vec<Ticket>>,
    pub deals: Vec<Deal>,
    pub deals_delay: Duration,
    pub create: Result<CreatedTicket, (u16, String)>,
    pub messages: Vec<TicketMessage>,
    pub attachments: Vec<PhotoAttachment>,
    pub log: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<NewTicket>>>,
    ticket_searches: Arc<Mutex<usize>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            contact: ContactReply::NotFound,
            contact_delay: Duration::ZERO,
            tickets: Vec::new(),
            tickets_delay: Duration::ZERO,
            refreshed_tickets: None,
            deals: Vec::new(),
            deals_delay: Duration::ZERO,
            create: Ok(CreatedTicket {
                id: "9001".to_string(),
                subject: "Panneaux".to_string(),
            }),
            messages: Vec::new(),
            attachments: Vec::new(),
            log: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            ticket_searches: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = ContactReply::Found(contact);
        self
    }

    pub fn with_tickets(mut self, tickets: Vec<Ticket>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn with_deals(mut self, deals: Vec<Deal>) -> Self {
        self.deals = deals;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn created_tickets(&self) -> Vec<NewTicket> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, entry: impl Into<String>) {
        self.log.lock().unwrap().push(entry.into());
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl SupportGateway for FakeGateway {
    async fn search_contact(
        &self,
        method: IdentificationMethod,
        value: &str,
    ) -> GatewayResult<ContactSearchResult> {
        self.record(format!("search_contact:{}:{}", method, value));
        pause(self.contact_delay).await;

        match &self.contact {
            ContactReply::Found(contact) => Ok(ContactSearchResult::found(contact.clone())),
            ContactReply::NotFound => Ok(ContactSearchResult::not_found(method)),
            ContactReply::Rejected(status, message) => Err(GatewayError::Rejected {
                status: *status,
                message: message.clone(),
            }),
            ContactReply::Unreachable => Err(GatewayError::Transport("connection refused".into())),
        }
    }

    async fn search_tickets(&self, contact_id: &str) -> GatewayResult<Vec<Ticket>> {
        self.record(format!("search_tickets:{}", contact_id));
        pause(self.tickets_delay).await;
        self.record("search_tickets:done");

        let mut searches = self.ticket_searches.lock().unwrap();
        *searches += 1;
        match (&self.refreshed_tickets, *searches) {
            (Some(refreshed), n) if n > 1 => Ok(refreshed.clone()),
            _ => Ok(self.tickets.clone()),
        }
    }

    async fn search_deals(&self, contact_id: &str) -> GatewayResult<Vec<Deal>> {
        self.record(format!("search_deals:{}", contact_id));
        pause(self.deals_delay).await;
        self.record("search_deals:done");
        Ok(self.deals.clone())
    }

    async fn create_ticket(&self, ticket: NewTicket) -> GatewayResult<CreatedTicket> {
        self.record(format!("create_ticket:{}", ticket.contact_id));
        self.created.lock().unwrap().push(ticket);

        self.create
            .clone()
            .map_err(|(status, message)| GatewayError::Rejected { status, message })
    }

    async fn ticket_messages(&self, ticket_id: &str) -> GatewayResult<Vec<TicketMessage>> {
        self.record(format!("ticket_messages:{}", ticket_id));
        Ok(self.messages.clone())
    }

    async fn attachments(&self, attachment_ids: &[String]) -> GatewayResult<Vec<PhotoAttachment>> {
        self.record(format!("attachments:{}", attachment_ids.join(",")));
        Ok(self.attachments.clone())
    }
}

pub fn sample_contact() -> Contact {
    Contact::from_parts(
        "101".to_string(),
        Some("Jean"),
        Some("Dupont"),
        Some("jean@example.fr"),
        Some("+33612345678"),
    )
}

pub fn sample_ticket(id: &str, created: &str) -> Ticket {
    Ticket::new(
        id.to_string(),
        None,
        Some(format!("Ticket {}", id)),
        Some("1".to_string()),
        None,
        Some(created.to_string()),
        None,
    )
}

pub fn sample_deal(id: &str) -> Deal {
    Deal {
        id: id.to_string(),
        deal_id: id.to_string(),
        name: format!("Installation {}", id),
        stage: "closedwon".to_string(),
        amount: "9 500 €".to_string(),
        close_date: None,
        created_date: None,
        pipeline: "default".to_string(),
        deal_type: None,
        address: "1 rue de la Paix".to_string(),
        postcode: "75002".to_string(),
        installation_done_date: Some("2024-05-01T00:00:00Z".to_string()),
        products: vec!["Panneaux".to_string()],
        is_quote_signed: true,
        is_closed_lost: false,
    }
}

pub fn sample_message(id: &str, attachment_ids: &[&str]) -> TicketMessage {
    TicketMessage::classify(
        id.to_string(),
        Some("2024-03-01T10:00:00Z".to_string()),
        "<p>Bonjour</p>".to_string(),
        MessageDirection::Incoming,
        "Panneaux".to_string(),
        attachment_ids.iter().map(|s| s.to_string()).collect(),
    )
    .expect("incoming messages are kept")
}

pub fn sample_photo(id: &str) -> PhotoAttachment {
    PhotoAttachment::from_file(
        id.to_string(),
        Some(format!("photo-{}", id)),
        Some("jpg".to_string()),
        Some("IMG".to_string()),
        Some(1024),
        Some(format!("https://files.example.fr/{}.jpg", id)),
        None,
    )
    .expect("jpg files are photos")
}

use super::launch::{AdminMode, LaunchParams};
use super::state::{IdentificationForm, TicketDraft, WizardState, WizardStep};
use crate::domain::entities::{
    collect_attachment_ids, AdminNote, ContactSearchResult, ContactSession, IdentificationMethod,
    NewTicket, MAX_TICKET_FILES,
};
use crate::domain::ports::session_store::ContactSessionStore;
use crate::domain::ports::support_gateway::{GatewayError, SupportGateway};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Automatic identification gives up after this long
pub const AUTO_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

pub const CONTACT_SEARCH_FAILED: &str = "Failed to search for contact. Please try again.";
pub const TICKET_SUBMIT_FAILED: &str = "Failed to create the ticket. Please try again.";
pub const TICKET_FIELDS_REQUIRED: &str = "Subject and description are required";

/// Drives the six-step support wizard against a gateway
///
/// Each command performs its network calls and then moves to exactly one
/// step. The step is never derived from other state.
pub struct TicketWizard<G, S> {
    gateway: G,
    store: S,
    admin: AdminMode,
    state: WizardState,
}

impl<G, S> TicketWizard<G, S>
where
    G: SupportGateway,
    S: ContactSessionStore,
{
    pub fn new(gateway: G, store: S, admin: AdminMode) -> Self {
        Self {
            gateway,
            store,
            admin,
            state: WizardState::default(),
        }
    }

    /// Build a wizard whose admin capability comes from the launch URL
    pub fn from_launch(gateway: G, store: S, launch: &LaunchParams) -> Self {
        Self::new(gateway, store, launch.admin)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> &WizardStep {
        &self.state.step
    }

    pub fn admin_mode(&self) -> AdminMode {
        self.admin
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Replay identification from the URL or the stored session
    pub async fn start(&mut self, launch: &LaunchParams) {
        if !matches!(self.state.step, WizardStep::Identify { .. }) {
            return;
        }

        let pending = launch.identification().or_else(|| {
            self.store
                .load(Utc::now())
                .map(|session| (session.method, session.value))
        });
        let Some((method, value)) = pending else {
            debug!("No identification to resume");
            return;
        };

        info!("Resuming identification by {}", method);
        self.state.form = IdentificationForm::new(method, value.clone());
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.state.auto_submitted = true;

        // Only the contact lookup is bounded; once found, routing always completes
        let lookup =
            tokio::time::timeout(AUTO_SUBMIT_TIMEOUT, self.lookup_contact(method, value)).await;

        match lookup {
            Ok(result) => self.apply_contact_result(method, value, result).await,
            Err(_) => {
                warn!(
                    "Automatic identification timed out after {}s",
                    AUTO_SUBMIT_TIMEOUT.as_secs()
                );
                self.state.auto_submitted = false;
                self.store.clear();
                self.state.step = WizardStep::Identify {
                    error: Some(CONTACT_SEARCH_FAILED.to_string()),
                };
            }
        }
    }

    /// Step 1 submit: look the contact up, then route on tickets and deals
    pub async fn submit_identification(&mut self, method: IdentificationMethod, value: &str) {
        self.state.form = IdentificationForm::new(method, value);
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        let result = self.lookup_contact(method, value).await;
        self.apply_contact_result(method, value, result).await;
    }

    async fn lookup_contact(
        &self,
        method: IdentificationMethod,
        value: &str,
    ) -> ContactSearchResult {
        match self.gateway.search_contact(method, value).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Contact search failed: {}", err);
                ContactSearchResult::failed(search_failure_message(&err))
            }
        }
    }

    async fn apply_contact_result(
        &mut self,
        method: IdentificationMethod,
        value: &str,
        result: ContactSearchResult,
    ) {
        let error = result.display_message().map(str::to_string);
        let contact = match result.contact {
            Some(contact) if result.found => contact,
            _ => {
                self.state.contact = None;
                self.state.step = WizardStep::Identify { error };
                return;
            }
        };

        self.store
            .save(ContactSession::new(method, value, Utc::now()));

        // Both lookups must settle before routing
        let (tickets, deals) = tokio::join!(
            self.gateway.search_tickets(&contact.contact_id),
            self.gateway.search_deals(&contact.contact_id)
        );

        self.state.tickets = tickets.unwrap_or_else(|err| {
            warn!("Ticket search failed: {}", err);
            Vec::new()
        });
        self.state.deals = deals.unwrap_or_else(|err| {
            warn!("Deal search failed: {}", err);
            Vec::new()
        });

        info!(
            "Contact {} has {} tickets and {} eligible deals",
            contact.contact_id,
            self.state.tickets.len(),
            self.state.deals.len()
        );
        self.state.contact = Some(contact);
        self.state.step = self.route_after_identification();
    }

    fn route_after_identification(&self) -> WizardStep {
        if !self.state.tickets.is_empty() {
            WizardStep::Tickets
        } else if !self.state.deals.is_empty() {
            WizardStep::Deals
        } else {
            WizardStep::CreateTicket {
                deal: None,
                error: None,
            }
        }
    }

    /// Step 2: open the conversation of one ticket
    pub async fn select_ticket(&mut self, ticket_id: &str) {
        if self.state.step != WizardStep::Tickets {
            return;
        }
        let Some(ticket) = self.state.tickets.iter().find(|t| t.id == ticket_id).cloned() else {
            warn!("Unknown ticket {}", ticket_id);
            return;
        };

        let messages = self
            .gateway
            .ticket_messages(&ticket.id)
            .await
            .unwrap_or_else(|err| {
                warn!("Failed to load messages of ticket {}: {}", ticket.id, err);
                Vec::new()
            });

        let attachment_ids = collect_attachment_ids(&messages);
        let attachments = if attachment_ids.is_empty() {
            Vec::new()
        } else {
            self.gateway
                .attachments(&attachment_ids)
                .await
                .unwrap_or_else(|err| {
                    warn!("Failed to load attachments of ticket {}: {}", ticket.id, err);
                    Vec::new()
                })
        };

        self.state.step = WizardStep::TicketDetails {
            ticket,
            messages,
            attachments,
        };
    }

    /// Step 2: start a new ticket, through deal selection when deals exist
    pub fn new_ticket(&mut self) {
        if self.state.step != WizardStep::Tickets || self.state.contact.is_none() {
            warn!("New ticket requested outside of the ticket list");
            return;
        }
        self.state.step = if self.state.deals.is_empty() {
            WizardStep::CreateTicket {
                deal: None,
                error: None,
            }
        } else {
            WizardStep::Deals
        };
    }

    pub fn select_deal(&mut self, deal_id: &str) {
        if self.state.step != WizardStep::Deals {
            return;
        }
        match self.state.deals.iter().find(|d| d.deal_id == deal_id) {
            Some(deal) => {
                self.state.step = WizardStep::CreateTicket {
                    deal: Some(deal.clone()),
                    error: None,
                };
            }
            None => warn!("Unknown deal {}", deal_id),
        }
    }

    /// Go one screen back; returns false where there is nothing to go back to
    pub fn back(&mut self) -> bool {
        let previous = match &self.state.step {
            WizardStep::Deals => Some(self.list_or_identify()),
            WizardStep::CreateTicket { deal: Some(_), .. } => Some(WizardStep::Deals),
            WizardStep::CreateTicket { deal: None, .. } => Some(self.list_or_identify()),
            WizardStep::TicketDetails { .. } => Some(WizardStep::Tickets),
            WizardStep::Identify { .. } | WizardStep::Tickets | WizardStep::Success { .. } => None,
        };

        match previous {
            Some(step) => {
                self.state.step = step;
                true
            }
            None => false,
        }
    }

    fn list_or_identify(&self) -> WizardStep {
        if self.state.tickets.is_empty() {
            WizardStep::identify()
        } else {
            WizardStep::Tickets
        }
    }

    /// Step 4 submit
    pub async fn submit_ticket(&mut self, draft: TicketDraft) {
        let WizardStep::CreateTicket { deal, .. } = &self.state.step else {
            warn!("Ticket submitted outside of the ticket form");
            return;
        };
        let deal = deal.clone();
        let Some(contact_id) = self.state.contact.as_ref().map(|c| c.contact_id.clone()) else {
            warn!("Ticket submitted without an identified contact");
            return;
        };
        if self.state.is_submitting_ticket {
            return;
        }

        if draft.subject.trim().is_empty() || draft.description.trim().is_empty() {
            self.state.step = WizardStep::CreateTicket {
                deal,
                error: Some(TICKET_FIELDS_REQUIRED.to_string()),
            };
            return;
        }
        if draft.files.len() > MAX_TICKET_FILES {
            self.state.step = WizardStep::CreateTicket {
                deal,
                error: Some(format!("At most {} files can be attached", MAX_TICKET_FILES)),
            };
            return;
        }

        let mut ticket =
            NewTicket::new(contact_id, draft.subject, draft.description).for_deal(deal.as_ref());
        ticket.files = draft.files;
        if self.admin.is_enabled() {
            ticket.admin_note = admin_note(draft.admin_email, draft.admin_notes);
        }

        self.state.is_submitting_ticket = true;
        let outcome = self.gateway.create_ticket(ticket).await;
        self.state.is_submitting_ticket = false;

        self.state.step = match outcome {
            Ok(created) => {
                info!("Ticket {} created", created.id);
                WizardStep::Success { ticket: created }
            }
            Err(err) => {
                error!("Ticket creation failed: {}", err);
                WizardStep::CreateTicket {
                    deal,
                    error: Some(ticket_failure_message(&err)),
                }
            }
        };
    }

    /// Step 5: refresh the ticket list and show it
    pub async fn view_tickets(&mut self) {
        if !matches!(self.state.step, WizardStep::Success { .. }) {
            return;
        }
        let Some(contact_id) = self.state.contact.as_ref().map(|c| c.contact_id.clone()) else {
            return;
        };

        match self.gateway.search_tickets(&contact_id).await {
            Ok(tickets) => self.state.tickets = tickets,
            Err(err) => warn!("Ticket refresh failed: {}", err),
        }
        self.state.step = WizardStep::Tickets;
    }

    /// Back to an empty identification form
    pub fn try_again(&mut self) {
        self.state = WizardState::default();
    }

    pub fn skip_auto_verification(&mut self) {
        self.state.auto_submitted = false;
        self.store.clear();
    }

    /// Forget the contact entirely
    pub fn disconnect(&mut self) {
        self.store.clear();
        self.state = WizardState::default();
    }
}

fn admin_note(email: Option<String>, notes: Option<String>) -> Option<AdminNote> {
    let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
    let notes = notes.filter(|n| !n.trim().is_empty())?;
    Some(AdminNote { email, notes })
}

fn search_failure_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Rejected {
            status: 429,
            message,
        } => message.clone(),
        _ => CONTACT_SEARCH_FAILED.to_string(),
    }
}

fn ticket_failure_message(err: &GatewayError) -> String {
    match err {
        GatewayError::Rejected {
            status: 400,
            message,
        } => message.clone(),
        _ => TICKET_SUBMIT_FAILED.to_string(),
    }
}

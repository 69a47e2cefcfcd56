use crate::application::services::{ContactService, DealService, MessageService, TicketService};

#[derive(Clone)]
pub struct AppState {
    pub contact_service: ContactService,
    pub ticket_service: TicketService,
    pub deal_service: DealService,
    pub message_service: MessageService,
}

use crate::domain::entities::{AdminNote, NewTicket, UploadedFile};
use crate::infrastructure::http::dto::{
    ticket_form, ContactIdRequest, CreateTicketResponse, TicketsResponse,
};
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use tracing::debug;

/// POST /api/search-tickets - Tickets of a contact, newest first
pub async fn search_tickets(
    State(state): State<AppState>,
    Json(request): Json<ContactIdRequest>,
) -> ApiResult<Json<TicketsResponse>> {
    metrics::counter!("gateway_requests_total", "handler" => "search_tickets").increment(1);

    let tickets = state
        .ticket_service
        .search_tickets(request.contact_id.as_deref())
        .await?;

    Ok(Json(tickets.into()))
}

/// POST /api/create-ticket - Open a ticket from the multipart form
pub async fn create_ticket(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<CreateTicketResponse>> {
    metrics::counter!("gateway_requests_total", "handler" => "create_ticket").increment(1);

    let ticket = read_ticket_form(multipart).await?;
    let created = state.ticket_service.create_ticket(ticket).await?;

    Ok(Json(CreateTicketResponse {
        success: true,
        ticket: created,
    }))
}

async fn read_ticket_form(mut multipart: Multipart) -> ApiResult<NewTicket> {
    let mut contact_id = String::new();
    let mut deal_id = None;
    let mut subject = String::new();
    let mut description = String::new();
    let mut admin_email = None;
    let mut admin_notes = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == ticket_form::FILES || name == "files[]" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let content = field.bytes().await.map_err(invalid_form)?;

            // Browsers send an empty part when no file was picked
            if file_name.is_empty() && content.is_empty() {
                continue;
            }
            files.push(UploadedFile::new(file_name, content_type, content.to_vec()));
            continue;
        }

        let value = field.text().await.map_err(invalid_form)?;
        match name.as_str() {
            ticket_form::CONTACT_ID => contact_id = value,
            ticket_form::DEAL_ID => deal_id = Some(value),
            ticket_form::SUBJECT => subject = value,
            ticket_form::DESCRIPTION => description = value,
            ticket_form::ADMIN_EMAIL => admin_email = Some(value),
            ticket_form::ADMIN_NOTES => admin_notes = Some(value),
            other => debug!("Ignoring unknown form field {}", other),
        }
    }

    let mut ticket = NewTicket::new(contact_id, subject, description);
    ticket.deal_id = deal_id.filter(|d| !d.trim().is_empty());
    ticket.files = files;
    ticket.admin_note = match (admin_email, admin_notes) {
        (Some(email), Some(notes)) if !email.trim().is_empty() && !notes.trim().is_empty() => {
            Some(AdminNote {
                email: email.trim().to_string(),
                notes,
            })
        }
        _ => None,
    };

    Ok(ticket)
}

fn invalid_form(err: MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid ticket form: {}", err.body_text()))
}

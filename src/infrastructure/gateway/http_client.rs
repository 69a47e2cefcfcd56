use crate::domain::entities::{
    ContactSearchResult, CreatedTicket, Deal, IdentificationMethod, NewTicket, PhotoAttachment,
    Ticket, TicketMessage,
};
use crate::domain::ports::support_gateway::{GatewayError, GatewayResult, SupportGateway};
use crate::infrastructure::http::dto::{
    ticket_form, AttachmentIdsRequest, AttachmentsResponse, ContactIdRequest,
    CreateTicketResponse, DealsResponse, ErrorResponse, MessagesResponse, SearchContactRequest,
    TicketIdRequest, TicketsResponse,
};
use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Wizard-side client of the gateway routes
#[derive(Clone)]
pub struct HttpGatewayClient {
    http_client: Client,
    base_url: String,
}

impl HttpGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}/api/{}", self.base_url, route)
    }

    async fn post_json<B, T>(&self, route: &str, body: &B) -> GatewayResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(route, self.http_client.post(self.url(route)).json(body))
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        route: &str,
        request: RequestBuilder,
    ) -> GatewayResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("{}: {}", route, e)))?;

        let status = response.status();
        debug!("Gateway {} answered {}", route, status);

        if !status.is_success() {
            let body: ErrorResponse = response.json().await.unwrap_or_default();
            let message = body
                .error
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            warn!("Gateway {} rejected the request ({}): {}", route, status, message);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(format!("{}: {}", route, e)))
    }
}

#[async_trait]
impl SupportGateway for HttpGatewayClient {
    async fn search_contact(
        &self,
        method: IdentificationMethod,
        value: &str,
    ) -> GatewayResult<ContactSearchResult> {
        let request = SearchContactRequest {
            method: Some(method.as_str().to_string()),
            value: Some(value.to_string()),
        };
        self.post_json("search-contact", &request).await
    }

    async fn search_tickets(&self, contact_id: &str) -> GatewayResult<Vec<Ticket>> {
        let request = ContactIdRequest {
            contact_id: Some(contact_id.to_string()),
        };
        let response: TicketsResponse = self.post_json("search-tickets", &request).await?;
        Ok(response.tickets)
    }

    async fn search_deals(&self, contact_id: &str) -> GatewayResult<Vec<Deal>> {
        let request = ContactIdRequest {
            contact_id: Some(contact_id.to_string()),
        };
        let response: DealsResponse = self.post_json("search-deals", &request).await?;
        Ok(response.deals)
    }

    async fn create_ticket(&self, ticket: NewTicket) -> GatewayResult<CreatedTicket> {
        let mut form = multipart::Form::new()
            .text(ticket_form::CONTACT_ID, ticket.contact_id)
            .text(ticket_form::SUBJECT, ticket.subject)
            .text(ticket_form::DESCRIPTION, ticket.description);

        if let Some(deal_id) = ticket.deal_id {
            form = form.text(ticket_form::DEAL_ID, deal_id);
        }
        if let Some(note) = ticket.admin_note {
            form = form
                .text(ticket_form::ADMIN_EMAIL, note.email)
                .text(ticket_form::ADMIN_NOTES, note.notes);
        }
        for file in ticket.files {
            let part = multipart::Part::bytes(file.content)
                .file_name(file.name)
                .mime_str(&file.content_type)
                .map_err(|e| GatewayError::Decode(format!("invalid content type: {}", e)))?;
            form = form.part(ticket_form::FILES, part);
        }

        let request = self
            .http_client
            .post(self.url("create-ticket"))
            .multipart(form);
        let response: CreateTicketResponse = self.send("create-ticket", request).await?;
        Ok(response.ticket)
    }

    async fn ticket_messages(&self, ticket_id: &str) -> GatewayResult<Vec<TicketMessage>> {
        let request = TicketIdRequest {
            ticket_id: Some(ticket_id.to_string()),
        };
        let response: MessagesResponse = self.post_json("get-ticket-messages", &request).await?;
        Ok(response.messages)
    }

    async fn attachments(&self, attachment_ids: &[String]) -> GatewayResult<Vec<PhotoAttachment>> {
        let request = AttachmentIdsRequest {
            attachment_ids: Some(attachment_ids.to_vec()),
        };
        let response: AttachmentsResponse =
            self.post_json("get-hubspot-attachments", &request).await?;
        Ok(response.attachments)
    }
}

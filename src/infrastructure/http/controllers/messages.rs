use crate::infrastructure::http::dto::{
    AttachmentIdsRequest, AttachmentsResponse, MessagesResponse, TicketIdRequest,
};
use crate::infrastructure::http::middleware::{ApiResult, AppState};
use axum::{extract::State, Json};

/// POST /api/get-ticket-messages - Conversation of a ticket
pub async fn get_ticket_messages(
    State(state): State<AppState>,
    Json(request): Json<TicketIdRequest>,
) -> ApiResult<Json<MessagesResponse>> {
    metrics::counter!("gateway_requests_total", "handler" => "get_ticket_messages").increment(1);

    let messages = state
        .message_service
        .ticket_messages(request.ticket_id.as_deref())
        .await?;

    Ok(Json(messages.into()))
}

/// POST /api/get-hubspot-attachments - Photo attachments by file id
pub async fn get_attachments(
    State(state): State<AppState>,
    Json(request): Json<AttachmentIdsRequest>,
) -> ApiResult<Json<AttachmentsResponse>> {
    metrics::counter!("gateway_requests_total", "handler" => "get_attachments").increment(1);

    let ids = request.attachment_ids.unwrap_or_default();
    let attachments = state.message_service.attachments(&ids).await?;

    Ok(Json(attachments.into()))
}

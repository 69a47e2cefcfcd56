use crate::infrastructure::http::dto::{ContactIdRequest, DealsResponse};
use crate::infrastructure::http::middleware::{ApiResult, AppState};
use axum::{extract::State, Json};

/// POST /api/search-deals - Eligible deals of a contact
pub async fn search_deals(
    State(state): State<AppState>,
    Json(request): Json<ContactIdRequest>,
) -> ApiResult<Json<DealsResponse>> {
    metrics::counter!("gateway_requests_total", "handler" => "search_deals").increment(1);

    let deals = state
        .deal_service
        .search_deals(request.contact_id.as_deref())
        .await?;

    Ok(Json(deals.into()))
}

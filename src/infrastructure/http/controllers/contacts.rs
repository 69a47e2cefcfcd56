use crate::domain::entities::{ContactSearchResult, ContactSession, IdentificationMethod};
use crate::domain::ports::session_store::ContactSessionStore;
use crate::infrastructure::http::dto::SearchContactRequest;
use crate::infrastructure::http::middleware::{AppState, ContactLookupError};
use crate::infrastructure::session::CookieSessionStore;
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

/// POST /api/search-contact - Find a contact by phone or email
///
/// A found contact is remembered in the contact session cookie.
pub async fn search_contact(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SearchContactRequest>,
) -> Result<(CookieJar, Json<ContactSearchResult>), ContactLookupError> {
    metrics::counter!("gateway_requests_total", "handler" => "search_contact").increment(1);

    let result = state
        .contact_service
        .search_contact(request.method.as_deref(), request.value.as_deref())
        .await?;

    let mut store = CookieSessionStore::new(jar);
    if result.found {
        let method = request
            .method
            .as_deref()
            .and_then(|m| m.parse::<IdentificationMethod>().ok());
        if let (Some(method), Some(value)) = (method, request.value.as_deref()) {
            store.save(ContactSession::new(method, value.trim(), Utc::now()));
        }
    }

    Ok((store.into_jar(), Json(result)))
}

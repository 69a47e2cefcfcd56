use crate::domain::ports::session_store::ContactSessionStore;
use crate::infrastructure::http::dto::ContactSessionResponse;
use crate::infrastructure::session::CookieSessionStore;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /api/contact-session - Remembered identification, if still valid
///
/// Expired or unreadable cookies are removed in the response.
pub async fn get_contact_session(jar: CookieJar) -> (CookieJar, Json<ContactSessionResponse>) {
    let mut store = CookieSessionStore::new(jar);
    let session = store.load(Utc::now());

    let response = ContactSessionResponse {
        active: session.is_some(),
        session,
    };
    (store.into_jar(), Json(response))
}

/// DELETE /api/contact-session - Forget the remembered identification
pub async fn delete_contact_session(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let mut store = CookieSessionStore::new(jar);
    store.clear();
    tracing::info!("Contact session cleared");

    (store.into_jar(), Json(json!({ "success": true })))
}

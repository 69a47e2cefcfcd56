use crate::config::Config;
use crate::infrastructure::http::controllers::{contacts, deals, messages, session, tickets};
use crate::infrastructure::http::middleware::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/search-contact", post(contacts::search_contact))
        .route("/api/search-tickets", post(tickets::search_tickets))
        .route("/api/search-deals", post(deals::search_deals))
        .route("/api/create-ticket", post(tickets::create_ticket))
        .route(
            "/api/get-ticket-messages",
            post(messages::get_ticket_messages),
        )
        .route(
            "/api/get-hubspot-attachments",
            post(messages::get_attachments),
        )
        .route(
            "/api/contact-session",
            get(session::get_contact_session).delete(session::delete_contact_session),
        )
        // Uploads are bounded by the configured limit instead of axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn health_handler() -> &'static str {
    "OK"
}

mod helpers;

use axum::http::{header, StatusCode};
use helpers::*;
use serde_json::json;
use ticket_portal::infrastructure::session::cookie_store::decode_session;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";

fn jean() -> serde_json::Value {
    crm_object(
        "101",
        json!({
            "firstname": "Jean",
            "lastname": "Dupont",
            "email": "jean@example.fr",
            "mobilephone": "+33612345678"
        }),
    )
}

#[tokio::test]
async fn test_phone_lookup_normalizes_number() {
    let app = TestApp::start().await;
    mount_contact_search(&app.crm, vec![jean()]).await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "phone", "value": "06 12 34 56 78"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["found"], true);
    assert_eq!(response.body["contact"]["contactId"], "101");
    assert_eq!(response.body["contact"]["fullName"], "Jean Dupont");

    let bodies = request_bodies(&app.crm, SEARCH_PATH).await;
    assert_eq!(bodies.len(), 1);
    let filter = &bodies[0]["filterGroups"][0]["filters"][0];
    assert_eq!(filter["propertyName"], "mobilephone");
    assert_eq!(filter["operator"], "EQ");
    assert_eq!(filter["value"], "+33612345678");
    assert_eq!(bodies[0]["limit"], 1);
}

#[tokio::test]
async fn test_bearer_token_sent_to_crm() {
    let app = TestApp::start().await;
    mount_contact_search(&app.crm, vec![jean()]).await;

    app.post_json(
        "/api/search-contact",
        json!({"method": "email", "value": "jean@example.fr"}),
    )
    .await;

    let requests = app.crm_requests().await;
    let auth = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(auth, format!("Bearer {}", TEST_TOKEN));
}

#[tokio::test]
async fn test_found_contact_sets_session_cookie() {
    let app = TestApp::start().await;
    mount_contact_search(&app.crm, vec![jean()]).await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "email", "value": " jean@example.fr "}),
        )
        .await;

    let cookie = response
        .set_cookie_header("ensol_contact_session")
        .expect("session cookie set");
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=2592000"));
    assert!(cookie.contains("SameSite=Lax"));

    let value = response
        .cookie("ensol_contact_session")
        .unwrap()
        .trim_start_matches("ensol_contact_session=")
        .to_string();
    let session = decode_session(&value).unwrap();
    assert_eq!(session.value, "jean@example.fr");
}

#[tokio::test]
async fn test_email_not_found() {
    let app = TestApp::start().await;
    mount_contact_search(&app.crm, vec![]).await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "email", "value": "nobody@example.fr"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["found"], false);
    assert_eq!(
        response.body["message"],
        "Aucun contact trouvé avec cette adresse email."
    );
    assert!(response.cookie("ensol_contact_session").is_none());
}

#[tokio::test]
async fn test_phone_not_found_wording() {
    let app = TestApp::start().await;
    mount_contact_search(&app.crm, vec![]).await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "phone", "value": "0700000000"}),
        )
        .await;

    assert_eq!(
        response.body["message"],
        "Aucun contact trouvé avec ce numéro de mobile."
    );
}

#[tokio::test]
async fn test_missing_value_rejected_without_crm_call() {
    let app = TestApp::start().await;

    let response = app
        .post_json("/api/search-contact", json!({"method": "phone"}))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["found"], false);
    assert_eq!(
        response.body["error"],
        "Identification method and value are required"
    );
    assert!(app.crm_requests().await.is_empty());
}

#[tokio::test]
async fn test_missing_token_is_configuration_error() {
    let app = TestApp::without_token().await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "email", "value": "jean@example.fr"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["found"], false);
    assert_eq!(response.body["error"], "HubSpot access token not configured");
    assert!(app.crm_requests().await.is_empty());
}

#[tokio::test]
async fn test_upstream_status_and_body_surfaced() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"message":"expired token"}"#),
        )
        .mount(&app.crm)
        .await;

    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "email", "value": "jean@example.fr"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["found"], false);
    assert_eq!(response.body["error"], "CRM request failed");
    assert!(response.body["details"]
        .as_str()
        .unwrap()
        .contains("expired token"));
}

#[tokio::test]
async fn test_repeated_lookups_are_rate_limited() {
    let app = TestApp::start_with(|config| {
        config.contact_lookup_max_attempts = 2;
        config.contact_lookup_window_seconds = 60;
    })
    .await;
    mount_contact_search(&app.crm, vec![]).await;

    let body = json!({"method": "phone", "value": "0612345678"});
    for _ in 0..2 {
        let response = app.post_json("/api/search-contact", body.clone()).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // Same number written differently still counts against the same budget
    let response = app
        .post_json(
            "/api/search-contact",
            json!({"method": "phone", "value": "06 12 34 56 78"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["found"], false);
    assert!(response.headers.contains_key(header::RETRY_AFTER));
    assert_eq!(request_bodies(&app.crm, SEARCH_PATH).await.len(), 2);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::start().await;
    let request = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("OK"));
}

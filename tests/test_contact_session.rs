mod helpers;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use helpers::*;
use serde_json::json;
use ticket_portal::domain::entities::{ContactSession, IdentificationMethod};
use ticket_portal::infrastructure::session::cookie_store::encode_session;

const COOKIE: &str = "ensol_contact_session";

fn session_request(method: Method, cookie: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri("/api/contact-session");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE, cookie));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_no_session() {
    let app = TestApp::start().await;

    let response = app.send(session_request(Method::GET, None)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"active": false}));
}

#[tokio::test]
async fn test_active_session_returned() {
    let app = TestApp::start().await;
    let session = ContactSession::new(IdentificationMethod::Phone, "0612345678", Utc::now());

    let response = app
        .send(session_request(Method::GET, encode_session(&session)))
        .await;

    assert_eq!(response.body["active"], true);
    assert_eq!(response.body["session"]["method"], "phone");
    assert_eq!(response.body["session"]["value"], "0612345678");
    assert_eq!(response.body["session"]["timestamp"], session.timestamp);
    assert!(response.set_cookie_header(COOKIE).is_none());
}

#[tokio::test]
async fn test_expired_session_cleared() {
    let app = TestApp::start().await;
    let session = ContactSession::new(
        IdentificationMethod::Email,
        "jean@example.fr",
        Utc::now() - Duration::days(31),
    );

    let response = app
        .send(session_request(Method::GET, encode_session(&session)))
        .await;

    assert_eq!(response.body, json!({"active": false}));
    let removal = response.set_cookie_header(COOKIE).expect("cookie removed");
    assert!(removal.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_corrupt_session_cleared() {
    let app = TestApp::start().await;

    let response = app
        .send(session_request(Method::GET, Some("not-base64-json".to_string())))
        .await;

    assert_eq!(response.body["active"], false);
    assert!(response.set_cookie_header(COOKIE).is_some());
}

#[tokio::test]
async fn test_delete_session() {
    let app = TestApp::start().await;
    let session = ContactSession::new(IdentificationMethod::Phone, "0612345678", Utc::now());

    let response = app
        .send(session_request(Method::DELETE, encode_session(&session)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true}));
    let removal = response.set_cookie_header(COOKIE).expect("cookie removed");
    assert!(removal.contains("Max-Age=0"));
}

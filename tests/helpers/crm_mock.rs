#![allow(dead_code)]
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// CRM record as returned by search and batch read
pub fn crm_object(id: &str, properties: Value) -> Value {
    json!({
        "id": id,
        "properties": properties,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z",
        "archived": false
    })
}

pub async fn mount_contact_search(server: &MockServer, results: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/crm/v3/objects/contacts/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": results.len(),
            "results": results
        })))
        .mount(server)
        .await;
}

/// v4 associations answer with numeric ids
pub async fn mount_associations(
    server: &MockServer,
    from: &str,
    id: &str,
    to: &str,
    ids: &[&str],
) {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "toObjectId": id.parse::<u64>().expect("numeric id"),
                "associationTypes": [{"category": "HUBSPOT_DEFINED", "typeId": 1}]
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!(
            "/crm/v4/objects/{}/{}/associations/{}",
            from, id, to
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .mount(server)
        .await;
}

pub async fn mount_batch_read(server: &MockServer, object_type: &str, results: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(format!("/crm/v3/objects/{}/batch/read", object_type)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETE",
            "results": results
        })))
        .mount(server)
        .await;
}

pub async fn mount_create(server: &MockServer, object_type: &str, status: u16, id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/crm/v3/objects/{}", object_type)))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "id": id,
            "properties": {}
        })))
        .mount(server)
        .await;
}

pub async fn mount_contact_details(server: &MockServer, id: &str, properties: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/crm/v3/objects/contacts/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(crm_object(id, properties)))
        .mount(server)
        .await;
}

pub async fn mount_file(server: &MockServer, id: &str, file: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/files/v3/files/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(file))
        .mount(server)
        .await;
}

pub async fn mount_missing_file(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/files/v3/files/{}", id)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "File not found"
        })))
        .mount(server)
        .await;
}

pub fn file_metadata(id: &str, name: &str, extension: &str, file_type: &str, url: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "extension": extension,
        "type": file_type,
        "size": 2048,
        "url": url,
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

/// JSON bodies of the requests sent to `path`, in order
pub async fn request_bodies(server: &MockServer, request_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .filter_map(|r| serde_json::from_slice(&r.body).ok())
        .collect()
}

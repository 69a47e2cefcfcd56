use crate::config::CrmConfig;
use crate::domain::entities::UploadedFile;
use crate::domain::ports::crm_client::{
    CrmClient, CrmError, CrmFile, CrmObject, CrmObjectType, CrmResult, NewCrmObject,
};
use crate::infrastructure::crm::payloads::{
    id_to_string, AssociationInput, AssociationList, BatchReadRequest, CreateRequest,
    CreatedObject, IdInput, ObjectList, SearchRequest, UploadResponse,
};
use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

/// Longest upstream body kept in errors and logs
const MAX_ERROR_BODY: usize = 2000;

/// CRM client speaking the HubSpot REST API
#[derive(Clone)]
pub struct HubSpotClient {
    http_client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl HubSpotClient {
    pub fn new(config: &CrmConfig) -> Result<Self, CrmError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CrmError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL for a path built from segments; each segment is percent-encoded
    /// so ids cannot add path components or a query
    fn object_url(&self, segments: &[&str]) -> CrmResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| CrmError::Transport(format!("Invalid CRM base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CrmError::Transport("CRM base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn token(&self) -> CrmResult<&str> {
        self.access_token
            .as_deref()
            .ok_or(CrmError::MissingCredential)
    }

    /// Authenticate and send, without judging the status code
    async fn send_raw(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> CrmResult<Response> {
        let token = self.token()?;

        match request.bearer_auth(token).send().await {
            Ok(response) => {
                let outcome = if response.status().is_success() {
                    "ok"
                } else {
                    "error"
                };
                metrics::counter!(
                    "crm_requests_total",
                    "operation" => operation,
                    "outcome" => outcome
                )
                .increment(1);
                debug!("CRM {} returned status {}", operation, response.status());
                Ok(response)
            }
            Err(e) => {
                metrics::counter!(
                    "crm_requests_total",
                    "operation" => operation,
                    "outcome" => "transport"
                )
                .increment(1);
                let msg = if e.is_timeout() {
                    format!("CRM {} timed out: {}", operation, e)
                } else if e.is_connect() {
                    format!("CRM {} connection failed: {}", operation, e)
                } else {
                    format!("CRM {} failed: {}", operation, e)
                };
                error!("{}", msg);
                Err(CrmError::Transport(msg))
            }
        }
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> CrmResult<Response> {
        let response = self.send_raw(operation, request).await?;
        ensure_success(operation, response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> CrmResult<T> {
        let response = self.send(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CrmError::Decode(format!("{}: {}", operation, e)))
    }
}

async fn ensure_success(operation: &'static str, response: Response) -> CrmResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    error!("CRM {} failed with status {}: {}", operation, status, body);

    Err(CrmError::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CrmClient for HubSpotClient {
    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }

    async fn search_one(
        &self,
        object_type: CrmObjectType,
        property: &str,
        value: &str,
        properties: &[&str],
    ) -> CrmResult<Option<CrmObject>> {
        let payload = SearchRequest::equals(property, value, properties);
        let url = self.url(&format!("/crm/v3/objects/{}/search", object_type.as_str()));

        let list: ObjectList = self
            .send_json("search", self.http_client.post(url).json(&payload))
            .await?;

        debug!(
            "CRM search on {}.{} returned {} result(s)",
            object_type.as_str(),
            property,
            list.results.len()
        );
        Ok(list.results.into_iter().next())
    }

    async fn get_object(
        &self,
        object_type: CrmObjectType,
        id: &str,
        properties: &[&str],
    ) -> CrmResult<CrmObject> {
        let url = self.object_url(&["crm", "v3", "objects", object_type.as_str(), id])?;
        let request = self
            .http_client
            .get(url)
            .query(&[("properties", properties.join(","))]);

        self.send_json("get_object", request).await
    }

    async fn associated_ids(
        &self,
        from: CrmObjectType,
        id: &str,
        to: CrmObjectType,
    ) -> CrmResult<Vec<String>> {
        let url = self.object_url(&[
            "crm",
            "v4",
            "objects",
            from.as_str(),
            id,
            "associations",
            to.as_str(),
        ])?;

        let list: AssociationList = self
            .send_json("associations", self.http_client.get(url))
            .await?;

        Ok(list
            .results
            .iter()
            .filter_map(|r| id_to_string(&r.to_object_id))
            .collect())
    }

    async fn batch_read(
        &self,
        object_type: CrmObjectType,
        ids: &[String],
        properties: &[&str],
    ) -> CrmResult<Vec<CrmObject>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let payload = BatchReadRequest {
            inputs: ids.iter().map(|id| IdInput { id }).collect(),
            properties,
        };
        let url = self.url(&format!(
            "/crm/v3/objects/{}/batch/read",
            object_type.as_str()
        ));

        let list: ObjectList = self
            .send_json("batch_read", self.http_client.post(url).json(&payload))
            .await?;
        Ok(list.results)
    }

    async fn create_object(
        &self,
        object_type: CrmObjectType,
        object: NewCrmObject,
    ) -> CrmResult<String> {
        let payload = CreateRequest {
            properties: object.properties,
            associations: object
                .associations
                .into_iter()
                .map(AssociationInput::from)
                .collect(),
        };
        let url = self.url(&format!("/crm/v3/objects/{}", object_type.as_str()));

        let created: CreatedObject = self
            .send_json("create_object", self.http_client.post(url).json(&payload))
            .await?;

        let id = id_to_string(&created.id)
            .ok_or_else(|| CrmError::Decode("created object has no id".to_string()))?;
        info!("Created CRM {} object {}", object_type.as_str(), id);
        Ok(id)
    }

    async fn upload_file(&self, file: &UploadedFile, folder_id: &str) -> CrmResult<String> {
        let part = multipart::Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| CrmError::Decode(format!("invalid content type: {}", e)))?;

        let options = json!({
            "access": "PUBLIC_NOT_INDEXABLE",
            "ttl": "P3M",
            "overwrite": false,
        });

        let form = multipart::Form::new()
            .part("file", part)
            .text("folderId", folder_id.to_string())
            .text("options", options.to_string());

        let url = self.url("/filemanager/api/v3/files/upload");
        let uploaded: UploadResponse = self
            .send_json("upload_file", self.http_client.post(url).multipart(form))
            .await?;

        uploaded
            .file_id()
            .ok_or_else(|| CrmError::Decode("upload response has no file id".to_string()))
    }

    async fn get_file(&self, id: &str) -> CrmResult<Option<CrmFile>> {
        let url = self.object_url(&["files", "v3", "files", id])?;
        let response = self.send_raw("get_file", self.http_client.get(url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("CRM file {} not found", id);
            return Ok(None);
        }

        let response = ensure_success("get_file", response).await?;
        response
            .json::<CrmFile>()
            .await
            .map(Some)
            .map_err(|e| CrmError::Decode(format!("get_file: {}", e)))
    }
}

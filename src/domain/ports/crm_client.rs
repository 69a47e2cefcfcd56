use crate::domain::entities::UploadedFile;
use crate::domain::errors::DomainError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// CRM object families the gateway touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrmObjectType {
    Contacts,
    Deals,
    Tickets,
    Emails,
    Notes,
}

impl CrmObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrmObjectType::Contacts => "contacts",
            CrmObjectType::Deals => "deals",
            CrmObjectType::Tickets => "tickets",
            CrmObjectType::Emails => "emails",
            CrmObjectType::Notes => "notes",
        }
    }
}

/// CRM-defined association type ids
pub mod association_types {
    pub const CONTACT_TO_TICKET: u32 = 16;
    pub const DEAL_TO_TICKET: u32 = 28;
    pub const EMAIL_TO_CONTACT: u32 = 198;
    pub const EMAIL_TO_TICKET: u32 = 224;
    pub const NOTE_TO_TICKET: u32 = 228;
}

/// Generic CRM record: an id and a bag of nullable string properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

impl CrmObject {
    /// Property value, treating null and blank as absent
    pub fn prop(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn prop_owned(&self, name: &str) -> Option<String> {
        self.prop(name).map(str::to_string)
    }
}

/// File metadata from CRM file storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmFile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Association attached to an object at creation time
#[derive(Debug, Clone, PartialEq)]
pub struct CrmAssociation {
    pub to_id: String,
    pub type_id: u32,
}

impl CrmAssociation {
    pub fn new(to_id: impl Into<String>, type_id: u32) -> Self {
        Self {
            to_id: to_id.into(),
            type_id,
        }
    }
}

/// Object to create: JSON properties (values may be numbers) plus associations
#[derive(Debug, Clone, Default)]
pub struct NewCrmObject {
    pub properties: serde_json::Map<String, Value>,
    pub associations: Vec<CrmAssociation>,
}

impl NewCrmObject {
    pub fn property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn associate(mut self, association: CrmAssociation) -> Self {
        self.associations.push(association);
        self
    }
}

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("HubSpot access token not configured")]
    MissingCredential,
    #[error("CRM responded with {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("CRM request failed: {0}")]
    Transport(String),
    #[error("Unexpected CRM response: {0}")]
    Decode(String),
}

impl From<CrmError> for DomainError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::MissingCredential => DomainError::Configuration(err.to_string()),
            CrmError::Upstream { status, body } => DomainError::Upstream { status, body },
            CrmError::Transport(msg) | CrmError::Decode(msg) => DomainError::Internal(msg),
        }
    }
}

pub type CrmResult<T> = Result<T, CrmError>;

#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Whether a credential is available; checked before any side effect
    fn is_configured(&self) -> bool;

    /// First object whose `property` equals `value`
    async fn search_one(
        &self,
        object_type: CrmObjectType,
        property: &str,
        value: &str,
        properties: &[&str],
    ) -> CrmResult<Option<CrmObject>>;

    async fn get_object(
        &self,
        object_type: CrmObjectType,
        id: &str,
        properties: &[&str],
    ) -> CrmResult<CrmObject>;

    /// Ids of `to` objects associated to `from/id`
    async fn associated_ids(
        &self,
        from: CrmObjectType,
        id: &str,
        to: CrmObjectType,
    ) -> CrmResult<Vec<String>>;

    async fn batch_read(
        &self,
        object_type: CrmObjectType,
        ids: &[String],
        properties: &[&str],
    ) -> CrmResult<Vec<CrmObject>>;

    /// Create an object and return its id
    async fn create_object(
        &self,
        object_type: CrmObjectType,
        object: NewCrmObject,
    ) -> CrmResult<String>;

    /// Upload a file to CRM storage and return its id
    async fn upload_file(&self, file: &UploadedFile, folder_id: &str) -> CrmResult<String>;

    /// File metadata, `None` when the file no longer exists
    async fn get_file(&self, id: &str) -> CrmResult<Option<CrmFile>>;
}

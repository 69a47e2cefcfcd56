//! Wire shapes of the CRM REST API

use crate::domain::ports::crm_client::{CrmAssociation, CrmObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub filter_groups: Vec<FilterGroup<'a>>,
    pub properties: &'a [&'a str],
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct FilterGroup<'a> {
    pub filters: Vec<Filter<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter<'a> {
    pub property_name: &'a str,
    pub operator: &'static str,
    pub value: &'a str,
}

impl<'a> SearchRequest<'a> {
    /// Single equality filter, first match only
    pub fn equals(property: &'a str, value: &'a str, properties: &'a [&'a str]) -> Self {
        Self {
            filter_groups: vec![FilterGroup {
                filters: vec![Filter {
                    property_name: property,
                    operator: "EQ",
                    value,
                }],
            }],
            properties,
            limit: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ObjectList {
    #[serde(default)]
    pub results: Vec<CrmObject>,
}

#[derive(Debug, Deserialize)]
pub struct AssociationList {
    #[serde(default)]
    pub results: Vec<AssociationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationResult {
    pub to_object_id: Value,
}

#[derive(Debug, Serialize)]
pub struct BatchReadRequest<'a> {
    pub inputs: Vec<IdInput<'a>>,
    pub properties: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct IdInput<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest {
    pub properties: serde_json::Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associations: Vec<AssociationInput>,
}

#[derive(Debug, Serialize)]
pub struct AssociationInput {
    pub to: AssociationTarget,
    pub types: Vec<AssociationSpec>,
}

#[derive(Debug, Serialize)]
pub struct AssociationTarget {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationSpec {
    pub association_category: &'static str,
    pub association_type_id: u32,
}

impl From<CrmAssociation> for AssociationInput {
    fn from(association: CrmAssociation) -> Self {
        Self {
            to: AssociationTarget {
                id: association.to_id,
            },
            types: vec![AssociationSpec {
                association_category: "HUBSPOT_DEFINED",
                association_type_id: association.type_id,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedObject {
    pub id: Value,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub objects: Vec<CreatedObject>,
    #[serde(default)]
    pub id: Option<Value>,
}

impl UploadResponse {
    /// The file manager answers either `{objects:[{id}]}` or `{id}`
    pub fn file_id(&self) -> Option<String> {
        self.objects
            .first()
            .map(|o| &o.id)
            .or(self.id.as_ref())
            .and_then(id_to_string)
    }
}

/// Ids come back as strings from v3 and numbers from v4
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

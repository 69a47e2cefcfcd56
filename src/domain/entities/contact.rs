use serde::{Deserialize, Serialize};

/// How a customer identifies themselves on the first wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentificationMethod {
    Phone,
    Email,
}

impl IdentificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentificationMethod::Phone => "phone",
            IdentificationMethod::Email => "email",
        }
    }

    /// Unique CRM contact property queried for this method
    pub fn crm_property(&self) -> &'static str {
        match self {
            IdentificationMethod::Phone => "mobilephone",
            IdentificationMethod::Email => "email",
        }
    }

    /// Customer-facing message when no contact matches
    pub fn not_found_message(&self) -> &'static str {
        match self {
            IdentificationMethod::Phone => "Aucun contact trouvé avec ce numéro de mobile.",
            IdentificationMethod::Email => "Aucun contact trouvé avec cette adresse email.",
        }
    }

    /// Rewrite a raw identification value into the form stored in the CRM
    pub fn normalize(&self, value: &str, country_code: &str) -> String {
        match self {
            IdentificationMethod::Phone => normalize_phone_number(value, country_code),
            IdentificationMethod::Email => value.trim().to_string(),
        }
    }
}

impl std::str::FromStr for IdentificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(IdentificationMethod::Phone),
            "email" => Ok(IdentificationMethod::Email),
            other => Err(format!("Unknown identification method: {}", other)),
        }
    }
}

impl std::fmt::Display for IdentificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Convert a national phone number into international format.
///
/// Whitespace is removed, a leading `00` becomes `+`, and a single leading
/// national trunk `0` is replaced by `+<country_code>`. Numbers already in
/// international form are returned without whitespace.
pub fn normalize_phone_number(value: &str, country_code: &str) -> String {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(rest) = compact.strip_prefix("00") {
        format!("+{}", rest)
    } else if let Some(rest) = compact.strip_prefix('0') {
        format!("+{}{}", country_code, rest)
    } else {
        compact
    }
}

/// Contact as surfaced to the wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub contact_id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Contact {
    /// Build a contact from CRM name parts, falling back to "Contact" when both are empty
    pub fn from_parts(
        contact_id: String,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Self {
        let full_name = format!(
            "{} {}",
            first_name.unwrap_or_default(),
            last_name.unwrap_or_default()
        )
        .trim()
        .to_string();

        Self {
            contact_id,
            full_name: if full_name.is_empty() {
                "Contact".to_string()
            } else {
                full_name
            },
            first_name: non_empty(first_name),
            email: non_empty(email),
            phone: non_empty(phone),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outcome of a contact lookup, discriminated by `found`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSearchResult {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactSearchResult {
    pub fn found(contact: Contact) -> Self {
        Self {
            found: true,
            contact: Some(contact),
            message: None,
            error: None,
        }
    }

    pub fn not_found(method: IdentificationMethod) -> Self {
        Self {
            found: false,
            contact: None,
            message: Some(method.not_found_message().to_string()),
            error: None,
        }
    }

    /// Synthetic result used when the lookup itself failed
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            found: false,
            contact: None,
            message: None,
            error: Some(error.into()),
        }
    }

    /// Text to show under the identification input
    pub fn display_message(&self) -> Option<&str> {
        if self.found {
            return None;
        }
        self.message.as_deref().or(self.error.as_deref())
    }
}

use serde::{Deserialize, Serialize};

/// Extensions treated as photos
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Image attachment shown in the ticket conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAttachment {
    pub id: String,
    pub name: String,
    pub extension: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub url: String,
    pub created_at: Option<String>,
}

impl PhotoAttachment {
    /// Keep a file only when it is an image with a resolvable URL
    pub fn from_file(
        id: String,
        name: Option<String>,
        extension: Option<String>,
        file_type: Option<String>,
        size: Option<u64>,
        url: Option<String>,
        created_at: Option<String>,
    ) -> Option<Self> {
        let extension = extension.unwrap_or_default();
        let file_type = file_type.unwrap_or_default();
        let url = url.unwrap_or_default();

        if url.trim().is_empty() || !is_photo(&extension, &file_type) {
            return None;
        }

        Some(Self {
            id,
            name: name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            extension,
            file_type,
            size: size.unwrap_or(0),
            url,
            created_at,
        })
    }
}

/// Image check on either the extension or the CRM type string
pub fn is_photo(extension: &str, file_type: &str) -> bool {
    let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    let file_type = file_type.trim().to_ascii_lowercase();

    PHOTO_EXTENSIONS.contains(&extension.as_str())
        || file_type.starts_with("image/")
        || file_type == "img"
}

/// File received from the customer, ready to be forwarded to CRM storage
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            content,
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

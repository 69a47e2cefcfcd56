use crate::domain::entities::IdentificationMethod;
use reqwest::Url;

/// Whether the wizard collects internal notes alongside the ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminMode {
    #[default]
    Disabled,
    Enabled,
}

impl AdminMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, AdminMode::Enabled)
    }
}

/// Query parameters the portal was opened with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub admin: AdminMode,
}

impl LaunchParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "email" => params.email = Some(value.to_string()),
                "phone" => params.phone = Some(value.to_string()),
                "admin" => {
                    params.admin = if value == "true" {
                        AdminMode::Enabled
                    } else {
                        AdminMode::Disabled
                    }
                }
                _ => {}
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_pairs(url.query_pairs())
    }

    /// Identification to replay on load; email wins over phone, blanks are ignored
    pub fn identification(&self) -> Option<(IdentificationMethod, String)> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        non_blank(&self.email)
            .map(|email| (IdentificationMethod::Email, email))
            .or_else(|| non_blank(&self.phone).map(|phone| (IdentificationMethod::Phone, phone)))
    }
}

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub crm: CrmConfig,
    pub phone_country_code: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub contact_lookup_max_attempts: u32,
    pub contact_lookup_window_seconds: u64,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: Option<u16>,
}

/// Settings for the CRM REST API and the ticket side effects
#[derive(Clone, Debug)]
pub struct CrmConfig {
    pub access_token: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub upload_folder_id: String,
    pub support_mailbox: SupportMailbox,
}

/// Recipient of the inbound engagement created with each ticket
#[derive(Clone, Debug)]
pub struct SupportMailbox {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for SupportMailbox {
    fn default() -> Self {
        Self {
            email: "client@goensol.com".to_string(),
            first_name: "SAV".to_string(),
            last_name: "Ensol".to_string(),
        }
    }
}

impl CrmConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.hubapi.com";
    pub const DEFAULT_UPLOAD_FOLDER_ID: &'static str = "250402102515";

    /// CRM settings pointing at `base_url`, everything else defaulted
    pub fn new(base_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            access_token,
            base_url: base_url.into(),
            timeout_seconds: 30,
            upload_folder_id: Self::DEFAULT_UPLOAD_FOLDER_ID.to_string(),
            support_mailbox: SupportMailbox::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            crm: CrmConfig::new(CrmConfig::DEFAULT_BASE_URL, None),
            phone_country_code: "33".to_string(),
            cors_allowed_origins: Vec::new(),
            max_upload_bytes: 50 * 1024 * 1024,
            contact_lookup_max_attempts: 20,
            contact_lookup_window_seconds: 60,
            otel_exporter_endpoint: None,
            service_name: "ticket-portal".to_string(),
            metrics_port: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        // A missing token is reported per request, not at boot
        let access_token = env::var("HUBSPOT_ACCESS_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let base_url = env::var("HUBSPOT_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| CrmConfig::DEFAULT_BASE_URL.to_string());

        let timeout_seconds = parse_or("CRM_TIMEOUT_SECONDS", 30)?;

        let upload_folder_id = env::var("HUBSPOT_UPLOAD_FOLDER_ID")
            .unwrap_or_else(|_| CrmConfig::DEFAULT_UPLOAD_FOLDER_ID.to_string());

        let defaults = SupportMailbox::default();
        let support_mailbox = SupportMailbox {
            email: env::var("SUPPORT_MAILBOX_EMAIL").unwrap_or(defaults.email),
            first_name: env::var("SUPPORT_MAILBOX_FIRST_NAME").unwrap_or(defaults.first_name),
            last_name: env::var("SUPPORT_MAILBOX_LAST_NAME").unwrap_or(defaults.last_name),
        };

        let phone_country_code = env::var("PHONE_COUNTRY_CODE")
            .map(|code| code.trim().trim_start_matches('+').to_string())
            .unwrap_or_else(|_| "33".to_string());
        if phone_country_code.is_empty() || !phone_country_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidValue("PHONE_COUNTRY_CODE"));
        }

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?;
        let contact_lookup_max_attempts = parse_or("CONTACT_LOOKUP_MAX_ATTEMPTS", 20)?;
        let contact_lookup_window_seconds = parse_or("CONTACT_LOOKUP_WINDOW_SECONDS", 60)?;

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "ticket-portal".to_string());

        let metrics_port = match env::var("METRICS_PORT") {
            Ok(port) => Some(port.parse().map_err(|_| ConfigError::InvalidPort)?),
            Err(_) => None,
        };

        Ok(Config {
            server_host,
            server_port,
            crm: CrmConfig {
                access_token,
                base_url,
                timeout_seconds,
                upload_folder_id,
                support_mailbox,
            },
            phone_country_code,
            cors_allowed_origins,
            max_upload_bytes,
            contact_lookup_max_attempts,
            contact_lookup_window_seconds,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid value for {0}")]
    InvalidValue(&'static str),
}

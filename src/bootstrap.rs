use crate::application::services::{ContactService, DealService, MessageService, TicketService};
use crate::config::Config;
use crate::domain::ports::crm_client::{CrmClient, CrmError};
use crate::infrastructure::crm::HubSpotClient;
use crate::infrastructure::http::middleware::AppState;
use crate::shared::LookupRateLimiter;
use std::sync::Arc;
use std::time::Duration;

/// Wire the services over a HubSpot client built from `config`
pub fn build_app_state(config: &Config) -> Result<AppState, CrmError> {
    let crm = Arc::new(HubSpotClient::new(&config.crm)?) as Arc<dyn CrmClient>;

    if crm.is_configured() {
        tracing::info!("CRM client configured for {}", config.crm.base_url);
    } else {
        tracing::warn!("HUBSPOT_ACCESS_TOKEN not set, CRM requests will be rejected");
    }

    Ok(build_app_state_with(crm, config))
}

/// Wire the services over any CRM client
pub fn build_app_state_with(crm: Arc<dyn CrmClient>, config: &Config) -> AppState {
    let rate_limiter = LookupRateLimiter::with_config(
        config.contact_lookup_max_attempts,
        Duration::from_secs(config.contact_lookup_window_seconds),
    );

    AppState {
        contact_service: ContactService::new(
            crm.clone(),
            rate_limiter,
            config.phone_country_code.clone(),
        ),
        ticket_service: TicketService::new(crm.clone(), &config.crm),
        deal_service: DealService::new(crm.clone()),
        message_service: MessageService::new(crm),
    }
}

pub mod hubspot;
pub mod payloads;

pub use hubspot::HubSpotClient;

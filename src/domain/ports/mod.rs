pub mod crm_client;
pub mod session_store;
pub mod support_gateway;

pub mod crm;
pub mod gateway;
pub mod http;
pub mod observability;
pub mod session;

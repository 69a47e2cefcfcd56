pub mod contacts;
pub mod deals;
pub mod messages;
pub mod session;
pub mod tickets;

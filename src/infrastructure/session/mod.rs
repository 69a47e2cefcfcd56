pub mod cookie_store;
pub mod memory_store;

pub use cookie_store::CookieSessionStore;
pub use memory_store::MemorySessionStore;

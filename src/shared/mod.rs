pub mod html_sanitizer;
pub mod rate_limiter;
pub mod utils;

pub use html_sanitizer::*;
pub use rate_limiter::*;

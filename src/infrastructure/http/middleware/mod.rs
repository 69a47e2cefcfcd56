pub mod error;
pub mod state;

pub use error::{ApiError, ApiResult, ContactLookupError};
pub use state::AppState;

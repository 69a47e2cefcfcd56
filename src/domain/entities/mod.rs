pub mod attachment;
pub mod contact;
pub mod deal;
pub mod message;
pub mod session;
pub mod ticket;

pub use attachment::*;
pub use contact::*;
pub use deal::*;
pub use message::*;
pub use session::*;
pub use ticket::*;

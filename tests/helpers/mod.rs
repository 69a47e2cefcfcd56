#![allow(unused_imports)]
pub mod crm_mock;
pub mod gateway_fake;
pub mod test_app;

pub use crm_mock::*;
pub use gateway_fake::*;
pub use test_app::*;

pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod router;

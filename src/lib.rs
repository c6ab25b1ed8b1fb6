pub mod api;
pub mod auth;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod fleet;
pub mod session;

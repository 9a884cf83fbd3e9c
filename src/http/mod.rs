//! Inbound HTTP service layer.

pub mod auth;
pub mod dashboard;
pub mod server;

pub use server::{AppState, HttpServer};

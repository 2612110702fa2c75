// Library crate for the portfolio API server
// This file exposes the public API for the binary and integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod message;
pub mod project;
pub mod shared;
pub mod skill;
pub mod software_application;
pub mod store;
pub mod timeline;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::{api_routes, build_router, with_middleware};
pub use config::{Config, ConfigError, Environment};
pub use shared::{AppError, AppState, ErrorEnvelope, MessageResponse};

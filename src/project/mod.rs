// Public API - what other modules can use
pub use handlers::router;

// Internal modules
mod handlers;
pub mod models;
pub mod types;

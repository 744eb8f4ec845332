pub mod config;
pub mod db;
pub mod error;

// Front ends
pub mod api;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};

// Public modules
pub mod api;
pub mod config;
pub mod content_view;
pub mod environment;
pub mod error;
pub mod hosts;
pub mod mailer;
pub mod oauth;
pub mod organization;
pub mod promote;
pub mod publish;
pub mod report;
pub mod tasks;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};

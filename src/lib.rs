//! Read-only rule content service library.

pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use content::{ContentCatalog, ContentEncoder, GroupSet};
pub use http::HttpServer;
pub use lifecycle::Shutdown;

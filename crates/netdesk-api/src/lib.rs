// netdesk-api: Async Rust client for the package-management REST API

pub mod client;
pub mod error;
pub mod packages;
pub mod routers;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};

pub mod client;
pub mod http;
pub mod session;

pub use client::{BackendConfig, ContestBackend};
pub use http::HttpBackend;
pub use session::Session;

use async_trait::async_trait;

use crate::models::{Result, WinnerRecord};

/// Contest-tracking backend consumed over REST.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContestBackend: Send + Sync {
    /// Raw winner list for a named contest
    async fn fetch_winners(&self, contest_name: &str) -> Result<Vec<WinnerRecord>>;

    /// Ask the backend to compute the winner list of a contest (admin only)
    async fn generate_results(&self, contest_name: &str) -> Result<()>;

    /// Reset the tracked contest users (admin only)
    async fn reset_users(&self) -> Result<()>;
}

/// Connection settings for the HTTP backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

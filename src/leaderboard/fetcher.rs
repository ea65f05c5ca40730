use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{backend::ContestBackend, models::WinnerRecord};

/// Pulls the raw winner list of a contest. Failures never reach the caller:
/// they are logged and the empty list is returned.
#[derive(Clone)]
pub struct LeaderboardFetcher {
    backend: Arc<dyn ContestBackend>,
}

impl LeaderboardFetcher {
    pub fn new(backend: Arc<dyn ContestBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn ContestBackend> {
        &self.backend
    }

    pub async fn fetch(&self, contest_name: &str) -> Vec<WinnerRecord> {
        let contest_name = contest_name.trim();
        if contest_name.is_empty() {
            warn!("No contest name given, skipping fetch");
            return Vec::new();
        }

        match self.backend.fetch_winners(contest_name).await {
            Ok(records) => {
                info!("Fetched {} winners for {}", records.len(), contest_name);
                records
            }
            Err(e) => {
                error!("Failed to fetch winners for {}: {}", contest_name, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::client::MockContestBackend;
    use crate::models::LeaderboardError;

    #[tokio::test]
    async fn test_fetch_returns_backend_records() {
        let mut backend = MockContestBackend::new();
        backend
            .expect_fetch_winners()
            .times(1)
            .returning(|_| Ok(vec![WinnerRecord::new("asha").with_rank(1)]));

        let fetcher = LeaderboardFetcher::new(Arc::new(backend));
        let records = fetcher.fetch("start101").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].username, "asha");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty() {
        let mut backend = MockContestBackend::new();
        backend.expect_fetch_winners().times(1).returning(|_| {
            Err(LeaderboardError::UnexpectedStatus {
                status: 500,
                endpoint: "allwinners".to_string(),
            })
        });

        let fetcher = LeaderboardFetcher::new(Arc::new(backend));
        assert!(fetcher.fetch("start101").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_contest_skips_backend() {
        let mut backend = MockContestBackend::new();
        backend.expect_fetch_winners().times(0);

        let fetcher = LeaderboardFetcher::new(Arc::new(backend));
        assert!(fetcher.fetch("   ").await.is_empty());
    }
}

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::{
    backend::ContestBackend,
    leaderboard::{
        categorize, commands, exporter, AdminCommand, CategorizationScheme, Categorized,
        CommandOutcome, LeaderboardFetcher,
    },
    models::{Result, WinnerRecord},
};

/// The raw result set of one contest. Groupings are derived from it on
/// demand and never stored.
#[derive(Debug, Clone)]
pub struct LeaderboardView {
    pub contest_name: String,
    pub records: Vec<WinnerRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl LeaderboardView {
    pub fn new(contest_name: impl Into<String>, records: Vec<WinnerRecord>) -> Self {
        Self {
            contest_name: contest_name.into(),
            records,
            fetched_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn categorized(&self, scheme: CategorizationScheme, top_n: Option<usize>) -> Categorized {
        categorize(&self.records, scheme).ranked(top_n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

/// Fetch, categorize, rank and export, wired to one backend.
#[derive(Clone)]
pub struct LeaderboardService {
    fetcher: LeaderboardFetcher,
}

impl LeaderboardService {
    pub fn new(backend: Arc<dyn ContestBackend>) -> Self {
        Self {
            fetcher: LeaderboardFetcher::new(backend),
        }
    }

    pub async fn load(&self, contest_name: &str) -> LeaderboardView {
        let records = self.fetcher.fetch(contest_name).await;
        LeaderboardView::new(contest_name.trim(), records)
    }

    pub async fn run(&self, command: &AdminCommand) -> CommandOutcome {
        commands::execute(self.fetcher.backend().as_ref(), command).await
    }

    /// Writes every bucket in full, ranked, to `path`.
    pub fn export(
        &self,
        view: &LeaderboardView,
        scheme: CategorizationScheme,
        path: &Path,
    ) -> Result<ExportSummary> {
        let document = exporter::build_document(&view.categorized(scheme, None));
        document.save(path)?;

        info!(
            "Exported {} for {} grouped by {}",
            path.display(),
            view.contest_name,
            scheme
        );

        Ok(ExportSummary {
            path: path.to_path_buf(),
            sheets: document.sheets.len(),
            rows: document.data_row_count(),
        })
    }
}

pub mod categorizer;
pub mod ranker;
pub mod exporter;
pub mod fetcher;
pub mod commands;
pub mod service;

pub use categorizer::{categorize, CategorizationScheme, Categorized, Group, Bucket};
pub use ranker::{rank, top_n};
pub use exporter::{build_document, ExportDocument, SheetLayout, DEFAULT_EXPORT_FILE};
pub use fetcher::LeaderboardFetcher;
pub use commands::{AdminCommand, CommandOutcome, OutcomeStatus};
pub use service::{LeaderboardService, LeaderboardView, ExportSummary};

pub mod models;
pub mod config;
pub mod backend;
pub mod leaderboard;
pub mod tui;

pub use models::{WinnerRecord, LeaderboardError, Result, ordinal_label, medal_marker, Medal};
pub use config::Settings;
pub use backend::{ContestBackend, HttpBackend, Session};

// Re-export the pipeline entry points
pub use leaderboard::{
    categorize, rank, top_n, build_document, CategorizationScheme, Categorized,
    LeaderboardService, LeaderboardView,
};

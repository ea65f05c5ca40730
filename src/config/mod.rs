pub mod settings;

pub use settings::{Settings, AppSettings, BackendSettings, LeaderboardSettings, Environment};

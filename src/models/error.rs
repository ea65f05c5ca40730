use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("Invalid backend URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet export failed: {0}")]
    ExportError(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown categorization scheme: {0}")]
    UnknownScheme(String),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while fetching or parsing a single feed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("unable to parse feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Errors raised while delivering a webhook notification
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel not configured: {0}")]
    NotConfigured(String),

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("webhook returned {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Errors raised by the last-seen state file
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not a valid name-to-identifier map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to replace state file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors that abort a whole checker run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("DISCORD_WEBHOOK_URL not found")]
    MissingWebhook,

    #[error("invalid {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error(transparent)]
    State(#[from] StateError),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid_config(field: &str, message: &str) -> Self {
        AppError::InvalidConfig {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

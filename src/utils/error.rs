use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnifinderError {
    #[error("Directory service responded with HTTP {status_code}")]
    RemoteServiceError { status_code: u16 },

    #[error("Malformed directory response: {message}")]
    MalformedResponseError { message: String },

    #[error("Failed to read '{key}' from storage: {message}")]
    StorageReadError { key: String, message: String },

    #[error("Failed to write '{key}' to storage: {message}")]
    StorageWriteError { key: String, message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },
}

impl UnifinderError {
    /// Network and server-side failures may succeed when tried again.
    pub fn is_retryable(&self) -> bool {
        match self {
            UnifinderError::RemoteServiceError { status_code } => {
                *status_code >= 500 || *status_code == 429
            }
            UnifinderError::ApiError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            UnifinderError::StorageReadError { .. } | UnifinderError::StorageWriteError { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UnifinderError::RemoteServiceError { status_code } => format!(
                "The university directory is unavailable right now (HTTP {})",
                status_code
            ),
            UnifinderError::ApiError(_) => {
                "Could not reach the university directory".to_string()
            }
            UnifinderError::MalformedResponseError { .. } => {
                "The university directory sent a response that could not be understood"
                    .to_string()
            }
            UnifinderError::StorageReadError { .. } => "Could not load your favorites".to_string(),
            UnifinderError::StorageWriteError { .. } => {
                "Could not save your favorites; the change was not applied".to_string()
            }
            UnifinderError::ValidationError { message } | UnifinderError::NotFound { message } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UnifinderError::RemoteServiceError { .. } | UnifinderError::ApiError(_) => {
                "Check your network connection and try again"
            }
            UnifinderError::MalformedResponseError { .. } => {
                "Try again later; if it persists, check the configured directory base_url"
            }
            UnifinderError::StorageReadError { .. }
            | UnifinderError::StorageWriteError { .. } => {
                "Make sure the data directory exists and is writable"
            }
            UnifinderError::ConfigError { .. }
            | UnifinderError::ConfigValidationError { .. }
            | UnifinderError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            UnifinderError::ValidationError { .. } => "Please enter a country name",
            UnifinderError::NotFound { .. } => {
                "Run `unifinder search <COUNTRY>` to see the exact university names"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, UnifinderError>;

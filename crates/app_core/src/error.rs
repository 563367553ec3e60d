//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Could not open {0} externally")]
    Open(String),

    // ===== Fatal Errors (application termination) =====
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Init(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::Network(_)
                | AppError::HttpStatus { .. }
                | AppError::ImageDecode(_)
                | AppError::Storage(_)
                | AppError::Unsupported(_)
                | AppError::Open(_)
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) | AppError::HttpStatus { .. } => {
                "Could not reach the image host".to_string()
            }
            AppError::ImageDecode(_) => "Image could not be displayed".to_string(),
            AppError::Storage(_) => "Changes could not be saved".to_string(),
            AppError::Unsupported(what) => format!("{} is not available here", what),
            _ => self.to_string(),
        }
    }
}

impl From<app_db::DbError> for AppError {
    fn from(e: app_db::DbError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::ImageDecode(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AppError::HttpStatus {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            },
            None => AppError::Network(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Catalog(e.to_string())
    }
}

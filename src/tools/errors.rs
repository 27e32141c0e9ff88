use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ScoutError {
    #[error("File operation failed: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Spreadsheet could not be read: {} - {message}", .path.display())]
    Spreadsheet { path: PathBuf, message: String },

    /// A row did not fit the `(name, ignored, address)` layout.
    #[error("Schema error at row {row}: {message}")]
    Schema { row: usize, message: String },

    #[error("Network request failed: {url} - {message}")]
    Network { url: String, message: String },

    #[error("Search returned HTTP {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("CSV output failed: {message}")]
    Csv { message: String },

    #[error("Invalid configuration: {config} - {message}")]
    InvalidConfig { config: String, message: String },
}

impl ScoutError {
    pub fn file_system(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::FileSystem {
            message: source.to_string(),
            path,
        }
    }

    pub fn spreadsheet(path: PathBuf, source: impl std::fmt::Display) -> Self {
        Self::Spreadsheet {
            path,
            message: source.to_string(),
        }
    }

    pub fn schema(row: usize, message: impl Into<String>) -> Self {
        Self::Schema {
            row,
            message: message.into(),
        }
    }

    pub fn network(url: String, source: reqwest::Error) -> Self {
        Self::Network {
            url,
            message: source.to_string(),
        }
    }

    pub fn http_status(url: String, status: reqwest::StatusCode) -> Self {
        Self::HttpStatus {
            url,
            status: status.as_u16(),
        }
    }

    pub fn invalid_config(config: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            config: config.to_string(),
            message: message.into(),
        }
    }

    /// Errors that only affect one entity and should not stop a batch.
    pub fn is_per_entity(&self) -> bool {
        matches!(
            self,
            ScoutError::Network { .. } | ScoutError::HttpStatus { .. }
        )
    }

    pub fn to_user_message(&self) -> String {
        match self {
            ScoutError::FileSystem { message, path } => {
                let path_str = path
                    .as_ref()
                    .map(|p| format!(" ({})", p.display()))
                    .unwrap_or_default();
                format!("File operation failed{}: {}", path_str, message)
            }
            ScoutError::Network { url, message } => {
                format!("Network request to '{}' failed: {}", url, message)
            }
            ScoutError::HttpStatus { url, status: 429 } => {
                format!("Search engine is throttling requests (HTTP 429) for '{}'", url)
            }
            ScoutError::Schema { row, message } => {
                format!("Input row {} does not match the expected layout: {}", row, message)
            }
            _ => self.to_string(),
        }
    }
}

impl From<csv::Error> for ScoutError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            message: err.to_string(),
        }
    }
}

pub type ScoutResult<T> = Result<T, ScoutError>;

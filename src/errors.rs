use axum::http::StatusCode;
use std::fmt;

/// Rejected boundary input. The engine itself never produces these.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NegativeValue { key: String, value: f64 },
    NotFinite { key: String },
    UnknownCategory { key: String },
    MissingCategory { key: String },
    EmptySubmission,
    InvalidDate { value: String },
    UnknownStaff { staff_id: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeValue { key, value } => {
                write!(f, "value for '{key}' must be non-negative, got {value}")
            }
            ValidationError::NotFinite { key } => write!(f, "value for '{key}' must be a number"),
            ValidationError::UnknownCategory { key } => write!(f, "unknown category '{key}'"),
            ValidationError::MissingCategory { key } => {
                write!(f, "a target for '{key}' is required")
            }
            ValidationError::EmptySubmission => write!(
                f,
                "enter a value (can be 0) for at least one category for the selected date"
            ),
            ValidationError::InvalidDate { value } => {
                write!(f, "invalid date '{value}', expected YYYY-MM-DD")
            }
            ValidationError::UnknownStaff { staff_id } => {
                write!(f, "unknown staff member '{staff_id}'")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// The document under `key` exists but could not be parsed.
    Corrupt { key: String, source: serde_json::Error },
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "store io error: {err}"),
            StoreError::Corrupt { key, source } => {
                write!(f, "stored document '{key}' is corrupt: {source}")
            }
            StoreError::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Corrupt { source, .. } => Some(source),
            StoreError::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    Registry(String),
    RegistryFile {
        path: String,
        source: std::io::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(value) => write!(f, "PORT must be a valid u16, got '{value}'"),
            ConfigError::Registry(reason) => write!(f, "invalid category registry: {reason}"),
            ConfigError::RegistryFile { path, source } => {
                write!(f, "failed to read registry file '{path}': {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::RegistryFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownStaff { .. } => Self::not_found(err.to_string()),
            other => Self::bad_request(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

//! Error types for schema loading and validation

use std::path::PathBuf;
use thiserror::Error;

/// Result type for startup operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Outcome of a single validation call
pub type Outcome = std::result::Result<(), ValidationError>;

/// Startup-fatal errors: bad configuration or an unreadable schema source
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot list schema directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Schema location is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No schema document configured for the linked strategy")]
    MissingSource,

    #[error("Linked schema document {0} has no `definitions` object")]
    MissingDefinitions(PathBuf),

    #[error("Resource '{key}' is defined twice (second file: {path})")]
    DuplicateResource { key: String, path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

/// Per-call failures, returned to the host as values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Schema path must have at least one non-empty segment")]
    EmptyPath,

    #[error("Unknown schema: {key}")]
    UnknownSchema { key: String },

    #[error("Unknown resource: {resource}{}", suggestion_suffix(.suggestion))]
    UnknownResource {
        resource: String,
        suggestion: Option<String>,
    },

    #[error("Schema path {path} not found: missing segment '{segment}'")]
    PathNotFound { path: String, segment: String },

    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    #[error("Resolved schema is not a valid JSON Schema: {message}")]
    InvalidSchema { message: String },

    #[error("Payload is not valid JSON: {message}")]
    MalformedPayload { message: String },
}

impl ValidationError {
    /// Whether this is a payload violation rather than a resolution problem
    pub fn is_violation(&self) -> bool {
        matches!(self, ValidationError::Schema(_))
    }

    /// The violation details, if the payload failed its schema
    pub fn violation(&self) -> Option<&SchemaViolation> {
        match self {
            ValidationError::Schema(v) => Some(v),
            _ => None,
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

/// The first constraint a payload broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed at '{pointer}': {message}")]
pub struct SchemaViolation {
    /// JSON pointer into the payload ("" is the payload root)
    pub pointer: String,
    /// Description of the violated constraint
    pub message: String,
}

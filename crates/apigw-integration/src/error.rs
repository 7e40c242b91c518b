//! Error types for `unrelated-apigw-integration`.

use thiserror::Error;

/// Main error type for the integration filter.
#[derive(Error, Debug)]
pub enum IntegrationError {
    /// Invalid argument passed to a settings builder (e.g. blank response code).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration errors (bad base URL, missing fields).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input document is not a Swagger 2.0 document.
    #[error("Unsupported document version '{0}' (expected swagger \"2.0\")")]
    UnsupportedVersion(String),

    /// A preflight response already declares a CORS header the transform would add.
    ///
    /// The preflight path must run exactly once per operation.
    #[error("Response '{code}' already declares header '{header}'")]
    DuplicateHeader { code: String, header: String },

    /// Failure while transforming one operation of a document.
    #[error("{method} {path}: {source}")]
    Operation {
        method: String,
        path: String,
        #[source]
        source: Box<IntegrationError>,
    },

    #[error("failed to read '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse document from '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// JSON errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for integration operations.
pub type Result<T> = std::result::Result<T, IntegrationError>;

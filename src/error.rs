use thiserror::Error;

/// Error types for the part finder pipeline
#[derive(Error, Debug)]
pub enum PartFinderError {
    // Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file: {path}")]
    InvalidConfig { path: String },

    // Cache errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Cache entry corrupted: {key}")]
    CacheCorruption { key: String },

    // Query extraction errors
    #[error("Query extraction failed: {message}")]
    Extraction { message: String },

    #[error("Language model request failed: {message}")]
    Model { message: String },

    // Source errors
    #[error("Unknown source: {source_id}")]
    UnknownSource { source_id: String },

    #[error("Source fetch failed: {source_id} - {message}")]
    SourceFetch { source_id: String, message: String },

    // Export errors
    #[error("Export error: {message}")]
    Export { message: String },

    #[error("File write failed: {path}")]
    FileWrite { path: String },

    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PartFinderError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache { message: message.into() }
    }

    /// Create a query extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction { message: message.into() }
    }

    /// Create an export error
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export { message: message.into() }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration { .. } | Self::InvalidConfig { .. } => "configuration",
            Self::Cache { .. } | Self::CacheCorruption { .. } => "cache",
            Self::Extraction { .. } | Self::Model { .. } => "llm",
            Self::UnknownSource { .. } | Self::SourceFetch { .. } => "source",
            Self::Export { .. } | Self::FileWrite { .. } | Self::UnsupportedFormat { .. } => "export",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether the pipeline can continue past this error with a fallback
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Extraction and model failures fall back to an empty query;
            // corrupt cache entries are re-synthesized.
            Self::Extraction { .. } |
            Self::Model { .. } |
            Self::CacheCorruption { .. } => true,

            Self::Configuration { .. } |
            Self::InvalidConfig { .. } |
            Self::UnknownSource { .. } => false,

            _ => false,
        }
    }
}

/// Result type alias for the part finder
pub type PartFinderResult<T> = std::result::Result<T, PartFinderError>;

impl From<std::io::Error> for PartFinderError {
    fn from(err: std::io::Error) -> Self {
        Self::Cache { message: err.to_string() }
    }
}

impl From<anyhow::Error> for PartFinderError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal { message: err.to_string() }
    }
}

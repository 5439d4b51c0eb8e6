/// Error types for the transliteration engine and its dictionary store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlingonError {
    /// The backing dictionary store could not be reached or refused a write
    StoreUnavailable(String),
    /// The persisted dictionary could not be decoded
    MalformedPersistedData(String),
    /// A manual dictionary entry was rejected before any mutation
    InvalidManualEntry(String),
    /// Invalid configuration value
    ConfigError(String),
}

impl std::fmt::Display for SlingonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlingonError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            SlingonError::MalformedPersistedData(msg) => {
                write!(f, "Malformed persisted data: {}", msg)
            }
            SlingonError::InvalidManualEntry(msg) => write!(f, "Invalid manual entry: {}", msg),
            SlingonError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SlingonError {}

/// Result type for engine and store operations
pub type SlingonResult<T> = Result<T, SlingonError>;

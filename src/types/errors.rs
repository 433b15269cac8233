use thiserror::Error;

// === BookmarkError ===

/// Errors that abort a bookmark or folder mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    /// Bad user input: empty required field or malformed URL.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// A referenced bookmark or folder id does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The move would make a folder its own ancestor.
    #[error("Moving folder {folder_id} under {target_id} would create a cycle")]
    Cycle { folder_id: String, target_id: String },
}

// === StorageError ===

/// Errors raised by a key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    Database(String),
    /// Failed to serialize the value to be stored.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
    /// The write would exceed the store's capacity.
    #[error("Storage quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

// === PersistenceWarning ===

/// A failed durable write. Never fatal: the in-memory tree stays authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Changes were not saved ({key}): {source}")]
pub struct PersistenceWarning {
    pub key: String,
    #[source]
    pub source: StorageError,
}

// === DragError ===

/// Invalid input for the drag-and-drop state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// A gesture started while another one is still in progress.
    #[error("A drag is already in progress: {0}")]
    AlreadyDragging(String),
    /// A move or end input arrived with no gesture in progress.
    #[error("No drag in progress")]
    NotDragging,
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === SummaryError ===

/// Errors related to webpage summarization.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The URL to summarize is not an absolute http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// No API key is available for the summarization endpoint.
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),
    /// A network error occurred while fetching the page or calling the model.
    #[error("Summary network error: {0}")]
    NetworkError(String),
    /// The page contained no readable text.
    #[error("Page has no readable text: {0}")]
    EmptyPage(String),
    /// The model provider returned an error or an unexpected payload.
    #[error("Summary provider error: {0}")]
    ProviderError(String),
}

use serde::{Deserialize, Serialize};

/// Top-level application settings container.
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub summarizer: SummarizerSettings,
    pub logging: LoggingSettings,
}

/// Where and under which keys the bookmark tree is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite file name, relative to the data directory.
    pub database_file: String,
    pub tree_key: String,
    pub toggles_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "cozyhub.db".to_string(),
            tree_key: "bookmarkFolders".to_string(),
            toggles_key: "bookmarkedBits".to_string(),
        }
    }
}

/// Webpage summarization endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummarizerSettings {
    /// OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub max_input_chars: usize,
    pub timeout_secs: u64,
    pub enabled: bool,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "COZYHUB_SUMMARY_API_KEY".to_string(),
            max_input_chars: 6000,
            timeout_secs: 20,
            enabled: true,
        }
    }
}

/// Log output settings. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "cozyhub=info".to_string(),
        }
    }
}

// Cozy Hub settings
// JSON settings file in the platform config directory, with dotted-path updates.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppSettings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: AppSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: AppSettings::default(),
        }
    }
}

fn io_error(what: &str, e: std::io::Error) -> SettingsError {
    SettingsError::IoError(format!("{}: {}", what, e))
}

fn json_error(what: &str, e: serde_json::Error) -> SettingsError {
    SettingsError::SerializationError(format!("{}: {}", what, e))
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the settings file. A missing file means defaults; a malformed one is an error.
    fn load(&mut self) -> Result<AppSettings, SettingsError> {
        let path = Path::new(&self.config_path);
        self.settings = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| io_error("cannot read settings file", e))?;
            let settings = serde_json::from_str(&content).map_err(|e| json_error("cannot parse settings file", e))?;
            info!(path = %self.config_path, "settings loaded");
            settings
        } else {
            AppSettings::default()
        };
        Ok(self.settings.clone())
    }

    /// Writes the settings file, creating its directory on first save.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| io_error("cannot create settings directory", e))?;
        }
        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| json_error("cannot serialize settings", e))?;
        fs::write(path, json).map_err(|e| io_error("cannot write settings file", e))
    }

    fn get_settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Replaces one setting addressed by a dotted path, e.g. `"summarizer.model"`,
    /// then saves. Only existing keys can be set and the result must still
    /// deserialize as [`AppSettings`].
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() || key.split('.').any(str::is_empty) {
            return Err(SettingsError::InvalidKey(format!("malformed key '{}'", key)));
        }
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (format!("/{}", parent.replace('.', "/")), leaf),
            None => (String::new(), key),
        };

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| json_error("cannot serialize settings", e))?;
        let slot = tree
            .pointer_mut(&parent)
            .and_then(serde_json::Value::as_object_mut)
            .and_then(|map| map.get_mut(leaf))
            .ok_or_else(|| SettingsError::InvalidKey(format!("no setting named '{}'", key)))?;
        *slot = value;

        self.settings = serde_json::from_value(tree)
            .map_err(|e| SettingsError::InvalidValue(format!("bad value for '{}': {}", key, e)))?;
        debug!(key, "setting updated");
        self.save()
    }

    /// Restores factory defaults and saves them.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AppSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}

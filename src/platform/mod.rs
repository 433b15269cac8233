// Cozy Hub platform paths
// Where settings and the local storage database live on each OS.
//
// Linux follows XDG (`$XDG_CONFIG_HOME`, `$XDG_DATA_HOME`), macOS uses
// `~/Library/Application Support`, Windows uses `%APPDATA%`.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "cozyhub";

/// Environment variable that overrides the data directory on every platform.
pub const DATA_DIR_ENV: &str = "COZYHUB_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "linux")]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

#[cfg(target_os = "windows")]
fn appdata_dir() -> PathBuf {
    env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
        .join(APP_DIR)
}

/// Returns the configuration directory (holds `settings.json`).
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        appdata_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(format!(".{}", APP_DIR))
    }
}

/// Returns the data directory (holds the local storage database).
///
/// `COZYHUB_DATA_DIR` wins when set.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub file: Option<String>,
    #[serde(alias = "gemini_api_key")]
    pub api_key: Option<String>,
    pub page_size: Option<usize>,
    pub delete_window: Option<u64>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub target_language: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".exercise-editor").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# exercise-editor config
#
# Location (default):
#   ~/.exercise-editor/config.yml

# Dataset opened at startup (optional)
# file: ./exercises.json

# Listing
page_size: 20

# Seconds a delete stays undoable before it is committed
delete_window: 5

# Translation (the `key` command writes api_key here)
# api_key: ""
model: gemini-2.5-flash
endpoint: https://generativelanguage.googleapis.com/v1beta
target_language: Persian
timeout: 30
# proxy: http://127.0.0.1:8080

# Output styling
no_color: false
"#
    .to_string()
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    ensure_parent_dir(path)?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

// Rewrites the file through serde, so comments in an existing file are not kept.
pub fn save_api_key(path: &Path, api_key: &str) -> Result<(), String> {
    let mut cfg = load_config(path, true)?;
    let trimmed = api_key.trim();
    cfg.api_key = if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    };
    let contents = serde_yaml::to_string(&cfg)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    ensure_parent_dir(path)?;
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

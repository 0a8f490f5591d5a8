use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::files::DEFAULT_MAX_DEPTH;

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("app.log"))
}
fn default_extensions() -> Vec<String> {
    vec![".txt".to_string(), ".log".to_string()]
}
fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_top_k() -> usize {
    10
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub words: WordsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// off, error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file written alongside terminal output; omit to log to the terminal only
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WordsConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl FileConfig {
    /// First parseable config from the search path, if any
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config, which must exist and parse
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("toolbelt.toml"));
    paths.push(PathBuf::from(".toolbelt.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("toolbelt").join("config.toml"));
        paths.push(config_dir.join("toolbelt.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".toolbelt.toml"));
        paths.push(home.join(".config").join("toolbelt").join("config.toml"));
    }

    paths
}
